use std::time::Duration;

use openai_assist::api::{AssistantChanges, Tool};
use openai_assist::{Error, OpenAi, PollOptions};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "sk-integration";

/// Client pointed at the mock server's `/v1` prefix.
fn client(server: &MockServer) -> OpenAi {
    OpenAi::builder(API_KEY)
        .base_url(format!("{}/v1", server.uri()))
        .build()
        .unwrap()
}

fn fast_polling() -> PollOptions {
    PollOptions::new(Duration::from_millis(10), Duration::from_secs(5))
}

fn run_body(status: &str) -> serde_json::Value {
    json!({
        "id": "run_1",
        "object": "thread.run",
        "thread_id": "thread_1",
        "assistant_id": "asst_1",
        "status": status,
        "created_at": 1_700_000_000
    })
}

async fn mount_run_status(server: &MockServer, status: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body(status)))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn conversation_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/threads"))
        .and(header("authorization", "Bearer sk-integration"))
        .and(header("openai-beta", "assistants=v2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "thread_1", "object": "thread", "created_at": 1})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_1/messages"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"role": "user", "content": "What is 6 x 7?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_1"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_1/runs"))
        .and(body_json(json!({"assistant_id": "asst_1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("queued")))
        .expect(1)
        .mount(&server)
        .await;

    mount_run_status(&server, "queued", 1).await;
    mount_run_status(&server, "in_progress", 1).await;
    mount_run_status(&server, "completed", 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {
                    "id": "msg_2",
                    "thread_id": "thread_1",
                    "role": "assistant",
                    "run_id": "run_1",
                    "content": [{"type": "text", "text": {"value": "42", "annotations": []}}]
                },
                {
                    "id": "msg_1",
                    "thread_id": "thread_1",
                    "role": "user",
                    "content": [{"type": "text", "text": {"value": "What is 6 x 7?", "annotations": []}}]
                }
            ],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let thread_id = client.threads.create_thread().await.unwrap();
    let reply = client
        .ask(&thread_id, "asst_1", "What is 6 x 7?", fast_polling())
        .await
        .unwrap();

    assert_eq!(reply, "42");

    let run_polls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/v1/threads/thread_1/runs/run_1")
        .count();
    assert_eq!(run_polls, 3);
    server.verify().await;
}

#[tokio::test]
async fn failed_run_stops_polling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "run_1",
            "thread_id": "thread_1",
            "assistant_id": "asst_1",
            "status": "failed",
            "last_error": {"code": "rate_limit_exceeded", "message": "You exceeded your quota"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client
        .poller(fast_polling())
        .wait_for_response("thread_1", "run_1")
        .await
        .unwrap_err();

    match err {
        Error::RunTerminated { status, reason, .. } => {
            assert_eq!(status.as_str(), "failed");
            assert_eq!(reason.as_deref(), Some("You exceeded your quota"));
        }
        other => panic!("expected RunTerminated, got {other:?}"),
    }
    server.verify().await;
}

#[tokio::test]
async fn poller_times_out_on_stuck_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/threads/thread_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_body("in_progress")))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client
        .poller(PollOptions::new(
            Duration::from_millis(20),
            Duration::from_millis(100),
        ))
        .wait_for_completion("thread_1", "run_1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(_)));
}

#[tokio::test]
async fn remote_errors_carry_raw_body() {
    let server = MockServer::start().await;
    let body = r#"{"error":{"message":"No thread found with id 'nope'.","type":"invalid_request_error"}}"#;
    Mock::given(method("GET"))
        .and(path("/v1/threads/nope/runs/run_1"))
        .respond_with(ResponseTemplate::new(404).set_body_string(body))
        .mount(&server)
        .await;

    let err = client(&server)
        .runs
        .get_run("nope", "run_1")
        .await
        .unwrap_err();

    assert_eq!(err.remote_status().map(|s| s.as_u16()), Some(404));
    assert_eq!(err.remote_body(), Some(body));
}

#[tokio::test]
async fn malformed_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/threads"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server).threads.create_thread().await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn slow_response_hits_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/threads"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "thread_1"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = OpenAi::builder(API_KEY)
        .base_url(format!("{}/v1", server.uri()))
        .request_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = client.threads.create_thread().await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    // Port 9 (discard) on localhost is expected to be closed.
    let client = OpenAi::builder(API_KEY)
        .base_url("http://127.0.0.1:9/v1")
        .build()
        .unwrap();

    let err = client.threads.create_thread().await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
}

#[tokio::test]
async fn file_upload_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/files"))
        .and(header("authorization", "Bearer sk-integration"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("name=\"purpose\""))
        .and(body_string_contains("assistants"))
        .and(body_string_contains("filename=\"faq.md\""))
        .and(body_string_contains("# FAQ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "file-1",
            "object": "file",
            "bytes": 5,
            "filename": "faq.md",
            "purpose": "assistants"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server)
        .files
        .upload_file("docs/faq.md", b"# FAQ".to_vec())
        .await
        .unwrap();

    assert_eq!(id, "file-1");
    server.verify().await;
}

#[tokio::test]
async fn assistant_with_vector_store_setup() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/vector_stores"))
        .and(body_json(json!({"name": "test_store"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "vs_1", "name": "test_store"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/vector_stores/vs_1/files"))
        .and(body_json(json!({"file_id": "file-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-1", "status": "in_progress"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/assistants"))
        .and(body_json(json!({
            "instructions": "Answer from the FAQ",
            "name": "Support",
            "tools": [{"type": "file_search"}],
            "model": "gpt-3.5-turbo",
            "tool_resources": {"file_search": {"vector_store_ids": ["vs_1"]}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "asst_1",
            "name": "Support",
            "model": "gpt-3.5-turbo",
            "instructions": "Answer from the FAQ",
            "tools": [{"type": "file_search"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/assistants/asst_1"))
        .and(body_json(json!({"temperature": 0.25})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "asst_1",
            "model": "gpt-3.5-turbo",
            "temperature": 0.25
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v1/assistants/asst_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "asst_1",
            "object": "assistant.deleted",
            "deleted": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let store_id = client
        .vector_stores
        .create_vector_store("test_store")
        .await
        .unwrap();
    client
        .vector_stores
        .add_file(&store_id, "file-1")
        .await
        .unwrap();
    let assistant_id = client
        .assistants
        .create_assistant("Support", "Answer from the FAQ", &store_id, vec![])
        .await
        .unwrap();
    let updated = client
        .assistants
        .modify_assistant(
            &assistant_id,
            &AssistantChanges {
                temperature: Some(0.25),
                ..AssistantChanges::default()
            },
        )
        .await
        .unwrap();
    client.assistants.delete_assistant(&assistant_id).await.unwrap();

    assert_eq!(assistant_id, "asst_1");
    assert_eq!(updated.temperature, Some(0.25));
    assert_eq!(updated.tools, Vec::<Tool>::new());
    server.verify().await;
}

#[tokio::test]
async fn chat_completion_uses_configured_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "Reply in one word."},
                {"role": "user", "content": "Greet me"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAi::builder(API_KEY)
        .base_url(format!("{}/v1", server.uri()))
        .chat_model("gpt-4o-mini")
        .build()
        .unwrap();

    let reply = client
        .chat
        .create_completion(&[
            openai_assist::api::ChatMessage::system("Reply in one word."),
            openai_assist::api::ChatMessage::user("Greet me"),
        ])
        .await
        .unwrap();

    assert_eq!(reply, "Hello");
    server.verify().await;
}
