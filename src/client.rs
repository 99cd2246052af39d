//! The [`OpenAi`] facade combining every endpoint group.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::api::{
    assistants, chat, Assistants, Chat, Files, Messages, Runs, Threads, VectorStores,
};
use crate::error::{Error, Result};
use crate::poller::{PollOptions, RunPoller};
use crate::resource::ResourceClient;
use crate::transport::{
    ReqwestTransport, Transport, DEFAULT_BASE_URL, DEFAULT_BETA_HEADER, REQUEST_TIMEOUT,
};
use crate::utils::settings::Settings;

/// Environment variables checked, in order, for the API key.
pub const API_KEY_VARS: &[&str] = &["OPENAI_API_KEY", "OPENAI_AUTH_TOKEN"];

/// Environment variable overriding the base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Client for the OpenAI API.
///
/// Each endpoint group is a public field, so calls read as
/// `client.threads.create_thread()` or `client.runs.get_run(..)`.
#[derive(Clone)]
pub struct OpenAi {
    /// Chat completions.
    pub chat: Chat,
    /// File uploads.
    pub files: Files,
    /// Assistants.
    pub assistants: Assistants,
    /// Vector stores.
    pub vector_stores: VectorStores,
    /// Threads.
    pub threads: Threads,
    /// Thread messages.
    pub messages: Messages,
    /// Runs.
    pub runs: Runs,
}

impl OpenAi {
    /// Creates a client with default settings.
    ///
    /// Fails with [`Error::EmptyApiKey`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Starts configuring a client.
    pub fn builder(api_key: impl Into<String>) -> OpenAiBuilder {
        OpenAiBuilder::new(api_key)
    }

    /// Creates a client from `OPENAI_API_KEY` (or `OPENAI_AUTH_TOKEN`) and the
    /// optional `OPENAI_BASE_URL`, falling back to the settings file.
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = Settings::load().unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring unreadable settings file");
            Settings::default()
        });
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|key| settings.get_env_var(key))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "OpenAI API key not found.\n\
                     Set one of these environment variables:\n\
                     - OPENAI_API_KEY\n\
                     - OPENAI_AUTH_TOKEN"
                )
            })?;

        let mut builder = Self::builder(api_key);
        if let Some(base_url) = settings.get_env_var(BASE_URL_VAR) {
            builder = builder.base_url(base_url);
        }
        Ok(builder.build()?)
    }

    /// Creates a client over an existing transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::from_parts(
            ResourceClient::new(transport),
            chat::DEFAULT_MODEL,
            assistants::DEFAULT_MODEL,
        )
    }

    fn from_parts(client: ResourceClient, chat_model: &str, assistant_model: &str) -> Self {
        Self {
            chat: Chat::new(client.clone(), chat_model),
            files: Files::new(client.clone()),
            assistants: Assistants::new(client.clone(), assistant_model),
            vector_stores: VectorStores::new(client.clone()),
            threads: Threads::new(client.clone()),
            messages: Messages::new(client.clone()),
            runs: Runs::new(client),
        }
    }

    /// Returns a poller sharing this client's transport.
    pub fn poller(&self, options: PollOptions) -> RunPoller {
        RunPoller::new(self.runs.clone(), self.messages.clone(), options)
    }

    /// Adds `prompt` to the thread, runs the assistant and waits for its reply.
    pub async fn ask(
        &self,
        thread_id: &str,
        assistant_id: &str,
        prompt: &str,
        options: PollOptions,
    ) -> Result<String> {
        self.messages.add_message(thread_id, prompt).await?;
        let run_id = self.runs.create_run(thread_id, assistant_id).await?;
        debug!(thread_id, run_id = %run_id, "Waiting for assistant reply");
        self.poller(options)
            .wait_for_response(thread_id, &run_id)
            .await
    }
}

/// Builder for [`OpenAi`].
pub struct OpenAiBuilder {
    api_key: String,
    base_url: String,
    beta_header: Option<(String, String)>,
    request_timeout: Duration,
    chat_model: String,
    assistant_model: String,
    transport: Option<Arc<dyn Transport>>,
}

impl OpenAiBuilder {
    fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            beta_header: Some((
                DEFAULT_BETA_HEADER.0.to_string(),
                DEFAULT_BETA_HEADER.1.to_string(),
            )),
            request_timeout: REQUEST_TIMEOUT,
            chat_model: chat::DEFAULT_MODEL.to_string(),
            assistant_model: assistants::DEFAULT_MODEL.to_string(),
            transport: None,
        }
    }

    /// Sets the API base URL, e.g. `https://api.openai.com/v1`.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the beta header; `None` sends no beta header.
    #[must_use]
    pub fn beta_header(mut self, header: Option<(String, String)>) -> Self {
        self.beta_header = header;
        self
    }

    /// Sets the timeout applied to each HTTP request.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the model used for chat completions.
    #[must_use]
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Sets the model used for new assistants.
    #[must_use]
    pub fn assistant_model(mut self, model: impl Into<String>) -> Self {
        self.assistant_model = model.into();
        self
    }

    /// Uses `transport` instead of building a `reqwest` one.
    ///
    /// The API key is still validated, but authentication is up to the
    /// transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<OpenAi> {
        if self.api_key.is_empty() {
            return Err(Error::EmptyApiKey);
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let base_url = validate_base_url(&self.base_url)?;
                let beta = self
                    .beta_header
                    .as_ref()
                    .map(|(k, v)| (k.as_str(), v.as_str()));
                debug!(base_url = %base_url, beta = ?beta, "Building HTTP transport");
                Arc::new(ReqwestTransport::new(
                    &self.api_key,
                    &base_url,
                    beta,
                    self.request_timeout,
                )?) as Arc<dyn Transport>
            }
        };

        Ok(OpenAi::from_parts(
            ResourceClient::new(transport),
            &self.chat_model,
            &self.assistant_model,
        ))
    }
}

/// Checks that `base_url` is an absolute http(s) URL and strips trailing slashes.
fn validate_base_url(base_url: &str) -> Result<String> {
    let parsed = Url::parse(base_url)
        .map_err(|e| Error::InvalidConfig(format!("Invalid base URL {base_url:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidConfig(format!(
            "Base URL must use http or https, got {}",
            parsed.scheme()
        )));
    }
    Ok(base_url.trim_end_matches('/').to_string())
}
