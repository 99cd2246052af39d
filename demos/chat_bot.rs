//! Interactive chat with an existing assistant.
//!
//! ```text
//! OPENAI_API_KEY=sk-... cargo run --example chat_bot -- --assistant-id asst_...
//! ```

use std::io::{self, BufRead, Write};
use std::process;
use std::time::Duration;

use clap::Parser;
use openai_assist::{OpenAi, PollOptions};

/// Chat with an OpenAI assistant from the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Assistant to talk to.
    #[arg(long)]
    assistant_id: String,

    /// Delay between run status checks, in milliseconds.
    #[arg(long, default_value_t = 200)]
    poll_interval_ms: u64,

    /// Give up on a reply after this many seconds.
    #[arg(long, default_value_t = 120)]
    max_wait_secs: u64,
}

#[tokio::main]
async fn main() {
    // Default to "warn" if RUST_LOG is not set; logs go to stderr so they
    // don't interleave with the conversation on stdout.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {err}");
            source = err.source();
        }

        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let client = OpenAi::from_env()?;
    let thread_id = client.threads.create_thread().await?;
    let options = PollOptions::new(
        Duration::from_millis(args.poll_interval_ms),
        Duration::from_secs(args.max_wait_secs),
    );

    let stdin = io::stdin();
    loop {
        print!("Enter your message (enter \"q\" to exit): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let prompt = line.trim();
        if prompt.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        if prompt.is_empty() {
            continue;
        }

        let reply = client
            .ask(&thread_id, &args.assistant_id, prompt, options.clone())
            .await?;
        println!("Assistant response: {reply}");
    }
}
