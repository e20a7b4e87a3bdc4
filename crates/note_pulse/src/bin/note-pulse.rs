use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use note_pulse::{
    http::create_router, retry::RetryPolicy, tracing::init_tracing_subscriber, ApiKeyPool,
    GroqClient, NotesPipelineBuilder, TranscriptApi,
};
use tokio::{net::TcpListener, signal};

#[derive(Parser)]
#[command(name = "note-pulse", about = "Turns video links into structured lecture notes")]
struct Cli {
    /// JSON-encoded array of Groq API keys
    #[arg(long, env = "GROQ_API_KEY_JSON")]
    groq_keys: String,

    /// JSON-encoded array of transcript provider API keys
    #[arg(long, env = "TRANSCRIPT_API_KEY_JSON")]
    transcript_keys: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Transcript fetch attempts per request
    #[arg(long, default_value = "5")]
    transcript_attempts: u32,

    /// Notes synthesis attempts per request
    #[arg(long, default_value = "3")]
    notes_attempts: u32,
}

fn parse_keys(raw: &str) -> anyhow::Result<Vec<String>> {
    serde_json::from_str(raw).context("expected a JSON array of strings")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let transcript_keys =
        parse_keys(&cli.transcript_keys).context("failed to parse TRANSCRIPT_API_KEY_JSON")?;
    let groq_keys = parse_keys(&cli.groq_keys).context("failed to parse GROQ_API_KEY_JSON")?;

    let transcript_pool = ApiKeyPool::new(transcript_keys)?;
    let llm_pool = ApiKeyPool::new(groq_keys)?;

    tracing::info!(
        transcript_keys = transcript_pool.len(),
        groq_keys = llm_pool.len(),
        "Key pools initialized"
    );

    let pipeline = NotesPipelineBuilder::new(transcript_pool, llm_pool)
        .fetcher(TranscriptApi::new())
        .synthesizer(GroqClient::new())
        .transcript_retry(RetryPolicy::transcript().max_attempts(cli.transcript_attempts))
        .notes_retry(RetryPolicy::notes().max_attempts(cli.notes_attempts))
        .build();

    let router = create_router(Arc::new(pipeline));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("invalid bind address")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "note-pulse server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("note-pulse server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        },
        () = terminate => {
            tracing::info!("Received terminate signal, shutting down");
        },
    }
}
