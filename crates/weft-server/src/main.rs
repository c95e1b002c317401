use async_trait::async_trait;
use clap::Parser;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use weft_agent::{
    AgentRunner, ChatMessage, ChatOutcome, LlmClient, LlmError, RunConfig, SessionRegistry,
    SurfaceLockRegistry,
};
use weft_server::{routes, AppState};
use weft_tools::{default_registry, UuidIdGen};

#[derive(Debug, Parser)]
#[command(name = "weft-server")]
struct Args {
    #[arg(long, env = "WEFT_HTTP_ADDR", default_value = "127.0.0.1:8080")]
    http_addr: String,

    #[arg(long, env = "WEFT_CONFIG")]
    config: Option<PathBuf>,

    /// Bound on runs queued behind a busy surface before failing fast.
    #[arg(long, env = "WEFT_SURFACE_QUEUE_LIMIT", default_value_t = SurfaceLockRegistry::DEFAULT_QUEUE_LIMIT)]
    surface_queue_limit: usize,
}

#[derive(Debug, Default, Deserialize)]
struct Config {
    #[serde(default)]
    system_prompt: Option<String>,
    #[serde(default)]
    temperature: Option<f32>,
}

/// Placeholder provider used until a real LLM client is wired in. Keeps
/// the binary runnable end-to-end: every turn reports that no provider is
/// configured instead of silently doing nothing.
struct UnconfiguredLlm;

#[async_trait]
impl LlmClient for UnconfiguredLlm {
    async fn generate_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: &[Value],
        _temperature: f32,
    ) -> Result<ChatOutcome, LlmError> {
        Err(LlmError::Provider(
            "no LLM provider configured for this server".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "unconfigured"
    }
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to read config {}: {e}", path.display());
            std::process::exit(2);
        }
    };
    match serde_json::from_str(&raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("failed to parse config (JSON): {e}");
            std::process::exit(2);
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let file_config = load_config(args.config.as_ref());

    let mut run_config = RunConfig::default();
    if let Some(prompt) = file_config.system_prompt {
        run_config.system_prompt = prompt;
    }
    if let Some(temperature) = file_config.temperature {
        run_config.temperature = temperature;
    }

    let runner = AgentRunner::new(
        Arc::new(UnconfiguredLlm),
        Arc::new(default_registry()),
        Arc::new(UuidIdGen),
        Arc::new(SessionRegistry::new()),
        Arc::new(SurfaceLockRegistry::with_queue_limit(
            args.surface_queue_limit,
        )),
        run_config,
    );

    let app = routes().with_state(AppState::new(runner));

    let listener = tokio::net::TcpListener::bind(&args.http_addr)
        .await
        .expect("failed to bind http listener");
    tracing::info!(addr = %args.http_addr, "weft server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .expect("http server crashed");
}
