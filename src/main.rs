use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use glucose_dashboard_api::assistant::Assistant;
use glucose_dashboard_api::assistant::context::TargetRange;
use glucose_dashboard_api::snapshot::{SnapshotGenerator, load_baseline};
use glucose_dashboard_api::telemetry::init_telemetry;
use glucose_dashboard_api::{AppState, Config, llm, routes, store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    let telemetry_guard = init_telemetry(&config)?;

    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting glucose-dashboard-api"
    );

    let baseline = load_baseline(config.baseline_path.as_deref())?;
    let generator = SnapshotGenerator::new(baseline, config.jitter);

    let store = store::connect(config.database_url.as_deref(), config.history_capacity).await?;

    let primary = llm::build_provider(&config.llm_provider, &config)?.with_context(|| {
        format!(
            "LLM_PROVIDER must name a provider, got {:?}",
            config.llm_provider
        )
    })?;
    let fallback = llm::build_provider(&config.fallback_provider, &config)?;

    if config.llm_provider == "gemini" && config.gemini_api_key.is_none() {
        tracing::warn!(
            "GEMINI_API_KEY not set, the assistant will answer with an advisory message"
        );
    }

    tracing::info!(
        primary_provider = %config.llm_provider,
        fallback_provider = %config.fallback_provider,
        model = %config.llm_model,
        store = store.backend(),
        "LLM client initialized"
    );

    let llm_client = Arc::new(llm::LlmClient {
        primary,
        fallback,
        fallback_model: config.fallback_model.clone(),
        max_attempts: config.llm_max_attempts,
        call_timeout: Duration::from_secs(config.llm_timeout_secs),
        total_timeout: config.llm_deadline(),
    });

    let assistant = Arc::new(Assistant {
        llm: llm_client,
        model: config.llm_model.clone(),
        temperature: config.llm_temperature,
        max_tokens: config.llm_max_tokens,
        max_query_chars: config.max_query_chars,
        target: TargetRange::default(),
    });

    let state = AppState {
        generator,
        assistant,
        store,
    };

    let app = routes::create_router(state, Duration::from_secs(config.request_timeout_secs));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    telemetry_guard.shutdown();

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
