use std::sync::Arc;

use futures::StreamExt;
use tracing::{info, warn};

use immo_assist::channels::{Channel, TelegramChannel};
use immo_assist::config::Config;
use immo_assist::llm::create_provider;
use immo_assist::pipeline::{AlertDispatcher, KeywordMatcher, MessagePipeline, ResponseGenerator};
use immo_assist::server::health_routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Configuration is fatal at startup — no serving without credentials
    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("  export TELEGRAM_TOKEN=123456:ABC...");
            eprintln!("  export OPENAI_API_KEY=sk-...");
            std::process::exit(1);
        }
    };

    info!(
        model = %config.model,
        health_port = config.health_port,
        alerting = config.alert_chat_id.is_some(),
        "Starting immo-assist"
    );

    // Health endpoint, served concurrently with message processing
    let health_port = config.health_port;
    tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{health_port}"))
            .await
            .expect("Failed to bind health endpoint port");
        info!(port = health_port, "Health endpoint started");
        axum::serve(listener, health_routes()).await.ok();
    });

    // Telegram channel doubles as the alert side-channel
    let telegram = Arc::new(TelegramChannel::new(config.telegram_token.clone()));
    if let Err(e) = telegram.health_check().await {
        warn!(error = %e, "Telegram health check failed, continuing anyway");
    }

    let llm = create_provider(&config);
    let pipeline = Arc::new(MessagePipeline::new(
        telegram.clone(),
        KeywordMatcher::new(&config.keywords),
        AlertDispatcher::new(telegram.clone(), config.alert_chat_id.clone()),
        ResponseGenerator::new(llm, config.temperature, config.max_output_tokens),
    ));

    // One independent task per inbound message
    let mut messages = telegram.start().await?;
    while let Some(msg) = messages.next().await {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            pipeline.handle(msg).await;
        });
    }

    Ok(())
}
