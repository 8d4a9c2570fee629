use std::net::SocketAddr;

use quizgen_backend::{
    app,
    config::{get_config, init_config},
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    init_config()?;
    let config = get_config()?;

    let app_state = AppState::new(config)?;
    info!(
        text_model = %config.text_model,
        image_model = %config.image_model,
        max_questions = config.max_questions,
        max_attempts = config.generation_max_attempts,
        "Quiz generator ready"
    );

    let app = app(app_state, config);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
