use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use syllabus_backend::api::router;
use syllabus_backend::config::AppConfig;
use syllabus_backend::db;
use syllabus_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "syllabus_backend=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let pool = match &config.database_url {
        Some(url) => Some(db::connect(url).await?),
        None => {
            warn!("DATABASE_URL is not set; syllabus storage is disabled");
            None
        }
    };
    if config.admin_emails.is_empty() {
        warn!("ADMIN_EMAILS is not set; administrative listing is disabled");
    }
    if config.genai.is_none() {
        warn!("GEMINI_API_KEY is not set; reference validation will report an error");
    }

    let state = AppState::from_config(&config, pool)?;
    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
