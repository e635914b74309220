use postboard::{config::Settings, db, routes, AppState};

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "postboard=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(
        environment = %settings.environment,
        algorithm = ?settings.jwt.algorithm,
        "Loaded configuration"
    );

    // Database connection
    let pool = db::create_pool(&settings.database_url).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    let app_state = AppState::new(pool, &settings.jwt);
    let app = routes::build_router(app_state);

    let addr: SocketAddr = settings.bind_address().parse()?;
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
