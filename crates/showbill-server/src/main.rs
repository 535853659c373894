use sea_orm_migration::MigratorTrait;
use showbill_db::AppState;
use showbill_server::config::ServerConfig;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showbill_server=info,showbill_db=info,tower_http=info".into()),
        )
        .init();

    // Database connection
    let db_config = showbill_db::DatabaseConfig::from_env();
    tracing::info!("connecting to database...");
    let db = showbill_db::connect(&db_config)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("running database migrations...");
    showbill_migration::Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    tracing::info!("migrations complete");

    let config = ServerConfig::from_env();
    let state = Arc::new(AppState { db });
    let app = showbill_server::router(state, &config.static_dir);

    let addr = config.socket_addr();
    tracing::info!(%addr, static_dir = %config.static_dir.display(), "server started");

    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .expect("failed to bind listener"),
        app,
    )
    .await
    .expect("server error");
}
