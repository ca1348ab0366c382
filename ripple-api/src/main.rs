use crate::server::ServerState;
use ripple_db::client::DbClient;
use serde::Deserialize;
use sqlx::PgPool;
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod maintenance;
mod server;

const DEFAULT_FEED_SWEEP_INTERVAL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error connecting to the database: {0}")]
    DbConnect(sqlx::Error),
    #[error("Error running migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    server_address: IpAddr,
    server_port: u16,
    database_url: String,
    feed_sweep_interval_secs: Option<u64>,
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ripple_api=debug,ripple_common=debug,ripple_db=debug,\
                tower_http=debug,axum::rejection=trace,sqlx=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let pool = PgPool::connect(&env.database_url)
        .await
        .map_err(InitError::DbConnect)?;
    ripple_db::MIGRATOR.run(&pool).await?;
    let db_client = Arc::new(DbClient::new(pool));

    let shutdown = CancellationToken::new();
    let sweep_interval = Duration::from_secs(
        env.feed_sweep_interval_secs
            .unwrap_or(DEFAULT_FEED_SWEEP_INTERVAL_SECS),
    );
    let maintenance_task = tokio::spawn(maintenance::run(
        Arc::clone(&db_client),
        sweep_interval,
        shutdown.clone(),
    ));

    let tracing_layer = TraceLayer::new_for_http();
    let app = server::routes()
        .with_state(ServerState { db_client })
        .layer(tracing_layer);

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    debug!(%server_address, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(InitError::TcpServe)?;

    let _ = maintenance_task.await;

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Error waiting for shutdown signal");
    }

    shutdown.cancel();
}
