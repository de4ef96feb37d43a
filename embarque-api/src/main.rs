use std::net::SocketAddr;
use std::sync::Arc;

use embarque_api::{app, AppState};
use embarque_core::{RandomCodeGenerator, ReservationService};
use embarque_store::{DbClient, PostgresFlightRepository, PostgresReservationRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "embarque_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = embarque_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Embarque API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let service = ReservationService::new(
        Arc::new(PostgresFlightRepository::new(db.pool.clone())),
        Arc::new(PostgresReservationRepository::new(db.pool.clone())),
        Arc::new(RandomCodeGenerator),
    );

    let app = app(AppState {
        reservations: Arc::new(service),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
