use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kuri_api::{
    app,
    state::{AppState, AuthSettings},
};
use kuri_booking::BookingService;
use kuri_core::notify::Mailer;
use kuri_core::repository::{AdminDirectory, CoffeeCatalog, ReservationLedger};
use kuri_notify::{NoopMailer, WorkerMailer};
use kuri_store::{DbClient, PgAdminDirectory, PgCoffeeCatalog, PgReservationLedger};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kuri_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = kuri_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Kuri reservation API on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let ledger: Arc<dyn ReservationLedger> = Arc::new(PgReservationLedger::new(db.pool.clone()));
    let catalog: Arc<dyn CoffeeCatalog> = Arc::new(PgCoffeeCatalog::new(db.pool.clone()));
    let admins: Arc<dyn AdminDirectory> = Arc::new(PgAdminDirectory::new(db.pool.clone()));

    // First-run admin account, from config/environment
    if let (Some(username), Some(password)) = (
        config.auth.bootstrap_username.as_deref(),
        config.auth.bootstrap_password.as_deref(),
    ) {
        let hash =
            bcrypt::hash(password, bcrypt::DEFAULT_COST).expect("Failed to hash bootstrap password");
        admins
            .ensure_bootstrap_admin(username, &hash)
            .await
            .expect("Failed to bootstrap admin account");
    }

    let mailer: Arc<dyn Mailer> = match &config.notifier.worker_url {
        Some(url) => Arc::new(
            WorkerMailer::new(
                url.clone(),
                Duration::from_secs(config.notifier.timeout_seconds),
            )
            .expect("Failed to build email client"),
        ),
        None => Arc::new(NoopMailer),
    };

    let booking = Arc::new(BookingService::new(
        ledger,
        Arc::clone(&catalog),
        mailer,
        config.booking.slot_capacity,
    ));

    let app_state = AppState {
        booking,
        catalog,
        admins,
        auth: AuthSettings {
            secret: config.auth.jwt_secret.clone(),
            session_ttl_seconds: config.auth.session_ttl_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
