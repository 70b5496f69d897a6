//! Server setup and initialization
//!
//! Wires the database, object store and services into the router, and runs
//! the reminder scheduler alongside the HTTP listener until shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use event_common::{AppConfig, AppError, JwtService, TicketCodec};
use event_db::{
    create_pool, run_migrations, DatabaseConfig, PgEventRepository, PgNotificationRepository,
    PgPool, PgReservationRepository, PgUserRepository,
};
use event_notify::{
    LocalObjectStore, MailLink, MessageComposer, NotificationScheduler, SchedulerConfig,
    SmtpConnector,
};
use event_service::{ServiceContext, ServiceSettings};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = apply_middleware(create_router(), state.config());
    router.with_state(state)
}

/// Connect to the database, prepare storage and build the service context
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Migrations failed: {e}")))?;
    info!("PostgreSQL ready");

    build_state(config, pool).await
}

/// Build the state on top of an existing pool
pub async fn build_state(config: AppConfig, pool: PgPool) -> Result<AppState, AppError> {
    let object_store = LocalObjectStore::from_config(&config.storage, &config.api.public_base_url);
    object_store
        .ensure_root()
        .await
        .map_err(|e| AppError::Config(format!("Upload directory unusable: {e}")))?;
    info!(upload_dir = %object_store.root().display(), "Image storage ready");

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let service_context = ServiceContext::builder()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .event_repo(Arc::new(PgEventRepository::new(pool.clone())))
        .reservation_repo(Arc::new(PgReservationRepository::new(pool.clone())))
        .object_store(Arc::new(object_store))
        .jwt_service(jwt_service)
        .ticket_codec(Arc::new(TicketCodec::new(&config.ticket.secret)))
        .settings(ServiceSettings::from_config(&config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool))
}

/// Reminder scheduler sharing the API's pool and image store
pub fn create_scheduler(state: &AppState) -> NotificationScheduler {
    let config = state.config();
    NotificationScheduler::new(
        Arc::new(PgNotificationRepository::new(state.pool().clone())),
        MessageComposer::new(state.service_context().object_store_handle()),
        MailLink::new(Arc::new(SmtpConnector::new(config.smtp.clone()))),
        SchedulerConfig::from(&config.notification),
    )
}

/// Serve `app` on `addr` until `shutdown` resolves
pub async fn run_server<F>(app: Router, addr: SocketAddr, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

/// Run the API and the scheduler until Ctrl-C or SIGTERM
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;

    let cancel = CancellationToken::new();
    let scheduler = Arc::new(create_scheduler(&state)).spawn(cancel.child_token());

    let app = create_app(state);
    let result = run_server(app, addr, shutdown_signal(cancel.clone())).await;

    // The server may also have stopped on an error.
    cancel.cancel();
    if let Err(e) = scheduler.await {
        error!(error = %e, "Scheduler task ended abnormally");
    }
    info!("Shutdown complete");

    result
}

/// Resolve on Ctrl-C, SIGTERM, or when `cancel` fires elsewhere
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C"),
        () = terminate => info!("Received SIGTERM"),
        () = cancel.cancelled() => {}
    }

    cancel.cancel();
}
