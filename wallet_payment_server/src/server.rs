use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use futures::FutureExt;
use log::*;
use wallet_payment_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    ReconciliationApi,
    SqliteDatabase,
    WalletApi,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{credit_wallet, health, payment_status, reset_wallet, submit_payment, wallet_balance},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(25, default_hooks());
    let producers = handlers.producers();
    tokio::spawn(handlers.start_handlers());
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// The stock event subscribers: log lines on the notification side-channel. A deployment that wants to push
/// real notifications replaces these and calls [`create_server_instance`] itself.
pub fn default_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_submission_matched(|ev| {
        let s = ev.submission;
        info!("📬️ Submission {} (TID [{}]) matched for user {}. Notification would be dispatched here.", s.id, s.tid, s.user_id);
        async {}.boxed()
    });
    hooks.on_submission_rejected(|ev| {
        let s = ev.submission;
        info!("📬️ Submission {} (TID [{}]) was rejected for user {}.", s.id, s.tid, s.user_id);
        async {}.boxed()
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let reconciliation_api = ReconciliationApi::new(db.clone(), producers.clone(), config.match_options());
        let wallet_api = WalletApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("wps::access_log"))
            .app_data(web::Data::new(reconciliation_api))
            .app_data(web::Data::new(wallet_api))
            .service(health)
            .service(submit_payment)
            .service(payment_status)
            .service(wallet_balance)
            .service(reset_wallet)
            .service(credit_wallet)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
