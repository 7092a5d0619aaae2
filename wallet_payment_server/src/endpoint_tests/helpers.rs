use actix_web::web::{self, ServiceConfig};
use tempfile::TempDir;
use wallet_payment_engine::{
    events::EventProducers,
    test_utils::prepare_env::{apply_migrations, recreate_database},
    MatchOptions,
    ReconciliationApi,
    SqliteDatabase,
    WalletApi,
};

use crate::routes::{credit_wallet, health, payment_status, reset_wallet, submit_payment, wallet_balance};

/// A fresh, migrated SQLite database in a temp directory. Keep the `TempDir` alive for the duration of the test.
pub async fn setup_db() -> (TempDir, SqliteDatabase) {
    let _ = env_logger::try_init();
    let dir = tempfile::tempdir().expect("Error creating temp directory");
    let url = format!("sqlite://{}/wps_test.db", dir.path().display());
    recreate_database(&url).await;
    apply_migrations(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    (dir, db)
}

/// Registers the full route set over the given backend, the same way the server assembles it.
pub fn configure(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let reconciliation_api = ReconciliationApi::new(db.clone(), EventProducers::default(), MatchOptions::default());
        let wallet_api = WalletApi::new(db);
        cfg.app_data(web::Data::new(reconciliation_api))
            .app_data(web::Data::new(wallet_api))
            .service(health)
            .service(submit_payment)
            .service(payment_status)
            .service(wallet_balance)
            .service(reset_wallet)
            .service(credit_wallet);
    }
}
