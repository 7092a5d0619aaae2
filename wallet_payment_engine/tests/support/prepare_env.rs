use std::path::Path;

use log::*;
use sqlx::{migrate, migrate::MigrateDatabase, Sqlite};
use wallet_payment_engine::SqliteDatabase;

/// Points the environment at `.env.test`, wipes any database left behind by an earlier run, and brings the
/// schema up to date. Each integration test calls this once before touching the store.
pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    recreate_database(url).await;
    apply_migrations(url).await;
    info!("🪛️ Test store ready at {url}");
}

/// A unique on-disk database path, so tests running in parallel never share state.
pub fn random_db_path() -> String {
    format!("sqlite://../data/wpg_test_{:016x}", rand::random::<u64>())
}

pub async fn apply_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Could not connect to the test database");
    migrate!("./src/sqlite/migrations").run(db.pool()).await.expect("Could not apply migrations");
}

/// Drops the database at `path` if one exists, then creates it fresh.
pub async fn recreate_database<P: AsRef<Path>>(path: P) {
    let path = path.as_ref().to_str().expect("Database path is not valid UTF-8");
    if let Err(e) = Sqlite::drop_database(path).await {
        debug!("🪛️ Nothing to drop at {path}: {e}");
    }
    Sqlite::create_database(path).await.expect("Could not create the test database");
}
