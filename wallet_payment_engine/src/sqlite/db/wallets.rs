use log::{debug, trace};
use sqlx::SqliteConnection;
use wpg_common::Rupees;

use crate::{
    db_types::{UserWallet, WalletTransaction},
    traits::LedgerError,
};

/// Upserts a zero-balance wallet row for the user. Idempotent.
pub async fn ensure_wallet(user_id: i64, conn: &mut SqliteConnection) -> Result<(), LedgerError> {
    let _ = sqlx::query("INSERT INTO user_wallets (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_wallet(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<UserWallet>, sqlx::Error> {
    let wallet =
        sqlx::query_as("SELECT * FROM user_wallets WHERE user_id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(wallet)
}

/// The user's balance, or zero when no wallet row exists yet.
pub async fn balance(user_id: i64, conn: &mut SqliteConnection) -> Result<Rupees, sqlx::Error> {
    let balance: Option<Rupees> = sqlx::query_scalar("SELECT balance FROM user_wallets WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(balance.unwrap_or_default())
}

/// Appends a transaction row keyed by submission id, or does nothing if a row for that submission already exists.
///
/// The `ON CONFLICT DO NOTHING` rides on the UNIQUE constraint over `submission_id`, so the existence check and
/// the insert are a single statement. A racing duplicate is rendered a no-op by the store itself rather than by
/// an application-level pre-check. Returns true if a row was written.
pub async fn insert_transaction_if_absent(
    user_id: i64,
    amount: Rupees,
    reference: &str,
    submission_id: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, LedgerError> {
    let result = sqlx::query(
        r#"
            INSERT INTO wallet_transactions (user_id, amount, kind, reference, submission_id)
            VALUES ($1, $2, 'credit', $3, $4)
            ON CONFLICT (submission_id) DO NOTHING;
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .bind(reference)
    .bind(submission_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Appends a transaction row with no idempotency key (manual/test credits).
pub async fn insert_transaction(
    user_id: i64,
    amount: Rupees,
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<(), LedgerError> {
    let _ = sqlx::query(
        "INSERT INTO wallet_transactions (user_id, amount, kind, reference) VALUES ($1, $2, 'credit', $3)",
    )
    .bind(user_id)
    .bind(amount)
    .bind(reference)
    .execute(conn)
    .await?;
    Ok(())
}

/// Moves the cached balance by the given delta. Must only ever be called in the same unit of work as the
/// transaction-log append it mirrors.
pub async fn adjust_balance(user_id: i64, delta: Rupees, conn: &mut SqliteConnection) -> Result<(), LedgerError> {
    let _ = sqlx::query(
        r#"
            UPDATE user_wallets SET
            balance = balance + $1,
            updated_at = CURRENT_TIMESTAMP
            WHERE user_id = $2
        "#,
    )
    .bind(delta)
    .bind(user_id)
    .execute(conn)
    .await?;
    trace!("💰️ Balance for user {user_id} adjusted by {delta}");
    Ok(())
}

/// Forces the balance to zero without touching the transaction log.
pub async fn reset_balance(user_id: i64, conn: &mut SqliteConnection) -> Result<UserWallet, LedgerError> {
    let wallet: Option<UserWallet> = sqlx::query_as(
        "UPDATE user_wallets SET balance = 0, updated_at = CURRENT_TIMESTAMP WHERE user_id = $1 RETURNING *",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    debug!("💰️ Balance for user {user_id} reset to zero");
    wallet.ok_or(LedgerError::WalletNotFound(user_id))
}

pub async fn transactions_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<WalletTransaction>, LedgerError> {
    let transactions =
        sqlx::query_as("SELECT * FROM wallet_transactions WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
            .bind(user_id)
            .fetch_all(conn)
            .await?;
    Ok(transactions)
}
