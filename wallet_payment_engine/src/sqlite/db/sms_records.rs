use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};
use wpg_common::Rupees;

use crate::{
    db_types::{NewSmsPayment, SmsPayment},
    helpers::content_hash,
    traits::ReconciliationError,
};

/// Appends an incoming SMS payment record. The UNIQUE constraint on `content_hash` turns a re-ingested message
/// into a hard error rather than a silent second row, which is how the upstream pipeline deduplicates.
pub async fn insert_sms_payment(
    sms: NewSmsPayment,
    conn: &mut SqliteConnection,
) -> Result<SmsPayment, ReconciliationError> {
    let hash = sms.content_hash.unwrap_or_else(|| content_hash(&sms.device_id, &sms.raw_text));
    let wallet = sms.wallet.to_string();
    let record = sqlx::query_as(
        r#"
            INSERT INTO sms_payments
                (device_id, wallet, raw_text, parsed_tid, parsed_amount, currency, sender_msisdn, tx_time, content_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(sms.device_id)
    .bind(wallet)
    .bind(sms.raw_text)
    .bind(sms.parsed_tid)
    .bind(sms.parsed_amount)
    .bind(sms.currency)
    .bind(sms.sender_msisdn)
    .bind(sms.tx_time)
    .bind(hash.clone())
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => ReconciliationError::DuplicateSmsPayment(hash),
        _ => ReconciliationError::from(e),
    })?;
    Ok(record)
}

pub async fn fetch_sms_payment(id: i64, conn: &mut SqliteConnection) -> Result<Option<SmsPayment>, sqlx::Error> {
    let record = sqlx::query_as("SELECT * FROM sms_payments WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(record)
}

/// Stage 1: exact, case-sensitive equality between the record's parsed TID and the claimed TID. The freshest
/// qualifying record wins.
pub async fn exact_tid_match(tid: &str, conn: &mut SqliteConnection) -> Result<Option<i64>, sqlx::Error> {
    let id = sqlx::query_scalar(
        "SELECT id FROM sms_payments WHERE parsed_tid = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .bind(tid)
    .fetch_optional(conn)
    .await?;
    trace!("🔍️ Exact TID match for [{tid}]: {id:?}");
    Ok(id)
}

/// Stage 2: the claimed TID appears verbatim anywhere in a record's raw text. This recovers matches where the
/// upstream parser failed to isolate the TID token but the digits survive in context. `instr` is used rather than
/// `LIKE` so that wildcard characters in a claimed TID cannot widen the search.
pub async fn fuzzy_text_match(tid: &str, conn: &mut SqliteConnection) -> Result<Option<i64>, sqlx::Error> {
    let id = sqlx::query_scalar(
        "SELECT id FROM sms_payments WHERE instr(raw_text, $1) > 0 ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .bind(tid)
    .fetch_optional(conn)
    .await?;
    trace!("🔍️ Fuzzy text match for [{tid}]: {id:?}");
    Ok(id)
}

/// Stage 3: an exact amount match within the trailing window ending at `now`. Lowest confidence, last resort.
///
/// With `exclusive` set, records already consumed by a matched submission are skipped, so two same-amount
/// submissions in the same window cannot both settle against one record.
pub async fn amount_window_match(
    amount: Rupees,
    window_start: DateTime<Utc>,
    now: DateTime<Utc>,
    exclusive: bool,
    conn: &mut SqliteConnection,
) -> Result<Option<i64>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT id FROM sms_payments
    WHERE parsed_amount = "#,
    );
    builder.push_bind(amount);
    builder.push(" AND tx_time IS NOT NULL AND tx_time >= ");
    builder.push_bind(window_start);
    builder.push(" AND tx_time <= ");
    builder.push_bind(now);
    if exclusive {
        builder.push(
            " AND id NOT IN (SELECT matched_sms_id FROM payment_submissions WHERE matched_sms_id IS NOT NULL)",
        );
    }
    builder.push(" ORDER BY created_at DESC, id DESC LIMIT 1");
    trace!("🔍️ Executing query: {}", builder.sql());
    let id = builder.build_query_scalar().fetch_optional(conn).await?;
    trace!("🔍️ Amount+window match for {amount}: {id:?}");
    Ok(id)
}
