//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) should be expressed as futures or asynchronous functions. Async handlers get executed
//! concurrently by worker threads and thus don't block execution.
use actix_web::{get, post, web, HttpResponse, Responder};
use log::*;
use wallet_payment_engine::{
    db_types::NewSubmission,
    traits::CreditReference,
    ReconciliationApi,
    SqliteDatabase,
    WalletApi,
};

use crate::{
    data_objects::{CreditRequest, CreditResult, PaymentSubmissionRequest, PaymentSubmissionResponse, WalletBalanceResult},
    errors::ServerError,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ---------------------------------------------   Payments  ---------------------------------------------------

/// Route handler for the submission intake endpoint
///
/// Lodges a claimed payment and runs the eager exact-TID check. The response reports whether the submission
/// settled immediately (`matched`) or is waiting for its SMS record to arrive (`pending`). A blank TID or a
/// non-positive claimed amount is a 400.
#[post("/payments")]
pub async fn submit_payment(
    body: web::Json<PaymentSubmissionRequest>,
    api: web::Data<ReconciliationApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💻️ POST payment submission for user {} (TID [{}])", request.user_id, request.tid);
    let mut submission = NewSubmission::new(request.user_id, request.wallet, request.tid);
    submission.order_id = request.order_id;
    submission.amount = request.amount;
    submission.msisdn = request.msisdn;
    let receipt = api.submit_payment(submission).await?;
    let result = PaymentSubmissionResponse {
        success: true,
        status: receipt.status,
        submission_id: receipt.submission_id,
    };
    Ok(HttpResponse::Created().json(result))
}

/// Route handler for the status polling endpoint
///
/// Reports the state of the most recent submission for the TID in the path. A still-pending submission is first
/// re-run through the full matching cascade, so polling is what drives lazy reconciliation. 404 when no
/// submission has ever been lodged for the TID.
#[get("/payments/status/{tid}")]
pub async fn payment_status(
    path: web::Path<String>,
    api: web::Data<ReconciliationApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let tid = path.into_inner();
    debug!("💻️ GET payment status for TID [{tid}]");
    let result = api.status_for_tid(&tid).await?;
    Ok(HttpResponse::Ok().json(result))
}

// ----------------------------------------------   Wallet  ----------------------------------------------------

#[get("/wallet/{user_id}")]
pub async fn wallet_balance(
    path: web::Path<i64>,
    api: web::Data<WalletApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    debug!("💻️ GET balance for user {user_id}");
    let balance = api.balance(user_id).await?;
    Ok(HttpResponse::Ok().json(WalletBalanceResult { user_id, balance }))
}

/// Administrative reset. Zeroes the balance (creating the wallet if it does not exist yet) and reports the
/// wallet as it stands afterwards. The transaction history is untouched.
#[post("/wallet/{user_id}/reset")]
pub async fn reset_wallet(
    path: web::Path<i64>,
    api: web::Data<WalletApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    info!("💻️ POST wallet reset for user {user_id}");
    let wallet = api.reset(user_id).await?;
    Ok(HttpResponse::Ok().json(WalletBalanceResult { user_id, balance: wallet.balance }))
}

/// Manual credit endpoint. Rejects non-positive amounts with a 400 before touching the ledger.
#[post("/wallet/{user_id}/credit")]
pub async fn credit_wallet(
    path: web::Path<i64>,
    body: web::Json<CreditRequest>,
    api: web::Data<WalletApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    let request = body.into_inner();
    debug!("💻️ POST credit of {} for user {user_id}", request.amount);
    if !request.amount.is_positive() {
        return Err(ServerError::InvalidRequestBody(format!(
            "The credit amount must be strictly positive, not {}",
            request.amount
        )));
    }
    let reference = CreditReference::new(request.reference.unwrap_or_else(|| "manual credit".to_string()));
    let applied = api.credit(user_id, request.amount, reference).await?;
    if !applied {
        // The ledger refused a credit that passed validation. Should not happen.
        return Err(ServerError::BackendError(format!("The credit for user {user_id} was refused by the ledger")));
    }
    let balance = api.balance(user_id).await?;
    Ok(HttpResponse::Ok().json(CreditResult { success: true, user_id, balance }))
}
