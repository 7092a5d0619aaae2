use serde::{Deserialize, Serialize};
use wallet_payment_engine::db_types::{SubmissionStatus, WalletKind};
use wpg_common::Rupees;

/// The intake request body. The TID and wallet kind are required; everything else is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSubmissionRequest {
    pub user_id: i64,
    #[serde(default)]
    pub order_id: Option<i64>,
    pub wallet: WalletKind,
    pub tid: String,
    #[serde(default)]
    pub amount: Option<Rupees>,
    #[serde(default)]
    pub msisdn: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSubmissionResponse {
    pub success: bool,
    pub status: SubmissionStatus,
    pub submission_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletBalanceResult {
    pub user_id: i64,
    pub balance: Rupees,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditRequest {
    pub amount: Rupees,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditResult {
    pub success: bool,
    pub user_id: i64,
    pub balance: Rupees,
}
