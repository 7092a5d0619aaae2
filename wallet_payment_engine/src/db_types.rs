use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use wpg_common::Rupees;

//--------------------------------------     WalletKind      ---------------------------------------------------------
/// The payment channel a transfer was made through. Unrecognised channels are kept as `Unknown` rather than being
/// rejected, since the claimed TID is what reconciliation actually keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase", from = "String")]
pub enum WalletKind {
    JazzCash,
    EasyPaisa,
    Bank,
    Unknown,
}

impl Display for WalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletKind::JazzCash => write!(f, "jazzcash"),
            WalletKind::EasyPaisa => write!(f, "easypaisa"),
            WalletKind::Bank => write!(f, "bank"),
            WalletKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for WalletKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jazzcash" => Ok(Self::JazzCash),
            "easypaisa" => Ok(Self::EasyPaisa),
            "bank" => Ok(Self::Bank),
            "unknown" => Ok(Self::Unknown),
            s => Err(ConversionError(format!("Unrecognised wallet kind: {s}"))),
        }
    }
}

// Deserialization is deliberately lenient. Callers send the channel in whatever casing their client
// uses, and unrecognised channels become `Unknown` instead of failing the request.
impl From<String> for WalletKind {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(WalletKind::Unknown)
    }
}

//--------------------------------------  SubmissionStatus   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// The submission has been lodged but no incoming payment record has been matched to it yet.
    Pending,
    /// The submission has been reconciled against an incoming payment record and the wallet credited. Terminal.
    Matched,
    /// Set by manual administrative action only. Terminal. The reconciliation path never writes this status.
    Rejected,
}

impl SubmissionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }
}

impl Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Matched => write!(f, "matched"),
            SubmissionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(String);

impl FromStr for SubmissionStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "matched" => Ok(Self::Matched),
            "rejected" => Ok(Self::Rejected),
            s => Err(ConversionError(format!("Invalid submission status: {s}"))),
        }
    }
}

//--------------------------------------     Submission      ---------------------------------------------------------
/// A user's claim that they have made an out-of-band wallet transfer, identified by the transaction id (TID) printed
/// on their payment receipt.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub order_id: Option<i64>,
    pub wallet: WalletKind,
    pub tid: String,
    pub amount: Option<Rupees>,
    pub msisdn: Option<String>,
    pub status: SubmissionStatus,
    pub matched_sms_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// `matched_sms_id` must be present exactly when the status is `matched`.
    pub fn is_consistent(&self) -> bool {
        (self.status == SubmissionStatus::Matched) == self.matched_sms_id.is_some()
    }
}

//--------------------------------------    NewSubmission    ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: i64,
    /// The merchant order this payment is claimed against, if any
    pub order_id: Option<i64>,
    pub wallet: WalletKind,
    /// The claimed transaction id, trimmed of surrounding whitespace
    pub tid: String,
    /// The amount the user claims to have transferred
    pub amount: Option<Rupees>,
    /// The sender phone number in canonical form, if one was supplied
    pub msisdn: Option<String>,
}

impl NewSubmission {
    pub fn new(user_id: i64, wallet: WalletKind, tid: impl Into<String>) -> Self {
        Self { user_id, order_id: None, wallet, tid: tid.into(), amount: None, msisdn: None }
    }

    pub fn with_amount(mut self, amount: Rupees) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_order_id(mut self, order_id: i64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_msisdn(mut self, msisdn: impl Into<String>) -> Self {
        self.msisdn = Some(msisdn.into());
        self
    }
}

//--------------------------------------     SmsPayment      ---------------------------------------------------------
/// A payment confirmation parsed out of a carrier SMS by the external ingestion pipeline. The core only ever reads
/// these rows; they are appended by the collaborator (or by test fixtures standing in for it).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SmsPayment {
    pub id: i64,
    pub device_id: String,
    pub wallet: WalletKind,
    pub raw_text: String,
    pub parsed_tid: Option<String>,
    pub parsed_amount: Option<Rupees>,
    pub currency: String,
    pub sender_msisdn: Option<String>,
    pub tx_time: Option<DateTime<Utc>>,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSmsPayment {
    pub device_id: String,
    pub wallet: WalletKind,
    pub raw_text: String,
    pub parsed_tid: Option<String>,
    pub parsed_amount: Option<Rupees>,
    pub currency: String,
    pub sender_msisdn: Option<String>,
    pub tx_time: Option<DateTime<Utc>>,
    /// Dedup key. When the ingestion pipeline does not supply one, it is derived from the device id and raw text.
    pub content_hash: Option<String>,
}

impl NewSmsPayment {
    pub fn new(device_id: impl Into<String>, wallet: WalletKind, raw_text: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            wallet,
            raw_text: raw_text.into(),
            parsed_tid: None,
            parsed_amount: None,
            currency: wpg_common::PKR_CURRENCY_CODE.to_string(),
            sender_msisdn: None,
            tx_time: None,
            content_hash: None,
        }
    }

    pub fn with_parsed_tid(mut self, tid: impl Into<String>) -> Self {
        self.parsed_tid = Some(tid.into());
        self
    }

    pub fn with_parsed_amount(mut self, amount: Rupees) -> Self {
        self.parsed_amount = Some(amount);
        self
    }

    pub fn with_tx_time(mut self, tx_time: DateTime<Utc>) -> Self {
        self.tx_time = Some(tx_time);
        self
    }

    pub fn with_sender(mut self, msisdn: impl Into<String>) -> Self {
        self.sender_msisdn = Some(msisdn.into());
        self
    }
}

//--------------------------------------     UserWallet      ---------------------------------------------------------
/// A user's internal wallet. The balance is a cached projection of the transaction log and is only ever written
/// transactionally alongside a log append.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserWallet {
    pub user_id: i64,
    pub balance: Rupees,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------  TransactionKind    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Credit => write!(f, "credit"),
        }
    }
}

//-------------------------------------- WalletTransaction   ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: Rupees,
    pub kind: TransactionKind,
    pub reference: Option<String>,
    /// The idempotency anchor. At most one transaction row may carry any given submission id.
    pub submission_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
