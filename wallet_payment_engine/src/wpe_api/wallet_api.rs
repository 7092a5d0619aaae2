use wpg_common::Rupees;

use crate::{
    db_types::{UserWallet, WalletTransaction},
    traits::{CreditReference, LedgerError, WalletLedger},
};

/// The `WalletApi` fronts the wallet ledger: balance queries, manual credits, and the admin reset.
///
/// Reconciliation credits do not go through here; they run inside the matching path so that the credit and the
/// status flip stay in the right order. This API is for callers outside that path, primarily the HTTP layer.
#[derive(Debug, Clone)]
pub struct WalletApi<B> {
    db: B,
}

impl<B> WalletApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> WalletApi<B>
where B: WalletLedger
{
    /// The current balance for the user. A user with no wallet row yet reports a zero balance.
    pub async fn balance(&self, user_id: i64) -> Result<Rupees, LedgerError> {
        self.db.balance(user_id).await
    }

    /// Apply a manual credit. The reference is free text recorded against the ledger entry; when it carries a
    /// submission id the credit is idempotent on that id and `Ok(false)` means it was refused (non-positive
    /// amount).
    pub async fn credit(&self, user_id: i64, amount: Rupees, reference: CreditReference) -> Result<bool, LedgerError> {
        self.db.credit_user(user_id, amount, reference).await
    }

    /// Admin operation. Zeroes the balance and returns the wallet as it stands afterwards.
    pub async fn reset(&self, user_id: i64) -> Result<UserWallet, LedgerError> {
        self.db.reset_wallet(user_id).await
    }

    pub async fn transactions(&self, user_id: i64) -> Result<Vec<WalletTransaction>, LedgerError> {
        self.db.transactions_for_user(user_id).await
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
