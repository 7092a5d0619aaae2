use std::sync::{atomic::AtomicI32, Arc};

use futures_util::FutureExt;
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use tokio::runtime::Runtime;
use wallet_payment_engine::{
    db_types::{NewSmsPayment, NewSubmission, SubmissionStatus, WalletKind},
    events::{EventHandlers, EventHooks},
    MatchOptions,
    ReconciliationApi,
    ReconciliationDatabase,
    SqliteDatabase,
};
use wpg_common::Rupees;

use crate::support::prepare_env::{prepare_test_env, random_db_path};

mod support;

async fn setup(handlers: &EventHandlers) -> ReconciliationApi<SqliteDatabase> {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    ReconciliationApi::new(db, handlers.producers(), MatchOptions::default())
}

async fn tear_down(mut api: ReconciliationApi<SqliteDatabase>) {
    let url = api.db().url().to_string();
    if let Err(e) = api.db_mut().close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    Sqlite::drop_database(&url).await.unwrap();
}

#[derive(Default, Clone)]
struct HookCalled {
    called: Arc<AtomicI32>,
}

impl HookCalled {
    pub fn called(&self) {
        let _ = self.called.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn count(&self) -> i32 {
        self.called.load(std::sync::atomic::Ordering::Relaxed)
    }
}

#[test]
fn on_submission_matched() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let rt = Runtime::new().unwrap();
    let event = HookCalled::default();
    let event_copy = event.clone();
    rt.block_on(async move {
        let mut hooks = EventHooks::default();
        hooks.on_submission_matched(move |ev| {
            info!("🪝️ {:?}", ev.submission);
            event_copy.called();
            async {}.boxed()
        });
        let handlers = EventHandlers::new(10, hooks);
        let api = setup(&handlers).await;
        let join = tokio::spawn(handlers.start_handlers());

        // One eager match at intake, one lazy match on a status poll
        let sms = NewSmsPayment::new("device-1", WalletKind::JazzCash, "TID TXN1").with_parsed_tid("TXN1");
        api.db().insert_sms_payment(sms).await.unwrap();
        let receipt = api
            .submit_payment(NewSubmission::new(1, WalletKind::JazzCash, "TXN1").with_amount(Rupees::from(100)))
            .await
            .unwrap();
        assert_eq!(receipt.status, SubmissionStatus::Matched);

        let receipt = api
            .submit_payment(NewSubmission::new(2, WalletKind::JazzCash, "TXN2").with_amount(Rupees::from(100)))
            .await
            .unwrap();
        assert_eq!(receipt.status, SubmissionStatus::Pending);
        let sms = NewSmsPayment::new("device-1", WalletKind::JazzCash, "TID TXN2").with_parsed_tid("TXN2");
        api.db().insert_sms_payment(sms).await.unwrap();
        let result = api.status_for_tid("TXN2").await.unwrap();
        assert_eq!(result.status, SubmissionStatus::Matched);

        tear_down(api).await;
        join.await.unwrap();
    });
    assert_eq!(event.count(), 2);
    info!("🪝️ test complete");
}

#[test]
fn on_submission_rejected() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let rt = Runtime::new().unwrap();
    let event = HookCalled::default();
    let event_copy = event.clone();
    rt.block_on(async move {
        let mut hooks = EventHooks::default();
        hooks.on_submission_rejected(move |ev| {
            info!("🪝️ {:?}", ev.submission);
            event_copy.called();
            async {}.boxed()
        });
        let handlers = EventHandlers::new(10, hooks);
        let api = setup(&handlers).await;
        let join = tokio::spawn(handlers.start_handlers());

        let receipt = api
            .submit_payment(NewSubmission::new(3, WalletKind::Bank, "TXN3").with_amount(Rupees::from(100)))
            .await
            .unwrap();
        let rejected = api.reject_submission(receipt.submission_id).await.unwrap();
        assert_eq!(rejected.status, SubmissionStatus::Rejected);

        tear_down(api).await;
        join.await.unwrap();
    });
    assert_eq!(event.count(), 1);
    info!("🪝️ test complete");
}
