use actix_web::{http::StatusCode, test, App};
use serde_json::json;
use wallet_payment_engine::{
    db_types::{NewSmsPayment, SubmissionStatus, WalletKind},
    submission_objects::SubmissionStatusResult,
    ReconciliationDatabase,
};
use wpg_common::Rupees;

use super::helpers::{configure, setup_db};
use crate::data_objects::{PaymentSubmissionResponse, WalletBalanceResult};

#[actix_web::test]
async fn submission_without_a_tid_is_a_bad_request() {
    let (_dir, db) = setup_db().await;
    let app = test::init_service(App::new().configure(configure(db))).await;
    let req = test::TestRequest::post()
        .uri("/payments")
        .set_json(json!({"user_id": 1, "wallet": "jazzcash", "tid": "  "}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn submission_with_non_positive_amount_is_a_bad_request() {
    let (_dir, db) = setup_db().await;
    let app = test::init_service(App::new().configure(configure(db))).await;
    let req = test::TestRequest::post()
        .uri("/payments")
        .set_json(json!({"user_id": 1, "wallet": "easypaisa", "tid": "TXN1", "amount": -5}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

/// Clients send the payment channel in whatever casing their UI uses. Intake must accept it and store the
/// canonical lower-case kind, with unrecognised channels landing as `unknown` rather than a 400.
#[actix_web::test]
async fn wallet_kind_is_accepted_in_any_casing_and_stored_lower_case() {
    let (_dir, db) = setup_db().await;
    let app = test::init_service(App::new().configure(configure(db.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/payments")
        .set_json(json!({"user_id": 1, "wallet": "JazzCash", "tid": "TXN-CASED"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let stored = db.fetch_submission_by_tid("TXN-CASED").await.unwrap().unwrap();
    assert_eq!(stored.wallet, WalletKind::JazzCash);

    let req = test::TestRequest::post()
        .uri("/payments")
        .set_json(json!({"user_id": 1, "wallet": "SadaPay", "tid": "TXN-ODD-CHANNEL"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let stored = db.fetch_submission_by_tid("TXN-ODD-CHANNEL").await.unwrap().unwrap();
    assert_eq!(stored.wallet, WalletKind::Unknown);
}

#[actix_web::test]
async fn status_poll_for_an_unknown_tid_is_not_found() {
    let (_dir, db) = setup_db().await;
    let app = test::init_service(App::new().configure(configure(db))).await;
    let req = test::TestRequest::get().uri("/payments/status/NO-SUCH-TID").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn submission_settles_eagerly_when_the_record_already_exists() {
    let (_dir, db) = setup_db().await;
    let sms = NewSmsPayment::new("device-1", WalletKind::JazzCash, "Rs 200 received. TID TXN50")
        .with_parsed_tid("TXN50")
        .with_parsed_amount(Rupees::from(200));
    db.insert_sms_payment(sms).await.unwrap();
    let app = test::init_service(App::new().configure(configure(db))).await;

    let req = test::TestRequest::post()
        .uri("/payments")
        .set_json(json!({"user_id": 8, "wallet": "jazzcash", "tid": "TXN50", "amount": 200}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: PaymentSubmissionResponse = test::read_body_json(res).await;
    assert!(body.success);
    assert_eq!(body.status, SubmissionStatus::Matched);
}

/// The full story: submit before the SMS arrives, poll to pending, ingest the record, poll to matched, and
/// confirm the wallet was credited exactly once no matter how often the status is polled.
#[actix_web::test]
async fn submit_then_poll_until_matched() {
    let (_dir, db) = setup_db().await;
    let app = test::init_service(App::new().configure(configure(db.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/payments")
        .set_json(json!({"user_id": 42, "wallet": "jazzcash", "tid": "TXN999", "amount": 1000}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: PaymentSubmissionResponse = test::read_body_json(res).await;
    assert_eq!(body.status, SubmissionStatus::Pending);

    let req = test::TestRequest::get().uri("/payments/status/TXN999").to_request();
    let status: SubmissionStatusResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status.status, SubmissionStatus::Pending);
    let req = test::TestRequest::get().uri("/wallet/42").to_request();
    let wallet: WalletBalanceResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(wallet.balance, Rupees::from(0));

    let sms = NewSmsPayment::new("device-1", WalletKind::JazzCash, "Rs 1000 received. TID TXN999")
        .with_parsed_tid("TXN999")
        .with_parsed_amount(Rupees::from(1000));
    db.insert_sms_payment(sms).await.unwrap();

    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/payments/status/TXN999").to_request();
        let status: SubmissionStatusResult = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status.status, SubmissionStatus::Matched);
        assert!(status.matched_sms_id.is_some());
    }
    let req = test::TestRequest::get().uri("/wallet/42").to_request();
    let wallet: WalletBalanceResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(wallet.balance, Rupees::from(1000));
}
