use actix_web::{http::StatusCode, test, App};
use serde_json::json;
use wpg_common::Rupees;

use super::helpers::{configure, setup_db};
use crate::data_objects::{CreditResult, WalletBalanceResult};

#[actix_web::test]
async fn balance_for_a_new_user_is_zero() {
    let (_dir, db) = setup_db().await;
    let app = test::init_service(App::new().configure(configure(db))).await;
    let req = test::TestRequest::get().uri("/wallet/404").to_request();
    let wallet: WalletBalanceResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(wallet.user_id, 404);
    assert_eq!(wallet.balance, Rupees::from(0));
}

#[actix_web::test]
async fn manual_credits_accumulate() {
    let (_dir, db) = setup_db().await;
    let app = test::init_service(App::new().configure(configure(db))).await;
    let req = test::TestRequest::post().uri("/wallet/7/credit").set_json(json!({"amount": 500})).to_request();
    let result: CreditResult = test::call_and_read_body_json(&app, req).await;
    assert!(result.success);
    assert_eq!(result.balance, Rupees::from(500));

    let req = test::TestRequest::post()
        .uri("/wallet/7/credit")
        .set_json(json!({"amount": 250, "reference": "promo top-up"}))
        .to_request();
    let result: CreditResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(result.balance, Rupees::from(750));
}

#[actix_web::test]
async fn non_positive_credit_is_a_bad_request() {
    let (_dir, db) = setup_db().await;
    let app = test::init_service(App::new().configure(configure(db))).await;
    for amount in [0, -100] {
        let req =
            test::TestRequest::post().uri("/wallet/7/credit").set_json(json!({"amount": amount})).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
    // Nothing landed in the wallet
    let req = test::TestRequest::get().uri("/wallet/7").to_request();
    let wallet: WalletBalanceResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(wallet.balance, Rupees::from(0));
}

#[actix_web::test]
async fn reset_zeroes_the_balance() {
    let (_dir, db) = setup_db().await;
    let app = test::init_service(App::new().configure(configure(db))).await;
    let req = test::TestRequest::post().uri("/wallet/9/credit").set_json(json!({"amount": 800})).to_request();
    let result: CreditResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(result.balance, Rupees::from(800));

    let req = test::TestRequest::post().uri("/wallet/9/reset").to_request();
    let wallet: WalletBalanceResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(wallet.balance, Rupees::from(0));

    let req = test::TestRequest::get().uri("/wallet/9").to_request();
    let wallet: WalletBalanceResult = test::call_and_read_body_json(&app, req).await;
    assert_eq!(wallet.balance, Rupees::from(0));
}

#[actix_web::test]
async fn health_check() {
    let (_dir, db) = setup_db().await;
    let app = test::init_service(App::new().configure(configure(db))).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}
