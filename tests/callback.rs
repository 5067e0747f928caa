//! Tests for the POST /payment-callback endpoint: provider vocabulary
//! mapping, idempotence, and the monotonic status-transition rule.

use serde_json::json;
use tower::ServiceExt;

mod common;
use common::*;

fn status_of(conn: &rusqlite::Connection, invoice_id: &str) -> PaymentStatus {
    queries::find_registration_by_invoice(conn, invoice_id)
        .unwrap()
        .expect("registration should exist")
        .payment_data
        .status
}

#[tokio::test]
async fn missing_fields_return_400() {
    let state = create_test_app_state();
    let app = app(state);

    for body in [
        json!({}),
        json!({ "invoiceId": "inv-1" }),
        json!({ "status": "success" }),
        json!({ "invoiceId": "", "status": "success" }),
        json!({ "invoiceId": "inv-1", "status": "" }),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("/payment-callback", &body))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            axum::http::StatusCode::BAD_REQUEST,
            "body {body} should be rejected"
        );
    }
}

#[tokio::test]
async fn unknown_invoice_returns_404_and_store_is_unmodified() {
    let state = create_test_app_state();
    let pool = state.db.clone();
    {
        let conn = pool.get().unwrap();
        seed_registration_with_invoice(&conn, "olha@example.com", "Bedtime poetry", "inv-1");
    }
    let app = app(state);

    let response = app
        .oneshot(json_request(
            "/payment-callback",
            &json!({ "invoiceId": "inv-unknown", "status": "success" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);

    let conn = pool.get().unwrap();
    assert_eq!(status_of(&conn, "inv-1"), PaymentStatus::Pending);
}

#[tokio::test]
async fn success_callback_marks_registration_paid() {
    let state = create_test_app_state();
    let pool = state.db.clone();
    {
        let conn = pool.get().unwrap();
        seed_registration_with_invoice(&conn, "olha@example.com", "Bedtime poetry", "inv-1");
    }
    let app = app(state);

    let response = app
        .oneshot(json_request(
            "/payment-callback",
            &json!({ "invoiceId": "inv-1", "status": "success" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let conn = pool.get().unwrap();
    assert_eq!(status_of(&conn, "inv-1"), PaymentStatus::Paid);
}

#[tokio::test]
async fn repeated_success_callback_is_idempotent() {
    let state = create_test_app_state();
    let pool = state.db.clone();
    {
        let conn = pool.get().unwrap();
        seed_registration_with_invoice(&conn, "olha@example.com", "Bedtime poetry", "inv-1");
    }
    let app = app(state);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request(
                "/payment-callback",
                &json!({ "invoiceId": "inv-1", "status": "success" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    let conn = pool.get().unwrap();
    assert_eq!(status_of(&conn, "inv-1"), PaymentStatus::Paid);
}

#[tokio::test]
async fn late_pending_callback_does_not_regress_paid_status() {
    let state = create_test_app_state();
    let pool = state.db.clone();
    {
        let conn = pool.get().unwrap();
        seed_registration_with_invoice(&conn, "olha@example.com", "Bedtime poetry", "inv-1");
    }
    let app = app(state);

    for status in ["success", "pending"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "/payment-callback",
                &json!({ "invoiceId": "inv-1", "status": status }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    let conn = pool.get().unwrap();
    assert_eq!(status_of(&conn, "inv-1"), PaymentStatus::Paid);
}

#[tokio::test]
async fn failed_status_is_terminal_too() {
    let state = create_test_app_state();
    let pool = state.db.clone();
    {
        let conn = pool.get().unwrap();
        seed_registration_with_invoice(&conn, "olha@example.com", "Bedtime poetry", "inv-1");
    }
    let app = app(state);

    for status in ["failure", "success"] {
        app.clone()
            .oneshot(json_request(
                "/payment-callback",
                &json!({ "invoiceId": "inv-1", "status": status }),
            ))
            .await
            .unwrap();
    }

    let conn = pool.get().unwrap();
    assert_eq!(status_of(&conn, "inv-1"), PaymentStatus::Failed);
}

#[tokio::test]
async fn unrecognized_provider_status_maps_to_failed() {
    let state = create_test_app_state();
    let pool = state.db.clone();
    {
        let conn = pool.get().unwrap();
        seed_registration_with_invoice(&conn, "olha@example.com", "Bedtime poetry", "inv-1");
    }
    let app = app(state);

    let response = app
        .oneshot(json_request(
            "/payment-callback",
            &json!({ "invoiceId": "inv-1", "status": "reversed" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let conn = pool.get().unwrap();
    assert_eq!(status_of(&conn, "inv-1"), PaymentStatus::Failed);
}

#[tokio::test]
async fn provider_status_is_matched_case_insensitively() {
    let state = create_test_app_state();
    let pool = state.db.clone();
    {
        let conn = pool.get().unwrap();
        seed_registration_with_invoice(&conn, "olha@example.com", "Bedtime poetry", "inv-1");
    }
    let app = app(state);

    let response = app
        .oneshot(json_request(
            "/payment-callback",
            &json!({ "invoiceId": "inv-1", "status": "SUCCESS" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let conn = pool.get().unwrap();
    assert_eq!(status_of(&conn, "inv-1"), PaymentStatus::Paid);
}
