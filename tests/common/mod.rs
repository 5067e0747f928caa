//! Test utilities and fixtures for confreg integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde_json::Value;

pub use confreg::db::{AppState, DbPool, init_db, queries};
pub use confreg::handlers;
pub use confreg::models::*;
pub use confreg::payments::MonobankClient;

/// Pool over a single in-memory connection so every handler sees the same
/// database.
pub fn setup_test_pool() -> DbPool {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("Failed to create test pool");
    {
        let conn = pool.get().expect("Failed to get test connection");
        init_db(&conn).expect("Failed to initialize schema");
    }
    pool
}

pub fn create_test_app_state_with_provider(api_url: &str) -> AppState {
    AppState {
        db: setup_test_pool(),
        payments: MonobankClient::with_api_url("test-token", api_url),
        redirect_url: "http://localhost:3000/thank-you".to_string(),
        webhook_url: "http://localhost:3000/payment-callback".to_string(),
    }
}

/// App state with a provider client pointing at a dead port, so any
/// unexpected outbound call fails fast instead of hitting the network.
pub fn create_test_app_state() -> AppState {
    create_test_app_state_with_provider("http://127.0.0.1:9")
}

pub fn app(state: AppState) -> Router {
    handlers::router().with_state(state)
}

pub fn sample_user(email: &str) -> AttendeePayload {
    AttendeePayload {
        full_name: FullName {
            first_name: "Olha".to_string(),
            last_name: "Marchenko".to_string(),
        },
        email: email.to_string(),
        phone_number: "+380501112233".to_string(),
        telegram: None,
    }
}

pub fn sample_registration(conference: &str, total_amount: i64) -> RegistrationRequest {
    RegistrationRequest {
        conference: conference.to_string(),
        attendance_type: "offline".to_string(),
        ticket_type: "standard".to_string(),
        tickets_quantity: 1,
        total_amount,
        take_brunch: false,
        promo_code: None,
        utm_marks: vec![UtmMark {
            source: "instagram".to_string(),
            medium: "social".to_string(),
            campaign: "spring".to_string(),
        }],
    }
}

/// Upsert an attendee with one registration and attach an invoice id to it,
/// simulating a completed create-payment call.
pub fn seed_registration_with_invoice(
    conn: &rusqlite::Connection,
    email: &str,
    conference: &str,
    invoice_id: &str,
) -> Registration {
    let (attendee, index) = queries::upsert_attendee(
        conn,
        &sample_user(email),
        &[sample_registration(conference, 150_000)],
    )
    .expect("Failed to seed attendee");
    let registration = attendee.conferences[index].clone();
    queries::attach_invoice(conn, &registration.id, invoice_id).expect("Failed to attach invoice");
    registration
}

pub fn count_attendees(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM attendees", [], |row| row.get(0))
        .unwrap()
}

pub fn count_registrations(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM registrations", [], |row| row.get(0))
        .unwrap()
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("Response should be valid JSON")
}

/// Wire-shaped create-payment body matching what the registration form sends.
pub fn payment_body(email: &str, conference: &str, total_amount: i64) -> Value {
    serde_json::json!({
        "user": {
            "fullName": { "firstName": "Olha", "lastName": "Marchenko" },
            "phoneNumber": "+380501112233",
            "email": email,
            "telegram": {
                "id": "",
                "userName": "olha_poetry",
                "firstName": "",
                "languageCode": "uk",
                "phone": "",
                "isPremium": false,
                "source": [],
                "transitions": []
            }
        },
        "conferences": [
            {
                "conference": conference,
                "type": "offline",
                "ticketType": "standard",
                "ticketsQuantity": 1,
                "totalAmount": total_amount,
                "takeBrunch": false,
                "paymentData": { "invoiceId": "", "status": "pending" },
                "promoCode": "",
                "utmMarks": [
                    { "source": "instagram", "medium": "social", "campaign": "spring" }
                ]
            }
        ]
    })
}
