mod attendees;
mod callback;
mod payment;

pub use attendees::*;
pub use callback::*;
pub use payment::*;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::db::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/create-payment", post(create_payment))
        .route("/payment-callback", post(payment_callback))
        .nest("/api", api_router())
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/unifiedusers",
            post(upsert_unified_user).get(list_unified_users),
        )
        .route("/unifiedusers/{id}", get(get_unified_user))
}
