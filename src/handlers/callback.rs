use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::PaymentStatus;

/// Webhook body posted by the provider.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallback {
    #[serde(default)]
    pub invoice_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub message: &'static str,
}

/// POST /payment-callback
///
/// Maps the provider's status vocabulary to ours and applies a monotonic
/// transition to the registration matching the invoice id. Terminal statuses
/// never change, so duplicate and out-of-order callbacks are safe to replay;
/// the provider gets 200 either way.
pub async fn payment_callback(
    State(state): State<AppState>,
    Json(callback): Json<PaymentCallback>,
) -> Result<Json<CallbackResponse>> {
    if callback.invoice_id.is_empty() || callback.status.is_empty() {
        return Err(AppError::BadRequest("Missing invoiceId or status".into()));
    }

    let status = PaymentStatus::from_provider(&callback.status);

    let conn = state.db.get()?;
    let registration = queries::find_registration_by_invoice(&conn, &callback.invoice_id)?
        .ok_or_else(|| AppError::NotFound("Invoice not found".into()))?;

    let updated = queries::set_payment_status(&conn, &callback.invoice_id, status)?;
    if updated {
        tracing::info!(
            "Invoice {} moved to {} (registration {})",
            callback.invoice_id,
            status,
            registration.id
        );
    } else if !registration.payment_data.status.can_transition_to(status) {
        tracing::warn!(
            "Ignoring '{}' callback for invoice {}: status already {}",
            callback.status,
            callback.invoice_id,
            registration.payment_data.status
        );
    }

    Ok(Json(CallbackResponse {
        message: "Payment status updated",
    }))
}
