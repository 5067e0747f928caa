use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::{AttendeePayload, RegistrationRequest};
use crate::payments::{CCY_UAH, CreateInvoiceRequest, MerchantPaymInfo};

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub user: AttendeePayload,
    #[serde(default)]
    pub conferences: Vec<RegistrationRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentResponse {
    pub invoice_id: String,
    pub page_url: String,
}

/// POST /create-payment
///
/// Upserts the attendee, creates a provider invoice for the first requested
/// conference, and records the invoice id on the registration. The invoice
/// id is only persisted after the provider call succeeds, so a failed
/// attempt leaves no payment state behind and the client simply resubmits.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Json<CreatePaymentResponse>> {
    let purchase = request.conferences.first().ok_or_else(|| {
        AppError::BadRequest("Missing required fields or invalid format".into())
    })?;
    if purchase.total_amount <= 0 {
        return Err(AppError::BadRequest("Invalid payment amount".into()));
    }

    let conn = state.db.get()?;
    let (attendee, index) =
        queries::upsert_attendee(&conn, &request.user, &request.conferences)?;
    let registration = attendee
        .conferences
        .get(index)
        .ok_or_else(|| AppError::Internal("Upsert returned an out-of-range index".into()))?;

    // Reference embeds the registration id and a timestamp so every payment
    // attempt is distinguishable on the provider side.
    let reference = format!("{}-{}", registration.id, Utc::now().timestamp());

    let invoice = state
        .payments
        .create_invoice(&CreateInvoiceRequest {
            amount: purchase.total_amount,
            ccy: CCY_UAH,
            merchant_paym_info: MerchantPaymInfo {
                reference,
                destination: purchase.conference.clone(),
            },
            redirect_url: state.redirect_url.clone(),
            web_hook_url: state.webhook_url.clone(),
        })
        .await?;

    queries::attach_invoice(&conn, &registration.id, &invoice.invoice_id)?;

    tracing::info!(
        "Created invoice {} for registration {} ({})",
        invoice.invoice_id,
        registration.id,
        attendee.email
    );

    Ok(Json(CreatePaymentResponse {
        invoice_id: invoice.invoice_id,
        page_url: invoice.page_url,
    }))
}
