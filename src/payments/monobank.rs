use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const DEFAULT_API_URL: &str = "https://api.monobank.ua";

/// ISO 4217 numeric code for Ukrainian hryvnia.
pub const CCY_UAH: u32 = 980;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantPaymInfo {
    /// Merchant reference; must be unique per payment attempt.
    pub reference: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// Amount in minor units (kopecks).
    pub amount: i64,
    pub ccy: u32,
    pub merchant_paym_info: MerchantPaymInfo,
    pub redirect_url: String,
    pub web_hook_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_id: String,
    /// Hosted payment page the attendee is sent to.
    pub page_url: String,
}

/// Client for the Monobank merchant acquiring API.
#[derive(Debug, Clone)]
pub struct MonobankClient {
    client: Client,
    token: String,
    api_url: String,
}

impl MonobankClient {
    pub fn new(token: &str) -> Self {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    pub fn with_api_url(token: &str, api_url: &str) -> Self {
        Self {
            client: Client::new(),
            token: token.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create an invoice and return its id plus the hosted payment page URL.
    ///
    /// Invoice creation is not idempotent on the provider side - a retried
    /// call produces a second invoice, so callers must not retry.
    pub async fn create_invoice(&self, request: &CreateInvoiceRequest) -> Result<Invoice> {
        let response = self
            .client
            .post(format!("{}/api/merchant/invoice/create", self.api_url))
            .header("X-Token", &self.token)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Monobank request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Monobank returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Malformed Monobank response: {}", e)))
    }
}
