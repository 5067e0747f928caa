use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Payment lifecycle of a registration.
///
/// Transitions are monotonic: `pending` may move to `paid` or `failed`;
/// both of those are terminal. A late or duplicate callback can never
/// regress a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }

    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        self == PaymentStatus::Pending || self == next
    }

    /// Map the provider's status vocabulary to ours, case-insensitively.
    /// Anything unrecognized counts as a failure.
    pub fn from_provider(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "success" => PaymentStatus::Paid,
            "pending" => PaymentStatus::Pending,
            _ => PaymentStatus::Failed,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(()),
        }
    }
}

/// Payment reference carried by a registration. The invoice id is assigned
/// by the provider right after invoice creation; until then it is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub invoice_id: Option<String>,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtmMark {
    pub source: String,
    pub medium: String,
    pub campaign: String,
}

/// One conference signup embedded in an attendee record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub conference: String,
    #[serde(rename = "type")]
    pub attendance_type: String,
    pub ticket_type: String,
    pub tickets_quantity: u32,
    /// Ticket total in minor currency units (kopecks).
    pub total_amount: i64,
    pub take_brunch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub utm_marks: Vec<UtmMark>,
    pub payment_data: PaymentData,
}

fn default_attendance_type() -> String {
    "offline".to_string()
}

fn default_ticket_type() -> String {
    "standard".to_string()
}

fn default_quantity() -> u32 {
    1
}

/// A requested conference signup as submitted by the form. Any
/// client-supplied `paymentData` is ignored - payment state is owned here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub conference: String,
    #[serde(rename = "type", default = "default_attendance_type")]
    pub attendance_type: String,
    #[serde(default = "default_ticket_type")]
    pub ticket_type: String,
    #[serde(default = "default_quantity")]
    pub tickets_quantity: u32,
    pub total_amount: i64,
    #[serde(default)]
    pub take_brunch: bool,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub utm_marks: Vec<UtmMark>,
}

impl RegistrationRequest {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.conference.trim().is_empty() {
            return Err(crate::error::AppError::BadRequest(
                "Conference name is required".into(),
            ));
        }
        Ok(())
    }
}
