use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Registration;

/// Basic email format validation.
///
/// Requires exactly one `@`, a non-empty local part, and a domain with at
/// least one interior dot. Deliberately permissive - this is a sanity check,
/// not RFC 5322.
fn validate_email_format(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".into()));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::BadRequest("Invalid email format".into()));
    };

    if local.is_empty() || local.contains(' ') || domain.contains('@') {
        return Err(AppError::BadRequest("Invalid email format".into()));
    }

    if domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(AppError::BadRequest("Invalid email format".into()));
    }

    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullName {
    pub first_name: String,
    pub last_name: String,
}

/// Telegram identity attached to an attendee, including the attribution
/// trail the bot recorded (entry sources and screen transitions).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelegramProfile {
    pub id: String,
    pub user_name: String,
    pub first_name: String,
    pub language_code: String,
    pub phone: String,
    pub is_premium: bool,
    pub source: Vec<String>,
    pub transitions: Vec<String>,
}

/// The canonical attendee record: identity plus every conference
/// registration, each carrying its own payment sub-record.
///
/// The lowercased email is the natural key - repeated submissions with the
/// same email resolve to the same record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: String,
    pub full_name: FullName,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<TelegramProfile>,
    pub conferences: Vec<Registration>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Identity fields submitted by the registration form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeePayload {
    pub full_name: FullName,
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub telegram: Option<TelegramProfile>,
}

impl AttendeePayload {
    pub fn validate(&self) -> Result<()> {
        validate_email_format(&self.email)?;
        if self.full_name.first_name.trim().is_empty()
            || self.full_name.last_name.trim().is_empty()
        {
            return Err(AppError::BadRequest("First and last name are required".into()));
        }
        if self.phone_number.trim().is_empty() {
            return Err(AppError::BadRequest("Phone number is required".into()));
        }
        Ok(())
    }
}
