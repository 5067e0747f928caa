use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::models::{Attendee, AttendeePayload, RegistrationRequest};

/// Registration payload as submitted by the form: identity fields plus the
/// requested conference signups.
#[derive(Debug, Deserialize)]
pub struct UpsertRequest {
    pub user: AttendeePayload,
    #[serde(default)]
    pub conferences: Vec<RegistrationRequest>,
}

/// POST /api/unifiedusers
///
/// Find-or-create semantics: repeated submissions with the same email update
/// the existing record instead of creating duplicates. Always responds 201
/// with the resulting document.
pub async fn upsert_unified_user(
    State(state): State<AppState>,
    Json(request): Json<UpsertRequest>,
) -> Result<(StatusCode, Json<Attendee>)> {
    let conn = state.db.get()?;
    let (attendee, _) = queries::upsert_attendee(&conn, &request.user, &request.conferences)?;
    Ok((StatusCode::CREATED, Json(attendee)))
}

/// GET /api/unifiedusers
pub async fn list_unified_users(State(state): State<AppState>) -> Result<Json<Vec<Attendee>>> {
    let conn = state.db.get()?;
    Ok(Json(queries::list_attendees(&conn)?))
}

/// GET /api/unifiedusers/{id}
pub async fn get_unified_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Attendee>> {
    let conn = state.db.get()?;
    let attendee = queries::get_attendee_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Unified user not found".into()))?;
    Ok(Json(attendee))
}
