use chrono::Utc;
use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::*;

use super::from_row::{ATTENDEE_COLS, REGISTRATION_COLS, query_all, query_one};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

// ============ Attendees ============

/// Insert a new attendee with no registrations yet.
pub fn create_attendee(conn: &Connection, input: &AttendeePayload) -> Result<Attendee> {
    let id = gen_id();
    let now = now();
    let email = input.email.trim().to_lowercase();
    let telegram = input
        .telegram
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO attendees (id, email, first_name, last_name, phone, telegram, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            &id,
            &email,
            &input.full_name.first_name,
            &input.full_name.last_name,
            &input.phone_number,
            &telegram,
            now,
            now
        ],
    )?;

    Ok(Attendee {
        id,
        full_name: input.full_name.clone(),
        email,
        phone_number: input.phone_number.clone(),
        telegram: input.telegram.clone(),
        conferences: Vec::new(),
        created_at: now,
        updated_at: now,
    })
}

/// Overwrite the contact fields of an existing attendee with a fresh
/// submission. The email (natural key) never changes here.
fn update_attendee_identity(conn: &Connection, id: &str, input: &AttendeePayload) -> Result<()> {
    let telegram = input
        .telegram
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "UPDATE attendees SET first_name = ?2, last_name = ?3, phone = ?4, telegram = ?5, updated_at = ?6
         WHERE id = ?1",
        params![
            id,
            &input.full_name.first_name,
            &input.full_name.last_name,
            &input.phone_number,
            &telegram,
            now()
        ],
    )?;
    Ok(())
}

pub fn get_attendee_by_id(conn: &Connection, id: &str) -> Result<Option<Attendee>> {
    let attendee: Option<Attendee> = query_one(
        conn,
        &format!("SELECT {} FROM attendees WHERE id = ?1", ATTENDEE_COLS),
        &[&id],
    )?;
    attendee.map(|a| with_registrations(conn, a)).transpose()
}

pub fn get_attendee_by_email(conn: &Connection, email: &str) -> Result<Option<Attendee>> {
    let email = email.trim().to_lowercase();
    let attendee: Option<Attendee> = query_one(
        conn,
        &format!("SELECT {} FROM attendees WHERE email = ?1", ATTENDEE_COLS),
        &[&email],
    )?;
    attendee.map(|a| with_registrations(conn, a)).transpose()
}

pub fn list_attendees(conn: &Connection) -> Result<Vec<Attendee>> {
    let attendees: Vec<Attendee> = query_all(
        conn,
        &format!(
            "SELECT {} FROM attendees ORDER BY created_at DESC",
            ATTENDEE_COLS
        ),
        &[],
    )?;
    attendees
        .into_iter()
        .map(|a| with_registrations(conn, a))
        .collect()
}

fn with_registrations(conn: &Connection, mut attendee: Attendee) -> Result<Attendee> {
    attendee.conferences = load_registrations(conn, &attendee.id)?;
    Ok(attendee)
}

fn load_registrations(conn: &Connection, attendee_id: &str) -> Result<Vec<Registration>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM registrations WHERE attendee_id = ?1 ORDER BY position",
            REGISTRATION_COLS
        ),
        &[&attendee_id],
    )
}

// ============ Registrations ============

/// Append a registration to the end of an attendee's conference list.
pub fn append_registration(
    conn: &Connection,
    attendee_id: &str,
    request: &RegistrationRequest,
) -> Result<Registration> {
    let id = gen_id();
    let now = now();
    let position: i64 = conn.query_row(
        "SELECT COUNT(*) FROM registrations WHERE attendee_id = ?1",
        [attendee_id],
        |row| row.get(0),
    )?;
    let promo_code = request
        .promo_code
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(str::to_string);
    let utm_marks = serde_json::to_string(&request.utm_marks)?;

    conn.execute(
        "INSERT INTO registrations (id, attendee_id, conference, attendance_type, ticket_type,
            tickets_quantity, total_amount, take_brunch, promo_code, utm_marks,
            payment_status, position, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            &id,
            attendee_id,
            &request.conference,
            &request.attendance_type,
            &request.ticket_type,
            request.tickets_quantity,
            request.total_amount,
            request.take_brunch,
            &promo_code,
            &utm_marks,
            PaymentStatus::Pending.as_str(),
            position,
            now,
            now
        ],
    )?;

    Ok(Registration {
        id,
        conference: request.conference.clone(),
        attendance_type: request.attendance_type.clone(),
        ticket_type: request.ticket_type.clone(),
        tickets_quantity: request.tickets_quantity,
        total_amount: request.total_amount,
        take_brunch: request.take_brunch,
        promo_code,
        utm_marks: request.utm_marks.clone(),
        payment_data: PaymentData {
            invoice_id: None,
            status: PaymentStatus::Pending,
        },
    })
}

/// Find-or-create an attendee by email and locate-or-append the registration
/// for the requested conference.
///
/// Returns the full attendee document and the index of the relevant entry in
/// its `conferences` list. Only the first requested conference is processed;
/// additional entries are ignored.
pub fn upsert_attendee(
    conn: &Connection,
    user: &AttendeePayload,
    requests: &[RegistrationRequest],
) -> Result<(Attendee, usize)> {
    user.validate()?;
    let request = requests.first().ok_or_else(|| {
        AppError::BadRequest("At least one conference registration is required".into())
    })?;
    request.validate()?;

    let email = user.email.trim().to_lowercase();
    let attendee = match get_attendee_by_email(conn, &email)? {
        Some(existing) => {
            update_attendee_identity(conn, &existing.id, user)?;
            existing
        }
        None => create_attendee(conn, user)?,
    };

    let index = match attendee
        .conferences
        .iter()
        .position(|r| r.conference == request.conference)
    {
        Some(existing) => existing,
        None => {
            append_registration(conn, &attendee.id, request)?;
            attendee.conferences.len()
        }
    };

    let attendee = get_attendee_by_id(conn, &attendee.id)?
        .ok_or_else(|| AppError::Internal("Attendee vanished during upsert".into()))?;
    Ok((attendee, index))
}

pub fn find_registration_by_invoice(
    conn: &Connection,
    invoice_id: &str,
) -> Result<Option<Registration>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM registrations WHERE invoice_id = ?1",
            REGISTRATION_COLS
        ),
        &[&invoice_id],
    )
}

/// Record the provider-assigned invoice id on a registration, resetting its
/// payment status to pending. The unique index on invoice_id guarantees one
/// registration per invoice across the whole store.
pub fn attach_invoice(conn: &Connection, registration_id: &str, invoice_id: &str) -> Result<()> {
    let affected = conn.execute(
        "UPDATE registrations SET invoice_id = ?2, payment_status = ?3, updated_at = ?4
         WHERE id = ?1",
        params![
            registration_id,
            invoice_id,
            PaymentStatus::Pending.as_str(),
            now()
        ],
    )?;
    if affected == 0 {
        return Err(AppError::NotFound("Registration not found".into()));
    }
    Ok(())
}

/// Targeted conditional status update keyed by invoice id. Only a pending
/// registration may change; terminal statuses stay put, which makes repeated
/// or out-of-order callbacks harmless.
///
/// Returns whether a row was actually updated.
pub fn set_payment_status(
    conn: &Connection,
    invoice_id: &str,
    status: PaymentStatus,
) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE registrations SET payment_status = ?2, updated_at = ?3
         WHERE invoice_id = ?1 AND payment_status = ?4",
        params![
            invoice_id,
            status.as_str(),
            now(),
            PaymentStatus::Pending.as_str()
        ],
    )?;
    Ok(affected > 0)
}
