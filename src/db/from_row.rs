//! Row mapping trait and helpers for reducing boilerplate in queries.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};
use serde::de::DeserializeOwned;

use crate::models::*;

/// Parse a string column into an enum type, converting parse errors to
/// rusqlite errors instead of panicking on corrupt data.
fn parse_enum<T: std::str::FromStr>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    row.get::<_, String>(col)?.parse::<T>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

/// Parse a JSON text column.
fn parse_json<T: DeserializeOwned>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    let raw: String = row.get(col)?;
    serde_json::from_str(&raw).map_err(|_| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

/// Parse a nullable JSON text column.
fn parse_json_opt<T: DeserializeOwned>(
    row: &Row,
    col: usize,
    col_name: &str,
) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(col)?;
    raw.map(|s| {
        serde_json::from_str(&s).map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                col,
                col_name.to_string(),
                rusqlite::types::Type::Text,
            )
        })
    })
    .transpose()
}

/// Trait for constructing a type from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ SQL SELECT Constants ============

pub const ATTENDEE_COLS: &str =
    "id, email, first_name, last_name, phone, telegram, created_at, updated_at";

pub const REGISTRATION_COLS: &str = "id, conference, attendance_type, ticket_type, tickets_quantity, total_amount, take_brunch, promo_code, utm_marks, invoice_id, payment_status";

// ============ FromRow Implementations ============

impl FromRow for Attendee {
    /// Registrations live in their own table; callers compose them in
    /// afterwards, so the list starts empty here.
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Attendee {
            id: row.get(0)?,
            email: row.get(1)?,
            full_name: FullName {
                first_name: row.get(2)?,
                last_name: row.get(3)?,
            },
            phone_number: row.get(4)?,
            telegram: parse_json_opt(row, 5, "telegram")?,
            conferences: Vec::new(),
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

impl FromRow for Registration {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Registration {
            id: row.get(0)?,
            conference: row.get(1)?,
            attendance_type: row.get(2)?,
            ticket_type: row.get(3)?,
            tickets_quantity: row.get(4)?,
            total_amount: row.get(5)?,
            take_brunch: row.get(6)?,
            promo_code: row.get(7)?,
            utm_marks: parse_json(row, 8, "utm_marks")?,
            payment_data: PaymentData {
                invoice_id: row.get(9)?,
                status: parse_enum(row, 10, "payment_status")?,
            },
        })
    }
}
