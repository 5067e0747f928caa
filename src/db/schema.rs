use rusqlite::Connection;

/// Initialize the database schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Attendees (unified user records, keyed by lowercased email)
        CREATE TABLE IF NOT EXISTS attendees (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            telegram TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_attendees_email ON attendees(email);

        -- Conference registrations, one row per (attendee, conference).
        -- position preserves submission order within an attendee's list.
        CREATE TABLE IF NOT EXISTS registrations (
            id TEXT PRIMARY KEY,
            attendee_id TEXT NOT NULL REFERENCES attendees(id) ON DELETE CASCADE,
            conference TEXT NOT NULL,
            attendance_type TEXT NOT NULL,
            ticket_type TEXT NOT NULL,
            tickets_quantity INTEGER NOT NULL DEFAULT 1,
            total_amount INTEGER NOT NULL,
            take_brunch INTEGER NOT NULL DEFAULT 0,
            promo_code TEXT,
            utm_marks TEXT NOT NULL DEFAULT '[]',
            invoice_id TEXT,
            payment_status TEXT NOT NULL DEFAULT 'pending'
                CHECK (payment_status IN ('pending', 'paid', 'failed')),
            position INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,

            UNIQUE(attendee_id, conference)
        );
        CREATE INDEX IF NOT EXISTS idx_registrations_attendee ON registrations(attendee_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_registrations_invoice
            ON registrations(invoice_id) WHERE invoice_id IS NOT NULL;
        "#,
    )
}
