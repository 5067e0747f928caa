mod from_row;
pub mod queries;
mod schema;

pub use schema::init_db;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::payments::MonobankClient;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state constructed once at startup and injected into every
/// handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub payments: MonobankClient,
    /// Where the payment page sends the attendee after checkout.
    pub redirect_url: String,
    /// Where the provider posts payment status callbacks.
    pub webhook_url: String,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    Pool::builder().max_size(10).build(manager)
}
