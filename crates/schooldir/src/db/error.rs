//! Database error types.

use sea_orm::{DbErr, RuntimeErr};
use thiserror::Error;

/// SQLSTATE codes for "table does not exist" (Postgres, MySQL).
const MISSING_TABLE_CODES: &[&str] = &["42P01", "42S02"];

/// Errors from database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The `schools` table has not been created yet.
    #[error("Table '{table}' does not exist; run migrations first: {source}")]
    MissingTable {
        table: &'static str,
        #[source]
        source: DbErr,
    },

    /// Any other failure: unreachable store, pool exhaustion, query error.
    #[error("Database error: {0}")]
    Orm(#[from] DbErr),

    /// A migration failed to apply.
    #[error("Migration failed: {0}")]
    Migration(#[source] DbErr),
}

impl DatabaseError {
    /// Wraps an ORM error, recognizing a missing `table`.
    pub fn classify(err: DbErr, table: &'static str) -> Self {
        if is_missing_table(&err) {
            DatabaseError::MissingTable { table, source: err }
        } else {
            DatabaseError::Orm(err)
        }
    }

    pub fn is_missing_table(&self) -> bool {
        matches!(self, DatabaseError::MissingTable { .. })
    }
}

fn is_missing_table(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Query(e) | DbErr::Exec(e) => e,
        _ => return false,
    };

    if let RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db_err)) = runtime {
        if let Some(code) = db_err.code() {
            if MISSING_TABLE_CODES.iter().any(|c| *c == code) {
                return true;
            }
        }
        return message_says_missing(db_err.message());
    }

    message_says_missing(&runtime.to_string())
}

/// Driver messages: SQLite "no such table", MySQL "Table 'x' doesn't exist",
/// Postgres "relation \"x\" does not exist".
fn message_says_missing(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("no such table")
        || message.contains("doesn't exist")
        || (message.contains("relation") && message.contains("does not exist"))
}
