//! Diesel and pool error mapping shared by the messaging adapters.
//!
//! Every port error in this crate exposes `connection(..)` and `query(..)`
//! constructors; the helpers here take those constructors so each adapter
//! maps failures with one line.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Message fragments PostgreSQL emits for an unknown table or function.
const MISSING_RELATION_MARKERS: [&str; 2] = ["does not exist", "no existe"];

/// Map pool failures to a connection error.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel failures to query or connection errors.
///
/// A missing relation is reported as `relation missing` so callers walking a
/// fallback chain can log something meaningful without leaking SQL.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    if is_missing_relation(&error) {
        return query("relation missing".to_owned());
    }

    match error {
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => query("database query error".to_owned()),
        DieselError::DeserializationError(_) => query("unexpected column type".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error".to_owned())
        }
        _ => query("database error".to_owned()),
    }
}

/// Whether the failure is PostgreSQL rejecting an unknown table or function.
pub(crate) fn is_missing_relation(error: &DieselError) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::Unknown, info) => {
            let message = info.message();
            MISSING_RELATION_MARKERS
                .iter()
                .any(|marker| message.contains(marker))
        }
        _ => false,
    }
}
