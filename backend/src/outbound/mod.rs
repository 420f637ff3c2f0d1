//! Outbound adapters implementing the driven domain ports.
//!
//! Adapters translate between domain values and PostgreSQL rows and contain
//! no business logic.

pub mod persistence;
