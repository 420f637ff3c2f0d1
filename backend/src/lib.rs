//! Messaging read side for Misiones Arrienda.
//!
//! Serves the unread message badge, the notification inbox and notification
//! preferences over HTTP. The crate follows a hexagonal layout: [`domain`]
//! holds types, services and ports, [`inbound`] adapts HTTP requests onto
//! driving ports and [`outbound`] implements driven ports against
//! PostgreSQL.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
