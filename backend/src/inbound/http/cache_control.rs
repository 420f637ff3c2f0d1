//! Cache-control policies for HTTP handlers.

use actix_web::http::header::{CACHE_CONTROL, HeaderName};

/// Per-user counters change on every message; never store them.
pub const PRIVATE_NO_STORE: &str = "private, no-store";

/// Per-user documents may be cached by the browser but must be revalidated.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Probes must never be served from a cache.
pub const NO_STORE: &str = "no-store";

/// Header tuple for [`PRIVATE_NO_STORE`].
pub fn private_no_store_header() -> (HeaderName, &'static str) {
    (CACHE_CONTROL, PRIVATE_NO_STORE)
}

/// Header tuple for [`PRIVATE_NO_CACHE_MUST_REVALIDATE`].
pub fn private_no_cache_header() -> (HeaderName, &'static str) {
    (CACHE_CONTROL, PRIVATE_NO_CACHE_MUST_REVALIDATE)
}
