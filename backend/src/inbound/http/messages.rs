//! Message badge handler.
//!
//! ```text
//! GET /api/messages/unread-count
//! ```
//!
//! The badge never blocks the client: a missing session, an unreadable
//! session, or a panic inside the aggregation all answer `{"count":0}` with
//! `200 OK`.

use std::panic::AssertUnwindSafe;

use actix_web::{HttpResponse, get, web};
use futures_util::FutureExt;
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::inbound::http::cache_control::private_no_store_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Unread message badge payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    /// Unread messages across property and community conversations.
    #[schema(example = 5)]
    pub count: u64,
}

/// Count unread messages for the signed-in user.
#[utoipa::path(
    get,
    path = "/api/messages/unread-count",
    description = "Unread messages across both conversation domains. Always 200; \
        anonymous callers and internal failures receive zero.",
    responses(
        (
            status = 200,
            description = "Unread message count",
            headers(("Cache-Control" = String, description = "private, no-store")),
            body = UnreadCountResponse
        )
    ),
    tags = ["messages"],
    operation_id = "getUnreadMessageCount"
)]
#[get("/messages/unread-count")]
pub async fn unread_count(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    let count = match session.optional_user_id() {
        None => {
            debug!("anonymous unread-count request");
            0
        }
        Some(user_id) => {
            let aggregation = async { state.unread.unread_count(&user_id).await };
            match AssertUnwindSafe(aggregation).catch_unwind().await {
                Ok(total) => total.total(),
                Err(_) => {
                    error!("unread aggregation panicked; reporting zero");
                    0
                }
            }
        }
    };

    HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(UnreadCountResponse { count })
}
