//! HTTP inbound adapter exposing the messaging and notification endpoints.

pub mod auth;
pub mod cache_control;
pub mod error;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
