//! OpenAPI documentation for the messaging API.
//!
//! [`ApiDoc`] registers every handler under `inbound::http` together with the
//! schema wrappers from [`crate::inbound::http::schemas`]. Swagger UI serves it
//! in debug builds and `openapi-dump` prints it for client generation.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, NotificationPreferencesPatchSchema,
    NotificationPreferencesSchema, NotificationSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the messaging API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Misiones Arrienda messaging API",
        description = "Unread message badge, notification inbox and notification preferences."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::messages::unread_count,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::create_notification,
        crate::inbound::http::notifications::unread_notification_count,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::get_preferences,
        crate::inbound::http::notifications::update_preferences,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        NotificationSchema,
        NotificationPreferencesSchema,
        NotificationPreferencesPatchSchema,
    )),
    tags(
        (name = "auth", description = "Session bootstrap"),
        (name = "messages", description = "Unread message badge"),
        (name = "notifications", description = "Notification inbox and preferences"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("crate.domain.Error", "traceId")]
    #[case("crate.domain.Notification", "type")]
    #[case("crate.domain.NotificationPreferences", "pushEnabled")]
    fn registered_schemas_use_wire_names(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/api/messages/unread-count")]
    #[case("/api/notifications")]
    #[case("/api/notifications/{id}/read")]
    #[case("/api/notifications/preferences")]
    #[case("/api/auth/login")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn notification_creation_is_documented_as_post() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/notifications").expect("path");
        assert!(item.get.is_some());
        assert!(item.post.is_some());
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
