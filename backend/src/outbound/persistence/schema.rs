//! Diesel table definitions for the tables this service owns.
//!
//! Conversation and message tables belong to the property and community
//! applications and vary between deployments, so they are queried through
//! `sql_query` instead of being declared here. These two definitions must
//! match `backend/migrations`.

diesel::table! {
    /// Per-user notification inbox.
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        /// SCREAMING_SNAKE_CASE notification type.
        #[sql_name = "type"]
        kind -> Text,
        title -> Text,
        message -> Text,
        /// JSON array of channel codes.
        channels -> Text,
        /// JSON object supplied by the sender.
        metadata -> Nullable<Text>,
        related_id -> Nullable<Text>,
        related_type -> Nullable<Text>,
        read -> Bool,
        read_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row of channel and category toggles per user.
    notification_preferences (user_id) {
        user_id -> Uuid,
        email_enabled -> Bool,
        in_app_enabled -> Bool,
        push_enabled -> Bool,
        new_messages -> Bool,
        message_replies -> Bool,
        property_inquiries -> Bool,
        property_status_change -> Bool,
        property_expiring -> Bool,
        favorites_updates -> Bool,
        new_properties_in_area -> Bool,
        likes_received -> Bool,
        new_followers -> Bool,
        payment_completed -> Bool,
        plan_expiring -> Bool,
        invoice_ready -> Bool,
        system_announcements -> Bool,
        security_alerts -> Bool,
        promotional_emails -> Bool,
        newsletter -> Bool,
        updated_at -> Timestamptz,
    }
}
