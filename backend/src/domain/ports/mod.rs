//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Query`, `*Command`, [`LoginService`],
//! [`MessagingSchemaDetector`]) are called by inbound adapters. Driven ports
//! (`*Repository`, `*Probe`, `*Source`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod community_unread_source;
mod login_service;
mod messaging_schema_detector;
mod messaging_schema_probe;
mod notification_preferences_repository;
mod notification_repository;
mod notifications_command;
mod notifications_query;
mod property_unread_repository;
mod unread_count_query;

#[cfg(test)]
pub use community_unread_source::MockCommunityUnreadSource;
pub use community_unread_source::{CommunityUnreadSource, CommunityUnreadSourceError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    DisabledLoginService, FIXTURE_USER_ID, FixtureLoginService, LoginService,
};
pub use messaging_schema_detector::MessagingSchemaDetector;
#[cfg(test)]
pub use messaging_schema_detector::MockMessagingSchemaDetector;
#[cfg(test)]
pub use messaging_schema_probe::MockMessagingSchemaProbe;
pub use messaging_schema_probe::{
    FixtureMessagingSchemaProbe, MessagingSchemaProbe, MessagingSchemaProbeError,
};
#[cfg(test)]
pub use notification_preferences_repository::MockNotificationPreferencesRepository;
pub use notification_preferences_repository::{
    FixtureNotificationPreferencesRepository, NotificationPreferencesRepository,
    NotificationPreferencesRepositoryError,
};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
#[cfg(test)]
pub use notifications_command::MockNotificationsCommand;
pub use notifications_command::{FixtureNotificationsCommand, NotificationsCommand};
#[cfg(test)]
pub use notifications_query::MockNotificationsQuery;
pub use notifications_query::{FixtureNotificationsQuery, NotificationsQuery};
#[cfg(test)]
pub use property_unread_repository::MockPropertyUnreadRepository;
pub use property_unread_repository::{
    FixturePropertyUnreadRepository, PropertyUnreadRepository, PropertyUnreadRepositoryError,
};
#[cfg(test)]
pub use unread_count_query::MockUnreadCountQuery;
pub use unread_count_query::{FixtureUnreadCountQuery, UnreadCountQuery};
