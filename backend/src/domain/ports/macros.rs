//! `define_port_error!` builds the error enum for an outbound port.
//!
//! Every variant carries named fields and gets a snake_case constructor whose
//! parameters take `impl Into<FieldType>`, so adapters can write
//! `NotificationRepositoryError::query(err.to_string())` or pass a `&str`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),+ },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::domain::ports::{
        CommunityUnreadSourceError, NotificationPreferencesRepositoryError,
        NotificationRepositoryError, PropertyUnreadRepositoryError,
    };

    #[rstest]
    fn constructors_accept_borrowed_and_owned_messages() {
        let borrowed = CommunityUnreadSourceError::query("relation \"messages\" does not exist");
        let owned = CommunityUnreadSourceError::query(String::from(
            "relation \"messages\" does not exist",
        ));
        assert_eq!(borrowed, owned);
        assert_eq!(
            borrowed,
            CommunityUnreadSourceError::Query {
                message: "relation \"messages\" does not exist".to_owned(),
            }
        );
    }

    #[rstest]
    #[case(
        NotificationRepositoryError::corrupt("unknown type PROPERTY_VIEWED").to_string(),
        "notification row is malformed: unknown type PROPERTY_VIEWED"
    )]
    #[case(
        PropertyUnreadRepositoryError::connection("pool timed out").to_string(),
        "property unread repository connection failed: pool timed out"
    )]
    #[case(
        NotificationPreferencesRepositoryError::query("deadlock").to_string(),
        "notification preferences query failed: deadlock"
    )]
    fn messages_name_the_port_and_the_cause(#[case] rendered: String, #[case] expected: &str) {
        assert_eq!(rendered, expected);
    }

    #[rstest]
    fn variants_of_one_port_stay_distinct() {
        assert_ne!(
            NotificationRepositoryError::query("boom"),
            NotificationRepositoryError::connection("boom")
        );
    }
}
