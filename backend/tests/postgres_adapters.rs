//! Diesel adapters against a live PostgreSQL instance.
//!
//! Set `ARRIENDA_TEST_DATABASE_URL` to run these; without it every test
//! returns early. The notification migration is applied idempotently and
//! rows are keyed by fresh user ids, so a shared database is fine.

use chrono::{TimeDelta, TimeZone, Utc};
use diesel::sql_types::{Text, Uuid as SqlUuid};
use diesel_async::{RunQueryDsl, SimpleAsyncConnection};
use rstest::rstest;

use arrienda_backend::domain::ports::{
    MessagingSchemaProbe, NotificationPreferencesRepository, NotificationRepository,
};
use arrienda_backend::domain::{
    Notification, NotificationChannel, NotificationId, NotificationListQuery,
    NotificationPreferences, NotificationType, UserId,
};
use arrienda_backend::outbound::persistence::{
    DbPool, DieselNotificationPreferencesRepository, DieselNotificationRepository, PoolConfig,
    PostgresMessagingSchemaProbe,
};

const DATABASE_URL_VAR: &str = "ARRIENDA_TEST_DATABASE_URL";
const MIGRATION: &str =
    include_str!("../migrations/2026-01-15-000000_create_notifications/up.sql");

async fn pool() -> Option<DbPool> {
    let Ok(url) = std::env::var(DATABASE_URL_VAR) else {
        eprintln!("{DATABASE_URL_VAR} unset; skipping");
        return None;
    };
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(2))
        .await
        .expect("pool builds");
    let mut conn = pool.get().await.expect("connection");
    conn.batch_execute(MIGRATION).await.expect("migration applies");
    drop(conn);
    Some(pool)
}

fn notification(user: &UserId, minutes: i64) -> Notification {
    let base = Utc
        .with_ymd_and_hms(2026, 7, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    Notification {
        id: NotificationId::random(),
        user_id: user.clone(),
        kind: NotificationType::NewMessage,
        title: format!("Mensaje {minutes}"),
        message: "Hola".to_owned(),
        channels: vec![NotificationChannel::InApp],
        metadata: Some(serde_json::json!({ "conversationId": "c-9" })),
        related_id: Some("c-9".to_owned()),
        related_type: Some("message".to_owned()),
        read: false,
        read_at: None,
        created_at: base + TimeDelta::minutes(minutes),
    }
}

#[rstest]
#[tokio::test]
async fn notifications_round_trip_and_mark_read() {
    let Some(pool) = pool().await else { return };
    let repo = DieselNotificationRepository::new(pool);
    let user = UserId::random();
    let older = notification(&user, 0);
    let newer = notification(&user, 5);
    repo.insert(&older).await.expect("insert older");
    repo.insert(&newer).await.expect("insert newer");

    let query = NotificationListQuery::new(false, None, None).expect("defaults");
    let listed = repo.list(&user, &query).await.expect("list");
    assert_eq!(listed.as_slice().first().map(|n| n.id), Some(newer.id));
    assert_eq!(listed.get(1), Some(&older));
    assert_eq!(repo.count_unread(&user).await.expect("count"), 2);

    let read_at = Utc::now();
    assert!(repo.mark_read(&user, &older.id, read_at).await.expect("mark"));
    assert!(repo.mark_read(&user, &older.id, read_at).await.expect("repeat"));
    assert!(
        !repo
            .mark_read(&UserId::random(), &newer.id, read_at)
            .await
            .expect("foreign")
    );
    assert_eq!(repo.mark_all_read(&user, read_at).await.expect("all"), 1);
    assert_eq!(repo.count_unread(&user).await.expect("count"), 0);
}

#[rstest]
#[tokio::test]
async fn preferences_are_created_once_and_saved() {
    let Some(pool) = pool().await else { return };
    let repo = DieselNotificationPreferencesRepository::new(pool);
    let user = UserId::random();
    let now = Utc::now();

    assert!(repo.find(&user).await.expect("find").is_none());
    let mut first = repo
        .insert_if_absent(&NotificationPreferences::new_default(user.clone(), now))
        .await
        .expect("insert");
    let mut competing = NotificationPreferences::new_default(user.clone(), now);
    competing.newsletter = true;
    let second = repo.insert_if_absent(&competing).await.expect("reinsert");
    assert!(!second.newsletter);

    first.push_enabled = true;
    repo.save(&first).await.expect("save");
    let stored = repo.find(&user).await.expect("find").expect("row");
    assert!(stored.push_enabled);
}

#[rstest]
#[tokio::test]
async fn probe_sees_owned_tables_and_not_absent_ones() {
    let Some(pool) = pool().await else { return };
    let probe = PostgresMessagingSchemaProbe::new(pool);

    let columns = probe
        .table_columns("notifications")
        .await
        .expect("probe")
        .expect("table exists");
    assert!(columns.iter().any(|c| c == "read_at"));
    assert!(
        probe
            .table_columns("no_such_table_for_probe")
            .await
            .expect("probe")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn repeated_mark_read_keeps_the_first_timestamp() {
    let Some(pool) = pool().await else { return };
    let repo = DieselNotificationRepository::new(pool);
    let user = UserId::random();
    let row = notification(&user, 0);
    repo.insert(&row).await.expect("insert");

    let first = Utc
        .with_ymd_and_hms(2026, 7, 2, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let later = first + TimeDelta::hours(3);
    assert!(repo.mark_read(&user, &row.id, first).await.expect("mark"));
    assert!(repo.mark_read(&user, &row.id, later).await.expect("repeat"));

    let query = NotificationListQuery::new(false, None, None).expect("defaults");
    let stored = repo.list(&user, &query).await.expect("list");
    assert_eq!(stored.as_slice().first().and_then(|n| n.read_at), Some(first));
}

#[rstest]
#[tokio::test]
async fn rows_with_unknown_types_do_not_hide_the_inbox() {
    let Some(pool) = pool().await else { return };
    let user = UserId::random();
    let known = notification(&user, 0);
    {
        let mut conn = pool.get().await.expect("connection");
        diesel::sql_query(concat!(
            "INSERT INTO notifications (id, user_id, type, title, message, channels) ",
            "VALUES ($1, $2, $3, 'Visita', 'Alguien vio tu aviso', '[\"in_app\"]')",
        ))
        .bind::<SqlUuid, _>(*NotificationId::random().as_uuid())
        .bind::<SqlUuid, _>(*user.as_uuid())
        .bind::<Text, _>("PROPERTY_VIEWED")
        .execute(&mut conn)
        .await
        .expect("raw insert");
    }
    let repo = DieselNotificationRepository::new(pool);
    repo.insert(&known).await.expect("insert");

    let query = NotificationListQuery::new(false, None, None).expect("defaults");
    let listed = repo.list(&user, &query).await.expect("list survives");

    assert_eq!(listed, vec![known]);
    assert_eq!(repo.count_unread(&user).await.expect("count"), 2);
}
