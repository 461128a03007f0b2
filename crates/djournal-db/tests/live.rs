//! Live integration tests for djournal-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. They need `DATABASE_URL` pointing at a server the
//! harness can create databases on, so they are ignored by default:
//! `cargo test -p djournal-db -- --ignored`.

use chrono::{NaiveDate, Utc};
use djournal_core::{
    JournalStore, LocationKey, LocationSentimentRollup, SentimentLabel, SentimentResult,
};
use djournal_db::{
    create_journal, delete_entry, insert_entry, list_entries_for_journal, list_locations,
    replace_location_rollups, update_location_keyword_caches, DbError, NewEntry, PgStore,
};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_user(pool: &sqlx::PgPool, username: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO users (username) VALUES ($1) RETURNING id")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("insert_user failed for '{username}': {e}"))
}

async fn insert_location(pool: &sqlx::PgPool, name: &str, description: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO locations (location_name, location_place, location_description) \
         VALUES ($1, 'Philippines', $2) RETURNING location_id",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_location failed for '{name}': {e}"))
}

fn sentiment(positive: f64, neutral: f64) -> SentimentResult {
    SentimentResult {
        label: SentimentLabel::Positive,
        positive_percentage: positive,
        negative_percentage: 0.0,
        neutral_percentage: neutral,
    }
}

fn new_entry(journal_id: i64, location_id: Option<i64>, sentiment: SentimentResult) -> NewEntry {
    NewEntry {
        journal_id,
        description: "Loved the falls.".to_string(),
        entry_datetime: Utc::now(),
        location_id,
        location_name: None,
        images: vec!["/uploads/a.jpg".to_string()],
        display_on_map: Some(true),
        sentiment,
    }
}

fn journal_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn entries_round_trip_through_store(pool: sqlx::PgPool) {
    let user_id = insert_user(&pool, "traveller").await;
    let journal_id = create_journal(&pool, Some(user_id), "Visayas", journal_date())
        .await
        .expect("create journal");
    let location_id = insert_location(&pool, "Kawasan Falls", "waterfall canyon").await;
    insert_entry(&pool, &new_entry(journal_id, Some(location_id), sentiment(100.0, 0.0)))
        .await
        .expect("insert entry");

    let rows = list_entries_for_journal(&pool, journal_id)
        .await
        .expect("list entries");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].images(), vec!["/uploads/a.jpg"]);
    assert_eq!(rows[0].positive_percentage, Some(Decimal::new(10000, 2)));

    let store = PgStore::new(pool.clone());
    let entries = store.fetch_entries_for_user(user_id).await.expect("fetch");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].location_id, Some(location_id));
    assert!(entries[0].stored_sentiment.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn replace_location_rollups_resets_unlisted_locations(pool: sqlx::PgPool) {
    let first = insert_location(&pool, "Kawasan Falls", "waterfall").await;
    let second = insert_location(&pool, "Apo Island", "snorkel").await;

    let initial = vec![
        LocationSentimentRollup {
            location: LocationKey::Id(first),
            entries_count: 3,
            overall_positive_percentage: 80.0,
            overall_negative_percentage: 0.0,
            overall_neutral_percentage: 20.0,
        },
        LocationSentimentRollup {
            location: LocationKey::Id(second),
            entries_count: 1,
            overall_positive_percentage: 50.0,
            overall_negative_percentage: 50.0,
            overall_neutral_percentage: 0.0,
        },
    ];
    let written = replace_location_rollups(&pool, &initial)
        .await
        .expect("replace");
    assert_eq!(written, 2);

    let replacement = vec![
        initial[0].clone(),
        LocationSentimentRollup {
            location: LocationKey::Name("unlisted cove".to_string()),
            entries_count: 4,
            overall_positive_percentage: 100.0,
            overall_negative_percentage: 0.0,
            overall_neutral_percentage: 0.0,
        },
    ];
    let written = replace_location_rollups(&pool, &replacement)
        .await
        .expect("replace");
    assert_eq!(written, 1);

    let rows = list_locations(&pool).await.expect("list");
    let apo = rows.iter().find(|r| r.location_id == second).expect("apo");
    assert_eq!(apo.entries_count, 0);
    assert!(apo.overall_positive_percentage.is_none());
    let kawasan = rows.iter().find(|r| r.location_id == first).expect("kawasan");
    assert_eq!(kawasan.entries_count, 3);
    assert_eq!(kawasan.overall_positive_percentage, Some(Decimal::new(8000, 2)));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn invalid_rollup_leaves_previous_state_untouched(pool: sqlx::PgPool) {
    let id = insert_location(&pool, "Kawasan Falls", "waterfall").await;
    let good = LocationSentimentRollup {
        location: LocationKey::Id(id),
        entries_count: 2,
        overall_positive_percentage: 75.0,
        overall_negative_percentage: 25.0,
        overall_neutral_percentage: 0.0,
    };
    replace_location_rollups(&pool, std::slice::from_ref(&good))
        .await
        .expect("replace");

    let mut bad = good.clone();
    bad.overall_positive_percentage = 140.0;
    let result = replace_location_rollups(&pool, &[bad]).await;
    assert!(matches!(result, Err(DbError::InvalidPercentage(_))));

    let rows = list_locations(&pool).await.expect("list");
    assert_eq!(rows[0].entries_count, 2);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn keyword_caches_are_read_back_by_store(pool: sqlx::PgPool) {
    let id = insert_location(&pool, "Apo Island", "turtles snorkel").await;
    let keywords = ["snorkel".to_string(), "turtles".to_string()]
        .into_iter()
        .collect();
    let updated = update_location_keyword_caches(&pool, &[(id, keywords)])
        .await
        .expect("update caches");
    assert_eq!(updated, 1);

    let store = PgStore::new(pool);
    let locations = store.fetch_locations().await.expect("fetch");
    let cache = locations[0].keyword_cache.as_ref().expect("cache");
    assert!(cache.contains("turtles"));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn deleting_missing_entry_is_not_found(pool: sqlx::PgPool) {
    let result = delete_entry(&pool, 404).await;
    assert!(matches!(result, Err(DbError::NotFound)));
}
