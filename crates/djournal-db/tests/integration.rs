//! Offline unit tests for djournal-db pool configuration and row conversions.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::Utc;
use djournal_core::{AppConfig, Environment, SentimentLabel};
use djournal_db::{EntryRow, LocationRow, PoolConfig};
use rust_decimal::Decimal;

fn entry_row() -> EntryRow {
    EntryRow {
        entry_id: 11,
        journal_id: 2,
        entry_description: "Loved the sandbar.".to_string(),
        entry_datetime: Utc::now(),
        sentiment: Some("positive".to_string()),
        positive_percentage: Some(Decimal::new(10000, 2)),
        negative_percentage: Some(Decimal::ZERO),
        neutral_percentage: Some(Decimal::ZERO),
        entry_location: Some(5),
        entry_location_name: Some("Virgin Island".to_string()),
        entry_images: r#"["/uploads/1.jpg"]"#.to_string(),
        display_on_map: Some(true),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn location_row(keyword_cache: Option<&str>) -> LocationRow {
    LocationRow {
        location_id: 5,
        location_name: "Virgin Island".to_string(),
        location_place: "Bohol".to_string(),
        location_description: "sandbar island snorkel".to_string(),
        keyword_cache: keyword_cache.map(String::from),
        entries_count: 0,
        overall_positive_percentage: None,
        overall_negative_percentage: None,
        overall_neutral_percentage: None,
        sentiment_updated_at: None,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        rollup_cron: "0 0 3 * * *".to_string(),
        max_entry_images: 5,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn entry_row_converts_stored_sentiment() {
    let entry = entry_row().into_journal_entry();

    assert_eq!(entry.id, Some(11));
    assert_eq!(entry.location_id, Some(5));
    let sentiment = entry.stored_sentiment.expect("stored sentiment");
    assert_eq!(sentiment.label, SentimentLabel::Positive);
    assert_eq!(sentiment.positive_percentage, 100.0);
}

#[test]
fn entry_row_with_partial_sentiment_has_none() {
    let mut row = entry_row();
    row.neutral_percentage = None;
    assert!(row.stored_sentiment().is_none());
}

#[test]
fn entry_row_with_unknown_label_has_none() {
    let mut row = entry_row();
    row.sentiment = Some("ecstatic".to_string());
    assert!(row.stored_sentiment().is_none());
}

#[test]
fn entry_row_images_tolerate_malformed_json() {
    let mut row = entry_row();
    assert_eq!(row.images(), vec!["/uploads/1.jpg"]);
    row.entry_images = "not json".to_string();
    assert!(row.images().is_empty());
}

#[test]
fn location_row_reads_keyword_cache() {
    let location = location_row(Some(r#"["island","sandbar"]"#)).into_location();
    let cache = location.keyword_cache.expect("cache");
    assert!(cache.contains("sandbar"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn location_row_ignores_empty_or_malformed_cache() {
    assert!(location_row(None).into_location().keyword_cache.is_none());
    assert!(location_row(Some("[]")).into_location().keyword_cache.is_none());
    assert!(location_row(Some("{oops")).into_location().keyword_cache.is_none());
}
