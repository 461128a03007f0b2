//! Store-backed commands: recommendations, rollups, and keyword reindexing.

use std::collections::BTreeSet;

use djournal_core::{Location, LocationKey};
use djournal_db::PgStore;
use djournal_sentiment::{aggregate, extract_keywords, JournalInsights};
use sqlx::PgPool;

pub(crate) async fn run_recommend(pool: PgPool, user: Option<i64>) -> anyhow::Result<()> {
    let insights = JournalInsights::new(PgStore::new(pool));
    let recommendations = match user {
        Some(user_id) => insights.recommend_for_user(user_id).await?,
        None => insights.recommend().await?,
    };

    if recommendations.is_empty() {
        println!("no recommendations: no positive entries share keywords with the catalog");
        return Ok(());
    }

    println!("{:>5}  {:<30}  PLACE", "SCORE", "LOCATION");
    for rec in &recommendations {
        println!(
            "{:>5}  {:<30}  {}",
            rec.match_score, rec.location_name, rec.location_place
        );
    }
    Ok(())
}

/// Recompute rollups. A dry run aggregates in memory and neither repairs
/// entries nor replaces stored rollups.
pub(crate) async fn run_rollup(pool: PgPool, dry_run: bool) -> anyhow::Result<()> {
    if dry_run {
        let entries: Vec<_> = djournal_db::list_located_entries(&pool)
            .await?
            .into_iter()
            .map(djournal_db::EntryRow::into_journal_entry)
            .collect();
        let locations: Vec<Location> = djournal_db::list_locations(&pool)
            .await?
            .into_iter()
            .map(djournal_db::LocationRow::into_location)
            .collect();

        let rollups = aggregate(&entries, &locations);
        println!("dry-run: would write {} rollup group(s)", rollups.len());
        for rollup in &rollups {
            println!(
                "{:<24}  entries={:<4}  positive={:.2}  negative={:.2}  neutral={:.2}",
                describe_key(&rollup.location),
                rollup.entries_count,
                rollup.overall_positive_percentage,
                rollup.overall_negative_percentage,
                rollup.overall_neutral_percentage
            );
        }
        return Ok(());
    }

    let insights = JournalInsights::new(PgStore::new(pool));
    let summary = insights.recompute_and_persist().await?;
    println!(
        "rollups replaced: {} location(s) updated, {} entry sentiment(s) repaired",
        summary.locations_updated, summary.entries_repaired
    );
    Ok(())
}

pub(crate) async fn run_reindex_keywords(pool: &PgPool, dry_run: bool) -> anyhow::Result<()> {
    let locations = djournal_db::list_locations(pool).await?;
    let caches: Vec<(i64, BTreeSet<String>)> = locations
        .iter()
        .map(|row| (row.location_id, extract_keywords(&row.location_description)))
        .collect();

    if dry_run {
        for (id, keywords) in &caches {
            let joined: Vec<&str> = keywords.iter().map(String::as_str).collect();
            println!("{id:>6}  {}", joined.join(", "));
        }
        println!("dry-run: would reindex {} location(s)", caches.len());
        return Ok(());
    }

    let updated = djournal_db::update_location_keyword_caches(pool, &caches).await?;
    tracing::info!(updated, "location keyword caches rebuilt");
    println!("reindexed keywords for {updated} location(s)");
    Ok(())
}

fn describe_key(key: &LocationKey) -> String {
    match key {
        LocationKey::Id(id) => format!("location #{id}"),
        LocationKey::Name(name) => format!("\"{name}\""),
    }
}
