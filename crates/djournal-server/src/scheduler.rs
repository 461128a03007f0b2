//! Background job scheduler.
//!
//! Registers the recurring location-sentiment rollup at server startup.

use std::sync::Arc;

use djournal_db::PgStore;
use djournal_sentiment::JournalInsights;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// The returned [`JobScheduler`] must be kept alive for the lifetime of the
/// process; dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is rejected, or the scheduler fails to start.
pub async fn build_scheduler(
    insights: Arc<JournalInsights<PgStore>>,
    config: Arc<djournal_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_rollup_job(&scheduler, insights, &config.rollup_cron).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the periodic rollup recompute on `cron` (six fields, with seconds).
///
/// Shares the server's [`JournalInsights`] so a scheduled run waits for any
/// on-demand recompute already in flight.
async fn register_rollup_job(
    scheduler: &JobScheduler,
    insights: Arc<JournalInsights<PgStore>>,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let insights = Arc::clone(&insights);

        Box::pin(async move {
            tracing::info!("scheduler: starting location sentiment rollup");
            match insights.recompute_and_persist().await {
                Ok(summary) => tracing::info!(
                    locations_updated = summary.locations_updated,
                    entries_repaired = summary.entries_repaired,
                    "scheduler: location sentiment rollup complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: location sentiment rollup failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: registered location sentiment rollup");
    Ok(())
}
