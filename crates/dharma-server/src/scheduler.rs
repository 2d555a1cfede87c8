//! Background job scheduler.
//!
//! Registers the recurring full catalog sync on `DHARMA_SYNC_SCHEDULE`.

use dharma_sync::SyncCommand;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::runner::SyncRunner;

/// Builds and starts the background job scheduler.
///
/// With no schedule configured the scheduler starts with no jobs. Returns
/// the running [`JobScheduler`] handle, which must be kept alive for the
/// lifetime of the process.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    runner: SyncRunner,
    schedule: Option<&str>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    match schedule {
        Some(schedule) => register_sync_job(&scheduler, runner, schedule).await?,
        None => tracing::info!("scheduler: no sync schedule configured"),
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the full sync (`teachers` then `talks`). A tick that finds a
/// run already in progress is skipped, not queued.
async fn register_sync_job(
    scheduler: &JobScheduler,
    runner: SyncRunner,
    schedule: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let runner = runner.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting catalog sync");
            match runner.try_run(SyncCommand::All, false, None).await {
                Ok(Some(report)) if report.success => {
                    tracing::info!("scheduler: catalog sync complete");
                }
                Ok(Some(report)) => {
                    tracing::error!(
                        teachers_error = ?report.teachers.and_then(|r| r.error),
                        talks_error = ?report.talks.and_then(|r| r.error),
                        "scheduler: catalog sync aborted"
                    );
                }
                Ok(None) => {
                    tracing::info!("scheduler: previous sync still running; skipping tick");
                }
                Err(e) => tracing::error!(error = %e, "scheduler: catalog sync task failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(schedule, "scheduler: registered catalog sync job");
    Ok(())
}
