//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! advisory polling job.

mod advisories;

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

pub use advisories::AdvisoryPoller;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process; call `shutdown` on it when the server
/// stops.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    poller: AdvisoryPoller,
    interval: Duration,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_advisory_job(&scheduler, poller, interval).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the advisory poll, repeating every `interval`.
///
/// A tick that fires while the previous poll is still running is skipped,
/// so a slow feed never stacks up concurrent reads.
async fn register_advisory_job(
    scheduler: &JobScheduler,
    poller: AdvisoryPoller,
    interval: Duration,
) -> Result<(), JobSchedulerError> {
    let poller = Arc::new(Mutex::new(poller));

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let poller = Arc::clone(&poller);

        Box::pin(async move {
            let Ok(mut poller) = poller.try_lock() else {
                tracing::debug!("scheduler: advisory poll still running; skipping tick");
                return;
            };
            poller.run().await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(
        interval_secs = interval.as_secs(),
        "scheduler: advisory poll registered"
    );
    Ok(())
}
