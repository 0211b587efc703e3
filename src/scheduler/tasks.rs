//! Suggestion store maintenance

use super::job::{JobId, MaintenanceJob};
use super::service::SchedulerService;
use crate::error::{AppError, Result};
use crate::suggest::{SuggestionStore, SUGGEST_METRICS};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Name of the suggestion cleanup job
pub const SUGGESTION_CLEANUP_JOB: &str = "suggestion_cleanup";

/// Job sweeping expired suggestions out of `store` every `interval`.
///
/// The sweep runs on the blocking pool since it walks every entry.
pub fn suggestion_cleanup_job(store: Arc<SuggestionStore>, interval: Duration) -> MaintenanceJob {
    MaintenanceJob::new(SUGGESTION_CLEANUP_JOB, interval, move || {
        let store = store.clone();
        async move {
            let swept = tokio::task::spawn_blocking(move || store.cleanup()).await;
            SUGGEST_METRICS.record_cleanup_run(swept.is_ok());
            swept
                .map(|_| ())
                .map_err(|err| AppError::Internal(format!("suggestion cleanup aborted: {}", err)))
        }
    })
}

/// Schedule the cleanup job at the store's cleanup interval, unless the
/// scheduler configuration turns it off
pub async fn schedule_suggestion_cleanup(
    scheduler: &SchedulerService,
    store: Arc<SuggestionStore>,
) -> Result<Option<JobId>> {
    if !scheduler.config().suggestion_cleanup {
        info!("suggestion cleanup disabled");
        return Ok(None);
    }

    let interval = store.config().cleanup_interval();
    let id = scheduler
        .add_job(suggestion_cleanup_job(store, interval))
        .await?;
    Ok(Some(id))
}
