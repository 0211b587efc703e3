//! Interval-driven maintenance jobs

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifier of a registered job
pub type JobId = Uuid;

type TaskFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;
type Task = dyn Fn() -> TaskFuture + Send + Sync;

/// Run history of a job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub id: JobId,
    pub name: String,
    pub interval_secs: u64,
    pub runs: u64,
    pub failures: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub last_duration_ms: Option<u64>,
    /// Error of the most recent run, cleared by a successful one
    pub last_error: Option<String>,
}

/// A task repeated on a fixed interval.
///
/// The first run happens one interval after the job is scheduled.
pub struct MaintenanceJob {
    id: JobId,
    name: String,
    interval: Duration,
    task: Arc<Task>,
    report: Mutex<JobReport>,
}

impl MaintenanceJob {
    pub fn new<F, Fut>(name: impl Into<String>, interval: Duration, task: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let id = Uuid::new_v4();
        let name = name.into();
        Self {
            report: Mutex::new(JobReport {
                id,
                name: name.clone(),
                interval_secs: interval.as_secs(),
                runs: 0,
                failures: 0,
                last_run: None,
                last_duration_ms: None,
                last_error: None,
            }),
            id,
            name,
            interval,
            task: Arc::new(move || -> TaskFuture { Box::pin(task()) }),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn report(&self) -> JobReport {
        self.report.lock().clone()
    }

    /// Run the task once. A run exceeding `timeout` is abandoned and counts
    /// as failed.
    pub async fn run(&self, timeout: Duration) -> Result<()> {
        let started_at = Utc::now();
        let started = Instant::now();

        let result = match tokio::time::timeout(timeout, (self.task)()).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Internal(format!(
                "job '{}' timed out after {}s",
                self.name,
                timeout.as_secs()
            ))),
        };
        let elapsed = started.elapsed();

        {
            let mut report = self.report.lock();
            report.runs += 1;
            report.last_run = Some(started_at);
            report.last_duration_ms = Some(elapsed.as_millis() as u64);
            match &result {
                Ok(()) => report.last_error = None,
                Err(err) => {
                    report.failures += 1;
                    report.last_error = Some(err.to_string());
                }
            }
        }

        match &result {
            Ok(()) => debug!(
                job = %self.name,
                duration_ms = elapsed.as_millis() as u64,
                "maintenance job finished"
            ),
            Err(err) => warn!(
                job = %self.name,
                error = %err,
                duration_ms = elapsed.as_millis() as u64,
                "maintenance job failed"
            ),
        }
        result
    }
}

impl std::fmt::Debug for MaintenanceJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceJob")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("interval", &self.interval)
            .finish()
    }
}
