//! Scheduler service driving maintenance jobs

use super::config::SchedulerConfig;
use super::job::{JobId, JobReport, MaintenanceJob};
use crate::error::{AppError, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};
use uuid::Uuid;

/// Runs registered [`MaintenanceJob`]s on their intervals.
///
/// Jobs may be added before or after [`SchedulerService::start`]; they only
/// fire while the service is running.
pub struct SchedulerService {
    config: SchedulerConfig,
    scheduler: JobScheduler,
    /// Registered jobs with their id inside `scheduler`
    jobs: DashMap<JobId, (Arc<MaintenanceJob>, Uuid)>,
    running: AtomicBool,
}

impl SchedulerService {
    pub async fn new(config: SchedulerConfig) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;
        info!(
            enabled = config.enabled,
            job_timeout_secs = config.job_timeout_secs,
            "scheduler created"
        );
        Ok(Self {
            config,
            scheduler,
            jobs: DashMap::new(),
            running: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start firing jobs. A disabled scheduler stays stopped.
    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("scheduler disabled, not starting");
            return Ok(());
        }
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("scheduler already running");
            return Ok(());
        }

        if let Err(err) = self.scheduler.start().await {
            self.running.store(false, Ordering::SeqCst);
            return Err(err.into());
        }
        info!(jobs = self.jobs.len(), "scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        self.scheduler.shutdown().await?;
        info!("scheduler stopped");
        Ok(())
    }

    /// Register `job` on its interval. A zero interval is rejected.
    pub async fn add_job(&self, job: MaintenanceJob) -> Result<JobId> {
        if job.interval().is_zero() {
            return Err(AppError::Configuration(format!(
                "job '{}' needs a non-zero interval",
                job.name()
            )));
        }

        let job = Arc::new(job);
        let timeout = self.config.job_timeout();
        let repeated = {
            let job = job.clone();
            Job::new_repeated_async(job.interval(), move |_uuid, _scheduler| {
                let job = job.clone();
                Box::pin(async move {
                    // Failures are logged and kept in the job report
                    let _ = job.run(timeout).await;
                })
            })?
        };
        let scheduled_id = self.scheduler.add(repeated).await?;

        let id = job.id();
        info!(
            job_id = %id,
            job = %job.name(),
            interval_secs = job.interval().as_secs(),
            "job scheduled"
        );
        self.jobs.insert(id, (job, scheduled_id));
        Ok(id)
    }

    /// Unschedule a job
    pub async fn remove_job(&self, id: &JobId) -> Result<()> {
        let (_, (job, scheduled_id)) = self
            .jobs
            .remove(id)
            .ok_or_else(|| unknown_job(id))?;
        self.scheduler.remove(&scheduled_id).await?;
        info!(job_id = %id, job = %job.name(), "job removed");
        Ok(())
    }

    /// Run a job immediately, outside its interval
    pub async fn run_now(&self, id: &JobId) -> Result<()> {
        let job = self.job(id).ok_or_else(|| unknown_job(id))?;
        job.run(self.config.job_timeout()).await
    }

    pub fn report(&self, id: &JobId) -> Option<JobReport> {
        self.job(id).map(|job| job.report())
    }

    /// Reports of every registered job, by name
    pub fn reports(&self) -> Vec<JobReport> {
        let mut reports: Vec<JobReport> =
            self.jobs.iter().map(|entry| entry.value().0.report()).collect();
        reports.sort_by(|a, b| a.name.cmp(&b.name));
        reports
    }

    fn job(&self, id: &JobId) -> Option<Arc<MaintenanceJob>> {
        self.jobs.get(id).map(|entry| entry.value().0.clone())
    }
}

fn unknown_job(id: &JobId) -> AppError {
    AppError::invalid_argument(format!("no job with id {}", id))
}
