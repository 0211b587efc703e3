//! Periodic maintenance
//!
//! Repeats [`MaintenanceJob`]s on fixed intervals using tokio-cron-scheduler.
//! Each run is bounded by the configured job timeout and tracked in the job's
//! [`JobReport`]. The only job the crate ships is the suggestion cleanup,
//! scheduled at the store's cleanup interval (at most half the TTL).
//!
//! # Example
//!
//! ```no_run
//! use media_search_core::scheduler::{schedule_suggestion_cleanup, SchedulerConfig, SchedulerService};
//! use media_search_core::suggest::{SuggestConfig, SuggestionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SuggestionStore::new(SuggestConfig::default())?);
//!     let mut scheduler = SchedulerService::new(SchedulerConfig::default()).await?;
//!
//!     schedule_suggestion_cleanup(&scheduler, store).await?;
//!     scheduler.start().await?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     scheduler.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod job;
mod service;
mod tasks;

pub use self::config::{SchedulerConfig, SchedulerConfigBuilder};
pub use self::job::{JobId, JobReport, MaintenanceJob};
pub use self::service::SchedulerService;
pub use self::tasks::{schedule_suggestion_cleanup, suggestion_cleanup_job, SUGGESTION_CLEANUP_JOB};
