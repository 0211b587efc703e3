//! Configuration for the scheduler module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the scheduler service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the scheduler runs at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Upper bound on a single job execution, in seconds
    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,

    /// Whether the suggestion cleanup job is registered
    #[serde(default = "default_enabled")]
    pub suggestion_cleanup: bool,
}

impl SchedulerConfig {
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            job_timeout_secs: default_job_timeout_secs(),
            suggestion_cleanup: default_enabled(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_job_timeout_secs() -> u64 {
    300
}

/// Builder for SchedulerConfig
pub struct SchedulerConfigBuilder {
    config: SchedulerConfig,
}

impl SchedulerConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn job_timeout(mut self, timeout: Duration) -> Self {
        self.config.job_timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn suggestion_cleanup(mut self, enabled: bool) -> Self {
        self.config.suggestion_cleanup = enabled;
        self
    }

    pub fn build(self) -> SchedulerConfig {
        self.config
    }
}

impl Default for SchedulerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
