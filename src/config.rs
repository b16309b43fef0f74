//! Engine configuration file support.
//!
//! This module provides utilities for reading scheduler tuning knobs from
//! TOML configuration files, with sensible defaults when no file is present.

use anyhow::Context;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::time::TimeSlot;

/// Scheduler tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Start of the daily scheduling window
    #[serde(default = "default_day_window_start")]
    pub day_window_start: NaiveTime,
    /// End of the daily scheduling window
    #[serde(default = "default_day_window_end")]
    pub day_window_end: NaiveTime,
    /// Minimum free-slot size worth emitting, in minutes
    #[serde(default = "default_slot_granularity")]
    pub slot_granularity_minutes: i64,
    /// Overlap fraction of a sibling's duration at or above which a move
    /// displaces the sibling instead of shortening it
    #[serde(default = "default_displacement_threshold")]
    pub displacement_threshold: f64,
    /// Bound on optimizer strategy calls, in seconds
    #[serde(default = "default_optimizer_timeout")]
    pub optimizer_timeout_secs: u64,
    /// Bound on calendar and blocked-time provider calls, in seconds
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
}

fn default_day_window_start() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 0, 0).expect("valid literal time")
}

fn default_day_window_end() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).expect("valid literal time")
}

fn default_slot_granularity() -> i64 {
    15
}

fn default_displacement_threshold() -> f64 {
    crate::scheduler::moves::DISPLACEMENT_THRESHOLD
}

fn default_optimizer_timeout() -> u64 {
    20
}

fn default_provider_timeout() -> u64 {
    10
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            day_window_start: default_day_window_start(),
            day_window_end: default_day_window_end(),
            slot_granularity_minutes: default_slot_granularity(),
            displacement_threshold: default_displacement_threshold(),
            optimizer_timeout_secs: default_optimizer_timeout(),
            provider_timeout_secs: default_provider_timeout(),
        }
    }
}

impl SchedulerConfig {
    /// The daily scheduling window as a slot.
    pub fn day_window(&self) -> TimeSlot {
        TimeSlot::new(self.day_window_start, self.day_window_end)
            .expect("config validation guarantees an ordered day window")
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: SchedulerConfig =
            toml::from_str(content).context("Failed to parse scheduler config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from `FSA_CONFIG` when set, then from
    /// `scheduler.toml` in the working directory, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var("FSA_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }
        let local = PathBuf::from("scheduler.toml");
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.day_window_start >= self.day_window_end {
            anyhow::bail!("day window start must precede its end");
        }
        if self.slot_granularity_minutes <= 0 {
            anyhow::bail!("slot granularity must be positive");
        }
        if !(0.0..=1.0).contains(&self.displacement_threshold) {
            anyhow::bail!("displacement threshold must lie in [0, 1]");
        }
        Ok(())
    }
}
