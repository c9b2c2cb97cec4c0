//! Token cleanup service config

use serde::Deserialize;
use std::fmt;

use notifications::fcm_gateway::FcmConfig;

use crate::schedule::DailySchedule;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("LoadConfigFailed: {0}")]
    LoadConfigFailed(#[from] envy::Error),
    #[error("InvalidSchedule: hour {0}, utc offset {1}s")]
    InvalidSchedule(u32, i32),
}

#[derive(Clone)]
pub struct Config {
    pub metrics_port: u16,
    pub schedule: DailySchedule,
    pub probe_concurrency: usize,
    pub run_on_start: bool,
    pub fcm: FcmConfig,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        let flat = envy::from_env::<ConfigFlat>()?;
        let schedule = DailySchedule::new(flat.cleanup_hour, flat.cleanup_utc_offset_seconds)
            .ok_or(Error::InvalidSchedule(
                flat.cleanup_hour,
                flat.cleanup_utc_offset_seconds,
            ))?;

        Ok(Config {
            metrics_port: flat.metrics_port,
            schedule,
            probe_concurrency: flat.cleanup_probe_concurrency,
            run_on_start: flat.cleanup_run_on_start,
            fcm: FcmConfig::load()?,
        })
    }
}

#[derive(Deserialize)]
struct ConfigFlat {
    #[serde(default = "default_metrics_port")]
    metrics_port: u16,
    #[serde(default = "default_cleanup_hour")]
    cleanup_hour: u32,
    #[serde(default)]
    cleanup_utc_offset_seconds: i32,
    #[serde(default = "default_probe_concurrency")]
    cleanup_probe_concurrency: usize,
    #[serde(default)]
    cleanup_run_on_start: bool,
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_cleanup_hour() -> u32 {
    3
}

fn default_probe_concurrency() -> usize {
    16
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("metrics_port", &self.metrics_port)
            .field("schedule", &self.schedule)
            .field("probe_concurrency", &self.probe_concurrency)
            .field("run_on_start", &self.run_on_start)
            .field("fcm", &self.fcm)
            .finish()
    }
}
