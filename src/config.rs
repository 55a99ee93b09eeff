use serde::Deserialize;
use std::time::Duration;

use crate::collector::CollectorSettings;
use crate::sampler::SamplerConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub processes: ProcessesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Where request handlers get their snapshot from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// A background task refreshes a shared snapshot; requests read the latest one.
    Background,
    /// Every request collects a fresh snapshot and pays the CPU measurement window.
    OnDemand,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    pub mode: SamplingMode,
    /// Background refresh period.
    pub interval_ms: u64,
    /// Minimum span between the two CPU readings a usage percentage is computed from.
    pub cpu_window_ms: u64,
    /// Upper bound per probe call; must leave room for the CPU window.
    pub probe_timeout_ms: u64,
    /// How often the sampler logs its counters at INFO level.
    pub stats_log_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessesConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ProcessesConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    5
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.sampling.interval_ms > 0,
            "sampling.interval_ms must be > 0, got {}",
            self.sampling.interval_ms
        );
        anyhow::ensure!(
            self.sampling.cpu_window_ms > 0,
            "sampling.cpu_window_ms must be > 0, got {}",
            self.sampling.cpu_window_ms
        );
        anyhow::ensure!(
            self.sampling.probe_timeout_ms > self.sampling.cpu_window_ms,
            "sampling.probe_timeout_ms must exceed sampling.cpu_window_ms ({}), got {}",
            self.sampling.cpu_window_ms,
            self.sampling.probe_timeout_ms
        );
        anyhow::ensure!(
            self.sampling.stats_log_interval_secs > 0,
            "sampling.stats_log_interval_secs must be > 0, got {}",
            self.sampling.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.processes.top_n > 0,
            "processes.top_n must be > 0, got {}",
            self.processes.top_n
        );
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn cpu_window(&self) -> Duration {
        Duration::from_millis(self.sampling.cpu_window_ms)
    }

    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            top_n: self.processes.top_n,
            probe_timeout: Duration::from_millis(self.sampling.probe_timeout_ms),
        }
    }

    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            sample_interval_ms: self.sampling.interval_ms,
            stats_log_interval_secs: self.sampling.stats_log_interval_secs,
        }
    }
}
