// Platform probes: one query per metric category, raw values only

mod linux;
mod sysinfo_probe;

pub use sysinfo_probe::SysinfoProbe;

use crate::models::HostIdentity;
use std::path::PathBuf;
use thiserror::Error;

/// Placeholder for identity fields the platform does not report.
pub const UNKNOWN: &str = "unknown";

/// Battery reports no estimate (still calculating, or the sensor does not expose one).
pub const POWER_TIME_UNKNOWN: i64 = -1;
/// Battery is on AC power; time-to-empty is unbounded.
pub const POWER_TIME_UNLIMITED: i64 = -2;

/// Why a probe could not produce data. Every variant degrades one category, never the snapshot.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("not supported on this platform: {0}")]
    Unsupported(&'static str),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("no data: {0}")]
    NoData(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("probe state lock poisoned: {0}")]
    Poisoned(String),
}

impl ProbeError {
    /// Expected degradations (missing sensor, unreadable mount, empty drive) as opposed to faults.
    pub fn is_expected(&self) -> bool {
        match self {
            ProbeError::Unsupported(_)
            | ProbeError::NotFound(_)
            | ProbeError::PermissionDenied(_)
            | ProbeError::NoData(_) => true,
            ProbeError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::NotFound
            ),
            ProbeError::Poisoned(_) => false,
        }
    }
}

pub type ProbeResult<T> = Result<T, ProbeError>;

#[derive(Debug, Clone, PartialEq)]
pub struct RawCpu {
    pub physical_cores: Option<usize>,
    pub usage_percent: f32,
    /// One entry per logical core, in core order.
    pub per_core_percent: Vec<f32>,
    pub frequency_mhz: Option<u64>,
    pub max_frequency_mhz: Option<u64>,
}

/// Byte counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMemory {
    pub total: u64,
    pub available: u64,
    pub swap_total: u64,
    pub swap_used: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub device: String,
    pub mountpoint: PathBuf,
    pub fs_type: String,
}

/// Byte counts for one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionUsage {
    pub total: u64,
    pub available: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDiskIo {
    pub read_bytes: u64,
    pub written_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawNetwork {
    pub received: u64,
    pub transmitted: u64,
    pub packets_received: u64,
    pub packets_transmitted: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBattery {
    pub percent: f32,
    pub plugged: bool,
    /// Seconds until empty, or [`POWER_TIME_UNKNOWN`] / [`POWER_TIME_UNLIMITED`].
    pub secs_left: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawProcess {
    pub pid: u32,
    pub name: String,
    pub cpu_usage: f32,
    pub memory_bytes: u64,
}

/// Processes in enumeration order plus the RAM total their memory share is measured against.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessTable {
    pub total_memory: u64,
    pub processes: Vec<RawProcess>,
}

/// Uniform access to live OS state. Implementations must not mutate anything outside themselves.
///
/// Calls may block (CPU sampling waits out its measurement window); the collector runs them on
/// the blocking pool under a timeout.
pub trait Probe: Send + Sync + 'static {
    /// Never fails: unknown fields are filled with sentinels.
    fn identity(&self) -> HostIdentity;

    /// Unix seconds.
    fn boot_time(&self) -> ProbeResult<u64>;

    fn cpu(&self) -> ProbeResult<RawCpu>;

    fn memory(&self) -> ProbeResult<RawMemory>;

    /// Mounted partitions in enumeration order.
    fn partitions(&self) -> ProbeResult<Vec<Partition>>;

    fn partition_usage(&self, partition: &Partition) -> ProbeResult<PartitionUsage>;

    fn disk_io(&self) -> ProbeResult<RawDiskIo>;

    fn network(&self) -> ProbeResult<RawNetwork>;

    /// `Ok(None)` when the host has no battery.
    fn battery(&self) -> ProbeResult<Option<RawBattery>>;

    fn processes(&self) -> ProbeResult<ProcessTable>;
}
