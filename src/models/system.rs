// Host identity, CPU, memory and the assembled snapshot

use serde::{Deserialize, Serialize};

use super::{BatteryInfo, DiskInfo, DiskIoCounters, NetworkCounters, ProcessSample};

/// Who and what this host is. Always present; unknown values carry sentinels instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostIdentity {
    pub hostname: String,
    pub ip: String,
    pub os: String,
    pub os_version: String,
    pub kernel_version: String,
    pub architecture: String,
    pub processor: String,
}

/// `system` section of the status payload: identity plus uptime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(flatten)]
    pub identity: HostIdentity,
    /// Unix seconds; `None` when the platform cannot report it.
    pub boot_time: Option<u64>,
    pub uptime_secs: Option<u64>,
    /// "D days, H:MM:SS", or "Unknown" without a boot time.
    pub uptime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub physical_cores: Option<usize>,
    pub logical_threads: usize,
    pub usage_percent: f64,
    /// Indexed by logical core.
    pub per_core_percent: Vec<f64>,
    pub frequency_mhz: Option<u64>,
    pub max_frequency_mhz: Option<u64>,
}

/// RAM and swap. Sizes are binary gigabytes (2^30), rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
    pub percent: f64,
    pub swap_total_gb: f64,
    pub swap_used_gb: f64,
    pub swap_percent: f64,
}

/// One point-in-time view of the host. Built once by the collector, then shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// Collection time, Unix millis.
    pub timestamp: u64,
    pub system: SystemInfo,
    pub cpu: Option<CpuInfo>,
    pub memory: Option<MemoryInfo>,
    pub disks: Vec<DiskInfo>,
    pub disk_io: Option<DiskIoCounters>,
    pub network: Option<NetworkCounters>,
    pub battery: Option<BatteryInfo>,
    pub processes: Vec<ProcessSample>,
}

impl SystemSnapshot {
    /// Borrowed view with the fixed key set of GET /api/status.
    pub fn status(&self) -> StatusView<'_> {
        StatusView {
            system: &self.system,
            cpu: self.cpu.as_ref(),
            memory: self.memory.as_ref(),
            disk_io: self.disk_io.as_ref(),
            network: self.network.as_ref(),
            battery: self.battery.as_ref(),
            processes: &self.processes,
        }
    }
}

/// Wire shape of GET /api/status. Unavailable categories serialize as `null`, never omitted.
#[derive(Debug, Serialize)]
pub struct StatusView<'a> {
    pub system: &'a SystemInfo,
    pub cpu: Option<&'a CpuInfo>,
    pub memory: Option<&'a MemoryInfo>,
    pub disk_io: Option<&'a DiskIoCounters>,
    pub network: Option<&'a NetworkCounters>,
    pub battery: Option<&'a BatteryInfo>,
    pub processes: &'a [ProcessSample],
}
