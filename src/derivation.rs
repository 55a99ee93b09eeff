// Pure conversions from raw probe values to what the dashboard shows

use crate::models::{BatteryInfo, CpuInfo, DiskInfo, MemoryInfo, ProcessSample};
use crate::probe::{
    POWER_TIME_UNLIMITED, Partition, PartitionUsage, ProcessTable, RawBattery, RawCpu, RawMemory,
};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const GB: f64 = 1_000_000_000.0;
const MB: f64 = 1_000_000.0;

/// Sentinel for durations the OS cannot estimate.
pub const UNKNOWN_DURATION: &str = "Unknown";

/// Rounds half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Binary gigabytes (RAM, partitions), 2 decimals.
pub fn bytes_to_gib(bytes: u64) -> f64 {
    round_to(bytes as f64 / GIB, 2)
}

/// Decimal gigabytes (disk I/O), 2 decimals.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round_to(bytes as f64 / GB, 2)
}

/// Decimal megabytes (network), 2 decimals.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    round_to(bytes as f64 / MB, 2)
}

/// `part / whole` as a percentage in [0, 100], 1 decimal. Zero when `whole` is zero.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to((part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0), 1)
}

/// Seconds since boot; a boot time ahead of `now` (clock skew) yields zero.
pub fn uptime_secs(now_unix: i64, boot_unix: i64) -> u64 {
    now_unix.saturating_sub(boot_unix).max(0) as u64
}

/// "H:MM:SS" under a day, "1 day, H:MM:SS" or "N days, H:MM:SS" beyond.
pub fn format_duration(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let secs = total_secs % 60;
    let clock = format!("{hours}:{minutes:02}:{secs:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// Battery time left; negative values are OS sentinels (calculating, on AC) and map to "Unknown".
pub fn battery_time_left(secs_left: i64) -> String {
    if secs_left < 0 {
        return UNKNOWN_DURATION.into();
    }
    format_duration(secs_left as u64)
}

/// First `n` by CPU percent, descending. The sort is stable: ties keep input order.
pub fn top_n(mut processes: Vec<ProcessSample>, n: usize) -> Vec<ProcessSample> {
    processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
    processes.truncate(n);
    processes
}

pub fn cpu_info(raw: &RawCpu) -> CpuInfo {
    CpuInfo {
        physical_cores: raw.physical_cores,
        logical_threads: raw.per_core_percent.len(),
        usage_percent: round_to(f64::from(raw.usage_percent).clamp(0.0, 100.0), 1),
        per_core_percent: raw
            .per_core_percent
            .iter()
            .map(|p| round_to(f64::from(*p).clamp(0.0, 100.0), 1))
            .collect(),
        frequency_mhz: raw.frequency_mhz,
        max_frequency_mhz: raw.max_frequency_mhz,
    }
}

pub fn memory_info(raw: &RawMemory) -> MemoryInfo {
    let available = raw.available.min(raw.total);
    let used = raw.total - available;
    let swap_used = raw.swap_used.min(raw.swap_total);
    MemoryInfo {
        total_gb: bytes_to_gib(raw.total),
        used_gb: bytes_to_gib(used),
        available_gb: bytes_to_gib(available),
        percent: percent(used, raw.total),
        swap_total_gb: bytes_to_gib(raw.swap_total),
        swap_used_gb: bytes_to_gib(swap_used),
        swap_percent: percent(swap_used, raw.swap_total),
    }
}

/// Used space is derived from the rounded total and free figures so the three always add up.
pub fn disk_info(partition: &Partition, usage: &PartitionUsage) -> DiskInfo {
    let free = usage.available.min(usage.total);
    let total_gb = bytes_to_gib(usage.total);
    let free_gb = bytes_to_gib(free);
    DiskInfo {
        device: partition.device.clone(),
        mountpoint: partition.mountpoint.display().to_string(),
        fs_type: partition.fs_type.clone(),
        total_gb,
        used_gb: round_to(total_gb - free_gb, 2),
        free_gb,
        percent: percent(usage.total - free, usage.total),
    }
}

/// On AC power there is no time-to-empty, whatever the OS reports.
pub fn battery_info(raw: &RawBattery) -> BatteryInfo {
    let secs_left = if raw.plugged {
        POWER_TIME_UNLIMITED
    } else {
        raw.secs_left
    };
    BatteryInfo {
        percent: round_to(f64::from(raw.percent).clamp(0.0, 100.0), 1),
        plugged: raw.plugged,
        secs_left: u64::try_from(secs_left).ok(),
        time_left: battery_time_left(secs_left),
    }
}

/// All processes in enumeration order; ranking is left to [`top_n`].
pub fn process_samples(table: &ProcessTable) -> Vec<ProcessSample> {
    table
        .processes
        .iter()
        .map(|p| ProcessSample {
            pid: p.pid,
            name: p.name.clone(),
            cpu_percent: round_to(f64::from(p.cpu_usage).max(0.0), 1),
            memory_percent: if table.total_memory == 0 {
                0.0
            } else {
                round_to(
                    (p.memory_bytes as f64 / table.total_memory as f64 * 100.0).clamp(0.0, 100.0),
                    2,
                )
            },
        })
        .collect()
}
