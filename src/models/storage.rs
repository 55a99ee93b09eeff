// Partition usage and disk I/O models

use serde::{Deserialize, Serialize};

/// One mounted partition. Sizes are binary gigabytes (2^30), rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub device: String,
    pub mountpoint: String,
    pub fs_type: String,
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub percent: f64,
}

/// Cumulative block device traffic since boot. GB values are decimal (10^9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskIoCounters {
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub read_gb: f64,
    pub write_gb: f64,
}
