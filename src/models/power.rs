// Battery model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryInfo {
    pub percent: f64,
    pub plugged: bool,
    /// Seconds until empty; `None` while charging, on AC, or when the OS has no estimate.
    pub secs_left: Option<u64>,
    /// Human-readable time left, or "Unknown".
    pub time_left: String,
}
