// Process sample model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    /// Share of one core over the last sampling window; may exceed 100 on multi-threaded processes.
    pub cpu_percent: f64,
    pub memory_percent: f64,
}
