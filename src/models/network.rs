// Network counter models

use serde::{Deserialize, Serialize};

/// Cumulative traffic across all interfaces since boot. MB values are decimal (10^6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
    pub sent_mb: f64,
    pub recv_mb: f64,
}
