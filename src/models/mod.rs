// Snapshot models served by the dashboard

mod network;
mod power;
mod process;
mod storage;
mod system;

pub use network::NetworkCounters;
pub use power::BatteryInfo;
pub use process::ProcessSample;
pub use storage::{DiskInfo, DiskIoCounters};
pub use system::{CpuInfo, HostIdentity, MemoryInfo, StatusView, SystemInfo, SystemSnapshot};
