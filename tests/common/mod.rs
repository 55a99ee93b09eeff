// Shared test helpers: a scriptable probe and ready-made snapshots
#![allow(dead_code)]

use hostdash::collector::{Collector, CollectorSettings};
use hostdash::models::*;
use hostdash::probe::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Probe whose answers are fixed fields. `None` means the category is unsupported; a partition
/// without an entry in `usage` fails with permission denied.
pub struct FakeProbe {
    pub identity: HostIdentity,
    pub boot_time: Option<u64>,
    pub cpu: Option<RawCpu>,
    pub cpu_delay: Duration,
    pub cpu_calls: AtomicUsize,
    pub memory: Option<RawMemory>,
    pub partitions: Option<Vec<Partition>>,
    pub usage: HashMap<PathBuf, PartitionUsage>,
    pub disk_io: Option<RawDiskIo>,
    pub network: Option<RawNetwork>,
    pub battery: Option<RawBattery>,
    pub processes: Option<ProcessTable>,
}

pub const GIB: u64 = 1024 * 1024 * 1024;

pub fn partition(device: &str, mount: &str) -> Partition {
    Partition {
        device: device.into(),
        mountpoint: PathBuf::from(mount),
        fs_type: "ext4".into(),
    }
}

pub fn process(pid: u32, name: &str, cpu_usage: f32) -> RawProcess {
    RawProcess {
        pid,
        name: name.into(),
        cpu_usage,
        memory_bytes: 256 * 1024 * 1024,
    }
}

pub fn identity(hostname: &str) -> HostIdentity {
    HostIdentity {
        hostname: hostname.into(),
        ip: "10.0.0.7".into(),
        os: "Linux".into(),
        os_version: "24.04".into(),
        kernel_version: "6.8.0".into(),
        architecture: "x86_64".into(),
        processor: "Test CPU @ 3.0GHz".into(),
    }
}

impl FakeProbe {
    /// Every category answers; no battery.
    pub fn healthy() -> Self {
        let boot = chrono::Utc::now().timestamp() - 3661;
        let partitions = vec![
            partition("/dev/sda1", "/"),
            partition("/dev/sda2", "/home"),
        ];
        let usage = HashMap::from([
            (
                PathBuf::from("/"),
                PartitionUsage {
                    total: 100 * GIB,
                    available: 40 * GIB,
                },
            ),
            (
                PathBuf::from("/home"),
                PartitionUsage {
                    total: 500 * GIB,
                    available: 123 * GIB + 456_789,
                },
            ),
        ]);
        Self {
            identity: identity("testhost"),
            boot_time: Some(boot as u64),
            cpu: Some(RawCpu {
                physical_cores: Some(4),
                usage_percent: 12.34,
                per_core_percent: vec![10.0, 20.0, 5.0, 14.0, 0.0, 30.0, 8.0, 11.0],
                frequency_mhz: Some(2400),
                max_frequency_mhz: Some(4200),
            }),
            cpu_delay: Duration::ZERO,
            cpu_calls: AtomicUsize::new(0),
            memory: Some(RawMemory {
                total: 16 * GIB,
                available: 6 * GIB,
                swap_total: 2 * GIB,
                swap_used: GIB / 2,
            }),
            partitions: Some(partitions),
            usage,
            disk_io: Some(RawDiskIo {
                read_bytes: 12_345_678_901,
                written_bytes: 2_000_000_000,
            }),
            network: Some(RawNetwork {
                received: 987_654_321,
                transmitted: 123_456_789,
                packets_received: 1000,
                packets_transmitted: 800,
            }),
            battery: None,
            processes: Some(ProcessTable {
                total_memory: 16 * GIB,
                processes: vec![
                    process(1, "init", 0.0),
                    process(42, "sshd", 1.5),
                    process(100, "postgres", 35.0),
                    process(200, "cargo", 80.2),
                    process(300, "rustc", 35.0),
                    process(400, "node", 12.0),
                    process(500, "bash", 0.1),
                ],
            }),
        }
    }

    /// Identity only; every other category is unsupported.
    pub fn unsupported() -> Self {
        Self {
            identity: identity("bare"),
            boot_time: None,
            cpu: None,
            cpu_delay: Duration::ZERO,
            cpu_calls: AtomicUsize::new(0),
            memory: None,
            partitions: None,
            usage: HashMap::new(),
            disk_io: None,
            network: None,
            battery: None,
            processes: None,
        }
    }
}

fn unsupported<T>(value: &Option<T>, what: &'static str) -> ProbeResult<T>
where
    T: Clone,
{
    value.clone().ok_or(ProbeError::Unsupported(what))
}

impl Probe for FakeProbe {
    fn identity(&self) -> HostIdentity {
        self.identity.clone()
    }

    fn boot_time(&self) -> ProbeResult<u64> {
        unsupported(&self.boot_time, "boot_time")
    }

    fn cpu(&self) -> ProbeResult<RawCpu> {
        self.cpu_calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.cpu_delay);
        unsupported(&self.cpu, "cpu")
    }

    fn memory(&self) -> ProbeResult<RawMemory> {
        unsupported(&self.memory, "memory")
    }

    fn partitions(&self) -> ProbeResult<Vec<Partition>> {
        unsupported(&self.partitions, "partitions")
    }

    fn partition_usage(&self, partition: &Partition) -> ProbeResult<PartitionUsage> {
        self.usage
            .get(&partition.mountpoint)
            .copied()
            .ok_or_else(|| ProbeError::PermissionDenied(partition.mountpoint.display().to_string()))
    }

    fn disk_io(&self) -> ProbeResult<RawDiskIo> {
        unsupported(&self.disk_io, "disk_io")
    }

    fn network(&self) -> ProbeResult<RawNetwork> {
        unsupported(&self.network, "network")
    }

    fn battery(&self) -> ProbeResult<Option<RawBattery>> {
        Ok(self.battery)
    }

    fn processes(&self) -> ProbeResult<ProcessTable> {
        unsupported(&self.processes, "processes")
    }
}

pub fn settings() -> CollectorSettings {
    CollectorSettings {
        top_n: 5,
        probe_timeout: Duration::from_secs(2),
    }
}

pub fn collector(probe: FakeProbe) -> Collector {
    Collector::new(Arc::new(probe), settings())
}

pub fn minimal_snapshot(hostname: &str) -> SystemSnapshot {
    SystemSnapshot {
        timestamp: 0,
        system: SystemInfo {
            identity: identity(hostname),
            boot_time: None,
            uptime_secs: None,
            uptime: "Unknown".into(),
        },
        cpu: None,
        memory: None,
        disks: vec![],
        disk_io: None,
        network: None,
        battery: None,
        processes: vec![],
    }
}
