// Probe backed by sysinfo, with Linux sysfs/procfs supplements

use super::linux;
use super::{
    Partition, PartitionUsage, Probe, ProbeError, ProbeResult, ProcessTable, RawBattery, RawCpu,
    RawDiskIo, RawMemory, RawNetwork, RawProcess, UNKNOWN,
};
use crate::models::HostIdentity;
use std::collections::HashSet;
use std::net::{IpAddr, ToSocketAddrs};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use sysinfo::{Disks, Networks, ProcessesToUpdate, System};
use tracing::instrument;

/// Usage percentages are deltas between two refreshes; this keeps every delta measured over a
/// span of at least `window` and at most twice that.
struct MeasureWindow {
    window: Duration,
    last: Option<Instant>,
}

impl MeasureWindow {
    fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Blocks until the window since the previous refresh has elapsed, then refreshes.
    /// With no previous refresh, or one older than two windows, a fresh baseline is taken and a
    /// full window waited out so the delta does not span the idle gap.
    fn refresh_with(&mut self, mut refresh: impl FnMut()) {
        match self.last.map(|prev| prev.elapsed()) {
            Some(elapsed) if elapsed <= self.window * 2 => {
                if elapsed < self.window {
                    std::thread::sleep(self.window - elapsed);
                }
            }
            _ => {
                refresh();
                std::thread::sleep(self.window);
            }
        }
        refresh();
        self.last = Some(Instant::now());
    }
}

struct SysState {
    sys: System,
    cpu_window: MeasureWindow,
    process_window: MeasureWindow,
}

pub struct SysinfoProbe {
    state: Mutex<SysState>,
    disks: Mutex<Disks>,
    networks: Mutex<Networks>,
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl SysinfoProbe {
    /// `cpu_window` is the minimum span between the two readings a CPU percentage is computed
    /// from (clamped up to sysinfo's own minimum).
    pub fn new(cpu_window: Duration) -> Self {
        let cpu_window = cpu_window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        let mut sys = System::new();
        sys.refresh_memory();
        Self {
            state: Mutex::new(SysState {
                sys,
                cpu_window: MeasureWindow::new(cpu_window),
                process_window: MeasureWindow::new(cpu_window),
            }),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
        }
    }
}

fn lock<'a, T>(m: &'a Mutex<T>, what: &str) -> ProbeResult<MutexGuard<'a, T>> {
    m.lock()
        .map_err(|e| ProbeError::Poisoned(format!("{what}: {e}")))
}

/// First resolved address for `hostname`, preferring IPv4.
fn resolve_ip(hostname: &str) -> Option<IpAddr> {
    let addrs: Vec<IpAddr> = (hostname, 0)
        .to_socket_addrs()
        .ok()?
        .map(|a| a.ip())
        .collect();
    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl Probe for SysinfoProbe {
    #[instrument(skip(self), fields(probe = "sysinfo", operation = "identity"))]
    fn identity(&self) -> HostIdentity {
        let hostname = non_empty(System::host_name()).unwrap_or_else(|| UNKNOWN.into());
        let ip = resolve_ip(&hostname)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| UNKNOWN.into());
        let processor = linux::read_cpu_model_linux()
            .or_else(|| {
                let state = lock(&self.state, "sysinfo").ok()?;
                state
                    .sys
                    .cpus()
                    .first()
                    .map(|c| c.brand().trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| UNKNOWN.into());
        HostIdentity {
            hostname,
            ip,
            os: non_empty(System::name()).unwrap_or_else(|| std::env::consts::OS.into()),
            os_version: non_empty(System::os_version()).unwrap_or_else(|| UNKNOWN.into()),
            kernel_version: non_empty(System::kernel_version()).unwrap_or_else(|| UNKNOWN.into()),
            architecture: std::env::consts::ARCH.into(),
            processor,
        }
    }

    fn boot_time(&self) -> ProbeResult<u64> {
        match System::boot_time() {
            0 => Err(ProbeError::NoData("boot time".into())),
            t => Ok(t),
        }
    }

    #[instrument(skip(self), fields(probe = "sysinfo", operation = "cpu"))]
    fn cpu(&self) -> ProbeResult<RawCpu> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProbeError::Unsupported("cpu"));
        }
        let mut guard = lock(&self.state, "sysinfo")?;
        let SysState {
            sys, cpu_window, ..
        } = &mut *guard;
        cpu_window.refresh_with(|| sys.refresh_cpu_all());

        let cpus = sys.cpus();
        if cpus.is_empty() {
            return Err(ProbeError::NoData("no cpus listed".into()));
        }
        Ok(RawCpu {
            physical_cores: System::physical_core_count(),
            usage_percent: sys.global_cpu_usage(),
            per_core_percent: cpus.iter().map(|c| c.cpu_usage()).collect(),
            frequency_mhz: cpus.first().map(|c| c.frequency()).filter(|f| *f > 0),
            max_frequency_mhz: linux::read_max_frequency_mhz(),
        })
    }

    #[instrument(skip(self), fields(probe = "sysinfo", operation = "memory"))]
    fn memory(&self) -> ProbeResult<RawMemory> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProbeError::Unsupported("memory"));
        }
        let mut state = lock(&self.state, "sysinfo")?;
        state.sys.refresh_memory();
        let total = state.sys.total_memory();
        if total == 0 {
            return Err(ProbeError::NoData("total memory is zero".into()));
        }
        Ok(RawMemory {
            total,
            available: state.sys.available_memory(),
            swap_total: state.sys.total_swap(),
            swap_used: state.sys.used_swap(),
        })
    }

    #[instrument(skip(self), fields(probe = "sysinfo", operation = "partitions"))]
    fn partitions(&self) -> ProbeResult<Vec<Partition>> {
        let mut disks = lock(&self.disks, "sysinfo disks")?;
        disks.refresh(true);
        Ok(disks
            .list()
            .iter()
            .map(|d| Partition {
                device: d.name().to_string_lossy().into_owned(),
                mountpoint: d.mount_point().to_path_buf(),
                fs_type: d.file_system().to_string_lossy().into_owned(),
            })
            .collect())
    }

    fn partition_usage(&self, partition: &Partition) -> ProbeResult<PartitionUsage> {
        let mount = partition.mountpoint.display().to_string();
        if let Err(e) = std::fs::metadata(&partition.mountpoint) {
            return Err(match e.kind() {
                std::io::ErrorKind::PermissionDenied => ProbeError::PermissionDenied(mount),
                std::io::ErrorKind::NotFound => ProbeError::NotFound(mount),
                _ => ProbeError::Io(e),
            });
        }
        let disks = lock(&self.disks, "sysinfo disks")?;
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == partition.mountpoint.as_path())
            .ok_or_else(|| ProbeError::NotFound(mount.clone()))?;
        let total = disk.total_space();
        if total == 0 {
            // Card readers and optical drives without media.
            return Err(ProbeError::NoData(format!("{mount}: no medium")));
        }
        Ok(PartitionUsage {
            total,
            available: disk.available_space().min(total),
        })
    }

    #[instrument(skip(self), fields(probe = "sysinfo", operation = "disk_io"))]
    fn disk_io(&self) -> ProbeResult<RawDiskIo> {
        let mut disks = lock(&self.disks, "sysinfo disks")?;
        disks.refresh(false);
        if disks.list().is_empty() {
            return Err(ProbeError::NoData("no disks listed".into()));
        }
        // A device mounted at several points is listed once per mount.
        let mut seen = HashSet::new();
        let mut io = RawDiskIo {
            read_bytes: 0,
            written_bytes: 0,
        };
        for disk in disks.list() {
            if !seen.insert(disk.name().to_os_string()) {
                continue;
            }
            let usage = disk.usage();
            io.read_bytes = io.read_bytes.saturating_add(usage.total_read_bytes);
            io.written_bytes = io.written_bytes.saturating_add(usage.total_written_bytes);
        }
        Ok(io)
    }

    #[instrument(skip(self), fields(probe = "sysinfo", operation = "network"))]
    fn network(&self) -> ProbeResult<RawNetwork> {
        let mut networks = lock(&self.networks, "sysinfo networks")?;
        networks.refresh(true);
        if networks.list().is_empty() {
            return Err(ProbeError::NoData("no interfaces listed".into()));
        }
        Ok(networks.list().values().fold(
            RawNetwork {
                received: 0,
                transmitted: 0,
                packets_received: 0,
                packets_transmitted: 0,
            },
            |acc, data| RawNetwork {
                received: acc.received.saturating_add(data.total_received()),
                transmitted: acc.transmitted.saturating_add(data.total_transmitted()),
                packets_received: acc
                    .packets_received
                    .saturating_add(data.total_packets_received()),
                packets_transmitted: acc
                    .packets_transmitted
                    .saturating_add(data.total_packets_transmitted()),
            },
        ))
    }

    #[instrument(skip(self), fields(probe = "sysinfo", operation = "battery"))]
    fn battery(&self) -> ProbeResult<Option<RawBattery>> {
        #[cfg(target_os = "linux")]
        {
            linux::read_battery(std::path::Path::new(linux::POWER_SUPPLY_ROOT))
        }
        #[cfg(not(target_os = "linux"))]
        Err(ProbeError::Unsupported("battery"))
    }

    #[instrument(skip(self), fields(probe = "sysinfo", operation = "processes"))]
    fn processes(&self) -> ProbeResult<ProcessTable> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProbeError::Unsupported("processes"));
        }
        let mut guard = lock(&self.state, "sysinfo")?;
        let SysState {
            sys,
            process_window,
            ..
        } = &mut *guard;
        process_window.refresh_with(|| {
            sys.refresh_processes(ProcessesToUpdate::All, true);
        });
        sys.refresh_memory();

        let mut processes: Vec<RawProcess> = sys
            .processes()
            .values()
            .map(|p| RawProcess {
                pid: p.pid().as_u32(),
                name: p.name().to_string_lossy().into_owned(),
                cpu_usage: p.cpu_usage(),
                memory_bytes: p.memory(),
            })
            .collect();
        // sysinfo keeps processes in a map; pid order gives a stable enumeration.
        processes.sort_by_key(|p| p.pid);

        Ok(ProcessTable {
            total_memory: sys.total_memory(),
            processes,
        })
    }
}
