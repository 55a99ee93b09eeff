// Snapshot collector: every probe runs isolated, then results are assembled into one snapshot.

use crate::derivation;
use crate::models::{
    DiskInfo, DiskIoCounters, HostIdentity, NetworkCounters, SystemInfo, SystemSnapshot,
};
use crate::probe::{Probe, ProbeError, ProbeResult, UNKNOWN};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Collector knobs, built from [`crate::config::AppConfig`].
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    /// How many processes to keep, ranked by CPU.
    pub top_n: usize,
    /// Upper bound per probe call; a probe that overruns degrades its category.
    pub probe_timeout: Duration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            top_n: 5,
            probe_timeout: Duration::from_secs(5),
        }
    }
}

/// Operations whose blocking task is still running, shared by every clone of a collector.
#[derive(Clone, Default)]
struct InFlight(Arc<Mutex<HashSet<&'static str>>>);

impl InFlight {
    /// Marks `operation` as running; `None` if an earlier call to it has not returned yet.
    fn claim(&self, operation: &'static str) -> Option<InFlightGuard> {
        let mut running = self.0.lock().unwrap_or_else(|e| e.into_inner());
        running.insert(operation).then(|| InFlightGuard {
            set: self.clone(),
            operation,
        })
    }
}

/// Released when the blocking task finishes, not when the caller stops waiting for it.
struct InFlightGuard {
    set: InFlight,
    operation: &'static str,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut running = self.set.0.lock().unwrap_or_else(|e| e.into_inner());
        running.remove(self.operation);
    }
}

/// Snapshots do not depend on earlier ones: each `collect` queries the probe afresh. The only
/// state kept across calls is which probe calls are still stuck from a timed-out collection.
#[derive(Clone)]
pub struct Collector {
    probe: Arc<dyn Probe>,
    settings: CollectorSettings,
    in_flight: InFlight,
}

impl Collector {
    pub fn new(probe: Arc<dyn Probe>, settings: CollectorSettings) -> Self {
        Self {
            probe,
            settings,
            in_flight: InFlight::default(),
        }
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    /// Never fails as a whole; unavailable categories come back as `None` or empty.
    #[instrument(skip(self), fields(operation = "collect"))]
    pub async fn collect(&self) -> SystemSnapshot {
        let identity = self
            .run("identity", |p| Ok(p.identity()))
            .await
            .unwrap_or_else(fallback_identity);

        let boot_time = self.run("boot_time", |p| p.boot_time()).await;
        let now = chrono::Utc::now();
        let uptime_secs = boot_time.map(|boot| {
            derivation::uptime_secs(now.timestamp(), i64::try_from(boot).unwrap_or(i64::MAX))
        });
        let uptime = uptime_secs
            .map(derivation::format_duration)
            .unwrap_or_else(|| derivation::UNKNOWN_DURATION.into());

        let cpu = self
            .run("cpu", |p| p.cpu())
            .await
            .map(|raw| derivation::cpu_info(&raw));
        let memory = self
            .run("memory", |p| p.memory())
            .await
            .map(|raw| derivation::memory_info(&raw));

        let disks = self.run("disks", collect_disks).await.unwrap_or_default();

        let disk_io = self
            .run("disk_io", |p| p.disk_io())
            .await
            .map(|raw| DiskIoCounters {
                read_bytes: raw.read_bytes,
                write_bytes: raw.written_bytes,
                read_gb: derivation::bytes_to_gb(raw.read_bytes),
                write_gb: derivation::bytes_to_gb(raw.written_bytes),
            });
        let network = self
            .run("network", |p| p.network())
            .await
            .map(|raw| NetworkCounters {
                bytes_sent: raw.transmitted,
                bytes_recv: raw.received,
                packets_sent: raw.packets_transmitted,
                packets_recv: raw.packets_received,
                sent_mb: derivation::bytes_to_mb(raw.transmitted),
                recv_mb: derivation::bytes_to_mb(raw.received),
            });

        let battery = self
            .run("battery", |p| p.battery())
            .await
            .flatten()
            .map(|raw| derivation::battery_info(&raw));

        let top_n = self.settings.top_n;
        let processes = self
            .run("processes", |p| p.processes())
            .await
            .map(|table| derivation::top_n(derivation::process_samples(&table), top_n))
            .unwrap_or_default();

        SystemSnapshot {
            timestamp: u64::try_from(now.timestamp_millis()).unwrap_or(0),
            system: SystemInfo {
                identity,
                boot_time,
                uptime_secs,
                uptime,
            },
            cpu,
            memory,
            disks,
            disk_io,
            network,
            battery,
            processes,
        }
    }

    /// Runs one probe query on the blocking pool under the configured timeout. A query whose
    /// previous call timed out and is still blocked is skipped rather than stacked behind it.
    async fn run<T, F>(&self, operation: &'static str, query: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Probe) -> ProbeResult<T> + Send + 'static,
    {
        let Some(guard) = self.in_flight.claim(operation) else {
            warn!(operation, "previous probe call still running, skipped");
            return None;
        };
        let probe = self.probe.clone();
        let task = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            query(probe.as_ref())
        });
        match tokio::time::timeout(self.settings.probe_timeout, task).await {
            Ok(Ok(Ok(value))) => Some(value),
            Ok(Ok(Err(e))) => {
                log_unavailable(operation, &e);
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, operation, "probe task failed");
                None
            }
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.settings.probe_timeout.as_millis() as u64,
                    "probe timed out"
                );
                None
            }
        }
    }
}

/// Lists partitions and reads each one's usage. A partition whose usage fails is skipped on its
/// own; the others are kept in enumeration order. Only a failed listing fails the category.
pub fn collect_disks(probe: &dyn Probe) -> ProbeResult<Vec<DiskInfo>> {
    let partitions = probe.partitions()?;
    Ok(partitions
        .iter()
        .filter_map(|partition| match probe.partition_usage(partition) {
            Ok(usage) => Some(derivation::disk_info(partition, &usage)),
            Err(e) => {
                if e.is_expected() {
                    debug!(
                        error = %e,
                        device = %partition.device,
                        mountpoint = %partition.mountpoint.display(),
                        "partition skipped"
                    );
                } else {
                    warn!(
                        error = %e,
                        device = %partition.device,
                        mountpoint = %partition.mountpoint.display(),
                        "partition skipped"
                    );
                }
                None
            }
        })
        .collect())
}

fn log_unavailable(operation: &'static str, e: &ProbeError) {
    if e.is_expected() {
        debug!(error = %e, operation, "probe unavailable");
    } else {
        warn!(error = %e, operation, "probe failed");
    }
}

/// Used only when the identity probe itself cannot finish (e.g. a hung hostname lookup).
fn fallback_identity() -> HostIdentity {
    HostIdentity {
        hostname: UNKNOWN.into(),
        ip: UNKNOWN.into(),
        os: std::env::consts::OS.into(),
        os_version: UNKNOWN.into(),
        kernel_version: UNKNOWN.into(),
        architecture: std::env::consts::ARCH.into(),
        processor: UNKNOWN.into(),
    }
}
