// Background sampler: collects on a fixed cadence and publishes whole snapshots to a shared cache.
// Request handlers only ever read the cache, so CPU measurement never blocks a request.

use crate::collector::Collector;
use crate::models::SystemSnapshot;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Latest published snapshot. Replaced as a whole `Arc`, so readers never see a half-updated one.
#[derive(Clone, Default)]
pub struct SnapshotCache {
    inner: Arc<RwLock<Option<Arc<SystemSnapshot>>>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first sample lands.
    pub async fn latest(&self) -> Option<Arc<SystemSnapshot>> {
        self.inner.read().await.clone()
    }

    pub async fn publish(&self, snapshot: SystemSnapshot) {
        let snapshot = Arc::new(snapshot);
        *self.inner.write().await = Some(snapshot);
    }
}

/// Collector, cache, and shutdown for the sampler.
pub struct SamplerDeps {
    pub collector: Collector,
    pub cache: SnapshotCache,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Sampler timing and logging config.
pub struct SamplerConfig {
    pub sample_interval_ms: u64,
    /// How often to log sampler stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Spawns the sampler. It exits when `shutdown_rx` fires or its sender is dropped.
pub fn spawn(deps: SamplerDeps, config: SamplerConfig) -> tokio::task::JoinHandle<()> {
    let SamplerDeps {
        collector,
        cache,
        mut shutdown_rx,
    } = deps;
    let SamplerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
    } = config;

    let sampler_span = tracing::span!(tracing::Level::DEBUG, "sampler", sample_interval_ms);

    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_millis(sample_interval_ms));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            let mut samples_total: u64 = 0;
            let mut last_collect_ms: u64 = 0;

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let started = Instant::now();
                        let snapshot = collector.collect().await;
                        last_collect_ms = started.elapsed().as_millis() as u64;
                        cache.publish(snapshot).await;
                        samples_total += 1;
                        tracing::debug!(
                            operation = "publish_snapshot",
                            collect_ms = last_collect_ms,
                            "Snapshot published"
                        );
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Sampler shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(samples_total, last_collect_ms, "sampler stats");
                    }
                }
            }
        }
        .instrument(sampler_span),
    )
}
