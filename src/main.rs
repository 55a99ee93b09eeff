use anyhow::Result;
use hostdash::collector::Collector;
use hostdash::config::{AppConfig, SamplingMode};
use hostdash::probe::SysinfoProbe;
use hostdash::routes;
use hostdash::sampler::{self, SamplerDeps, SnapshotCache};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = AppConfig::load()?;

    let probe = Arc::new(SysinfoProbe::new(app_config.cpu_window()));
    let collector = Collector::new(probe, app_config.collector_settings());
    let cache = SnapshotCache::new();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let sampler_handle = match app_config.sampling.mode {
        SamplingMode::Background => Some(sampler::spawn(
            SamplerDeps {
                collector: collector.clone(),
                cache: cache.clone(),
                shutdown_rx,
            },
            app_config.sampler_config(),
        )),
        SamplingMode::OnDemand => None,
    };

    let app = routes::app(collector, cache, app_config.sampling.mode);
    let addr = app_config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("binding {}: {}", addr, e))?;
    tracing::info!(
        mode = ?app_config.sampling.mode,
        top_n = app_config.processes.top_n,
        "Listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    if let Some(handle) = sampler_handle {
        let _ = handle.await;
    }
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
