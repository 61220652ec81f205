//! The periodic probe→apply→render→write driver.

use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::{Config, ZoneConfig};
use crate::health::HealthProber;
use crate::observability::metrics;
use crate::registry::Registry;
use crate::zone::{self, ZoneWriter};

/// Drives the reconciliation pipeline on a fixed interval.
#[derive(Debug, Clone)]
pub struct Reconciler {
    registry: Registry,
    prober: HealthProber,
    zone_config: ZoneConfig,
    writer: ZoneWriter,
    interval: Duration,
}

impl Reconciler {
    /// Build a reconciler over `registry` from the service configuration.
    pub fn new(registry: Registry, config: &Config) -> Self {
        Self {
            registry,
            prober: HealthProber::new(config.health_check.clone()),
            zone_config: config.zone.clone(),
            writer: ZoneWriter::new(&config.zone.output_path),
            interval: Duration::from_millis(config.health_check.interval_ms),
        }
    }

    /// Run the timer loop until the shutdown signal arrives.
    ///
    /// Cycles execute one at a time; a cycle that outlives the interval
    /// delays the next tick rather than racing a second pass against the
    /// same eviction decisions. A fault inside one cycle is contained and
    /// logged, and the loop stays on schedule.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            error_threshold = self.registry.error_threshold(),
            zone_path = %self.writer.path().display(),
            "reconciler starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick fires immediately; skip it so the initial
        // pass happens one interval after startup, like the legacy timer.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let cycle = self.clone();
                    if !contain_cycle(async move { cycle.run_cycle().await }).await {
                        break;
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("reconciler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One reconciliation pass: snapshot, probe, apply verdicts, render
    /// the surviving set, publish.
    pub async fn run_cycle(&self) -> std::io::Result<()> {
        let start = Instant::now();

        let snapshot = self.registry.snapshot();
        tracing::info!(services = snapshot.len(), "reconciliation tick");

        let verdicts = self.prober.probe_all(&snapshot).await;
        let failures = verdicts.values().filter(|healthy| !**healthy).count();
        metrics::record_probe_failures(failures);

        let evicted = self.registry.apply_probe_results(&verdicts);
        for key in &evicted {
            tracing::info!(key = %key, "evicted unreachable service");
        }
        metrics::record_evictions(evicted.len());

        let live = self.registry.snapshot();
        let text = zone::render(&live, chrono::Local::now().naive_local(), &self.zone_config);
        self.writer.publish(&text).await?;

        metrics::record_zone_publish(true);
        metrics::record_registry_size(live.len());
        metrics::record_reconcile_duration(start);
        Ok(())
    }
}

/// Await one cycle in its own task so a panic inside it cannot unwind
/// through the timer loop. Returns false only when the task was cancelled,
/// which means the runtime is coming down.
async fn contain_cycle<F>(cycle: F) -> bool
where
    F: std::future::Future<Output = std::io::Result<()>> + Send + 'static,
{
    match tokio::spawn(cycle).await {
        Ok(Ok(())) => true,
        Ok(Err(error)) => {
            metrics::record_zone_publish(false);
            tracing::warn!(%error, "failed to publish zone file; retrying next cycle");
            true
        }
        Err(join_error) if join_error.is_panic() => {
            tracing::error!(%join_error, "reconciliation cycle panicked; continuing");
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::lifecycle::Shutdown;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    static NEXT_ID: AtomicU32 = AtomicU32::new(0);

    struct BackendStats {
        accepts: AtomicUsize,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    /// A backend that answers 200 after `delay` and tracks how many probe
    /// connections were ever in flight at once.
    async fn start_counting_backend(delay: Duration) -> (std::net::SocketAddr, Arc<BackendStats>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let stats = Arc::new(BackendStats {
            accepts: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        });

        let shared = stats.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let shared = shared.clone();
                tokio::spawn(async move {
                    shared.accepts.fetch_add(1, Ordering::SeqCst);
                    let in_flight = shared.active.fetch_add(1, Ordering::SeqCst) + 1;
                    shared.max_active.fetch_max(in_flight, Ordering::SeqCst);
                    tokio::time::sleep(delay).await;
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                        )
                        .await;
                    let _ = socket.shutdown().await;
                    shared.active.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        (addr, stats)
    }

    fn test_config(threshold: u32) -> (Config, PathBuf) {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let zone_path = std::env::temp_dir().join(format!(
            "zonekeeper-reconcile-{}-{}",
            std::process::id(),
            id
        ));
        let mut config = Config::default();
        config.registry.error_threshold = threshold;
        config.health_check.timeout_secs = 1;
        config.zone.output_path = zone_path.to_string_lossy().into_owned();
        (config, zone_path)
    }

    #[tokio::test]
    async fn unreachable_service_is_evicted_after_threshold_cycles() {
        let (config, zone_path) = test_config(2);
        let registry = Registry::new(config.registry.error_threshold);
        // Nothing listens on port 1; every probe fails fast.
        registry.upsert("dead", "127.0.0.1".parse().unwrap(), 1);

        let reconciler = Reconciler::new(registry.clone(), &config);

        reconciler.run_cycle().await.unwrap();
        assert_eq!(registry.len(), 1);
        let zone = tokio::fs::read_to_string(&zone_path).await.unwrap();
        assert!(zone.contains("dead\tIN A\t127.0.0.1"));

        reconciler.run_cycle().await.unwrap();
        assert!(registry.is_empty());
        let zone = tokio::fs::read_to_string(&zone_path).await.unwrap();
        assert!(!zone.contains("dead"));

        let _ = tokio::fs::remove_file(&zone_path).await;
    }

    #[tokio::test]
    async fn empty_registry_still_publishes_a_zone() {
        let (config, zone_path) = test_config(5);
        let registry = Registry::new(config.registry.error_threshold);
        let reconciler = Reconciler::new(registry, &config);

        reconciler.run_cycle().await.unwrap();

        let zone = tokio::fs::read_to_string(&zone_path).await.unwrap();
        assert!(zone.starts_with("$ORIGIN example.net.\n"));

        let _ = tokio::fs::remove_file(&zone_path).await;
    }

    #[tokio::test]
    async fn write_failure_surfaces_as_an_error_not_a_panic() {
        let (mut config, _) = test_config(5);
        config.zone.output_path = "/nonexistent-dir-for-test/zones".to_string();
        let registry = Registry::new(config.registry.error_threshold);
        let reconciler = Reconciler::new(registry, &config);

        assert!(reconciler.run_cycle().await.is_err());
    }

    #[tokio::test]
    async fn panicking_cycle_is_contained_at_the_join_point() {
        // A panic inside a cycle must not unwind into the caller, and the
        // loop must be told to keep going.
        assert!(contain_cycle(async { panic!("cycle exploded") }).await);
        // Same for a plain publish error.
        assert!(
            contain_cycle(async {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            })
            .await
        );
        assert!(contain_cycle(async { Ok(()) }).await);
    }

    #[tokio::test]
    async fn slow_cycles_never_overlap() {
        let (mut config, zone_path) = test_config(10);
        config.health_check.interval_ms = 100;
        // Each probe outlives the tick interval by a factor of three.
        let (backend, stats) = start_counting_backend(Duration::from_millis(300)).await;

        let registry = Registry::new(config.registry.error_threshold);
        registry.upsert("slow", backend.ip(), backend.port());
        let reconciler = Reconciler::new(registry, &config);

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(reconciler.run(shutdown.subscribe()));
        tokio::time::sleep(Duration::from_millis(1200)).await;
        shutdown.trigger();
        let _ = handle.await;

        assert!(
            stats.accepts.load(Ordering::SeqCst) >= 2,
            "multiple cycles should have run"
        );
        assert_eq!(
            stats.max_active.load(Ordering::SeqCst),
            1,
            "a cycle that outlives the interval must delay the next one"
        );

        let _ = tokio::fs::remove_file(&zone_path).await;
    }

    #[tokio::test]
    async fn loop_stays_on_schedule_when_cycles_fault() {
        let (mut config, _) = test_config(10);
        config.health_check.interval_ms = 100;
        // Every publish fails, so every cycle ends in an error.
        config.zone.output_path = "/nonexistent-dir-for-test/zones".to_string();
        let (backend, stats) = start_counting_backend(Duration::ZERO).await;

        let registry = Registry::new(config.registry.error_threshold);
        registry.upsert("svc", backend.ip(), backend.port());
        let reconciler = Reconciler::new(registry, &config);

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(reconciler.run(shutdown.subscribe()));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        shutdown.trigger();
        let _ = handle.await;

        assert!(
            stats.accepts.load(Ordering::SeqCst) >= 3,
            "faulting cycles must not stop the timer loop"
        );
    }
}
