use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use utoipa::ToSchema;

const WINDOW: Duration = Duration::from_secs(60);

/// Shared counter of upstream weather calls, for watching API quota use.
#[derive(Clone, Default)]
pub struct UpstreamCallStats {
    inner: Arc<Mutex<StatsInner>>,
}

#[derive(Default)]
struct StatsInner {
    call_times: Vec<Instant>,
    last_batch_size: usize,
}

/// Snapshot served by the monitoring endpoint. Field names match the
/// dashboard that reads them.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonitoringStats {
    pub panggilan_eksternal_per_menit: usize,
    pub panggilan_eksternal_per_fungsi_terakhir: usize,
}

impl UpstreamCallStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_call(&self, batch_size: usize) {
        if let Ok(mut inner) = self.inner.lock() {
            prune(&mut inner.call_times);
            inner.call_times.push(Instant::now());
            inner.last_batch_size = batch_size;
        }
    }

    pub fn snapshot(&self) -> MonitoringStats {
        match self.inner.lock() {
            Ok(mut inner) => {
                prune(&mut inner.call_times);
                MonitoringStats {
                    panggilan_eksternal_per_menit: inner.call_times.len(),
                    panggilan_eksternal_per_fungsi_terakhir: inner.last_batch_size,
                }
            }
            Err(_) => MonitoringStats {
                panggilan_eksternal_per_menit: 0,
                panggilan_eksternal_per_fungsi_terakhir: 0,
            },
        }
    }
}

/// Drop timestamps older than the window. The monotonic clock may be less
/// than a window past its origin shortly after boot; in that case nothing is
/// old enough to prune.
fn prune(call_times: &mut Vec<Instant>) {
    if let Some(cutoff) = Instant::now().checked_sub(WINDOW) {
        call_times.retain(|stamp| *stamp > cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let stats = UpstreamCallStats::new();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.panggilan_eksternal_per_menit, 0);
        assert_eq!(snapshot.panggilan_eksternal_per_fungsi_terakhir, 0);
    }

    #[test]
    fn test_counts_calls_and_last_batch() {
        let stats = UpstreamCallStats::new();
        stats.record_call(12);
        stats.record_call(3);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.panggilan_eksternal_per_menit, 2);
        assert_eq!(snapshot.panggilan_eksternal_per_fungsi_terakhir, 3);
    }

    #[test]
    fn test_recent_calls_survive_pruning() {
        let stats = UpstreamCallStats::new();
        stats.record_call(1);
        stats.record_call(2);

        // Repeated snapshots prune, but in-window timestamps must stay.
        assert_eq!(stats.snapshot().panggilan_eksternal_per_menit, 2);
        assert_eq!(stats.snapshot().panggilan_eksternal_per_menit, 2);
    }

    #[test]
    fn test_clones_share_state() {
        let stats = UpstreamCallStats::new();
        let clone = stats.clone();
        clone.record_call(5);
        assert_eq!(stats.snapshot().panggilan_eksternal_per_menit, 1);
    }
}
