//! Batch scheduler: run probes for many servers with bounded parallelism.

use crate::board::ResultBoard;
use crate::probe::Prober;
use mcpswitch_core::{ProbeResult, ServerEntry};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Fixed worker-pool width. The effective pool is the lesser of this and
/// the number of targets.
pub const MAX_CONCURRENT_PROBES: usize = 3;

/// Which servers a batch run targets, evaluated against current results at
/// the instant the batch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Enabled servers with no existing terminal result.
    TestEnabled,
    /// All enabled servers, regardless of existing result.
    RetestEnabled,
    /// Every server with no existing terminal result.
    TestAll,
    /// Every server, unconditionally.
    RetestAll,
}

impl BatchPolicy {
    const fn selects(self, enabled: bool, tested: bool) -> bool {
        match self {
            Self::TestEnabled => enabled && !tested,
            Self::RetestEnabled => enabled,
            Self::TestAll => !tested,
            Self::RetestAll => true,
        }
    }

    /// The policy's wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TestEnabled => "test-enabled",
            Self::RetestEnabled => "retest-enabled",
            Self::TestAll => "test-all",
            Self::RetestAll => "retest-all",
        }
    }
}

impl FromStr for BatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test-enabled" => Ok(Self::TestEnabled),
            "retest-enabled" => Ok(Self::RetestEnabled),
            "test-all" => Ok(Self::TestAll),
            "retest-all" => Ok(Self::RetestAll),
            other => Err(format!(
                "unknown batch policy '{other}' (expected test-enabled, retest-enabled, test-all or retest-all)"
            )),
        }
    }
}

impl std::fmt::Display for BatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs batches of probes over a fixed-size worker pool.
///
/// A scheduler-level running flag prevents overlapping batches: invoking
/// `run` while one is in flight returns immediately without effect.
pub struct BatchRunner {
    board: ResultBoard,
    prober: Arc<dyn Prober>,
    extra_paths: Vec<String>,
    running: Arc<AtomicBool>,
}

impl BatchRunner {
    #[must_use]
    pub fn new(board: ResultBoard, prober: Arc<dyn Prober>, extra_paths: Vec<String>) -> Self {
        Self {
            board,
            prober,
            extra_paths,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a batch is currently in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Probe one server outside any batch: mark it testing, probe, record.
    pub async fn run_one(&self, server: &ServerEntry) -> ProbeResult {
        self.board
            .set(server.name.clone(), ProbeResult::Testing)
            .await;
        let result = self
            .prober
            .probe(&server.descriptor, &self.extra_paths)
            .await;
        self.board.set(server.name.clone(), result.clone()).await;
        result
    }

    /// Run a batch under the given policy. Returns how many servers were
    /// probed (0 when the target list was empty or a batch was already
    /// running).
    pub async fn run(&self, servers: &[ServerEntry], policy: BatchPolicy) -> usize {
        if self.running.swap(true, Ordering::SeqCst) {
            return 0;
        }

        // Select targets once; a concurrent mutation of the server set does
        // not change this batch
        let snapshot = self.board.snapshot().await;
        let targets: Vec<ServerEntry> = servers
            .iter()
            .filter(|server| {
                let tested = snapshot
                    .get(&server.name)
                    .is_some_and(ProbeResult::is_terminal);
                policy.selects(server.enabled, tested)
            })
            .cloned()
            .collect();

        if targets.is_empty() {
            self.running.store(false, Ordering::SeqCst);
            return 0;
        }

        tracing::info!(policy = %policy, targets = targets.len(), "Starting batch probe");

        // All spinners show up at once
        let names: Vec<String> = targets.iter().map(|t| t.name.clone()).collect();
        self.board.mark_testing(&names).await;

        let targets = Arc::new(targets);
        let next = Arc::new(AtomicUsize::new(0));
        let width = targets.len().min(MAX_CONCURRENT_PROBES);

        let mut workers = Vec::with_capacity(width);
        for _ in 0..width {
            let targets = Arc::clone(&targets);
            let next = Arc::clone(&next);
            let board = self.board.clone();
            let prober = Arc::clone(&self.prober);
            let extra_paths = self.extra_paths.clone();

            workers.push(tokio::spawn(async move {
                loop {
                    let index = next.fetch_add(1, Ordering::SeqCst);
                    let Some(target) = targets.get(index) else {
                        break;
                    };
                    let result = prober.probe(&target.descriptor, &extra_paths).await;
                    board.set(target.name.clone(), result).await;
                }
            }));
        }

        for worker in workers {
            if let Err(e) = worker.await {
                tracing::warn!(error = %e, "Batch worker aborted");
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!(policy = %policy, "Batch probe finished");
        targets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_parse_from_wire_names() {
        assert_eq!(
            "test-enabled".parse::<BatchPolicy>().unwrap(),
            BatchPolicy::TestEnabled
        );
        assert_eq!(
            "retest-all".parse::<BatchPolicy>().unwrap(),
            BatchPolicy::RetestAll
        );
        assert!("everything".parse::<BatchPolicy>().is_err());
    }

    #[test]
    fn policy_selection_matrix() {
        use BatchPolicy::{RetestAll, RetestEnabled, TestAll, TestEnabled};

        // (enabled, tested)
        assert!(TestEnabled.selects(true, false));
        assert!(!TestEnabled.selects(true, true));
        assert!(!TestEnabled.selects(false, false));

        assert!(RetestEnabled.selects(true, true));
        assert!(!RetestEnabled.selects(false, true));

        assert!(TestAll.selects(false, false));
        assert!(!TestAll.selects(false, true));

        assert!(RetestAll.selects(false, true));
        assert!(RetestAll.selects(true, false));
    }
}
