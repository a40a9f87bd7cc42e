//! Shared probe-result board.
//!
//! The only state shared between concurrent workers: a map from server name
//! to its latest [`ProbeResult`]. Every write replaces a whole entry, and
//! readers take snapshots rather than iterating a live structure under
//! mutation.

use mcpswitch_core::ProbeResult;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Name-keyed probe results with whole-entry upserts.
#[derive(Clone, Default)]
pub struct ResultBoard {
    inner: Arc<RwLock<HashMap<String, ProbeResult>>>,
}

impl ResultBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one server's result.
    pub async fn set(&self, name: impl Into<String>, result: ProbeResult) {
        self.inner.write().await.insert(name.into(), result);
    }

    /// Current result for one server.
    pub async fn get(&self, name: &str) -> Option<ProbeResult> {
        self.inner.read().await.get(name).cloned()
    }

    /// Whether the server has a terminal result recorded.
    pub async fn is_terminal(&self, name: &str) -> bool {
        self.inner
            .read()
            .await
            .get(name)
            .is_some_and(ProbeResult::is_terminal)
    }

    /// Point-in-time copy of the whole board.
    pub async fn snapshot(&self) -> HashMap<String, ProbeResult> {
        self.inner.read().await.clone()
    }

    /// Mark every named server `Testing` under one write lock, so observers
    /// see all of them flip at once rather than staggered.
    pub(crate) async fn mark_testing(&self, names: &[String]) {
        let mut map = self.inner.write().await;
        for name in names {
            map.insert(name.clone(), ProbeResult::Testing);
        }
    }

    /// Drop one server's result.
    pub async fn clear(&self, name: &str) {
        self.inner.write().await.remove(name);
    }

    /// Drop everything.
    pub async fn clear_all(&self) {
        self.inner.write().await.clear();
    }
}
