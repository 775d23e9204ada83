// src/repositories/observation.rs
//
// Table-level change observation.
//
// Each SQLite repository owns a ChangeNotifier and bumps it after every
// committed write. An Observation re-runs its query whenever the revision
// moves, so subscribers always see committed state, never a half-written
// page.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::AppResult;

#[derive(Clone)]
pub struct ChangeNotifier {
    tx: Arc<watch::Sender<u64>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    pub fn notify(&self) {
        self.tx.send_modify(|revision| *revision += 1);
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.tx.borrow()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

type Query<T> = Box<dyn Fn() -> AppResult<T> + Send + Sync>;

/// A live query over one table.
pub struct Observation<T> {
    rx: watch::Receiver<u64>,
    query: Query<T>,
}

impl<T: 'static> Observation<T> {
    pub fn new<F>(notifier: &ChangeNotifier, query: F) -> Self
    where
        F: Fn() -> AppResult<T> + Send + Sync + 'static,
    {
        Self {
            rx: notifier.subscribe(),
            query: Box::new(query),
        }
    }

    /// Current value; marks the current revision as seen.
    pub fn current(&mut self) -> AppResult<T> {
        self.rx.borrow_and_update();
        (self.query)()
    }

    /// Waits for the next committed change and re-queries.
    ///
    /// Returns `None` once the owning repository is gone.
    pub async fn changed(&mut self) -> Option<AppResult<T>> {
        self.rx.changed().await.ok()?;
        Some((self.query)())
    }

    pub fn map<U, F>(self, f: F) -> Observation<U>
    where
        U: 'static,
        F: Fn(T) -> AppResult<U> + Send + Sync + 'static,
    {
        let query = self.query;
        Observation {
            rx: self.rx,
            query: Box::new(move || query().and_then(&f)),
        }
    }
}
