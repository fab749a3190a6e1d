// orchestrator/src/cache.rs

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    question: String,
    persona: String,
}

impl CacheKey {
    fn new(question: &str, persona: &str) -> Self {
        Self { question: question.to_string(), persona: persona.to_string() }
    }
}

/// Unbounded memo of answers keyed by the exact (question, persona) pair.
///
/// Each key owns a `OnceCell`, so concurrent callers for the same key wait on
/// a single computation instead of racing. A failed computation removes its
/// empty cell once no other caller is waiting on it, so the map only ever
/// holds answers and in-flight work. Stored answers are never evicted.
#[derive(Debug, Default)]
pub struct MemoCache {
    entries: Mutex<HashMap<CacheKey, Arc<OnceCell<String>>>>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<OnceCell<String>>>> {
        // A panic elsewhere cannot leave the map half-written; keep serving.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, question: &str, persona: &str) -> Arc<OnceCell<String>> {
        self.lock()
            .entry(CacheKey::new(question, persona))
            .or_default()
            .clone()
    }

    pub fn get(&self, question: &str, persona: &str) -> Option<String> {
        self.lock()
            .get(&CacheKey::new(question, persona))
            .and_then(|cell| cell.get().cloned())
    }

    pub fn contains(&self, question: &str, persona: &str) -> bool {
        self.get(question, persona).is_some()
    }

    /// Number of stored answers.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map entries, including cells still being computed.
    pub(crate) fn slot_count(&self) -> usize {
        self.lock().len()
    }

    // Called after a failed computation. Waiters still holding the cell will
    // retry in it, so it stays until the last of them gives up.
    fn discard_if_empty(&self, question: &str, persona: &str, slot: &Arc<OnceCell<String>>) {
        let mut entries = self.lock();
        let key = CacheKey::new(question, persona);
        let stale = entries
            .get(&key)
            .is_some_and(|cell| Arc::ptr_eq(cell, slot) && !cell.initialized() && Arc::strong_count(cell) == 2);
        if stale {
            entries.remove(&key);
        }
    }

    /// Returns the stored answer, or runs `init` once to produce and store it.
    pub async fn get_or_try_init<F, Fut, E>(&self, question: &str, persona: &str, init: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        // The map lock is released before awaiting; only the cell is shared.
        let slot = self.slot(question, persona);
        let result = slot.get_or_try_init(init).await.cloned();
        if result.is_err() {
            self.discard_if_empty(question, persona, &slot);
        }
        result
    }
}
