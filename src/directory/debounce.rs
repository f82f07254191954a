use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Keyed trailing debounce.
///
/// [`Debouncer::schedule`] arms (or re-arms) the timer for a key; the task
/// runs only if the window elapses without a newer schedule for that key.
/// Superseded timers wake and exit without running anything, so per key at
/// most one task ever starts per quiet window, and a task that has already
/// started is never interrupted.
#[derive(Debug)]
pub struct Debouncer<K> {
    delay: Duration,
    counter: AtomicU64,
    generations: Arc<Mutex<HashMap<K, u64>>>,
}

impl<K: Eq + Hash + Clone + Send + 'static> Debouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            counter: AtomicU64::new(0),
            generations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arm the timer for `key`. The handle resolves to `true` when the task
    /// ran and `false` when a later schedule (or a cancel) superseded this
    /// one.
    pub fn schedule<F, Fut>(&self, key: K, task: F) -> JoinHandle<bool>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        self.lock().insert(key.clone(), generation);

        let delay = self.delay;
        let generations = Arc::clone(&self.generations);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut map = generations.lock().unwrap_or_else(PoisonError::into_inner);
                if map.get(&key).copied() != Some(generation) {
                    return false;
                }
                map.remove(&key);
            }
            task().await;
            true
        })
    }

    /// Disarm any pending timer for `key`. A task that already started is
    /// unaffected.
    pub fn cancel(&self, key: &K) {
        self.lock().remove(key);
    }

    pub fn cancel_all(&self) {
        self.lock().clear();
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, u64>> {
        self.generations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
