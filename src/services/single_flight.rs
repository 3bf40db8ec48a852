//! Promise cache keyed by an arbitrary key.
//!
//! Concurrent callers for the same key share one execution of the task and
//! all receive a clone of its output. The entry is dropped once the task
//! settles, so the next call after that runs the task again.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

struct InFlight<T: Clone> {
    generation: u64,
    task: Shared<BoxFuture<'static, T>>,
}

type InFlightMap<K, T> = Arc<Mutex<HashMap<K, InFlight<T>>>>;

/// Single-flight execution of async tasks, keyed by `K`.
pub struct SingleFlight<K, T: Clone> {
    in_flight: InFlightMap<K, T>,
    generation: AtomicU64,
}

impl<K, T: Clone> std::fmt::Debug for SingleFlight<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<K, T> Default for SingleFlight<K, T>
where
    K: Eq + Hash + Clone + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> SingleFlight<K, T>
where
    K: Eq + Hash + Clone + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Empty cache.
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    /// Run `make()` for `key` unless a task for `key` is already in flight,
    /// in which case wait for that task's output instead.
    pub async fn run<F, Fut>(&self, key: K, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let task = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(existing) = in_flight.get(&key) {
                existing.task.clone()
            } else {
                let generation = self.generation.fetch_add(1, Ordering::Relaxed);
                let registry = Arc::clone(&self.in_flight);
                let settle_key = key.clone();
                let work = make();
                let task = async move {
                    let output = work.await;
                    let mut in_flight = registry.lock().await;
                    if in_flight
                        .get(&settle_key)
                        .is_some_and(|entry| entry.generation == generation)
                    {
                        in_flight.remove(&settle_key);
                    }
                    output
                }
                .boxed()
                .shared();
                in_flight.insert(
                    key,
                    InFlight {
                        generation,
                        task: task.clone(),
                    },
                );
                task
            }
        };
        task.await
    }

    /// Whether a task for `key` has started and not yet settled.
    pub async fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.lock().await.contains_key(key)
    }

    /// Number of keys with a task in flight.
    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_execution() {
        let flight: Arc<SingleFlight<u64, usize>> = Arc::new(SingleFlight::new());
        let runs = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let flight = Arc::clone(&flight);
            let runs = Arc::clone(&runs);
            handles.push(tokio::spawn(async move {
                flight
                    .run(7, move || async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        runs.fetch_add(1, Ordering::SeqCst) + 1
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(flight.in_flight_count().await, 0);
    }

    #[tokio::test]
    async fn test_settled_task_runs_again() {
        let flight: SingleFlight<&'static str, u32> = SingleFlight::new();
        assert_eq!(flight.run("a", || async { 1 }).await, 1);
        assert!(!flight.is_in_flight(&"a").await);
        assert_eq!(flight.run("a", || async { 2 }).await, 2);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_share() {
        let flight: SingleFlight<u64, u64> = SingleFlight::new();
        let (a, b) = tokio::join!(
            flight.run(1, || async { 10 }),
            flight.run(2, || async { 20 })
        );
        assert_eq!((a, b), (10, 20));
    }
}
