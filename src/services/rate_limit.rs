use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{Result, SyncError};

/// Staggers concurrently launched requests on a linear schedule:
/// task `n` (1-based) waits `n * per_task_delay` before it may dispatch.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitedScheduler {
    per_task_delay: Duration,
}

impl RateLimitedScheduler {
    pub fn new(per_task_delay: Duration) -> Self {
        Self { per_task_delay }
    }

    pub fn delay_for(&self, task_index: usize) -> Duration {
        let index = u32::try_from(task_index).unwrap_or(u32::MAX);
        self.per_task_delay.saturating_mul(index)
    }

    /// Waits out the delay for `task_index` and returns it.
    pub async fn schedule(&self, task_index: usize, total_tasks: usize) -> Duration {
        let delay = self.delay_for(task_index);
        debug!("task {} of {} waiting {:?}", task_index, total_tasks, delay);
        tokio::time::sleep(delay).await;
        delay
    }

    /// Launches one task per key without waiting on earlier ones. Each task
    /// sleeps its scheduled delay, then takes one of `max_in_flight` permits
    /// for the request itself.
    ///
    /// All-or-fail: the first error is returned and the remaining tasks are
    /// left to finish in the background. Results keep the order of `keys`.
    pub async fn dispatch<K, T, F, Fut>(
        &self,
        keys: Vec<K>,
        max_in_flight: usize,
        task: F,
    ) -> Result<Vec<T>>
    where
        K: Send + 'static,
        T: Send + 'static,
        F: Fn(K) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let total = keys.len();
        let gate = Arc::new(Semaphore::new(max_in_flight.max(1)));
        let mut join_set = JoinSet::new();

        for (index, key) in keys.into_iter().enumerate() {
            let scheduler = *self;
            let gate = Arc::clone(&gate);
            let task = task.clone();

            join_set.spawn(async move {
                scheduler.schedule(index + 1, total).await;
                let _permit = gate
                    .acquire_owned()
                    .await
                    .map_err(|_| SyncError::Task("request gate closed".to_string()))?;
                task(key).await.map(|value| (index, value))
            });
        }

        let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            let outcome = joined
                .map_err(|e| SyncError::Task(e.to_string()))
                .and_then(|result| result);

            match outcome {
                Ok((index, value)) => slots[index] = Some(value),
                Err(e) => {
                    join_set.detach_all();
                    return Err(e);
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
