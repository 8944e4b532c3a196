// ABOUTME: Thread-safe FIFO of deferred jobs with a bounded-wait pop
// ABOUTME: Push never blocks; pop waits at most the shared polling interval
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use notifier_core::constants::timing::POLL_INTERVAL;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::timeout;
use tracing::info;

/// Zero-argument unit of deferred work
pub struct Job {
    name: &'static str,
    task: Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>,
}

impl Job {
    /// Wrap an async closure as a job. `name` only labels log lines.
    pub fn new<F, Fut>(name: &'static str, task: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            name,
            task: Box::new(move || task().boxed()),
        }
    }

    /// Label given at construction
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Consume the job and run it to completion
    pub async fn run(self) {
        (self.task)().await;
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// FIFO job queue shared between producers and the worker
#[derive(Debug, Default)]
pub struct JobQueue {
    jobs: Mutex<VecDeque<Job>>,
    available: Notify,
}

impl JobQueue {
    /// Empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn jobs(&self) -> MutexGuard<'_, VecDeque<Job>> {
        // A panic while holding the lock cannot leave the deque half-updated
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `job` to the tail and wake one waiting consumer
    pub fn push(&self, job: Job) {
        info!("Pushing job... ({})", job.name());
        self.jobs().push_back(job);
        self.available.notify_one();
    }

    /// Wait up to [`POLL_INTERVAL`] for a job and take it from the head
    pub async fn pop(&self) -> Option<Job> {
        self.pop_with_timeout(POLL_INTERVAL).await
    }

    /// Wait up to `wait` for a job and take it from the head.
    ///
    /// Returns `None` on timeout, or when another consumer took the job
    /// this call was woken for.
    pub async fn pop_with_timeout(&self, wait: Duration) -> Option<Job> {
        if let Some(job) = self.take_head() {
            return Some(job);
        }

        // A push that lands between take_head and here leaves a permit behind,
        // so the wakeup is not lost.
        let _ = timeout(wait, self.available.notified()).await;
        self.take_head()
    }

    fn take_head(&self) -> Option<Job> {
        let job = self.jobs().pop_front();
        if let Some(job) = &job {
            info!("Popping job... ({})", job.name());
        }
        job
    }

    /// Number of queued jobs
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs().len()
    }

    /// Whether no job is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_pop_empty_times_out() {
        let queue = JobQueue::new();
        let started = Instant::now();
        let job = queue.pop_with_timeout(Duration::from_millis(50)).await;
        assert!(job.is_none());
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_push_wakes_waiting_pop() {
        let queue = Arc::new(JobQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop_with_timeout(Duration::from_secs(5)).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        let started = Instant::now();
        queue.push(Job::new("wake", || async {}));

        let job = consumer.await.unwrap();
        assert_eq!(job.map(|j| j.name()), Some("wake"));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_len_tracks_push_and_pop() {
        let queue = JobQueue::new();
        assert!(queue.is_empty());
        queue.push(Job::new("a", || async {}));
        queue.push(Job::new("b", || async {}));
        assert_eq!(queue.len(), 2);
        let _ = queue.pop_with_timeout(Duration::from_millis(10)).await;
        assert_eq!(queue.len(), 1);
    }
}
