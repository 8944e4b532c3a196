// ABOUTME: Single background worker draining the job queue
// ABOUTME: Runs one job at a time for the lifetime of the process
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::queue::JobQueue;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};

// A panicking job is caught below; under `panic = "abort"` it would take the
// whole process down instead.
#[cfg(not(panic = "unwind"))]
compile_error!("the job worker requires `panic = \"unwind\"` in every build profile");

/// The sole consumer of a [`JobQueue`]
#[derive(Debug, Clone)]
pub struct Worker {
    name: String,
    queue: Arc<JobQueue>,
}

impl Worker {
    /// Worker named `name` draining `queue`
    pub fn new(name: impl Into<String>, queue: Arc<JobQueue>) -> Self {
        Self {
            name: name.into(),
            queue,
        }
    }

    /// Worker name used in log spans
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start the worker loop on its own task.
    ///
    /// The loop never exits on its own; it ends with the runtime or when the
    /// returned handle is aborted.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        let span = info_span!("worker", name = %self.name);
        tokio::spawn(self.run().instrument(span))
    }

    async fn run(self) {
        info!("Starting...");
        loop {
            let Some(job) = self.queue.pop().await else {
                continue;
            };

            let name = job.name();
            // A panicking job ends that job only
            if AssertUnwindSafe(job.run()).catch_unwind().await.is_err() {
                error!("Job {name} panicked");
            }
        }
    }
}
