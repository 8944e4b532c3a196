// ABOUTME: Deferred job queue and its single background worker
// ABOUTME: FIFO of zero-argument async jobs consumed one at a time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Jobs
//!
//! Trigger handlers push [`Job`]s; a single [`Worker`] task pops and awaits
//! them in order. Because there is exactly one consumer, a long job (the
//! event session) holds up everything queued behind it.

mod queue;
mod worker;

pub use queue::{Job, JobQueue};
pub use worker::Worker;
