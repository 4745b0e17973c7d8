// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Per-run measurement: a monotonic transfer timer and primitive-call
//! counters.
//!
//! Counters and timers are values owned by one run and returned with its
//! result - never shared mutable state. The timer brackets exactly the
//! transfer body (loop plus any requested durability flush); endpoint
//! setup, teardown, and buffer allocation are outside it.

use std::time::{Duration, Instant};

/// Category of a primitive transfer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Read,
    Recv,
    Send,
    Sendfile,
    Write,
}

impl CallKind {
    /// Report label for this call category. Part of the external parser
    /// contract.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Read => "ReadCalls",
            Self::Recv => "RecvCalls",
            Self::Send => "SendCalls",
            Self::Sendfile => "SendfileCalls",
            Self::Write => "WriteCalls",
        }
    }
}

/// Ordered per-category call counters for one run.
///
/// Categories appear in the order they are first recorded, which is the
/// order the transfer loop invokes them (pull before push); the report
/// renders them in that same order.
#[derive(Debug, Default)]
pub struct CallCounters {
    entries: Vec<(CallKind, u64)>,
}

impl CallCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a category at count zero. The report prints every declared
    /// category even when the transfer never invoked it (an empty source
    /// still reports `ReadCalls: 0`).
    pub fn declare(&mut self, kind: CallKind) {
        if !self.entries.iter().any(|(k, _)| *k == kind) {
            self.entries.push((kind, 0));
        }
    }

    /// Record one invocation of `kind`.
    pub fn record(&mut self, kind: CallKind) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 += 1;
        } else {
            self.entries.push((kind, 1));
        }
    }

    /// Count recorded for `kind`, zero if never recorded.
    pub fn count(&self, kind: CallKind) -> u64 {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }

    /// Iterate categories in first-recorded order.
    pub fn iter(&self) -> impl Iterator<Item = (CallKind, u64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Monotonic timer for the transfer body.
pub struct TransferTimer {
    start: Instant,
}

impl TransferTimer {
    /// Start the timer. Call immediately before the first pull.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return the elapsed duration.
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}
