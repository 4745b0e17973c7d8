// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! The normalized transfer result and its fixed-schema rendering.
//!
//! The report is consumed by an external analysis script and is bit-exact:
//! one `key: value` line per field, field names and order fixed per
//! mechanism, elapsed time printed with six decimal places. Nothing else
//! may be written to the same stream.

use std::io::{self, Write};

use crate::metrics::CallCounters;
use crate::types::Durability;

/// Mechanism-agnostic result of one successful transfer run.
#[derive(Debug)]
pub struct TransferResult {
    /// Report name of the mechanism, e.g. `Buffered I/O`.
    pub mechanism: &'static str,
    /// User-buffer size in bytes; 0 for mechanisms with no user buffer.
    pub buffer_size: u64,
    /// Durability mode; `None` for mechanisms that never report one.
    pub sync_mode: Option<Durability>,
    /// Label of the elapsed-time field, role-qualified for transports.
    pub time_label: &'static str,
    /// Wall-clock seconds spent in the transfer body.
    pub elapsed_seconds: f64,
    /// Primitive-call counters in loop order.
    pub calls: CallCounters,
}

impl TransferResult {
    /// Render the report in the external schema.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Mechanism: {}", self.mechanism)?;
        writeln!(out, "BufferSize: {}", self.buffer_size)?;
        if let Some(mode) = self.sync_mode {
            writeln!(out, "SyncMode: {}", mode)?;
        }
        writeln!(out, "{}: {:.6}", self.time_label, self.elapsed_seconds)?;
        for (kind, count) in self.calls.iter() {
            writeln!(out, "{}: {}", kind.label(), count)?;
        }
        Ok(())
    }
}
