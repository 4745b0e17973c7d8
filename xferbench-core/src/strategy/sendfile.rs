// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Zero-copy transfer: a single in-kernel sendfile(2) moving the whole
//! file between the two descriptors, no user-space buffer.
//!
//! The exact byte length is taken from the source's metadata before the
//! clock starts. A transferred count different from that length is a fatal
//! length mismatch, not a partial transfer to resume.

use nix::sys::sendfile::sendfile;

use crate::endpoint::Endpoint;
use crate::error::TransferError;
use crate::metrics::{CallCounters, CallKind};
use crate::types::Durability;

use super::{flush_sink, TransferStrategy};

/// Whole-file kernel-internal copy.
pub struct SendfileCopy {
    expected: u64,
}

impl SendfileCopy {
    /// `expected` is the source's exact byte length.
    pub fn new(expected: u64) -> Self {
        Self { expected }
    }
}

impl TransferStrategy for SendfileCopy {
    fn run(
        &mut self,
        source: &mut Endpoint,
        sink: &mut Endpoint,
        durability: Durability,
        counters: &mut CallCounters,
    ) -> Result<(), TransferError> {
        let src = source
            .as_file()
            .expect("zero-copy source is a file by construction");
        let dst = sink
            .as_file()
            .expect("zero-copy sink is a file by construction");

        counters.record(CallKind::Sendfile);
        let transferred = sendfile(dst, src, None, self.expected as usize)
            .map_err(|e| TransferError::SendfileFailure { source: e })?;

        if transferred as u64 != self.expected {
            return Err(TransferError::LengthMismatch {
                expected: self.expected,
                transferred: transferred as u64,
            });
        }

        flush_sink(sink, durability);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::TempDir;

    #[test]
    fn test_whole_file_in_one_call() {
        let dir = TempDir::new().unwrap();
        let src_path = dir.path().join("src");
        let dst_path = dir.path().join("dst");
        let data: Vec<u8> = (0..100_000).map(|i| (i % 223) as u8).collect();
        let mut f = std::fs::File::create(&src_path).unwrap();
        f.write_all(&data).unwrap();
        drop(f);

        let mut source = Endpoint::file_source(&src_path, false).unwrap();
        let mut sink = Endpoint::file_sink(&dst_path, false).unwrap();
        let mut counters = CallCounters::new();
        let mut strategy = SendfileCopy::new(source.byte_len().unwrap());

        strategy
            .run(&mut source, &mut sink, Durability::NoSync, &mut counters)
            .unwrap();
        drop(sink);

        assert_eq!(counters.count(CallKind::Sendfile), 1);
        assert_eq!(std::fs::read(&dst_path).unwrap(), data);
    }

    #[test]
    fn test_empty_file_still_records_one_call() {
        let dir = TempDir::new().unwrap();
        let src_path = dir.path().join("src");
        let dst_path = dir.path().join("dst");
        std::fs::File::create(&src_path).unwrap();

        let mut source = Endpoint::file_source(&src_path, false).unwrap();
        let mut sink = Endpoint::file_sink(&dst_path, false).unwrap();
        let mut counters = CallCounters::new();
        let mut strategy = SendfileCopy::new(0);

        strategy
            .run(&mut source, &mut sink, Durability::NoSync, &mut counters)
            .unwrap();
        drop(sink);

        assert_eq!(counters.count(CallKind::Sendfile), 1);
        assert_eq!(std::fs::metadata(&dst_path).unwrap().len(), 0);
    }
}
