// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! User-buffered copy: read(2) into a user-space buffer, write(2) out.

use crate::buffer::TransferBuffer;
use crate::endpoint::Endpoint;
use crate::error::TransferError;
use crate::metrics::CallCounters;
use crate::types::Durability;

use super::{chunk_copy, flush_sink, TransferStrategy};

/// File copy staged through a plain user-space buffer.
pub struct BufferedCopy {
    buffer: TransferBuffer,
}

impl BufferedCopy {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer: TransferBuffer::new(buffer_size),
        }
    }
}

impl TransferStrategy for BufferedCopy {
    fn run(
        &mut self,
        source: &mut Endpoint,
        sink: &mut Endpoint,
        durability: Durability,
        counters: &mut CallCounters,
    ) -> Result<(), TransferError> {
        chunk_copy(source, sink, self.buffer.as_mut_slice(), counters)?;
        flush_sink(sink, durability);
        Ok(())
    }
}
