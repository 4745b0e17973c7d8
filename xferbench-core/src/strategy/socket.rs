// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Transport-mediated transfer over a connected stream.
//!
//! The sending side pulls chunks from a local file and pushes them to the
//! connected peer; a failed or short send aborts the run immediately. The
//! receiving side pulls from the peer and pushes to a local file; a
//! zero-length receive is the peer's orderly end-of-transfer, not an
//! error. Both reuse the shared chunk loop - the endpoint kinds decide
//! whether a pull counts as a read or a receive, and a push as a write or
//! a send.

use crate::buffer::TransferBuffer;
use crate::endpoint::Endpoint;
use crate::error::TransferError;
use crate::metrics::CallCounters;
use crate::types::Durability;

use super::{chunk_copy, flush_sink, TransferStrategy};

/// Client role: file source, connected stream sink.
pub struct SocketSend {
    buffer: TransferBuffer,
}

impl SocketSend {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer: TransferBuffer::new(buffer_size),
        }
    }
}

impl TransferStrategy for SocketSend {
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

/// Server role: connected stream source, file sink.
pub struct SocketReceive {
    buffer: TransferBuffer,
}

impl SocketReceive {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer: TransferBuffer::new(buffer_size),
        }
    }
}

impl TransferStrategy for SocketReceive {
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
