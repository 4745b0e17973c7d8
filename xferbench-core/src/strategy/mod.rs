// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Transfer strategies - the polymorphic core of the harness.
//!
//! One variant per data-movement mechanism, all behind the same contract:
//! drive one full transfer from source to sink, recording a counter per
//! primitive call. The chunked variants (buffered, direct, socket send and
//! receive) share a single pull/push loop and differ only in how their
//! buffer is constructed and which endpoints they run between; the
//! zero-copy variant issues a single in-kernel transfer instead.

mod buffered;
mod direct;
mod sendfile;
mod socket;

pub use buffered::BufferedCopy;
pub use direct::DirectCopy;
pub use sendfile::SendfileCopy;
pub use socket::{SocketReceive, SocketSend};

use crate::config::{Mechanism, TransferConfig};
use crate::endpoint::Endpoint;
use crate::error::{BenchResult, TransferError};
use crate::metrics::CallCounters;
use crate::types::Durability;

/// Common contract for all mechanisms.
///
/// `run` performs the complete transfer body: the loop (or single call),
/// followed by the durability flush when one was requested. The caller
/// brackets `run` with the transfer timer; endpoint acquisition and buffer
/// allocation happen before it starts.
pub trait TransferStrategy {
    fn run(
        &mut self,
        source: &mut Endpoint,
        sink: &mut Endpoint,
        durability: Durability,
        counters: &mut CallCounters,
    ) -> Result<(), TransferError>;
}

/// Build the strategy selected by `config`, allocating its buffer.
///
/// The source endpoint must already be open: the zero-copy variant reads
/// the source's exact byte length from its metadata here, before the
/// clock starts.
pub fn for_mechanism(
    config: &TransferConfig,
    source: &Endpoint,
) -> BenchResult<Box<dyn TransferStrategy>> {
    let buffer_size = || {
        config
            .buffer_size()
            .expect("chunked mechanisms carry a buffer size by construction")
            .as_usize()
    };

    Ok(match config.mechanism() {
        Mechanism::Buffered => Box::new(BufferedCopy::new(buffer_size())),
        Mechanism::Direct => Box::new(DirectCopy::new(buffer_size())),
        Mechanism::Sendfile => Box::new(SendfileCopy::new(source.byte_len()?)),
        Mechanism::TcpClient | Mechanism::UnixClient => Box::new(SocketSend::new(buffer_size())),
        Mechanism::TcpServer | Mechanism::UnixServer => {
            Box::new(SocketReceive::new(buffer_size()))
        }
    })
}

/// The shared pull/push loop.
///
/// Runs until the source reports exhaustion (a zero-length pull) or a fatal
/// error. Every chunk pulled is pushed exactly once; a push completing
/// fewer bytes than were pulled is a fatal short write, never retried.
/// Pulls are counted when they yield data; pushes are counted when issued.
pub(crate) fn chunk_copy(
    source: &mut Endpoint,
    sink: &mut Endpoint,
    buffer: &mut [u8],
    counters: &mut CallCounters,
) -> Result<(), TransferError> {
    counters.declare(source.pull_call());
    counters.declare(sink.push_call());

    loop {
        let pulled = source.pull(buffer)?;
        if pulled == 0 {
            return Ok(());
        }
        counters.record(source.pull_call());

        counters.record(sink.push_call());
        let pushed = sink.push(&buffer[..pulled])?;
        if pushed != pulled {
            return Err(TransferError::ShortWrite {
                expected: pulled,
                written: pushed,
            });
        }
    }
}

/// Post-loop durability flush. Failure to flush is recorded but does not
/// fail the run.
pub(crate) fn flush_sink(sink: &Endpoint, durability: Durability) {
    if durability.is_sync() {
        if let Err(error) = sink.sync_to_storage() {
            tracing::warn!(%error, "durability flush failed");
        }
    }
}
