// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Transfer orchestrator - drives one run end to end.
//!
//! A run moves through Validated → EndpointsAcquired → Transferring →
//! Completed, or to Failed from any phase. The configuration is validated
//! before construction; the orchestrator acquires the source endpoint,
//! then the sink, builds the strategy (allocating its buffer), brackets
//! only the transfer body with the timer, and assembles the result. Every
//! endpoint is released on every exit path - success or failure - by
//! ownership: both live on this stack frame and drop when it unwinds.

use crate::config::{EndpointSpec, TransferConfig};
use crate::endpoint::{Endpoint, Role};
use crate::error::{BenchResult, EndpointError};
use crate::metrics::{CallCounters, TransferTimer};
use crate::report::TransferResult;
use crate::strategy;

/// Orchestrates exactly one transfer run.
pub struct TransferOrchestrator {
    config: TransferConfig,
}

impl TransferOrchestrator {
    /// Take ownership of a validated configuration.
    pub fn new(config: TransferConfig) -> Self {
        Self { config }
    }

    /// Run the transfer to completion and return the normalized result.
    ///
    /// Blocks for the whole run, including connect/accept for the
    /// connection-oriented mechanisms.
    pub fn execute(self) -> BenchResult<TransferResult> {
        let mechanism = self.config.mechanism();
        tracing::debug!(mechanism = mechanism.report_name(), "acquiring endpoints");

        // Source before sink; the server mechanisms accept their peer
        // before the sink file exists.
        let mut source = self.open_endpoint(self.config.source(), Role::Source)?;
        let mut sink = self.open_endpoint(self.config.sink(), Role::Sink)?;

        let mut strategy = strategy::for_mechanism(&self.config, &source)?;
        let mut counters = CallCounters::new();

        tracing::debug!(mechanism = mechanism.report_name(), "transferring");
        let timer = TransferTimer::start();
        let outcome = strategy.run(
            &mut source,
            &mut sink,
            self.config.durability(),
            &mut counters,
        );
        let elapsed = timer.stop();
        outcome?;

        tracing::debug!(
            mechanism = mechanism.report_name(),
            elapsed_seconds = elapsed.as_secs_f64(),
            "completed"
        );

        Ok(TransferResult {
            mechanism: mechanism.report_name(),
            buffer_size: self.config.reported_buffer_size(),
            sync_mode: mechanism
                .reports_sync_mode()
                .then(|| self.config.durability()),
            time_label: mechanism.time_label(),
            elapsed_seconds: elapsed.as_secs_f64(),
            calls: counters,
        })
    }

    fn open_endpoint(&self, spec: &EndpointSpec, role: Role) -> Result<Endpoint, EndpointError> {
        let direct = self.config.mechanism().required_alignment().is_some();
        match (spec, role) {
            (EndpointSpec::File(path), Role::Source) => Endpoint::file_source(path, direct),
            (EndpointSpec::File(path), Role::Sink) => Endpoint::file_sink(path, direct),
            (EndpointSpec::TcpListen(port), _) => Endpoint::tcp_server(*port),
            (EndpointSpec::TcpPeer(address), _) => Endpoint::tcp_client(*address),
            (EndpointSpec::UnixListen(path), _) => Endpoint::unix_server(path),
            (EndpointSpec::UnixPeer(path), _) => Endpoint::unix_client(path),
        }
    }
}
