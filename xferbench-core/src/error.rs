//! Custom error types for xferbench.
//!
//! This module defines explicit enum error types as per coding guidelines.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for one benchmark run.
/// All errors are explicit variants - no catch-all or generic handling.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("endpoint error: {0}")]
    Endpoint(#[from] EndpointError),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),
}

/// Configuration errors - reported before any I/O is attempted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("buffer size must be a positive number of bytes")]
    NonPositiveBufferSize,

    #[error("buffer size {size} is not a multiple of the required {alignment}-byte alignment")]
    MisalignedBufferSize { size: u64, alignment: u64 },

    #[error("invalid port: {port} - {reason}")]
    InvalidPort { port: u16, reason: String },

    #[error("invalid peer address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
}

/// Endpoint acquisition errors - open/bind/listen/accept/connect failures.
/// Each variant carries the underlying OS diagnostic.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("source file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("access denied: {path}")]
    AccessDenied { path: PathBuf },

    #[error("direct I/O is not supported for {path}: {source}")]
    UnsupportedAlignment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to listen on {address}: {source}")]
    Listen {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to accept a peer on {address}: {source}")]
    Accept {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Transfer-loop errors - all fatal for the run, none retried.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("read failed: {source}")]
    ReadFailure {
        #[source]
        source: std::io::Error,
    },

    #[error("receive failed: {source}")]
    ReceiveFailure {
        #[source]
        source: std::io::Error,
    },

    #[error("write failed: {source}")]
    WriteFailure {
        #[source]
        source: std::io::Error,
    },

    #[error("send failed: {source}")]
    SendFailure {
        #[source]
        source: std::io::Error,
    },

    #[error("short write: {written} of {expected} bytes completed")]
    ShortWrite { expected: usize, written: usize },

    #[error("sendfile failed: {source}")]
    SendfileFailure {
        #[source]
        source: nix::Error,
    },

    #[error("zero-copy transfer moved {transferred} of {expected} bytes")]
    LengthMismatch { expected: u64, transferred: u64 },
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;
