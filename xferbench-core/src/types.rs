// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;

use crate::error::ConfigError;

/// Validated network port.
/// Must be in range 1-65535 (0 is reserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Port(u16);

impl Port {
    /// Create a new Port with validation.
    pub fn new(port: u16) -> Result<Self, ConfigError> {
        if port == 0 {
            return Err(ConfigError::InvalidPort {
                port,
                reason: "Port 0 is reserved and cannot be used".to_string(),
            });
        }
        Ok(Self(port))
    }

    /// Get the inner port value.
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Validated transfer-buffer size in bytes.
/// Must be positive; alignment constraints are checked per mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSize(u64);

impl BufferSize {
    /// Create a new BufferSize with validation.
    pub fn new(bytes: u64) -> Result<Self, ConfigError> {
        if bytes == 0 {
            return Err(ConfigError::NonPositiveBufferSize);
        }
        Ok(Self(bytes))
    }

    /// Get the size in bytes.
    pub fn bytes(&self) -> u64 {
        self.0
    }

    /// Get the size as a usize for buffer allocation.
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Check whether the size is a whole multiple of `alignment`.
    pub fn is_multiple_of(&self, alignment: u64) -> bool {
        self.0 % alignment == 0
    }
}

impl fmt::Display for BufferSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for BufferSize {
    type Error = ConfigError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Durability mode for the sink once the transfer loop finishes.
///
/// `Sync` requests an fsync of the sink; the flush is best-effort
/// instrumentation and never fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    Sync,
    NoSync,
}

impl Durability {
    pub fn from_flag(sync: bool) -> Self {
        if sync {
            Self::Sync
        } else {
            Self::NoSync
        }
    }

    pub fn is_sync(&self) -> bool {
        matches!(self, Self::Sync)
    }
}

impl fmt::Display for Durability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync => write!(f, "sync"),
            Self::NoSync => write!(f, "nosync"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_valid() {
        assert!(Port::new(8080).is_ok());
        assert!(Port::new(1).is_ok());
        assert!(Port::new(65535).is_ok());
    }

    #[test]
    fn test_port_invalid() {
        assert!(Port::new(0).is_err());
    }

    #[test]
    fn test_buffer_size_valid() {
        assert_eq!(BufferSize::new(65536).unwrap().bytes(), 65536);
        assert!(BufferSize::new(1).is_ok());
    }

    #[test]
    fn test_buffer_size_invalid() {
        assert!(BufferSize::new(0).is_err());
    }

    #[test]
    fn test_buffer_size_multiples() {
        let size = BufferSize::new(4096).unwrap();
        assert!(size.is_multiple_of(512));
        assert!(!BufferSize::new(500).unwrap().is_multiple_of(512));
    }

    #[test]
    fn test_durability_display() {
        assert_eq!(Durability::Sync.to_string(), "sync");
        assert_eq!(Durability::NoSync.to_string(), "nosync");
        assert!(Durability::from_flag(true).is_sync());
        assert!(!Durability::from_flag(false).is_sync());
    }
}
