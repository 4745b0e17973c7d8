// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Transfer configuration with strict up-front validation.
//!
//! A `TransferConfig` is built through a mechanism-specific constructor and
//! is immutable afterwards. Every constraint that can be checked without
//! touching the filesystem or the network - buffer positivity, alignment
//! multiples, port range, numeric peer addresses - is checked here, so a
//! rejected configuration never opens, creates, or truncates anything.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::types::{BufferSize, Durability, Port};

/// Buffer address and transfer-size alignment required by the direct
/// (kernel-bypass) mechanism.
pub const DIRECT_IO_ALIGNMENT: u64 = 512;

/// The data-movement mechanism driven by one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mechanism {
    /// read(2)/write(2) through a user-space buffer.
    Buffered,
    /// O_DIRECT read/write through an aligned user-space buffer.
    Direct,
    /// Single in-kernel sendfile(2) transfer, no user buffer.
    Sendfile,
    /// Read a local file and send it to a TCP peer.
    TcpClient,
    /// Accept one TCP peer and write what it sends to a local file.
    TcpServer,
    /// Read a local file and send it over a Unix-domain socket.
    UnixClient,
    /// Accept one Unix-domain peer and write what it sends to a local file.
    UnixServer,
}

impl Mechanism {
    /// Name printed in the `Mechanism:` report field. These strings are part
    /// of the external parser contract and must not change.
    pub fn report_name(&self) -> &'static str {
        match self {
            Self::Buffered => "Buffered I/O",
            Self::Direct => "Direct I/O",
            Self::Sendfile => "sendfile",
            Self::TcpClient => "TCP Client",
            Self::TcpServer => "TCP Server",
            Self::UnixClient => "UNIX Socket Client",
            Self::UnixServer => "UNIX Socket Server",
        }
    }

    /// Byte alignment the mechanism imposes on its buffer, if any.
    pub fn required_alignment(&self) -> Option<u64> {
        match self {
            Self::Direct => Some(DIRECT_IO_ALIGNMENT),
            _ => None,
        }
    }

    /// Whether the mechanism moves data through a user-space buffer.
    pub fn uses_buffer(&self) -> bool {
        !matches!(self, Self::Sendfile)
    }

    /// Whether the report carries a `SyncMode` field. The socket mechanisms
    /// never flush and never report one.
    pub fn reports_sync_mode(&self) -> bool {
        matches!(self, Self::Buffered | Self::Direct | Self::Sendfile)
    }

    /// Label of the elapsed-time report field, role-qualified for the
    /// transport mechanisms.
    pub fn time_label(&self) -> &'static str {
        match self {
            Self::Buffered | Self::Direct | Self::Sendfile => "TimeTaken",
            Self::TcpClient | Self::UnixClient => "TimeTakenClient",
            Self::TcpServer | Self::UnixServer => "TimeTakenServer",
        }
    }
}

/// Where one side of the transfer lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointSpec {
    /// A local file path.
    File(PathBuf),
    /// Bind and accept exactly one TCP peer on this port.
    TcpListen(Port),
    /// Connect to this TCP peer.
    TcpPeer(SocketAddr),
    /// Bind and accept exactly one peer on this Unix-socket path.
    UnixListen(PathBuf),
    /// Connect to the Unix socket at this path.
    UnixPeer(PathBuf),
}

/// Immutable, validated configuration for one transfer run.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    mechanism: Mechanism,
    source: EndpointSpec,
    sink: EndpointSpec,
    buffer_size: Option<BufferSize>,
    durability: Durability,
}

impl TransferConfig {
    /// User-buffered file copy.
    pub fn buffered(
        input: PathBuf,
        output: PathBuf,
        buffer_size: u64,
        durability: Durability,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            mechanism: Mechanism::Buffered,
            source: EndpointSpec::File(input),
            sink: EndpointSpec::File(output),
            buffer_size: Some(BufferSize::new(buffer_size)?),
            durability,
        })
    }

    /// Aligned direct (O_DIRECT) file copy. The buffer size must be a whole
    /// multiple of [`DIRECT_IO_ALIGNMENT`].
    pub fn direct(
        input: PathBuf,
        output: PathBuf,
        buffer_size: u64,
        durability: Durability,
    ) -> Result<Self, ConfigError> {
        let buffer_size = BufferSize::new(buffer_size)?;
        if !buffer_size.is_multiple_of(DIRECT_IO_ALIGNMENT) {
            return Err(ConfigError::MisalignedBufferSize {
                size: buffer_size.bytes(),
                alignment: DIRECT_IO_ALIGNMENT,
            });
        }
        Ok(Self {
            mechanism: Mechanism::Direct,
            source: EndpointSpec::File(input),
            sink: EndpointSpec::File(output),
            buffer_size: Some(buffer_size),
            durability,
        })
    }

    /// Zero-copy in-kernel file copy. No user buffer.
    pub fn sendfile(
        input: PathBuf,
        output: PathBuf,
        durability: Durability,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            mechanism: Mechanism::Sendfile,
            source: EndpointSpec::File(input),
            sink: EndpointSpec::File(output),
            buffer_size: None,
            durability,
        })
    }

    /// Send `input` to a TCP server at `address:port`. The address must be a
    /// numeric IP literal.
    pub fn tcp_client(
        address: &str,
        port: u16,
        input: PathBuf,
        buffer_size: u64,
    ) -> Result<Self, ConfigError> {
        let port = Port::new(port)?;
        let ip = IpAddr::from_str(address).map_err(|e| ConfigError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            mechanism: Mechanism::TcpClient,
            source: EndpointSpec::File(input),
            sink: EndpointSpec::TcpPeer(SocketAddr::new(ip, port.value())),
            buffer_size: Some(BufferSize::new(buffer_size)?),
            durability: Durability::NoSync,
        })
    }

    /// Receive from one TCP peer on `port` into `output`.
    pub fn tcp_server(port: u16, output: PathBuf, buffer_size: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            mechanism: Mechanism::TcpServer,
            source: EndpointSpec::TcpListen(Port::new(port)?),
            sink: EndpointSpec::File(output),
            buffer_size: Some(BufferSize::new(buffer_size)?),
            durability: Durability::NoSync,
        })
    }

    /// Send `input` to the Unix-domain socket at `socket_path`.
    pub fn unix_client(
        socket_path: PathBuf,
        input: PathBuf,
        buffer_size: u64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            mechanism: Mechanism::UnixClient,
            source: EndpointSpec::File(input),
            sink: EndpointSpec::UnixPeer(socket_path),
            buffer_size: Some(BufferSize::new(buffer_size)?),
            durability: Durability::NoSync,
        })
    }

    /// Receive from one Unix-domain peer at `socket_path` into `output`.
    pub fn unix_server(
        socket_path: PathBuf,
        output: PathBuf,
        buffer_size: u64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            mechanism: Mechanism::UnixServer,
            source: EndpointSpec::UnixListen(socket_path),
            sink: EndpointSpec::File(output),
            buffer_size: Some(BufferSize::new(buffer_size)?),
            durability: Durability::NoSync,
        })
    }

    pub fn mechanism(&self) -> Mechanism {
        self.mechanism
    }

    pub fn source(&self) -> &EndpointSpec {
        &self.source
    }

    pub fn sink(&self) -> &EndpointSpec {
        &self.sink
    }

    /// Buffer size, if the mechanism uses a user-space buffer.
    pub fn buffer_size(&self) -> Option<BufferSize> {
        self.buffer_size
    }

    /// Buffer size as reported: 0 for mechanisms with no user buffer.
    pub fn reported_buffer_size(&self) -> u64 {
        self.buffer_size.map_or(0, |b| b.bytes())
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }
}
