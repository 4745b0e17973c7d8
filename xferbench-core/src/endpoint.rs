// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Endpoint abstraction - uniform transferable descriptors.
//!
//! An `Endpoint` is an open, role-tagged descriptor: a local file, a
//! connected TCP stream, or a connected Unix-domain stream. Server-role
//! constructors bind, listen, and block until exactly one peer connects;
//! the listening socket is not kept past the accept. Endpoints do no
//! logging of their own - every failure is signaled to the caller, which
//! owns cleanup of anything acquired earlier.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::OwnedFd;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use socket2::{Domain, SockAddr, Socket, Type};

use crate::error::{EndpointError, TransferError};
use crate::metrics::CallKind;
use crate::types::Port;

/// Pending-connection backlog for the TCP server socket.
const TCP_BACKLOG: i32 = 5;

/// Pending-connection backlog for the Unix-domain server socket. One peer is
/// ever accepted, so one pending slot suffices.
const UNIX_BACKLOG: i32 = 1;

/// Which side of the transfer this endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Sink,
}

enum Channel {
    File(File),
    Tcp(TcpStream),
    Unix(UnixStream),
}

/// An open data endpoint bound to a transfer role.
pub struct Endpoint {
    role: Role,
    channel: Channel,
    /// Unix server socket path, unlinked on teardown.
    unlink_on_close: Option<PathBuf>,
}

impl Endpoint {
    /// Open a file read-only as the transfer source. With `direct`, request
    /// that the kernel bypass the page cache (`O_DIRECT`).
    pub fn file_source(path: &Path, direct: bool) -> Result<Self, EndpointError> {
        let mut options = OpenOptions::new();
        options.read(true);
        if direct {
            options.custom_flags(libc::O_DIRECT);
        }
        let file = options
            .open(path)
            .map_err(|e| Self::file_open_error(path, direct, e))?;
        Ok(Self {
            role: Role::Source,
            channel: Channel::File(file),
            unlink_on_close: None,
        })
    }

    /// Create or truncate a file as the transfer sink, mode 0644.
    pub fn file_sink(path: &Path, direct: bool) -> Result<Self, EndpointError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true).mode(0o644);
        if direct {
            options.custom_flags(libc::O_DIRECT);
        }
        let file = options
            .open(path)
            .map_err(|e| Self::file_open_error(path, direct, e))?;
        Ok(Self {
            role: Role::Sink,
            channel: Channel::File(file),
            unlink_on_close: None,
        })
    }

    fn file_open_error(path: &Path, direct: bool, source: std::io::Error) -> EndpointError {
        match source.kind() {
            std::io::ErrorKind::NotFound => EndpointError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => EndpointError::AccessDenied {
                path: path.to_path_buf(),
            },
            // O_DIRECT on an unsupporting filesystem surfaces as EINVAL.
            std::io::ErrorKind::InvalidInput if direct => EndpointError::UnsupportedAlignment {
                path: path.to_path_buf(),
                source,
            },
            _ => EndpointError::Io {
                context: "opening file endpoint",
                source,
            },
        }
    }

    /// Bind `0.0.0.0:port`, listen, and block until one peer connects.
    /// The port is immediately reusable after a restart (`SO_REUSEADDR`).
    pub fn tcp_server(port: Port) -> Result<Self, EndpointError> {
        let address = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port.value()));
        let display = address.to_string();

        let socket = Socket::new(Domain::IPV4, Type::STREAM, None).map_err(|e| {
            EndpointError::Io {
                context: "creating TCP server socket",
                source: e,
            }
        })?;
        socket
            .set_reuse_address(true)
            .map_err(|e| EndpointError::Io {
                context: "setting SO_REUSEADDR",
                source: e,
            })?;
        socket.bind(&address.into()).map_err(|e| EndpointError::Bind {
            address: display.clone(),
            source: e,
        })?;
        socket.listen(TCP_BACKLOG).map_err(|e| EndpointError::Listen {
            address: display.clone(),
            source: e,
        })?;
        let (peer, _) = socket.accept().map_err(|e| EndpointError::Accept {
            address: display,
            source: e,
        })?;

        Ok(Self {
            role: Role::Source,
            channel: Channel::Tcp(peer.into()),
            unlink_on_close: None,
        })
    }

    /// Connect to a TCP server; blocks until the peer is reachable or the
    /// connect fails.
    pub fn tcp_client(address: SocketAddr) -> Result<Self, EndpointError> {
        let stream = TcpStream::connect(address).map_err(|e| EndpointError::Connect {
            address: address.to_string(),
            source: e,
        })?;
        Ok(Self {
            role: Role::Sink,
            channel: Channel::Tcp(stream),
            unlink_on_close: None,
        })
    }

    /// Bind a Unix-domain socket at `path`, listen, and block until one peer
    /// connects. A stale socket file from a previous run is removed before
    /// binding, and the path is removed again on teardown.
    pub fn unix_server(path: &Path) -> Result<Self, EndpointError> {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(EndpointError::Io {
                    context: "removing stale socket path",
                    source: e,
                })
            }
        }

        let display = path.display().to_string();
        let address = SockAddr::unix(path).map_err(|e| EndpointError::Bind {
            address: display.clone(),
            source: e,
        })?;

        let socket =
            Socket::new(Domain::UNIX, Type::STREAM, None).map_err(|e| EndpointError::Io {
                context: "creating Unix server socket",
                source: e,
            })?;
        socket.bind(&address).map_err(|e| EndpointError::Bind {
            address: display.clone(),
            source: e,
        })?;
        socket
            .listen(UNIX_BACKLOG)
            .map_err(|e| EndpointError::Listen {
                address: display.clone(),
                source: e,
            })?;
        let (peer, _) = socket.accept().map_err(|e| EndpointError::Accept {
            address: display,
            source: e,
        })?;

        Ok(Self {
            role: Role::Source,
            channel: Channel::Unix(UnixStream::from(OwnedFd::from(peer))),
            unlink_on_close: Some(path.to_path_buf()),
        })
    }

    /// Connect to the Unix-domain socket at `path`.
    pub fn unix_client(path: &Path) -> Result<Self, EndpointError> {
        let stream = UnixStream::connect(path).map_err(|e| EndpointError::Connect {
            address: path.display().to_string(),
            source: e,
        })?;
        Ok(Self {
            role: Role::Sink,
            channel: Channel::Unix(stream),
            unlink_on_close: None,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Pull one chunk from the endpoint. Zero means the source is exhausted
    /// (file EOF, or the peer closed its end in an orderly fashion).
    pub fn pull(&mut self, buf: &mut [u8]) -> Result<usize, TransferError> {
        match &mut self.channel {
            Channel::File(file) => file
                .read(buf)
                .map_err(|e| TransferError::ReadFailure { source: e }),
            Channel::Tcp(stream) => stream
                .read(buf)
                .map_err(|e| TransferError::ReceiveFailure { source: e }),
            Channel::Unix(stream) => stream
                .read(buf)
                .map_err(|e| TransferError::ReceiveFailure { source: e }),
        }
    }

    /// Push one chunk to the endpoint, returning the completed byte count.
    pub fn push(&mut self, buf: &[u8]) -> Result<usize, TransferError> {
        match &mut self.channel {
            Channel::File(file) => file
                .write(buf)
                .map_err(|e| TransferError::WriteFailure { source: e }),
            Channel::Tcp(stream) => stream
                .write(buf)
                .map_err(|e| TransferError::SendFailure { source: e }),
            Channel::Unix(stream) => stream
                .write(buf)
                .map_err(|e| TransferError::SendFailure { source: e }),
        }
    }

    /// Counter category for pulls from this endpoint.
    pub fn pull_call(&self) -> CallKind {
        match self.channel {
            Channel::File(_) => CallKind::Read,
            Channel::Tcp(_) | Channel::Unix(_) => CallKind::Recv,
        }
    }

    /// Counter category for pushes to this endpoint.
    pub fn push_call(&self) -> CallKind {
        match self.channel {
            Channel::File(_) => CallKind::Write,
            Channel::Tcp(_) | Channel::Unix(_) => CallKind::Send,
        }
    }

    /// Exact byte length of a file endpoint, from its metadata.
    pub fn byte_len(&self) -> Result<u64, EndpointError> {
        match &self.channel {
            Channel::File(file) => {
                let metadata = file.metadata().map_err(|e| EndpointError::Io {
                    context: "reading source metadata",
                    source: e,
                })?;
                Ok(metadata.len())
            }
            Channel::Tcp(_) | Channel::Unix(_) => Err(EndpointError::Io {
                context: "reading source metadata",
                source: std::io::Error::other("stream endpoints have no known length"),
            }),
        }
    }

    /// Force pending sink data to stable storage. A no-op for stream
    /// endpoints, which have nothing to flush to disk.
    pub fn sync_to_storage(&self) -> std::io::Result<()> {
        match &self.channel {
            Channel::File(file) => file.sync_all(),
            Channel::Tcp(_) | Channel::Unix(_) => Ok(()),
        }
    }

    /// The underlying file, for mechanisms that hand the descriptor pair
    /// straight to the kernel.
    pub(crate) fn as_file(&self) -> Option<&File> {
        match &self.channel {
            Channel::File(file) => Some(file),
            _ => None,
        }
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        if let Some(path) = self.unlink_on_close.take() {
            // Socket-path teardown; a leftover path is also handled by the
            // next run's bind step.
            let _ = std::fs::remove_file(path);
        }
    }
}
