// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! End-to-end integration tests for the transfer engine.
//!
//! These tests drive whole runs through the orchestrator against real
//! files and Unix-domain socket pairs.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use xferbench_core::metrics::CallKind;
use xferbench_core::{
    BenchError, ConfigError, Durability, TransferConfig, TransferOrchestrator,
};

fn write_patterned(path: &Path, len: usize) {
    let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    let mut f = std::fs::File::create(path).unwrap();
    f.write_all(&data).unwrap();
}

fn crc_of(path: &Path) -> u32 {
    crc32fast::hash(&std::fs::read(path).unwrap())
}

/// Copying 10 MiB with a 64 KiB buffer takes exactly 160 reads and 160
/// writes, and the destination hashes identically to the source.
#[test]
fn test_buffered_ten_mebibyte_call_accounting() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    write_patterned(&src, 10 * 1024 * 1024);

    let config =
        TransferConfig::buffered(src.clone(), dst.clone(), 65536, Durability::NoSync).unwrap();
    let result = TransferOrchestrator::new(config).execute().unwrap();

    assert_eq!(result.calls.count(CallKind::Read), 160);
    assert_eq!(result.calls.count(CallKind::Write), 160);
    assert_eq!(crc_of(&src), crc_of(&dst));
}

/// Re-running against the same destination truncates it: no residual bytes
/// from a previously larger file survive past the new length.
#[test]
fn test_destination_is_truncated_on_rerun() {
    let dir = TempDir::new().unwrap();
    let big_src = dir.path().join("big");
    let small_src = dir.path().join("small");
    let dst = dir.path().join("dst");
    write_patterned(&big_src, 8192);
    write_patterned(&small_src, 1000);

    let config =
        TransferConfig::buffered(big_src, dst.clone(), 4096, Durability::NoSync).unwrap();
    TransferOrchestrator::new(config).execute().unwrap();
    assert_eq!(std::fs::metadata(&dst).unwrap().len(), 8192);

    let config =
        TransferConfig::buffered(small_src.clone(), dst.clone(), 4096, Durability::NoSync)
            .unwrap();
    TransferOrchestrator::new(config).execute().unwrap();

    assert_eq!(std::fs::metadata(&dst).unwrap().len(), 1000);
    assert_eq!(crc_of(&small_src), crc_of(&dst));
}

/// A direct-mechanism buffer that is not a multiple of 512 is rejected at
/// validation time, before the destination file could be created.
#[test]
fn test_direct_misaligned_buffer_rejected_before_any_io() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    write_patterned(&src, 4096);

    let result = TransferConfig::direct(src, dst.clone(), 500, Durability::NoSync);

    assert!(matches!(
        result,
        Err(ConfigError::MisalignedBufferSize { .. })
    ));
    assert!(!dst.exists());
}

/// Full client/server run over a Unix-domain socket: the server accepts one
/// peer, drains it to the sink file, observes the orderly close, and both
/// sides report matching call accounting.
#[test]
fn test_unix_socket_round_trip_with_orderly_close() {
    let dir = TempDir::new().unwrap();
    let socket_path = dir.path().join("bench.sock");
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    write_patterned(&src, 100_000);

    let server_socket = socket_path.clone();
    let server_dst = dst.clone();
    let server = std::thread::spawn(move || {
        let config = TransferConfig::unix_server(server_socket, server_dst, 4096).unwrap();
        TransferOrchestrator::new(config).execute()
    });

    let client_result = run_client_with_retry(&socket_path, &src, 4096);
    let server_result = server.join().unwrap().unwrap();

    assert_eq!(client_result.mechanism, "UNIX Socket Client");
    assert_eq!(client_result.time_label, "TimeTakenClient");
    assert_eq!(
        client_result.calls.count(CallKind::Read),
        client_result.calls.count(CallKind::Send)
    );
    assert!(client_result.calls.count(CallKind::Read) > 0);

    assert_eq!(server_result.mechanism, "UNIX Socket Server");
    assert_eq!(server_result.time_label, "TimeTakenServer");
    assert_eq!(
        server_result.calls.count(CallKind::Recv),
        server_result.calls.count(CallKind::Write)
    );
    assert_eq!(server_result.sync_mode, None);

    assert_eq!(crc_of(&src), crc_of(&dst));
    // Teardown removed the socket path.
    assert!(!socket_path.exists());
}

/// Retry the client run until the server is accepting. Only connect
/// failures are retried; anything else is a real test failure.
fn run_client_with_retry(
    socket_path: &Path,
    src: &Path,
    buffer_size: u64,
) -> xferbench_core::TransferResult {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let config = TransferConfig::unix_client(
            PathBuf::from(socket_path),
            PathBuf::from(src),
            buffer_size,
        )
        .unwrap();
        match TransferOrchestrator::new(config).execute() {
            Ok(result) => return result,
            Err(BenchError::Endpoint(_)) if Instant::now() < deadline => {
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(e) => panic!("client run failed: {e}"),
        }
    }
}

/// Full client/server run over TCP loopback. Same engine path as the Unix
/// pair apart from endpoint setup.
#[test]
fn test_tcp_round_trip() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    write_patterned(&src, 50_000);
    let port = 39471;

    let server_dst = dst.clone();
    let server = std::thread::spawn(move || {
        let config = TransferConfig::tcp_server(port, server_dst, 8192).unwrap();
        TransferOrchestrator::new(config).execute()
    });

    let deadline = Instant::now() + Duration::from_secs(10);
    let client_result = loop {
        let config =
            TransferConfig::tcp_client("127.0.0.1", port, src.clone(), 8192).unwrap();
        match TransferOrchestrator::new(config).execute() {
            Ok(result) => break result,
            Err(BenchError::Endpoint(_)) if Instant::now() < deadline => {
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(e) => panic!("client run failed: {e}"),
        }
    };
    let server_result = server.join().unwrap().unwrap();

    assert_eq!(client_result.mechanism, "TCP Client");
    assert_eq!(server_result.mechanism, "TCP Server");
    assert_eq!(
        server_result.calls.count(CallKind::Recv),
        server_result.calls.count(CallKind::Write)
    );
    assert_eq!(crc_of(&src), crc_of(&dst));
}

/// The zero-copy mechanism via the orchestrator: one sendfile call, byte
/// identity, and BufferSize reported as 0.
#[test]
fn test_sendfile_run_end_to_end() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    write_patterned(&src, 123_456);

    let config = TransferConfig::sendfile(src.clone(), dst.clone(), Durability::NoSync).unwrap();
    let result = TransferOrchestrator::new(config).execute().unwrap();

    assert_eq!(result.mechanism, "sendfile");
    assert_eq!(result.buffer_size, 0);
    assert_eq!(result.calls.count(CallKind::Sendfile), 1);
    assert_eq!(crc_of(&src), crc_of(&dst));
}

/// An empty source moves zero bytes in a single zero-copy call and leaves
/// an empty destination.
#[test]
fn test_sendfile_empty_source() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    std::fs::File::create(&src).unwrap();

    let config = TransferConfig::sendfile(src, dst.clone(), Durability::NoSync).unwrap();
    let result = TransferOrchestrator::new(config).execute().unwrap();

    assert_eq!(result.calls.count(CallKind::Sendfile), 1);
    assert_eq!(std::fs::metadata(&dst).unwrap().len(), 0);
}
