// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! xferbench CLI
//!
//! One subcommand per data-movement mechanism. Each subcommand builds a
//! validated transfer configuration, hands it to the orchestrator, and
//! prints the report to stdout. Diagnostics and logs go to stderr so the
//! report stream stays parseable.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use xferbench_core::{BenchResult, Durability, TransferConfig, TransferOrchestrator};

/// xferbench - benchmark POSIX data-movement mechanisms
#[derive(Parser)]
#[command(name = "xferbench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a file through a user-space buffer with read/write
    Buffered {
        input: PathBuf,
        output: PathBuf,
        /// Buffer size in bytes
        buffer_size: u64,
        /// Force written data to stable storage after the copy
        #[arg(long)]
        sync: bool,
    },

    /// Copy a file with O_DIRECT through a 512-byte-aligned buffer
    Direct {
        input: PathBuf,
        output: PathBuf,
        /// Buffer size in bytes; must be a multiple of 512
        buffer_size: u64,
        /// Force written data to stable storage after the copy
        #[arg(long)]
        sync: bool,
    },

    /// Copy a file with a single in-kernel sendfile transfer
    Sendfile {
        input: PathBuf,
        output: PathBuf,
        /// Force written data to stable storage after the copy
        #[arg(long)]
        sync: bool,
    },

    /// Read a file and send it to a TCP server
    TcpClient {
        /// Numeric IP address of the server
        server_ip: String,
        port: u16,
        input: PathBuf,
        /// Buffer size in bytes
        buffer_size: u64,
    },

    /// Accept one TCP peer and write what it sends to a file
    TcpServer {
        port: u16,
        output: PathBuf,
        /// Buffer size in bytes
        buffer_size: u64,
    },

    /// Read a file and send it over a Unix-domain socket
    UnixClient {
        socket_path: PathBuf,
        input: PathBuf,
        /// Buffer size in bytes
        buffer_size: u64,
    },

    /// Accept one Unix-domain peer and write what it sends to a file
    UnixServer {
        socket_path: PathBuf,
        output: PathBuf,
        /// Buffer size in bytes
        buffer_size: u64,
    },
}

fn build_config(command: Commands) -> BenchResult<TransferConfig> {
    let config = match command {
        Commands::Buffered {
            input,
            output,
            buffer_size,
            sync,
        } => TransferConfig::buffered(input, output, buffer_size, Durability::from_flag(sync))?,
        Commands::Direct {
            input,
            output,
            buffer_size,
            sync,
        } => TransferConfig::direct(input, output, buffer_size, Durability::from_flag(sync))?,
        Commands::Sendfile {
            input,
            output,
            sync,
        } => TransferConfig::sendfile(input, output, Durability::from_flag(sync))?,
        Commands::TcpClient {
            server_ip,
            port,
            input,
            buffer_size,
        } => TransferConfig::tcp_client(&server_ip, port, input, buffer_size)?,
        Commands::TcpServer {
            port,
            output,
            buffer_size,
        } => TransferConfig::tcp_server(port, output, buffer_size)?,
        Commands::UnixClient {
            socket_path,
            input,
            buffer_size,
        } => TransferConfig::unix_client(socket_path, input, buffer_size)?,
        Commands::UnixServer {
            socket_path,
            output,
            buffer_size,
        } => TransferConfig::unix_server(socket_path, output, buffer_size)?,
    };
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the report.
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let result = build_config(cli.command).and_then(|config| {
        TransferOrchestrator::new(config).execute()
    });

    match result {
        Ok(report) => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            if let Err(error) = report.render(&mut out).and_then(|()| out.flush()) {
                eprintln!("Error: failed to write report: {error}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
