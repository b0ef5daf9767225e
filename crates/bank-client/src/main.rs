//! bank-client
//!
//! Interactive CLI client for the Secure Bank System. Connects to a running
//! bank-server over TCP, prints the welcome banner and any subsequent server
//! lines on a background receiver thread, and relays stdin lines to the
//! server as commands.
//!
//! Usage:
//!   bank-client [--host <host>] [--port <port>] [host [port]]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bank-client", version, about = "Secure Bank System client")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Positional form, kept for argv parity with the original tool's
    /// invocation style: bank-client [host [port]].
    #[arg(value_name = "HOST")]
    pos_host: Option<String>,

    #[arg(value_name = "PORT")]
    pos_port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,bank_client=debug".parse().unwrap()))
        .init();

    let args = Args::parse();
    let host = args.pos_host.unwrap_or(args.host);
    let port = args.pos_port.unwrap_or(args.port);

    println!("Connecting to Secure Bank System...");
    println!("Server: {host}:{port}");

    let stream = TcpStream::connect((host.as_str(), port)).with_context(|| format!("connecting to {host}:{port}"))?;
    info!(%host, port, "connected to bank server");
    println!("Connected to bank server at {host}:{port}");

    run(stream)
}

fn run(stream: TcpStream) -> anyhow::Result<()> {
    let connected = Arc::new(AtomicBool::new(true));
    let reader_stream = stream.try_clone().context("cloning connection for reader thread")?;
    let mut writer = stream;

    let receiver_connected = Arc::clone(&connected);
    let receiver = thread::spawn(move || {
        let mut reader = BufReader::new(reader_stream);
        let mut line = String::new();
        while receiver_connected.load(Ordering::SeqCst) {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let text = line.trim_end_matches(['\n', '\r']);
                    if !text.is_empty() {
                        println!("\n=== Server Response ===");
                        println!("{text}");
                        println!("=======================");
                        print!("> ");
                        let _ = std::io::stdout().flush();
                    }
                }
                Err(_) => break,
            }
        }
        receiver_connected.store(false, Ordering::SeqCst);
    });

    display_menu();
    process_user_input(&mut writer, &connected);

    let _ = send_command(&mut writer, "LOGOUT");
    connected.store(false, Ordering::SeqCst);
    // The reader thread is blocked in read_line(); it unblocks once the
    // server closes the connection after LOGOUT, same as the original.
    drop(receiver);
    Ok(())
}

fn display_menu() {
    println!("\n=== Secure Bank System Client ===");
    println!("Type commands to interact with the bank system.");
    println!("Type 'HELP' for available commands.");
    println!("Type 'EXIT' to quit.");
    println!("==================================");
}

fn process_user_input(writer: &mut TcpStream, connected: &AtomicBool) {
    let stdin = std::io::stdin();
    let mut input = String::new();

    while connected.load(Ordering::SeqCst) {
        print!("> ");
        if std::io::stdout().flush().is_err() {
            break;
        }
        input.clear();
        if stdin.lock().read_line(&mut input).unwrap_or(0) == 0 {
            break;
        }
        let command = input.trim_end_matches(['\n', '\r']);

        if command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit") {
            break;
        }

        if let Err(e) = send_command(writer, command) {
            println!("Connection lost: {e}");
            break;
        }
    }
}

fn send_command(writer: &mut TcpStream, command: &str) -> anyhow::Result<()> {
    writer.write_all(command.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
