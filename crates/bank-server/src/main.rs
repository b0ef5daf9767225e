use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use bank_broker::Broker;
use bank_server::bootstrap;
use bank_server::server::{spool_path_for, Server, ServerState};
use bank_store::Store;

#[derive(Parser, Debug)]
#[command(name = "bank-server", version, about = "Secure Bank System server")]
struct Args {
    #[arg(long, default_value_t = 8080)]
    port: u16,

    #[arg(long = "db-path", default_value = "data/accounts.dat")]
    db_path: PathBuf,

    /// Positional form, kept for argv parity with the original tool's
    /// invocation style: bank-server [port [dbPath]].
    #[arg(value_name = "PORT")]
    pos_port: Option<u16>,

    #[arg(value_name = "DB_PATH")]
    pos_db_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,bank_server=debug".parse().unwrap()))
        .init();

    let args = Args::parse();
    let port = args.pos_port.unwrap_or(args.port);
    let db_path = args.pos_db_path.unwrap_or(args.db_path);

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("creating data directory")?;
        }
    }

    let mut store = Store::open(&db_path).context("opening store")?;
    bootstrap::ensure_super_user(&mut store).context("bootstrapping super user")?;

    let broker = Broker::open(spool_path_for(&db_path));
    let state = Arc::new(ServerState { store: Mutex::new(store), broker });

    let addr = format!("0.0.0.0:{port}");
    let mut server = Server::bind(&addr, Arc::clone(&state)).with_context(|| format!("binding to {addr}"))?;
    server.run();
    info!(port, db_path = %db_path.display(), "bank server started, press Enter to stop");

    let stdin = std::io::stdin();
    let mut line = String::new();
    let _ = stdin.lock().read_line(&mut line);

    server.stop();
    Ok(())
}
