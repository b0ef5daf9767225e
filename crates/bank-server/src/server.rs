use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use bank_broker::Broker;
use bank_core::Timestamp;
use bank_session::{tokenize, Session};
use bank_store::Store;

use crate::commands::{self, Outcome};

/// Everything a worker thread needs to process a command: the one shared
/// [`Store`] (mutated under its own mutex for exactly the duration of a
/// mutate-then-snapshot) and the one shared [`Broker`] (internally
/// mutex-and-condvar guarded).
pub struct ServerState {
    pub store: Mutex<Store>,
    pub broker: Broker,
}

/// The verification spool lives alongside the snapshot at the fixed name
/// `verification_queue.dat`, not derived from the snapshot's own file name —
/// so `data/accounts.dat` and `data/verification_queue.dat` are siblings
/// regardless of what the snapshot file is called.
pub fn spool_path_for(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join("verification_queue.dat"),
        _ => PathBuf::from("verification_queue.dat"),
    }
}

/// TCP front door. The accept loop polls a nonblocking listener in ~100 ms
/// slices so `stop()` is observed promptly; each accepted connection is
/// handed to its own detached worker thread.
pub struct Server {
    state: Arc<ServerState>,
    running: Arc<AtomicBool>,
    listener: TcpListener,
    accept_thread: Option<thread::JoinHandle<()>>,
    connection_count: Arc<AtomicU64>,
}

impl Server {
    pub fn bind(addr: &str, state: Arc<ServerState>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        Ok(Server { state, running: Arc::new(AtomicBool::new(false)), listener, accept_thread: None, connection_count: Arc::new(AtomicU64::new(0)) })
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    pub fn run(&mut self) {
        self.running.store(true, Ordering::SeqCst);
        let listener = self.listener.try_clone().expect("clone listener");
        let running = Arc::clone(&self.running);
        let state = Arc::clone(&self.state);
        let connection_count = Arc::clone(&self.connection_count);

        self.accept_thread = Some(thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, addr)) => {
                        let state = Arc::clone(&state);
                        let id = connection_count.fetch_add(1, Ordering::SeqCst);
                        tracing::info!(connection = id, peer = %addr, "client connected");
                        thread::spawn(move || {
                            handle_connection(stream, &state);
                            tracing::info!(connection = id, "client disconnected");
                        });
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(100));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "accept failed");
                        thread::sleep(Duration::from_millis(100));
                    }
                }
            }
        }));
    }

    /// Stops accepting new connections and flushes the store. Already
    /// connected workers are detached; they run to completion on their own
    /// as their sockets close.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.accept_thread.take() {
            let _ = handle.join();
        }
        let store = self.state.store.lock().unwrap();
        if let Err(e) = store.save() {
            tracing::warn!(error = %e, "failed to flush store on shutdown");
        }
        tracing::info!("server stopped");
    }
}

const WELCOME: &str = "Welcome to Secure Bank System!\nAvailable commands:\nRATES - view current interest rates\nREGISTER \"Full Name\" \"Birth Date\" \"Passport\" \"Password\" - create account\nLOGIN <account_id> <password> - login to existing account\nSUPERLOGIN <account_id> <password> - security officer login\nHELP - show all commands";

fn handle_connection(stream: TcpStream, state: &Arc<ServerState>) {
    let mut writer = match stream.try_clone() {
        Ok(w) => w,
        Err(e) => {
            tracing::warn!(error = %e, "failed to clone connection for writing");
            return;
        }
    };
    if send_line(&mut writer, WELCOME).is_err() {
        return;
    }

    let mut session = Session::new();
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }
        let trimmed = line.trim_end_matches(['\n', '\r']);
        let now = now_ts();
        tracing::debug!(command = %trimmed, "dispatching command");
        let outcome = process_line(trimmed, &mut session, state, now, &mut writer);
        match outcome {
            Outcome::Continue(response) => {
                if send_line(&mut writer, &response).is_err() {
                    break;
                }
            }
            Outcome::Disconnect(response) => {
                let _ = send_line(&mut writer, &response);
                break;
            }
        }
    }
}

fn process_line(line: &str, session: &mut Session, state: &ServerState, now: Timestamp, out: &mut dyn Write) -> Outcome {
    let tokens = match tokenize(line) {
        Ok(tokens) => tokens,
        Err(e) => return Outcome::Continue(format!("ERROR: {e}")),
    };
    if tokens.is_empty() {
        return Outcome::Continue(format!("ERROR: {}", bank_core::BankError::EmptyCommand));
    }
    let cmd = match commands::parse(&tokens) {
        Ok(cmd) => cmd,
        Err(e) => return Outcome::Continue(format!("ERROR: {e}")),
    };
    commands::dispatch(cmd, session, state, now, out)
}

fn send_line(out: &mut dyn Write, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

fn now_ts() -> Timestamp {
    std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap_or_default().as_secs() as Timestamp
}
