//! End-to-end smoke test for bank-server.
//!
//! Starts a real server process against a fresh data directory, drives it
//! over a raw TCP connection the way a real client would, and asserts the
//! full accept → register → verify → transact → disconnect path works.
//!
//! Run with:
//!   cargo test -p bank-server --test smoke

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

struct ServerGuard {
    child: Child,
    data_dir: PathBuf,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port()
}

struct Conn {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Conn {
    fn connect(port: u16, timeout: Duration) -> Option<Self> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(stream) = TcpStream::connect(("127.0.0.1", port)) {
                let writer = stream.try_clone().unwrap();
                let mut conn = Conn { reader: BufReader::new(stream), writer };
                conn.read_line(); // welcome banner
                return Some(conn);
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        None
    }

    fn read_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).expect("read line from server");
        line.trim_end_matches(['\n', '\r']).to_string()
    }

    fn send(&mut self, line: &str) -> String {
        self.writer.write_all(line.as_bytes()).unwrap();
        self.writer.write_all(b"\n").unwrap();
        self.writer.flush().unwrap();
        self.read_line()
    }
}

#[test]
fn full_register_verify_deposit_transfer_flow() {
    let data_dir = std::env::temp_dir().join(format!("bank_server_smoke_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&data_dir);
    std::fs::create_dir_all(&data_dir).unwrap();

    let port = free_port();
    let db_path = data_dir.join("accounts.dat");

    let bin = env!("CARGO_BIN_EXE_bank-server");
    let child = Command::new(bin)
        .args(["--port", &port.to_string(), "--db-path", db_path.to_str().unwrap()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn bank-server");
    let _guard = ServerGuard { child, data_dir };

    let mut alice = Conn::connect(port, Duration::from_secs(10)).expect("server did not become ready");

    let response = alice.send(r#"REGISTER "Alice Anderson" "1990-05-15" "1234567890" "alicepass""#);
    assert!(response.starts_with("SUCCESS: Registration completed!"));
    let id_line = alice.read_line();
    let alice_id = id_line.strip_prefix("Your account ID: ").unwrap().split(' ').next().unwrap().to_string();
    for _ in 0..10 {
        alice.read_line();
    }

    assert!(alice.send(&format!("LOGIN {alice_id} alicepass")).starts_with("SUCCESS: Login successful"));
    for _ in 0..6 {
        alice.read_line();
    }

    let mut operator = Conn::connect(port, Duration::from_secs(5)).unwrap();
    assert_eq!(operator.send("SUPERLOGIN SUPER001 superpass123"), "SUCCESS: Security officer login successful");
    assert!(operator.send("PENDING_VERIFICATIONS").starts_with("Pending Verification Requests:"));
    let entry = operator.read_line();
    assert!(entry.starts_with("[0]"));
    assert_eq!(operator.send("VERIFY 0"), format!("SUCCESS: Client {alice_id} verified"));

    assert_eq!(alice.send("CREATE_ACCOUNT 0"), format!("SUCCESS: New Savings account created: {alice_id}_SAV_1"));
    assert_eq!(alice.send("DEPOSIT 1000"), "SUCCESS: Deposit completed");

    let mut bob = Conn::connect(port, Duration::from_secs(5)).unwrap();
    bob.send(r#"REGISTER "Bob Builder" "1985-02-20" "9876543210" "bobpassword""#);
    let bob_id_line = bob.read_line();
    let bob_id = bob_id_line.strip_prefix("Your account ID: ").unwrap().split(' ').next().unwrap().to_string();
    for _ in 0..10 {
        bob.read_line();
    }
    bob.send(&format!("LOGIN {bob_id} bobpassword"));
    for _ in 0..6 {
        bob.read_line();
    }
    assert!(operator.send("VERIFY 0").starts_with("SUCCESS"));
    assert_eq!(bob.send("CREATE_ACCOUNT 0"), format!("SUCCESS: New Savings account created: {bob_id}_SAV_1"));

    assert_eq!(alice.send(&format!("TRANSFER {bob_id} 400 rent")), "SUCCESS: Transfer completed");

    let response = alice.send("ACCOUNTS");
    assert_eq!(response, "Your accounts:");
    let line = alice.read_line();
    assert!(line.starts_with(&format!("[0] {alice_id}_SAV_1")));
    assert!(line.contains("$600"));

    let response = bob.send("ACCOUNTS");
    assert_eq!(response, "Your accounts:");
    let line = bob.read_line();
    assert!(line.contains("$400"));

    assert_eq!(alice.send("LOGOUT"), "SUCCESS: Logged out");
    assert_eq!(alice.send("EXIT"), "Goodbye!");
}
