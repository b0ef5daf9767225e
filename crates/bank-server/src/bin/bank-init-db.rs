//! Seeds a fresh snapshot with fixture clients and one pending verification
//! request, so a freshly cloned checkout has something to log into. Not
//! reachable from the wire protocol.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bank_broker::Broker;
use bank_core::{Account, AccountType, ApprovalRequest, Client, ClientStatus, OperationType, RequestStatus};
use bank_server::bootstrap;
use bank_server::server::spool_path_for;
use bank_store::Store;

#[derive(Parser, Debug)]
#[command(name = "bank-init-db", about = "Seed a fresh bank-server snapshot with fixture data")]
struct Args {
    #[arg(long = "db-path", default_value = "data/accounts.dat")]
    db_path: PathBuf,

    /// Overwrite an existing snapshot at db-path instead of refusing.
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    if args.db_path.exists() && !args.force {
        anyhow::bail!("{} already exists; pass --force to overwrite", args.db_path.display());
    }

    if let Some(parent) = args.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("creating data directory")?;
        }
    }
    if args.db_path.exists() {
        std::fs::remove_file(&args.db_path).context("removing existing snapshot")?;
    }

    let mut store = Store::open(&args.db_path).context("opening store")?;
    bootstrap::ensure_super_user(&mut store)?;

    let mut alice = Client {
        account_id: "ACC1001".to_string(),
        full_name: "Alice Anderson".to_string(),
        birth_date: "1990-05-14".to_string(),
        passport_data: "1234567890".to_string(),
        password_hash: bank_crypto::hash_password("alicepass"),
        status: ClientStatus::Verified,
        accounts: Vec::new(),
    };
    alice.accounts.push(Account::new("ACC1001_SAV_1", AccountType::Savings, 5000.0));
    alice.accounts.push(Account::new("ACC1001_CHK_2", AccountType::Checking, 1200.0));
    store.add_client(alice)?;

    let mut bob = Client {
        account_id: "ACC1002".to_string(),
        full_name: "Bob Builder".to_string(),
        birth_date: "1985-02-20".to_string(),
        passport_data: "0987654321".to_string(),
        password_hash: bank_crypto::hash_password("bobpassword"),
        status: ClientStatus::Verified,
        accounts: Vec::new(),
    };
    bob.accounts.push(Account::new("ACC1002_CHK_1", AccountType::Checking, 2500.0));
    store.add_client(bob)?;

    let carol = Client {
        account_id: "ACC1003".to_string(),
        full_name: "Carol Carpenter".to_string(),
        birth_date: "1995-11-02".to_string(),
        passport_data: "1122334455".to_string(),
        password_hash: bank_crypto::hash_password("carolpassword"),
        status: ClientStatus::PendingVerification,
        accounts: Vec::new(),
    };
    store.add_client(carol)?;

    let broker = Broker::open(spool_path_for(&args.db_path));
    let request = ApprovalRequest {
        request_id: broker.generate_request_id(),
        client_account_id: "ACC1003".to_string(),
        operation_type: OperationType::Verification,
        amount: 0.0,
        target_account: String::new(),
        description: "Name: Carol Carpenter | Birth: 1995-11-02 | Passport: 1122334455".to_string(),
        timestamp: 0,
        status: RequestStatus::Pending,
    };
    broker.submit(request);

    println!("Seeded {} at {}", store.client_count(), args.db_path.display());
    println!("  ACC1001 / alicepass  (verified, 2 accounts)");
    println!("  ACC1002 / bobpassword (verified, 1 account)");
    println!("  ACC1003 / carolpassword (pending verification, 0 accounts)");
    println!("  SUPER001 / superpass123 (security officer)");
    Ok(())
}
