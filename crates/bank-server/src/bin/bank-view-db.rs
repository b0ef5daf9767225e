//! Read-only dump of a bank-server snapshot for operational inspection.
//! Opens the snapshot and settings file the same way the server does but
//! never writes them back.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bank_store::Store;

#[derive(Parser, Debug)]
#[command(name = "bank-view-db", about = "Print a summary of a bank-server snapshot")]
struct Args {
    #[arg(long = "db-path", default_value = "data/accounts.dat")]
    db_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();
    let args = Args::parse();

    let store = Store::open(&args.db_path).with_context(|| format!("opening {}", args.db_path.display()))?;

    println!("Snapshot: {}", args.db_path.display());
    println!("Clients: {}", store.client_count());
    println!("Accounts: {}", store.total_accounts_count());
    println!("Total balance: ${:.2}", store.total_balance());

    let settings = store.settings();
    println!(
        "Rates: credit {:.2}% / deposit {:.2}% | thresholds: large op ${:.2}, large loan ${:.2}",
        settings.credit_interest_rate, settings.deposit_interest_rate, settings.large_operation_threshold, settings.large_loan_threshold
    );

    println!();
    for client in store.all_clients() {
        println!(
            "{} | {} | {:?} | {} account(s)",
            client.account_id,
            client.full_name,
            client.status,
            client.accounts.len()
        );
    }

    Ok(())
}
