use std::io::Write;

use bank_core::{BankError, BankResult, Timestamp};
use bank_session::Session;

use crate::handlers;
use crate::server::ServerState;

/// A parsed command line, still holding its raw argument tokens — numeric
/// and index parsing happens in the handler for each command, not here,
/// mirroring the one-handler-per-command structure this dispatches into.
#[derive(Debug, Clone)]
pub enum Command {
    Rates,
    Register(Vec<String>),
    Login(Vec<String>),
    SuperLogin(Vec<String>),
    Help,
    Exit,
    Accounts,
    Deposit(Vec<String>),
    DepositTo(Vec<String>),
    Withdraw(Vec<String>),
    WithdrawFrom(Vec<String>),
    Transfer(Vec<String>),
    TransferFrom(Vec<String>),
    History(Vec<String>),
    CreateAccount(Vec<String>),
    Info,
    Logout,
    PendingRequests,
    PendingVerifications,
    Approve(Vec<String>),
    Reject(Vec<String>),
    Verify(Vec<String>),
    SetRates(Vec<String>),
    Settings,
    LoanRequest,
    DepositOpen,
}

/// What the accept loop should do with a processed line: send the response
/// and keep reading, or send it and close the connection.
pub enum Outcome {
    Continue(String),
    Disconnect(String),
}

/// Matches the command word case-insensitively and shapes the remaining
/// tokens into a [`Command`]. Unknown words are `BankError::UnknownCommand`.
pub fn parse(tokens: &[String]) -> BankResult<Command> {
    let word = tokens[0].to_ascii_uppercase();
    let rest = tokens[1..].to_vec();
    let cmd = match word.as_str() {
        "RATES" => Command::Rates,
        "REGISTER" => Command::Register(rest),
        "LOGIN" => Command::Login(rest),
        "SUPERLOGIN" => Command::SuperLogin(rest),
        "HELP" => Command::Help,
        "EXIT" | "QUIT" => Command::Exit,
        "ACCOUNTS" => Command::Accounts,
        "DEPOSIT" => Command::Deposit(rest),
        "DEPOSIT_TO" => Command::DepositTo(rest),
        "WITHDRAW" => Command::Withdraw(rest),
        "WITHDRAW_FROM" => Command::WithdrawFrom(rest),
        "TRANSFER" => Command::Transfer(rest),
        "TRANSFER_FROM" => Command::TransferFrom(rest),
        "HISTORY" => Command::History(rest),
        "CREATE_ACCOUNT" => Command::CreateAccount(rest),
        "INFO" => Command::Info,
        "LOGOUT" => Command::Logout,
        "PENDING_REQUESTS" => Command::PendingRequests,
        "PENDING_VERIFICATIONS" => Command::PendingVerifications,
        "APPROVE" => Command::Approve(rest),
        "REJECT" => Command::Reject(rest),
        "VERIFY" => Command::Verify(rest),
        "SET_RATES" => Command::SetRates(rest),
        "SETTINGS" => Command::Settings,
        "LOAN_REQUEST" => Command::LoanRequest,
        "DEPOSIT_OPEN" => Command::DepositOpen,
        _ => return Err(BankError::UnknownCommand(tokens[0].clone())),
    };
    Ok(cmd)
}

/// Runs a parsed command against `session`, returning the line (or two
/// lines, for the large-operation NOTICE case written eagerly to `out`) to
/// send back. The only formatting this outer layer does is turn an `Err`
/// from [`dispatch_inner`] into `"ERROR: {e}"` — every handler's `Ok` is
/// already the exact success line.
pub fn dispatch(cmd: Command, session: &mut Session, state: &ServerState, now: Timestamp, out: &mut dyn Write) -> Outcome {
    if let Command::Exit = cmd {
        return Outcome::Disconnect("Goodbye!".to_string());
    }
    if let Command::Help = cmd {
        return Outcome::Continue(handlers::help_text(session));
    }

    match dispatch_inner(cmd, session, state, now, out) {
        Ok(response) => Outcome::Continue(response),
        Err(e) => Outcome::Continue(format!("ERROR: {e}")),
    }
}

fn dispatch_inner(cmd: Command, session: &mut Session, state: &ServerState, now: Timestamp, out: &mut dyn Write) -> BankResult<String> {
    match cmd {
        Command::Rates => handlers::rates(state),
        Command::Register(args) => handlers::register(state, &args, now),
        Command::Login(args) => handlers::login(state, session, &args, now),
        Command::SuperLogin(args) => handlers::super_login(state, session, &args, now),
        Command::Help | Command::Exit => unreachable!("handled in dispatch"),
        Command::Accounts => handlers::accounts(state, session),
        Command::Deposit(args) => handlers::deposit(state, session, &args, now),
        Command::DepositTo(args) => handlers::deposit_to(state, session, &args, now),
        Command::Withdraw(args) => handlers::withdraw(state, session, &args, now, out),
        Command::WithdrawFrom(args) => handlers::withdraw_from(state, session, &args, now, out),
        Command::Transfer(args) => handlers::transfer(state, session, &args, now, out),
        Command::TransferFrom(args) => handlers::transfer_from(state, session, &args, now, out),
        Command::History(args) => handlers::history(state, session, &args),
        Command::CreateAccount(args) => handlers::create_account(state, session, &args),
        Command::Info => handlers::info(state, session),
        Command::Logout => {
            session.require_authenticated()?;
            session.logout();
            Ok("SUCCESS: Logged out".to_string())
        }
        Command::PendingRequests => {
            session.require_operator()?;
            handlers::pending_requests(state)
        }
        Command::PendingVerifications => {
            session.require_operator()?;
            handlers::pending_verifications(state)
        }
        Command::Approve(args) => {
            session.require_operator()?;
            handlers::approve(state, &args)
        }
        Command::Reject(args) => {
            session.require_operator()?;
            handlers::reject(state, &args)
        }
        Command::Verify(args) => {
            session.require_operator()?;
            handlers::verify(state, &args)
        }
        Command::SetRates(args) => {
            session.require_operator()?;
            handlers::set_rates(state, &args)
        }
        Command::Settings => {
            session.require_operator()?;
            handlers::settings(state)
        }
        Command::LoanRequest => {
            session.require_authenticated()?;
            Ok("INFO: Loan functionality will be implemented in future version".to_string())
        }
        Command::DepositOpen => {
            session.require_authenticated()?;
            Ok("INFO: Deposit functionality will be implemented in future version".to_string())
        }
    }
}
