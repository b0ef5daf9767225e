use std::io::Write;
use std::time::Duration;

use bank_core::{
    Account, AccountType, ApprovalRequest, BankError, BankResult, Client, ClientStatus, OperationType, RequestStatus, Timestamp,
};
use bank_session::Session;
use rand::Rng;

use crate::policy::{self, OperationKind};
use crate::server::ServerState;

pub fn rates(state: &ServerState) -> BankResult<String> {
    let settings = state.store.lock().unwrap().settings();
    Ok(format!(
        "Current Bank Rates:\nCredit Interest Rate: {}%\nDeposit Interest Rate: {}%\nLarge Operation Threshold: ${}\nLarge Loan Threshold: ${}\n\nNew users must be verified to access full functionality.",
        settings.credit_interest_rate, settings.deposit_interest_rate, settings.large_operation_threshold, settings.large_loan_threshold
    ))
}

pub fn register(state: &ServerState, args: &[String], now: Timestamp) -> BankResult<String> {
    if args.len() != 4 {
        return Err(BankError::WrongArgCount { expected: "4", got: args.len() });
    }
    let full_name = args[0].clone();
    let birth_date = args[1].clone();
    let passport = args[2].clone();
    let password = args[3].clone();

    if full_name.len() < 5 || !full_name.contains(' ') {
        return Err(BankError::InvalidName);
    }
    validate_birth_date(&birth_date)?;
    if passport.len() != 10 || !passport.chars().all(|c| c.is_ascii_digit()) {
        return Err(BankError::InvalidPassport);
    }
    if password.len() < 6 {
        return Err(BankError::InvalidPassword);
    }

    let (account_id, cap) = {
        let mut store = state.store.lock().unwrap();
        if store.is_passport_exists(&passport) {
            return Err(BankError::DuplicatePassport);
        }
        let account_id = generate_unique_account_id(&store);
        let client = Client {
            account_id: account_id.clone(),
            full_name: full_name.clone(),
            birth_date: birth_date.clone(),
            passport_data: passport.clone(),
            password_hash: bank_crypto::hash_password(&password),
            status: ClientStatus::PendingVerification,
            accounts: Vec::new(),
        };
        store.add_client(client)?;
        (account_id, store.settings().unverified_operation_cap())
    };

    let request = ApprovalRequest {
        request_id: state.broker.generate_request_id(),
        client_account_id: account_id.clone(),
        operation_type: OperationType::Verification,
        amount: 0.0,
        target_account: String::new(),
        description: format!("Name: {full_name} | Birth: {birth_date} | Passport: {passport}"),
        timestamp: now,
        status: RequestStatus::Pending,
    };
    state.broker.submit(request);
    tracing::info!(account_id = %account_id, "new client registered, pending verification");

    Ok(format!(
        "SUCCESS: Registration completed!\nYour account ID: {account_id} (SAVE THIS!)\nFull Name: {full_name}\nStatus: PENDING VERIFICATION\n\nAs an unverified user, you have limited functionality:\n- Max transaction: ${cap}\n- No credit accounts\n- No deposit accounts\n\nYour account is awaiting security verification.\nYou can login now with: LOGIN {account_id} {password}"
    ))
}

fn validate_birth_date(s: &str) -> BankResult<()> {
    let parts: Vec<&str> = s.split('-').collect();
    if s.len() != 10 || parts.len() != 3 {
        return Err(BankError::InvalidDate);
    }
    let year: i32 = parts[0].parse().map_err(|_| BankError::InvalidDate)?;
    let month: u32 = parts[1].parse().map_err(|_| BankError::InvalidDate)?;
    let day: u32 = parts[2].parse().map_err(|_| BankError::InvalidDate)?;
    if !(1900..=2025).contains(&year) {
        return Err(BankError::InvalidDate);
    }
    chrono::NaiveDate::from_ymd_opt(year, month, day).ok_or(BankError::InvalidDate)?;
    Ok(())
}

pub fn login(state: &ServerState, session: &mut Session, args: &[String], now: Timestamp) -> BankResult<String> {
    if args.len() != 2 {
        return Err(BankError::WrongArgCount { expected: "2", got: args.len() });
    }
    let store = state.store.lock().unwrap();
    let client = store.authenticate(&args[0], &args[1]).ok_or(BankError::InvalidCredentials)?;
    let status_text = if client.status == ClientStatus::Verified { "VERIFIED" } else { "PENDING VERIFICATION" };
    let account_count = client.accounts.len();
    let account_id = client.account_id.clone();
    let unverified_note = if client.status != ClientStatus::Verified {
        "\n\nNOTE: Your account is not yet verified.\nSome features are limited until security verification."
    } else {
        ""
    };
    drop(store);
    session.login(account_id.clone(), false, now)?;
    tracing::info!(account_id = %account_id, "client logged in");
    Ok(format!("SUCCESS: Login successful\nAccount: {account_id}\nStatus: {status_text}\nAccounts: {account_count}{unverified_note}"))
}

pub fn super_login(state: &ServerState, session: &mut Session, args: &[String], now: Timestamp) -> BankResult<String> {
    if args.len() != 2 {
        return Err(BankError::WrongArgCount { expected: "2", got: args.len() });
    }
    let store = state.store.lock().unwrap();
    let client = store.authenticate(&args[0], &args[1]).ok_or(BankError::InvalidCredentials)?;
    if !client.is_super_user() {
        return Err(BankError::NotSuperUser);
    }
    let account_id = client.account_id.clone();
    drop(store);
    session.login(account_id.clone(), true, now)?;
    tracing::info!(account_id = %account_id, "security officer logged in");
    Ok("SUCCESS: Security officer login successful".to_string())
}

pub fn help_text(session: &Session) -> String {
    let mut text = String::from("Available commands:\nRATES - view current interest rates\n");
    if !session.is_authenticated() {
        text.push_str(
            "REGISTER \"Full Name\" \"Birth Date\" \"Passport\" \"Password\" - create account\nLOGIN <account_id> <password> - login to existing account\nSUPERLOGIN <account_id> <password> - security officer login\n",
        );
    } else {
        text.push_str(
            "ACCOUNTS - list all your accounts\nDEPOSIT <amount> [description] - deposit to first account\nDEPOSIT_TO <account_index> <amount> [description] - deposit to specific account\nWITHDRAW <amount> [description] - withdraw from first account\nWITHDRAW_FROM <account_index> <amount> [description] - withdraw from specific account\nTRANSFER <target_account_id> <amount> [description] - transfer from first account\nTRANSFER_FROM <account_index> <target_account_id> <amount> [description] - transfer from specific account\nHISTORY [account_index] - show transaction history\nCREATE_ACCOUNT <type> - create account (0=Savings, 1=Checking, 2=Credit, 3=Deposit)\nINFO - show your client information\n",
        );
        if session.is_operator() {
            text.push_str(
                "SECURITY OFFICER COMMANDS:\nPENDING_REQUESTS - show pending operation requests\nPENDING_VERIFICATIONS - show pending verification requests\nAPPROVE <request_index> - approve an operation request\nREJECT <request_index> - reject an operation request\nVERIFY <request_index> - verify a client\nSET_RATES <credit_rate> <deposit_rate> - update interest rates\nSETTINGS - show current bank settings\n",
            );
        }
        text.push_str("LOGOUT - logout from the system\n");
    }
    text.push_str("HELP - show this help\nEXIT - quit the application");
    text
}

pub fn accounts(state: &ServerState, session: &Session) -> BankResult<String> {
    let account_id = session.require_authenticated()?;
    let store = state.store.lock().unwrap();
    let client = store.find_client(account_id).ok_or_else(|| BankError::ClientNotFound(account_id.to_string()))?;
    if client.accounts.is_empty() {
        return Ok("Your accounts:\nNo accounts yet.".to_string());
    }
    let mut out = String::from("Your accounts:\n");
    for (i, account) in client.accounts.iter().enumerate() {
        out.push_str(&format!("[{i}] {} ({}): ${}", account.number, account.account_type.display_name(), account.balance));
        if account.credit_limit > 0.0 {
            out.push_str(&format!(" (Credit limit: ${})", account.credit_limit));
        }
        out.push('\n');
    }
    out.pop();
    Ok(out)
}

pub fn deposit(state: &ServerState, session: &Session, args: &[String], now: Timestamp) -> BankResult<String> {
    let account_id = session.require_authenticated()?.to_string();
    if args.is_empty() {
        return Err(BankError::WrongArgCount { expected: "1 or 2", got: args.len() });
    }
    let amount: f64 = args[0].parse().map_err(|_| BankError::NotANumber(args[0].clone()))?;
    let description = args.get(1).cloned().unwrap_or_default();

    let mut store = state.store.lock().unwrap();
    {
        let client = store.find_client(&account_id).ok_or_else(|| BankError::ClientNotFound(account_id.clone()))?;
        if client.accounts.is_empty() {
            return Err(BankError::NoAccounts);
        }
        let settings = store.settings();
        policy::can_perform_operation(client.status, session.is_operator(), OperationKind::Deposit, amount, &settings)?;
    }
    let txn_id = generate_txn_id();
    store.deposit(&account_id, 0, amount, &description, txn_id, now)?;
    Ok("SUCCESS: Deposit completed".to_string())
}

pub fn deposit_to(state: &ServerState, session: &Session, args: &[String], now: Timestamp) -> BankResult<String> {
    let account_id = session.require_authenticated()?.to_string();
    if args.len() < 2 {
        return Err(BankError::WrongArgCount { expected: "2 or 3", got: args.len() });
    }
    let index: usize = args[0].parse().map_err(|_| BankError::NotAnIndex(args[0].clone()))?;
    let amount: f64 = args[1].parse().map_err(|_| BankError::NotANumber(args[1].clone()))?;
    let description = args.get(2).cloned().unwrap_or_default();

    let mut store = state.store.lock().unwrap();
    let account_number = {
        let client = store.find_client(&account_id).ok_or_else(|| BankError::ClientNotFound(account_id.clone()))?;
        let account = client.accounts.get(index).ok_or(BankError::AccountIndexOutOfRange(index))?;
        let settings = store.settings();
        policy::can_perform_operation(client.status, session.is_operator(), OperationKind::Deposit, amount, &settings)?;
        account.number.clone()
    };
    let txn_id = generate_txn_id();
    store.deposit(&account_id, index, amount, &description, txn_id, now)?;
    Ok(format!("SUCCESS: Deposit completed to account {account_number}"))
}

pub fn withdraw(state: &ServerState, session: &Session, args: &[String], now: Timestamp, out: &mut dyn Write) -> BankResult<String> {
    let account_id = session.require_authenticated()?.to_string();
    if args.is_empty() {
        return Err(BankError::WrongArgCount { expected: "1 or 2", got: args.len() });
    }
    let amount: f64 = args[0].parse().map_err(|_| BankError::NotANumber(args[0].clone()))?;
    let description = args.get(1).cloned().unwrap_or_default();
    withdraw_at(state, session, &account_id, 0, amount, &description, now, out)?;
    Ok("SUCCESS: Withdrawal completed".to_string())
}

pub fn withdraw_from(state: &ServerState, session: &Session, args: &[String], now: Timestamp, out: &mut dyn Write) -> BankResult<String> {
    let account_id = session.require_authenticated()?.to_string();
    if args.len() < 2 {
        return Err(BankError::WrongArgCount { expected: "2 or 3", got: args.len() });
    }
    let index: usize = args[0].parse().map_err(|_| BankError::NotAnIndex(args[0].clone()))?;
    let amount: f64 = args[1].parse().map_err(|_| BankError::NotANumber(args[1].clone()))?;
    let description = args.get(2).cloned().unwrap_or_default();
    let account_number = withdraw_at(state, session, &account_id, index, amount, &description, now, out)?;
    Ok(format!("SUCCESS: Withdrawal completed from account {account_number}"))
}

fn withdraw_at(
    state: &ServerState,
    session: &Session,
    account_id: &str,
    index: usize,
    amount: f64,
    description: &str,
    now: Timestamp,
    out: &mut dyn Write,
) -> BankResult<String> {
    let (account_number, client_status, threshold) = {
        let store = state.store.lock().unwrap();
        let client = store.find_client(account_id).ok_or_else(|| BankError::ClientNotFound(account_id.to_string()))?;
        if client.accounts.is_empty() {
            return Err(BankError::NoAccounts);
        }
        let account = client.accounts.get(index).ok_or(BankError::AccountIndexOutOfRange(index))?;
        let settings = store.settings();
        policy::can_perform_operation(client.status, session.is_operator(), OperationKind::Withdraw, amount, &settings)?;
        (account.number.clone(), client.status, settings.large_operation_threshold)
    };

    if client_status == ClientStatus::Verified && amount > threshold {
        require_approval(state, out, OperationType::Withdraw, account_id, amount, "", description, now, "withdrawal")?;
    }

    let txn_id = generate_txn_id();
    let mut store = state.store.lock().unwrap();
    store.withdraw(account_id, index, amount, description, txn_id, now)?;
    Ok(account_number)
}

pub fn transfer(state: &ServerState, session: &Session, args: &[String], now: Timestamp, out: &mut dyn Write) -> BankResult<String> {
    let account_id = session.require_authenticated()?.to_string();
    if args.len() < 2 {
        return Err(BankError::WrongArgCount { expected: "2 or 3", got: args.len() });
    }
    let target = args[0].clone();
    let amount: f64 = args[1].parse().map_err(|_| BankError::NotANumber(args[1].clone()))?;
    let description = args.get(2).cloned().unwrap_or_default();
    transfer_at(state, session, &account_id, 0, &target, amount, &description, now, out)?;
    Ok("SUCCESS: Transfer completed".to_string())
}

pub fn transfer_from(state: &ServerState, session: &Session, args: &[String], now: Timestamp, out: &mut dyn Write) -> BankResult<String> {
    let account_id = session.require_authenticated()?.to_string();
    if args.len() < 3 {
        return Err(BankError::WrongArgCount { expected: "3 or 4", got: args.len() });
    }
    let index: usize = args[0].parse().map_err(|_| BankError::NotAnIndex(args[0].clone()))?;
    let target = args[1].clone();
    let amount: f64 = args[2].parse().map_err(|_| BankError::NotANumber(args[2].clone()))?;
    let description = args.get(3).cloned().unwrap_or_default();
    let account_number = transfer_at(state, session, &account_id, index, &target, amount, &description, now, out)?;
    Ok(format!("SUCCESS: Transfer completed from account {account_number}"))
}

#[allow(clippy::too_many_arguments)]
fn transfer_at(
    state: &ServerState,
    session: &Session,
    account_id: &str,
    index: usize,
    target_account_id: &str,
    amount: f64,
    description: &str,
    now: Timestamp,
    out: &mut dyn Write,
) -> BankResult<String> {
    let (account_number, client_status, threshold) = {
        let store = state.store.lock().unwrap();
        let client = store.find_client(account_id).ok_or_else(|| BankError::ClientNotFound(account_id.to_string()))?;
        if client.accounts.is_empty() {
            return Err(BankError::NoAccounts);
        }
        let account = client.accounts.get(index).ok_or(BankError::AccountIndexOutOfRange(index))?;
        let settings = store.settings();
        policy::can_perform_operation(client.status, session.is_operator(), OperationKind::Transfer, amount, &settings)?;

        let target = store.find_client(target_account_id).ok_or_else(|| BankError::TargetAccountNotFound(target_account_id.to_string()))?;
        if target.accounts.is_empty() {
            return Err(BankError::TargetAccountNotFound(target_account_id.to_string()));
        }
        (account.number.clone(), client.status, settings.large_operation_threshold)
    };

    if client_status == ClientStatus::Verified && amount > threshold {
        require_approval(state, out, OperationType::Transfer, account_id, amount, target_account_id, description, now, "transfer")?;
    }

    let out_txn = generate_txn_id();
    let in_txn = generate_txn_id();
    let mut store = state.store.lock().unwrap();
    store.transfer(account_id, index, target_account_id, amount, description, out_txn, in_txn, now)?;
    Ok(account_number)
}

#[allow(clippy::too_many_arguments)]
fn require_approval(
    state: &ServerState,
    out: &mut dyn Write,
    kind: OperationType,
    account_id: &str,
    amount: f64,
    target_account: &str,
    description: &str,
    now: Timestamp,
    noun: &str,
) -> BankResult<()> {
    let _ = writeln!(out, "NOTICE: Large {noun} requires security approval.\nRequest sent to security department. Please wait...");
    let _ = out.flush();

    let request = ApprovalRequest {
        request_id: state.broker.generate_request_id(),
        client_account_id: account_id.to_string(),
        operation_type: kind,
        amount,
        target_account: target_account.to_string(),
        description: description.to_string(),
        timestamp: now,
        status: RequestStatus::Pending,
    };
    let request_id = request.request_id.clone();
    state.broker.submit(request);
    tracing::info!(request_id = %request_id, account_id, amount, "large operation submitted for approval");

    if !state.broker.wait_for_decision(kind, &request_id, Duration::from_secs(30)) {
        return Err(BankError::OperationRejected);
    }
    Ok(())
}

pub fn history(state: &ServerState, session: &Session, args: &[String]) -> BankResult<String> {
    let account_id = session.require_authenticated()?.to_string();
    let index: usize = match args.first() {
        Some(s) => s.parse().map_err(|_| BankError::NotAnIndex(s.clone()))?,
        None => 0,
    };
    let store = state.store.lock().unwrap();
    let client = store.find_client(&account_id).ok_or_else(|| BankError::ClientNotFound(account_id.clone()))?;
    let account = client.accounts.get(index).ok_or(BankError::AccountIndexOutOfRange(index))?;

    let mut out = format!("Transaction history for {}:\n", account.number);
    if account.transactions.is_empty() {
        out.push_str("No transactions found");
    } else {
        for txn in &account.transactions {
            out.push_str(&format!("{}: {} ${}", txn.id, txn.kind.as_str(), txn.amount));
            if !txn.description.is_empty() {
                out.push_str(&format!(" ({})", txn.description));
            }
            if !txn.target_account.is_empty() {
                out.push_str(&format!(" -> {}", txn.target_account));
            }
            out.push('\n');
        }
        out.pop();
    }
    Ok(out)
}

pub fn create_account(state: &ServerState, session: &Session, args: &[String]) -> BankResult<String> {
    let account_id = session.require_authenticated()?.to_string();
    if args.is_empty() {
        return Err(BankError::WrongArgCount { expected: "1", got: 0 });
    }
    let type_int: i64 = args[0].parse().map_err(|_| BankError::NotANumber(args[0].clone()))?;
    let account_type = AccountType::from_int(type_int)?;

    let mut store = state.store.lock().unwrap();
    let (client_status, ordinal) = {
        let client = store.find_client(&account_id).ok_or_else(|| BankError::ClientNotFound(account_id.clone()))?;
        (client.status, client.accounts.len())
    };

    if client_status != ClientStatus::Verified && matches!(account_type, AccountType::Credit | AccountType::Deposit) {
        return Err(BankError::AccountTypeRequiresVerification(account_type.display_name()));
    }
    let settings = store.settings();
    policy::can_perform_operation(client_status, session.is_operator(), OperationKind::CreateAccount, 0.0, &settings)?;

    let number = format!("{account_id}_{}_{}", account_type.number_prefix(), ordinal + 1);
    let mut account = Account::new(number.clone(), account_type, 0.0);
    if account_type == AccountType::Credit {
        account.credit_limit = settings.large_loan_threshold;
    }
    let credit_limit = account.credit_limit;
    store.add_account_to_client(&account_id, account)?;

    if account_type == AccountType::Credit {
        Ok(format!("SUCCESS: New {} account created: {number} with credit limit: ${credit_limit}", account_type.display_name()))
    } else {
        Ok(format!("SUCCESS: New {} account created: {number}", account_type.display_name()))
    }
}

pub fn info(state: &ServerState, session: &Session) -> BankResult<String> {
    let account_id = session.require_authenticated()?.to_string();
    let store = state.store.lock().unwrap();
    let client = store.find_client(&account_id).ok_or_else(|| BankError::ClientNotFound(account_id.clone()))?;
    let status_text = if client.status == ClientStatus::Verified { "VERIFIED" } else { "PENDING VERIFICATION" };

    let mut out = format!(
        "Client Information:\nAccount ID: {}\nFull Name: {}\nBirth Date: {}\nStatus: {status_text}\nNumber of accounts: {}\n",
        client.account_id, client.full_name, client.birth_date, client.accounts.len()
    );
    if client.status != ClientStatus::Verified {
        let settings = store.settings();
        out.push_str(&format!(
            "\nUNVERIFIED ACCOUNT LIMITATIONS:\n- Max transaction: ${}\n- No credit accounts\n- No deposit accounts\n- Awaiting security verification",
            settings.unverified_operation_cap()
        ));
    }
    Ok(out)
}

pub fn pending_requests(state: &ServerState) -> BankResult<String> {
    let requests = state.broker.list(OperationType::Withdraw);
    if requests.is_empty() {
        return Ok("No pending operation requests.".to_string());
    }
    let mut out = String::from("Pending Operation Requests:\n");
    for (i, r) in requests.iter().enumerate() {
        out.push_str(&format!("[{i}] {} | Client: {} | Operation: {} | Amount: ${}", r.request_id, r.client_account_id, r.operation_type.as_str(), r.amount));
        if !r.target_account.is_empty() {
            out.push_str(&format!(" | To: {}", r.target_account));
        }
        if !r.description.is_empty() {
            out.push_str(&format!(" | Desc: {}", r.description));
        }
        out.push_str(&format!(" | Time: {}\n", format_timestamp(r.timestamp)));
    }
    out.pop();
    Ok(out)
}

pub fn pending_verifications(state: &ServerState) -> BankResult<String> {
    let store = state.store.lock().unwrap();
    state.broker.cleanup_verification_queue(|account_id| {
        store.find_client(account_id).map(|c| c.status == ClientStatus::PendingVerification).unwrap_or(false)
    });
    let requests = state.broker.list(OperationType::Verification);
    if requests.is_empty() {
        return Ok("No pending verification requests.".to_string());
    }
    let mut out = String::from("Pending Verification Requests:\n");
    for (i, r) in requests.iter().enumerate() {
        let (name, passport) =
            store.find_client(&r.client_account_id).map(|c| (c.full_name.clone(), c.passport_data.clone())).unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));
        out.push_str(&format!("[{i}] {} | Client: {} | Name: {name} | Passport: {passport} | Time: {}\n", r.request_id, r.client_account_id, format_timestamp(r.timestamp)));
    }
    out.pop();
    Ok(out)
}

pub fn approve(state: &ServerState, args: &[String]) -> BankResult<String> {
    decide_operation(state, args, RequestStatus::Approved, "approved")
}

pub fn reject(state: &ServerState, args: &[String]) -> BankResult<String> {
    decide_operation(state, args, RequestStatus::Rejected, "rejected")
}

fn decide_operation(state: &ServerState, args: &[String], outcome: RequestStatus, verb: &str) -> BankResult<String> {
    if args.is_empty() {
        return Err(BankError::WrongArgCount { expected: "1", got: 0 });
    }
    let index: usize = args[0].parse().map_err(|_| BankError::NotAnIndex(args[0].clone()))?;
    let requests = state.broker.list(OperationType::Withdraw);
    let request = requests.get(index).ok_or(BankError::RequestIndexOutOfRange(index))?;
    let request_id = request.request_id.clone();
    state.broker.decide(OperationType::Withdraw, index, outcome)?;
    tracing::info!(request_id = %request_id, verb, "operation request decided");
    Ok(format!("SUCCESS: Request {request_id} {verb}"))
}

pub fn verify(state: &ServerState, args: &[String]) -> BankResult<String> {
    if args.is_empty() {
        return Err(BankError::WrongArgCount { expected: "1", got: 0 });
    }
    let index: usize = args[0].parse().map_err(|_| BankError::NotAnIndex(args[0].clone()))?;
    let requests = state.broker.list(OperationType::Verification);
    let request = requests.get(index).ok_or(BankError::RequestIndexOutOfRange(index))?;
    let client_account_id = request.client_account_id.clone();

    let mut store = state.store.lock().unwrap();
    store.verify_client(&client_account_id)?;
    drop(store);

    state.broker.decide(OperationType::Verification, index, RequestStatus::Approved)?;
    tracing::info!(account_id = %client_account_id, "client verified");
    Ok(format!("SUCCESS: Client {client_account_id} verified"))
}

pub fn set_rates(state: &ServerState, args: &[String]) -> BankResult<String> {
    if args.len() < 2 {
        return Err(BankError::WrongArgCount { expected: "2", got: args.len() });
    }
    let credit: f64 = args[0].parse().map_err(|_| BankError::NotANumber(args[0].clone()))?;
    let deposit: f64 = args[1].parse().map_err(|_| BankError::NotANumber(args[1].clone()))?;
    let mut store = state.store.lock().unwrap();
    let mut settings = store.settings();
    settings.credit_interest_rate = credit;
    settings.deposit_interest_rate = deposit;
    store.set_settings(settings)?;
    Ok(format!("SUCCESS: Interest rates updated\nCredit Rate: {credit}%\nDeposit Rate: {deposit}%"))
}

pub fn settings(state: &ServerState) -> BankResult<String> {
    let store = state.store.lock().unwrap();
    let s = store.settings();
    Ok(format!(
        "Bank Settings:\nCredit Interest Rate: {}%\nDeposit Interest Rate: {}%\nLarge Operation Threshold: ${}\nLarge Loan Threshold: ${}\nUnverified User Limit: ${}",
        s.credit_interest_rate, s.deposit_interest_rate, s.large_operation_threshold, s.large_loan_threshold, s.unverified_operation_cap()
    ))
}

fn generate_unique_account_id(store: &bank_store::Store) -> String {
    loop {
        let candidate = format!("ACC{}", rand::thread_rng().gen_range(1000..10_000));
        if store.find_client(&candidate).is_none() {
            return candidate;
        }
    }
}

fn generate_txn_id() -> String {
    let mut rng = rand::thread_rng();
    let mut id = String::from("TXN");
    for _ in 0..12 {
        id.push(std::char::from_digit(rng.gen_range(0..16), 16).unwrap());
    }
    id
}

fn format_timestamp(ts: Timestamp) -> String {
    chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.format("%a %b %e %T %Y").to_string()).unwrap_or_else(|| ts.to_string())
}
