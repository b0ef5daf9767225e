use std::collections::HashMap;
use std::fmt::Write as _;

use bank_core::{Account, AccountStatus, AccountType, BankSettings, Client, ClientStatus, Transaction, TransactionKind};

/// Renders the full client map to the plaintext pipe-delimited snapshot
/// format. Every field is terminated by `|`; records are separated by a
/// line containing only `===`.
pub fn encode_snapshot(clients: &HashMap<String, Client>) -> String {
    let mut out = String::new();
    for client in clients.values() {
        let _ = write!(
            out,
            "{}|{}|{}|{}|{}|{}|{}|\n",
            client.account_id,
            client.full_name,
            client.birth_date,
            client.passport_data,
            client.password_hash,
            client.status.as_int(),
            client.accounts.len(),
        );
        for account in &client.accounts {
            let _ = write!(
                out,
                "{}|{}|{}|{}|{}|{}|\n",
                account.number,
                account.account_type.as_int(),
                account.balance,
                account.credit_limit,
                account.status.as_int(),
                account.transactions.len(),
            );
            for txn in &account.transactions {
                let _ = write!(
                    out,
                    "{}|{}|{}|{}|{}|{}|\n",
                    txn.id, txn.timestamp, txn.kind.as_str(), txn.amount, txn.description, txn.target_account,
                );
            }
        }
        out.push_str("===\n");
    }
    out
}

/// Parses the snapshot format, skipping malformed records rather than
/// aborting the whole load. The caller is expected to log what
/// [`ParseOutcome::warnings`] reports.
pub struct ParseOutcome {
    pub clients: HashMap<String, Client>,
    pub warnings: Vec<String>,
}

pub fn parse_snapshot(data: &str) -> ParseOutcome {
    let mut clients = HashMap::new();
    let mut warnings = Vec::new();
    let mut lines = data.lines().peekable();

    while let Some(line) = lines.next() {
        if line.is_empty() || line == "===" {
            continue;
        }
        match parse_client_record(line, &mut lines) {
            Ok(client) => {
                clients.insert(client.account_id.clone(), client);
            }
            Err(msg) => warnings.push(format!("skipping malformed client record: {msg} (line: {line})")),
        }
    }

    ParseOutcome { clients, warnings }
}

fn parse_client_record<'a, I: Iterator<Item = &'a str>>(
    line: &str,
    lines: &mut std::iter::Peekable<I>,
) -> Result<Client, String> {
    let mut fields = line.split('|');
    let account_id = next_field(&mut fields, "accountId")?.to_string();
    let full_name = next_field(&mut fields, "fullName")?.to_string();
    let birth_date = next_field(&mut fields, "birthDate")?.to_string();
    let passport_data = next_field(&mut fields, "passport")?.to_string();
    let password_hash = next_field(&mut fields, "pwHash")?.to_string();
    let status_int: i64 = parse_field(&mut fields, "status")?;
    let account_count: usize = parse_field(&mut fields, "accountCount")?;
    let status = ClientStatus::from_int(status_int).map_err(|e| e.to_string())?;

    let mut accounts = Vec::with_capacity(account_count);
    for _ in 0..account_count {
        let account_line = match lines.next() {
            Some(l) if !l.is_empty() && l != "===" => l,
            _ => return Err(format!("missing account data for client {account_id}")),
        };
        accounts.push(parse_account_record(account_line, lines)?);
    }

    Ok(Client {
        account_id,
        full_name,
        birth_date,
        passport_data,
        password_hash,
        status,
        accounts,
    })
}

fn parse_account_record<'a, I: Iterator<Item = &'a str>>(
    line: &str,
    lines: &mut std::iter::Peekable<I>,
) -> Result<Account, String> {
    let mut fields = line.split('|');
    let number = next_field(&mut fields, "number")?.to_string();
    let type_int: i64 = parse_field(&mut fields, "type")?;
    let balance: f64 = parse_field(&mut fields, "balance")?;
    let credit_limit: f64 = parse_field(&mut fields, "creditLimit")?;
    let status_int: i64 = parse_field(&mut fields, "status")?;
    let txn_count: usize = parse_field(&mut fields, "txnCount")?;

    let account_type = AccountType::from_int(type_int).map_err(|e| e.to_string())?;
    let status = AccountStatus::from_int(status_int).map_err(|e| e.to_string())?;

    let mut transactions = Vec::with_capacity(txn_count);
    for _ in 0..txn_count {
        let txn_line = match lines.next() {
            Some(l) if !l.is_empty() && l != "===" => l,
            _ => break,
        };
        if let Ok(txn) = parse_transaction_record(txn_line) {
            transactions.push(txn);
        }
    }

    Ok(Account {
        number,
        account_type,
        balance,
        credit_limit,
        status,
        transactions,
    })
}

fn parse_transaction_record(line: &str) -> Result<Transaction, String> {
    let mut fields = line.split('|');
    let id = next_field(&mut fields, "txnId")?.to_string();
    let timestamp: i64 = parse_field(&mut fields, "timestamp")?;
    let kind_str = next_field(&mut fields, "type")?;
    let amount: f64 = parse_field(&mut fields, "amount")?;
    let description = next_field(&mut fields, "description")?.to_string();
    let target_account = next_field(&mut fields, "targetAccount")?.to_string();
    let kind = TransactionKind::from_str_field(kind_str).ok_or_else(|| format!("invalid transaction type: {kind_str}"))?;

    Ok(Transaction {
        id,
        timestamp,
        kind,
        amount,
        description,
        target_account,
    })
}

fn next_field<'a, I: Iterator<Item = &'a str>>(fields: &mut I, name: &str) -> Result<&'a str, String> {
    fields.next().ok_or_else(|| format!("missing field: {name}"))
}

fn parse_field<'a, I: Iterator<Item = &'a str>, T: std::str::FromStr>(fields: &mut I, name: &str) -> Result<T, String> {
    let raw = next_field(fields, name)?;
    raw.parse().map_err(|_| format!("invalid value for {name}: {raw}"))
}

/// Encodes [`BankSettings`] as the single pipe-delimited line the settings
/// file holds.
pub fn encode_settings(settings: &BankSettings) -> String {
    format!(
        "{}|{}|{}|{}|\n",
        settings.credit_interest_rate, settings.deposit_interest_rate, settings.large_operation_threshold, settings.large_loan_threshold,
    )
}

pub fn parse_settings(data: &str) -> Result<BankSettings, String> {
    let line = data.lines().next().ok_or_else(|| "empty settings file".to_string())?;
    let mut fields = line.split('|');
    let credit_interest_rate: f64 = parse_field(&mut fields, "creditInterestRate")?;
    let deposit_interest_rate: f64 = parse_field(&mut fields, "depositInterestRate")?;
    let large_operation_threshold: f64 = parse_field(&mut fields, "largeOperationThreshold")?;
    let large_loan_threshold: f64 = parse_field(&mut fields, "largeLoanThreshold")?;
    Ok(BankSettings {
        credit_interest_rate,
        deposit_interest_rate,
        large_operation_threshold,
        large_loan_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_core::AccountType;

    fn sample_client() -> Client {
        let mut account = Account::new("ACC1001_SAV_1", AccountType::Savings, 50_000.0);
        account.deposit(50_000.0, "Initial deposit", "TXN000000000001", 1_700_000_000);
        Client {
            account_id: "ACC1001".into(),
            full_name: "Ivanov Ivan Ivanovich".into(),
            birth_date: "1990-05-15".into(),
            passport_data: "4510123456".into(),
            password_hash: "abc123".into(),
            status: ClientStatus::Verified,
            accounts: vec![account],
        }
    }

    #[test]
    fn encode_then_parse_preserves_client_fields() {
        let mut clients = HashMap::new();
        let client = sample_client();
        clients.insert(client.account_id.clone(), client.clone());
        let encoded = encode_snapshot(&clients);
        let parsed = parse_snapshot(&encoded);
        assert!(parsed.warnings.is_empty());
        let round_tripped = parsed.clients.get("ACC1001").unwrap();
        assert_eq!(round_tripped.full_name, "Ivanov Ivan Ivanovich");
        assert_eq!(round_tripped.accounts.len(), 1);
        assert_eq!(round_tripped.accounts[0].balance, 50_000.0);
        assert_eq!(round_tripped.accounts[0].transactions.len(), 1);
    }

    #[test]
    fn malformed_line_is_skipped_not_fatal() {
        let data = "not|enough|fields\n===\n";
        let parsed = parse_snapshot(data);
        assert!(parsed.clients.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn settings_round_trip() {
        let settings = BankSettings::default();
        let encoded = encode_settings(&settings);
        let parsed = parse_settings(&encoded).unwrap();
        assert_eq!(parsed, settings);
    }
}
