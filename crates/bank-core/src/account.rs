use serde::{Deserialize, Serialize};

use crate::types::{AccountStatus, AccountType, Timestamp};

/// A single posted movement against an account.
///
/// `amount` is signed: positive for a deposit leg, negative for a withdraw
/// leg (including the debit leg of a transfer). `target_account` names the
/// counterparty account number for a transfer leg, and is empty otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub timestamp: Timestamp,
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: String,
    pub target_account: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdraw => "WITHDRAW",
        }
    }

    pub fn from_str_field(s: &str) -> Option<Self> {
        match s {
            "DEPOSIT" => Some(TransactionKind::Deposit),
            "WITHDRAW" => Some(TransactionKind::Withdraw),
            _ => None,
        }
    }
}

/// One account owned by a client.
///
/// `number` and `account_type` are fixed at creation; `balance`,
/// `credit_limit`, `status`, and `transactions` mutate over the account's
/// life. The invariant `balance + credit_limit >= 0` is enforced by
/// [`Account::withdraw`] and [`Account::transfer_out`]; callers must not
/// mutate `balance` directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub number: String,
    pub account_type: AccountType,
    pub balance: f64,
    pub credit_limit: f64,
    pub status: AccountStatus,
    pub transactions: Vec<Transaction>,
}

impl Account {
    pub fn new(number: impl Into<String>, account_type: AccountType, balance: f64) -> Self {
        Self {
            number: number.into(),
            account_type,
            balance,
            credit_limit: 0.0,
            status: AccountStatus::Active,
            transactions: Vec::new(),
        }
    }

    pub fn available_balance(&self) -> f64 {
        self.balance + self.credit_limit
    }

    /// Credits the account. Rejects non-positive amounts.
    pub fn deposit(&mut self, amount: f64, description: impl Into<String>, id: impl Into<String>, now: Timestamp) -> bool {
        if amount <= 0.0 {
            return false;
        }
        self.balance += amount;
        self.push_transaction(id, TransactionKind::Deposit, amount, description, "", now);
        true
    }

    /// Debits the account. Rejects non-positive amounts and amounts that
    /// would drive `balance + credit_limit` below zero.
    pub fn withdraw(&mut self, amount: f64, description: impl Into<String>, id: impl Into<String>, now: Timestamp) -> bool {
        if amount <= 0.0 {
            return false;
        }
        if amount > self.available_balance() {
            return false;
        }
        self.balance -= amount;
        self.push_transaction(id, TransactionKind::Withdraw, -amount, description, "", now);
        true
    }

    /// Debits the account as the send-side leg of a transfer, tagging the
    /// transaction with the recipient's account number.
    pub fn transfer_out(&mut self, amount: f64, description: impl Into<String>, target: impl Into<String>, id: impl Into<String>, now: Timestamp) -> bool {
        if amount <= 0.0 {
            return false;
        }
        if amount > self.available_balance() {
            return false;
        }
        self.balance -= amount;
        self.push_transaction(id, TransactionKind::Withdraw, -amount, description, target, now);
        true
    }

    /// Credits the account as the receive-side leg of a transfer, tagging
    /// the transaction with the sender's account number.
    pub fn transfer_in(&mut self, amount: f64, description: impl Into<String>, source: impl Into<String>, id: impl Into<String>, now: Timestamp) -> bool {
        if amount <= 0.0 {
            return false;
        }
        self.balance += amount;
        self.push_transaction(id, TransactionKind::Deposit, amount, description, source, now);
        true
    }

    /// Removes the most recently appended transaction, used to undo a leg
    /// whose counterpart failed.
    pub fn pop_last_transaction(&mut self) {
        self.transactions.pop();
    }

    fn push_transaction(&mut self, id: impl Into<String>, kind: TransactionKind, amount: f64, description: impl Into<String>, target: impl Into<String>, now: Timestamp) {
        self.transactions.push(Transaction {
            id: id.into(),
            timestamp: now,
            kind,
            amount,
            description: description.into(),
            target_account: target.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_rejects_non_positive() {
        let mut a = Account::new("ACC0001_SAV_1", AccountType::Savings, 100.0);
        assert!(!a.deposit(0.0, "", "TXN0", 0));
        assert!(!a.deposit(-5.0, "", "TXN0", 0));
        assert_eq!(a.balance, 100.0);
    }

    #[test]
    fn withdraw_respects_credit_limit() {
        let mut a = Account::new("ACC0001_CRD_1", AccountType::Credit, 0.0);
        a.credit_limit = 100.0;
        assert!(a.withdraw(100.0, "", "TXN1", 0));
        assert_eq!(a.balance, -100.0);
        assert!(!a.withdraw(1.0, "", "TXN2", 0));
    }

    #[test]
    fn transfer_out_records_target_and_negative_amount() {
        let mut a = Account::new("ACC0001_SAV_1", AccountType::Savings, 500.0);
        assert!(a.transfer_out(200.0, "", "ACC0002_SAV_1", "TXN3", 0));
        let txn = a.transactions.last().unwrap();
        assert_eq!(txn.amount, -200.0);
        assert_eq!(txn.target_account, "ACC0002_SAV_1");
        assert_eq!(a.balance, 300.0);
    }

    #[test]
    fn pop_last_transaction_restores_rollback_point() {
        let mut a = Account::new("ACC0001_SAV_1", AccountType::Savings, 500.0);
        a.transfer_out(200.0, "", "ACC0002_SAV_1", "TXN4", 0);
        a.pop_last_transaction();
        assert!(a.transactions.is_empty());
    }
}
