pub mod account;
pub mod approval;
pub mod client;
pub mod error;
pub mod settings;
pub mod types;

pub use account::{Account, Transaction, TransactionKind};
pub use approval::ApprovalRequest;
pub use client::{Client, SUPER_USER_ACCOUNT_ID};
pub use error::{BankError, BankResult};
pub use settings::BankSettings;
pub use types::{AccountStatus, AccountType, ClientStatus, OperationType, RequestStatus, Timestamp};
