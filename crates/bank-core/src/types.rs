use serde::{Deserialize, Serialize};

use crate::error::BankError;

/// The four account products the bank offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Checking,
    Credit,
    Deposit,
}

impl AccountType {
    /// The integer encoding used on the wire and in the snapshot format.
    pub fn as_int(self) -> i64 {
        match self {
            AccountType::Savings => 0,
            AccountType::Checking => 1,
            AccountType::Credit => 2,
            AccountType::Deposit => 3,
        }
    }

    pub fn from_int(v: i64) -> Result<Self, BankError> {
        match v {
            0 => Ok(AccountType::Savings),
            1 => Ok(AccountType::Checking),
            2 => Ok(AccountType::Credit),
            3 => Ok(AccountType::Deposit),
            other => Err(BankError::InvalidAccountType(other)),
        }
    }

    /// Account-number prefix used when minting a new account for a client.
    pub fn number_prefix(self) -> &'static str {
        match self {
            AccountType::Savings => "SAV",
            AccountType::Checking => "CHK",
            AccountType::Credit => "CRD",
            AccountType::Deposit => "DEP",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Checking => "Checking",
            AccountType::Credit => "Credit",
            AccountType::Deposit => "Deposit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Blocked,
    Closed,
}

impl AccountStatus {
    pub fn as_int(self) -> i64 {
        match self {
            AccountStatus::Active => 0,
            AccountStatus::Blocked => 1,
            AccountStatus::Closed => 2,
        }
    }

    pub fn from_int(v: i64) -> Result<Self, BankError> {
        match v {
            0 => Ok(AccountStatus::Active),
            1 => Ok(AccountStatus::Blocked),
            2 => Ok(AccountStatus::Closed),
            other => Err(BankError::Other(format!("invalid account status int: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    PendingVerification,
    Verified,
    Blocked,
}

impl ClientStatus {
    pub fn as_int(self) -> i64 {
        match self {
            ClientStatus::PendingVerification => 0,
            ClientStatus::Verified => 1,
            ClientStatus::Blocked => 2,
        }
    }

    pub fn from_int(v: i64) -> Result<Self, BankError> {
        match v {
            0 => Ok(ClientStatus::PendingVerification),
            1 => Ok(ClientStatus::Verified),
            2 => Ok(ClientStatus::Blocked),
            other => Err(BankError::Other(format!("invalid client status int: {other}"))),
        }
    }
}

/// The two kinds of request an operator can be asked to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Withdraw,
    Transfer,
    Verification,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::Withdraw => "WITHDRAW",
            OperationType::Transfer => "TRANSFER",
            OperationType::Verification => "VERIFICATION",
        }
    }

    pub fn from_str_field(s: &str) -> Option<Self> {
        match s {
            "WITHDRAW" => Some(OperationType::Withdraw),
            "TRANSFER" => Some(OperationType::Transfer),
            "VERIFICATION" => Some(OperationType::Verification),
            _ => None,
        }
    }

    /// Whether this operation type belongs to the verification queue rather
    /// than the operation queue.
    pub fn is_verification(self) -> bool {
        matches!(self, OperationType::Verification)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_str_field(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(RequestStatus::Pending),
            "APPROVED" => Some(RequestStatus::Approved),
            "REJECTED" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }
}

/// Seconds since the Unix epoch, the only timestamp representation the wire
/// protocol and the snapshot format use.
pub type Timestamp = i64;
