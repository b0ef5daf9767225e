use thiserror::Error;

/// The full taxonomy of recoverable failures the core produces.
///
/// Every variant's `Display` output is exactly the text that belongs after
/// `ERROR: ` on the wire; handlers never reformat these messages.
#[derive(Debug, Error)]
pub enum BankError {
    // ── Parse errors ─────────────────────────────────────────────────────
    #[error("unterminated quoted argument")]
    UnterminatedQuote,

    #[error("expected {expected} argument(s), got {got}")]
    WrongArgCount { expected: &'static str, got: usize },

    #[error("not a number: {0}")]
    NotANumber(String),

    #[error("not a valid index: {0}")]
    NotAnIndex(String),

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("empty command")]
    EmptyCommand,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid date format, expected YYYY-MM-DD")]
    InvalidDate,

    #[error("invalid account type: {0}")]
    InvalidAccountType(i64),

    // ── Auth errors ──────────────────────────────────────────────────────
    #[error("not logged in")]
    NotAuthenticated,

    #[error("already logged in, LOGOUT first")]
    AlreadyAuthenticated,

    #[error("invalid account id or password")]
    InvalidCredentials,

    #[error("SUPERLOGIN is only available to the security officer account")]
    NotSuperUser,

    #[error("operator privileges required")]
    InsufficientPrivilege,

    // ── Policy errors ────────────────────────────────────────────────────
    #[error("unverified clients may not open a {0} account")]
    AccountTypeRequiresVerification(&'static str),

    #[error("unverified clients may not perform credit operations")]
    CreditOperationRequiresVerification,

    #[error("amount exceeds the unverified-client limit of {limit}")]
    ExceedsUnverifiedLimit { limit: f64 },

    #[error("operation rejected by security or timeout exceeded")]
    OperationRejected,

    // ── State errors ─────────────────────────────────────────────────────
    #[error("account index {0} is out of range")]
    AccountIndexOutOfRange(usize),

    #[error("target account not found: {0}")]
    TargetAccountNotFound(String),

    #[error("client has no accounts")]
    NoAccounts,

    #[error("a client with that passport already exists")]
    DuplicatePassport,

    #[error("account id already in use: {0}")]
    DuplicateAccountId(String),

    #[error("client not found: {0}")]
    ClientNotFound(String),

    #[error("request not found at index {0}")]
    RequestIndexOutOfRange(usize),

    #[error("registration requires a full name of at least 5 characters containing a space")]
    InvalidName,

    #[error("passport must be exactly 10 decimal digits")]
    InvalidPassport,

    #[error("password must be at least 6 characters")]
    InvalidPassword,

    // ── Funds errors ─────────────────────────────────────────────────────
    #[error("insufficient funds: balance plus credit limit is {available}, requested {requested}")]
    InsufficientFunds { available: f64, requested: f64 },

    // ── IO errors ─────────────────────────────────────────────────────────
    #[error("failed to write snapshot: {0}")]
    SnapshotWrite(String),

    #[error("failed to read snapshot: {0}")]
    SnapshotRead(String),

    #[error("{0}")]
    Other(String),
}

pub type BankResult<T> = Result<T, BankError>;
