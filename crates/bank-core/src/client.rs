use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::types::ClientStatus;

/// The bootstrap operator identity. Distinguished by value, not by a role
/// column — "is operator" is a predicate on this string plus the session
/// having authenticated via `SUPERLOGIN`, not ambient state on the client.
pub const SUPER_USER_ACCOUNT_ID: &str = "SUPER001";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub account_id: String,
    pub full_name: String,
    pub birth_date: String,
    pub passport_data: String,
    pub password_hash: String,
    pub status: ClientStatus,
    pub accounts: Vec<Account>,
}

impl Client {
    pub fn is_super_user(&self) -> bool {
        self.account_id == SUPER_USER_ACCOUNT_ID
    }
}
