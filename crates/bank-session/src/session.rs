use bank_core::{BankError, BankResult, Timestamp};

/// Per-connection authentication state. Holds only a stable `account_id`,
/// never a borrowed reference into the Store — command handlers re-resolve
/// through the Store under the Store mutex on every command, per the
/// concurrency model.
#[derive(Debug, Default)]
pub struct Session {
    account_id: Option<String>,
    login_time: Option<Timestamp>,
    is_operator: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.account_id.is_some()
    }

    pub fn is_operator(&self) -> bool {
        self.is_operator
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn login_time(&self) -> Option<Timestamp> {
        self.login_time
    }

    /// Transitions UNAUTHENTICATED → AUTHENTICATED. Refuses if already
    /// authenticated; the client must LOGOUT first.
    pub fn login(&mut self, account_id: impl Into<String>, is_operator: bool, now: Timestamp) -> BankResult<()> {
        if self.is_authenticated() {
            return Err(BankError::AlreadyAuthenticated);
        }
        self.account_id = Some(account_id.into());
        self.login_time = Some(now);
        self.is_operator = is_operator;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.account_id = None;
        self.login_time = None;
        self.is_operator = false;
    }

    pub fn require_authenticated(&self) -> BankResult<&str> {
        self.account_id.as_deref().ok_or(BankError::NotAuthenticated)
    }

    pub fn require_operator(&self) -> BankResult<&str> {
        let id = self.require_authenticated()?;
        if !self.is_operator {
            return Err(BankError::InsufficientPrivilege);
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.require_authenticated().is_err());
    }

    #[test]
    fn login_then_logout_round_trips() {
        let mut session = Session::new();
        session.login("ACC1001", false, 1_700_000_000).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.account_id(), Some("ACC1001"));
        session.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn reauthentication_without_logout_is_refused() {
        let mut session = Session::new();
        session.login("ACC1001", false, 0).unwrap();
        let err = session.login("ACC1002", false, 0).unwrap_err();
        assert!(matches!(err, BankError::AlreadyAuthenticated));
    }

    #[test]
    fn operator_requires_operator_flag() {
        let mut session = Session::new();
        session.login("SUPER001", true, 0).unwrap();
        assert!(session.require_operator().is_ok());

        let mut client_session = Session::new();
        client_session.login("ACC1001", false, 0).unwrap();
        assert!(client_session.require_operator().is_err());
    }
}
