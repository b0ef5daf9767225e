use bank_core::{Account, AccountType, BankResult, Client, ClientStatus, SUPER_USER_ACCOUNT_ID};
use bank_store::Store;

/// Ensures the built-in security-officer identity exists, creating it (with
/// one empty Checking account) on first run. Idempotent: a restart against
/// an existing snapshot is a no-op.
pub fn ensure_super_user(store: &mut Store) -> BankResult<()> {
    if store.find_client(SUPER_USER_ACCOUNT_ID).is_some() {
        return Ok(());
    }

    let mut client = Client {
        account_id: SUPER_USER_ACCOUNT_ID.to_string(),
        full_name: "Security Officer".to_string(),
        birth_date: "1980-01-01".to_string(),
        passport_data: SUPER_USER_ACCOUNT_ID.to_string(),
        password_hash: bank_crypto::hash_password("superpass123"),
        status: ClientStatus::Verified,
        accounts: Vec::new(),
    };
    client.accounts.push(Account::new("SUPER_ACC", AccountType::Checking, 0.0));
    store.add_client(client)?;
    tracing::info!("created default security officer account SUPER001");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_super_user_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("accounts.dat")).unwrap();
        ensure_super_user(&mut store).unwrap();
        assert_eq!(store.client_count(), 1);
        ensure_super_user(&mut store).unwrap();
        assert_eq!(store.client_count(), 1);
        let client = store.find_client(SUPER_USER_ACCOUNT_ID).unwrap();
        assert!(client.is_super_user());
        assert_eq!(client.status, ClientStatus::Verified);
        assert_eq!(client.accounts.len(), 1);
    }
}
