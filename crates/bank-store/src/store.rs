use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use bank_core::{Account, BankError, BankResult, BankSettings, Client, ClientStatus};
use bank_crypto::SNAPSHOT_KEY;

use crate::serialization::{encode_settings, encode_snapshot, parse_settings, parse_snapshot};

/// The single in-memory authoritative copy of clients, accounts,
/// transactions, and bank settings. All mutation happens through `&mut
/// self` methods that persist a full snapshot before returning; callers
/// (the server) are expected to hold this behind one mutex for the
/// duration of `mutate + snapshot`, per the concurrency model.
pub struct Store {
    path: PathBuf,
    clients: HashMap<String, Client>,
    settings: BankSettings,
}

impl Store {
    /// Opens (or creates) the store at `path`, loading the snapshot and
    /// settings files if present. A missing snapshot is not an error.
    pub fn open(path: impl Into<PathBuf>) -> BankResult<Self> {
        let path = path.into();
        let mut store = Store {
            path,
            clients: HashMap::new(),
            settings: BankSettings::default(),
        };
        store.load()?;
        store.load_settings();
        Ok(store)
    }

    fn settings_path(&self) -> PathBuf {
        let mut s = self.path.clone().into_os_string();
        s.push(".settings");
        PathBuf::from(s)
    }

    fn load(&mut self) -> BankResult<()> {
        let encrypted = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(_) => {
                tracing::info!(path = %self.path.display(), "snapshot file not found, starting with an empty store");
                self.clients.clear();
                return Ok(());
            }
        };
        if encrypted.is_empty() {
            self.clients.clear();
            return Ok(());
        }
        let plaintext = bank_crypto::decrypt_to_string(&encrypted, SNAPSHOT_KEY)
            .map_err(|e| BankError::SnapshotRead(e.to_string()))?;
        let outcome = parse_snapshot(&plaintext);
        for warning in &outcome.warnings {
            tracing::warn!(%warning, "skipped malformed snapshot record");
        }
        self.clients = outcome.clients;
        tracing::info!(clients = self.clients.len(), accounts = self.total_accounts_count(), "loaded snapshot");
        Ok(())
    }

    fn load_settings(&mut self) {
        let path = self.settings_path();
        let encrypted = match fs::read_to_string(&path) {
            Ok(s) if !s.is_empty() => s,
            _ => {
                tracing::info!("settings file not found, using defaults");
                return;
            }
        };
        match bank_crypto::decrypt_to_string(&encrypted, SNAPSHOT_KEY) {
            Ok(plaintext) => match parse_settings(&plaintext) {
                Ok(settings) => self.settings = settings,
                Err(e) => tracing::warn!(error = %e, "failed to parse settings file, using defaults"),
            },
            Err(e) => tracing::warn!(error = %e, "failed to decrypt settings file, using defaults"),
        }
    }

    /// Rewrites the full encrypted snapshot. Creates the parent directory on
    /// demand.
    pub fn save(&self) -> BankResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BankError::SnapshotWrite(e.to_string()))?;
            }
        }
        let plaintext = encode_snapshot(&self.clients);
        let encrypted = bank_crypto::encrypt_str(&plaintext, SNAPSHOT_KEY);
        fs::write(&self.path, encrypted).map_err(|e| BankError::SnapshotWrite(e.to_string()))?;
        Ok(())
    }

    fn save_settings(&self) -> BankResult<()> {
        let path = self.settings_path();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BankError::SnapshotWrite(e.to_string()))?;
            }
        }
        let plaintext = encode_settings(&self.settings);
        let encrypted = bank_crypto::encrypt_str(&plaintext, SNAPSHOT_KEY);
        fs::write(&path, encrypted).map_err(|e| BankError::SnapshotWrite(e.to_string()))?;
        Ok(())
    }

    /// Inserts a new client and persists. On a write failure the in-memory
    /// insert is rolled back and `IOError` is returned.
    pub fn add_client(&mut self, client: Client) -> BankResult<()> {
        if self.clients.contains_key(&client.account_id) {
            return Err(BankError::DuplicateAccountId(client.account_id));
        }
        let account_id = client.account_id.clone();
        self.clients.insert(account_id.clone(), client);
        if let Err(e) = self.save() {
            self.clients.remove(&account_id);
            return Err(e);
        }
        Ok(())
    }

    pub fn remove_client(&mut self, account_id: &str) -> BankResult<()> {
        let removed = self.clients.remove(account_id).ok_or_else(|| BankError::ClientNotFound(account_id.to_string()))?;
        if let Err(e) = self.save() {
            self.clients.insert(account_id.to_string(), removed);
            return Err(e);
        }
        Ok(())
    }

    pub fn find_client(&self, account_id: &str) -> Option<&Client> {
        self.clients.get(account_id)
    }

    pub fn find_client_mut(&mut self, account_id: &str) -> Option<&mut Client> {
        self.clients.get_mut(account_id)
    }

    pub fn authenticate(&self, account_id: &str, password: &str) -> Option<&Client> {
        let client = self.clients.get(account_id)?;
        if bank_crypto::verify_password(password, &client.password_hash) {
            Some(client)
        } else {
            None
        }
    }

    pub fn all_account_ids(&self) -> Vec<String> {
        self.clients.keys().cloned().collect()
    }

    pub fn is_passport_exists(&self, passport: &str) -> bool {
        self.clients.values().any(|c| c.passport_data == passport)
    }

    /// Flips a client's status to Verified and persists.
    pub fn verify_client(&mut self, account_id: &str) -> BankResult<()> {
        let previous = {
            let client = self.clients.get_mut(account_id).ok_or_else(|| BankError::ClientNotFound(account_id.to_string()))?;
            let previous = client.status;
            client.status = ClientStatus::Verified;
            previous
        };
        if let Err(e) = self.save() {
            if let Some(client) = self.clients.get_mut(account_id) {
                client.status = previous;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Replaces a client's account list wholesale and persists.
    pub fn update_client_accounts(&mut self, account_id: &str, accounts: Vec<Account>) -> BankResult<()> {
        let previous = {
            let client = self.clients.get_mut(account_id).ok_or_else(|| BankError::ClientNotFound(account_id.to_string()))?;
            std::mem::replace(&mut client.accounts, accounts)
        };
        if let Err(e) = self.save() {
            if let Some(client) = self.clients.get_mut(account_id) {
                client.accounts = previous;
            }
            return Err(e);
        }
        Ok(())
    }

    pub fn add_account_to_client(&mut self, account_id: &str, account: Account) -> BankResult<()> {
        {
            let client = self.clients.get_mut(account_id).ok_or_else(|| BankError::ClientNotFound(account_id.to_string()))?;
            if client.accounts.iter().any(|a| a.number == account.number) {
                return Err(BankError::DuplicateAccountId(account.number));
            }
            client.accounts.push(account);
        }
        if let Err(e) = self.save() {
            if let Some(client) = self.clients.get_mut(account_id) {
                client.accounts.pop();
            }
            return Err(e);
        }
        Ok(())
    }

    /// Credits `account_index` of `client_id` and persists. On a write
    /// failure the deposit is undone.
    pub fn deposit(&mut self, client_id: &str, account_index: usize, amount: f64, description: &str, txn_id: impl Into<String>, now: bank_core::Timestamp) -> BankResult<()> {
        let txn_id = txn_id.into();
        {
            let client = self.clients.get_mut(client_id).ok_or_else(|| BankError::ClientNotFound(client_id.to_string()))?;
            let account = client.accounts.get_mut(account_index).ok_or(BankError::AccountIndexOutOfRange(account_index))?;
            if !account.deposit(amount, description, txn_id, now) {
                return Err(BankError::NonPositiveAmount);
            }
        }
        if let Err(e) = self.save() {
            let client = self.clients.get_mut(client_id).expect("checked above");
            let account = &mut client.accounts[account_index];
            account.pop_last_transaction();
            account.balance -= amount;
            return Err(e);
        }
        Ok(())
    }

    /// Debits `account_index` of `client_id` and persists. On a write
    /// failure the withdrawal is undone.
    pub fn withdraw(&mut self, client_id: &str, account_index: usize, amount: f64, description: &str, txn_id: impl Into<String>, now: bank_core::Timestamp) -> BankResult<()> {
        let txn_id = txn_id.into();
        let available = {
            let client = self.clients.get_mut(client_id).ok_or_else(|| BankError::ClientNotFound(client_id.to_string()))?;
            let account = client.accounts.get_mut(account_index).ok_or(BankError::AccountIndexOutOfRange(account_index))?;
            let available = account.available_balance();
            if amount <= 0.0 {
                return Err(BankError::NonPositiveAmount);
            }
            if !account.withdraw(amount, description, txn_id, now) {
                return Err(BankError::InsufficientFunds { available, requested: amount });
            }
            available
        };
        let _ = available;
        if let Err(e) = self.save() {
            let client = self.clients.get_mut(client_id).expect("checked above");
            let account = &mut client.accounts[account_index];
            account.pop_last_transaction();
            account.balance += amount;
            return Err(e);
        }
        Ok(())
    }

    /// Moves `amount` from `from_client_id`'s `from_account_index` into the
    /// first account (index 0) of `to_client_id`, in two legs, and persists.
    ///
    /// If the credit leg fails, or if the persisted write fails, both legs
    /// are undone and both balances are restored — unlike the single-leg
    /// rollback a literal read of the original transfer logic would suggest,
    /// a two-phase move must undo both sides, not just the debit.
    pub fn transfer(
        &mut self,
        from_client_id: &str,
        from_account_index: usize,
        to_client_id: &str,
        amount: f64,
        description: &str,
        out_txn_id: impl Into<String>,
        in_txn_id: impl Into<String>,
        now: bank_core::Timestamp,
    ) -> BankResult<()> {
        if amount <= 0.0 {
            return Err(BankError::NonPositiveAmount);
        }
        let out_txn_id = out_txn_id.into();
        let in_txn_id = in_txn_id.into();

        let target_has_account = self.clients.get(to_client_id).map(|c| !c.accounts.is_empty()).unwrap_or(false);
        if !target_has_account {
            return Err(BankError::TargetAccountNotFound(to_client_id.to_string()));
        }

        let from_number = {
            let client = self.clients.get(from_client_id).ok_or_else(|| BankError::ClientNotFound(from_client_id.to_string()))?;
            let account = client.accounts.get(from_account_index).ok_or(BankError::AccountIndexOutOfRange(from_account_index))?;
            account.number.clone()
        };
        let to_number = self.clients.get(to_client_id).unwrap().accounts[0].number.clone();
        if from_number == to_number {
            return Err(BankError::TargetAccountNotFound(to_client_id.to_string()));
        }

        let available = {
            let client = self.clients.get_mut(from_client_id).expect("checked above");
            let account = &mut client.accounts[from_account_index];
            let available = account.available_balance();
            if !account.transfer_out(amount, description, to_number.clone(), out_txn_id, now) {
                return Err(BankError::InsufficientFunds { available, requested: amount });
            }
            available
        };
        let _ = available;

        let credited = {
            let target = self.clients.get_mut(to_client_id).expect("checked above");
            target.accounts[0].transfer_in(amount, description, from_number.clone(), in_txn_id, now)
        };

        if !credited {
            let client = self.clients.get_mut(from_client_id).expect("checked above");
            let account = &mut client.accounts[from_account_index];
            account.pop_last_transaction();
            account.balance += amount;
            return Err(BankError::Other("transfer credit leg failed".to_string()));
        }

        if let Err(e) = self.save() {
            let client = self.clients.get_mut(from_client_id).expect("checked above");
            let account = &mut client.accounts[from_account_index];
            account.pop_last_transaction();
            account.balance += amount;

            let target = self.clients.get_mut(to_client_id).expect("checked above");
            let account = &mut target.accounts[0];
            account.pop_last_transaction();
            account.balance -= amount;

            return Err(e);
        }

        Ok(())
    }

    pub fn find_account(&self, account_number: &str) -> Option<(&Client, &Account)> {
        self.clients.values().find_map(|c| c.accounts.iter().find(|a| a.number == account_number).map(|a| (c, a)))
    }

    pub fn all_clients(&self) -> Vec<&Client> {
        self.clients.values().collect()
    }

    pub fn clients_by_status(&self, status: ClientStatus) -> Vec<&Client> {
        self.clients.values().filter(|c| c.status == status).collect()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn total_accounts_count(&self) -> usize {
        self.clients.values().map(|c| c.accounts.len()).sum()
    }

    pub fn total_balance(&self) -> f64 {
        self.clients.values().flat_map(|c| c.accounts.iter()).map(|a| a.balance).sum()
    }

    pub fn settings(&self) -> BankSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: BankSettings) -> BankResult<()> {
        let previous = self.settings;
        self.settings = settings;
        if let Err(e) = self.save_settings() {
            self.settings = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Copies the snapshot and settings files to `backup_path` (and
    /// `<backup_path>.settings`). Neither file needs to exist already.
    pub fn backup(&self, backup_path: impl AsRef<Path>) -> BankResult<()> {
        let backup_path = backup_path.as_ref();
        if let Some(parent) = backup_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BankError::SnapshotWrite(e.to_string()))?;
            }
        }
        fs::copy(&self.path, backup_path).map_err(|e| BankError::SnapshotWrite(e.to_string()))?;
        let settings_src = self.settings_path();
        if settings_src.exists() {
            let mut settings_dst = backup_path.as_os_str().to_owned();
            settings_dst.push(".settings");
            fs::copy(&settings_src, settings_dst).map_err(|e| BankError::SnapshotWrite(e.to_string()))?;
        }
        Ok(())
    }

    /// Copies files from `backup_path` over the live snapshot/settings
    /// files, then reloads in-memory state from them.
    pub fn restore(&mut self, backup_path: impl AsRef<Path>) -> BankResult<()> {
        let backup_path = backup_path.as_ref();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BankError::SnapshotWrite(e.to_string()))?;
            }
        }
        fs::copy(backup_path, &self.path).map_err(|e| BankError::SnapshotWrite(e.to_string()))?;
        let mut settings_src = backup_path.as_os_str().to_owned();
        settings_src.push(".settings");
        let settings_src = PathBuf::from(settings_src);
        if settings_src.exists() {
            fs::copy(&settings_src, self.settings_path()).map_err(|e| BankError::SnapshotWrite(e.to_string()))?;
        }
        self.load()?;
        self.load_settings();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_core::AccountType;

    fn fixture_client(id: &str) -> Client {
        Client {
            account_id: id.to_string(),
            full_name: "Test User Name".to_string(),
            birth_date: "1990-01-01".to_string(),
            passport_data: "1234567890".to_string(),
            password_hash: bank_crypto::hash_password("testpass"),
            status: ClientStatus::Verified,
            accounts: vec![Account::new(format!("{id}_SAV_1"), AccountType::Savings, 1000.0)],
        }
    }

    #[test]
    fn missing_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("accounts.dat")).unwrap();
        assert_eq!(store.client_count(), 0);
    }

    #[test]
    fn save_then_load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.dat");
        {
            let mut store = Store::open(&path).unwrap();
            store.add_client(fixture_client("ACC1001")).unwrap();
        }
        let store = Store::open(&path).unwrap();
        let client = store.find_client("ACC1001").unwrap();
        assert_eq!(client.full_name, "Test User Name");
        assert_eq!(client.accounts[0].balance, 1000.0);
    }

    #[test]
    fn duplicate_account_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("accounts.dat")).unwrap();
        store.add_client(fixture_client("ACC1001")).unwrap();
        let err = store.add_client(fixture_client("ACC1001")).unwrap_err();
        assert!(matches!(err, BankError::DuplicateAccountId(_)));
    }

    #[test]
    fn authenticate_checks_password() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("accounts.dat")).unwrap();
        store.add_client(fixture_client("ACC1001")).unwrap();
        assert!(store.authenticate("ACC1001", "testpass").is_some());
        assert!(store.authenticate("ACC1001", "wrong").is_none());
    }

    #[test]
    fn settings_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.dat");
        {
            let mut store = Store::open(&path).unwrap();
            let mut settings = store.settings();
            settings.credit_interest_rate = 15.0;
            store.set_settings(settings).unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.settings().credit_interest_rate, 15.0);
    }

    #[test]
    fn backup_then_restore_recovers_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.dat");
        let backup_path = dir.path().join("backup.dat");
        let mut store = Store::open(&path).unwrap();
        store.add_client(fixture_client("ACC1001")).unwrap();
        store.backup(&backup_path).unwrap();
        store.remove_client("ACC1001").unwrap();
        assert!(store.find_client("ACC1001").is_none());
        store.restore(&backup_path).unwrap();
        assert!(store.find_client("ACC1001").is_some());
    }

    #[test]
    fn deposit_increases_balance_and_records_transaction() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("accounts.dat")).unwrap();
        store.add_client(fixture_client("ACC1001")).unwrap();
        store.deposit("ACC1001", 0, 500.0, "payday", "TXN000000000001", 0).unwrap();
        let account = &store.find_client("ACC1001").unwrap().accounts[0];
        assert_eq!(account.balance, 1500.0);
        assert_eq!(account.transactions.len(), 1);
    }

    #[test]
    fn withdraw_beyond_available_balance_is_rejected_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("accounts.dat")).unwrap();
        store.add_client(fixture_client("ACC1001")).unwrap();
        let err = store.withdraw("ACC1001", 0, 5000.0, "", "TXN000000000002", 0).unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { .. }));
        let account = &store.find_client("ACC1001").unwrap().accounts[0];
        assert_eq!(account.balance, 1000.0);
        assert!(account.transactions.is_empty());
    }

    #[test]
    fn transfer_moves_balance_between_clients() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("accounts.dat")).unwrap();
        store.add_client(fixture_client("ACC1001")).unwrap();
        store.add_client(fixture_client("ACC1002")).unwrap();
        store.transfer("ACC1001", 0, "ACC1002", 300.0, "rent", "TXN000000000003", "TXN000000000004", 0).unwrap();
        assert_eq!(store.find_client("ACC1001").unwrap().accounts[0].balance, 700.0);
        assert_eq!(store.find_client("ACC1002").unwrap().accounts[0].balance, 1300.0);
    }

    #[test]
    fn transfer_to_a_client_with_no_accounts_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("accounts.dat")).unwrap();
        store.add_client(fixture_client("ACC1001")).unwrap();
        let mut target = fixture_client("ACC1002");
        target.accounts.clear();
        store.add_client(target).unwrap();
        let err = store.transfer("ACC1001", 0, "ACC1002", 100.0, "", "TXN000000000005", "TXN000000000006", 0).unwrap_err();
        assert!(matches!(err, BankError::TargetAccountNotFound(_)));
        assert_eq!(store.find_client("ACC1001").unwrap().accounts[0].balance, 1000.0);
    }

    #[test]
    fn malformed_snapshot_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.dat");
        let garbage = bank_crypto::encrypt_str("not|enough|fields\n===\n", SNAPSHOT_KEY);
        fs::write(&path, garbage).unwrap();
        let store = Store::open(&path).unwrap();
        assert_eq!(store.client_count(), 0);
    }
}
