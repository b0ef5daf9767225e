pub mod codec;
pub mod hash;

pub use codec::{decrypt, decrypt_to_string, encrypt, encrypt_str, DecryptError};
pub use hash::{hash_password, verify_password};

/// The constant key the snapshot and settings files are encrypted under.
pub const SNAPSHOT_KEY: &str = "bank-system-key-2024";
