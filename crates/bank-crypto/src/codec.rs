use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Repeats `key` until it reaches 32 bytes, truncating the final repetition.
/// `key` must be non-empty.
fn derive_key(key: &str) -> Vec<u8> {
    let key_bytes = key.as_bytes();
    debug_assert!(!key_bytes.is_empty(), "codec key must not be empty");
    let mut derived = Vec::with_capacity(32);
    while derived.len() < 32 {
        let remaining = 32 - derived.len();
        derived.extend_from_slice(&key_bytes[..remaining.min(key_bytes.len())]);
    }
    derived
}

fn xor_with_key(data: &mut [u8], key: &[u8]) {
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= key[i % key.len()];
    }
}

/// Encrypts `plaintext` under `key`: derive a 32-byte repeating key, xor the
/// bytes, base64-encode the result. Deterministic.
pub fn encrypt(plaintext: &[u8], key: &str) -> String {
    let derived = derive_key(key);
    let mut data = plaintext.to_vec();
    xor_with_key(&mut data, &derived);
    BASE64.encode(data)
}

/// Inverse of [`encrypt`]. An empty `ciphertext` decodes to an empty
/// plaintext without error.
pub fn decrypt(ciphertext: &str, key: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let mut data = BASE64.decode(ciphertext)?;
    let derived = derive_key(key);
    if !data.is_empty() {
        xor_with_key(&mut data, &derived);
    }
    Ok(data)
}

pub fn encrypt_str(plaintext: &str, key: &str) -> String {
    encrypt(plaintext.as_bytes(), key)
}

pub fn decrypt_to_string(ciphertext: &str, key: &str) -> Result<String, DecryptError> {
    let bytes = decrypt(ciphertext, key)?;
    String::from_utf8(bytes).map_err(DecryptError::Utf8)
}

#[derive(Debug, thiserror::Error)]
pub enum DecryptError {
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("decrypted bytes were not valid utf-8: {0}")]
    Utf8(std::string::FromUtf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_identity() {
        let samples: &[&[u8]] = &[b"", b"hello", b"bank-system-key-2024", &[0u8; 64], &[255u8; 3]];
        for s in samples {
            let ct = encrypt(s, "passphrase");
            let pt = decrypt(&ct, "passphrase").unwrap();
            assert_eq!(&pt, s);
        }
    }

    #[test]
    fn empty_ciphertext_round_trips_to_empty() {
        let pt = decrypt("", "anykey").unwrap();
        assert!(pt.is_empty());
    }

    #[test]
    fn short_key_is_repeated_to_32_bytes() {
        let derived = derive_key("ab");
        assert_eq!(derived.len(), 32);
        assert_eq!(&derived[0..4], b"abab");
    }

    #[test]
    fn wrong_key_does_not_round_trip() {
        let ct = encrypt(b"secret data", "key-one");
        let pt = decrypt(&ct, "key-two").unwrap();
        assert_ne!(pt, b"secret data");
    }
}
