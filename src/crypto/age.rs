//! Age encryption implementation for the diary document.
//!
//! Passphrase-based encryption using the age crate (scrypt recipient stanza,
//! ChaCha20-Poly1305 payload). Both functions are stateless: every call derives
//! its own key material from the passphrase and nothing is cached afterwards.

use crate::errors::{AppResult, CryptoError};
use age::secrecy::{ExposeSecret, SecretString};
use std::io::{Read, Write};
use tracing::debug;
use zeroize::Zeroizing;

/// Encrypt data using age with passphrase.
///
/// # Example
///
/// ```no_run
/// use diary::crypto::encrypt_with_passphrase;
/// use age::secrecy::SecretString;
///
/// let passphrase = SecretString::new("my-secret-passphrase".to_string());
/// let plaintext = b"Secret data";
/// let encrypted = encrypt_with_passphrase(plaintext, &passphrase)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encrypt_with_passphrase(plaintext: &[u8], passphrase: &SecretString) -> AppResult<Vec<u8>> {
    let encryptor = age::Encryptor::with_user_passphrase(SecretString::new(
        passphrase.expose_secret().to_owned(),
    ));

    let mut ciphertext = Vec::with_capacity(plaintext.len() + 256);
    let mut writer = encryptor
        .wrap_output(&mut ciphertext)
        .map_err(CryptoError::EncryptionSetup)?;
    writer
        .write_all(plaintext)
        .map_err(CryptoError::EncryptionFailed)?;
    writer.finish().map_err(CryptoError::EncryptionFailed)?;

    debug!(
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "encrypted diary"
    );
    Ok(ciphertext)
}

/// Decrypt age-encrypted data with passphrase.
///
/// Fails closed: a wrong passphrase or input that is not age ciphertext yields
/// [`CryptoError::DecryptionFailed`], and a payload that does not authenticate
/// yields [`CryptoError::CorruptPayload`]. No partial plaintext is returned.
///
/// # Example
///
/// ```no_run
/// use diary::crypto::{encrypt_with_passphrase, decrypt_with_passphrase};
/// use age::secrecy::SecretString;
///
/// let passphrase = SecretString::new("my-secret-passphrase".to_string());
/// let plaintext = b"Secret data";
/// let encrypted = encrypt_with_passphrase(plaintext, &passphrase)?;
/// let decrypted = decrypt_with_passphrase(&encrypted, &passphrase)?;
/// assert_eq!(plaintext, decrypted.as_slice());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decrypt_with_passphrase(ciphertext: &[u8], passphrase: &SecretString) -> AppResult<Vec<u8>> {
    let decryptor = match age::Decryptor::new(ciphertext).map_err(CryptoError::DecryptionFailed)? {
        age::Decryptor::Passphrase(d) => d,
        _ => return Err(CryptoError::UnsupportedFormat.into()),
    };

    let mut reader = decryptor
        .decrypt(passphrase, None)
        .map_err(CryptoError::DecryptionFailed)?;

    // Anything read before an authentication failure must not leak out.
    let mut plaintext = Zeroizing::new(Vec::with_capacity(ciphertext.len()));
    reader
        .read_to_end(&mut plaintext)
        .map_err(CryptoError::CorruptPayload)?;

    debug!(plaintext_len = plaintext.len(), "decrypted diary");
    Ok(std::mem::take(&mut *plaintext))
}
