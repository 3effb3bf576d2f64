//! Cryptographic operations for diary encryption and security.
//!
//! This module provides encryption, passphrase input, and secure temporary file
//! handling for the diary. It uses the age encryption format with passphrase-based
//! encryption for simplicity and security.
//!
//! # Module Structure
//!
//! - `age`: Stateless encryption/decryption functions using the age crate
//! - `prompt`: Passphrase input collaborator (terminal or fixed)
//! - `temp`: Secure temporary file handling with tmpfs preference
//!
//! # Example
//!
//! ```no_run
//! use diary::crypto::{encrypt_with_passphrase, decrypt_with_passphrase};
//! use age::secrecy::SecretString;
//!
//! let passphrase = SecretString::new("correct horse battery staple".to_string());
//!
//! let plaintext = b"Secret diary entry";
//! let encrypted = encrypt_with_passphrase(plaintext, &passphrase)?;
//! let decrypted = decrypt_with_passphrase(&encrypted, &passphrase)?;
//! assert_eq!(plaintext, decrypted.as_slice());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod age;
pub mod prompt;
pub mod temp;

// Re-export commonly used types
pub use self::age::{decrypt_with_passphrase, encrypt_with_passphrase};
pub use self::prompt::{FixedPassphrase, PassphrasePrompt, TerminalPrompt};
pub use self::temp::{create_staging_dir, get_secure_temp_dir, secure_delete};
