//! Interactive passphrase input.
//!
//! The staging workflow asks for the passphrase through the [`PassphrasePrompt`]
//! trait so tests can supply one without a terminal.

use crate::constants::ENV_VAR_TEST_PASSPHRASE;
use crate::errors::{AppResult, CryptoError};
use age::secrecy::SecretString;
use tracing::debug;

/// Source of the diary passphrase.
///
/// Called at most once per staging session. `new_document` is true when there is
/// no ciphertext yet to check the passphrase against, so implementations that
/// talk to a human should ask for confirmation.
pub trait PassphrasePrompt {
    fn read_passphrase(&self, new_document: bool) -> AppResult<SecretString>;
}

/// Prompts on the controlling terminal without echo.
///
/// For non-interactive testing, set `DIARY_TEST_PASSPHRASE`. This bypasses
/// prompting and uses the provided value.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn ask(label: &str) -> AppResult<String> {
        rpassword::prompt_password(label)
            .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()).into())
    }
}

impl PassphrasePrompt for TerminalPrompt {
    fn read_passphrase(&self, new_document: bool) -> AppResult<SecretString> {
        if let Ok(test_passphrase) = std::env::var(ENV_VAR_TEST_PASSPHRASE) {
            debug!("Using {} for non-interactive testing", ENV_VAR_TEST_PASSPHRASE);
            return Ok(SecretString::new(test_passphrase));
        }

        debug!("Prompting for passphrase (new_document={})", new_document);
        let passphrase = Self::ask("Password: ")?;
        if passphrase.is_empty() {
            return Err(CryptoError::EmptyPassphrase.into());
        }

        if new_document {
            let confirmation = Self::ask("Confirm password: ")?;
            if passphrase != confirmation {
                return Err(CryptoError::PassphraseMismatch.into());
            }
        }

        Ok(SecretString::new(passphrase))
    }
}

/// A prompt that always answers with the same passphrase.
///
/// Useful for scripting and tests.
#[derive(Debug)]
pub struct FixedPassphrase(SecretString);

impl FixedPassphrase {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self(SecretString::new(passphrase.into()))
    }
}

impl PassphrasePrompt for FixedPassphrase {
    fn read_passphrase(&self, _new_document: bool) -> AppResult<SecretString> {
        use age::secrecy::ExposeSecret;
        Ok(SecretString::new(self.0.expose_secret().clone()))
    }
}
