//! Error handling utilities for the diary application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Every error is terminal for the current operation. Variants are split by the
//! phase that produced them so the user can tell whether acquiring, composing,
//! editing, or committing the diary failed.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur when interacting with external editors.
///
/// # Examples
///
/// ```
/// use diary::errors::EditorError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "command not found");
/// let error = EditorError::CommandNotFound {
///     command: "vim".to_string(),
///     source: io_error,
/// };
///
/// assert!(format!("{}", error).contains("not found"));
/// assert!(format!("{}", error).contains("vim"));
/// ```
///
/// ```
/// use diary::errors::EditorError;
///
/// let error = EditorError::NonZeroExit {
///     command: "vim".to_string(),
///     status_code: 1,
/// };
///
/// assert!(format!("{}", error).contains("non-zero status code"));
/// assert!(format!("{}", error).contains("not saving"));
/// ```
#[derive(Debug, Error)]
pub enum EditorError {
    /// The rendered editor command was empty after splitting on whitespace.
    #[error("Editor command is empty after rendering EditorCmd")]
    EmptyCommand,

    /// Error when the specified editor command cannot be found.
    #[error("Editor command '{command}' not found: {source}. Please check that the editor is installed and available in your PATH.")]
    CommandNotFound {
        /// The editor command that was not found
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when permission is denied to execute the editor command.
    #[error("Permission denied when trying to execute editor '{command}': {source}")]
    PermissionDenied {
        /// The editor command that had permission denied
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor command fails to execute due to other I/O errors.
    #[error("Failed to execute editor '{command}': {source}")]
    ExecutionFailed {
        /// The editor command that failed to execute
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when the editor exits with a non-zero status code.
    #[error("Editor '{command}' exited with non-zero status code: {status_code}, not saving")]
    NonZeroExit {
        /// The editor command that exited with a non-zero status
        command: String,
        /// The exit status code, `-1` when the process was killed by a signal
        status_code: i32,
    },
}

/// Failures reading or writing the durable diary or its working copy.
///
/// # Examples
///
/// ```
/// use diary::errors::StorageError;
/// use std::io;
/// use std::path::PathBuf;
///
/// let error = StorageError::WriteDocument {
///     path: PathBuf::from("/home/me/.config/diary/diary.md"),
///     source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
/// };
/// assert!(format!("{}", error).contains("Unable to store the diary"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// The durable diary exists but could not be read.
    #[error("Unable to load stored diary {path}: {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No private transient location could be prepared for the working copy.
    #[error("Unable to prepare a private working copy: {source}")]
    CreateWorkingCopy {
        #[source]
        source: io::Error,
    },

    /// The working copy could not be read back.
    #[error("Unable to read working copy {path}: {source}")]
    ReadWorkingCopy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The working copy could not be written.
    #[error("Unable to write working copy {path}: {source}")]
    WriteWorkingCopy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The durable diary could not be replaced. The previous content is intact.
    #[error("Unable to store the diary {path}: {source}")]
    WriteDocument {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Represents specific error cases that can occur during cryptographic operations.
///
/// # Examples
///
/// ```
/// use diary::errors::CryptoError;
///
/// let error = CryptoError::PassphraseMismatch;
/// assert!(format!("{}", error).contains("do not match"));
/// ```
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Reading the passphrase from the terminal failed.
    #[error("Unable to read password: {0}")]
    PassphrasePrompt(String),

    /// An empty passphrase was entered.
    #[error("Passphrase cannot be empty")]
    EmptyPassphrase,

    /// The confirmation for a new passphrase did not match.
    #[error("Passphrases do not match")]
    PassphraseMismatch,

    /// Encrypted data uses an age format other than passphrase encryption.
    #[error("Unsupported encryption format: the diary is not passphrase-encrypted")]
    UnsupportedFormat,

    /// Wrong passphrase, or the input is not age ciphertext.
    #[error("Unable to decrypt diary: {0}")]
    DecryptionFailed(#[source] age::DecryptError),

    /// The header authenticated but the payload did not.
    #[error("Unable to decrypt diary, ciphertext is corrupt: {0}")]
    CorruptPayload(#[source] io::Error),

    /// Error raised by the underlying cipher while encrypting.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(#[source] io::Error),

    /// The age header could not be produced.
    #[error("Unable to start encryption: {0}")]
    EncryptionSetup(#[source] age::EncryptError),
}

impl CryptoError {
    /// Returns true for the failures that mean "this ciphertext cannot be opened with
    /// this passphrase".
    pub fn is_decryption_failure(&self) -> bool {
        matches!(
            self,
            CryptoError::DecryptionFailed(_)
                | CryptoError::CorruptPayload(_)
                | CryptoError::UnsupportedFormat
        )
    }
}

/// Errors raised while parsing or rendering a `{{ Name }}` template.
///
/// ```
/// use diary::errors::TemplateError;
///
/// let error = TemplateError::Unclosed { offset: 4 };
/// assert_eq!(format!("{}", error), "unclosed '{{' at byte 4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed '{{{{' at byte {offset}")]
    Unclosed { offset: usize },

    #[error("empty action at byte {offset}")]
    EmptyAction { offset: usize },

    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },
}

/// Represents all possible errors that can occur in the diary application.
///
/// # Examples
///
/// ```
/// use diary::errors::AppError;
///
/// let error = AppError::Config("Missing DateFormat".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing DateFormat");
/// ```
///
/// ```
/// use diary::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors outside the staging workflow (init, settings, template).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Durable diary or working copy could not be accessed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Errors related to cryptographic operations.
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// The entry template (or EditorCmd) is malformed.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// The diary already contains today's date stamp. Nothing was changed.
    #[error("The diary already contains the current date ({date})")]
    EntryAlreadyExists { date: String },

    /// Errors when interacting with the text editor.
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;
