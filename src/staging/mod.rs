//! Staging sessions: the bridge between the durable diary and a plaintext working copy.
//!
//! A [`StagingSession`] is opened with [`StagingSession::acquire`], which reads the
//! durable document, decrypts it if encryption is enabled, and materialises the
//! plaintext as a [`WorkingCopy`] in a private transient directory. The caller
//! (the entry composer or an external editor) then changes the working copy in
//! place, and [`StagingSession::commit`] writes it back.
//!
//! # Guarantees
//!
//! - The durable document is written exactly once, by `commit`, through a
//!   temp-file-and-rename in the document's own directory. A failed commit leaves
//!   the previous bytes in place.
//! - The working copy is overwritten and removed when the session ends, whether
//!   it was committed, discarded, dropped, or aborted by an error.
//! - The passphrase lives only inside the session and is zeroized on drop.
//!
//! There is no locking: two concurrent sessions on the same document will race,
//! and the last commit wins.
//!
//! # Example
//!
//! ```no_run
//! use diary::crypto::TerminalPrompt;
//! use diary::staging::StagingSession;
//! use std::path::Path;
//!
//! let document = Path::new("/home/me/.config/diary/diary.md");
//! let session = StagingSession::acquire(document, true, &TerminalPrompt)?;
//! let mut text = session.working_copy().read_to_string()?;
//! text.push_str("\nOne more line.\n");
//! session.working_copy().write(text.as_bytes())?;
//! session.commit()?;
//! # Ok::<(), diary::AppError>(())
//! ```

use crate::crypto::{self, PassphrasePrompt};
use crate::errors::{AppResult, StorageError};
use age::secrecy::SecretString;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// Magic first line of every age file.
const AGE_HEADER_PREFIX: &[u8] = b"age-encryption.org/";

/// How the durable document is stored.
enum Protection {
    Plaintext,
    Encrypted(SecretString),
}

/// An ephemeral plaintext copy of the diary in a private directory.
///
/// The file and its directory are removed when the value is dropped. Removal
/// overwrites the file with zeros first.
pub struct WorkingCopy {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl WorkingCopy {
    fn create(staging_base: Option<&Path>, contents: &[u8]) -> AppResult<Self> {
        let dir = crypto::create_staging_dir(staging_base)
            .map_err(|source| StorageError::CreateWorkingCopy { source })?;
        let path = crypto::temp::create_private_file(dir.path(), contents)
            .map_err(|source| StorageError::CreateWorkingCopy { source })?;

        debug!("Working copy created at {}", path.display());
        Ok(Self {
            path,
            dir: Some(dir),
        })
    }

    /// Location of the working copy, handed to the external editor.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current content of the working copy.
    pub fn read(&self) -> AppResult<Zeroizing<Vec<u8>>> {
        fs::read(&self.path).map(Zeroizing::new).map_err(|source| {
            StorageError::ReadWorkingCopy {
                path: self.path.clone(),
                source,
            }
            .into()
        })
    }

    /// Reads the working copy as UTF-8 text.
    pub fn read_to_string(&self) -> AppResult<Zeroizing<String>> {
        let bytes = self.read()?;
        match std::str::from_utf8(&bytes) {
            Ok(text) => Ok(Zeroizing::new(text.to_owned())),
            Err(e) => Err(StorageError::ReadWorkingCopy {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            }
            .into()),
        }
    }

    /// Replaces the content of the working copy.
    pub fn write(&self, contents: &[u8]) -> AppResult<()> {
        fs::write(&self.path, contents).map_err(|source| {
            StorageError::WriteWorkingCopy {
                path: self.path.clone(),
                source,
            }
            .into()
        })
    }

    fn destroy(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        if let Err(e) = crypto::secure_delete(&self.path) {
            warn!("Unable to remove working copy {}: {}", self.path.display(), e);
        }
        // The editor may have left swap or backup files next to the copy.
        if let Err(e) = dir.close() {
            warn!("Unable to remove staging directory: {}", e);
        }
        debug!("Working copy removed");
    }
}

impl Drop for WorkingCopy {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for WorkingCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkingCopy")
            .field("path", &self.path)
            .finish()
    }
}

/// One acquire → transform → commit cycle over a durable diary document.
pub struct StagingSession {
    document_path: PathBuf,
    protection: Protection,
    working_copy: WorkingCopy,
}

impl StagingSession {
    /// Opens a session, placing the working copy in the secure temp directory.
    ///
    /// A missing or empty document is treated as an empty diary. With `encrypt`
    /// set, `prompt` is asked for the passphrase exactly once; for a non-empty
    /// document it must decrypt the content, for an empty one it is kept for
    /// the commit.
    ///
    /// # Errors
    ///
    /// - `StorageError::ReadDocument` if the document exists but cannot be read
    /// - any error from `prompt`
    /// - `CryptoError::DecryptionFailed` and friends for a wrong passphrase or corrupt data
    /// - `StorageError::CreateWorkingCopy` if the working copy cannot be created
    ///
    /// No working copy exists after an error.
    pub fn acquire(
        document_path: &Path,
        encrypt: bool,
        prompt: &dyn PassphrasePrompt,
    ) -> AppResult<Self> {
        Self::acquire_with(None, document_path, encrypt, prompt)
    }

    /// Like [`StagingSession::acquire`], but creates the working copy under `staging_dir`.
    pub fn acquire_in(
        staging_dir: &Path,
        document_path: &Path,
        encrypt: bool,
        prompt: &dyn PassphrasePrompt,
    ) -> AppResult<Self> {
        Self::acquire_with(Some(staging_dir), document_path, encrypt, prompt)
    }

    fn acquire_with(
        staging_base: Option<&Path>,
        document_path: &Path,
        encrypt: bool,
        prompt: &dyn PassphrasePrompt,
    ) -> AppResult<Self> {
        let stored = read_document(document_path)?;
        debug!(
            document = %document_path.display(),
            bytes = stored.len(),
            encrypt,
            "Loaded stored diary"
        );

        let (protection, plaintext) = if encrypt {
            let passphrase = prompt.read_passphrase(stored.is_empty())?;
            let plaintext = if stored.is_empty() {
                Zeroizing::new(Vec::new())
            } else {
                Zeroizing::new(crypto::decrypt_with_passphrase(&stored, &passphrase)?)
            };
            (Protection::Encrypted(passphrase), plaintext)
        } else {
            if stored.starts_with(AGE_HEADER_PREFIX) {
                warn!("Encrypt is disabled but the diary looks age-encrypted; editing it as-is");
            }
            (Protection::Plaintext, stored)
        };

        let working_copy = WorkingCopy::create(staging_base, &plaintext)?;

        Ok(Self {
            document_path: document_path.to_path_buf(),
            protection,
            working_copy,
        })
    }

    /// The working copy to compose into or hand to the editor.
    pub fn working_copy(&self) -> &WorkingCopy {
        &self.working_copy
    }

    /// The durable document this session will commit to.
    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    /// Whether the document is encrypted at rest.
    pub fn is_encrypted(&self) -> bool {
        matches!(self.protection, Protection::Encrypted(_))
    }

    /// Writes the working copy back to the durable document and ends the session.
    ///
    /// The content is encrypted with the session passphrase when encryption is
    /// enabled, then atomically replaces the document with mode 0o600. The
    /// working copy is removed whether or not this succeeds.
    ///
    /// # Errors
    ///
    /// - `StorageError::ReadWorkingCopy` if the working copy cannot be read back
    /// - `CryptoError::EncryptionSetup` or `CryptoError::EncryptionFailed` if encryption fails
    /// - `StorageError::WriteDocument` if the document cannot be replaced
    ///
    /// On error the document keeps its previous content.
    pub fn commit(self) -> AppResult<()> {
        let plaintext = self.working_copy.read()?;

        let stored = match &self.protection {
            Protection::Encrypted(passphrase) => {
                Zeroizing::new(crypto::encrypt_with_passphrase(&plaintext, passphrase)?)
            }
            Protection::Plaintext => plaintext,
        };

        replace_document(&self.document_path, &stored).map_err(|source| {
            StorageError::WriteDocument {
                path: self.document_path.clone(),
                source,
            }
        })?;

        info!(
            document = %self.document_path.display(),
            bytes = stored.len(),
            "Diary stored"
        );
        Ok(())
    }

    /// Ends the session without touching the durable document.
    pub fn discard(self) {
        debug!(document = %self.document_path.display(), "Discarding working copy");
    }
}

impl fmt::Debug for StagingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagingSession")
            .field("document_path", &self.document_path)
            .field("encrypted", &self.is_encrypted())
            .field("working_copy", &self.working_copy)
            .finish()
    }
}

/// Reads the durable document; a missing file reads as empty.
fn read_document(path: &Path) -> AppResult<Zeroizing<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Zeroizing::new(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No diary at {}, starting empty", path.display());
            Ok(Zeroizing::new(Vec::new()))
        }
        Err(source) => Err(StorageError::ReadDocument {
            path: path.to_path_buf(),
            source,
        }
        .into()),
    }
}

/// Follows `path` if it is a symlink, so the link's target gets replaced and
/// the link itself survives. A dangling link resolves to the path it names.
fn resolve_symlink(path: &Path) -> io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {}
        _ => return Ok(path.to_path_buf()),
    }

    match fs::canonicalize(path) {
        Ok(target) => {
            debug!("{} is a symlink to {}", path.display(), target.display());
            Ok(target)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let link = fs::read_link(path)?;
            Ok(match path.parent() {
                Some(parent) if link.is_relative() => parent.join(link),
                _ => link,
            })
        }
        Err(e) => Err(e),
    }
}

/// Atomically replaces `path` with `contents`.
///
/// The new content is written to a temp file in the same directory, synced, and
/// renamed over the target, so readers see either the old or the new file.
fn replace_document(path: &Path, contents: &[u8]) -> io::Result<()> {
    let resolved = resolve_symlink(path)?;
    let path = resolved.as_path();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".diary-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;

    #[cfg(unix)]
    {
        use crate::constants::DEFAULT_FILE_PERMISSIONS;
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(DEFAULT_FILE_PERMISSIONS))?;
    }
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    {
        if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
            debug!("Unable to sync {}: {}", dir.display(), e);
        }
    }
    Ok(())
}
