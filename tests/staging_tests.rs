//! Integration tests for staging sessions.
//!
//! Every test places working copies in its own staging directory so it can check
//! that nothing is left behind once the session is over.

use age::secrecy::SecretString;
use diary::crypto::{
    decrypt_with_passphrase, encrypt_with_passphrase, FixedPassphrase, PassphrasePrompt,
};
use diary::errors::{AppError, AppResult, StorageError};
use diary::staging::StagingSession;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Records each call and answers with a fixed passphrase.
struct RecordingPrompt {
    passphrase: String,
    calls: RefCell<Vec<bool>>,
}

impl RecordingPrompt {
    fn new(passphrase: &str) -> Self {
        Self {
            passphrase: passphrase.to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl PassphrasePrompt for RecordingPrompt {
    fn read_passphrase(&self, new_document: bool) -> AppResult<SecretString> {
        self.calls.borrow_mut().push(new_document);
        Ok(SecretString::new(self.passphrase.clone()))
    }
}

fn staging_is_empty(dir: &Path) -> bool {
    fs::read_dir(dir).expect("read staging dir").count() == 0
}

#[test]
fn test_encrypted_bootstrap_then_reopen() {
    let staging = tempdir().unwrap();
    let docs = tempdir().unwrap();
    let document = docs.path().join("diary.md");

    let prompt = RecordingPrompt::new("pw");
    let session = StagingSession::acquire_in(staging.path(), &document, true, &prompt).unwrap();
    assert_eq!(session.working_copy().read_to_string().unwrap().as_str(), "");
    session.working_copy().write(b"# 2024-01-01\n\nfirst").unwrap();
    session.commit().unwrap();

    assert_eq!(*prompt.calls.borrow(), vec![true]);
    assert!(staging_is_empty(staging.path()));

    let stored = fs::read(&document).unwrap();
    assert!(stored.starts_with(b"age-encryption.org/"));
    let plaintext = decrypt_with_passphrase(&stored, &SecretString::new("pw".to_string())).unwrap();
    assert_eq!(plaintext, b"# 2024-01-01\n\nfirst");

    let prompt = RecordingPrompt::new("pw");
    let session = StagingSession::acquire_in(staging.path(), &document, true, &prompt).unwrap();
    assert_eq!(
        session.working_copy().read_to_string().unwrap().as_str(),
        "# 2024-01-01\n\nfirst"
    );
    session.discard();

    assert_eq!(*prompt.calls.borrow(), vec![false]);
    assert!(staging_is_empty(staging.path()));
}

#[test]
fn test_empty_existing_document_counts_as_new() {
    let staging = tempdir().unwrap();
    let docs = tempdir().unwrap();
    let document = docs.path().join("diary.md");
    fs::write(&document, b"").unwrap();

    let prompt = RecordingPrompt::new("pw");
    let session = StagingSession::acquire_in(staging.path(), &document, true, &prompt).unwrap();
    assert_eq!(session.working_copy().read().unwrap().len(), 0);
    session.discard();

    assert_eq!(*prompt.calls.borrow(), vec![true]);
}

#[test]
fn test_wrong_passphrase_leaves_nothing_behind() {
    let staging = tempdir().unwrap();
    let docs = tempdir().unwrap();
    let document = docs.path().join("diary.md");
    let stored =
        encrypt_with_passphrase(b"# 2024-01-01\n\nsecret", &SecretString::new("right".to_string()))
            .unwrap();
    fs::write(&document, &stored).unwrap();

    let result =
        StagingSession::acquire_in(staging.path(), &document, true, &FixedPassphrase::new("wrong"));

    match result {
        Err(AppError::Crypto(e)) => assert!(e.is_decryption_failure()),
        other => panic!("expected decryption failure, got {:?}", other),
    }
    assert!(staging_is_empty(staging.path()));
    assert_eq!(fs::read(&document).unwrap(), stored);
}

#[test]
fn test_plaintext_document_with_encrypt_enabled_fails() {
    let staging = tempdir().unwrap();
    let docs = tempdir().unwrap();
    let document = docs.path().join("diary.md");
    fs::write(&document, "# 2024-01-01\n\nplain").unwrap();

    let result =
        StagingSession::acquire_in(staging.path(), &document, true, &FixedPassphrase::new("pw"));

    assert!(matches!(result, Err(AppError::Crypto(ref e)) if e.is_decryption_failure()));
    assert!(staging_is_empty(staging.path()));
    assert_eq!(
        fs::read_to_string(&document).unwrap(),
        "# 2024-01-01\n\nplain"
    );
}

#[test]
fn test_failed_write_keeps_previous_document() {
    let staging = tempdir().unwrap();
    let docs = tempdir().unwrap();
    let original_dir = docs.path().join("diary");
    fs::create_dir(&original_dir).unwrap();
    let document = original_dir.join("diary.md");
    fs::write(&document, "# 2024-01-01\n\nkeep me").unwrap();

    let prompt = FixedPassphrase::new("unused");
    let session = StagingSession::acquire_in(staging.path(), &document, false, &prompt).unwrap();
    session.working_copy().write(b"replacement").unwrap();

    // Move the directory away so the replacement cannot be written next to the document.
    let moved_dir = docs.path().join("moved");
    fs::rename(&original_dir, &moved_dir).unwrap();

    let result = session.commit();

    assert!(matches!(
        result,
        Err(AppError::Storage(StorageError::WriteDocument { .. }))
    ));
    assert!(staging_is_empty(staging.path()));
    assert_eq!(
        fs::read_to_string(moved_dir.join("diary.md")).unwrap(),
        "# 2024-01-01\n\nkeep me"
    );
}

#[test]
fn test_commit_writes_exactly_the_working_copy() {
    let staging = tempdir().unwrap();
    let docs = tempdir().unwrap();
    let document = docs.path().join("diary.md");
    fs::write(&document, "old").unwrap();

    let prompt = FixedPassphrase::new("unused");
    let session = StagingSession::acquire_in(staging.path(), &document, false, &prompt).unwrap();
    assert_eq!(session.document_path(), document.as_path());
    session.working_copy().write(b"new\r\nbytes\0kept").unwrap();
    session.commit().unwrap();

    assert_eq!(fs::read(&document).unwrap(), b"new\r\nbytes\0kept");
    assert!(staging_is_empty(staging.path()));
    // Only the document remains next to it.
    assert_eq!(fs::read_dir(docs.path()).unwrap().count(), 1);
}

#[test]
fn test_leftover_editor_files_are_removed() {
    let staging = tempdir().unwrap();
    let docs = tempdir().unwrap();
    let document = docs.path().join("diary.md");

    let prompt = FixedPassphrase::new("unused");
    let session = StagingSession::acquire_in(staging.path(), &document, false, &prompt).unwrap();
    let working_dir = session
        .working_copy()
        .path()
        .parent()
        .unwrap()
        .to_path_buf();
    fs::write(working_dir.join(".swap"), "editor junk").unwrap();

    session.discard();

    assert!(staging_is_empty(staging.path()));
    assert!(!document.exists());
}

#[cfg(unix)]
#[test]
fn test_commit_through_symlink_updates_target() {
    let staging = tempdir().unwrap();
    let docs = tempdir().unwrap();
    let target = docs.path().join("synced-diary.md");
    fs::write(&target, "old").unwrap();
    let link = docs.path().join("diary.md");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let prompt = FixedPassphrase::new("unused");
    let session = StagingSession::acquire_in(staging.path(), &link, false, &prompt).unwrap();
    assert_eq!(session.working_copy().read_to_string().unwrap().as_str(), "old");
    session.working_copy().write(b"new").unwrap();
    session.commit().unwrap();

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    assert!(staging_is_empty(staging.path()));
}

#[cfg(unix)]
#[test]
fn test_encrypted_commit_through_relative_symlink() {
    let staging = tempdir().unwrap();
    let docs = tempdir().unwrap();
    fs::create_dir(docs.path().join("sync")).unwrap();
    let link = docs.path().join("diary.md");
    std::os::unix::fs::symlink("sync/diary.md", &link).unwrap();

    let session =
        StagingSession::acquire_in(staging.path(), &link, true, &FixedPassphrase::new("pw"))
            .unwrap();
    session.working_copy().write(b"# 2024-01-01\n\n").unwrap();
    session.commit().unwrap();

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    let stored = fs::read(docs.path().join("sync").join("diary.md")).unwrap();
    let plaintext = decrypt_with_passphrase(&stored, &SecretString::new("pw".to_string())).unwrap();
    assert_eq!(plaintext, b"# 2024-01-01\n\n");
}
