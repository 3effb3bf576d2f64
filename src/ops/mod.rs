//! High-level operations behind the `add`, `edit` and `init` subcommands.
//!
//! `add` and `edit` share the same shape: acquire a [`StagingSession`] over the
//! diary, change the working copy (compose an entry, or hand it to the editor),
//! then commit. Any error drops the session, which removes the working copy and
//! leaves the durable diary untouched.

pub mod add;
pub mod edit;
pub mod init;

use crate::config::{DiaryPaths, Settings};
use crate::crypto::PassphrasePrompt;
use crate::errors::AppResult;
use crate::staging::StagingSession;
use std::path::PathBuf;

// Re-export commonly used functions
pub use add::add_entry;
pub use edit::edit_diary;
pub use init::{init_diary, InitReport};

/// Everything an operation needs besides its own arguments.
pub struct DiaryContext<'a> {
    pub settings: &'a Settings,
    pub paths: &'a DiaryPaths,
    pub prompt: &'a dyn PassphrasePrompt,
    /// Where working copies go. `None` uses the secure temp directory.
    pub staging_dir: Option<PathBuf>,
}

impl<'a> DiaryContext<'a> {
    pub fn new(
        settings: &'a Settings,
        paths: &'a DiaryPaths,
        prompt: &'a dyn PassphrasePrompt,
    ) -> Self {
        Self {
            settings,
            paths,
            prompt,
            staging_dir: None,
        }
    }

    /// Places working copies under `dir` instead of the secure temp directory.
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    fn acquire(&self) -> AppResult<StagingSession> {
        let document = &self.paths.diary_file;
        let encrypt = self.settings.encrypt;
        match &self.staging_dir {
            Some(dir) => StagingSession::acquire_in(dir, document, encrypt, self.prompt),
            None => StagingSession::acquire(document, encrypt, self.prompt),
        }
    }
}
