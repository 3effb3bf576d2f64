//! Editor abstraction for opening the diary working copy.
//!
//! This module provides an abstraction for handing a file to an external editor,
//! allowing the application to work with different editors and to be testable
//! by mocking the editor functionality.

use crate::constants::TEMPLATE_VAR_DIARY_FILE;
use crate::errors::{AppResult, EditorError};
use crate::template;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Trait defining the interface for an editor component.
///
/// `edit` blocks until the user is done. Returning an error means the edit must
/// not be saved.
///
/// # Examples
///
/// ```
/// use diary::editor::Editor;
/// use diary::errors::AppResult;
/// use std::path::Path;
///
/// struct AppendingEditor;
///
/// impl Editor for AppendingEditor {
///     fn edit(&self, path: &Path) -> AppResult<()> {
///         let mut text = std::fs::read_to_string(path)?;
///         text.push_str("written by a robot\n");
///         std::fs::write(path, text)?;
///         Ok(())
///     }
/// }
/// ```
pub trait Editor {
    /// Opens `path` for editing and waits for the editor to exit.
    fn edit(&self, path: &Path) -> AppResult<()>;
}

/// An implementation of the Editor trait that runs the configured `EditorCmd`.
///
/// The command template is rendered with `DiaryFile` set to the working copy
/// path, then split on whitespace into program and arguments. Arguments that
/// contain spaces cannot be expressed; use a wrapper script for those. The
/// editor inherits stdin, stdout and stderr from the terminal.
///
/// # Examples
///
/// ```
/// use diary::editor::SystemEditor;
/// use std::path::Path;
///
/// let editor = SystemEditor::new("code --wait {{.DiaryFile}}");
/// let argv = editor.command_line(Path::new("/dev/shm/diary-x/entry.md")).unwrap();
/// assert_eq!(argv, vec!["code", "--wait", "/dev/shm/diary-x/entry.md"]);
/// ```
#[derive(Debug, Clone)]
pub struct SystemEditor {
    /// The `EditorCmd` template, e.g. `vim {{.DiaryFile}}`.
    pub editor_cmd: String,
}

impl SystemEditor {
    pub fn new(editor_cmd: impl Into<String>) -> Self {
        Self {
            editor_cmd: editor_cmd.into(),
        }
    }

    /// Renders `EditorCmd` for `path` and splits it into program and arguments.
    pub fn command_line(&self, path: &Path) -> AppResult<Vec<String>> {
        let diary_file = path.to_string_lossy();
        let rendered = template::render(
            &self.editor_cmd,
            &[(TEMPLATE_VAR_DIARY_FILE, diary_file.as_ref())],
        )?;

        let argv: Vec<String> = rendered.split_whitespace().map(str::to_string).collect();
        if argv.is_empty() {
            return Err(EditorError::EmptyCommand.into());
        }
        Ok(argv)
    }
}

impl Editor for SystemEditor {
    /// Runs the editor and maps launch failures and non-zero exits to [`EditorError`].
    fn edit(&self, path: &Path) -> AppResult<()> {
        let argv = self.command_line(path)?;
        let (program, args) = argv.split_first().ok_or(EditorError::EmptyCommand)?;
        debug!("Launching editor: {} ({} args)", program, args.len());

        let status = Command::new(program).args(args).status();

        match status {
            Err(e) if e.kind() == ErrorKind::NotFound => Err(EditorError::CommandNotFound {
                command: program.clone(),
                source: e,
            }
            .into()),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(EditorError::PermissionDenied {
                    command: program.clone(),
                    source: e,
                }
                .into())
            }
            Err(e) => Err(EditorError::ExecutionFailed {
                command: program.clone(),
                source: e,
            }
            .into()),
            Ok(status) if !status.success() => Err(EditorError::NonZeroExit {
                command: program.clone(),
                status_code: status.code().unwrap_or(-1),
            }
            .into()),
            Ok(_) => Ok(()),
        }
    }
}
