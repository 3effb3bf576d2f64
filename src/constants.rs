//! Constants used throughout the application.
//!
//! This module contains all constants used in the diary application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "diary";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A single-file journal with optional encryption at rest";

// CLI Arguments & Defaults
/// Default location of the settings file, expanded with `shellexpand`.
pub const DEFAULT_SETTINGS_PATH: &str = "~/.config/diary/settings.yml";
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// Configuration Keys & Environment Variables
/// Environment variable that supplies the passphrase without prompting (tests, scripts).
pub const ENV_VAR_TEST_PASSPHRASE: &str = "DIARY_TEST_PASSPHRASE";

// Settings defaults
/// Default `DateFormat` (strftime syntax).
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
/// Default `EditorCmd`.
pub const DEFAULT_EDITOR_CMD: &str = "vim {{.DiaryFile}}";

// Template variables
/// Variable holding today's date stamp in the entry template.
pub const TEMPLATE_VAR_DATE: &str = "Date";
/// Variable holding the working copy path in `EditorCmd`.
pub const TEMPLATE_VAR_DIARY_FILE: &str = "DiaryFile";
/// Separator appended after every rendered entry header.
pub const ENTRY_SEPARATOR: &str = "\n\n";

// File System Parameters
/// File name of the durable diary inside the settings directory.
pub const DIARY_FILE_NAME: &str = "diary.md";
/// File name of the entry template inside the settings directory.
pub const TEMPLATE_FILE_NAME: &str = "template.md";
/// Prefix for per-session staging directories.
pub const STAGING_DIR_PREFIX: &str = "diary-";
/// Extension for working copies, so editors pick Markdown highlighting.
pub const WORKING_COPY_EXTENSION: &str = ".md";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

