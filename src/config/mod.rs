//! Configuration management for the diary application.
//!
//! Settings live in a YAML file (by default `~/.config/diary/settings.yml`). The
//! durable diary and the entry template sit next to it:
//!
//! ```text
//! ~/.config/diary/
//! ├── settings.yml   # DateFormat, EditorCmd, Encrypt
//! ├── template.md    # entry header, rendered with {{.Date}}
//! └── diary.md       # the journal (plaintext or age ciphertext)
//! ```
//!
//! # Settings keys
//!
//! - `DateFormat`: strftime pattern for today's date stamp (default `%Y-%m-%d`)
//! - `EditorCmd`: editor command line with a `{{.DiaryFile}}` placeholder
//!   (default `vim {{.DiaryFile}}`)
//! - `Encrypt`: encrypt the diary at rest with a passphrase (default `false`)

use crate::constants::{
    DEFAULT_DATE_FORMAT, DEFAULT_EDITOR_CMD, DIARY_FILE_NAME, TEMPLATE_FILE_NAME,
    TEMPLATE_VAR_DIARY_FILE,
};
use crate::errors::{AppError, AppResult};
use crate::journal_core::parse_date_format;
use crate::template;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-invocation settings, read once and never modified.
///
/// # Examples
///
/// ```
/// use diary::Settings;
///
/// let settings = Settings::from_yaml("Encrypt: true\n").unwrap();
/// assert!(settings.encrypt);
/// assert_eq!(settings.date_format, "%Y-%m-%d");
/// assert_eq!(settings.editor_cmd, "vim {{.DiaryFile}}");
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// strftime pattern used to compute today's date stamp.
    #[serde(rename = "DateFormat")]
    pub date_format: String,

    /// Editor command line template containing `{{.DiaryFile}}`.
    #[serde(rename = "EditorCmd")]
    pub editor_cmd: String,

    /// Whether the diary is encrypted at rest.
    #[serde(rename = "Encrypt")]
    pub encrypt: bool,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("date_format", &self.date_format)
            .field("editor_cmd", &"[REDACTED_COMMAND]")
            .field("encrypt", &self.encrypt)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            editor_cmd: DEFAULT_EDITOR_CMD.to_string(),
            encrypt: false,
        }
    }
}

impl Settings {
    /// Parses settings from YAML. Missing keys take their defaults; an empty
    /// document yields the defaults.
    pub fn from_yaml(yaml: &str) -> AppResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| AppError::Config(format!("Unable to parse settings: {}", e)))
    }

    /// Reads and validates the settings file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file is missing (pointing at `diary init`),
    /// unreadable, not valid YAML, or fails [`Settings::validate`].
    pub fn load(path: &Path) -> AppResult<Self> {
        let yaml = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AppError::Config(format!(
                "Settings file {} not found. Run `diary init` first",
                path.display()
            )),
            _ => AppError::Config(format!(
                "Unable to read settings file {}: {}",
                path.display(),
                e
            )),
        })?;

        let settings = Self::from_yaml(&yaml)?;
        settings.validate()?;
        debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Validates that the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - `DateFormat` is empty or contains an invalid specifier
    /// - `EditorCmd` is empty
    /// - `EditorCmd` does not reference `{{.DiaryFile}}`
    /// - `EditorCmd` is not a well-formed template
    ///
    /// # Examples
    ///
    /// ```
    /// use diary::Settings;
    ///
    /// let mut settings = Settings::default();
    /// assert!(settings.validate().is_ok());
    ///
    /// settings.editor_cmd = "vim".to_string();
    /// assert!(settings.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        parse_date_format(&self.date_format)?;

        if self.editor_cmd.trim().is_empty() {
            return Err(AppError::Config("EditorCmd cannot be empty".to_string()));
        }

        if !template::references(&self.editor_cmd, TEMPLATE_VAR_DIARY_FILE) {
            return Err(AppError::Config(format!(
                "EditorCmd must contain the {{{{.{}}}}} placeholder",
                TEMPLATE_VAR_DIARY_FILE
            )));
        }

        template::render(&self.editor_cmd, &[(TEMPLATE_VAR_DIARY_FILE, "")])
            .map_err(|e| AppError::Config(format!("Invalid EditorCmd: {}", e)))?;

        Ok(())
    }
}

/// Locations of the files the diary works with, all derived from the settings path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryPaths {
    /// The settings file itself.
    pub settings_file: PathBuf,
    /// The directory holding settings, template and diary.
    pub base_dir: PathBuf,
    /// The durable diary document.
    pub diary_file: PathBuf,
    /// The entry template.
    pub template_file: PathBuf,
}

impl DiaryPaths {
    /// Derives all paths from the settings file location.
    ///
    /// `~` and environment variables in `settings_file` are expanded.
    ///
    /// # Examples
    ///
    /// ```
    /// use diary::config::DiaryPaths;
    /// use std::path::PathBuf;
    ///
    /// let paths = DiaryPaths::from_settings_file("/srv/diary/settings.yml").unwrap();
    /// assert_eq!(paths.diary_file, PathBuf::from("/srv/diary/diary.md"));
    /// assert_eq!(paths.template_file, PathBuf::from("/srv/diary/template.md"));
    /// ```
    pub fn from_settings_file(settings_file: &str) -> AppResult<Self> {
        let expanded = shellexpand::full(settings_file)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let settings_file = PathBuf::from(expanded.into_owned());

        if settings_file.as_os_str().is_empty() {
            return Err(AppError::Config("Settings path is empty".to_string()));
        }

        let base_dir = match settings_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            diary_file: base_dir.join(DIARY_FILE_NAME),
            template_file: base_dir.join(TEMPLATE_FILE_NAME),
            settings_file,
            base_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(settings.editor_cmd, DEFAULT_EDITOR_CMD);
        assert!(!settings.encrypt);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = "DateFormat: \"%d.%m.%Y\"\nEditorCmd: \"nano {{.DiaryFile}}\"\nEncrypt: true\n";
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.date_format, "%d.%m.%Y");
        assert_eq!(settings.editor_cmd, "nano {{.DiaryFile}}");
        assert!(settings.encrypt);
    }

    #[test]
    fn test_from_yaml_empty_is_default() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
        assert_eq!(Settings::from_yaml("\n  \n").unwrap(), Settings::default());
    }

    #[test]
    fn test_from_yaml_ignores_unknown_keys() {
        let settings = Settings::from_yaml("Encrypt: true\nTheme: dark\n").unwrap();
        assert!(settings.encrypt);
        assert_eq!(settings.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn test_from_yaml_rejects_wrong_types() {
        let result = Settings::from_yaml("Encrypt: maybe\n");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_editor_cmd() {
        let mut settings = Settings::default();

        settings.editor_cmd = "  ".to_string();
        assert!(settings.validate().is_err());

        settings.editor_cmd = "vim".to_string();
        let err = settings.validate().unwrap_err();
        assert!(format!("{}", err).contains("{{.DiaryFile}}"));

        settings.editor_cmd = "vim {{.DiaryFile}} {{.Nope}}".to_string();
        assert!(settings.validate().is_err());

        settings.editor_cmd = "code --wait {{ DiaryFile }}".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_date_format() {
        let settings = Settings {
            date_format: "%Y-%".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_editor_command() {
        let settings = Settings {
            editor_cmd: "secret-editor {{.DiaryFile}}".to_string(),
            ..Settings::default()
        };
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("secret-editor"));
        assert!(debug.contains("[REDACTED_COMMAND]"));
    }

    #[test]
    fn test_load_missing_file_mentions_init() {
        let dir = tempdir().unwrap();
        let err = Settings::load(&dir.path().join("settings.yml")).unwrap_err();
        assert!(format!("{}", err).contains("diary init"));
    }

    #[test]
    fn test_load_validates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yml");
        fs::write(&path, "EditorCmd: vim\n").unwrap();
        assert!(Settings::load(&path).is_err());

        fs::write(&path, "EditorCmd: \"vi {{.DiaryFile}}\"\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.editor_cmd, "vi {{.DiaryFile}}");
    }

    #[test]
    fn test_paths_relative_settings_file() {
        let paths = DiaryPaths::from_settings_file("settings.yml").unwrap();
        assert_eq!(paths.base_dir, PathBuf::from("."));
        assert_eq!(paths.diary_file, PathBuf::from("./diary.md"));
    }
}
