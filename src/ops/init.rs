//! First-run scaffolding: settings, template and an empty diary.

use crate::config::DiaryPaths;
use crate::errors::AppResult;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SETTINGS_ASSET: &str = include_str!("../../assets/settings.yml");
const TEMPLATE_ASSET: &str = include_str!("../../assets/template.md");

/// What [`init_diary`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InitReport {
    /// Files written by this call.
    pub created: Vec<PathBuf>,
    /// Files left alone because they already existed.
    pub skipped: Vec<PathBuf>,
}

impl InitReport {
    /// True when the settings file was already present and nothing was done.
    pub fn already_initialized(&self) -> bool {
        self.created.is_empty()
    }
}

/// Writes the bundled `settings.yml` and `template.md` and an empty `diary.md`.
///
/// If the settings file already exists nothing is touched. An existing diary or
/// template is never overwritten. The directory is created with mode 0o700 and
/// the files with 0o600.
///
/// # Errors
///
/// Returns `AppError::Io` if the directory or any file cannot be created.
pub fn init_diary(paths: &DiaryPaths) -> AppResult<InitReport> {
    let mut report = InitReport::default();

    if paths.settings_file.exists() {
        info!(
            "Settings file {} already exists, will not overwrite",
            paths.settings_file.display()
        );
        report.skipped.push(paths.settings_file.clone());
        return Ok(report);
    }

    create_private_dir(&paths.base_dir)?;

    for (path, contents) in [
        (&paths.settings_file, SETTINGS_ASSET),
        (&paths.template_file, TEMPLATE_ASSET),
        (&paths.diary_file, ""),
    ] {
        if write_new_file(path, contents.as_bytes())? {
            debug!("Created {}", path.display());
            report.created.push(path.clone());
        } else {
            debug!("Keeping existing {}", path.display());
            report.skipped.push(path.clone());
        }
    }

    info!(
        "Settings file and template copied to {}",
        paths.base_dir.display()
    );
    Ok(report)
}

fn create_private_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use crate::constants::DEFAULT_DIR_PERMISSIONS;
        fs::set_permissions(dir, fs::Permissions::from_mode(DEFAULT_DIR_PERMISSIONS))?;
    }
    Ok(())
}

/// Creates `path` with `contents`; returns `false` if it already exists.
fn write_new_file(path: &Path, contents: &[u8]) -> io::Result<bool> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use crate::constants::DEFAULT_FILE_PERMISSIONS;
        options.mode(DEFAULT_FILE_PERMISSIONS);
    }

    match options.open(path) {
        Ok(mut file) => {
            file.write_all(contents)?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use tempfile::tempdir;

    fn paths_in(dir: &Path) -> DiaryPaths {
        let settings = dir.join("conf").join("settings.yml");
        DiaryPaths::from_settings_file(settings.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_bundled_settings_are_valid() {
        let settings = Settings::from_yaml(SETTINGS_ASSET).unwrap();
        settings.validate().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_init_creates_all_files() {
        let dir = tempdir().unwrap();
        let paths = paths_in(dir.path());

        let report = init_diary(&paths).unwrap();

        assert_eq!(report.created.len(), 3);
        assert!(!report.already_initialized());
        assert_eq!(fs::read_to_string(&paths.settings_file).unwrap(), SETTINGS_ASSET);
        assert_eq!(fs::read_to_string(&paths.template_file).unwrap(), TEMPLATE_ASSET);
        assert_eq!(fs::read(&paths.diary_file).unwrap(), b"");

        #[cfg(unix)]
        {
            let dir_mode = fs::metadata(&paths.base_dir).unwrap().permissions().mode();
            assert_eq!(dir_mode & 0o777, 0o700);
            let file_mode = fs::metadata(&paths.diary_file).unwrap().permissions().mode();
            assert_eq!(file_mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_init_is_noop_when_settings_exist() {
        let dir = tempdir().unwrap();
        let paths = paths_in(dir.path());
        fs::create_dir_all(&paths.base_dir).unwrap();
        fs::write(&paths.settings_file, "Encrypt: true\n").unwrap();

        let report = init_diary(&paths).unwrap();

        assert!(report.already_initialized());
        assert_eq!(
            fs::read_to_string(&paths.settings_file).unwrap(),
            "Encrypt: true\n"
        );
        assert!(!paths.template_file.exists());
    }

    #[test]
    fn test_init_keeps_existing_diary() {
        let dir = tempdir().unwrap();
        let paths = paths_in(dir.path());
        fs::create_dir_all(&paths.base_dir).unwrap();
        fs::write(&paths.diary_file, "# 2020-02-02\n\nprecious\n").unwrap();

        let report = init_diary(&paths).unwrap();

        assert_eq!(report.skipped, vec![paths.diary_file.clone()]);
        assert_eq!(
            fs::read_to_string(&paths.diary_file).unwrap(),
            "# 2020-02-02\n\nprecious\n"
        );
        assert!(paths.settings_file.exists());
    }
}
