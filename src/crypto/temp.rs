//! Secure temporary file handling with tmpfs preference.
//!
//! Working copies hold decrypted diary content, so they are placed in a private
//! (0o700) directory on a RAM-backed tmpfs when one is available, and removed by
//! overwriting before unlinking.

#[cfg(unix)]
use crate::constants::{DEFAULT_DIR_PERMISSIONS, DEFAULT_FILE_PERMISSIONS};
use crate::constants::{STAGING_DIR_PREFIX, WORKING_COPY_EXTENSION};
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Temporary filesystem paths to check for RAM-based storage.
const TMPFS_PATHS: &[&str] = &["/dev/shm", "/run/shm"];

/// Size of the zero buffer used by [`secure_delete`].
const WIPE_CHUNK: usize = 8 * 1024;

/// Get a secure temporary directory, preferring tmpfs when available.
///
/// On Linux/BSD systems, this function prefers RAM-based tmpfs filesystems
/// (`/dev/shm` or `/run/shm`). If tmpfs is not available, it falls back to
/// the system temp directory with a warning.
///
/// # Example
///
/// ```no_run
/// use diary::crypto::get_secure_temp_dir;
///
/// let temp_dir = get_secure_temp_dir();
/// println!("Using temp dir: {:?}", temp_dir);
/// ```
pub fn get_secure_temp_dir() -> PathBuf {
    if let Some(tmpfs) = TMPFS_PATHS.iter().map(Path::new).find(|p| p.is_dir()) {
        return tmpfs.to_path_buf();
    }

    let fallback = env::temp_dir();
    warn!(
        "No tmpfs available, decrypted working copies will live in {}",
        fallback.display()
    );
    fallback
}

/// Creates a fresh private directory for one staging session.
///
/// With `base` set, the directory is created there and any failure is returned.
/// Otherwise the tmpfs from [`get_secure_temp_dir`] is tried first, falling back
/// to the system temp directory if it is not writable.
///
/// The directory is created with mode 0o700 and removed when the returned
/// [`TempDir`] is dropped.
pub fn create_staging_dir(base: Option<&Path>) -> io::Result<TempDir> {
    if let Some(base) = base {
        return private_dir_in(base);
    }

    let preferred = get_secure_temp_dir();
    private_dir_in(&preferred).or_else(|e| {
        let fallback = env::temp_dir();
        if fallback == preferred {
            return Err(e);
        }
        warn!(
            "Unable to use {} for working copies ({}), falling back to {}",
            preferred.display(),
            e,
            fallback.display()
        );
        private_dir_in(&fallback)
    })
}

fn private_dir_in(base: &Path) -> io::Result<TempDir> {
    let dir = tempfile::Builder::new()
        .prefix(STAGING_DIR_PREFIX)
        .tempdir_in(base)?;

    // tempdir_in honours the umask.
    #[cfg(unix)]
    fs::set_permissions(
        dir.path(),
        fs::Permissions::from_mode(DEFAULT_DIR_PERMISSIONS),
    )?;

    debug!("Created staging directory {}", dir.path().display());
    Ok(dir)
}

/// Writes `contents` to a new uniquely named file inside `dir`.
///
/// The file is created exclusively (it must not already exist) with mode 0o600.
pub fn create_private_file(dir: &Path, contents: &[u8]) -> io::Result<PathBuf> {
    let path = dir.join(format!(
        "{}{}",
        uuid::Uuid::new_v4(),
        WORKING_COPY_EXTENSION
    ));

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(DEFAULT_FILE_PERMISSIONS);

    let mut file = options.open(&path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(path)
}

/// Best-effort secure file deletion (overwrite + remove).
///
/// Overwrites the file with zeros before removing it. This is not
/// cryptographically secure (SSD wear leveling, filesystem journals),
/// but better than direct deletion. The file is removed even if the
/// overwrite fails; a missing file is not an error.
pub fn secure_delete(path: &Path) -> io::Result<()> {
    if let Err(e) = overwrite_with_zeros(path) {
        if e.kind() == io::ErrorKind::NotFound {
            return Ok(());
        }
        warn!("Unable to overwrite {} before removal: {}", path.display(), e);
    }

    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn overwrite_with_zeros(path: &Path) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).open(path)?;
    let mut remaining = file.metadata()?.len();
    let zeros = [0u8; WIPE_CHUNK];

    while remaining > 0 {
        let n = remaining.min(WIPE_CHUNK as u64) as usize;
        file.write_all(&zeros[..n])?;
        remaining -= n as u64;
    }
    file.sync_all()
}
