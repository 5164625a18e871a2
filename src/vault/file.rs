//! On-disk layout of a vault: a salt file and an encrypted blob.
//!
//! ```text
//! <dir>/salt.key   raw 16-byte PBKDF2 salt, no header
//! <dir>/vault.enc  [12-byte nonce | AES-256-GCM ciphertext + tag], no header
//! ```
//!
//! Both files are always replaced whole: written to a temp file in the
//! same directory, synced, then renamed over the target.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Settings;
use crate::crypto::kdf::SALT_LEN;
use crate::errors::{CerberoError, Result};

/// Default salt file name.
pub const SALT_FILE: &str = "salt.key";

/// Default vault blob file name.
pub const VAULT_FILE: &str = "vault.enc";

/// Locations of the two files that make up a vault.
#[derive(Debug, Clone)]
pub struct VaultFile {
    salt_path: PathBuf,
    vault_path: PathBuf,
}

impl VaultFile {
    /// Vault files named `salt_file` and `vault_file` inside `dir`.
    pub fn new(dir: &Path, salt_file: &str, vault_file: &str) -> Self {
        Self {
            salt_path: dir.join(salt_file),
            vault_path: dir.join(vault_file),
        }
    }

    /// Vault files with the default names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir, SALT_FILE, VAULT_FILE)
    }

    /// Vault files as configured by `settings`, relative to `base_dir`.
    pub fn from_settings(settings: &Settings, base_dir: &Path) -> Self {
        Self::new(
            &settings.vault_dir(base_dir),
            &settings.salt_file,
            &settings.vault_file,
        )
    }

    /// `true` when both the salt and the blob exist.
    pub fn is_configured(&self) -> bool {
        self.salt_path.exists() && self.vault_path.exists()
    }

    /// `true` when either file exists (a setup would overwrite something).
    pub fn exists_any(&self) -> bool {
        self.salt_path.exists() || self.vault_path.exists()
    }

    /// Write a fresh salt together with its first vault blob.
    ///
    /// Fails with `AlreadyExists` if any vault file is present and
    /// `overwrite` is false.  Both files are staged before either is
    /// renamed into place; if the blob cannot be committed the previous
    /// salt (or its absence) is restored so the old pair stays readable.
    pub fn initialize(&self, salt: &[u8; SALT_LEN], blob: &[u8], overwrite: bool) -> Result<()> {
        if !overwrite {
            if self.salt_path.exists() {
                return Err(CerberoError::AlreadyExists(self.salt_path.clone()));
            }
            if self.vault_path.exists() {
                return Err(CerberoError::AlreadyExists(self.vault_path.clone()));
            }
        }

        let dir = parent_dir(&self.salt_path);
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let previous_salt = match fs::read(&self.salt_path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let salt_tmp = stage(&self.salt_path, salt)?;
        let blob_tmp = match stage(&self.vault_path, blob) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = fs::remove_file(&salt_tmp);
                return Err(e.into());
            }
        };

        if let Err(e) = fs::rename(&salt_tmp, &self.salt_path) {
            let _ = fs::remove_file(&salt_tmp);
            let _ = fs::remove_file(&blob_tmp);
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&blob_tmp, &self.vault_path) {
            let _ = fs::remove_file(&blob_tmp);
            let restored = match &previous_salt {
                Some(bytes) => write_atomic(&self.salt_path, bytes),
                None => fs::remove_file(&self.salt_path).map_err(Into::into),
            };
            if let Err(restore) = restored {
                warn!(error = %restore, "could not restore the previous salt");
            }
            return Err(e.into());
        }
        sync_dir(dir)?;

        debug!(path = %self.vault_path.display(), "vault files written");
        Ok(())
    }

    /// Read the 16-byte salt.
    pub fn read_salt(&self) -> Result<[u8; SALT_LEN]> {
        let bytes = read_existing(&self.salt_path)?;
        bytes.as_slice().try_into().map_err(|_| {
            CerberoError::InvalidInput(format!(
                "salt file {} must hold {SALT_LEN} bytes (found {})",
                self.salt_path.display(),
                bytes.len()
            ))
        })
    }

    /// Read the encrypted vault blob.
    pub fn read_blob(&self) -> Result<Vec<u8>> {
        read_existing(&self.vault_path)
    }

    /// Replace the encrypted vault blob.
    pub fn write_blob(&self, bytes: &[u8]) -> Result<()> {
        write_atomic(&self.vault_path, bytes)?;
        debug!(path = %self.vault_path.display(), len = bytes.len(), "vault blob written");
        Ok(())
    }

    pub fn salt_path(&self) -> &Path {
        &self.salt_path
    }

    pub fn vault_path(&self) -> &Path {
        &self.vault_path
    }
}

fn read_existing(path: &Path) -> Result<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(CerberoError::NotConfigured(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Write `bytes` to `path` through a temp file + rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = stage(path, bytes)?;
    commit(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        e.into()
    })
}

/// Directory holding `path`; `.` for a bare file name.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write `bytes` to a synced temp file next to `path` and return its path.
///
/// The temp file lives in the target's directory so the later rename
/// stays on one filesystem and readers never see a half-written file.
fn stage(path: &Path, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let tmp_path = parent_dir(path).join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));
    if let Err(e) = write_synced(&tmp_path, bytes) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(tmp_path)
}

/// Rename a staged file over `path` and make the rename durable.
fn commit(tmp_path: &Path, path: &Path) -> std::io::Result<()> {
    fs::rename(tmp_path, path)?;
    sync_dir(parent_dir(path))
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    // Owner-only permissions for both the salt and the blob.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file: File = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_files_are_not_configured() {
        let tmp = TempDir::new().unwrap();
        let file = VaultFile::in_dir(tmp.path());
        assert!(!file.is_configured());
        assert!(matches!(
            file.read_salt(),
            Err(CerberoError::NotConfigured(_))
        ));
        assert!(matches!(
            file.read_blob(),
            Err(CerberoError::NotConfigured(_))
        ));
    }

    #[test]
    fn initialize_then_read_salt() {
        let tmp = TempDir::new().unwrap();
        let file = VaultFile::in_dir(tmp.path());
        let salt = [9u8; SALT_LEN];
        file.initialize(&salt, b"first blob", false).unwrap();
        assert_eq!(file.read_salt().unwrap(), salt);
        assert_eq!(file.read_blob().unwrap(), b"first blob");
        assert_eq!(fs::read(file.salt_path()).unwrap().len(), SALT_LEN);
    }

    #[test]
    fn initialize_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let file = VaultFile::in_dir(tmp.path());
        file.initialize(&[1u8; SALT_LEN], b"one", false).unwrap();

        let result = file.initialize(&[2u8; SALT_LEN], b"two", false);
        assert!(matches!(result, Err(CerberoError::AlreadyExists(_))));
        assert_eq!(file.read_salt().unwrap(), [1u8; SALT_LEN]);

        file.initialize(&[2u8; SALT_LEN], b"two", true).unwrap();
        assert_eq!(file.read_salt().unwrap(), [2u8; SALT_LEN]);
        assert_eq!(file.read_blob().unwrap(), b"two");
    }

    #[test]
    fn initialize_refuses_when_only_blob_exists() {
        let tmp = TempDir::new().unwrap();
        let file = VaultFile::in_dir(tmp.path());
        file.write_blob(b"blob").unwrap();
        assert!(matches!(
            file.initialize(&[1u8; SALT_LEN], b"one", false),
            Err(CerberoError::AlreadyExists(_))
        ));
    }

    #[test]
    fn initialize_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let file = VaultFile::in_dir(&tmp.path().join("nested").join("vault"));
        file.initialize(&[3u8; SALT_LEN], b"three", false).unwrap();
        assert!(file.salt_path().exists());
    }

    #[test]
    fn failed_blob_commit_restores_previous_salt() {
        let tmp = TempDir::new().unwrap();
        let file = VaultFile::in_dir(tmp.path());
        file.initialize(&[1u8; SALT_LEN], b"one", false).unwrap();

        // A non-empty directory where the blob goes makes the rename fail.
        fs::remove_file(file.vault_path()).unwrap();
        fs::create_dir(file.vault_path()).unwrap();
        fs::write(file.vault_path().join("keep"), b"x").unwrap();

        assert!(file.initialize(&[2u8; SALT_LEN], b"two", true).is_err());
        assert_eq!(file.read_salt().unwrap(), [1u8; SALT_LEN]);
    }

    #[test]
    fn failed_first_initialize_leaves_no_salt() {
        let tmp = TempDir::new().unwrap();
        let file = VaultFile::in_dir(tmp.path());
        fs::create_dir(file.vault_path()).unwrap();
        fs::write(file.vault_path().join("keep"), b"x").unwrap();

        assert!(file.initialize(&[2u8; SALT_LEN], b"two", true).is_err());
        assert!(!file.salt_path().exists());
    }

    #[test]
    fn bare_file_name_lives_in_current_dir() {
        assert_eq!(parent_dir(Path::new("vault.enc")), Path::new("."));
        assert_eq!(parent_dir(Path::new("a/vault.enc")), Path::new("a"));
    }

    #[test]
    fn truncated_salt_is_invalid_input() {
        let tmp = TempDir::new().unwrap();
        let file = VaultFile::in_dir(tmp.path());
        fs::write(file.salt_path(), [0u8; 5]).unwrap();
        assert!(matches!(
            file.read_salt(),
            Err(CerberoError::InvalidInput(_))
        ));
    }

    #[test]
    fn write_blob_replaces_whole_file_and_leaves_no_temp() {
        let tmp = TempDir::new().unwrap();
        let file = VaultFile::in_dir(tmp.path());
        file.write_blob(b"a much longer first blob").unwrap();
        file.write_blob(b"short").unwrap();
        assert_eq!(file.read_blob().unwrap(), b"short");

        let leftovers: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let file = VaultFile::in_dir(tmp.path());
        file.write_blob(b"blob").unwrap();
        let mode = fs::metadata(file.vault_path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
