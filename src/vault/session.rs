//! The vault session: who holds the key and the decrypted credentials.
//!
//! ```text
//! Uninitialized --setup--> Unlocked --lock--> Locked
//!       Configured --unlock--> Unlocked      Locked --unlock--> Unlocked
//! ```
//!
//! A failed unlock leaves the state where it was, so the caller may
//! retry.  Credential operations are only valid while `Unlocked` and fail
//! with `VaultLocked` otherwise.  Every successful mutation re-encrypts
//! the whole vault and replaces the blob on disk.

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::{decrypt, derive_master_key, encrypt, generate_salt, MasterKey};
use crate::errors::{CerberoError, Result};

use super::collab::Prompter;
use super::credential::{display_name, Credential, CredentialSummary};
use super::file::VaultFile;
use super::resolver::{choose, resolve};
use super::store::{not_found, AddOutcome, VaultStore};

/// Minimum master password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Observable lifecycle state of a `VaultSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No salt/blob on disk yet.
    Uninitialized,
    /// Vault files exist; nothing unlocked in this session.
    Configured,
    /// Key and decrypted vault are held in memory.
    Unlocked,
    /// Was unlocked, key and vault have been dropped.
    Locked,
}

struct Unlocked {
    key: MasterKey,
    store: VaultStore,
}

enum Inner {
    Uninitialized,
    Configured,
    Locked,
    Unlocked(Unlocked),
}

/// A single-user session over one vault on disk.
pub struct VaultSession {
    file: VaultFile,
    inner: Inner,
}

impl VaultSession {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start a session over `file`.  Nothing is read yet.
    pub fn open(file: VaultFile) -> Self {
        let inner = if file.is_configured() {
            Inner::Configured
        } else {
            Inner::Uninitialized
        };
        Self { file, inner }
    }

    pub fn state(&self) -> SessionState {
        match self.inner {
            Inner::Uninitialized => SessionState::Uninitialized,
            Inner::Configured => SessionState::Configured,
            Inner::Locked => SessionState::Locked,
            Inner::Unlocked(_) => SessionState::Unlocked,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.inner, Inner::Unlocked(_))
    }

    pub fn file(&self) -> &VaultFile {
        &self.file
    }

    /// Create a new, empty vault protected by `password`.
    ///
    /// Existing vault files are only replaced when `overwrite` is set;
    /// otherwise this fails with `AlreadyExists`.  On success the session
    /// is unlocked on the new vault.  A failed write drops any previously
    /// unlocked key: it must never seal a blob under a different salt.
    pub fn setup(&mut self, password: &str, overwrite: bool) -> Result<()> {
        validate_master_password(password)?;

        let salt = generate_salt();
        let key = derive_master_key(password.as_bytes(), &salt)?;
        let store = VaultStore::new();

        let plaintext = Zeroizing::new(store.to_bytes()?);
        let blob = encrypt(key.as_bytes(), &plaintext)?;

        match self.file.initialize(&salt, &blob, overwrite) {
            Ok(()) => {}
            Err(e @ CerberoError::AlreadyExists(_)) => return Err(e),
            Err(e) => {
                warn!(error = %e, "vault setup failed");
                self.inner = if self.file.is_configured() {
                    Inner::Configured
                } else {
                    Inner::Uninitialized
                };
                return Err(e);
            }
        }

        self.inner = Inner::Unlocked(Unlocked { key, store });
        info!(path = %self.file.vault_path().display(), "vault created");
        Ok(())
    }

    /// Derive the key from `password` and decrypt the vault.
    ///
    /// Wrong password and damaged blob both surface as
    /// `AuthenticationFailure`; the state is left unchanged.
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        let salt = self.file.read_salt()?;
        let blob = self.file.read_blob()?;

        if matches!(self.inner, Inner::Uninitialized) {
            self.inner = Inner::Configured;
        }

        let key = derive_master_key(password.as_bytes(), &salt)?;
        let plaintext = match decrypt(key.as_bytes(), &blob) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(e) => {
                warn!("vault unlock failed");
                return Err(e);
            }
        };

        // A blob that authenticates but does not parse is reported the
        // same way as a bad tag.
        let store = VaultStore::from_bytes(&plaintext).map_err(|_| {
            warn!("vault decrypted but could not be decoded");
            CerberoError::AuthenticationFailure
        })?;

        debug!(
            sites = store.site_count(),
            credentials = store.credential_count(),
            "vault unlocked"
        );
        self.inner = Inner::Unlocked(Unlocked { key, store });
        Ok(())
    }

    /// Drop the key and decrypted vault.
    pub fn lock(&mut self) {
        if self.is_unlocked() {
            self.inner = Inner::Locked;
            debug!("vault locked");
        }
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Store a credential.
    ///
    /// When `(username, label)` already exists under `site`, the prompter
    /// is asked before the password is replaced; declining yields
    /// `Ok(None)` and leaves the vault untouched.
    pub fn add(
        &mut self,
        site: &str,
        username: &str,
        password: &str,
        account_label: Option<&str>,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<AddOutcome>> {
        let (file, unlocked) = self.parts()?;

        if unlocked.store.contains(site, username, account_label) {
            let who = display_name(username, account_label);
            let confirmed = prompter.confirm(&format!(
                "A credential for '{who}' already exists in '{site}'. Overwrite it?"
            ))?;
            if !confirmed {
                return Ok(None);
            }
        }

        let outcome = unlocked.mutate(file, |store| {
            store.add(site, username, password, account_label)
        })?;
        debug!(site = %site, ?outcome, "credential stored");
        Ok(Some(outcome))
    }

    /// Look up one credential, asking the prompter to choose when the
    /// site/identifier pair is ambiguous.  `Ok(None)` means cancelled.
    pub fn get(
        &self,
        site: &str,
        identifier: Option<&str>,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<Credential>> {
        let store = self.store()?;
        let credentials = store.credentials(site);

        let index = pick(site, credentials, identifier, prompter)?;
        Ok(index.map(|i| credentials[i].clone()))
    }

    /// All sites with their credentials' usernames and labels.
    pub fn list(&self) -> Result<Vec<(String, Vec<CredentialSummary>)>> {
        let store = self.store()?;
        Ok(store
            .list()
            .into_iter()
            .map(|(site, creds)| {
                (
                    site.to_string(),
                    creds.iter().map(Credential::summary).collect(),
                )
            })
            .collect())
    }

    /// Delete one credential.
    ///
    /// Resolves like `get`, then asks for confirmation unless `force`.
    /// Returns the removed credential, or `None` if the user backed out.
    pub fn delete(
        &mut self,
        site: &str,
        identifier: Option<&str>,
        prompter: &mut dyn Prompter,
        force: bool,
    ) -> Result<Option<Credential>> {
        let (file, unlocked) = self.parts()?;
        let credentials = unlocked.store.credentials(site);

        let Some(index) = pick(site, credentials, identifier, prompter)? else {
            return Ok(None);
        };

        if !force {
            let who = credentials[index].display_name();
            let confirmed =
                prompter.confirm(&format!("Delete credential '{who}' from '{site}'?"))?;
            if !confirmed {
                return Ok(None);
            }
        }

        let removed = unlocked.mutate(file, |store| store.remove_at(site, index))?;
        debug!(site = %site, "credential deleted");
        Ok(Some(removed))
    }

    /// Read-only access to the decrypted vault.
    pub fn store(&self) -> Result<&VaultStore> {
        match &self.inner {
            Inner::Unlocked(u) => Ok(&u.store),
            _ => Err(CerberoError::VaultLocked),
        }
    }

    fn parts(&mut self) -> Result<(&VaultFile, &mut Unlocked)> {
        match &mut self.inner {
            Inner::Unlocked(u) => Ok((&self.file, u)),
            _ => Err(CerberoError::VaultLocked),
        }
    }
}

impl Unlocked {
    /// Apply `op` to the store and persist the result.
    ///
    /// If encryption or the write fails, the in-memory store is rolled
    /// back so memory and disk keep agreeing.
    fn mutate<T>(
        &mut self,
        file: &VaultFile,
        op: impl FnOnce(&mut VaultStore) -> Result<T>,
    ) -> Result<T> {
        let snapshot = self.store.clone();
        let value = op(&mut self.store)?;

        if let Err(e) = self.persist(file) {
            self.store = snapshot;
            return Err(e);
        }
        Ok(value)
    }

    fn persist(&mut self, file: &VaultFile) -> Result<()> {
        if !self.store.is_dirty() {
            return Ok(());
        }
        let plaintext = Zeroizing::new(self.store.to_bytes()?);
        let blob = encrypt(self.key.as_bytes(), &plaintext)?;
        file.write_blob(&blob)?;
        self.store.mark_clean();
        Ok(())
    }
}

/// Resolve and, if needed, prompt for one credential of `site`.
fn pick(
    site: &str,
    credentials: &[Credential],
    identifier: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<Option<usize>> {
    let resolution = resolve(credentials, identifier).map_err(|e| match e {
        CerberoError::NotFound(_) if credentials.is_empty() => not_found(site, None),
        CerberoError::NotFound(_) => not_found(site, identifier),
        other => other,
    })?;

    choose(
        resolution,
        credentials,
        &format!("Multiple accounts found for '{site}'. Select one"),
        prompter,
    )
}

/// Reject master passwords shorter than `MIN_PASSWORD_LEN` characters.
pub fn validate_master_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CerberoError::InvalidInput(format!(
            "master password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::collab::ScriptedPrompter;
    use tempfile::TempDir;

    fn fresh() -> (TempDir, VaultSession) {
        let tmp = TempDir::new().unwrap();
        let session = VaultSession::open(VaultFile::in_dir(tmp.path()));
        (tmp, session)
    }

    #[test]
    fn new_directory_is_uninitialized() {
        let (_tmp, session) = fresh();
        assert_eq!(session.state(), SessionState::Uninitialized);
    }

    #[test]
    fn operations_require_unlock() {
        let (_tmp, mut session) = fresh();
        let mut p = ScriptedPrompter::new();
        assert!(matches!(
            session.add("s", "u", "p", None, &mut p),
            Err(CerberoError::VaultLocked)
        ));
        assert!(matches!(
            session.get("s", None, &mut p),
            Err(CerberoError::VaultLocked)
        ));
        assert!(matches!(session.list(), Err(CerberoError::VaultLocked)));
        assert!(matches!(
            session.delete("s", None, &mut p, true),
            Err(CerberoError::VaultLocked)
        ));
        assert_eq!(p.prompts(), 0);
    }

    #[test]
    fn unlock_before_setup_is_not_configured() {
        let (_tmp, mut session) = fresh();
        assert!(matches!(
            session.unlock("longenough1"),
            Err(CerberoError::NotConfigured(_))
        ));
        assert_eq!(session.state(), SessionState::Uninitialized);
    }

    #[test]
    fn short_master_password_is_rejected() {
        let (_tmp, mut session) = fresh();
        assert!(matches!(
            session.setup("short", false),
            Err(CerberoError::InvalidInput(_))
        ));
        assert!(!session.file().exists_any());
    }

    #[test]
    fn setup_without_overwrite_keeps_existing_vault() {
        let (_tmp, mut session) = fresh();
        session.setup("longenough1", false).unwrap();
        let salt = session.file().read_salt().unwrap();

        assert!(matches!(
            session.setup("longenough2", false),
            Err(CerberoError::AlreadyExists(_))
        ));
        assert!(session.is_unlocked());
        assert_eq!(session.file().read_salt().unwrap(), salt);
    }

    #[test]
    fn lock_is_noop_when_not_unlocked() {
        let (_tmp, mut session) = fresh();
        session.lock();
        assert_eq!(session.state(), SessionState::Uninitialized);
    }
}
