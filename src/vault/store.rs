//! In-memory credential store.
//!
//! `VaultStore` holds the decrypted vault: a mapping from site to an
//! ordered list of credentials.  Sites keep their insertion order and so
//! does each site's list; both orders survive `to_bytes`/`from_bytes`.
//!
//! The store never touches disk or keys.  `VaultSession` encrypts
//! `to_bytes()` and hands the result to `VaultFile`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::errors::{CerberoError, Result};

use super::credential::{normalize_label, Credential};

/// Result of `VaultStore::add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new credential was appended.
    Added,
    /// An existing `(username, label)` entry had its password replaced.
    Updated,
}

/// All credentials stored under one site.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SiteEntry {
    site: String,
    credentials: Vec<Credential>,
}

/// The decrypted vault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultStore {
    sites: Vec<SiteEntry>,
    dirty: bool,
}

impl VaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Add a credential, or replace the password of the entry with the
    /// same `(username, label)` under `site`.
    pub fn add(
        &mut self,
        site: &str,
        username: &str,
        password: &str,
        account_label: Option<&str>,
    ) -> Result<AddOutcome> {
        validate_field("site", site)?;
        validate_field("username", username)?;
        validate_field("password", password)?;
        let account_label = normalize_label(account_label);

        let outcome = match self.site_index(site) {
            Some(idx) => {
                let credentials = &mut self.sites[idx].credentials;
                match credentials
                    .iter_mut()
                    .find(|c| c.same_identity(username, account_label))
                {
                    Some(existing) => {
                        existing.password.zeroize();
                        existing.password = password.to_string();
                        AddOutcome::Updated
                    }
                    None => {
                        credentials.push(Credential::new(username, password, account_label));
                        AddOutcome::Added
                    }
                }
            }
            None => {
                self.sites.push(SiteEntry {
                    site: site.to_string(),
                    credentials: vec![Credential::new(username, password, account_label)],
                });
                AddOutcome::Added
            }
        };

        self.dirty = true;
        Ok(outcome)
    }

    /// Returns `true` if `site` already holds this `(username, label)` pair.
    pub fn contains(&self, site: &str, username: &str, account_label: Option<&str>) -> bool {
        let account_label = normalize_label(account_label);
        self.credentials(site)
            .iter()
            .any(|c| c.same_identity(username, account_label))
    }

    /// Credentials under `site` matching `identifier` (username or label).
    ///
    /// With no identifier, every credential of the site is returned.
    pub fn find(&self, site: &str, identifier: Option<&str>) -> Vec<&Credential> {
        self.credentials(site)
            .iter()
            .filter(|c| identifier.map_or(true, |id| c.matches(id)))
            .collect()
    }

    /// Remove the first credential under `site` matching `identifier`.
    ///
    /// This does no disambiguation; interactive callers resolve first
    /// and use `remove_at`.
    pub fn remove(&mut self, site: &str, identifier: Option<&str>) -> Result<Credential> {
        let index = self
            .credentials(site)
            .iter()
            .position(|c| identifier.map_or(true, |id| c.matches(id)))
            .ok_or_else(|| not_found(site, identifier))?;
        self.remove_at(site, index)
    }

    /// Remove the credential at `index` in `site`'s list.
    ///
    /// The site itself is dropped once its list is empty.
    pub fn remove_at(&mut self, site: &str, index: usize) -> Result<Credential> {
        let site_idx = self
            .site_index(site)
            .ok_or_else(|| not_found(site, None))?;

        let credentials = &mut self.sites[site_idx].credentials;
        if index >= credentials.len() {
            return Err(CerberoError::NotFound(format!(
                "'{site}' entry #{}",
                index + 1
            )));
        }

        let removed = credentials.remove(index);
        if credentials.is_empty() {
            self.sites.remove(site_idx);
        }

        self.dirty = true;
        Ok(removed)
    }

    /// Credentials stored under `site`, in insertion order.
    pub fn credentials(&self, site: &str) -> &[Credential] {
        match self.site_index(site) {
            Some(idx) => &self.sites[idx].credentials,
            None => &[],
        }
    }

    /// Every site with its credentials, in insertion order.
    pub fn list(&self) -> Vec<(&str, &[Credential])> {
        self.sites
            .iter()
            .map(|e| (e.site.as_str(), e.credentials.as_slice()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn credential_count(&self) -> usize {
        self.sites.iter().map(|e| e.credentials.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Returns `true` if the store changed since it was loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Serialize the vault to JSON bytes (the cipher's plaintext).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CerberoError::Serialization(format!("vault: {e}")))
    }

    /// Rebuild a store from the bytes produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| CerberoError::Serialization(format!("vault: {e}")))
    }

    fn site_index(&self, site: &str) -> Option<usize> {
        self.sites.iter().position(|e| e.site == site)
    }
}

fn validate_field(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CerberoError::InvalidInput(format!("{name} cannot be empty")));
    }
    Ok(())
}

pub(crate) fn not_found(site: &str, identifier: Option<&str>) -> CerberoError {
    match identifier {
        Some(id) => CerberoError::NotFound(format!("'{id}' in '{site}'")),
        None => CerberoError::NotFound(format!("'{site}'")),
    }
}

// ---------------------------------------------------------------------------
// Serde: the vault is a JSON object of site -> [credential, ...]
// ---------------------------------------------------------------------------

impl Serialize for VaultStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sites.len()))?;
        for entry in &self.sites {
            map.serialize_entry(&entry.site, &entry.credentials)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for VaultStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(VaultVisitor)
    }
}

struct VaultVisitor;

impl<'de> Visitor<'de> for VaultVisitor {
    type Value = VaultStore;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of site names to credential lists")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut store = VaultStore::new();
        while let Some((site, credentials)) = access.next_entry::<String, Vec<Credential>>()? {
            // Sites with no credentials are never kept.
            if credentials.is_empty() {
                continue;
            }
            match store.site_index(&site) {
                Some(idx) => store.sites[idx].credentials.extend(credentials),
                None => store.sites.push(SiteEntry { site, credentials }),
            }
        }
        Ok(store)
    }
}
