//! The `Credential` record stored under each site.
//!
//! The label is serialized as `account_name` and omitted when absent, so
//! a decrypted vault reads as:
//!
//! ```json
//! {"gmail": [{"username": "juan@work.com", "password": "...", "account_name": "work"}]}
//! ```

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One username/password pair (plus optional label) under a site.
///
/// Two credentials under the same site are duplicates when their
/// `(username, account_label)` pair is equal.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    pub username: String,

    pub password: String,

    #[serde(
        rename = "account_name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub account_label: Option<String>,
}

impl Credential {
    pub fn new(username: &str, password: &str, account_label: Option<&str>) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            account_label: normalize_label(account_label).map(str::to_string),
        }
    }

    /// Returns `true` if this credential has the given duplicate identity.
    pub fn same_identity(&self, username: &str, account_label: Option<&str>) -> bool {
        self.username == username && self.account_label.as_deref() == account_label
    }

    /// Returns `true` if `identifier` equals the username or the label.
    pub fn matches(&self, identifier: &str) -> bool {
        self.username == identifier || self.account_label.as_deref() == Some(identifier)
    }

    /// "user (label)" or just "user"; never includes the password.
    pub fn display_name(&self) -> String {
        display_name(&self.username, self.account_label.as_deref())
    }

    /// Metadata view without the secret.
    pub fn summary(&self) -> CredentialSummary {
        CredentialSummary {
            username: self.username.clone(),
            account_label: self.account_label.clone(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("account_label", &self.account_label)
            .finish()
    }
}

/// Lightweight metadata about a credential (no password).
///
/// Returned by `VaultSession::list` so callers can display what is
/// stored without handling any secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSummary {
    pub username: String,
    pub account_label: Option<String>,
}

/// "user (label)" or just "user".
pub fn display_name(username: &str, account_label: Option<&str>) -> String {
    match normalize_label(account_label) {
        Some(label) => format!("{username} ({label})"),
        None => username.to_string(),
    }
}

/// Empty labels are treated as "no label".
pub(crate) fn normalize_label(label: Option<&str>) -> Option<&str> {
    label.filter(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_serializes_as_account_name() {
        let cred = Credential::new("alice", "pw", Some("home"));
        let json = serde_json::to_string(&cred).unwrap();
        assert_eq!(
            json,
            r#"{"username":"alice","password":"pw","account_name":"home"}"#
        );
    }

    #[test]
    fn missing_label_is_omitted() {
        let cred = Credential::new("alice", "pw", None);
        let json = serde_json::to_string(&cred).unwrap();
        assert!(!json.contains("account_name"));

        let back: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(back.account_label, None);
    }

    #[test]
    fn empty_label_becomes_none() {
        let cred = Credential::new("alice", "pw", Some(""));
        assert_eq!(cred.account_label, None);
    }

    #[test]
    fn matches_username_or_label() {
        let cred = Credential::new("u1", "pw", Some("work"));
        assert!(cred.matches("u1"));
        assert!(cred.matches("work"));
        assert!(!cred.matches("pw"));
    }

    #[test]
    fn debug_hides_password() {
        let cred = Credential::new("alice", "hunter22", None);
        let dbg = format!("{cred:?}");
        assert!(!dbg.contains("hunter22"));
        assert!(dbg.contains("alice"));
    }
}
