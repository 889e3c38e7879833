//! Credential checking for the mock login

use crate::core::identity::RecordId;
use crate::core::policy::Role;
use crate::core::session::Identity;

/// Checks a username/secret pair and yields the matching identity
pub trait CredentialVerifier {
    /// The identity for an exact, case-sensitive match, without its secret
    fn verify(&self, username: &str, secret: &str) -> Option<Identity>;
}

#[derive(Debug, Clone)]
struct Credential {
    secret: String,
    identity: Identity,
}

/// Fixed in-memory credential table
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    entries: Vec<Credential>,
}

impl StaticCredentials {
    /// An empty table; nobody can log in
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with(mut self, secret: impl Into<String>, identity: Identity) -> Self {
        self.entries.push(Credential {
            secret: secret.into(),
            identity,
        });
        self
    }

    /// Usernames in the table, in order
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.identity.username.as_str())
    }
}

impl Default for StaticCredentials {
    /// The demo accounts: one per role
    fn default() -> Self {
        let identity = |id, name: &str, username: &str, role, phone: &str, address: &str| Identity {
            id: RecordId::new(id),
            name: name.to_string(),
            username: username.to_string(),
            role,
            phone: phone.to_string(),
            address: address.to_string(),
        };

        Self::empty()
            .with(
                "admin123",
                identity(
                    1,
                    "Admin User",
                    "admin",
                    Role::Administrator,
                    "+1-555-0100",
                    "123 Admin St, HQ",
                ),
            )
            .with(
                "eng123",
                identity(
                    2,
                    "John Engineer",
                    "engineer",
                    Role::Engineer,
                    "+1-555-0101",
                    "456 Tech Ave",
                ),
            )
            .with(
                "op123",
                identity(
                    3,
                    "Jane Operator",
                    "operator",
                    Role::Operator,
                    "+1-555-0102",
                    "789 Factory Rd",
                ),
            )
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, secret: &str) -> Option<Identity> {
        self.entries
            .iter()
            .find(|c| c.identity.username == username && c.secret == secret)
            .map(|c| c.identity.clone())
    }
}
