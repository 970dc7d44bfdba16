//! Credential store: identities permitted to log in and be assigned tasks.
//!
//! Backed by a flat file with one `name;secret` line per identity. The file
//! is loaded once at startup and fully rewritten on every registration.

use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::Storage;

const FIELD_SEPARATOR: char = ';';

/// A registered username/secret pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub secret: String,
}

/// In-memory credential store with flat-file persistence
///
/// Identities keep their insertion order; names are unique and
/// case-sensitive. Identities are never deleted.
#[derive(Debug)]
pub struct CredentialStore {
    storage: Storage,
    identities: Vec<Identity>,
}

impl CredentialStore {
    /// Load the store from its backing artifact.
    ///
    /// If the artifact is absent, it is seeded with the given default
    /// identity and persisted before returning. A line without exactly one
    /// separator fails the whole load.
    pub fn load(storage: Storage, seed_name: &str, seed_secret: &str) -> Result<Self> {
        let path = storage.user_file();
        if !path.exists() {
            debug!(path = %path.display(), "seeding credential artifact");
            let seeded = Identity {
                name: seed_name.to_string(),
                secret: seed_secret.to_string(),
            };
            let store = Self {
                storage,
                identities: vec![seeded],
            };
            store.save()?;
            return Ok(store);
        }

        let lines = storage.read_lines(&path)?;
        let mut identities = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            identities.push(parse_line(line).ok_or_else(|| Error::MalformedLine {
                path: path.clone(),
                line: idx + 1,
                reason: format!("expected exactly one '{FIELD_SEPARATOR}' separator"),
            })?);
        }

        debug!(count = identities.len(), "loaded credential store");
        Ok(Self {
            storage,
            identities,
        })
    }

    /// Register a new identity and rewrite the backing artifact.
    ///
    /// Fails without mutation if the name is already taken.
    pub fn register(&mut self, name: &str, secret: &str) -> Result<()> {
        if self.contains(name) {
            return Err(Error::DuplicateUser(name.to_string()));
        }

        self.identities.push(Identity {
            name: name.to_string(),
            secret: secret.to_string(),
        });
        self.save()?;
        debug!(name, "registered identity");
        Ok(())
    }

    /// Validate a login attempt.
    ///
    /// Distinguishes an unknown name from a wrong secret so the login loop
    /// can report each case; the loop retries indefinitely on either.
    pub fn authenticate(&self, name: &str, secret: &str) -> Result<&Identity> {
        let identity = self
            .identities
            .iter()
            .find(|identity| identity.name == name)
            .ok_or_else(|| Error::UnknownUser(name.to_string()))?;

        if identity.secret != secret {
            return Err(Error::WrongPassword(name.to_string()));
        }

        Ok(identity)
    }

    /// Whether an identity with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.identities.iter().any(|identity| identity.name == name)
    }

    /// Registered names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.identities.iter().map(|identity| identity.name.as_str())
    }

    /// Number of registered identities
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    fn save(&self) -> Result<()> {
        let lines: Vec<String> = self
            .identities
            .iter()
            .map(|identity| format!("{}{}{}", identity.name, FIELD_SEPARATOR, identity.secret))
            .collect();
        self.storage.write_lines(&self.storage.user_file(), &lines)
    }
}

fn parse_line(line: &str) -> Option<Identity> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    match fields.as_slice() {
        [name, secret] => Some(Identity {
            name: name.to_string(),
            secret: secret.to_string(),
        }),
        _ => None,
    }
}
