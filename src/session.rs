//! Session and authentication gate.
//!
//! One state machine per program run: `AwaitingCredentials → Authenticated`,
//! with the transition firing only on a successful credential check. There
//! is no expiry and no logout; the authenticated session lives for the rest
//! of the process and is passed explicitly into every operation that needs
//! authorization.

use tracing::debug;

use crate::credential::CredentialStore;
use crate::error::Result;

/// The authenticated identity bound for the remainder of one program run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    name: String,
    admin: bool,
}

impl Session {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this session may invoke admin-gated operations
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

/// Login state machine
#[derive(Debug)]
pub enum AuthGate {
    AwaitingCredentials,
    Authenticated(Session),
}

impl AuthGate {
    pub fn new() -> Self {
        AuthGate::AwaitingCredentials
    }

    /// Attempt the `AwaitingCredentials → Authenticated` transition.
    ///
    /// On failure the gate stays awaiting and the caller re-prompts; the
    /// error distinguishes an unknown name from a wrong secret.
    pub fn login(
        &mut self,
        users: &CredentialStore,
        admin_name: &str,
        name: &str,
        secret: &str,
    ) -> Result<Session> {
        let identity = users.authenticate(name, secret)?;

        let session = Session {
            name: identity.name.clone(),
            admin: identity.name == admin_name,
        };
        debug!(name = %session.name, admin = session.admin, "login successful");
        *self = AuthGate::Authenticated(session.clone());
        Ok(session)
    }

    /// The authenticated session, if the transition has fired
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthGate::Authenticated(session) => Some(session),
            AuthGate::AwaitingCredentials => None,
        }
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}
