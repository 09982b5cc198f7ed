//! Session identity and role gating.
//!
//! The session is an explicit value handed to every ledger operation. Mutating
//! operations call [`Session::require_manager`] before touching the store.

use crate::{
    config::users::{AccountConfig, find_account},
    errors::{Error, Result},
    models::{Role, User},
    store::{KvStore, USER_KEY},
};
use tracing::{info, warn};

/// Name logged for rejected actions when no user is logged in.
const UNKNOWN_ACTOR: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }

    #[must_use]
    pub const fn for_user(user: User) -> Self {
        Self { user: Some(user) }
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// True when a user is logged in and holds one of `roles`.
    #[must_use]
    pub fn has_permission(&self, roles: &[Role]) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| roles.contains(&user.role))
    }

    /// Returns the acting user when they hold one of `roles`.
    ///
    /// # Errors
    /// Returns [`Error::PermissionDenied`] naming `action` otherwise. An anonymous
    /// session is rejected the same way.
    pub fn require(&self, roles: &[Role], action: &str) -> Result<&User> {
        match self.user.as_ref() {
            Some(user) if roles.contains(&user.role) => Ok(user),
            other => {
                warn!(
                    "Rejected `{}` for {}",
                    action,
                    other.map_or(UNKNOWN_ACTOR, |u| u.name.as_str())
                );
                Err(Error::permission(action))
            }
        }
    }

    /// Single policy check used by every mutating ledger operation.
    pub fn require_manager(&self, action: &str) -> Result<&User> {
        self.require(&[Role::Manager], action)
    }
}

/// Logs in with an exact email and password match and persists the identity.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] when no account matches; nothing is written.
pub async fn login<S: KvStore>(
    store: &S,
    accounts: &[AccountConfig],
    email: &str,
    password: &str,
) -> Result<Session> {
    let Some(account) = find_account(accounts, email, password) else {
        warn!("Login failed for {}", email);
        return Err(Error::InvalidCredentials);
    };

    let user = account.to_user();
    store.set(USER_KEY, serde_json::to_string(&user)?).await?;
    info!("Welcome back, {}!", user.name);
    Ok(Session::for_user(user))
}

/// Clears the session and forgets the persisted identity.
pub async fn logout<S: KvStore>(store: &S, session: &mut Session) -> Result<()> {
    store.remove(USER_KEY).await?;
    if let Some(user) = session.user.take() {
        info!("{} logged out", user.name);
    }
    Ok(())
}

/// Restores the persisted identity. A malformed entry is removed and the
/// session starts anonymous.
pub async fn restore_session<S: KvStore>(store: &S) -> Result<Session> {
    let Some(raw) = store.get(USER_KEY).await? else {
        return Ok(Session::anonymous());
    };

    match serde_json::from_str::<User>(&raw) {
        Ok(user) => Ok(Session::for_user(user)),
        Err(e) => {
            warn!("Failed to parse stored user, clearing it: {}", e);
            store.remove(USER_KEY).await?;
            Ok(Session::anonymous())
        }
    }
}
