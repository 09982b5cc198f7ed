//! Staff account configuration for the session login.
//!
//! Accounts come from the `[[accounts]]` table of config.toml. The built-in
//! demo accounts cover one user per role.

use crate::models::{Role, User};
use serde::Deserialize;

/// A login account. The password never leaves this struct: [`AccountConfig::to_user`]
/// strips it before the identity is stored in a session.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub bar_id: Option<String>,
}

impl AccountConfig {
    #[must_use]
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            bar_id: self.bar_id.clone(),
        }
    }
}

/// Demo accounts used when config.toml does not define any.
#[must_use]
pub fn default_accounts() -> Vec<AccountConfig> {
    let account = |id: &str, name: &str, email: &str, password: &str, role: Role, bar_id: Option<&str>| {
        AccountConfig {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
            bar_id: bar_id.map(str::to_string),
        }
    };

    vec![
        account("1", "John Manager", "manager@hotel.com", "manager123", Role::Manager, None),
        account(
            "2",
            "Alice Bartender",
            "bartender@hotel.com",
            "bartender123",
            Role::Bartender,
            Some("1"),
        ),
        account(
            "3",
            "Bob Inventory",
            "inventory@hotel.com",
            "inventory123",
            Role::InventoryStaff,
            None,
        ),
    ]
}

/// Finds the account matching both email and password exactly.
#[must_use]
pub fn find_account<'a>(
    accounts: &'a [AccountConfig],
    email: &str,
    password: &str,
) -> Option<&'a AccountConfig> {
    accounts
        .iter()
        .find(|a| a.email == email && a.password == password)
}
