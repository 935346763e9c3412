//! Account → role policy.
//!
//! Every account identity is classified through a static [`RoleTable`]. The
//! resulting [`SessionContext`] travels explicitly with each service call; the
//! database grants of the account stay the authoritative enforcement.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Viewer,
    Employee,
    Supervisor,
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "Viewer",
            Role::Employee => "Employee",
            Role::Supervisor => "Supervisor",
            Role::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True only for supervisors.
pub fn can_mutate(role: Role) -> bool {
    matches!(role, Role::Supervisor)
}

#[derive(Debug, Error)]
pub enum RoleTableError {
    #[error("failed to read role table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid role table {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Static identity → role lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTable {
    accounts: HashMap<String, Role>,
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::from_entries([
            ("app_user", Role::Viewer),
            ("tanisha", Role::Viewer),
            ("bhoomika", Role::Viewer),
            ("app_employee", Role::Employee),
            ("app_supervisor", Role::Supervisor),
            ("root", Role::Supervisor),
        ])
    }
}

impl RoleTable {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Role)>,
        S: Into<String>,
    {
        Self {
            accounts: entries.into_iter().map(|(id, role)| (id.into(), role)).collect(),
        }
    }

    /// Parse a YAML document of the form `accounts: { app_user: Viewer, ... }`.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RoleTableError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let source = std::fs::read_to_string(path).map_err(|source| RoleTableError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_yaml(&source).map_err(|source| RoleTableError::Parse { path: display, source })
    }

    /// Built-in table unless a roles file is configured.
    pub fn from_config(path: Option<&str>) -> Result<Self, RoleTableError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Unlisted identities resolve to [`Role::Unknown`].
    pub fn resolve(&self, identity: &str) -> Role {
        self.accounts.get(identity).copied().unwrap_or(Role::Unknown)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Request-scoped identity of one client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub identity: String,
    pub role: Role,
}

impl SessionContext {
    pub fn new(identity: impl Into<String>, role: Role) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            identity: identity.into(),
            role,
        }
    }

    pub fn can_mutate(&self) -> bool {
        can_mutate(self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_supervisor_can_mutate() {
        assert!(can_mutate(Role::Supervisor));
        assert!(!can_mutate(Role::Employee));
        assert!(!can_mutate(Role::Viewer));
        assert!(!can_mutate(Role::Unknown));
    }

    #[test]
    fn default_table_classifies_known_accounts() {
        let table = RoleTable::default();
        assert_eq!(table.resolve("app_user"), Role::Viewer);
        assert_eq!(table.resolve("bhoomika"), Role::Viewer);
        assert_eq!(table.resolve("app_employee"), Role::Employee);
        assert_eq!(table.resolve("app_supervisor"), Role::Supervisor);
        assert_eq!(table.resolve("root"), Role::Supervisor);
    }

    #[test]
    fn unlisted_identity_is_unknown_and_read_only() {
        let table = RoleTable::default();
        let role = table.resolve("mallory");
        assert_eq!(role, Role::Unknown);

        let ctx = SessionContext::new("mallory", role);
        assert!(!ctx.can_mutate());
    }

    #[test]
    fn identity_lookup_is_exact() {
        let table = RoleTable::default();
        assert_eq!(table.resolve("ROOT"), Role::Unknown);
        assert_eq!(table.resolve(" root"), Role::Unknown);
    }

    #[test]
    fn yaml_table_replaces_defaults() {
        let table = RoleTable::from_yaml(
            "accounts:\n  ops_lead: Supervisor\n  intern: Viewer\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("ops_lead"), Role::Supervisor);
        assert_eq!(table.resolve("intern"), Role::Viewer);
        assert_eq!(table.resolve("root"), Role::Unknown);
    }

    #[test]
    fn yaml_table_rejects_unknown_roles() {
        assert!(RoleTable::from_yaml("accounts:\n  someone: Admin\n").is_err());
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let a = SessionContext::new("root", Role::Supervisor);
        let b = SessionContext::new("root", Role::Supervisor);
        assert_ne!(a.session_id, b.session_id);
    }
}
