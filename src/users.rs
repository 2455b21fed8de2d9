use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;
use snafu::{Location, ResultExt as _, Snafu};
use tracing::instrument;

use crate::model::{today, AdminUser, NewUser, Role, UserId, UserPatch};

const SEED: &str = include_str!("../data/users.json");
const DEFAULT_AVATAR: &str = "/placeholder.svg?height=100&width=100";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum UserError {
    #[snafu(display("failed to parse the seed users at {location}: {source}"))]
    ParseUsers {
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleFilter {
    #[default]
    All,
    #[serde(untagged)]
    Only(Role),
}

impl RoleFilter {
    pub fn matches(self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(only) => only == role,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserQuery {
    pub search: Option<String>,
    pub role: RoleFilter,
}

impl UserQuery {
    /// Matches `search` against name and email, ignoring case.
    pub fn matches(&self, user: &AdminUser) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(search) => {
                let search = search.to_lowercase();
                user.name.to_lowercase().contains(&search) || user.email.to_lowercase().contains(&search)
            }
        };

        matches_search && self.role.matches(user.role)
    }
}

/// Accounts that may sign in to the admin area.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Arc<DashMap<UserId, AdminUser>>,
    next_id: Arc<AtomicU64>,
}

impl UserDirectory {
    pub fn new(users: impl IntoIterator<Item = AdminUser>) -> Self {
        let users: DashMap<_, _> = users.into_iter().map(|user| (user.id, user)).collect();
        let next_id = users.iter().map(|entry| entry.key().0).max().unwrap_or(0) + 1;

        Self {
            users: Arc::new(users),
            next_id: Arc::new(AtomicU64::new(next_id)),
        }
    }

    /// The bundled demo accounts.
    pub fn seeded() -> Result<Self, UserError> {
        let users: Vec<AdminUser> = serde_json::from_str(SEED).context(ParseUsersSnafu)?;
        Ok(Self::new(users))
    }

    /// Matching users ordered by id.
    pub fn list(&self, query: &UserQuery) -> Vec<AdminUser> {
        let mut users: Vec<_> = self
            .users
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        users.sort_by_key(|user| user.id);
        users
    }

    pub fn get(&self, id: UserId) -> Option<AdminUser> {
        self.users.get(&id).map(|user| user.clone())
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    pub fn add(&self, user: NewUser) -> AdminUser {
        let id = UserId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let today = today();

        let user = AdminUser {
            id,
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
            join_date: today,
            last_active: today,
            avatar: DEFAULT_AVATAR.to_string(),
        };

        tracing::info!("added user `{}`", id);
        self.users.insert(id, user.clone());
        user
    }

    #[instrument(skip(self, patch))]
    pub fn update(&self, id: UserId, patch: UserPatch) -> Option<AdminUser> {
        let mut user = self.users.get_mut(&id)?;
        patch.apply(&mut user);

        tracing::info!("updated user `{}`", id);
        Some(user.clone())
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: UserId) -> bool {
        let deleted = self.users.remove(&id).is_some();

        if deleted {
            tracing::info!("deleted user `{}`", id);
        }

        deleted
    }
}
