//! User registry. Users carry chat-platform identities and live independently
//! of any board; board and task deletes never cascade into them.

use super::Store;
use crate::error::{StoreError, StoreResult};
use crate::types::{UpdateUserRequest, UpsertUserRequest, User};
use tracing::debug;

impl Store {
    /// Register a user, or refresh an existing one in place. Fields omitted
    /// from the request keep their stored values on refresh and fall back to
    /// defaults on first registration.
    pub fn upsert_user(&self, req: UpsertUserRequest) -> StoreResult<User> {
        self.with_inner_mut(|inner| {
            if req.id.trim().is_empty() {
                return Err(StoreError::validation("id", "must not be empty"));
            }
            inner.validate_name("username", &req.username)?;

            let user = match inner.users.get(&req.id) {
                Some(existing) => User {
                    id: req.id.clone(),
                    username: req.username,
                    role: req.role.unwrap_or(existing.role),
                    permissions: req.permissions.unwrap_or_else(|| existing.permissions.clone()),
                    preferences: req.preferences.unwrap_or_else(|| existing.preferences.clone()),
                },
                None => User {
                    id: req.id.clone(),
                    username: req.username,
                    role: req.role.unwrap_or_default(),
                    permissions: req.permissions.unwrap_or_default(),
                    preferences: req.preferences.unwrap_or_default(),
                },
            };

            inner.users.insert(req.id.clone(), user.clone());
            debug!(user_id = %req.id, "user upserted");
            Ok(user)
        })
    }

    /// Apply a patch to a user. `None` fields are left untouched.
    pub fn update_user(&self, user_id: &str, patch: UpdateUserRequest) -> StoreResult<User> {
        self.with_inner_mut(|inner| {
            if let Some(username) = &patch.username {
                inner.validate_name("username", username)?;
            }
            let user = inner
                .users
                .get_mut(user_id)
                .ok_or_else(|| StoreError::user_not_found(user_id))?;

            if let Some(username) = patch.username {
                user.username = username;
            }
            if let Some(role) = patch.role {
                user.role = role;
            }
            if let Some(permissions) = patch.permissions {
                user.permissions = permissions;
            }
            if let Some(preferences) = patch.preferences {
                user.preferences = preferences;
            }
            Ok(user.clone())
        })
    }

    /// Remove a user from the registry. Board memberships and task
    /// assignments keep the dangling id; query projections filter it.
    pub fn remove_user(&self, user_id: &str) -> StoreResult<()> {
        self.with_inner_mut(|inner| {
            if inner.users.remove(user_id).is_none() {
                return Err(StoreError::user_not_found(user_id));
            }
            debug!(user_id, "user removed");
            Ok(())
        })
    }
}
