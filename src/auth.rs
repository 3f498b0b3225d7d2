// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Credential service.
//!
//! Sits outside the accounting core: the engine takes [`UserId`]s and never
//! authenticates anyone. [`UserDirectory`] is the built-in provider,
//! persisting users through the same record store as the ledger
//! collections. Passwords are stored as salted SHA-256 digests.

use crate::base::UserId;
use crate::error::AuthError;
use crate::record::{Keyed, next_id};
use crate::store::{RecordKind, RecordStore};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

impl Keyed for User {
    fn key(&self) -> u32 {
        self.id.0
    }
}

/// Pluggable authentication capability.
///
/// Implementations own credential storage and verification; callers only
/// ever see a [`UserId`] or a rejection.
pub trait AuthenticationProvider {
    /// Registers a new user, returning the assigned id.
    fn register(&self, email: &str, password: &str) -> Result<UserId, AuthError>;

    /// Verifies credentials, returning the user's id.
    fn authenticate(&self, email: &str, password: &str) -> Result<UserId, AuthError>;
}

/// Store-backed user directory.
pub struct UserDirectory<S: RecordStore> {
    store: S,
    users: Mutex<Vec<User>>,
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex(&hasher.finalize())
}

impl<S: RecordStore> UserDirectory<S> {
    /// Creates a directory over `store`, loading the user collection.
    pub fn new(store: S) -> Self {
        let users = store.load(RecordKind::Users);
        UserDirectory {
            store,
            users: Mutex::new(users),
        }
    }

    /// Looks up a user by id.
    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.lock().iter().find(|u| u.id == id).cloned()
    }
}

impl<S: RecordStore> AuthenticationProvider for UserDirectory<S> {
    fn register(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let mut users = self.users.lock();

        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let salt = hex(&rand::random::<[u8; 16]>());
        let id = UserId(next_id(&users).0);
        users.push(User {
            id,
            email: email.to_string(),
            password_hash: hash_password(password, &salt),
            salt,
            created_at: Utc::now(),
        });

        self.store.save(RecordKind::Users, &users).map_err(|e| {
            tracing::error!(error = %e, "user collection not persisted");
            AuthError::Store(e)
        })?;

        tracing::info!(%id, "user registered");
        Ok(id)
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let users = self.users.lock();

        let user = users
            .iter()
            .find(|u| u.email == email)
            .ok_or(AuthError::InvalidCredentials)?;

        if hash_password(password, &user.salt) != user.password_hash {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn register_then_authenticate() {
        let store = MemoryStore::new();
        let directory = UserDirectory::new(&store);

        let id = directory.register("ada@example.com", "hunter2").unwrap();
        assert_eq!(id, UserId(1));

        let back = directory.authenticate("ada@example.com", "hunter2").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn duplicate_email_rejected() {
        let store = MemoryStore::new();
        let directory = UserDirectory::new(&store);

        directory.register("ada@example.com", "hunter2").unwrap();
        let result = directory.register("ada@example.com", "other");
        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }

    #[test]
    fn wrong_password_rejected() {
        let store = MemoryStore::new();
        let directory = UserDirectory::new(&store);

        directory.register("ada@example.com", "hunter2").unwrap();
        let result = directory.authenticate("ada@example.com", "wrong");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        let unknown = directory.authenticate("ghost@example.com", "hunter2");
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn user_ids_are_sequential() {
        let store = MemoryStore::new();
        let directory = UserDirectory::new(&store);

        assert_eq!(directory.register("a@x.com", "p").unwrap(), UserId(1));
        assert_eq!(directory.register("b@x.com", "p").unwrap(), UserId(2));
        assert_eq!(directory.register("c@x.com", "p").unwrap(), UserId(3));
    }

    #[test]
    fn users_survive_reconstruction() {
        let store = MemoryStore::new();
        let id = {
            let directory = UserDirectory::new(&store);
            directory.register("ada@example.com", "hunter2").unwrap()
        };

        let directory = UserDirectory::new(&store);
        let back = directory.authenticate("ada@example.com", "hunter2").unwrap();
        assert_eq!(back, id);
        assert_eq!(directory.user(id).unwrap().email, "ada@example.com");
    }

    #[test]
    fn salts_differ_between_users() {
        let store = MemoryStore::new();
        let directory = UserDirectory::new(&store);

        let a = directory.register("a@x.com", "same-password").unwrap();
        let b = directory.register("b@x.com", "same-password").unwrap();

        let ua = directory.user(a).unwrap();
        let ub = directory.user(b).unwrap();
        assert_ne!(ua.salt, ub.salt);
        assert_ne!(ua.password_hash, ub.password_hash);
    }
}
