// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User lookup for running jobs under another identity

use nix::unistd::{Uid, User};
use thiserror::Error;

/// Errors from resolving a user
#[derive(Debug, Error)]
pub enum UserError {
    #[error("unknown user: {0}")]
    NotFound(String),

    #[error("failed to look up user {name}: {source}")]
    Lookup { name: String, source: nix::Error },
}

/// Resolved numeric identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
}

impl From<User> for UserIdentity {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            uid: user.uid.as_raw(),
            gid: user.gid.as_raw(),
        }
    }
}

/// Resolve a user name (or numeric uid) through the system user database,
/// so NSS sources such as LDAP or sssd are honored.
///
/// A numeric name with no database entry resolves to that uid with an
/// equal gid.
pub fn resolve_user(name: &str) -> Result<UserIdentity, UserError> {
    let lookup_err = |source| UserError::Lookup {
        name: name.to_string(),
        source,
    };

    if let Some(user) = User::from_name(name).map_err(lookup_err)? {
        return Ok(user.into());
    }

    let Ok(uid) = name.parse::<u32>() else {
        return Err(UserError::NotFound(name.to_string()));
    };
    match User::from_uid(Uid::from_raw(uid)).map_err(lookup_err)? {
        Some(user) => Ok(user.into()),
        None => Ok(UserIdentity {
            name: name.to_string(),
            uid,
            gid: uid,
        }),
    }
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
