//! Profile cache populated from the auth service

use crate::{
    config::StorageKeys,
    host::{SessionStore, Tier},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User identifier as sent by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(id) => write!(f, "{id}"),
            UserId::Text(id) => f.write_str(id),
        }
    }
}

/// Response of `POST /api/auth/validate`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub valid: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl ProfileResponse {
    /// Write the present, non-empty fields to the durable tier
    ///
    /// Returns the number of fields written. Invalid responses write nothing.
    pub fn apply_to(&self, store: &dyn SessionStore) -> usize {
        if !self.valid {
            return 0;
        }

        let user_id = self.user_id.as_ref().map(UserId::to_string);
        let fields = [
            (StorageKeys::USER_NAME, self.name.as_deref()),
            (StorageKeys::USER_EMAIL, self.email.as_deref()),
            (StorageKeys::USER_ID, user_id.as_deref()),
        ];

        let mut written = 0;
        for (key, value) in fields {
            let Some(value) = value.filter(|v| !v.is_empty()) else {
                continue;
            };
            match store.set(Tier::Durable, key, value) {
                Ok(()) => written += 1,
                Err(e) => tracing::warn!(key, error = %e, "Failed to cache profile field"),
            }
        }
        written
    }
}

/// Remove cached profile fields from the durable tier
pub fn clear_profile(store: &dyn SessionStore) {
    for key in StorageKeys::PROFILE_KEYS {
        if let Err(e) = store.remove(Tier::Durable, key) {
            tracing::warn!(key, error = %e, "Failed to clear profile field");
        }
    }
}
