use super::describe;
use portal_auth_core::{Error, Result, SessionStore, Tier};
use web_sys::{Storage, Window};

/// `localStorage` (durable) and `sessionStorage` (volatile)
///
/// Either tier may be missing, e.g. when storage is disabled by the user.
/// Reads from and removals in a missing tier succeed trivially; writes fail.
pub struct BrowserStore {
    local: Option<Storage>,
    session: Option<Storage>,
}

impl BrowserStore {
    pub fn new(window: &Window) -> Self {
        Self {
            local: window.local_storage().ok().flatten(),
            session: window.session_storage().ok().flatten(),
        }
    }

    fn tier(&self, tier: Tier) -> Result<&Storage> {
        match tier {
            Tier::Durable => self.local.as_ref().ok_or(Error::Unavailable("localStorage")),
            Tier::Volatile => self
                .session
                .as_ref()
                .ok_or(Error::Unavailable("sessionStorage")),
        }
    }
}

impl SessionStore for BrowserStore {
    fn get(&self, tier: Tier, key: &str) -> Option<String> {
        self.tier(tier).ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, tier: Tier, key: &str, value: &str) -> Result<()> {
        self.tier(tier)?
            .set_item(key, value)
            .map_err(|e| Error::storage(format!("Failed to write {key}: {}", describe(&e))))
    }

    fn remove(&self, tier: Tier, key: &str) -> Result<()> {
        // Nothing is stored in a missing tier
        let Ok(storage) = self.tier(tier) else {
            return Ok(());
        };
        storage
            .remove_item(key)
            .map_err(|e| Error::storage(format!("Failed to remove {key}: {}", describe(&e))))
    }
}
