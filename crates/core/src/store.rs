//! In-memory session store

use crate::{
    Result,
    host::{SessionStore, Tier},
};
use std::cell::RefCell;
use std::collections::HashMap;

/// Session store held in memory
///
/// Used off-browser and in tests. [`MemoryStore::close_tab`] drops the
/// volatile tier the way a browser does when the tab closes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<(Tier, String), String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every volatile entry
    pub fn close_tab(&self) {
        self.entries
            .borrow_mut()
            .retain(|(tier, _), _| *tier == Tier::Durable);
    }

    /// Whether no tier holds any entry
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Number of entries across both tiers
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, tier: Tier, key: &str) -> Option<String> {
        self.entries.borrow().get(&(tier, key.to_string())).cloned()
    }

    fn set(&self, tier: Tier, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert((tier, key.to_string()), value.to_string());
        Ok(())
    }

    fn remove(&self, tier: Tier, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(&(tier, key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_independent() {
        let store = MemoryStore::new();
        store.set(Tier::Durable, "authToken", "durable").unwrap();
        store.set(Tier::Volatile, "authToken", "volatile").unwrap();

        assert_eq!(store.get(Tier::Durable, "authToken").as_deref(), Some("durable"));
        assert_eq!(store.get(Tier::Volatile, "authToken").as_deref(), Some("volatile"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_close_tab_drops_volatile_tier() {
        let store = MemoryStore::new();
        store.set(Tier::Durable, "authToken", "kept").unwrap();
        store.set(Tier::Volatile, "authToken", "dropped").unwrap();

        store.close_tab();

        assert_eq!(store.get(Tier::Durable, "authToken").as_deref(), Some("kept"));
        assert_eq!(store.get(Tier::Volatile, "authToken"), None);
    }

    #[test]
    fn test_remove_missing_key_succeeds() {
        let store = MemoryStore::new();
        assert!(store.remove(Tier::Volatile, "jwtToken").is_ok());
        assert!(store.is_empty());
    }
}
