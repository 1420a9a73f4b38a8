//! In-Memory Identity Store Adapter
//!
//! Holds the user snapshot in memory. Useful for testing and for hosts
//! without a writable filesystem.

use std::sync::RwLock;

use crate::domain::foundation::StorageError;
use crate::domain::user::User;
use crate::ports::LocalIdentityStore;

/// In-memory identity slot.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    slot: RwLock<Option<User>>,
    /// Simulates an undecodable record on load.
    corrupt: RwLock<bool>,
    save_count: RwLock<usize>,
}

impl InMemoryIdentityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `user`
    pub fn with_user(user: User) -> Self {
        Self {
            slot: RwLock::new(Some(user)),
            ..Self::default()
        }
    }

    /// Make subsequent loads fail as if the record were malformed
    pub fn mark_corrupt(&self) {
        if let Ok(mut corrupt) = self.corrupt.write() {
            *corrupt = true;
        }
    }

    /// Current record without going through the port
    pub fn snapshot(&self) -> Option<User> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count.read().map(|count| *count).unwrap_or(0)
    }
}

fn poisoned() -> StorageError {
    StorageError::Io("identity store lock poisoned".to_string())
}

impl LocalIdentityStore for InMemoryIdentityStore {
    fn load(&self) -> Result<Option<User>, StorageError> {
        if *self.corrupt.read().map_err(|_| poisoned())? {
            return Err(StorageError::Data("corrupt identity record".to_string()));
        }
        Ok(self.slot.read().map_err(|_| poisoned())?.clone())
    }

    fn save(&self, user: &User) -> Result<(), StorageError> {
        *self.slot.write().map_err(|_| poisoned())? = Some(user.clone());
        *self.corrupt.write().map_err(|_| poisoned())? = false;
        *self.save_count.write().map_err(|_| poisoned())? += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.write().map_err(|_| poisoned())? = None;
        *self.corrupt.write().map_err(|_| poisoned())? = false;
        Ok(())
    }
}
