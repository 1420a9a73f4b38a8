//! Local identity store port - durable snapshot of the current user.
//!
//! Local persistence is synchronous and treated as always available; there
//! is no retry policy. At most one record is held.

use crate::domain::foundation::StorageError;
use crate::domain::user::User;

/// Durable local key-value slot holding one serialized `User`.
pub trait LocalIdentityStore: Send + Sync {
    /// Loads the persisted user.
    ///
    /// # Errors
    ///
    /// `StorageError::Data` when a record exists but cannot be decoded;
    /// callers treat that as absence.
    fn load(&self) -> Result<Option<User>, StorageError>;

    /// Overwrites the slot with `user`.
    fn save(&self, user: &User) -> Result<(), StorageError>;

    /// Removes the record. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}
