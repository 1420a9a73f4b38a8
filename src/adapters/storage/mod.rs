//! Local storage adapters
//!
//! Implementations of the `LocalIdentityStore` and `LocalSeriesStore` ports:
//! - `FileIdentityStore` / `FileSeriesStore`: JSON files on disk
//! - `InMemoryIdentityStore` / `InMemorySeriesStore`: in-memory (testing)

mod file_identity_store;
mod file_series_store;
mod in_memory_identity_store;
mod in_memory_series_store;

pub use file_identity_store::FileIdentityStore;
pub(crate) use file_identity_store::write_atomically;
pub use file_series_store::FileSeriesStore;
pub use in_memory_identity_store::InMemoryIdentityStore;
pub use in_memory_series_store::InMemorySeriesStore;
