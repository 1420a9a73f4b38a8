//! Authentication adapters.
//!
//! Implementations of the `AuthSessionProvider` port:
//!
//! - `mock` - In-memory provider for tests and offline demos
//! - `supabase` - Supabase GoTrue REST client

mod mock;
mod supabase;

pub use mock::MockAuthSessionProvider;
pub use supabase::{SupabaseAuthProvider, SupabaseConfig};
