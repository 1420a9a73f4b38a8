//! Account handlers.

mod account_data;

pub use account_data::AccountDataHandler;
