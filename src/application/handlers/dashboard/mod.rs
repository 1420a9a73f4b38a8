//! Dashboard query handlers.
//!
//! Read-only handlers for aggregating and viewing dashboard data.

mod aggregator;
mod feed;

pub use aggregator::DashboardAggregator;
pub use feed::{DashboardFeed, DashboardSnapshot};
