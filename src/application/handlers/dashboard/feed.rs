//! DashboardFeed - Observable dashboard state for one user.
//!
//! Wraps a `DashboardAggregator` and publishes each refresh on a `watch`
//! channel. While a refresh is running the previous data stays visible.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::dashboard::{DashboardSource, DashboardView};
use crate::domain::foundation::UserId;

use super::DashboardAggregator;

/// What observers of the dashboard see.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub data: Option<DashboardView>,
    pub is_loading: bool,
    /// Origin of `data`, when there is any.
    pub source: Option<DashboardSource>,
}

pub struct DashboardFeed {
    aggregator: Arc<DashboardAggregator>,
    user_id: Option<UserId>,
    state: watch::Sender<DashboardSnapshot>,
}

impl DashboardFeed {
    /// A feed for `user_id`. Without a user the feed stays empty.
    pub fn new(aggregator: Arc<DashboardAggregator>, user_id: Option<UserId>) -> Self {
        let (state, _) = watch::channel(DashboardSnapshot::default());
        Self {
            aggregator,
            user_id,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state.borrow().clone()
    }

    /// Re-aggregates and publishes the result.
    pub async fn refresh(&self) {
        let Some(user_id) = self.user_id.as_ref() else {
            return;
        };

        self.state.send_modify(|state| state.is_loading = true);

        let data = self.aggregator.get_dashboard(user_id).await;
        let source = data.as_ref().map(|view| view.source);
        tracing::debug!(%user_id, ?source, "Dashboard refreshed");

        self.state.send_replace(DashboardSnapshot {
            data,
            is_loading: false,
            source,
        });
    }
}
