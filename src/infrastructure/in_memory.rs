use crate::domain::ports::{Route, Router};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One call the flows made on the router.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(tag = "action", content = "route", rename_all = "lowercase")]
pub enum Navigation {
    To(Route),
    Back,
}

/// A router that only records what it was asked to do.
///
/// Uses `Arc<RwLock<Vec<Navigation>>>` so clones share one log. Stands in for
/// the presentation layer in tests and scripted runs.
#[derive(Debug, Default, Clone)]
pub struct RecordingRouter {
    log: Arc<RwLock<Vec<Navigation>>>,
}

impl RecordingRouter {
    /// Creates a router with an empty navigation log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every navigation so far, oldest first.
    pub async fn navigations(&self) -> Vec<Navigation> {
        self.log.read().await.clone()
    }

    /// Forward navigations only.
    pub async fn routes(&self) -> Vec<Route> {
        self.log
            .read()
            .await
            .iter()
            .filter_map(|n| match n {
                Navigation::To(route) => Some(*route),
                Navigation::Back => None,
            })
            .collect()
    }

    pub async fn back_count(&self) -> usize {
        self.log
            .read()
            .await
            .iter()
            .filter(|n| **n == Navigation::Back)
            .count()
    }
}

#[async_trait]
impl Router for RecordingRouter {
    async fn navigate_to(&self, route: Route) {
        tracing::info!(%route, "navigate");
        self.log.write().await.push(Navigation::To(route));
    }

    async fn navigate_back(&self) {
        tracing::info!("navigate back");
        self.log.write().await.push(Navigation::Back);
    }
}
