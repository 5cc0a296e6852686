use super::recipient::Bank;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Pages the flow can send the user to.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum Route {
    #[serde(rename = "/recipient-details")]
    RecipientDetails,
    #[serde(rename = "/confirmation")]
    Confirmation,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::RecipientDetails => "/recipient-details",
            Self::Confirmation => "/confirmation",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Page navigation, owned by the presentation layer.
///
/// The flows call this exactly once per terminal transition and never look
/// at routing internals.
#[async_trait]
pub trait Router: Send + Sync {
    async fn navigate_to(&self, route: Route);
    async fn navigate_back(&self);
}

/// Resolves the holder name of a bank account.
#[async_trait]
pub trait AccountLookup: Send + Sync {
    async fn account_name(&self, bank: Option<Bank>, account_number: &str) -> String;
}

pub type RouterHandle = Arc<dyn Router>;
pub type AccountLookupHandle = Arc<dyn AccountLookup>;
