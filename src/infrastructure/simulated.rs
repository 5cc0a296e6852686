use crate::domain::ports::AccountLookup;
use crate::domain::recipient::Bank;
use async_trait::async_trait;
use std::time::Duration;

/// Account lookup that waits a fixed delay and always resolves to the same
/// canned holder name. No bank is ever contacted.
#[derive(Debug, Clone)]
pub struct SimulatedAccountLookup {
    delay: Duration,
    name: String,
}

impl SimulatedAccountLookup {
    pub fn new(delay: Duration, name: impl Into<String>) -> Self {
        Self {
            delay,
            name: name.into(),
        }
    }
}

#[async_trait]
impl AccountLookup for SimulatedAccountLookup {
    async fn account_name(&self, bank: Option<Bank>, account_number: &str) -> String {
        tracing::debug!(?bank, account_number, delay = ?self.delay, "simulated account lookup");
        tokio::time::sleep(self.delay).await;
        self.name.clone()
    }
}
