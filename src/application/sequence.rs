use crate::error::Result;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;

/// Proof that an operation was the latest one issued for its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic request counter for one logical field.
///
/// Issuing a new ticket supersedes every earlier one; a completion may only
/// commit while its ticket is still current (last-edit-wins).
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: Arc<AtomicU64>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Supersedes anything in flight without scheduling new work.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// A scheduled simulated operation.
///
/// Dropping it leaves the operation running; awaiting it waits for the
/// completion handler, whether or not it ended up committing.
#[derive(Debug)]
pub struct Pending {
    handle: JoinHandle<()>,
}

impl Pending {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn finished(self) -> Result<()> {
        self.handle.await?;
        Ok(())
    }
}
