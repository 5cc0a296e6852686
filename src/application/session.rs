use super::conversion::{ConversionEngine, ConversionState};
use super::recipient::{BackOutcome, RecipientIntake, RecipientIntakeState};
use super::sequence::Pending;
use crate::config::CheckoutConfig;
use crate::domain::currency::parse_selection;
use crate::domain::event::{EventKind, UiEvent};
use crate::domain::ports::RouterHandle;
use crate::error::{CheckoutError, Result};
use serde::Serialize;
use std::time::Duration;

/// State of both pages at one point in time.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct SessionSnapshot {
    pub conversion: ConversionState,
    pub recipient: Option<RecipientIntakeState>,
}

/// One user's pass through the checkout: the conversion page plus, once
/// entered, a recipient flow.
///
/// The recipient flow is created on the first recipient-page event and
/// discarded when the user backs out of it.
pub struct CheckoutSession {
    config: CheckoutConfig,
    router: RouterHandle,
    conversion: ConversionEngine,
    recipient: Option<RecipientIntake>,
    pending: Vec<Pending>,
}

impl CheckoutSession {
    pub fn new(config: CheckoutConfig, router: RouterHandle) -> Self {
        let conversion = ConversionEngine::from_config(&config, router.clone());
        Self {
            config,
            router,
            conversion,
            recipient: None,
            pending: Vec::new(),
        }
    }

    pub fn conversion(&self) -> &ConversionEngine {
        &self.conversion
    }

    pub fn recipient(&self) -> Option<&RecipientIntake> {
        self.recipient.as_ref()
    }

    /// Scheduled operations that have not been awaited or pruned yet.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Feeds one UI event into the flow it belongs to.
    ///
    /// Simulated work the event schedules keeps running in the background;
    /// [`CheckoutSession::settle`] waits for all of it. Handles of work that
    /// already finished are dropped on every call.
    pub async fn apply(&mut self, event: &UiEvent) -> Result<()> {
        tracing::debug!(event = ?event.event, value = event.value(), "applying event");
        self.pending.retain(|pending| !pending.is_finished());
        let value = event.value();

        match event.event {
            EventKind::PayAmount => {
                let pending = self.conversion.on_pay_amount_edited(value).await?;
                self.pending.push(pending);
            }
            EventKind::ReceiveAmount => {
                let pending = self.conversion.on_receive_amount_edited(value).await?;
                self.pending.push(pending);
            }
            EventKind::PayCurrency => {
                self.conversion.on_pay_currency_changed(value.parse()?).await?;
            }
            EventKind::ReceiveCurrency => {
                self.conversion
                    .on_receive_currency_changed(value.parse()?)
                    .await?;
            }
            EventKind::PayFrom => {
                self.conversion.select_pay_from(parse_selection(value)?).await?;
            }
            EventKind::PayTo => {
                self.conversion.select_pay_to(parse_selection(value)?).await?;
            }
            EventKind::Convert => {
                let state = self.conversion.snapshot().await;
                let pending = self
                    .conversion
                    .attempt_proceed(state.pay_from, state.pay_to)
                    .await?;
                self.pending.push(pending);
            }
            EventKind::Bank => {
                let recipient = recipient_flow(&mut self.recipient, &self.config, &self.router)?;
                recipient.select_bank(parse_selection(value)?).await?;
            }
            EventKind::AccountNumber => {
                let recipient = recipient_flow(&mut self.recipient, &self.config, &self.router)?;
                if let Some(pending) = recipient.edit_account_number(value).await? {
                    self.pending.push(pending);
                }
            }
            EventKind::Email => {
                let recipient = recipient_flow(&mut self.recipient, &self.config, &self.router)?;
                recipient.edit_email(value).await?;
            }
            EventKind::Country => {
                let recipient = recipient_flow(&mut self.recipient, &self.config, &self.router)?;
                recipient.select_country(value).await?;
            }
            EventKind::Phone => {
                let recipient = recipient_flow(&mut self.recipient, &self.config, &self.router)?;
                recipient.edit_local_number(value).await?;
            }
            EventKind::Next => {
                let recipient = recipient_flow(&mut self.recipient, &self.config, &self.router)?;
                let pending = recipient.advance().await?;
                self.pending.push(pending);
            }
            EventKind::Back => {
                let outcome = match &self.recipient {
                    Some(recipient) => Some(recipient.back().await?),
                    None => None,
                };
                match outcome {
                    Some(BackOutcome::LeftFlow) => {
                        tracing::info!("left recipient flow");
                        self.recipient = None;
                    }
                    Some(BackOutcome::PreviousStep) => {}
                    None => self.router.navigate_back().await,
                }
            }
            EventKind::Wait => {
                let ms: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| CheckoutError::unknown("wait duration", value))?;
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
        }
        Ok(())
    }

    /// Waits for every simulated operation scheduled so far.
    pub async fn settle(&mut self) -> Result<()> {
        for pending in self.pending.drain(..) {
            pending.finished().await?;
        }
        Ok(())
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let recipient = match &self.recipient {
            Some(recipient) => Some(recipient.snapshot().await),
            None => None,
        };
        SessionSnapshot {
            conversion: self.conversion.snapshot().await,
            recipient,
        }
    }
}

/// The live recipient flow, created fresh if the user is just entering it.
fn recipient_flow<'a>(
    slot: &'a mut Option<RecipientIntake>,
    config: &CheckoutConfig,
    router: &RouterHandle,
) -> Result<&'a RecipientIntake> {
    let recipient = match slot.take() {
        Some(recipient) => recipient,
        None => {
            tracing::info!("entering recipient flow");
            RecipientIntake::from_config(config, router.clone())?
        }
    };
    Ok(slot.insert(recipient))
}
