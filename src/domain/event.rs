use serde::Deserialize;

/// A user interaction on one of the checkout pages.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PayAmount,
    ReceiveAmount,
    PayCurrency,
    ReceiveCurrency,
    PayFrom,
    PayTo,
    Convert,
    Bank,
    AccountNumber,
    Email,
    Country,
    Phone,
    Next,
    Back,
    /// Let simulated time pass; `value` is in milliseconds.
    Wait,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct UiEvent {
    pub event: EventKind,
    #[serde(default)]
    pub value: Option<String>,
}

impl UiEvent {
    pub fn new(event: EventKind, value: impl Into<String>) -> Self {
        Self {
            event,
            value: Some(value.into()),
        }
    }

    pub fn bare(event: EventKind) -> Self {
        Self { event, value: None }
    }

    /// The event's value; a missing value reads as an empty input.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}
