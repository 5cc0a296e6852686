#![allow(dead_code)]

use checkout_flow::application::conversion::ConversionEngine;
use checkout_flow::application::recipient::RecipientIntake;
use checkout_flow::config::{CheckoutConfig, Delays};
use checkout_flow::domain::currency::{CryptoCurrency, FiatCurrency};
use checkout_flow::domain::rates::{RateEntry, RateTable};
use checkout_flow::domain::recipient::Bank;
use checkout_flow::infrastructure::in_memory::RecordingRouter;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

pub fn router() -> Arc<RecordingRouter> {
    Arc::new(RecordingRouter::new())
}

pub fn rate(crypto: CryptoCurrency, fiat: FiatCurrency, rate: Decimal) -> RateEntry {
    RateEntry { crypto, fiat, rate }
}

pub fn conversion_engine(rates: RateTable) -> (ConversionEngine, Arc<RecordingRouter>) {
    let router = router();
    let engine = ConversionEngine::new(rates, Delays::default(), router.clone());
    (engine, router)
}

pub fn default_conversion_engine() -> (ConversionEngine, Arc<RecordingRouter>) {
    conversion_engine(CheckoutConfig::default().rate_table())
}

pub fn recipient_intake() -> (RecipientIntake, Arc<RecordingRouter>) {
    let router = router();
    let intake = RecipientIntake::from_config(&CheckoutConfig::default(), router.clone())
        .expect("default config is valid");
    (intake, router)
}

/// Fills and verifies the bank step, leaving the flow ready to advance.
pub async fn complete_bank_details(intake: &RecipientIntake) {
    intake.select_bank(Some(Bank::GtBank)).await.unwrap();
    if let Some(pending) = intake.edit_account_number("1234567890").await.unwrap() {
        pending.finished().await.unwrap();
    }
}

pub async fn elapse(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
