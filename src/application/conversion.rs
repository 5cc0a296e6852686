use super::sequence::{Pending, RequestSequence, Ticket};
use crate::config::{CheckoutConfig, Delays};
use crate::domain::amount::{CRYPTO_DECIMALS, FIAT_DECIMALS, format_fixed, parse_amount};
use crate::domain::currency::{CryptoCurrency, FiatCurrency, Wallet};
use crate::domain::fields::{Field, FieldErrors, FieldView};
use crate::domain::ports::{Route, RouterHandle};
use crate::domain::rates::RateTable;
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

/// Amount shown on the pay side when the page opens.
pub const INITIAL_PAY_AMOUNT: &str = "1.00";

/// Everything the conversion page renders.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ConversionState {
    pub pay_amount: String,
    pub receive_amount: String,
    pub pay_currency: CryptoCurrency,
    pub receive_currency: FiatCurrency,
    pub is_calculating: bool,
    pub pay_from: Option<Wallet>,
    pub pay_to: Option<Wallet>,
    pub errors: FieldErrors,
    pub is_converting: bool,
}

impl ConversionState {
    pub fn is_convert_disabled(&self) -> bool {
        self.is_converting
    }

    /// Inputs are locked for as long as a conversion is running.
    fn ensure_editable(&self) -> Result<()> {
        if self.is_converting {
            return Err(CheckoutError::Busy("conversion in progress"));
        }
        Ok(())
    }

    /// Renderer input for a field on this page, `None` for fields that
    /// belong to the recipient flow.
    pub fn field_view(&self, field: Field) -> Option<FieldView> {
        let wallet = |w: Option<Wallet>| w.map(|w| w.label().to_string()).unwrap_or_default();
        let view = match field {
            Field::PayAmount => FieldView::new(&self.pay_amount, &self.errors, field),
            Field::ReceiveAmount => FieldView::new(&self.receive_amount, &self.errors, field),
            Field::PayFrom => FieldView::new(wallet(self.pay_from), &self.errors, field),
            Field::PayTo => FieldView::new(wallet(self.pay_to), &self.errors, field),
            _ => return None,
        };
        Some(view.disabled(self.is_converting))
    }
}

/// Keeps the pay and receive amounts consistent under a static rate.
///
/// Every amount edit takes effect on the edited side immediately and
/// schedules a simulated recalculation of the opposite side. Both sides share
/// one request sequence, so only the most recent edit's recalculation ever
/// commits.
pub struct ConversionEngine {
    state: Arc<RwLock<ConversionState>>,
    rates: Arc<RateTable>,
    delays: Delays,
    router: RouterHandle,
    recalculation: RequestSequence,
}

impl ConversionEngine {
    /// Creates the engine with the initial amount already converted.
    ///
    /// # Arguments
    ///
    /// * `rates` - The static rate table.
    /// * `delays` - Simulated operation lengths.
    /// * `router` - Receives the navigation once conversion succeeds.
    pub fn new(rates: RateTable, delays: Delays, router: RouterHandle) -> Self {
        let pay_currency = CryptoCurrency::default();
        let receive_currency = FiatCurrency::default();
        let receive_amount = convert_forward(
            &rates,
            INITIAL_PAY_AMOUNT,
            pay_currency,
            receive_currency,
        );

        Self {
            state: Arc::new(RwLock::new(ConversionState {
                pay_amount: INITIAL_PAY_AMOUNT.to_string(),
                receive_amount,
                pay_currency,
                receive_currency,
                is_calculating: false,
                pay_from: None,
                pay_to: None,
                errors: FieldErrors::new(),
                is_converting: false,
            })),
            rates: Arc::new(rates),
            delays,
            router,
            recalculation: RequestSequence::new(),
        }
    }

    /// Builds the engine from the configured rates and delays.
    pub fn from_config(config: &CheckoutConfig, router: RouterHandle) -> Self {
        Self::new(config.rate_table(), config.delays, router)
    }

    /// A copy of the current page state.
    pub async fn snapshot(&self) -> ConversionState {
        self.state.read().await.clone()
    }

    /// Takes the pay amount as typed and schedules the receive side's
    /// recalculation, superseding any recalculation still in flight.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::Busy`] while a conversion is running.
    pub async fn on_pay_amount_edited(&self, value: &str) -> Result<Pending> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        let ticket = self.recalculation.issue();
        state.pay_amount = value.to_string();
        state.is_calculating = true;

        let receive = convert_forward(
            &self.rates,
            value,
            state.pay_currency,
            state.receive_currency,
        );
        tracing::debug!(value, %receive, "pay amount edited");
        drop(state);

        Ok(self.commit_after(ticket, move |state| state.receive_amount = receive))
    }

    /// Mirror of [`ConversionEngine::on_pay_amount_edited`] for the receive
    /// side; the pay amount is recalculated through the inverse rate.
    pub async fn on_receive_amount_edited(&self, value: &str) -> Result<Pending> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        let ticket = self.recalculation.issue();
        state.receive_amount = value.to_string();
        state.is_calculating = true;

        let pay = convert_inverse(
            &self.rates,
            value,
            state.pay_currency,
            state.receive_currency,
        );
        tracing::debug!(value, %pay, "receive amount edited");
        drop(state);

        Ok(self.commit_after(ticket, move |state| state.pay_amount = pay))
    }

    /// Switches the pay currency. Amounts are left as they are until the
    /// next amount edit.
    pub async fn on_pay_currency_changed(&self, currency: CryptoCurrency) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        state.pay_currency = currency;
        tracing::debug!(%currency, "pay currency changed");
        Ok(())
    }

    /// Switches the receive currency. Amounts are left as they are until the
    /// next amount edit.
    pub async fn on_receive_currency_changed(&self, currency: FiatCurrency) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        state.receive_currency = currency;
        tracing::debug!(%currency, "receive currency changed");
        Ok(())
    }

    /// Picks (or clears) the wallet to pay from and drops its error.
    pub async fn select_pay_from(&self, wallet: Option<Wallet>) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        state.pay_from = wallet;
        state.errors.clear(Field::PayFrom);
        Ok(())
    }

    /// Picks (or clears) the wallet to pay to and drops its error.
    pub async fn select_pay_to(&self, wallet: Option<Wallet>) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        state.pay_to = wallet;
        state.errors.clear(Field::PayTo);
        Ok(())
    }

    /// Validates the wallet selections and starts the simulated conversion.
    ///
    /// On success the returned task navigates to the recipient page once the
    /// conversion delay has elapsed.
    #[instrument(skip(self))]
    pub async fn attempt_proceed(
        &self,
        pay_from: Option<Wallet>,
        pay_to: Option<Wallet>,
    ) -> Result<Pending> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;

        state.pay_from = pay_from;
        state.pay_to = pay_to;
        let errors = validate_wallets(pay_from, pay_to);
        if !errors.is_empty() {
            tracing::warn!(%errors, "conversion rejected");
            state.errors = errors.clone();
            return Err(CheckoutError::Validation(errors));
        }

        state.errors.clear_all();
        state.is_converting = true;
        drop(state);

        let state = Arc::clone(&self.state);
        let router = Arc::clone(&self.router);
        let delay = self.delays.conversion();
        Ok(Pending::spawn(async move {
            tokio::time::sleep(delay).await;
            state.write().await.is_converting = false;
            tracing::info!(route = %Route::RecipientDetails, "conversion complete");
            router.navigate_to(Route::RecipientDetails).await;
        }))
    }

    fn commit_after<F>(&self, ticket: Ticket, apply: F) -> Pending
    where
        F: FnOnce(&mut ConversionState) + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let sequence = self.recalculation.clone();
        let delay = self.delays.recalculation();
        Pending::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.write().await;
            if !sequence.is_current(ticket) {
                tracing::debug!("superseded recalculation discarded");
                return;
            }
            apply(&mut *state);
            state.is_calculating = false;
        })
    }
}

/// `round(amount * rate, 2)`; a missing pair converts to zero.
pub fn convert_forward(
    rates: &RateTable,
    amount: &str,
    crypto: CryptoCurrency,
    fiat: FiatCurrency,
) -> String {
    let value = parse_amount(amount)
        .checked_mul(rates.forward(crypto, fiat))
        .unwrap_or(Decimal::ZERO);
    format_fixed(value, FIAT_DECIMALS)
}

/// `round(amount / rate, 4)`; a missing pair divides by one.
pub fn convert_inverse(
    rates: &RateTable,
    amount: &str,
    crypto: CryptoCurrency,
    fiat: FiatCurrency,
) -> String {
    let value = parse_amount(amount)
        .checked_div(rates.inverse_divisor(crypto, fiat))
        .unwrap_or(Decimal::ZERO);
    format_fixed(value, CRYPTO_DECIMALS)
}

fn validate_wallets(pay_from: Option<Wallet>, pay_to: Option<Wallet>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if pay_from.is_none() {
        errors.insert(Field::PayFrom, "Please select a wallet to pay from");
    }
    if pay_to.is_none() {
        errors.insert(Field::PayTo, "Please select a wallet to pay to");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rates::RateEntry;
    use crate::infrastructure::in_memory::{Navigation, RecordingRouter};
    use rust_decimal_macros::dec;

    fn eth_ngn() -> RateTable {
        RateTable::new([RateEntry {
            crypto: CryptoCurrency::Eth,
            fiat: FiatCurrency::Ngn,
            rate: dec!(3500000),
        }])
    }

    fn engine() -> (ConversionEngine, Arc<RecordingRouter>) {
        let router = Arc::new(RecordingRouter::new());
        let engine = ConversionEngine::new(eth_ngn(), Delays::default(), router.clone());
        (engine, router)
    }

    #[test]
    fn test_convert_forward_rounds_to_cents() {
        let rates = eth_ngn();
        assert_eq!(
            convert_forward(&rates, "2", CryptoCurrency::Eth, FiatCurrency::Ngn),
            "7000000.00"
        );
        assert_eq!(
            convert_forward(&rates, "0.0000001", CryptoCurrency::Eth, FiatCurrency::Ngn),
            "0.35"
        );
    }

    #[test]
    fn test_convert_inverse_rounds_to_four_places() {
        let rates = eth_ngn();
        assert_eq!(
            convert_inverse(&rates, "1000000", CryptoCurrency::Eth, FiatCurrency::Ngn),
            "0.2857"
        );
    }

    #[test]
    fn test_non_numeric_input_is_zero() {
        let rates = eth_ngn();
        assert_eq!(
            convert_forward(&rates, "abc", CryptoCurrency::Eth, FiatCurrency::Ngn),
            "0.00"
        );
        assert_eq!(
            convert_inverse(&rates, "", CryptoCurrency::Eth, FiatCurrency::Ngn),
            "0.0000"
        );
    }

    #[test]
    fn test_overflow_is_zero() {
        let rates = eth_ngn();
        assert_eq!(
            convert_forward(
                &rates,
                "79228162514264337593543950335",
                CryptoCurrency::Eth,
                FiatCurrency::Ngn
            ),
            "0.00"
        );
    }

    #[test]
    fn test_unit_rate_at_range_limit_is_zero() {
        let rates = RateTable::new([RateEntry {
            crypto: CryptoCurrency::Usdt,
            fiat: FiatCurrency::Usd,
            rate: dec!(1),
        }]);
        assert_eq!(
            convert_forward(
                &rates,
                "79228162514264337593543950335",
                CryptoCurrency::Usdt,
                FiatCurrency::Usd
            ),
            "0.00"
        );
    }

    #[tokio::test]
    async fn test_initial_amounts_are_consistent() {
        let (engine, _) = engine();
        let state = engine.snapshot().await;
        assert_eq!(state.pay_amount, "1.00");
        assert_eq!(state.receive_amount, "3500000.00");
        assert_eq!(state.pay_currency, CryptoCurrency::Eth);
        assert_eq!(state.receive_currency, FiatCurrency::Ngn);
        assert!(!state.is_calculating);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_applies_immediately_and_recalculates_later() {
        let (engine, _) = engine();
        let pending = engine.on_pay_amount_edited("2").await.unwrap();

        let state = engine.snapshot().await;
        assert_eq!(state.pay_amount, "2");
        assert_eq!(state.receive_amount, "3500000.00");
        assert!(state.is_calculating);

        pending.finished().await.unwrap();
        let state = engine.snapshot().await;
        assert_eq!(state.receive_amount, "7000000.00");
        assert!(!state.is_calculating);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_wallets_populate_errors() {
        let (engine, router) = engine();
        let result = engine.attempt_proceed(None, Some(Wallet::Rainbow)).await;

        match result {
            Err(CheckoutError::Validation(errors)) => {
                assert_eq!(errors.get(Field::PayFrom), Some("Please select a wallet to pay from"));
                assert!(!errors.contains(Field::PayTo));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        let state = engine.snapshot().await;
        assert!(state.errors.contains(Field::PayFrom));
        assert!(!state.is_converting);
        assert!(router.navigations().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_selecting_wallet_clears_only_its_error() {
        let (engine, _) = engine();
        let _ = engine.attempt_proceed(None, None).await;
        engine.select_pay_from(Some(Wallet::Metamask)).await.unwrap();

        let state = engine.snapshot().await;
        assert!(!state.errors.contains(Field::PayFrom));
        assert!(state.errors.contains(Field::PayTo));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_attempt_while_converting_is_busy() {
        let (engine, router) = engine();
        let pending = engine
            .attempt_proceed(Some(Wallet::Metamask), Some(Wallet::Rainbow))
            .await
            .unwrap();
        assert!(engine.snapshot().await.is_convert_disabled());

        let again = engine
            .attempt_proceed(Some(Wallet::Metamask), Some(Wallet::Rainbow))
            .await;
        assert!(matches!(again, Err(CheckoutError::Busy(_))));

        pending.finished().await.unwrap();
        assert_eq!(router.navigations().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inputs_are_locked_while_converting() {
        let (engine, router) = engine();
        let pending = engine
            .attempt_proceed(Some(Wallet::Metamask), Some(Wallet::Rainbow))
            .await
            .unwrap();

        assert!(matches!(
            engine.select_pay_from(None).await,
            Err(CheckoutError::Busy(_))
        ));
        assert!(matches!(
            engine.select_pay_to(Some(Wallet::Metamask)).await,
            Err(CheckoutError::Busy(_))
        ));
        assert!(matches!(
            engine.on_pay_amount_edited("5").await,
            Err(CheckoutError::Busy(_))
        ));
        assert!(matches!(
            engine.on_receive_amount_edited("10").await,
            Err(CheckoutError::Busy(_))
        ));
        assert!(matches!(
            engine.on_pay_currency_changed(CryptoCurrency::Btc).await,
            Err(CheckoutError::Busy(_))
        ));
        assert!(matches!(
            engine.on_receive_currency_changed(FiatCurrency::Usd).await,
            Err(CheckoutError::Busy(_))
        ));

        pending.finished().await.unwrap();
        let state = engine.snapshot().await;
        assert_eq!(state.pay_from, Some(Wallet::Metamask));
        assert_eq!(state.pay_to, Some(Wallet::Rainbow));
        assert_eq!(state.pay_amount, "1.00");
        assert_eq!(state.pay_currency, CryptoCurrency::Eth);
        assert!(!state.is_calculating);
        assert_eq!(
            router.navigations().await,
            vec![Navigation::To(Route::RecipientDetails)]
        );

        // Unlocked again once the conversion is over.
        engine.select_pay_from(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_field_views() {
        let (engine, _) = engine();
        let state = engine.snapshot().await;
        let view = state.field_view(Field::ReceiveAmount).unwrap();
        assert_eq!(view.value, "3500000.00");
        assert!(!view.disabled);
        assert_eq!(state.field_view(Field::PayFrom).unwrap().value, "");
        assert!(state.field_view(Field::Email).is_none());
    }
}
