use super::currency::{CryptoCurrency, FiatCurrency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the static exchange-rate table: fiat units per crypto unit.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct RateEntry {
    pub crypto: CryptoCurrency,
    pub fiat: FiatCurrency,
    pub rate: Decimal,
}

/// Read-only lookup from a currency pair to its fixed rate.
///
/// Missing pairs are not an error: the forward rate falls back to zero and
/// the inverse divisor falls back to one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<(CryptoCurrency, FiatCurrency), Decimal>,
}

impl RateTable {
    pub fn new(entries: impl IntoIterator<Item = RateEntry>) -> Self {
        Self {
            rates: entries
                .into_iter()
                .map(|e| ((e.crypto, e.fiat), e.rate))
                .collect(),
        }
    }

    pub fn get(&self, crypto: CryptoCurrency, fiat: FiatCurrency) -> Option<Decimal> {
        self.rates.get(&(crypto, fiat)).copied()
    }

    /// Multiplier for crypto → fiat.
    pub fn forward(&self, crypto: CryptoCurrency, fiat: FiatCurrency) -> Decimal {
        self.get(crypto, fiat).unwrap_or(Decimal::ZERO)
    }

    /// Divisor for fiat → crypto. Never zero.
    pub fn inverse_divisor(&self, crypto: CryptoCurrency, fiat: FiatCurrency) -> Decimal {
        match self.get(crypto, fiat) {
            Some(rate) if !rate.is_zero() => rate,
            _ => Decimal::ONE,
        }
    }
}

impl FromIterator<RateEntry> for RateTable {
    fn from_iter<I: IntoIterator<Item = RateEntry>>(iter: I) -> Self {
        Self::new(iter)
    }
}
