//! Static configuration injected into the flows: simulated delays, the rate
//! table and the country list.

use crate::domain::currency::{CryptoCurrency, FiatCurrency};
use crate::domain::rates::{RateEntry, RateTable};
use crate::domain::recipient::Country;
use crate::error::Result;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

/// Lengths of the simulated asynchronous operations, in milliseconds.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(default)]
pub struct Delays {
    pub recalculation_ms: u64,
    pub conversion_ms: u64,
    pub verification_ms: u64,
    pub step_transition_ms: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            recalculation_ms: 500,
            conversion_ms: 2000,
            verification_ms: 1500,
            step_transition_ms: 1000,
        }
    }
}

impl Delays {
    pub fn recalculation(&self) -> Duration {
        Duration::from_millis(self.recalculation_ms)
    }

    pub fn conversion(&self) -> Duration {
        Duration::from_millis(self.conversion_ms)
    }

    pub fn verification(&self) -> Duration {
        Duration::from_millis(self.verification_ms)
    }

    pub fn step_transition(&self) -> Duration {
        Duration::from_millis(self.step_transition_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct CheckoutConfig {
    pub delays: Delays,
    pub rates: Vec<RateEntry>,
    /// Name every simulated account lookup resolves to.
    pub verified_account_name: String,
    pub countries: Vec<Country>,
    pub default_country: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            delays: Delays::default(),
            rates: default_rates(),
            verified_account_name: "JOHN DOE".to_string(),
            countries: default_countries(),
            default_country: "NG".to_string(),
        }
    }
}

impl CheckoutConfig {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn rate_table(&self) -> RateTable {
        self.rates.iter().copied().collect()
    }
}

fn default_rates() -> Vec<RateEntry> {
    use CryptoCurrency::*;
    use FiatCurrency::*;

    [
        (Eth, Ngn, dec!(3500000)),
        (Eth, Usd, dec!(2300)),
        (Eth, Eur, dec!(2100)),
        (Btc, Ngn, dec!(65000000)),
        (Btc, Usd, dec!(43000)),
        (Btc, Eur, dec!(39500)),
        (Usdt, Ngn, dec!(1550)),
        (Usdt, Usd, dec!(1)),
        (Usdt, Eur, dec!(0.92)),
    ]
    .into_iter()
    .map(|(crypto, fiat, rate)| RateEntry { crypto, fiat, rate })
    .collect()
}

fn default_countries() -> Vec<Country> {
    vec![
        Country::new("NG", "Nigeria", "+234"),
        Country::new("GH", "Ghana", "+233"),
        Country::new("KE", "Kenya", "+254"),
        Country::new("ZA", "South Africa", "+27"),
        Country::new("GB", "United Kingdom", "+44"),
        Country::new("US", "United States", "+1"),
    ]
}
