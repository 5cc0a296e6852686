use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Crypto assets the customer can pay with.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CryptoCurrency {
    #[default]
    Eth,
    Btc,
    Usdt,
}

/// Fiat currencies the recipient can be paid out in.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum FiatCurrency {
    #[default]
    Ngn,
    Usd,
    Eur,
}

/// Wallets offered in the "pay from" and "pay to" selectors.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Wallet {
    Metamask,
    Rainbow,
    WalletConnect,
    CoinbaseWallet,
}

impl CryptoCurrency {
    pub const ALL: [CryptoCurrency; 3] = [Self::Eth, Self::Btc, Self::Usdt];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Eth => "ETH",
            Self::Btc => "BTC",
            Self::Usdt => "USDT",
        }
    }
}

impl FiatCurrency {
    pub const ALL: [FiatCurrency; 3] = [Self::Ngn, Self::Usd, Self::Eur];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Ngn => "NGN",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }
}

impl Wallet {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Metamask => "Metamask",
            Self::Rainbow => "Rainbow",
            Self::WalletConnect => "WalletConnect",
            Self::CoinbaseWallet => "Coinbase Wallet",
        }
    }
}

impl fmt::Display for CryptoCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for FiatCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CryptoCurrency {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CheckoutError::unknown("crypto currency", s))
    }
}

impl FromStr for FiatCurrency {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CheckoutError::unknown("fiat currency", s))
    }
}

impl FromStr for Wallet {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        [
            Self::Metamask,
            Self::Rainbow,
            Self::WalletConnect,
            Self::CoinbaseWallet,
        ]
        .into_iter()
        .find(|w| {
            let label: String = w.label().chars().filter(|c| !c.is_whitespace()).collect();
            label.eq_ignore_ascii_case(&wanted)
        })
        .ok_or_else(|| CheckoutError::unknown("wallet", s))
    }
}

/// Parses an optional selector value; an empty selection is `None`.
pub fn parse_selection<T: FromStr<Err = CheckoutError>>(
    value: &str,
) -> Result<Option<T>, CheckoutError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}
