use super::fields::{Field, FieldErrors};
use crate::error::CheckoutError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Account numbers verify only at exactly this many digits.
pub const ACCOUNT_NUMBER_DIGITS: usize = 10;
/// Accepted digit count for a full phone number, calling code included.
pub const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Payout banks offered on the bank step.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Bank {
    #[serde(rename = "GTBank")]
    GtBank,
    AccessBank,
    ZenithBank,
    FirstBank,
    #[serde(rename = "UBA")]
    Uba,
    Kuda,
    Opay,
    Moniepoint,
}

impl Bank {
    pub const ALL: [Bank; 8] = [
        Self::GtBank,
        Self::AccessBank,
        Self::ZenithBank,
        Self::FirstBank,
        Self::Uba,
        Self::Kuda,
        Self::Opay,
        Self::Moniepoint,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::GtBank => "GTBank",
            Self::AccessBank => "Access Bank",
            Self::ZenithBank => "Zenith Bank",
            Self::FirstBank => "First Bank",
            Self::Uba => "UBA",
            Self::Kuda => "Kuda",
            Self::Opay => "Opay",
            Self::Moniepoint => "Moniepoint",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Bank {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        Self::ALL
            .into_iter()
            .find(|b| {
                let label: String = b.label().chars().filter(|c| !c.is_whitespace()).collect();
                label.eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| CheckoutError::unknown("bank", s))
    }
}

/// Calling-code metadata for the phone input's country picker.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    pub name: String,
    pub calling_code: String,
}

impl Country {
    pub fn new(code: &str, name: &str, calling_code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            calling_code: calling_code.to_string(),
        }
    }
}

/// Where the recipient flow currently is.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStep {
    #[default]
    Bank,
    Contact,
    Submitted,
}

pub fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

/// Whether an account number is exactly long enough to be looked up.
pub fn is_verifiable_account_number(value: &str) -> bool {
    digit_count(value) == ACCOUNT_NUMBER_DIGITS
}

pub fn validate_bank_step(bank: Option<Bank>, account_number: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if bank.is_none() {
        errors.insert(Field::Bank, "Please select a bank");
    }
    // Longer numbers pass here even though only ten digits ever verify.
    if digit_count(account_number) < ACCOUNT_NUMBER_DIGITS {
        errors.insert(
            Field::AccountNumber,
            "Account number must be at least 10 digits",
        );
    }
    errors
}

pub fn validate_contact_step(email: &str, calling_code: &str, local_number: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !EMAIL_PATTERN.is_match(email) {
        errors.insert(Field::Email, "Please enter a valid email address");
    }

    if digit_count(local_number) == 0 {
        errors.insert(Field::Phone, "Phone number is required");
    } else {
        let digits = digit_count(calling_code) + digit_count(local_number);
        if !PHONE_DIGITS.contains(&digits) {
            errors.insert(Field::Phone, "Please enter a valid phone number");
        }
    }

    errors
}
