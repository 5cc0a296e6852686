use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every input the two checkout pages render.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    PayAmount,
    ReceiveAmount,
    PayFrom,
    PayTo,
    Bank,
    AccountNumber,
    AccountName,
    Email,
    Phone,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PayAmount => "payAmount",
            Self::ReceiveAmount => "receiveAmount",
            Self::PayFrom => "payFrom",
            Self::PayTo => "payTo",
            Self::Bank => "bank",
            Self::AccountNumber => "accountNumber",
            Self::AccountName => "accountName",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-scoped, user-correctable validation messages.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Drops the message for one field, leaving the others untouched.
    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn clear_all(&mut self) {
        self.0.clear();
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// What the form-field renderer receives for one input.
///
/// Markup, styling and accessibility attributes are the renderer's concern;
/// this only carries the state the flow owns.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct FieldView {
    pub value: String,
    pub error: Option<String>,
    pub disabled: bool,
    pub required: bool,
}

impl FieldView {
    pub fn new(value: impl Into<String>, errors: &FieldErrors, field: Field) -> Self {
        Self {
            value: value.into(),
            error: errors.get(field).map(str::to_owned),
            disabled: false,
            required: true,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}
