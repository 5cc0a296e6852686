use super::sequence::{Pending, RequestSequence};
use crate::config::{CheckoutConfig, Delays};
use crate::domain::fields::{Field, FieldErrors, FieldView};
use crate::domain::ports::{AccountLookupHandle, Route, RouterHandle};
use crate::domain::recipient::{
    Bank, Country, IntakeStep, is_verifiable_account_number, validate_bank_step,
    validate_contact_step,
};
use crate::error::{CheckoutError, Result};
use crate::infrastructure::simulated::SimulatedAccountLookup;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

/// Everything the recipient-details page renders.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct RecipientIntakeState {
    pub step: IntakeStep,
    pub selected_bank: Option<Bank>,
    pub account_number: String,
    /// Filled in by account verification, never by the user.
    pub account_name: String,
    pub is_verifying: bool,
    pub email: String,
    pub country: Country,
    pub local_number: String,
    pub errors: FieldErrors,
    pub is_processing: bool,
}

impl RecipientIntakeState {
    fn new(country: Country) -> Self {
        Self {
            step: IntakeStep::Bank,
            selected_bank: None,
            account_number: String::new(),
            account_name: String::new(),
            is_verifying: false,
            email: String::new(),
            country,
            local_number: String::new(),
            errors: FieldErrors::new(),
            is_processing: false,
        }
    }

    pub fn is_advance_disabled(&self) -> bool {
        self.is_processing || (self.step == IntakeStep::Bank && self.is_verifying)
    }

    /// Fields stay frozen while a step transition is in flight and once the
    /// details have been submitted.
    fn ensure_editable(&self) -> Result<()> {
        if self.is_processing {
            return Err(CheckoutError::Busy("recipient details are being processed"));
        }
        if self.step == IntakeStep::Submitted {
            return Err(CheckoutError::Busy("recipient details already submitted"));
        }
        Ok(())
    }

    /// Full number as dialled, e.g. `+234 8012345678`.
    pub fn phone_number(&self) -> String {
        if self.local_number.is_empty() {
            String::new()
        } else {
            format!("{} {}", self.country.calling_code, self.local_number)
        }
    }

    /// Renderer input for a field on this page, `None` for fields that
    /// belong to the conversion page.
    pub fn field_view(&self, field: Field) -> Option<FieldView> {
        let errors = &self.errors;
        let view = match field {
            Field::Bank => FieldView::new(
                self.selected_bank.map(|b| b.label()).unwrap_or_default(),
                errors,
                field,
            ),
            Field::AccountNumber => FieldView::new(&self.account_number, errors, field),
            Field::AccountName => {
                return Some(
                    FieldView::new(&self.account_name, errors, field)
                        .disabled(true)
                        .optional(),
                );
            }
            Field::Email => FieldView::new(&self.email, errors, field),
            Field::Phone => FieldView::new(self.phone_number(), errors, field),
            _ => return None,
        };
        Some(view.disabled(self.is_processing))
    }
}

/// Whether `back()` stayed inside the recipient flow.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BackOutcome {
    PreviousStep,
    LeftFlow,
}

/// The two-step bank → contact form behind the recipient-details page.
///
/// Created fresh each time the user enters the flow and dropped when they
/// leave it. Account numbers are verified through an [`AccountLookup`]
/// whenever they reach exactly ten digits; an edit made while a lookup is in
/// flight supersedes it.
///
/// [`AccountLookup`]: crate::domain::ports::AccountLookup
pub struct RecipientIntake {
    state: Arc<RwLock<RecipientIntakeState>>,
    countries: Arc<[Country]>,
    delays: Delays,
    router: RouterHandle,
    lookup: AccountLookupHandle,
    verification: RequestSequence,
}

impl RecipientIntake {
    /// # Arguments
    ///
    /// * `countries` - Calling-code metadata for the phone input.
    /// * `default_country` - ISO code preselected in the phone input.
    /// * `delays` - Simulated operation lengths.
    /// * `router` - Receives the navigation on submit or on leaving the flow.
    /// * `lookup` - Resolves account holder names.
    pub fn new(
        countries: Vec<Country>,
        default_country: &str,
        delays: Delays,
        router: RouterHandle,
        lookup: AccountLookupHandle,
    ) -> Result<Self> {
        let country = find_country(&countries, default_country)?;
        Ok(Self {
            state: Arc::new(RwLock::new(RecipientIntakeState::new(country))),
            countries: countries.into(),
            delays,
            router,
            lookup,
            verification: RequestSequence::new(),
        })
    }

    /// Builds the flow with the simulated account lookup.
    pub fn from_config(config: &CheckoutConfig, router: RouterHandle) -> Result<Self> {
        let lookup = Arc::new(SimulatedAccountLookup::new(
            config.delays.verification(),
            config.verified_account_name.clone(),
        ));
        Self::new(
            config.countries.clone(),
            &config.default_country,
            config.delays,
            router,
            lookup,
        )
    }

    /// A copy of the current form state.
    pub async fn snapshot(&self) -> RecipientIntakeState {
        self.state.read().await.clone()
    }

    /// Picks (or clears) the recipient's bank and drops its error.
    pub async fn select_bank(&self, bank: Option<Bank>) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        state.selected_bank = bank;
        state.errors.clear(Field::Bank);
        Ok(())
    }

    /// Updates the account number and starts a lookup when it is exactly
    /// ten digits long. Returns the scheduled lookup, if any.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::Busy`] while a step transition is running or after
    /// submission.
    pub async fn edit_account_number(&self, value: &str) -> Result<Option<Pending>> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        state.account_number = value.to_string();
        state.errors.clear(Field::AccountNumber);
        state.account_name.clear();

        if !is_verifiable_account_number(value) {
            self.verification.invalidate();
            state.is_verifying = false;
            return Ok(None);
        }

        let ticket = self.verification.issue();
        state.is_verifying = true;
        let bank = state.selected_bank;
        drop(state);
        tracing::debug!(account_number = value, "verifying account");

        let state = Arc::clone(&self.state);
        let lookup = Arc::clone(&self.lookup);
        let sequence = self.verification.clone();
        let number = value.to_string();
        Ok(Some(Pending::spawn(async move {
            let name = lookup.account_name(bank, &number).await;
            let mut state = state.write().await;
            if !sequence.is_current(ticket) {
                tracing::debug!(account_number = %number, "superseded verification discarded");
                return;
            }
            tracing::info!(account_number = %number, account_name = %name, "account verified");
            state.account_name = name;
            state.is_verifying = false;
        })))
    }

    /// Stores the email as typed; it is only validated on advance.
    pub async fn edit_email(&self, value: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        state.email = value.to_string();
        state.errors.clear(Field::Email);
        Ok(())
    }

    /// Picks the phone number's country by ISO code.
    pub async fn select_country(&self, code: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        state.country = find_country(&self.countries, code)?;
        state.errors.clear(Field::Phone);
        Ok(())
    }

    /// Stores the local part of the phone number, without calling code.
    pub async fn edit_local_number(&self, value: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.ensure_editable()?;
        state.local_number = value.to_string();
        state.errors.clear(Field::Phone);
        Ok(())
    }

    /// Validates the current step and, if it passes, moves on after the
    /// simulated processing delay.
    ///
    /// From the bank step the returned task lands on the contact step; from
    /// the contact step it submits and navigates to the confirmation page.
    #[instrument(skip(self))]
    pub async fn advance(&self) -> Result<Pending> {
        let mut state = self.state.write().await;
        if state.is_advance_disabled() {
            return Err(CheckoutError::Busy("recipient details are being processed"));
        }

        let from = state.step;
        let errors = match from {
            IntakeStep::Bank => validate_bank_step(state.selected_bank, &state.account_number),
            IntakeStep::Contact => validate_contact_step(
                &state.email,
                &state.country.calling_code,
                &state.local_number,
            ),
            IntakeStep::Submitted => {
                return Err(CheckoutError::Busy("recipient details already submitted"));
            }
        };
        state.errors = errors.clone();
        if !errors.is_empty() {
            tracing::warn!(step = ?from, %errors, "step rejected");
            return Err(CheckoutError::Validation(errors));
        }

        state.is_processing = true;
        drop(state);

        let state = Arc::clone(&self.state);
        let router = Arc::clone(&self.router);
        let delay = self.delays.step_transition();
        Ok(Pending::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.write().await;
            state.is_processing = false;
            match from {
                IntakeStep::Bank => {
                    state.step = IntakeStep::Contact;
                    state.errors.clear_all();
                    tracing::info!("bank details accepted");
                }
                _ => {
                    state.step = IntakeStep::Submitted;
                    drop(state);
                    tracing::info!(route = %Route::Confirmation, "recipient details submitted");
                    router.navigate_to(Route::Confirmation).await;
                }
            }
        }))
    }

    /// Steps back to the bank step, or leaves the flow from the bank step.
    pub async fn back(&self) -> Result<BackOutcome> {
        let mut state = self.state.write().await;
        if state.is_processing {
            return Err(CheckoutError::Busy("recipient details are being processed"));
        }

        match state.step {
            IntakeStep::Contact => {
                state.step = IntakeStep::Bank;
                state.errors.clear_all();
                Ok(BackOutcome::PreviousStep)
            }
            IntakeStep::Bank => {
                drop(state);
                self.verification.invalidate();
                self.router.navigate_back().await;
                Ok(BackOutcome::LeftFlow)
            }
            IntakeStep::Submitted => Err(CheckoutError::Busy("recipient details already submitted")),
        }
    }
}

fn find_country(countries: &[Country], code: &str) -> Result<Country> {
    countries
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
        .cloned()
        .ok_or_else(|| CheckoutError::unknown("country", code))
}
