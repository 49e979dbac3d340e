//! Form state: touched fields, errors, the general error slot and phase

use super::{Validate, ValidationErrors};
use std::collections::BTreeSet;

/// Where a form is in its load → edit → submit cycle
///
/// ```text
/// Idle → Validating → IdleWithErrors
///                   → Submitting → NavigatedAway
///                                → IdleWithGeneralError
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    /// Transient while `begin_submit` runs the validator
    Validating,
    IdleWithErrors,
    Submitting,
    /// The write succeeded; the caller should leave the form
    NavigatedAway,
    IdleWithGeneralError,
}

/// Why `begin_submit` did not hand out the values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// Validation failed; errors are stored on the form
    Invalid(ValidationErrors),
    /// A submission is already in flight
    InFlight,
}

/// A draft bound to its validation state
#[derive(Debug, Clone)]
pub struct FormState<D> {
    values: D,
    touched: BTreeSet<String>,
    errors: ValidationErrors,
    general: Option<String>,
    phase: FormPhase,
}

impl<D: Validate> FormState<D> {
    pub fn new(values: D) -> Self {
        Self {
            values,
            touched: BTreeSet::new(),
            errors: ValidationErrors::new(),
            general: None,
            phase: FormPhase::Idle,
        }
    }

    pub fn values(&self) -> &D {
        &self.values
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// All current field errors, touched or not
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Server or network message shown above the form
    pub fn general_error(&self) -> Option<&str> {
        self.general.as_deref()
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Change field values. Validation waits for blur or submit.
    pub fn edit(&mut self, f: impl FnOnce(&mut D)) {
        f(&mut self.values);
    }

    /// Leave a field: mark it touched and re-run validation
    pub fn blur(&mut self, field: &str) {
        self.touched.insert(field.to_string());
        self.revalidate();
    }

    /// Error for a field, only once the user has touched it
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    /// Start a submission.
    ///
    /// Touches every field and validates. On success the form moves to
    /// `Submitting` and returns the values to send; the caller must then call
    /// [`succeed`](Self::succeed) or [`fail`](Self::fail).
    pub fn begin_submit(&mut self) -> Result<&D, SubmitBlocked> {
        if self.phase == FormPhase::Submitting {
            return Err(SubmitBlocked::InFlight);
        }

        self.phase = FormPhase::Validating;
        self.general = None;
        self.touched.extend(self.values.field_names());
        self.revalidate();

        if self.errors.is_empty() {
            self.phase = FormPhase::Submitting;
            Ok(&self.values)
        } else {
            self.phase = FormPhase::IdleWithErrors;
            Err(SubmitBlocked::Invalid(self.errors.clone()))
        }
    }

    /// The write request succeeded
    pub fn succeed(&mut self) {
        self.phase = FormPhase::NavigatedAway;
    }

    /// The write request failed; show `message` in the general slot
    pub fn fail(&mut self, message: impl Into<String>) {
        self.general = Some(message.into());
        self.phase = FormPhase::IdleWithGeneralError;
    }

    /// Start over with fresh values
    pub fn reset(&mut self, values: D) {
        *self = Self::new(values);
    }

    fn revalidate(&mut self) {
        self.errors = self.values.validate().err().unwrap_or_default();
    }
}
