//! Multi-step booking form.
//!
//! Holds the current step, the entered values and the per-field errors.
//! Every value change is mirrored to the key/value store so an interrupted
//! session can resume; a successful submission clears that snapshot and
//! appends a record to the bookings list.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use super::definition::FormDefinition;
use super::gateway::BookingGateway;
use super::reference::{DEFAULT_PREFIX, generate_reference};
use super::rules::{REQUIRED_MESSAGE, RuleContext, parse_date};
use crate::clock::{Clock, SystemClock};
use crate::models::{BookingPayload, BookingRecord, BookingStatus, FieldValues, SubmissionResult};
use crate::random::{RandomSource, ThreadRandom};
use crate::store::KeyValueStore;
use crate::{Result, TravelError};

pub const FORM_SNAPSHOT_KEY: &str = "booking_form_data";
pub const BOOKINGS_KEY: &str = "travel_bookings";

const CORRECT_ERRORS_REASON: &str = "Please correct the errors in the form";
const SUBMISSION_FAILED_REASON: &str = "Booking submission failed. Please try again.";

pub struct FormWizard<S, G> {
    definition: FormDefinition,
    store: S,
    gateway: G,
    clock: Arc<dyn Clock>,
    rng: Box<dyn RandomSource>,
    reference_prefix: String,
    current_step: usize,
    values: FieldValues,
    field_errors: BTreeMap<String, String>,
}

impl<S: KeyValueStore, G: BookingGateway> FormWizard<S, G> {
    /// Creates the wizard on step 1 and replays any snapshot left in `store`.
    pub fn new(definition: FormDefinition, store: S, gateway: G) -> Self {
        let mut wizard = Self {
            definition,
            store,
            gateway,
            clock: Arc::new(SystemClock),
            rng: Box::new(ThreadRandom),
            reference_prefix: DEFAULT_PREFIX.to_string(),
            current_step: 1,
            values: FieldValues::new(),
            field_errors: BTreeMap::new(),
        };
        wizard.restore_snapshot();
        wizard
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    #[must_use]
    pub fn with_reference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reference_prefix = prefix.into();
        self
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.definition.total_steps()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    /// Records a new value for `field`, clears its error and persists the form.
    ///
    /// Fields whose date must come after `field` are blanked when the new
    /// value makes them stale.
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        self.field_errors.remove(field);

        let stale: Vec<String> = match parse_date(&value) {
            Some(earlier) => self
                .definition
                .dependents_of(field)
                .filter(|dependent| {
                    self.values
                        .get(*dependent)
                        .and_then(|v| parse_date(v))
                        .is_some_and(|later| later <= earlier)
                })
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        self.values.insert(field.to_string(), value);
        for dependent in stale {
            debug!(field = %dependent, "Clearing date no longer after {}", field);
            self.values.insert(dependent, String::new());
        }

        self.persist_snapshot();
    }

    /// Applies the rule chain for `field` to `value` against the current form.
    ///
    /// A field without a rule only has to be non-blank when a step marks it
    /// required; otherwise it is always valid.
    pub fn validate_field(&self, field: &str, value: &str) -> std::result::Result<(), String> {
        let Some(rule) = self.definition.rule(field) else {
            if self.definition.marked_required(field) && value.trim().is_empty() {
                return Err(REQUIRED_MESSAGE.to_string());
            }
            return Ok(());
        };
        let ctx = RuleContext {
            values: &self.values,
            today: self.clock.today(),
        };
        rule.check(value, &ctx)
    }

    /// Strict check when a field loses focus; records or clears its error.
    pub fn blur(&mut self, field: &str) -> std::result::Result<(), String> {
        let value = self.value(field).unwrap_or_default().to_string();
        self.check_and_record(field, &value)
    }

    fn check_and_record(&mut self, field: &str, value: &str) -> std::result::Result<(), String> {
        let outcome = self.validate_field(field, value);
        match &outcome {
            Ok(()) => {
                self.field_errors.remove(field);
            }
            Err(message) => {
                self.field_errors.insert(field.to_string(), message.clone());
            }
        }
        outcome
    }

    /// Validates each field in `fields`, returning every failure.
    fn check_fields(&mut self, fields: &[String]) -> BTreeMap<String, String> {
        let mut failures = BTreeMap::new();
        for field in fields {
            let value = self.value(field).unwrap_or_default().to_string();
            if let Err(message) = self.check_and_record(field, &value) {
                failures.insert(field.clone(), message);
            }
        }
        failures
    }

    /// Moves to step `target` (1-based).
    ///
    /// Moving forward requires every required field of the current step to
    /// pass; moving back or staying put never validates.
    #[tracing::instrument(skip(self), fields(from = self.current_step))]
    pub fn go_to_step(&mut self, target: usize) -> Result<()> {
        let total = self.total_steps();
        if target == 0 || target > total {
            return Err(TravelError::validation(format!(
                "Step {target} does not exist (form has {total} steps)"
            )));
        }

        if target > self.current_step {
            let required: Vec<String> = self
                .definition
                .step(self.current_step)
                .map(|step| step.required_fields().map(str::to_string).collect())
                .unwrap_or_default();
            let failures = self.check_fields(&required);
            if !failures.is_empty() {
                debug!(failed = failures.len(), "Step navigation blocked");
                return Err(TravelError::invalid_fields(failures));
            }
        }

        self.current_step = target;
        Ok(())
    }

    /// Validates the whole form, sends it through the gateway and, on
    /// success, records the booking and resets the form.
    ///
    /// A gateway failure leaves the form untouched so the user can retry.
    pub async fn submit(&mut self) -> SubmissionResult {
        let checked: Vec<String> = self
            .definition
            .submit_checked_fields()
            .into_iter()
            .map(str::to_string)
            .collect();
        let failures = self.check_fields(&checked);
        if !failures.is_empty() {
            info!(failed = failures.len(), "Submission rejected by validation");
            return SubmissionResult::Failure {
                reason: CORRECT_ERRORS_REASON.to_string(),
            };
        }

        let payload = BookingPayload {
            fields: self.values.clone(),
            submitted_at: self.clock.now(),
        };

        if let Err(e) = self.gateway.send(&payload).await {
            warn!("Booking submission error: {e:#}");
            return SubmissionResult::Failure {
                reason: SUBMISSION_FAILED_REASON.to_string(),
            };
        }

        let reference = generate_reference(&self.reference_prefix, self.clock.now(), self.rng.as_mut());
        let record = BookingRecord {
            reference: reference.clone(),
            data: payload,
            status: BookingStatus::Submitted,
            submission_date: self.clock.now(),
        };
        if let Err(e) = self.append_booking(record) {
            warn!("Booking {reference} accepted but not saved locally: {e:#}");
        }

        self.reset();
        info!(%reference, "Booking submitted");
        SubmissionResult::Success { reference }
    }

    /// Empties the form, returns to step 1 and forgets the saved snapshot.
    pub fn clear(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.values.clear();
        self.field_errors.clear();
        self.current_step = 1;
        if let Err(e) = self.store.remove(FORM_SNAPSHOT_KEY) {
            warn!("Failed to remove saved form data: {e:#}");
        }
    }

    /// Pre-fills known fields from a URL query string such as
    /// `destination=Cape%20Town`.
    pub fn prefill_from_query(&mut self, query: &str) {
        let query = query.trim_start_matches('?');
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            if !self.definition.knows(key) {
                continue;
            }
            let plus_decoded = raw.replace('+', " ");
            match urlencoding::decode(&plus_decoded) {
                Ok(value) => self.set_value(key, value.into_owned()),
                Err(e) => warn!("Ignoring undecodable query value for {key}: {e}"),
            }
        }
    }

    /// Bookings submitted from this store, oldest first
    pub fn saved_bookings(&self) -> Result<Vec<BookingRecord>> {
        load_bookings(&self.store)
    }

    fn append_booking(&self, record: BookingRecord) -> Result<()> {
        let mut bookings = load_bookings(&self.store)?;
        bookings.push(record);
        let json = serde_json::to_string(&bookings)
            .map_err(|e| TravelError::storage(format!("Failed to encode bookings: {e}")))?;
        self.store.put(BOOKINGS_KEY, &json)?;
        Ok(())
    }

    fn persist_snapshot(&self) {
        let saved = serde_json::to_string(&self.values)
            .context("Failed to encode form data")
            .and_then(|json| self.store.put(FORM_SNAPSHOT_KEY, &json));
        if let Err(e) = saved {
            warn!("Failed to save form data: {e:#}");
        }
    }

    fn restore_snapshot(&mut self) {
        let saved = match self.store.get(FORM_SNAPSHOT_KEY) {
            Ok(Some(saved)) => saved,
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to read saved form data: {e:#}");
                return;
            }
        };

        let values: FieldValues = match serde_json::from_str(&saved) {
            Ok(values) => values,
            Err(e) => {
                warn!("Failed to load saved form data: {e}");
                return;
            }
        };

        for (field, value) in values {
            if self.definition.knows(&field) {
                self.values.insert(field, value);
            } else {
                debug!(%field, "Dropping saved value for unknown field");
            }
        }
        debug!(restored = self.values.len(), "Resumed saved form data");
    }
}

fn load_bookings(store: &impl KeyValueStore) -> Result<Vec<BookingRecord>> {
    match store.get(BOOKINGS_KEY)? {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| TravelError::storage(format!("Saved bookings are unreadable: {e}"))),
        None => Ok(Vec::new()),
    }
}
