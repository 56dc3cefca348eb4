//! Booking submission models

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field name to raw value, as entered
pub type FieldValues = BTreeMap<String, String>;

/// What is sent to the booking gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub fields: FieldValues,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Submitted,
}

/// Entry appended to the durable bookings list after a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub reference: String,
    pub data: BookingPayload,
    pub status: BookingStatus,
    pub submission_date: DateTime<Utc>,
}

/// Outcome of `FormWizard::submit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Success { reference: String },
    Failure { reason: String },
}

impl SubmissionResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success { .. })
    }

    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            SubmissionResult::Success { reference } => Some(reference),
            SubmissionResult::Failure { .. } => None,
        }
    }
}
