//! Domain entities
//!
//! Core types for the portal scraping flow: credentials, report queries,
//! discovered forms, and extracted employee records.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Login credentials, provided by the caller per invocation.
///
/// Never persisted by the core; `Debug` redacts the password so it cannot
/// leak through error chains or tracing output.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which portal report to pull.
///
/// Selects both the report's entry-link label and the meaning of the
/// event-date column in extracted rows (hire date vs termination date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    NewHire,
    Termination,
}

impl ReportKind {
    /// Stable slug used in log lines and export file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::NewHire => "new_hires",
            ReportKind::Termination => "terminations",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::NewHire => write!(f, "new hire"),
            ReportKind::Termination => write!(f, "termination"),
        }
    }
}

/// A date-range report request.
///
/// Bounds are inclusive. An absent or empty `subject_filter` means all
/// subjects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportQuery {
    pub kind: ReportKind,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub subject_filter: Option<String>,
}

impl ReportQuery {
    pub fn new(kind: ReportKind, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            kind,
            date_from,
            date_to,
            subject_filter: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject_filter = Some(subject.into());
        self
    }
}

/// Resolved representation of a discovered HTML form, ready for submission.
///
/// `action_url` is always absolute: relative actions are resolved against
/// the page the form was found on before the descriptor is handed out.
/// Hidden inputs populate `fields` with their default values; callers
/// overlay the visible fields they control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDescriptor {
    pub action_url: String,
    pub method: String,
    pub fields: HashMap<String, String>,
}

impl FormDescriptor {
    /// Insert or overwrite a field value.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }
}

/// One extracted employee-event row.
///
/// Exactly one of `hire_date` / `termination_date` is set, keyed by the
/// report kind the row came from. Date cells are kept as trimmed strings;
/// the portal does not guarantee a parseable format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub suffix: String,
    pub ssn: String,
    pub address: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<String>,
    pub birth_date: String,
    pub received_date: String,
    pub sent_date: String,
}

impl EmployeeRecord {
    /// The event date for this record, whichever kind it came from.
    pub fn event_date(&self) -> Option<&str> {
        self.hire_date
            .as_deref()
            .or(self.termination_date.as_deref())
    }
}
