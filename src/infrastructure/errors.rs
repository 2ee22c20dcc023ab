//! Error types for the portal scraping flow
//!
//! Discovery failures carry what the page actually contained (anchors,
//! forms) so an operator can update the configured labels without
//! re-running under verbose tracing. None of these are retried internally;
//! retry policy belongs to the caller, and only transport-level failures
//! without a definitive 4xx are sensible candidates.

use thiserror::Error;

/// Summary of an anchor found on a page, reported when a labeled link
/// lookup fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSummary {
    pub href: Option<String>,
    pub text: String,
}

/// Summary of a form found on a page, reported when form discovery fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSummary {
    pub action: Option<String>,
    pub method: String,
    pub inputs: Vec<String>,
}

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("request to {url} failed{}", status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    Fetch {
        url: String,
        status: Option<u16>,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("invalid URL {input:?}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid configuration value for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("login link {label:?} not found; page contained {} anchor(s): {available_links:?}", available_links.len())]
    LoginLinkNotFound {
        label: String,
        available_links: Vec<LinkSummary>,
    },

    #[error("no login form at {url}; page contained {} form(s): {forms:?}", forms.len())]
    LoginFormNotFound { url: String, forms: Vec<FormSummary> },

    #[error("authentication rejected; final URL {final_url} still on login page")]
    AuthenticationRejected {
        final_url: String,
        body_snippet: String,
    },

    #[error("session expired: request to {url} landed back on the login page")]
    SessionExpired { url: String },

    #[error("report link {label:?} not found; page contained {} anchor(s): {available_links:?}", available_links.len())]
    ReportLinkNotFound {
        label: String,
        available_links: Vec<LinkSummary>,
    },

    #[error("no report form at {url}; page contained {} form(s): {forms:?}", forms.len())]
    ReportFormNotFound { url: String, forms: Vec<FormSummary> },

    #[error("report submission to {url} failed with status {status}")]
    ReportSubmissionFailed { url: String, status: u16 },
}

impl PortalError {
    /// True for transport-level failures a caller may reasonably retry
    /// with backoff. Discovery and rejection failures are terminal: the
    /// remediation is a configuration or markup-selector update.
    pub fn is_retryable(&self) -> bool {
        match self {
            PortalError::Timeout { .. } => true,
            PortalError::Fetch { status, .. } => !matches!(status, Some(400..=499)),
            _ => false,
        }
    }
}

pub type PortalResult<T> = Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_failures_are_not_retryable() {
        let err = PortalError::LoginLinkNotFound {
            label: "Login".into(),
            available_links: vec![],
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn timeout_is_retryable() {
        let err = PortalError::Timeout {
            url: "https://in-newhire.com".into(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn client_status_is_not_retryable() {
        let err = PortalError::Fetch {
            url: "https://in-newhire.com/report".into(),
            status: Some(404),
            source: None,
        };
        assert!(!err.is_retryable());

        let err = PortalError::Fetch {
            url: "https://in-newhire.com/report".into(),
            status: Some(503),
            source: None,
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn link_not_found_message_lists_alternatives() {
        let err = PortalError::LoginLinkNotFound {
            label: "Login".into(),
            available_links: vec![LinkSummary {
                href: Some("/signin".into()),
                text: "Sign in".into(),
            }],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("Login"));
        assert!(rendered.contains("/signin"));
    }
}
