//! Configuration infrastructure
//!
//! Every portal-specific literal lives here: link labels, form field names,
//! the login-page marker, report paths. The portal has changed its field
//! names between versions before, so nothing in the application layer may
//! hard-code them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::domain::ReportKind;

/// Default values for portal configuration
pub mod defaults {
    pub const BASE_URL: &str = "https://in-newhire.com";
    // Browser-like UA: the portal may reject default library agents.
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
    pub const MAX_REQUESTS_PER_SECOND: u32 = 2;

    pub const LOGIN_LINK_LABEL: &str = "Login";
    pub const LOGIN_PAGE_MARKER: &str = "login";
    pub const USERNAME_FIELD: &str = "user";
    pub const PASSWORD_FIELD: &str = "pass";

    pub const REPORT_PATH: &str = "/report";
    pub const NEW_HIRE_LINK_LABEL: &str = "View New Hires";
    pub const TERMINATION_LINK_LABEL: &str = "View Terminations";
    pub const REPORT_FORM_MARKER: &str = "form";
    pub const DATE_FROM_FIELD: &str = "from";
    pub const DATE_TO_FIELD: &str = "to";
    pub const SUBJECT_FIELD: &str = "employee_ssn";
}

/// Complete portal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base URL of the portal
    pub base_url: String,

    /// User-Agent header attached to every request
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Maximum requests per second against the portal
    pub max_requests_per_second: u32,

    /// Login handshake configuration
    pub login: LoginConfig,

    /// Report navigation configuration
    pub reports: ReportConfig,
}

/// Login handshake settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Visible text of the login entry link
    pub link_label: String,

    /// Substring identifying the login page in a URL (case-insensitive).
    /// A post-login response whose final URL still contains this marker
    /// means the credentials were rejected.
    pub page_marker: String,

    /// Name of the username input. Portal versions have used `user` and
    /// `username`.
    pub username_field: String,

    /// Name of the password input
    pub password_field: String,
}

/// Report navigation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Sub-path of the report index page
    pub path: String,

    /// Visible text of the new-hire report link
    pub new_hire_link_label: String,

    /// Visible text of the termination report link
    pub termination_link_label: String,

    /// Class token marking the date-range form. Report forms are not
    /// consistently labeled, so discovery is structural.
    pub form_marker: String,

    /// Name of the range-start date field
    pub date_from_field: String,

    /// Name of the range-end date field
    pub date_to_field: String,

    /// Name of the subject (SSN) filter field; submitted empty for all
    /// subjects
    pub subject_field: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_requests_per_second: defaults::MAX_REQUESTS_PER_SECOND,
            login: LoginConfig::default(),
            reports: ReportConfig::default(),
        }
    }
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            link_label: defaults::LOGIN_LINK_LABEL.to_string(),
            page_marker: defaults::LOGIN_PAGE_MARKER.to_string(),
            username_field: defaults::USERNAME_FIELD.to_string(),
            password_field: defaults::PASSWORD_FIELD.to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: defaults::REPORT_PATH.to_string(),
            new_hire_link_label: defaults::NEW_HIRE_LINK_LABEL.to_string(),
            termination_link_label: defaults::TERMINATION_LINK_LABEL.to_string(),
            form_marker: defaults::REPORT_FORM_MARKER.to_string(),
            date_from_field: defaults::DATE_FROM_FIELD.to_string(),
            date_to_field: defaults::DATE_TO_FIELD.to_string(),
            subject_field: defaults::SUBJECT_FIELD.to_string(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from a JSON file, or fall back to defaults when
    /// the file does not exist.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path:?}"))?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create config directory: {dir:?}"))?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config file: {path:?}"))?;

        Ok(())
    }

    /// Entry-link label for a report kind.
    pub fn report_link_label(&self, kind: ReportKind) -> &str {
        match kind {
            ReportKind::NewHire => &self.reports.new_hire_link_label,
            ReportKind::Termination => &self.reports.termination_link_label,
        }
    }
}
