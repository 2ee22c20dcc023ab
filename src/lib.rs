//! newhire-scrape - session-based scraper for the in-newhire.com portal
//!
//! The portal has no published API; login and report forms are discovered
//! at runtime and employee-event tables are extracted into structured
//! records. This is a single-site integration with defensive parsing, not
//! a general scraping framework.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{authenticate, extract_records, fetch_report};
pub use domain::{Credentials, EmployeeRecord, ReportKind, ReportQuery};
pub use infrastructure::{PortalConfig, PortalError, SessionClient};
