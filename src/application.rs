//! Application layer: the authenticated portal workflows.

pub mod authenticator;
pub mod export;
pub mod record_extractor;
pub mod report_navigator;

pub use authenticator::authenticate;
pub use record_extractor::{extract, extract_records};
pub use report_navigator::fetch_report;
