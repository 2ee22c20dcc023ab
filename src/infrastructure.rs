//! Infrastructure layer: HTTP session transport, HTML document view,
//! configuration, errors, and logging.

pub mod config;
pub mod document;
pub mod errors;
pub mod http_client;
pub mod logging;

pub use config::PortalConfig;
pub use document::{resolve_url, DocElement, DocumentView};
pub use errors::{FormSummary, LinkSummary, PortalError, PortalResult};
pub use http_client::{PageResponse, SessionClient};
