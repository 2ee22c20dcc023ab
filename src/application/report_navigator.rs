//! Report navigation
//!
//! Mirrors the login handshake's link-then-form discovery, parameterized by
//! report kind: each report has its own entry-link label, while the
//! date-range form is found structurally (by class marker) because report
//! forms are not consistently labeled. Report errors are deliberately
//! distinct from auth errors so a caller can tell "re-authenticate" apart
//! from "the markup changed".

use tracing::{debug, info};
use url::Url;

use crate::application::authenticator::{locate_labeled_link, parse_url};
use crate::domain::{FormDescriptor, ReportQuery};
use crate::infrastructure::config::{PortalConfig, ReportConfig};
use crate::infrastructure::document::{resolve_url, DocumentView};
use crate::infrastructure::errors::{PortalError, PortalResult};
use crate::infrastructure::http_client::{PageResponse, SessionClient};

/// Submitted date format, portal-fixed.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Navigate to the requested report and submit its date-range query.
/// Returns the report response body for extraction. Requires an
/// authenticated session; a hop that lands back on the login page is
/// surfaced as `SessionExpired`, never retried.
pub async fn fetch_report(
    client: &SessionClient,
    config: &PortalConfig,
    query: &ReportQuery,
) -> PortalResult<String> {
    let base_url = parse_url(&config.base_url)?;
    let index_url = resolve_url(&base_url, &config.reports.path)?;

    info!(
        "Fetching {} report {} .. {}",
        query.kind, query.date_from, query.date_to
    );

    let index = client.get(&index_url).await?;
    ensure_session(&index, config)?;
    let index_doc = DocumentView::parse(&index.body);

    let label = config.report_link_label(query.kind);
    let report_url = locate_labeled_link(&index_doc, &index.final_url, label, |label, links| {
        PortalError::ReportLinkNotFound {
            label,
            available_links: links,
        }
    })?;
    debug!("Report entry point: {}", report_url);

    let report_page = client.get(&report_url).await?;
    ensure_session(&report_page, config)?;
    let report_doc = DocumentView::parse(&report_page.body);

    let form = report_submission(&report_doc, &report_page.final_url, &config.reports, query)?;
    debug!(
        "Submitting report query to {} ({} fields)",
        form.action_url,
        form.fields.len()
    );

    let action_url = parse_url(&form.action_url)?;
    let response = client.post_form(&action_url, &form.fields).await?;
    ensure_session(&response, config)?;

    if !response.status.is_success() {
        return Err(PortalError::ReportSubmissionFailed {
            url: form.action_url,
            status: response.status.as_u16(),
        });
    }

    info!("Report query accepted ({} bytes)", response.body.len());
    Ok(response.body)
}

/// Assemble the date-range submission: the form carrying the configured
/// class marker, its hidden fields echoed unchanged, and the range fields
/// overlaid. An absent subject filter submits an empty value, which the
/// portal reads as "all subjects".
pub(crate) fn report_submission(
    doc: &DocumentView,
    page_url: &Url,
    reports: &ReportConfig,
    query: &ReportQuery,
) -> PortalResult<FormDescriptor> {
    let form = doc
        .find_first("form", &[("class", reports.form_marker.as_str())])
        .ok_or_else(|| PortalError::ReportFormNotFound {
            url: page_url.to_string(),
            forms: doc.form_summaries(),
        })?;

    let mut descriptor = form.form_descriptor(page_url)?;
    descriptor.set_field(
        &reports.date_from_field,
        query.date_from.format(DATE_FORMAT).to_string(),
    );
    descriptor.set_field(
        &reports.date_to_field,
        query.date_to.format(DATE_FORMAT).to_string(),
    );
    descriptor.set_field(
        &reports.subject_field,
        query.subject_filter.clone().unwrap_or_default(),
    );
    Ok(descriptor)
}

/// An authenticated hop that lands back on the login page means the
/// session is gone. Surface it; silently retrying would loop forever
/// against a portal that wants a fresh login.
fn ensure_session(response: &PageResponse, config: &PortalConfig) -> PortalResult<()> {
    if response.final_url_contains(&config.login.page_marker) {
        return Err(PortalError::SessionExpired {
            url: response.final_url.to_string(),
        });
    }
    Ok(())
}
