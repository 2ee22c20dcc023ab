//! Login handshake
//!
//! Nothing about the portal's login flow is fixed: the login link, the form
//! action, the hidden anti-forgery fields, and even the credential field
//! names are discovered or configured at runtime. The handshake fetches the
//! landing page, follows the labeled login link, assembles the discovered
//! form, submits it, and judges success by where the portal redirected us.
//! No retries happen here; retry policy belongs to the caller.

use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{Credentials, FormDescriptor};
use crate::infrastructure::config::{LoginConfig, PortalConfig};
use crate::infrastructure::document::{resolve_url, DocumentView};
use crate::infrastructure::errors::{PortalError, PortalResult};
use crate::infrastructure::http_client::SessionClient;

/// How much of a rejection response body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Perform the full login handshake. On success the session's cookie jar
/// holds the server-issued authentication cookies; every later request
/// through the same client carries them.
pub async fn authenticate(
    client: &SessionClient,
    config: &PortalConfig,
    credentials: &Credentials,
) -> PortalResult<()> {
    let base_url = parse_url(&config.base_url)?;

    info!("Starting login handshake against {}", base_url);
    let landing = client.get(&base_url).await?;
    let landing_doc = DocumentView::parse(&landing.body);

    let login_url = locate_labeled_link(
        &landing_doc,
        &landing.final_url,
        &config.login.link_label,
        |label, links| PortalError::LoginLinkNotFound {
            label,
            available_links: links,
        },
    )?;
    debug!("Login entry point: {}", login_url);

    let login_page = client.get(&login_url).await?;
    let login_doc = DocumentView::parse(&login_page.body);

    let form = login_submission(
        &login_doc,
        &login_page.final_url,
        &config.login,
        credentials,
    )?;
    debug!(
        "Submitting login form to {} ({} fields)",
        form.action_url,
        form.fields.len()
    );

    let action_url = parse_url(&form.action_url)?;
    let response = client.post_form(&action_url, &form.fields).await?;

    if response.final_url_contains(&config.login.page_marker) {
        warn!(
            "Login rejected: final URL {} still carries the login marker",
            response.final_url
        );
        return Err(PortalError::AuthenticationRejected {
            final_url: response.final_url.to_string(),
            body_snippet: response.body.chars().take(BODY_SNIPPET_CHARS).collect(),
        });
    }

    info!("Authenticated; session landed on {}", response.final_url);
    Ok(())
}

/// Find the anchor labeled `label` and resolve its href against the page
/// URL. `missing` builds the error, so login and report discovery share
/// this lookup while keeping distinct error variants.
pub(crate) fn locate_labeled_link(
    doc: &DocumentView,
    page_url: &Url,
    label: &str,
    missing: impl FnOnce(String, Vec<crate::infrastructure::errors::LinkSummary>) -> PortalError,
) -> PortalResult<Url> {
    let href = doc
        .link_by_label(label)
        .and_then(|anchor| anchor.attr("href"))
        .ok_or_else(|| missing(label.to_string(), doc.link_summaries()))?;

    resolve_url(page_url, href)
}

/// Assemble the login submission: the first form on the page, its hidden
/// fields, and the two configured credential fields overlaid. Pure over the
/// document, so the field-assembly invariants are testable without a
/// server.
pub(crate) fn login_submission(
    doc: &DocumentView,
    page_url: &Url,
    login: &LoginConfig,
    credentials: &Credentials,
) -> PortalResult<FormDescriptor> {
    let form = doc
        .find_first("form", &[])
        .ok_or_else(|| PortalError::LoginFormNotFound {
            url: page_url.to_string(),
            forms: doc.form_summaries(),
        })?;

    let mut descriptor = form.form_descriptor(page_url)?;
    descriptor.set_field(&login.username_field, &credentials.username);
    descriptor.set_field(&login.password_field, &credentials.password);
    Ok(descriptor)
}

pub(crate) fn parse_url(input: &str) -> PortalResult<Url> {
    Url::parse(input).map_err(|e| PortalError::InvalidUrl {
        input: input.to_string(),
        source: e,
    })
}
