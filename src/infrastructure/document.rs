//! HTML document view
//!
//! Read-only capability queries over a parsed page: find elements by tag
//! and attributes, read trimmed text, read attributes, summarize anchors
//! and forms for diagnostics. Pure and stateless; absence is a normal
//! outcome returned as `None`/empty, never an error at this layer.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::FormDescriptor;
use crate::infrastructure::errors::{FormSummary, LinkSummary, PortalError, PortalResult};

/// Parsed HTML page.
pub struct DocumentView {
    html: Html,
}

/// One element inside a [`DocumentView`].
#[derive(Clone, Copy)]
pub struct DocElement<'a> {
    element: ElementRef<'a>,
}

impl DocumentView {
    /// Parse an HTML payload. scraper's parser is tolerant; malformed
    /// markup still yields a tree.
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// First element matching `tag` and all attribute filters.
    pub fn find_first(&self, tag: &str, attrs: &[(&str, &str)]) -> Option<DocElement<'_>> {
        self.find_all(tag, attrs).into_iter().next()
    }

    /// All elements matching `tag` and all attribute filters, in document
    /// order. A `class` filter matches whitespace-separated class tokens;
    /// every other attribute must match exactly.
    pub fn find_all(&self, tag: &str, attrs: &[(&str, &str)]) -> Vec<DocElement<'_>> {
        let Ok(selector) = Selector::parse(tag) else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .filter(|element| {
                attrs.iter().all(|(name, expected)| {
                    match element.value().attr(name) {
                        Some(actual) if name.eq_ignore_ascii_case("class") => {
                            actual.split_whitespace().any(|token| token == *expected)
                        }
                        Some(actual) => actual == *expected,
                        None => false,
                    }
                })
            })
            .map(|element| DocElement { element })
            .collect()
    }

    /// Anchor whose trimmed visible text equals `label`, case-sensitively.
    ///
    /// Trimming matters: portal markup routinely pads link text with
    /// whitespace, and a raw comparison would miss every one of them.
    pub fn link_by_label(&self, label: &str) -> Option<DocElement<'_>> {
        self.find_all("a", &[])
            .into_iter()
            .find(|anchor| anchor.text() == label)
    }

    /// Every anchor's href and trimmed text, for discovery-failure
    /// diagnostics.
    pub fn link_summaries(&self) -> Vec<LinkSummary> {
        self.find_all("a", &[])
            .iter()
            .map(|anchor| LinkSummary {
                href: anchor.attr("href").map(str::to_string),
                text: anchor.text(),
            })
            .collect()
    }

    /// Every form's action, method, and input names, for discovery-failure
    /// diagnostics.
    pub fn form_summaries(&self) -> Vec<FormSummary> {
        self.find_all("form", &[])
            .iter()
            .map(|form| FormSummary {
                action: form.attr("action").map(str::to_string),
                method: form
                    .attr("method")
                    .unwrap_or("get")
                    .to_string(),
                inputs: form
                    .find_all("input", &[])
                    .iter()
                    .filter_map(|input| input.attr("name").map(str::to_string))
                    .collect(),
            })
            .collect()
    }
}

impl<'a> DocElement<'a> {
    /// Concatenated descendant text, whitespace-trimmed.
    pub fn text(&self) -> String {
        self.element.text().collect::<String>().trim().to_string()
    }

    /// Raw attribute value.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Descendant elements matching `tag` and attribute filters, in
    /// document order.
    pub fn find_all(&self, tag: &str, attrs: &[(&str, &str)]) -> Vec<DocElement<'a>> {
        let Ok(selector) = Selector::parse(tag) else {
            return Vec::new();
        };

        self.element
            .select(&selector)
            .filter(|element| {
                attrs.iter().all(|(name, expected)| {
                    match element.value().attr(name) {
                        Some(actual) if name.eq_ignore_ascii_case("class") => {
                            actual.split_whitespace().any(|token| token == *expected)
                        }
                        Some(actual) => actual == *expected,
                        None => false,
                    }
                })
            })
            .map(|element| DocElement { element })
            .collect()
    }

    /// First matching descendant.
    pub fn find_first(&self, tag: &str, attrs: &[(&str, &str)]) -> Option<DocElement<'a>> {
        self.find_all(tag, attrs).into_iter().next()
    }

    /// Name→value pairs of every hidden input under this element. Hidden
    /// fields must be echoed back unchanged on submission (commonly
    /// anti-forgery tokens); inputs without a name are skipped.
    pub fn hidden_fields(&self) -> HashMap<String, String> {
        self.find_all("input", &[])
            .iter()
            .filter(|input| {
                input
                    .attr("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
            })
            .filter_map(|input| {
                input
                    .attr("name")
                    .map(|name| (name.to_string(), input.attr("value").unwrap_or("").to_string()))
            })
            .collect()
    }

    /// Build a submission-ready descriptor from this `<form>` element.
    ///
    /// The action is resolved against the page URL so the descriptor's
    /// `action_url` is always absolute; a missing action resolves to the
    /// page URL itself. Fields start as the form's hidden inputs.
    pub fn form_descriptor(&self, page_url: &Url) -> PortalResult<FormDescriptor> {
        let action = self.attr("action").unwrap_or("");
        let action_url = if action.is_empty() {
            page_url.clone()
        } else {
            resolve_url(page_url, action)?
        };

        Ok(FormDescriptor {
            action_url: action_url.to_string(),
            method: self.attr("method").unwrap_or("post").to_string(),
            fields: self.hidden_fields(),
        })
    }
}

/// Resolve `href` against `base`. Absolute inputs pass through unchanged
/// (resolution is idempotent); relative inputs are joined against the base.
pub fn resolve_url(base: &Url, href: &str) -> PortalResult<Url> {
    base.join(href).map_err(|e| PortalError::InvalidUrl {
        input: href.to_string(),
        source: e,
    })
}
