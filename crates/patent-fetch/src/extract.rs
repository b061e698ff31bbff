//! Field extraction from patent document pages.
//!
//! Each metadata field is located by its own prioritized chain of selector
//! strategies, tried in order until one yields a non-empty value. Chains are
//! independent: a selector that stops matching after a site redesign loses
//! exactly one field, and a missing field degrades to an empty value instead
//! of failing the page. Selectors track the current markup of the source site
//! and are expected to need periodic maintenance.

use scraper::{ElementRef, Html, Selector};
use tracing::trace;
use url::Url;

use crate::types::PatentInfo;

/// How a strategy reads its value once the selector matched.
#[derive(Clone, Copy)]
enum Read {
    /// Element text, whitespace-collapsed.
    Text,
    /// `content` attribute, falling back to element text.
    ContentOrText,
    /// Named attribute, verbatim.
    Attr(&'static str),
}

/// One prioritized way of locating a field in the page.
struct FieldStrategy {
    name: &'static str,
    selector: &'static str,
    read: Read,
}

impl FieldStrategy {
    fn read_value(&self, el: &ElementRef<'_>) -> Option<String> {
        let raw = match self.read {
            Read::Text => element_text(el),
            Read::ContentOrText => el
                .value()
                .attr("content")
                .map(str::to_string)
                .unwrap_or_else(|| element_text(el)),
            Read::Attr(name) => el.value().attr(name)?.to_string(),
        };
        let value = tidy(&raw);
        (!value.is_empty()).then_some(value)
    }
}

const TITLE: &[FieldStrategy] = &[
    FieldStrategy {
        name: "itemprop-title",
        selector: r#"span[itemprop="title"]"#,
        read: Read::Text,
    },
    FieldStrategy {
        name: "dc-title",
        selector: r#"meta[name="DC.title"]"#,
        read: Read::Attr("content"),
    },
    FieldStrategy {
        name: "h1",
        selector: "h1",
        read: Read::Text,
    },
];

const INVENTORS: &[FieldStrategy] = &[
    FieldStrategy {
        name: "itemprop-inventor",
        selector: r#"[itemprop="inventor"]"#,
        read: Read::ContentOrText,
    },
    FieldStrategy {
        name: "dc-contributor-inventor",
        selector: r#"meta[name="DC.contributor"][scheme="inventor"]"#,
        read: Read::Attr("content"),
    },
];

const ASSIGNEE: &[FieldStrategy] = &[
    FieldStrategy {
        name: "itemprop-assignee",
        selector: r#"[itemprop="assignee"]"#,
        read: Read::ContentOrText,
    },
    FieldStrategy {
        name: "itemprop-assignee-original",
        selector: r#"[itemprop="assigneeOriginal"]"#,
        read: Read::ContentOrText,
    },
    FieldStrategy {
        name: "dc-contributor-assignee",
        selector: r#"meta[name="DC.contributor"][scheme="assignee"]"#,
        read: Read::Attr("content"),
    },
];

const PUBLICATION_DATE: &[FieldStrategy] = &[
    FieldStrategy {
        name: "time-publication-date",
        selector: r#"time[itemprop="publicationDate"]"#,
        read: Read::Text,
    },
    FieldStrategy {
        name: "itemprop-publication-date",
        selector: r#"[itemprop="publicationDate"]"#,
        read: Read::ContentOrText,
    },
    FieldStrategy {
        name: "dc-date",
        selector: r#"meta[name="DC.date"]"#,
        read: Read::Attr("content"),
    },
];

const ABSTRACT: &[FieldStrategy] = &[
    FieldStrategy {
        name: "itemprop-abstract",
        selector: r#"[itemprop="abstract"]"#,
        read: Read::Text,
    },
    FieldStrategy {
        name: "dc-description",
        selector: r#"meta[name="DC.description"]"#,
        read: Read::Attr("content"),
    },
    FieldStrategy {
        name: "meta-description",
        selector: r#"meta[name="description"]"#,
        read: Read::Attr("content"),
    },
];

const PDF_DIRECT: &[FieldStrategy] = &[
    FieldStrategy {
        name: "itemprop-pdf-link",
        selector: r#"a[itemprop="pdfLink"]"#,
        read: Read::Attr("href"),
    },
    FieldStrategy {
        name: "citation-pdf-url",
        selector: r#"meta[name="citation_pdf_url"]"#,
        read: Read::Attr("content"),
    },
];

/// Extract the metadata record from a document page.
///
/// Always returns a fully-formed [`PatentInfo`]: fields the page does not
/// carry come back empty, and one field's absence never affects another.
pub fn extract_metadata(html: &str, patent_number: &str, page_url: &str) -> PatentInfo {
    let document = Html::parse_document(html);

    PatentInfo {
        patent_number: patent_number.to_string(),
        title: first_match(&document, TITLE).unwrap_or_default(),
        inventors: all_matches(&document, INVENTORS),
        assignee: first_match(&document, ASSIGNEE).unwrap_or_default(),
        publication_date: first_match(&document, PUBLICATION_DATE).unwrap_or_default(),
        abstract_text: first_match(&document, ABSTRACT).unwrap_or_default(),
        url: page_url.to_string(),
    }
}

/// Locate the best PDF candidate link on a document page.
///
/// Tries the page's own PDF markup first, then falls back to scanning
/// anchors for download-shaped targets. Relative links are resolved against
/// `page_url`. A page without any candidate is an expected outcome and
/// returns `None`, not an error.
pub fn extract_pdf_link(html: &str, page_url: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let href = first_match(&document, PDF_DIRECT).or_else(|| pdf_from_anchors(&document))?;
    Some(resolve_href(&href, page_url))
}

/// Apply a chain in order, returning the first non-empty value.
fn first_match(document: &Html, chain: &[FieldStrategy]) -> Option<String> {
    for strategy in chain {
        if let Ok(sel) = Selector::parse(strategy.selector) {
            if let Some(value) = document.select(&sel).find_map(|el| strategy.read_value(&el)) {
                trace!(strategy = strategy.name, "field strategy matched");
                return Some(value);
            }
        }
    }
    None
}

/// Apply a chain in order, returning every non-empty value from the first
/// strategy that yields at least one. Used for repeated fields.
fn all_matches(document: &Html, chain: &[FieldStrategy]) -> Vec<String> {
    for strategy in chain {
        if let Ok(sel) = Selector::parse(strategy.selector) {
            let values: Vec<String> = document
                .select(&sel)
                .filter_map(|el| strategy.read_value(&el))
                .collect();
            if !values.is_empty() {
                trace!(strategy = strategy.name, count = values.len(), "field strategy matched");
                return values;
            }
        }
    }
    Vec::new()
}

/// Scan anchors for download-shaped targets: a PDF target mentioning
/// download, then explicit "Download PDF" link text, then bare download
/// paths.
fn pdf_from_anchors(document: &Html) -> Option<String> {
    let sel = Selector::parse("a[href]").ok()?;
    let anchors: Vec<(String, String)> = document
        .select(&sel)
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            if href.is_empty() {
                return None;
            }
            Some((href.to_string(), tidy(&element_text(&el)).to_lowercase()))
        })
        .collect();

    anchors
        .iter()
        .find(|(href, text)| {
            let h = href.to_lowercase();
            h.contains("pdf") && (h.contains("download") || text.contains("download"))
        })
        .or_else(|| anchors.iter().find(|(_, text)| text == "download pdf"))
        .or_else(|| {
            anchors.iter().find(|(href, _)| {
                let h = href.to_lowercase();
                h.contains("/download") || h.contains("download=true")
            })
        })
        .map(|(href, _)| href.clone())
}

fn resolve_href(href: &str, page_url: &str) -> String {
    match Url::parse(page_url).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}

fn tidy(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://patents.google.com/patent/WO2013078254A1/en";

    fn full_page() -> &'static str {
        r#"
        <html><head>
        <meta name="DC.title" content="Morinda citrifolia based formulations" />
        </head><body>
        <span itemprop="title">Morinda citrifolia based formulations</span>
        <dd itemprop="inventor">Jane Doe</dd>
        <dd itemprop="inventor">John Roe</dd>
        <dd itemprop="assignee">Acme Botanicals</dd>
        <time itemprop="publicationDate">2013-05-30</time>
        <section itemprop="abstract">
            <div>Formulations and methods for treating conditions.</div>
        </section>
        <a itemprop="pdfLink" href="https://patentimages.example.com/WO2013078254A1.pdf">Download PDF</a>
        </body></html>
        "#
    }

    #[test]
    fn test_full_page_extraction() {
        let info = extract_metadata(full_page(), "WO2013078254A1", PAGE_URL);
        assert_eq!(info.patent_number, "WO2013078254A1");
        assert_eq!(info.title, "Morinda citrifolia based formulations");
        assert_eq!(info.inventors, vec!["Jane Doe", "John Roe"]);
        assert_eq!(info.assignee, "Acme Botanicals");
        assert_eq!(info.publication_date, "2013-05-30");
        assert_eq!(
            info.abstract_text,
            "Formulations and methods for treating conditions."
        );
        assert_eq!(info.url, PAGE_URL);
    }

    #[test]
    fn test_missing_inventors_leaves_other_fields_intact() {
        let html = r#"
        <html><body>
        <span itemprop="title">Widget</span>
        <dd itemprop="assignee">Acme</dd>
        <section itemprop="abstract">A widget.</section>
        </body></html>
        "#;
        let info = extract_metadata(html, "US1A", PAGE_URL);
        assert!(info.inventors.is_empty());
        assert_eq!(info.title, "Widget");
        assert_eq!(info.assignee, "Acme");
        assert_eq!(info.abstract_text, "A widget.");
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let html = "<html><body><h1>Fallback Title</h1></body></html>";
        let info = extract_metadata(html, "US1A", PAGE_URL);
        assert_eq!(info.title, "Fallback Title");
    }

    #[test]
    fn test_title_prefers_itemprop_over_h1() {
        let html = r#"
        <html><body>
        <h1>Page Heading</h1>
        <span itemprop="title">Real Title</span>
        </body></html>
        "#;
        let info = extract_metadata(html, "US1A", PAGE_URL);
        assert_eq!(info.title, "Real Title");
    }

    #[test]
    fn test_inventors_from_contributor_meta() {
        let html = r#"
        <html><head>
        <meta name="DC.contributor" content="Jane Doe" scheme="inventor" />
        <meta name="DC.contributor" content="Acme Botanicals" scheme="assignee" />
        </head><body></body></html>
        "#;
        let info = extract_metadata(html, "US1A", PAGE_URL);
        assert_eq!(info.inventors, vec!["Jane Doe"]);
        assert_eq!(info.assignee, "Acme Botanicals");
    }

    #[test]
    fn test_empty_page_degrades_to_empty_fields() {
        let info = extract_metadata("<html><body></body></html>", "US1A", PAGE_URL);
        assert_eq!(info.title, "");
        assert!(info.inventors.is_empty());
        assert_eq!(info.assignee, "");
        assert_eq!(info.publication_date, "");
        assert_eq!(info.abstract_text, "");
        assert_eq!(info.patent_number, "US1A");
        assert_eq!(info.url, PAGE_URL);
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let html = "<html><body><span itemprop=\"title\">  Spread \n   Out\tTitle  </span></body></html>";
        let info = extract_metadata(html, "US1A", PAGE_URL);
        assert_eq!(info.title, "Spread Out Title");
    }

    #[test]
    fn test_pdf_link_from_itemprop() {
        let link = extract_pdf_link(full_page(), PAGE_URL);
        assert_eq!(
            link.as_deref(),
            Some("https://patentimages.example.com/WO2013078254A1.pdf")
        );
    }

    #[test]
    fn test_pdf_link_from_citation_meta() {
        let html = r#"
        <html><head>
        <meta name="citation_pdf_url" content="https://patentimages.example.com/doc.pdf" />
        </head><body></body></html>
        "#;
        let link = extract_pdf_link(html, PAGE_URL);
        assert_eq!(
            link.as_deref(),
            Some("https://patentimages.example.com/doc.pdf")
        );
    }

    #[test]
    fn test_pdf_link_from_anchor_resolves_relative_href() {
        let html = r#"
        <html><body>
        <a href="/downloads/WO2013078254A1.pdf">Download PDF</a>
        </body></html>
        "#;
        let link = extract_pdf_link(html, PAGE_URL);
        assert_eq!(
            link.as_deref(),
            Some("https://patents.google.com/downloads/WO2013078254A1.pdf")
        );
    }

    #[test]
    fn test_pdf_link_from_download_query_param() {
        let html = r#"
        <html><body>
        <a href="https://example.com/doc?download=true">Get document</a>
        </body></html>
        "#;
        let link = extract_pdf_link(html, PAGE_URL);
        assert_eq!(link.as_deref(), Some("https://example.com/doc?download=true"));
    }

    #[test]
    fn test_pdf_link_absent_is_none() {
        let html = r#"
        <html><body>
        <a href="/patent/WO2013078254A1/en">Self link</a>
        <span itemprop="title">Widget</span>
        </body></html>
        "#;
        assert_eq!(extract_pdf_link(html, PAGE_URL), None);
    }
}
