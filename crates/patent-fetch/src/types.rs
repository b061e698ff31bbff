//! Core data types for patent metadata and fetch outcomes.

use serde::{Deserialize, Serialize};

/// Metadata extracted from a patent's document page.
///
/// Every field is always present: data the page did not carry is the empty
/// string (or empty vec), never a missing field. The shape of this struct is
/// identical across requests, so downstream consumers never branch on
/// presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentInfo {
    /// Canonical patent number the record was fetched for.
    pub patent_number: String,
    /// Patent title, empty if the page carried none.
    pub title: String,
    /// Inventor names in page order.
    pub inventors: Vec<String>,
    /// Assignee name, empty if absent.
    pub assignee: String,
    /// Publication date as printed on the page (not parsed).
    pub publication_date: String,
    /// Abstract text. Serialized as `abstract`; the Rust field dodges the keyword.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Document page URL the record was extracted from.
    pub url: String,
}

/// Errors that can occur while normalizing, fetching, or downloading.
#[derive(thiserror::Error, Debug)]
pub enum PatentError {
    /// Input did not normalize to the accepted patent-number grammar.
    #[error("invalid patent number '{input}': {reason}")]
    InvalidIdentifier { input: String, reason: String },

    /// The document page responded 404.
    #[error("patent {patent_number} not found ({url})")]
    NotFound { patent_number: String, url: String },

    /// The site answered with something other than the document page,
    /// either an unexpected status or a redirect to a challenge page.
    #[error("request blocked by source site (HTTP {status}) for {url}: {detail}")]
    Blocked {
        url: String,
        status: u16,
        detail: String,
    },

    /// Connection or timeout failure before any usable response.
    #[error("network error fetching {url}: {detail}")]
    Network { url: String, detail: String },

    /// The document page exists but exposes no PDF link.
    #[error("no PDF link found for patent {patent_number}")]
    PdfUnavailable { patent_number: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience result type.
pub type PatentResult<T> = Result<T, PatentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abstract_wire_name() {
        let info = PatentInfo {
            patent_number: "WO2013078254A1".into(),
            title: "Widget".into(),
            inventors: vec!["A. Inventor".into()],
            assignee: String::new(),
            publication_date: String::new(),
            abstract_text: "Some abstract".into(),
            url: "https://patents.google.com/patent/WO2013078254A1/en".into(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["abstract"], "Some abstract");
        assert!(json.get("abstract_text").is_none());
        // Empty fields still serialize, the shape never changes.
        assert_eq!(json["assignee"], "");
    }

    #[test]
    fn test_info_round_trip() {
        let info = PatentInfo {
            patent_number: "US9876543B2".into(),
            title: "Widget".into(),
            inventors: vec![],
            assignee: "Acme".into(),
            publication_date: "2018-01-23".into(),
            abstract_text: String::new(),
            url: "https://patents.google.com/patent/US9876543B2/en".into(),
        };
        let json = serde_json::to_string(&info).unwrap();
        let back: PatentInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn test_error_display() {
        let e = PatentError::NotFound {
            patent_number: "EP0000001A1".into(),
            url: "https://patents.google.com/patent/EP0000001A1/en".into(),
        };
        assert!(e.to_string().contains("EP0000001A1"));

        let e = PatentError::InvalidIdentifier {
            input: "12345".into(),
            reason: "missing office code".into(),
        };
        assert!(e.to_string().contains("12345"));
        assert!(e.to_string().contains("office"));
    }
}
