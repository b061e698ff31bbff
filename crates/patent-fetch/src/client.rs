//! Fetch-and-download pipeline against the patent document site.
//!
//! One client instance wraps a configured `reqwest::Client` and performs
//! straight-line operations: build the document URL, fetch the page, extract
//! metadata or the PDF link, optionally save the PDF. Every call is a single
//! attempt with a bounded timeout. There is no retry and no backoff; a
//! failed request is terminal for that call and callers re-invoke the whole
//! pipeline if they want another attempt.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::extract::{extract_metadata, extract_pdf_link};
use crate::identifier::PatentIdentifier;
use crate::types::{PatentError, PatentInfo, PatentResult};

/// Public patent document site the client talks to by default.
pub const DEFAULT_BASE_URL: &str = "https://patents.google.com";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// HTTP client configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the patent document site.
    pub base_url: String,
    /// Timeout applied to each outbound request.
    pub timeout: Duration,
    /// User-agent header identifying this client to the site.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

/// Descriptive identifier so the target site can attribute traffic.
fn default_user_agent() -> String {
    format!(
        "patent-fetch/{} (+https://github.com/patent-fetch/patent-fetch)",
        env!("CARGO_PKG_VERSION")
    )
}

/// Client for fetching patent pages, metadata, and PDF documents.
///
/// Holds no per-request state; a single instance can serve any number of
/// independent calls.
#[derive(Debug, Clone)]
pub struct PatentClient {
    http: reqwest::Client,
    config: FetchConfig,
}

impl PatentClient {
    /// Build a client from explicit configuration.
    pub fn new(config: FetchConfig) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self { http, config }
    }

    /// Build a client with the documented defaults.
    pub fn with_defaults() -> Self {
        Self::new(FetchConfig::default())
    }

    /// The configuration the client was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Document page URL for a canonical identifier. Pure string work.
    pub fn patent_url(&self, id: &PatentIdentifier) -> String {
        format!(
            "{}/patent/{}/en",
            self.config.base_url.trim_end_matches('/'),
            id.canonical()
        )
    }

    /// Fetch the document page for a patent with a single GET.
    ///
    /// A 404 maps to [`PatentError::NotFound`], connection and timeout
    /// failures to [`PatentError::Network`], and anything else that is not
    /// the document page (unexpected status, redirect to a challenge
    /// interstitial) to [`PatentError::Blocked`].
    pub async fn fetch_page(&self, id: &PatentIdentifier) -> PatentResult<String> {
        let url = self.patent_url(id);
        debug!("fetching document page {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_send_error(&url, e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        if status == 404 {
            return Err(PatentError::NotFound {
                patent_number: id.canonical().to_string(),
                url,
            });
        }
        if status != 200 {
            return Err(PatentError::Blocked {
                url,
                status,
                detail: format!("unexpected status {status}"),
            });
        }
        if is_challenge_url(&final_url) {
            return Err(PatentError::Blocked {
                url,
                status,
                detail: format!("redirected to challenge page {final_url}"),
            });
        }

        response.text().await.map_err(|e| PatentError::Network {
            url: self.patent_url(id),
            detail: e.to_string(),
        })
    }

    /// Fetch and parse the metadata record for a patent.
    ///
    /// Invalid identifiers and fetch failures surface as distinct errors;
    /// missing page fields do not, they come back empty in the record.
    pub async fn get_patent_info(&self, patent_number: &str) -> PatentResult<PatentInfo> {
        let id = PatentIdentifier::parse(patent_number)?;
        let html = self.fetch_page(&id).await?;
        Ok(extract_metadata(&html, id.canonical(), &self.patent_url(&id)))
    }

    /// Fetch the PDF bytes for a patent without touching the filesystem.
    pub async fn download_patent_data(&self, patent_number: &str) -> PatentResult<Vec<u8>> {
        let id = PatentIdentifier::parse(patent_number)?;
        let page_url = self.patent_url(&id);
        let html = self.fetch_page(&id).await?;
        let pdf_url = extract_pdf_link(&html, &page_url).ok_or_else(|| {
            PatentError::PdfUnavailable {
                patent_number: id.canonical().to_string(),
            }
        })?;
        self.fetch_pdf(&id, &page_url, &pdf_url).await
    }

    /// Download a patent PDF into `output_dir` as `<canonical>.pdf`.
    ///
    /// Returns `true` only when the file is fully written. Every failure in
    /// the chain, including an invalid patent number, collapses to `false`,
    /// and no partial file is left behind.
    pub async fn download_patent(&self, patent_number: &str, output_dir: impl AsRef<Path>) -> bool {
        match self.try_download(patent_number, output_dir.as_ref()).await {
            Ok(path) => {
                info!("downloaded patent {patent_number} to {}", path.display());
                true
            }
            Err(err) => {
                warn!("download of patent {patent_number} failed: {err}");
                false
            }
        }
    }

    /// Download several patents, one request chain at a time.
    ///
    /// Each input maps to its own outcome exactly once, keyed by the string
    /// as supplied. One patent's failure never aborts the rest.
    pub async fn download_patents<S: AsRef<str>>(
        &self,
        patent_numbers: &[S],
        output_dir: impl AsRef<Path>,
    ) -> BTreeMap<String, bool> {
        let output_dir = output_dir.as_ref();
        let mut results = BTreeMap::new();

        for number in patent_numbers {
            let number = number.as_ref();
            let ok = self.download_patent(number, output_dir).await;
            results.insert(number.to_string(), ok);
        }

        results
    }

    async fn try_download(&self, patent_number: &str, output_dir: &Path) -> PatentResult<PathBuf> {
        let id = PatentIdentifier::parse(patent_number)?;
        tokio::fs::create_dir_all(output_dir).await?;

        let page_url = self.patent_url(&id);
        let html = self.fetch_page(&id).await?;
        let pdf_url = extract_pdf_link(&html, &page_url).ok_or_else(|| {
            PatentError::PdfUnavailable {
                patent_number: id.canonical().to_string(),
            }
        })?;
        let bytes = self.fetch_pdf(&id, &page_url, &pdf_url).await?;
        write_pdf_atomically(output_dir, id.canonical(), bytes).await
    }

    /// Fetch PDF bytes, sending the document page as referer.
    async fn fetch_pdf(
        &self,
        id: &PatentIdentifier,
        referer: &str,
        pdf_url: &str,
    ) -> PatentResult<Vec<u8>> {
        debug!("fetching PDF {pdf_url}");

        let response = self
            .http
            .get(pdf_url)
            .header(reqwest::header::REFERER, referer)
            .header(
                reqwest::header::ACCEPT,
                "application/pdf,application/octet-stream,*/*",
            )
            .send()
            .await
            .map_err(|e| classify_send_error(pdf_url, e))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(PatentError::NotFound {
                patent_number: id.canonical().to_string(),
                url: pdf_url.to_string(),
            });
        }
        if status != 200 {
            return Err(PatentError::Blocked {
                url: pdf_url.to_string(),
                status,
                detail: format!("unexpected status {status}"),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let bytes = response.bytes().await.map_err(|e| PatentError::Network {
            url: pdf_url.to_string(),
            detail: e.to_string(),
        })?;

        if !content_type.contains("pdf") && !bytes.starts_with(b"%PDF") {
            warn!(
                "response for {pdf_url} does not look like a PDF (content-type: {content_type:?})"
            );
        }

        Ok(bytes.to_vec())
    }
}

/// Write PDF bytes under `dir` as `<canonical>.pdf` via a uniquely named
/// temporary file renamed into place, so a failed transfer or write never
/// leaves a partial file at the target path.
async fn write_pdf_atomically(dir: &Path, canonical: &str, bytes: Vec<u8>) -> PatentResult<PathBuf> {
    let target = dir.join(format!("{canonical}.pdf"));

    let dir = dir.to_path_buf();
    let persist_to = target.clone();
    tokio::task::spawn_blocking(move || -> PatentResult<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.persist(&persist_to).map_err(|e| PatentError::Io(e.error))?;
        Ok(())
    })
    .await
    .map_err(|e| PatentError::Internal(format!("write task failed: {e}")))??;

    Ok(target)
}

fn classify_send_error(url: &str, err: reqwest::Error) -> PatentError {
    if err.is_redirect() {
        return PatentError::Blocked {
            url: url.to_string(),
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            detail: "redirect limit exceeded".to_string(),
        };
    }
    PatentError::Network {
        url: url.to_string(),
        detail: err.to_string(),
    }
}

/// Redirect targets that mean the site refused automated access.
fn is_challenge_url(final_url: &str) -> bool {
    final_url.contains("/sorry/") || final_url.contains("consent.google.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patent_url_shape() {
        let client = PatentClient::with_defaults();
        let id = PatentIdentifier::parse("wo 2013078254 a1").unwrap();
        assert_eq!(
            client.patent_url(&id),
            "https://patents.google.com/patent/WO2013078254A1/en"
        );
    }

    #[test]
    fn test_patent_url_trims_trailing_slash() {
        let client = PatentClient::new(FetchConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..FetchConfig::default()
        });
        let id = PatentIdentifier::parse("US9876543B2").unwrap();
        assert_eq!(
            client.patent_url(&id),
            "http://localhost:8080/patent/US9876543B2/en"
        );
    }

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.user_agent.starts_with("patent-fetch/"));
    }

    #[test]
    fn test_challenge_url_detection() {
        assert!(is_challenge_url(
            "https://www.google.com/sorry/index?continue=x"
        ));
        assert!(is_challenge_url("https://consent.google.com/m?continue=x"));
        assert!(!is_challenge_url(
            "https://patents.google.com/patent/US1A/en"
        ));
    }

    #[tokio::test]
    async fn test_invalid_identifier_collapses_to_false() {
        let dir = tempfile::tempdir().unwrap();
        let client = PatentClient::with_defaults();
        // No request is made for an invalid number, so this is offline-safe.
        assert!(!client.download_patent("NOT A PATENT!", dir.path()).await);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_get_patent_info_rejects_invalid_identifier() {
        let client = PatentClient::with_defaults();
        let err = client.get_patent_info("12345").await.unwrap_err();
        assert!(matches!(err, PatentError::InvalidIdentifier { .. }));
    }
}
