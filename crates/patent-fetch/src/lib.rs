//! PatentFetch — patent number normalization, document page fetching, and
//! metadata/PDF extraction from Google Patents.

pub mod client;
pub mod extract;
pub mod identifier;
pub mod types;

pub use client::{FetchConfig, PatentClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use extract::{extract_metadata, extract_pdf_link};
pub use identifier::PatentIdentifier;
pub use types::*;
