//! Certificate rendering: a declarative template plus a PDF adapter.

pub mod layout;
pub mod metrics;
mod pdf;

pub use layout::{Block, certificate_blocks};
pub use pdf::{PageSetup, render_blocks};

use crate::photo::PhotoAsset;
use crate::record::BeneficiaryRecord;

const DOCUMENT_TITLE: &str = "Life Certificate";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to load font {font}: {message}")]
    Font { font: &'static str, message: String },
    #[error("failed to embed photo: {0}")]
    Image(String),
    #[error("failed to write pdf: {0}")]
    Save(String),
}

/// A finished PDF, kept in memory until the caller decides where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDocument {
    bytes: Vec<u8>,
}

impl CertificateDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Renders the life certificate for `record` on US Letter pages.
///
/// Every field is printed as stored, so a default record produces a
/// certificate full of `N/A`. The photo, when present, sits between the
/// certification paragraph and the details table.
pub fn render(
    record: &BeneficiaryRecord,
    photo: Option<&PhotoAsset>,
) -> Result<CertificateDocument, RenderError> {
    let blocks = certificate_blocks(record, photo);
    let bytes = render_blocks(&blocks, DOCUMENT_TITLE, &PageSetup::letter())?;
    Ok(CertificateDocument { bytes })
}
