//! Input documents and MIME-based routing.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{DocQualityError, Result};

/// MIME type used when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Which scoring policy applies to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Raster image (`image/*`): decoded and analysed pixel by pixel.
    Image,
    /// Anything else (PDF, DOCX, ...): file-size heuristic only.
    Generic,
}

impl DocumentKind {
    /// Classify a declared MIME type.
    ///
    /// Matching is ASCII case-insensitive and ignores surrounding whitespace
    /// and any `;` parameters.
    pub fn from_mime(mime_type: &str) -> Self {
        let essence = mime_type.split(';').next().unwrap_or_default().trim();
        let is_image = essence
            .get(..6)
            .map(|prefix| prefix.eq_ignore_ascii_case("image/"))
            .unwrap_or(false);

        if is_image {
            DocumentKind::Image
        } else {
            DocumentKind::Generic
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

/// A document as handed over by the upload layer.
///
/// Borrowed and read-only; the engine reads the buffer at most once per
/// assessment.
#[derive(Debug, Clone, Copy)]
pub struct RawDocument<'a> {
    bytes: &'a [u8],
    mime_type: &'a str,
    declared_size: u64,
}

impl<'a> RawDocument<'a> {
    /// Wrap caller-owned bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DocQualityError::InvalidInput`] when the buffer is empty *and*
    /// no MIME type was declared. That is a bug in the caller, not a property
    /// of the document, and it trips a debug assertion in development builds.
    pub fn new(bytes: &'a [u8], mime_type: &'a str, declared_size: u64) -> Result<Self> {
        let contract_ok = !(bytes.is_empty() && mime_type.trim().is_empty());
        debug_assert!(
            contract_ok,
            "RawDocument requires either content bytes or a declared MIME type"
        );
        if !contract_ok {
            return Err(DocQualityError::InvalidInput(
                "empty buffer with no declared MIME type".into(),
            ));
        }

        Ok(Self {
            bytes,
            mime_type,
            declared_size,
        })
    }

    /// Raw content.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Declared MIME type, as given.
    pub fn mime_type(&self) -> &'a str {
        self.mime_type
    }

    /// Declared size in bytes. Used by every file-size rule.
    pub fn declared_size(&self) -> u64 {
        self.declared_size
    }

    /// Routing decision for this document.
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_mime(self.mime_type)
    }
}

/// Guess a MIME type from a file name extension.
pub fn mime_from_path<P: AsRef<Path>>(path: P) -> String {
    mime_guess::from_path(path.as_ref())
        .first_raw()
        .unwrap_or(OCTET_STREAM)
        .to_string()
}
