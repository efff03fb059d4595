//! Raw request input and document text extraction
//!
//! A request carries either inline text or an uploaded document. The HTTP
//! layer resolves which one into an [`Input`] once, and [`Input::into_text`]
//! turns it into plain text for the normalizer.

use crate::error::{Error, Result};
use tracing::debug;

/// What a client sent us to classify
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Inline email text
    Text(String),

    /// Uploaded document
    File {
        /// Client-supplied filename, used only to pick the reader
        name: String,
        /// Raw file contents
        bytes: Vec<u8>,
    },
}

impl Input {
    /// Resolve the optional form fields of a request into one input.
    ///
    /// A file wins over inline text whenever its filename is non-blank.
    pub fn from_parts(raw_text: Option<String>, file: Option<(String, Vec<u8>)>) -> Self {
        match file {
            Some((name, bytes)) if !name.trim().is_empty() => Self::File {
                name: name.trim().to_string(),
                bytes,
            },
            _ => Self::Text(raw_text.unwrap_or_default()),
        }
    }

    /// Extract the text content of this input.
    ///
    /// PDF extraction is CPU-bound; async callers should run this on a
    /// blocking thread.
    pub fn into_text(self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::File { name, bytes } => {
                let kind = DocumentKind::from_filename(&name)?;
                debug!(file = %name, size = bytes.len(), ?kind, "Extracting uploaded document");
                match kind {
                    DocumentKind::PlainText => Ok(decode_utf8_lossy_dropping(&bytes)),
                    DocumentKind::Pdf => extract_pdf(&bytes),
                }
            }
        }
    }
}

/// Document formats we know how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
}

impl DocumentKind {
    /// Pick a reader from the filename extension (case-insensitive).
    pub fn from_filename(name: &str) -> Result<Self> {
        let lower = name.trim().to_lowercase();
        if lower.ends_with(".txt") {
            Ok(Self::PlainText)
        } else if lower.ends_with(".pdf") {
            Ok(Self::Pdf)
        } else {
            Err(Error::unsupported_format(name.trim()))
        }
    }
}

/// Extract the text of every page of a PDF, in page order.
pub fn extract_pdf(data: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed inputs instead of returning Err,
    // e.g. a page without a MediaBox. Needs panic = "unwind".
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
        .map_err(|_| Error::extraction("malformed PDF"))?
        .map_err(|e| Error::extraction(e.to_string()))
}

/// Decode UTF-8, silently skipping invalid byte sequences.
pub fn decode_utf8_lossy_dropping(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(len) => bytes = &rest[len..],
                    // Truncated sequence at the very end
                    None => return out,
                }
            }
        }
    }
}
