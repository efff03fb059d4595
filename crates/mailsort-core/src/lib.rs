//! mailsort Core
//!
//! Core types and utilities shared across mailsort components.
//!
//! This crate provides:
//! - Category, provenance and reply types
//! - Error types and result handling
//! - Request input resolution and document text extraction
//! - Text normalization applied before any classification

// Extraction turns pdf-extract panics into errors, which abort would defeat
#[cfg(panic = "abort")]
compile_error!("mailsort-core requires panic = \"unwind\"");

pub mod error;
pub mod input;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use input::{DocumentKind, Input};
pub use text::{normalize, MAX_CHARS};
pub use types::{Category, Provenance, ReplyBundle};
