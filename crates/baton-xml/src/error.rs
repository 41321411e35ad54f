//! Error types for the interchange codec.
//!
//! Parsing is the only operation in the system that fails with an error;
//! [`XmlError`] wraps the underlying reader's message. There is no partial
//! recovery: callers catch the error and surface it.

use std::io;

use thiserror::Error;

/// Errors produced while reading or writing interchange XML.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The document is not well-formed XML.
    #[error("invalid XML: {0}")]
    Parse(#[from] quick_xml::Error),

    /// An attribute could not be decoded.
    #[error("invalid XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// An escape sequence could not be resolved.
    #[error("invalid escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// The document is well-formed but missing required structure.
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
