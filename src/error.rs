//! Error types for INI parsing, serialization, binding and the envelope codecs.
//!
//! ## Error Categories
//!
//! - **Parse Errors**: Malformed lines, reported with their 1-based line number
//! - **Name Collisions**: Duplicate sections or keys under [`Duplication::Disallowed`]
//! - **Envelope Errors**: Wrong password, corrupted ciphertext or corrupted compressed data
//! - **Encoding Errors**: Bytes that the configured text encoding cannot represent
//! - **Write Errors**: Names, values or comments the dialect cannot write back unchanged
//! - **Mapping Errors**: Keys that cannot be converted into a struct field
//!
//! Structural failures (parse, decrypt, decompress) abort the whole load and no
//! partially built [`Document`](crate::Document) is ever returned. Typed value
//! conversion and lookups never produce an `Error`; they return `Option`.
//!
//! ## Examples
//!
//! ```rust
//! use ini_doc::{from_str, Error};
//!
//! let result = from_str("[Section\nkey=value");
//! match result {
//!     Err(Error::Parse { line, .. }) => assert_eq!(line, 1),
//!     _ => panic!("expected a parse error"),
//! }
//! ```
//!
//! [`Duplication::Disallowed`]: crate::Duplication::Disallowed

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by the engine.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed line with its 1-based number
    #[error("Parse error at line {line}: {msg}\n{context}{suggestion}")]
    Parse {
        line: usize,
        msg: String,
        context: String,
        suggestion: String,
    },

    /// A section or key name collided under a rejecting duplication policy
    #[error("Duplicate {kind} name: '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    /// Global section requested while the dialect does not allow one
    #[error("Global section is disabled for this document")]
    GlobalSectionDisabled,

    /// Wrong password or corrupted ciphertext
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Corrupted or truncated compressed content
    #[error("Decompression failed: {0}")]
    Decompression(String),

    /// Encryption or compression could not produce output
    #[error("Envelope error: {0}")]
    Envelope(String),

    /// Text not representable in, or not decodable from, the configured encoding
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// An element that would read back differently from how it is written
    #[error("Cannot write {element}: {reason}")]
    Unrepresentable { element: String, reason: String },

    /// A present key could not be converted to the requested field type
    #[error("Cannot convert key '{key}' to {expected}")]
    Conversion { key: String, expected: String },

    /// Unsupported type for section mapping
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),

    /// Message reported by a `Deserialize` implementation, such as an unknown variant
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a parse error for the given 1-based line.
    ///
    /// Use [`Error::syntax_with_context`] to include the offending line and a hint.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ini_doc::Error;
    ///
    /// let err = Error::syntax(10, "missing key delimiter");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, msg: &str) -> Self {
        Error::Parse {
            line,
            msg: msg.to_string(),
            context: String::new(),
            suggestion: String::new(),
        }
    }

    /// Creates a parse error with the offending line and an optional suggestion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ini_doc::Error;
    ///
    /// let err = Error::syntax_with_context(
    ///     3,
    ///     "section header is not closed",
    ///     "[Section",
    ///     Some("Did you mean '[Section]'?"),
    /// );
    /// assert!(err.to_string().contains("Help:"));
    /// ```
    pub fn syntax_with_context(
        line: usize,
        msg: &str,
        context: &str,
        suggestion: Option<&str>,
    ) -> Self {
        Error::Parse {
            line,
            msg: msg.to_string(),
            context: context.to_string(),
            suggestion: suggestion
                .map(|s| format!("\nHelp: {}", s))
                .unwrap_or_default(),
        }
    }

    /// Creates a duplicate-name error for a section or a key.
    pub fn duplicate(kind: &'static str, name: &str) -> Self {
        Error::DuplicateName {
            kind,
            name: name.to_string(),
        }
    }

    /// Creates a write error for an element the dialect cannot represent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ini_doc::Error;
    ///
    /// let err = Error::unrepresentable("key 'path'", "value contains a line break");
    /// assert_eq!(err.to_string(), "Cannot write key 'path': value contains a line break");
    /// ```
    pub fn unrepresentable(element: &str, reason: &str) -> Self {
        Error::Unrepresentable {
            element: element.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a conversion error for a mapped key.
    pub fn conversion(key: &str, expected: &str) -> Self {
        Error::Conversion {
            key: key.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Creates an unsupported type error for values that cannot live in a single key.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ini_doc::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader or writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the 1-based line number for parse errors.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
