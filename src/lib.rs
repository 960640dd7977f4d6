//! # ini_doc
//!
//! A round-trip preserving INI document engine.
//!
//! ## What is it?
//!
//! `ini_doc` parses INI text into a [`Document`], lets you edit it, and writes
//! it back without losing comments, blank lines or indentation. On top of the
//! document model it provides placeholder binding, typed value access, serde
//! mapping between structs and sections, and an optional gzip and AES-256-GCM
//! envelope around the bytes.
//!
//! ## Key Features
//!
//! - **Layout Fidelity**: Comments, blank lines and indentation survive a round trip
//! - **Configurable Dialect**: `;`/`#` comments, `=`/`:` delimiters, four bracket styles, any encoding
//! - **Value Binding**: `@{Key}` and `@{Section|Key}` placeholders with external sources and a hook
//! - **Typed Access**: Integers, floats, booleans, dates and durations with an alias table
//! - **Serde Mapping**: `#[derive(Serialize, Deserialize)]` structs to and from sections
//! - **Envelope**: Optional gzip compression and password-based encryption
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ini_doc = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Reading and Writing
//!
//! ```rust
//! let input = "; Application settings\n[Server]\nhost = localhost ; dev only\nport = 8080\n";
//!
//! let mut doc = ini_doc::from_str(input).unwrap();
//! assert_eq!(doc.value("Server", "port"), Some("8080"));
//!
//! doc.section_mut("Server").unwrap().set_value("port", "9090");
//! assert_eq!(
//!     ini_doc::to_string(&doc).unwrap(),
//!     "; Application settings\n[Server]\nhost=localhost ; dev only\nport=9090\n"
//! );
//! ```
//!
//! ### Binding Placeholders
//!
//! ```rust
//! let mut doc = ini_doc::from_str(
//!     "[Package]\nName=Example\nVersion=1.0\nFullName=@{Name} v@{Version}\n",
//! )
//! .unwrap();
//! doc.bind();
//! assert_eq!(doc.value("Package", "FullName"), Some("Example v1.0"));
//! ```
//!
//! ### Mapping Structs
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
//! #[serde(default)]
//! struct Character {
//!     #[serde(rename = "Name")]
//!     name: String,
//!     #[serde(rename = "Sword")]
//!     attack: f32,
//!     #[serde(skip)]
//!     health: u32,
//! }
//!
//! let mut doc = ini_doc::Document::default();
//! let hero = Character { name: "Hero".into(), attack: 5.5, health: 100 };
//! doc.serialize_section("Player", &hero).unwrap();
//! assert_eq!(ini_doc::to_string(&doc).unwrap(), "[Player]\nName=Hero\nSword=5.5\n");
//!
//! let back: Character = doc.deserialize_section("Player").unwrap();
//! assert_eq!(back.health, 0);
//! ```
//!
//! ### Building with the ini! Macro
//!
//! ```rust
//! use ini_doc::ini;
//!
//! let doc = ini!({
//!     "Server": { "host": "localhost", "port": 8080 }
//! });
//! assert_eq!(doc.value("server", "PORT"), Some("8080"));
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Malformed input, wrong passwords and corrupted envelopes are reported as
//!   [`Error`]s; no partially built document is ever returned
//! - Typed conversions and lookups return `Option` and never panic
//! - Writing refuses names, values and comments that would read back differently
//!
//! ## Format Reference
//!
//! The accepted dialect is described in the [`format`] module.

pub mod binding;
pub mod codec;
pub mod de;
pub mod document;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod options;
pub mod parse;
pub mod ser;
pub mod value;
pub mod write;

pub use binding::{Binding, BindingEvent, BindingHook};
pub use de::{deserialize_from, deserialize_with_format, SectionDeserializer};
pub use document::{Document, Key, Section, StyledLine};
pub use error::{Error, Result};
pub use map::{NameMap, Named};
pub use options::{
    CommentStarter, Duplication, IniOptions, KeyDelimiter, LineEnding, SectionWrapper,
};
pub use ser::{serialize_into, serialize_with_format, SectionSerializer};
pub use value::{IniValue, TypedValue, ValueKind, ValueMappings};

use std::io;

/// Parses INI text with the default dialect.
///
/// # Examples
///
/// ```rust
/// let doc = ini_doc::from_str("[Section]\nkey=value\n").unwrap();
/// assert_eq!(doc.value("section", "KEY"), Some("value"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] with the line number of the first malformed line.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Document> {
    from_str_with_options(s, IniOptions::default())
}

/// Parses INI text with a custom dialect.
///
/// Encoding, compression and encryption settings do not apply to text input;
/// use [`from_slice_with_options`] for bytes.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed lines, or [`Error::DuplicateName`]
/// when a duplication policy rejects a name.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(s: &str, options: IniOptions) -> Result<Document> {
    parse::parse_str(s, options)
}

/// Parses INI bytes with the default dialect (UTF-8, no envelope).
///
/// # Errors
///
/// Returns [`Error::Encoding`] for invalid UTF-8, or a parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Document> {
    from_slice_with_options(v, IniOptions::default())
}

/// Parses INI bytes: decrypts, decompresses and decodes them as configured first.
///
/// # Examples
///
/// ```rust
/// use ini_doc::IniOptions;
///
/// let options = IniOptions::new().with_compression(true);
/// let doc = ini_doc::from_str_with_options("[S]\nk=v\n", options.clone()).unwrap();
///
/// let bytes = ini_doc::to_vec(&doc).unwrap();
/// let back = ini_doc::from_slice_with_options(&bytes, options).unwrap();
/// assert_eq!(back, doc);
/// ```
///
/// # Errors
///
/// Returns [`Error::Decryption`] or [`Error::Decompression`] before any parsing
/// if the envelope is wrong, [`Error::Encoding`] for undecodable text, or a
/// parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options(v: &[u8], options: IniOptions) -> Result<Document> {
    let text = codec::open(v, &options)?;
    from_str_with_options(&text, options)
}

/// Reads and parses INI bytes from a reader with the default dialect.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
///
/// let doc = ini_doc::from_reader(Cursor::new(b"[S]\nk=v\n")).unwrap();
/// assert_eq!(doc.value("S", "k"), Some("v"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, or any error of [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(reader: R) -> Result<Document>
where
    R: io::Read,
{
    from_reader_with_options(reader, IniOptions::default())
}

/// Reads and parses INI bytes from a reader with a custom dialect.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, or any error of [`from_slice_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R>(mut reader: R, options: IniOptions) -> Result<Document>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice_with_options(&bytes, options)
}

/// Renders a document as text in its own dialect.
///
/// # Examples
///
/// ```rust
/// let doc = ini_doc::from_str("[S]\n\n  k = v ; note\n").unwrap();
/// assert_eq!(ini_doc::to_string(&doc).unwrap(), "[S]\n\n  k=v ; note\n");
///
/// let mut doc = ini_doc::Document::default();
/// doc.section_entry("S").set_value("k", "a ; b");
/// assert!(ini_doc::to_string(&doc).is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::Unrepresentable`] for the first name, value or comment
/// that would not read back as stored, such as a value holding a line break
/// or an unquoted comment marker.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(document: &Document) -> Result<String> {
    write::write_str(document)
}

/// Renders a document to bytes: encodes, compresses and encrypts as configured.
///
/// # Errors
///
/// Returns any error of [`to_string`], [`Error::Encoding`] if the text is not
/// representable in the configured encoding, or an envelope error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec(document: &Document) -> Result<Vec<u8>> {
    codec::seal(&to_string(document)?, document.options())
}

/// Writes a document to a writer as [`to_vec`] renders it.
///
/// # Examples
///
/// ```rust
/// let doc = ini_doc::from_str("[S]\nk=v\n").unwrap();
/// let mut buffer = Vec::new();
/// ini_doc::to_writer(&mut buffer, &doc).unwrap();
/// assert_eq!(buffer, b"[S]\nk=v\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails, or any error of [`to_vec`]. Bytes
/// may already have reached the writer when an I/O error occurs.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, document: &Document) -> Result<()>
where
    W: io::Write,
{
    let bytes = to_vec(document)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

impl Document {
    /// Reads a document from `reader` under `options`.
    ///
    /// See [`from_reader_with_options`].
    pub fn load<R: io::Read>(reader: R, options: IniOptions) -> Result<Document> {
        from_reader_with_options(reader, options)
    }

    /// Writes this document to `writer` under its own options.
    ///
    /// See [`to_writer`].
    pub fn save<W: io::Write>(&self, writer: W) -> Result<()> {
        to_writer(writer, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
    #[serde(default)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_text_round_trip() {
        let input = ";top\n[A]\nx=1\n\n[B] ;b\n  y = 2\n";
        let doc = from_str(input).unwrap();
        assert_eq!(to_string(&doc).unwrap(), ";top\n[A]\nx=1\n\n[B] ;b\n  y=2\n");
    }

    #[test]
    fn test_struct_round_trip() {
        let mut doc = Document::default();
        doc.serialize_section("Point", &Point { x: 1, y: -2 }).unwrap();
        let text = to_string(&doc).unwrap();
        let back = from_str(&text).unwrap();
        let point: Point = back.deserialize_section("point").unwrap();
        assert_eq!(point, Point { x: 1, y: -2 });
    }

    #[test]
    fn test_missing_section_reads_defaults() {
        let doc = Document::default();
        let point: Point = doc.deserialize_section("Nowhere").unwrap();
        assert_eq!(point, Point::default());
    }

    #[test]
    fn test_load_and_save() {
        let options = IniOptions::new().with_encryption_password("pwd");
        let doc = from_str_with_options("[S]\nk=v\n", options.clone()).unwrap();
        let mut bytes = Vec::new();
        doc.save(&mut bytes).unwrap();
        assert_ne!(bytes, b"[S]\nk=v\n");
        let loaded = Document::load(bytes.as_slice(), options).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_invalid_utf8_slice() {
        assert!(matches!(from_slice(b"[S]\nk=\xff\n"), Err(Error::Encoding(_))));
    }
}
