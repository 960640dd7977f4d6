//! INI Dialect Reference
//!
//! This module documents the INI dialect as read and written by this library.
//!
//! # Overview
//!
//! An INI document is a sequence of lines. Each line is blank, a comment, a
//! section header or a key. The parser keeps enough of the layout that writing
//! a parsed document reproduces the input for every line kind it accepts.
//!
//! ## Design Philosophy
//!
//! - **Fidelity**: Comments, blank lines and indentation survive a round trip
//! - **Text at rest**: Values are stored as text; types are a view on demand
//! - **Configurable dialect**: Markers, delimiters and brackets are options
//!
//! # Line Kinds
//!
//! ## Sections
//!
//! ```text
//! [Section name]
//! [Section name] ; same-line comment
//! ```
//!
//! **Rules**:
//! - The header starts with the opening wrapper (`[`, `<`, `{` or `(`)
//! - The name is everything up to the closing wrapper, taken verbatim
//! - A name may contain the closing wrapper or the comment marker: the header
//!   ends at the last closing wrapper before the first comment marker that
//!   follows a closing wrapper, so `[[;]];` is a section named `[;]` with an
//!   empty same-line comment
//! - Only whitespace or a comment may follow the header
//! - A missing closing wrapper is a parse error
//!
//! ## Keys
//!
//! ```text
//! name=value
//! name = value ; same-line comment
//! quoted = "a;b" ; the marker inside quotes belongs to the value
//! ```
//!
//! **Rules**:
//! - Name and value are split at the first delimiter (`=` or `:`)
//! - Both are trimmed; quotes are kept as part of the value
//! - A value opening with `"` may contain the comment marker up to its closing quote
//! - A key line without a delimiter is a parse error
//! - A key before the first header is a parse error unless the global section is enabled
//!
//! ## Comments
//!
//! ```text
//! ; leading comment, attached to the next header or key
//! # with the hash starter
//! ```
//!
//! Consecutive comment lines form one block. Blank lines before the block and
//! between the block and its element are counted and reproduced; blank lines
//! inside a block are dropped. A block at the end of the file is the document
//! epilogue.
//!
//! # Values
//!
//! | Kind | Accepted text | Written as |
//! |------|---------------|------------|
//! | Boolean | `true`, `false`, any case | `true` |
//! | Integer | `42`, `-7`, `+3` | `42` |
//! | Float | `2.5`, `1e3`, `inf`, `NaN` | `2.5` |
//! | Date-time | `2024-01-15T10:30:00`, `2024-01-15 10:30`, RFC 3339, `2024-01-15` | `2024-01-15 10:30:00` |
//! | Duration | `1.02:03:04.5`, `-00:30` | `1.02:03:04.5` |
//! | Array | `{a, b, c}` | `{a,b,c}` |
//!
//! Registered aliases (for example `yes` for `true`) are matched before the
//! default grammar, case-insensitively.
//!
//! # Placeholders
//!
//! ```text
//! [Paths]
//! Root=/opt/app
//! Bin=@{Root}/bin
//! Log=@{Logging|Dir}/app.log
//! ```
//!
//! `@{name}` refers to a key in the same section, then anywhere in the
//! document; `@{Section|Key}` refers to one key directly. Markers are
//! configurable.
//!
//! # Envelope
//!
//! | Layer | Format |
//! |-------|--------|
//! | Compression | gzip (RFC 1952) |
//! | Encryption | `INIE`, version byte, 16-byte salt, 12-byte nonce, AES-256-GCM ciphertext and tag; key from Argon2id |
//!
//! # Limitations
//!
//! - No nested sections and no multi-line values
//! - A value that is not quoted cannot contain the comment marker
//! - Tabs in indentation are written back as spaces
//! - Same-line comments cannot span lines; newlines in them are written as spaces
