//! Dialect configuration for reading and writing INI documents.
//!
//! This module provides the types that describe an INI dialect:
//!
//! - [`IniOptions`]: Main configuration struct
//! - [`CommentStarter`]: Character that starts a comment (`;` or `#`)
//! - [`KeyDelimiter`]: Character between a key's name and its value (`=` or `:`)
//! - [`SectionWrapper`]: Bracket pair around section names
//! - [`Duplication`]: Policy applied when a section or key name repeats
//! - [`LineEnding`]: Line terminator written by the serializer
//!
//! Options are copied into a [`Document`](crate::Document) when it is created;
//! later changes to the original value have no effect on that document.
//!
//! ## Examples
//!
//! ```rust
//! use ini_doc::{IniOptions, CommentStarter, KeyDelimiter, SectionWrapper};
//!
//! let options = IniOptions::new()
//!     .with_comment_starter(CommentStarter::Hash)
//!     .with_key_delimiter(KeyDelimiter::Colon)
//!     .with_space_around_delimiter(true)
//!     .with_section_wrapper(SectionWrapper::CurlyBrackets);
//!
//! let doc = ini_doc::from_str_with_options("{Server}\nport : 8080\n", options).unwrap();
//! assert_eq!(doc.section("server").and_then(|s| s.value("PORT")), Some("8080"));
//! ```

use encoding_rs::Encoding;

/// Character that starts a comment.
///
/// # Examples
///
/// ```rust
/// use ini_doc::CommentStarter;
///
/// assert_eq!(CommentStarter::Semicolon.as_char(), ';');
/// assert_eq!(CommentStarter::Hash.as_char(), '#');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CommentStarter {
    #[default]
    Semicolon,
    Hash,
}

impl CommentStarter {
    /// Returns the character this starter is written as.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            CommentStarter::Semicolon => ';',
            CommentStarter::Hash => '#',
        }
    }
}

/// Character separating a key's name from its value.
///
/// # Examples
///
/// ```rust
/// use ini_doc::KeyDelimiter;
///
/// assert_eq!(KeyDelimiter::Equal.as_char(), '=');
/// assert_eq!(KeyDelimiter::Colon.as_char(), ':');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyDelimiter {
    #[default]
    Equal,
    Colon,
}

impl KeyDelimiter {
    /// Returns the character this delimiter is written as.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            KeyDelimiter::Equal => '=',
            KeyDelimiter::Colon => ':',
        }
    }
}

/// Bracket pair wrapped around section names.
///
/// # Examples
///
/// ```rust
/// use ini_doc::SectionWrapper;
///
/// assert_eq!(SectionWrapper::SquareBrackets.chars(), ('[', ']'));
/// assert_eq!(SectionWrapper::Parentheses.chars(), ('(', ')'));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SectionWrapper {
    #[default]
    SquareBrackets,
    AngleBrackets,
    CurlyBrackets,
    Parentheses,
}

impl SectionWrapper {
    /// Returns the opening and closing characters.
    #[must_use]
    pub const fn chars(&self) -> (char, char) {
        match self {
            SectionWrapper::SquareBrackets => ('[', ']'),
            SectionWrapper::AngleBrackets => ('<', '>'),
            SectionWrapper::CurlyBrackets => ('{', '}'),
            SectionWrapper::Parentheses => ('(', ')'),
        }
    }

    #[must_use]
    pub const fn start(&self) -> char {
        self.chars().0
    }

    #[must_use]
    pub const fn end(&self) -> char {
        self.chars().1
    }
}

/// What happens when a section or key is added under a name that already exists.
///
/// Name comparison follows the case-sensitivity flags of [`IniOptions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Duplication {
    /// The later item replaces the earlier one, which keeps its position.
    ///
    /// While parsing, a repeated section header re-opens the existing section
    /// so that the keys of both blocks end up in it.
    #[default]
    Overwrite,
    /// The add fails with [`Error::DuplicateName`](crate::Error::DuplicateName).
    Disallowed,
    /// The earlier item wins and the later one is discarded.
    Ignored,
}

/// Line terminator written by the serializer. Both are accepted when reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Default display name of the global section.
pub const GLOBAL_SECTION_NAME: &str = "$global";

/// Default limit on how deep binding follows references between keys.
pub const DEFAULT_BINDING_DEPTH: usize = 16;

/// Configuration of an INI dialect and of the byte envelope around it.
///
/// # Examples
///
/// ```rust
/// use ini_doc::{IniOptions, Duplication};
///
/// // Defaults: `;` comments, `=` delimiter, `[]` sections, UTF-8
/// let options = IniOptions::new();
/// assert_eq!(options.key_duplicate, Duplication::Overwrite);
///
/// // Keys before the first header go into a global section
/// let options = IniOptions::new().with_global_section(true);
/// assert!(options.allow_global_section);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct IniOptions {
    pub comment_starter: CommentStarter,
    pub key_delimiter: KeyDelimiter,
    pub space_around_delimiter: bool,
    pub section_wrapper: SectionWrapper,
    pub encoding: &'static Encoding,
    pub line_ending: LineEnding,
    pub section_duplicate: Duplication,
    pub key_duplicate: Duplication,
    pub section_name_case_sensitive: bool,
    pub key_name_case_sensitive: bool,
    pub allow_global_section: bool,
    pub global_section_name: String,
    pub encryption_password: Option<String>,
    pub compression: bool,
    pub placeholder_open: String,
    pub placeholder_close: String,
    pub binding_depth: usize,
    pub date_time_format: Option<String>,
}

impl Default for IniOptions {
    fn default() -> Self {
        IniOptions {
            comment_starter: CommentStarter::default(),
            key_delimiter: KeyDelimiter::default(),
            space_around_delimiter: false,
            section_wrapper: SectionWrapper::default(),
            encoding: encoding_rs::UTF_8,
            line_ending: LineEnding::default(),
            section_duplicate: Duplication::default(),
            key_duplicate: Duplication::default(),
            section_name_case_sensitive: false,
            key_name_case_sensitive: false,
            allow_global_section: false,
            global_section_name: GLOBAL_SECTION_NAME.to_string(),
            encryption_password: None,
            compression: false,
            placeholder_open: "@{".to_string(),
            placeholder_close: "}".to_string(),
            binding_depth: DEFAULT_BINDING_DEPTH,
            date_time_format: None,
        }
    }
}

impl IniOptions {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ini_doc::{IniOptions, CommentStarter};
    ///
    /// let options = IniOptions::new();
    /// assert_eq!(options.comment_starter, CommentStarter::Semicolon);
    /// assert!(!options.compression);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_comment_starter(mut self, starter: CommentStarter) -> Self {
        self.comment_starter = starter;
        self
    }

    #[must_use]
    pub fn with_key_delimiter(mut self, delimiter: KeyDelimiter) -> Self {
        self.key_delimiter = delimiter;
        self
    }

    /// Writes `key = value` instead of `key=value`.
    #[must_use]
    pub fn with_space_around_delimiter(mut self, spaced: bool) -> Self {
        self.space_around_delimiter = spaced;
        self
    }

    #[must_use]
    pub fn with_section_wrapper(mut self, wrapper: SectionWrapper) -> Self {
        self.section_wrapper = wrapper;
        self
    }

    /// Sets the text encoding used for the byte-level entry points.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ini_doc::IniOptions;
    ///
    /// let options = IniOptions::new().with_encoding(encoding_rs::WINDOWS_1252);
    /// assert_eq!(options.encoding.name(), "windows-1252");
    /// ```
    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    #[must_use]
    pub fn with_section_duplicate(mut self, policy: Duplication) -> Self {
        self.section_duplicate = policy;
        self
    }

    #[must_use]
    pub fn with_key_duplicate(mut self, policy: Duplication) -> Self {
        self.key_duplicate = policy;
        self
    }

    #[must_use]
    pub fn with_section_name_case_sensitive(mut self, sensitive: bool) -> Self {
        self.section_name_case_sensitive = sensitive;
        self
    }

    #[must_use]
    pub fn with_key_name_case_sensitive(mut self, sensitive: bool) -> Self {
        self.key_name_case_sensitive = sensitive;
        self
    }

    /// Allows keys before the first section header.
    #[must_use]
    pub fn with_global_section(mut self, allow: bool) -> Self {
        self.allow_global_section = allow;
        self
    }

    #[must_use]
    pub fn with_global_section_name(mut self, name: &str) -> Self {
        self.global_section_name = name.to_string();
        self
    }

    /// Encrypts on save and decrypts on load. An empty password disables encryption.
    #[must_use]
    pub fn with_encryption_password(mut self, password: &str) -> Self {
        self.encryption_password = if password.is_empty() {
            None
        } else {
            Some(password.to_string())
        };
        self
    }

    /// Compresses on save and decompresses on load.
    #[must_use]
    pub fn with_compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the markers around placeholder names, `@{` and `}` by default.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ini_doc::IniOptions;
    ///
    /// let options = IniOptions::new().with_placeholder_markers("${", "}");
    /// assert_eq!(options.placeholder_open, "${");
    /// ```
    #[must_use]
    pub fn with_placeholder_markers(mut self, open: &str, close: &str) -> Self {
        self.placeholder_open = open.to_string();
        self.placeholder_close = close.to_string();
        self
    }

    /// Sets how many keys deep binding follows a chain of references.
    #[must_use]
    pub fn with_binding_depth(mut self, depth: usize) -> Self {
        self.binding_depth = depth.max(1);
        self
    }

    /// Sets a `chrono` format string tried before the invariant date-time formats.
    #[must_use]
    pub fn with_date_time_format(mut self, format: &str) -> Self {
        self.date_time_format = Some(format.to_string());
        self
    }

    pub(crate) fn password(&self) -> Option<&str> {
        self.encryption_password
            .as_deref()
            .filter(|password| !password.is_empty())
    }
}
