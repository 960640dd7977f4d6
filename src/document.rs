//! In-memory model of an INI document.
//!
//! ## Core Types
//!
//! - [`Document`]: Ordered sections plus the dialect, alias table and epilogue
//! - [`Section`]: Named, ordered group of keys with its own formatting
//! - [`Key`]: Name/value pair; the value is always stored as text
//! - [`StyledLine`]: Comment text, indentation and preceding blank lines
//!
//! Every section and key carries two styled lines. The leading one holds the
//! comment block written above the element, the trailing one holds a comment
//! written on the same line after it.
//!
//! ## Examples
//!
//! ```rust
//! use ini_doc::{Document, IniOptions};
//!
//! let mut doc = Document::new(IniOptions::default());
//! let section = doc.add_section("Package").unwrap();
//! section.set_value("Name", "Example");
//! section.set_value("Version", "1.0");
//!
//! assert_eq!(ini_doc::to_string(&doc).unwrap(), "[Package]\nName=Example\nVersion=1.0\n");
//! ```

use crate::error::{Error, Result};
use crate::map::{Named, NameMap};
use crate::options::{Duplication, IniOptions};
use crate::value::{self, IniValue, ValueMappings};

/// Comment text with its indentation and the count of blank lines before it.
///
/// `text` is `None` when there is no comment; `Some("")` is a bare comment
/// marker. Multi-line comments are joined with `\n` and share one
/// indentation: a block takes its first line's, and every line is written
/// with it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub text: Option<String>,
    pub indentation: usize,
    pub empty_lines_before: usize,
}

impl StyledLine {
    /// Creates a styled line holding `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        StyledLine {
            text: Some(text.to_string()),
            indentation: 0,
            empty_lines_before: 0,
        }
    }

    #[must_use]
    pub fn with_indentation(mut self, indentation: usize) -> Self {
        self.indentation = indentation;
        self
    }

    #[must_use]
    pub fn with_empty_lines_before(mut self, count: usize) -> Self {
        self.empty_lines_before = count;
        self
    }

    #[must_use]
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Iterates over the comment's lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.as_deref().into_iter().flat_map(|text| text.split('\n'))
    }
}

/// A name/value pair.
///
/// # Examples
///
/// ```rust
/// use ini_doc::Key;
///
/// let mut key = Key::new("Retries", "3");
/// assert_eq!(key.try_parse::<u32>(), Some(3));
///
/// key.set_typed(&2.5f64);
/// assert_eq!(key.value(), "2.5");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Key {
    name: String,
    pub value: String,
    pub indentation: usize,
    pub leading_comment: StyledLine,
    pub trailing_comment: StyledLine,
}

impl Key {
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Key {
            name: name.to_string(),
            value: value.to_string(),
            indentation: 0,
            leading_comment: StyledLine::default(),
            trailing_comment: StyledLine::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Parses the value with the default grammar of `T`.
    ///
    /// Use [`Document::parse_value`] to take the document's alias table into account.
    #[must_use]
    pub fn try_parse<T: IniValue>(&self) -> Option<T> {
        T::parse_text(&self.value, None)
    }

    /// Formats `value` and stores it as this key's text.
    pub fn set_typed<T: IniValue>(&mut self, value: &T) {
        self.value = value.to_text(None);
    }

    /// Splits a `{a, b, c}` value into its trimmed items.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ini_doc::Key;
    ///
    /// let key = Key::new("Ports", "{80, 443}");
    /// assert_eq!(key.values(), Some(vec!["80".to_string(), "443".to_string()]));
    /// assert_eq!(key.try_parse_values::<u16>(), Some(vec![80, 443]));
    /// ```
    #[must_use]
    pub fn values(&self) -> Option<Vec<String>> {
        value::parse_array(&self.value)
    }

    /// Stores `items` as a `{a,b,c}` value.
    pub fn set_values<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.value = value::format_array(items);
    }

    /// Parses every item of an array value. Fails if any item fails.
    #[must_use]
    pub fn try_parse_values<T: IniValue>(&self) -> Option<Vec<T>> {
        self.values()?
            .iter()
            .map(|item| T::parse_text(item, None))
            .collect()
    }

    #[must_use]
    pub fn with_leading_comment(mut self, comment: StyledLine) -> Self {
        self.leading_comment = comment;
        self
    }

    #[must_use]
    pub fn with_trailing_comment(mut self, comment: StyledLine) -> Self {
        self.trailing_comment = comment;
        self
    }

    #[must_use]
    pub fn with_indentation(mut self, indentation: usize) -> Self {
        self.indentation = indentation;
        self
    }
}

impl Named for Key {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// A named, ordered group of keys.
///
/// A section created with [`Section::new`] compares key names
/// case-insensitively and overwrites duplicates. Adding it to a document
/// re-indexes its keys under the document's policy.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    name: String,
    global: bool,
    keys: NameMap<Key>,
    key_duplicate: Duplication,
    pub indentation: usize,
    pub leading_comment: StyledLine,
    pub trailing_comment: StyledLine,
}

impl Section {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Section {
            name: name.to_string(),
            global: false,
            keys: NameMap::new(false),
            key_duplicate: Duplication::Overwrite,
            indentation: 0,
            leading_comment: StyledLine::default(),
            trailing_comment: StyledLine::default(),
        }
    }

    pub(crate) fn with_options(name: &str, options: &IniOptions) -> Self {
        let mut section = Section::new(name);
        section.adopt(options);
        section
    }

    /// Applies the key policy of `options` to this section.
    pub(crate) fn adopt(&mut self, options: &IniOptions) {
        self.key_duplicate = options.key_duplicate;
        self.keys.set_case_sensitive(options.key_name_case_sensitive);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the header-less section holding keys before the first header.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.global
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &Key> + ExactSizeIterator {
        self.keys.iter()
    }

    pub fn keys_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Key> + ExactSizeIterator {
        self.keys.iter_mut()
    }

    #[must_use]
    pub fn key(&self, name: &str) -> Option<&Key> {
        self.keys.get(name)
    }

    pub fn key_mut(&mut self, name: &str) -> Option<&mut Key> {
        self.keys.get_mut(name)
    }

    #[must_use]
    pub fn key_at(&self, index: usize) -> Option<&Key> {
        self.keys.get_index(index)
    }

    pub fn key_at_mut(&mut self, index: usize) -> Option<&mut Key> {
        self.keys.get_index_mut(index)
    }

    #[must_use]
    pub fn key_index(&self, name: &str) -> Option<usize> {
        self.keys.index_of(name)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.keys.contains(name)
    }

    /// Returns the value of the named key.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.keys.get(name).map(Key::value)
    }

    /// Adds a key at the end, honoring the duplication policy.
    ///
    /// Returns the key now stored under that name.
    pub fn add_key(&mut self, name: &str, value: &str) -> Result<&mut Key> {
        self.push_key(Key::new(name, value))
    }

    /// Adds a copy of `key` at the end, honoring the duplication policy.
    ///
    /// Under [`Duplication::Overwrite`] the new key replaces the old one at
    /// its position; under [`Duplication::Ignored`] the existing key is kept.
    pub fn push_key(&mut self, key: Key) -> Result<&mut Key> {
        let index = match self.keys.index_of(key.name()) {
            None => self.keys.insert(key).0,
            Some(index) => match self.key_duplicate {
                Duplication::Overwrite => self.keys.insert(key).0,
                Duplication::Disallowed => return Err(Error::duplicate("key", key.name())),
                Duplication::Ignored => index,
            },
        };
        self.keys
            .get_index_mut(index)
            .ok_or_else(|| Error::custom("key index out of range"))
    }

    /// Inserts `key` at `index`, honoring the duplication policy.
    pub fn insert_key(&mut self, index: usize, key: Key) -> Result<()> {
        if self.keys.contains(key.name()) {
            match self.key_duplicate {
                Duplication::Overwrite => {}
                Duplication::Disallowed => return Err(Error::duplicate("key", key.name())),
                Duplication::Ignored => return Ok(()),
            }
        }
        self.keys.insert_at(index, key);
        Ok(())
    }

    /// Sets the value of the named key, creating it at the end if missing.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> &mut Key {
        let key = self.keys.get_or_insert_with(name, || Key::new(name, ""));
        key.value = value.into();
        key
    }

    pub fn remove_key(&mut self, name: &str) -> Option<Key> {
        self.keys.remove(name)
    }

    pub fn remove_key_at(&mut self, index: usize) -> Option<Key> {
        self.keys.remove_index(index)
    }

    /// Renames a key in place.
    ///
    /// Returns `Ok(false)` when `old` does not exist, or when `new` is taken
    /// and the policy is [`Duplication::Ignored`]. Under
    /// [`Duplication::Overwrite`] the key previously named `new` is removed.
    pub fn rename_key(&mut self, old: &str, new: &str) -> Result<bool> {
        let Some(index) = self.keys.index_of(old) else {
            return Ok(false);
        };
        if let Some(taken) = self.keys.index_of(new).filter(|&taken| taken != index) {
            match self.key_duplicate {
                Duplication::Overwrite => {
                    self.keys.remove_index(taken);
                }
                Duplication::Disallowed => return Err(Error::duplicate("key", new)),
                Duplication::Ignored => return Ok(false),
            }
        }
        let index = self.keys.index_of(old).unwrap_or(index);
        self.keys.rename_index(index, new);
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Writes the fields of `value` as keys of this section.
    ///
    /// See [`serialize_into`](crate::serialize_into).
    pub fn serialize<T: ?Sized + serde::Serialize>(&mut self, value: &T) -> Result<()> {
        crate::ser::serialize_into(self, value)
    }

    /// Builds a `T` from the keys of this section.
    ///
    /// See [`deserialize_from`](crate::deserialize_from).
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self, mappings: &ValueMappings) -> Result<T> {
        crate::de::deserialize_from(self, mappings)
    }

    #[must_use]
    pub fn with_leading_comment(mut self, comment: StyledLine) -> Self {
        self.leading_comment = comment;
        self
    }

    #[must_use]
    pub fn with_trailing_comment(mut self, comment: StyledLine) -> Self {
        self.trailing_comment = comment;
        self
    }
}

impl Named for Section {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// An INI document: ordered sections under one dialect.
///
/// # Examples
///
/// ```rust
/// let mut doc = ini_doc::from_str("[Server]\nport=8080\n").unwrap();
/// doc.section_entry("Server").set_value("host", "localhost");
///
/// let port: Option<u16> = doc.parse_value("server", "PORT");
/// assert_eq!(port, Some(8080));
/// assert_eq!(ini_doc::to_string(&doc).unwrap(), "[Server]\nport=8080\nhost=localhost\n");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    options: IniOptions,
    sections: NameMap<Section>,
    mappings: ValueMappings,
    /// Comment block and blank lines after the last element.
    pub epilogue: StyledLine,
}

impl Default for Document {
    fn default() -> Self {
        Document::new(IniOptions::default())
    }
}

impl Document {
    #[must_use]
    pub fn new(options: IniOptions) -> Self {
        Document {
            sections: NameMap::new(options.section_name_case_sensitive),
            options,
            mappings: ValueMappings::default(),
            epilogue: StyledLine::default(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &IniOptions {
        &self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> impl DoubleEndedIterator<Item = &Section> + ExactSizeIterator {
        self.sections.iter()
    }

    pub fn sections_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = &mut Section> + ExactSizeIterator {
        self.sections.iter_mut()
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    #[must_use]
    pub fn section_at(&self, index: usize) -> Option<&Section> {
        self.sections.get_index(index)
    }

    pub fn section_at_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_index_mut(index)
    }

    #[must_use]
    pub fn section_index(&self, name: &str) -> Option<usize> {
        self.sections.index_of(name)
    }

    #[must_use]
    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains(name)
    }

    /// Returns the value of `key` in `section`.
    #[must_use]
    pub fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.value(key)
    }

    /// Adds an empty section at the end, honoring the duplication policy.
    pub fn add_section(&mut self, name: &str) -> Result<&mut Section> {
        let section = Section::with_options(name, &self.options);
        self.push_section(section)
    }

    /// Adds `section` at the end, re-indexing its keys under this document's policy.
    ///
    /// Under [`Duplication::Overwrite`] the new section replaces the old one at
    /// its position; under [`Duplication::Ignored`] the existing one is kept.
    pub fn push_section(&mut self, mut section: Section) -> Result<&mut Section> {
        section.adopt(&self.options);
        section.global = false;
        let index = match self.sections.index_of(section.name()) {
            None => self.sections.insert(section).0,
            Some(index) => match self.options.section_duplicate {
                Duplication::Overwrite => self.sections.insert(section).0,
                Duplication::Disallowed => {
                    return Err(Error::duplicate("section", section.name()))
                }
                Duplication::Ignored => index,
            },
        };
        self.sections
            .get_index_mut(index)
            .ok_or_else(|| Error::custom("section index out of range"))
    }

    /// Inserts `section` at `index`. The global section always stays first.
    pub fn insert_section(&mut self, index: usize, mut section: Section) -> Result<()> {
        section.adopt(&self.options);
        section.global = false;
        if self.sections.contains(section.name()) {
            match self.options.section_duplicate {
                Duplication::Overwrite => {}
                Duplication::Disallowed => {
                    return Err(Error::duplicate("section", section.name()))
                }
                Duplication::Ignored => return Ok(()),
            }
        }
        let floor = usize::from(self.global_section().is_some());
        self.sections.insert_at(index.max(floor), section);
        Ok(())
    }

    /// Returns the named section, creating an empty one at the end if missing.
    pub fn section_entry(&mut self, name: &str) -> &mut Section {
        let options = &self.options;
        self.sections
            .get_or_insert_with(name, || Section::with_options(name, options))
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.remove(name)
    }

    pub fn remove_section_at(&mut self, index: usize) -> Option<Section> {
        self.sections.remove_index(index)
    }

    /// Renames a section in place. Collisions follow the same rules as
    /// [`Section::rename_key`].
    pub fn rename_section(&mut self, old: &str, new: &str) -> Result<bool> {
        let Some(index) = self.sections.index_of(old) else {
            return Ok(false);
        };
        if let Some(taken) = self.sections.index_of(new).filter(|&taken| taken != index) {
            match self.options.section_duplicate {
                Duplication::Overwrite => {
                    self.sections.remove_index(taken);
                }
                Duplication::Disallowed => return Err(Error::duplicate("section", new)),
                Duplication::Ignored => return Ok(false),
            }
        }
        let index = self.sections.index_of(old).unwrap_or(index);
        self.sections.rename_index(index, new);
        Ok(true)
    }

    #[must_use]
    pub fn global_section(&self) -> Option<&Section> {
        self.sections.get_index(0).filter(|section| section.global)
    }

    /// Returns the global section, creating it in first position if missing.
    ///
    /// # Errors
    ///
    /// [`Error::GlobalSectionDisabled`] unless the dialect allows a global section.
    pub fn global_section_mut(&mut self) -> Result<&mut Section> {
        if !self.options.allow_global_section {
            return Err(Error::GlobalSectionDisabled);
        }
        let exists = self.global_section().is_some();
        if !exists {
            let mut section = Section::with_options(&self.options.global_section_name, &self.options);
            section.global = true;
            self.sections.insert_at(0, section);
        }
        self.sections
            .get_index_mut(0)
            .ok_or_else(|| Error::custom("global section missing"))
    }

    /// The alias table consulted by typed access and the section mapper.
    #[must_use]
    pub fn value_mappings(&self) -> &ValueMappings {
        &self.mappings
    }

    pub fn value_mappings_mut(&mut self) -> &mut ValueMappings {
        &mut self.mappings
    }

    /// Parses the value of `key` in `section` as `T`, consulting the alias table first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let mut doc = ini_doc::from_str("[Flags]\nenabled=Yes\n").unwrap();
    /// assert_eq!(doc.parse_value::<bool>("Flags", "enabled"), None);
    ///
    /// doc.value_mappings_mut().add("yes", true).unwrap();
    /// assert_eq!(doc.parse_value::<bool>("Flags", "enabled"), Some(true));
    /// ```
    #[must_use]
    pub fn parse_value<T: IniValue>(&self, section: &str, key: &str) -> Option<T> {
        let text = self.value(section, key)?;
        self.parse_text(text)
    }

    /// Parses `text` as `T` with this document's alias table and date-time format.
    #[must_use]
    pub fn parse_text<T: IniValue>(&self, text: &str) -> Option<T> {
        value::try_parse(text, &self.mappings, self.options.date_time_format.as_deref())
    }

    /// Formats `value` with this document's date-time format and stores it,
    /// creating the section and key if missing.
    pub fn set_typed<T: IniValue>(&mut self, section: &str, key: &str, value: &T) -> &mut Key {
        let text = value.to_text(self.options.date_time_format.as_deref());
        self.section_entry(section).set_value(key, text)
    }

    /// Writes the fields of `value` into the named section, creating it if missing.
    ///
    /// Date-times written through [`value::date_time`](crate::value::date_time) use the configured
    /// format. On error the document is left unchanged.
    pub fn serialize_section<T: ?Sized + serde::Serialize>(
        &mut self,
        name: &str,
        value: &T,
    ) -> Result<()> {
        let format = self.options.date_time_format.clone();
        if let Some(section) = self.sections.get_mut(name) {
            return crate::ser::serialize_with_format(section, value, format.as_deref());
        }
        let mut section = Section::with_options(name, &self.options);
        crate::ser::serialize_with_format(&mut section, value, format.as_deref())?;
        self.push_section(section).map(|_| ())
    }

    /// Builds a `T` from the named section. A missing section reads as an empty one.
    pub fn deserialize_section<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T> {
        let format = self.options.date_time_format.as_deref();
        match self.section(name) {
            Some(section) => crate::de::deserialize_with_format(section, &self.mappings, format),
            None => {
                let empty = Section::with_options(name, &self.options);
                crate::de::deserialize_with_format(&empty, &self.mappings, format)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> IniOptions {
        IniOptions::default()
    }

    #[test]
    fn test_add_and_lookup_case_insensitive() {
        let mut doc = Document::new(options());
        doc.add_section("Section").unwrap().add_key("Key", "Value").unwrap();
        assert_eq!(doc.value("SECTION", "key"), Some("Value"));
    }

    #[test]
    fn test_disallowed_duplicate_section() {
        let mut doc = Document::new(options().with_section_duplicate(Duplication::Disallowed));
        doc.add_section("A").unwrap();
        let err = doc.add_section("a").unwrap_err();
        assert!(matches!(err, Error::DuplicateName { kind: "section", .. }));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_overwrite_duplicate_key_keeps_position() {
        let mut doc = Document::new(options());
        let section = doc.add_section("S").unwrap();
        section.add_key("a", "1").unwrap();
        section.add_key("b", "2").unwrap();
        section.add_key("A", "3").unwrap();
        let pairs: Vec<_> = section.keys().map(|k| (k.name(), k.value())).collect();
        assert_eq!(pairs, vec![("A", "3"), ("b", "2")]);
    }

    #[test]
    fn test_ignored_duplicate_key() {
        let mut doc = Document::new(options().with_key_duplicate(Duplication::Ignored));
        let section = doc.add_section("S").unwrap();
        section.add_key("a", "1").unwrap();
        let kept = section.add_key("a", "2").unwrap();
        assert_eq!(kept.value(), "1");
    }

    #[test]
    fn test_global_section_disabled() {
        let mut doc = Document::new(options());
        assert!(matches!(doc.global_section_mut(), Err(Error::GlobalSectionDisabled)));
    }

    #[test]
    fn test_global_section_stays_first() {
        let mut doc = Document::new(options().with_global_section(true));
        doc.add_section("A").unwrap();
        doc.global_section_mut().unwrap().set_value("g", "1");
        doc.insert_section(0, Section::new("B")).unwrap();
        let names: Vec<_> = doc.sections().map(Section::name).collect();
        assert_eq!(names, vec!["$global", "B", "A"]);
        assert!(doc.section_at(0).unwrap().is_global());
    }

    #[test]
    fn test_copy_section_reindexes_keys() {
        let mut source = Document::new(options());
        let section = source.add_section("S").unwrap();
        section.add_key("Key", "1").unwrap();

        let mut target = Document::new(options().with_key_name_case_sensitive(true));
        let copy = source.section("S").unwrap().clone();
        target.push_section(copy).unwrap();
        let copied = target.section("S").unwrap();
        assert!(copied.key("Key").is_some());
        assert!(copied.key("key").is_none());

        source.section_mut("S").unwrap().set_value("Key", "2");
        assert_eq!(target.value("S", "Key"), Some("1"));
    }

    #[test]
    fn test_rename_key_collision_policies() {
        let mut section = Section::new("S");
        section.add_key("a", "1").unwrap();
        section.add_key("b", "2").unwrap();
        assert!(section.rename_key("a", "b").unwrap());
        let pairs: Vec<_> = section.keys().map(|k| (k.name(), k.value())).collect();
        assert_eq!(pairs, vec![("b", "1")]);

        let mut doc = Document::new(options().with_key_duplicate(Duplication::Disallowed));
        let section = doc.add_section("S").unwrap();
        section.add_key("a", "1").unwrap();
        section.add_key("b", "2").unwrap();
        assert!(section.rename_key("a", "b").is_err());
        assert!(section.rename_key("a", "A").unwrap());
        assert_eq!(section.key_at(0).map(Key::name), Some("A"));
    }

    #[test]
    fn test_rename_section() {
        let mut doc = Document::new(options());
        doc.add_section("One").unwrap();
        doc.add_section("Two").unwrap();
        assert!(doc.rename_section("One", "First").unwrap());
        assert!(!doc.rename_section("Missing", "Other").unwrap());
        let names: Vec<_> = doc.sections().map(Section::name).collect();
        assert_eq!(names, vec!["First", "Two"]);
    }

    #[test]
    fn test_key_arrays() {
        let mut key = Key::new("List", "");
        key.set_values(["a", "b", "c"]);
        assert_eq!(key.value(), "{a,b,c}");
        assert_eq!(key.values().map(|v| v.len()), Some(3));
        assert_eq!(Key::new("n", "{1, x}").try_parse_values::<i32>(), None);
    }

    #[test]
    fn test_styled_line_lines() {
        let line = StyledLine::new("first\nsecond");
        assert_eq!(line.lines().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(StyledLine::default().lines().count(), 0);
    }
}
