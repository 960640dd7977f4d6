//! Line-oriented parser building a [`Document`] from text.
//!
//! Each line is classified as blank, comment, section header or key. Blank
//! lines and comment lines are held back and attached to the next header or
//! key, so that the writer can reproduce them:
//!
//! ```text
//!                       <- leading.empty_lines_before
//! ; about the key       <- leading.text
//!                       <- trailing.empty_lines_before
//!   key = value  ; note <- indentation, value, trailing.indentation, trailing.text
//! ```
//!
//! Whatever is pending at the end of the input becomes the document's epilogue.
//!
//! ## Examples
//!
//! ```rust
//! use ini_doc::IniOptions;
//!
//! let doc = ini_doc::parse::parse_str(";about\n[Section] ; note\nkey = value\n", IniOptions::default())
//!     .unwrap();
//! let section = doc.section("Section").unwrap();
//! assert_eq!(section.leading_comment.text.as_deref(), Some("about"));
//! assert_eq!(section.trailing_comment.text.as_deref(), Some(" note"));
//! assert_eq!(section.value("key"), Some("value"));
//! ```

use crate::document::{Document, Key, Section, StyledLine};
use crate::error::{Error, Result};
use crate::options::{Duplication, IniOptions};
use log::{debug, trace};

/// Where the keys of the current block go.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Target {
    /// No header seen yet
    Start,
    Section(usize),
    /// A duplicate section ignored by policy
    Discard,
}

/// Builds a [`Document`] one line at a time.
pub struct Parser {
    document: Document,
    line: usize,
    target: Target,
    pending_empty: usize,
    pending_comment: Option<StyledLine>,
    empty_after_comment: usize,
    comment: char,
    delimiter: char,
    spaced: bool,
    open: char,
    close: char,
}

impl Parser {
    #[must_use]
    pub fn new(options: IniOptions) -> Self {
        let (open, close) = options.section_wrapper.chars();
        Parser {
            comment: options.comment_starter.as_char(),
            delimiter: options.key_delimiter.as_char(),
            spaced: options.space_around_delimiter,
            open,
            close,
            document: Document::new(options),
            line: 0,
            target: Target::Start,
            pending_empty: 0,
            pending_comment: None,
            empty_after_comment: 0,
        }
    }

    /// Parses all of `input` and returns the finished document.
    pub fn parse(mut self, input: &str) -> Result<Document> {
        for (index, line) in input.lines().enumerate() {
            self.line = index + 1;
            self.read_line(line)?;
        }
        Ok(self.finish())
    }

    fn read_line(&mut self, line: &str) -> Result<()> {
        let content = line.trim_start();
        if content.trim_end().is_empty() {
            if self.pending_comment.is_some() {
                self.empty_after_comment += 1;
            } else {
                self.pending_empty += 1;
            }
            return Ok(());
        }
        let indentation = line[..line.len() - content.len()].chars().count();

        if let Some(text) = content.strip_prefix(self.comment) {
            self.read_comment(indentation, text);
            Ok(())
        } else if content.starts_with(self.open) {
            self.read_section(indentation, content)
        } else {
            self.read_key(indentation, content)
        }
    }

    fn read_comment(&mut self, indentation: usize, text: &str) {
        match &mut self.pending_comment {
            // Later lines take the block's indentation
            Some(comment) => {
                if let Some(existing) = comment.text.as_mut() {
                    existing.push('\n');
                    existing.push_str(text);
                }
                // Blank lines inside a comment block are not kept
                self.empty_after_comment = 0;
            }
            None => {
                self.pending_comment = Some(StyledLine {
                    text: Some(text.to_string()),
                    indentation,
                    empty_lines_before: std::mem::take(&mut self.pending_empty),
                });
            }
        }
    }

    /// Takes the pending leading comment and the blank lines after it.
    fn take_leading(&mut self) -> (StyledLine, usize) {
        match self.pending_comment.take() {
            Some(comment) => (comment, std::mem::take(&mut self.empty_after_comment)),
            None => (
                StyledLine {
                    text: None,
                    indentation: 0,
                    empty_lines_before: std::mem::take(&mut self.pending_empty),
                },
                0,
            ),
        }
    }

    /// Splits `rest` into an optional same-line comment and its indentation.
    fn trailing_comment(&self, rest: &str, empty_lines_before: usize) -> Option<StyledLine> {
        let text = rest.trim_start();
        let comment = text.strip_prefix(self.comment)?;
        Some(StyledLine {
            text: Some(comment.to_string()),
            indentation: rest[..rest.len() - text.len()].chars().count(),
            empty_lines_before,
        })
    }

    fn read_section(&mut self, indentation: usize, content: &str) -> Result<()> {
        let body = &content[self.open.len_utf8()..];
        let Some(end) = header_end(body, self.comment, self.close) else {
            return Err(Error::syntax_with_context(
                self.line,
                "section header is not closed",
                content,
                Some(&format!("Close the section name with '{}'", self.close)),
            ));
        };
        let name = &body[..end];
        let rest = &body[end + self.close.len_utf8()..];

        let (leading, empty_after_comment) = self.take_leading();
        let trailing = if rest.trim().is_empty() {
            StyledLine {
                empty_lines_before: empty_after_comment,
                ..StyledLine::default()
            }
        } else {
            self.trailing_comment(rest, empty_after_comment).ok_or_else(|| {
                Error::syntax_with_context(
                    self.line,
                    "unexpected text after section header",
                    content,
                    Some(&format!(
                        "Start a comment with '{}' or move the text to its own line",
                        self.comment
                    )),
                )
            })?
        };

        let policy = self.document.options().section_duplicate;
        match self.document.section_index(name) {
            None => {
                let mut section = Section::new(name)
                    .with_leading_comment(leading)
                    .with_trailing_comment(trailing);
                section.indentation = indentation;
                self.document.push_section(section)?;
                self.target = Target::Section(self.document.len() - 1);
                trace!("line {}: section [{}]", self.line, name);
            }
            Some(index) => match policy {
                Duplication::Overwrite => {
                    self.target = Target::Section(index);
                    trace!("line {}: re-opened section [{}]", self.line, name);
                }
                Duplication::Disallowed => return Err(Error::duplicate("section", name)),
                Duplication::Ignored => {
                    self.target = Target::Discard;
                    trace!("line {}: ignored duplicate section [{}]", self.line, name);
                }
            },
        }
        Ok(())
    }

    fn read_key(&mut self, indentation: usize, content: &str) -> Result<()> {
        let Some(position) = content.find(self.delimiter) else {
            return Err(Error::syntax_with_context(
                self.line,
                "key has no delimiter",
                content,
                Some(&format!("Write the key as 'name{}value'", self.delimiter)),
            ));
        };
        let name = content[..position].trim_end();
        let rest = &content[position + self.delimiter.len_utf8()..];
        let (value_part, comment_part) = split_value(rest, self.comment);
        let value = value_part.trim_end();

        let (leading, empty_after_comment) = self.take_leading();
        let trailing = if comment_part.is_empty() {
            StyledLine {
                empty_lines_before: empty_after_comment,
                ..StyledLine::default()
            }
        } else {
            let spacing = if value.is_empty() {
                // Less the space a spaced delimiter is written with
                let before = rest[..rest.len() - comment_part.len()].chars().count();
                before.saturating_sub(usize::from(self.spaced))
            } else {
                value_part[value.len()..].chars().count()
            };
            StyledLine {
                text: Some(comment_part[self.comment.len_utf8()..].to_string()),
                indentation: spacing,
                empty_lines_before: empty_after_comment,
            }
        };
        let key = Key::new(name, value)
            .with_indentation(indentation)
            .with_leading_comment(leading)
            .with_trailing_comment(trailing);

        let section = match self.target {
            Target::Section(index) => self.document.section_at_mut(index),
            Target::Discard => return Ok(()),
            Target::Start => {
                if !self.document.options().allow_global_section {
                    return Err(Error::syntax_with_context(
                        self.line,
                        "key appears before any section header",
                        content,
                        Some("Add a section header above this line or enable the global section"),
                    ));
                }
                let global = self.document.global_section_mut()?;
                Some(global)
            }
        };
        let Some(section) = section else {
            return Err(Error::custom("section index out of range"));
        };
        trace!("line {}: key '{}'", self.line, name);
        section.push_key(key)?;
        Ok(())
    }

    fn finish(mut self) -> Document {
        self.document.epilogue = match self.pending_comment.take() {
            Some(comment) => comment,
            None => StyledLine {
                empty_lines_before: self.pending_empty,
                ..StyledLine::default()
            },
        };
        debug!(
            "parsed {} lines into {} sections",
            self.line,
            self.document.len()
        );
        self.document
    }
}

/// Finds the end of a header body: the last closing character before the
/// first comment marker that follows a closing character.
pub(crate) fn header_end(body: &str, comment: char, close: char) -> Option<usize> {
    let mut from = 0;
    loop {
        let limit = body[from..]
            .find(comment)
            .map_or(body.len(), |index| from + index);
        if let Some(end) = body[..limit].rfind(close) {
            return Some(end);
        }
        if limit == body.len() {
            return None;
        }
        from = limit + comment.len_utf8();
    }
}

/// Splits the text after the delimiter into value and same-line comment.
///
/// A value opening with `"` may contain the comment marker up to its closing quote.
pub(crate) fn split_value(rest: &str, comment: char) -> (&str, &str) {
    let value = rest.trim_start();
    let search_from = value
        .strip_prefix('"')
        .and_then(|quoted| quoted.find('"'))
        .map_or(0, |index| index + 2);
    match value[search_from..].find(comment) {
        Some(index) => value.split_at(search_from + index),
        None => (value, ""),
    }
}

/// Parses `input` under `options`.
///
/// # Errors
///
/// [`Error::Parse`] with the 1-based line of the first malformed line, or
/// [`Error::DuplicateName`] under [`Duplication::Disallowed`].
pub fn parse_str(input: &str, options: IniOptions) -> Result<Document> {
    Parser::new(options).parse(input)
}
