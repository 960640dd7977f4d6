//! Renders a [`Document`] back to text.
//!
//! Every element is written as:
//!
//! 1. `leading.empty_lines_before` blank lines
//! 2. the leading comment, one marker per line, at `leading.indentation`
//! 3. `trailing.empty_lines_before` blank lines
//! 4. the header or `name=value` line at the element's indentation
//! 5. the trailing comment on the same line, after `trailing.indentation` spaces
//!
//! The global section has no header. The document epilogue follows the last
//! element.
//!
//! Before an element is written it is checked against the rules the parser
//! splits lines with. Anything that would read back differently, such as a
//! value holding the comment marker or a line break, fails with
//! [`Error::Unrepresentable`] instead of being written.

use crate::document::{Document, Key, Section, StyledLine};
use crate::error::{Error, Result};
use crate::options::IniOptions;
use crate::parse::{header_end, split_value};
use log::debug;

const LINE_BREAKS: [char; 2] = ['\r', '\n'];

/// Serializer for documents of one dialect.
pub struct Writer<'a> {
    options: &'a IniOptions,
    output: String,
    comment: char,
    delimiter: char,
    open: char,
    close: char,
    newline: &'static str,
}

impl<'a> Writer<'a> {
    #[must_use]
    pub fn new(options: &'a IniOptions) -> Self {
        let (open, close) = options.section_wrapper.chars();
        Writer {
            options,
            output: String::with_capacity(1024),
            comment: options.comment_starter.as_char(),
            delimiter: options.key_delimiter.as_char(),
            open,
            close,
            newline: options.line_ending.as_str(),
        }
    }

    /// Renders `document` and returns the text.
    ///
    /// # Errors
    ///
    /// [`Error::Unrepresentable`] naming the first element that would not
    /// read back as it is stored.
    pub fn write_document(mut self, document: &Document) -> Result<String> {
        for section in document.sections() {
            self.write_section(section)?;
        }
        check_leading("the epilogue", &document.epilogue)?;
        self.write_empty_lines(document.epilogue.empty_lines_before);
        self.write_comment_block(&document.epilogue);
        debug!(
            "wrote {} sections ({} bytes)",
            document.len(),
            self.output.len()
        );
        Ok(self.output)
    }

    fn write_section(&mut self, section: &Section) -> Result<()> {
        if section.is_global() {
            self.check_global(section)?;
        } else {
            let element = format!("section '{}'", section.name());
            check_styling(&element, &section.leading_comment, &section.trailing_comment)?;
            self.check_header(&element, section)?;

            let mut header = String::with_capacity(section.name().len() + 2);
            header.push(self.open);
            header.push_str(section.name());
            header.push(self.close);
            self.write_element(
                &section.leading_comment,
                &section.trailing_comment,
                section.indentation,
                &header,
            );
        }
        for key in section.keys() {
            self.write_key(key)?;
        }
        Ok(())
    }

    fn write_key(&mut self, key: &Key) -> Result<()> {
        let element = format!("key '{}'", key.name());
        check_styling(&element, &key.leading_comment, &key.trailing_comment)?;
        self.check_key_name(&element, key.name())?;
        self.check_value(&element, key)?;

        // A space before the delimiter of an unnamed key would read as indentation
        let line = if self.options.space_around_delimiter && key.name().is_empty() {
            format!("{} {}", self.delimiter, key.value())
        } else if self.options.space_around_delimiter {
            format!("{} {} {}", key.name(), self.delimiter, key.value())
        } else {
            format!("{}{}{}", key.name(), self.delimiter, key.value())
        };
        self.write_element(
            &key.leading_comment,
            &key.trailing_comment,
            key.indentation,
            &line,
        );
        Ok(())
    }

    fn write_element(
        &mut self,
        leading: &StyledLine,
        trailing: &StyledLine,
        indentation: usize,
        content: &str,
    ) {
        self.write_empty_lines(leading.empty_lines_before);
        self.write_comment_block(leading);
        self.write_empty_lines(trailing.empty_lines_before);
        self.write_indentation(indentation);
        self.output.push_str(content);
        push_trailing(&mut self.output, self.comment, trailing);
        self.output.push_str(self.newline);
    }

    fn write_comment_block(&mut self, comment: &StyledLine) {
        for line in comment.lines() {
            self.write_indentation(comment.indentation);
            self.output.push(self.comment);
            self.output.push_str(line);
            self.output.push_str(self.newline);
        }
    }

    fn write_empty_lines(&mut self, count: usize) {
        for _ in 0..count {
            self.output.push_str(self.newline);
        }
    }

    fn write_indentation(&mut self, count: usize) {
        self.output.extend(std::iter::repeat(' ').take(count));
    }

    /// The global section is only recognizable by its keys.
    fn check_global(&self, section: &Section) -> Result<()> {
        let reason = if section.name() != self.options.global_section_name {
            "it is renamed, but reads back under the configured global name"
        } else if section.is_empty() {
            "it has no keys, and nothing else marks it in text"
        } else if section.indentation > 0
            || section.leading_comment != StyledLine::default()
            || section.trailing_comment != StyledLine::default()
        {
            "it has no header to carry comments or indentation"
        } else {
            return Ok(());
        };
        Err(Error::unrepresentable("the global section", reason))
    }

    fn check_header(&self, element: &str, section: &Section) -> Result<()> {
        let name = section.name();
        if name.contains(LINE_BREAKS) {
            return Err(Error::unrepresentable(element, "name contains a line break"));
        }
        let mut body = String::with_capacity(name.len() + 1);
        body.push_str(name);
        body.push(self.close);
        push_trailing(&mut body, self.comment, &section.trailing_comment);
        match header_end(&body, self.comment, self.close) {
            Some(end) if end == name.len() => Ok(()),
            Some(end) => Err(Error::unrepresentable(
                element,
                &format!("name reads back as '{}'", &body[..end]),
            )),
            None => Err(Error::unrepresentable(element, "header is not closed")),
        }
    }

    fn check_key_name(&self, element: &str, name: &str) -> Result<()> {
        let reason = if name.contains(LINE_BREAKS) {
            "name contains a line break"
        } else if name.contains(self.delimiter) {
            "name contains the key delimiter"
        } else if name.trim() != name {
            "name starts or ends with whitespace"
        } else if name.starts_with(self.comment) {
            "name starts with the comment marker"
        } else if name.starts_with(self.open) {
            "name starts like a section header"
        } else {
            return Ok(());
        };
        Err(Error::unrepresentable(element, reason))
    }

    fn check_value(&self, element: &str, key: &Key) -> Result<()> {
        let value = key.value();
        if value.contains(LINE_BREAKS) {
            return Err(Error::unrepresentable(element, "value contains a line break"));
        }
        let mut rest = String::with_capacity(value.len());
        rest.push_str(value);
        push_trailing(&mut rest, self.comment, &key.trailing_comment);
        let (value_part, comment_part) = split_value(&rest, self.comment);
        let read = value_part.trim_end();
        if read != value || comment_part.is_empty() == key.trailing_comment.has_text() {
            return Err(Error::unrepresentable(
                element,
                &format!("value reads back as '{}'", read),
            ));
        }
        Ok(())
    }
}

/// Appends a same-line comment with its spacing.
fn push_trailing(output: &mut String, comment: char, trailing: &StyledLine) {
    if let Some(text) = &trailing.text {
        output.extend(std::iter::repeat(' ').take(trailing.indentation));
        output.push(comment);
        output.push_str(text);
    }
}

fn check_leading(element: &str, leading: &StyledLine) -> Result<()> {
    match &leading.text {
        None if leading.indentation > 0 => Err(Error::unrepresentable(
            element,
            "comment indentation is set without comment text",
        )),
        Some(text) if text.contains('\r') => Err(Error::unrepresentable(
            element,
            "comment contains a carriage return",
        )),
        _ => Ok(()),
    }
}

fn check_styling(element: &str, leading: &StyledLine, trailing: &StyledLine) -> Result<()> {
    check_leading(element, leading)?;
    if !leading.has_text() && trailing.empty_lines_before > 0 {
        return Err(Error::unrepresentable(
            element,
            "blank lines before an element without a leading comment belong to the leading line",
        ));
    }
    match &trailing.text {
        None if trailing.indentation > 0 => Err(Error::unrepresentable(
            element,
            "same-line comment indentation is set without comment text",
        )),
        Some(text) if text.contains(LINE_BREAKS) => Err(Error::unrepresentable(
            element,
            "same-line comment contains a line break",
        )),
        _ => Ok(()),
    }
}

/// Renders `document` under its own options.
///
/// # Errors
///
/// See [`Writer::write_document`].
pub fn write_str(document: &Document) -> Result<String> {
    Writer::new(document.options()).write_document(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{CommentStarter, KeyDelimiter, LineEnding, SectionWrapper};
    use crate::parse::parse_str;

    fn round_trip(input: &str, options: IniOptions) -> String {
        write_str(&parse_str(input, options).unwrap()).unwrap()
    }

    fn rejected(doc: &Document) -> String {
        match write_str(doc) {
            Err(Error::Unrepresentable { reason, .. }) => reason,
            other => panic!("expected a write error, got {other:?}"),
        }
    }

    #[test]
    fn test_preserves_layout() {
        let input = "\n;header\n\n  [Section]   ;same line\n  ; about key\n    key=value ;note\n\n;tail\n";
        assert_eq!(round_trip(input, IniOptions::default()), input);
    }

    #[test]
    fn test_space_around_delimiter() {
        let mut doc = Document::new(
            IniOptions::default()
                .with_key_delimiter(KeyDelimiter::Colon)
                .with_space_around_delimiter(true)
                .with_section_wrapper(SectionWrapper::CurlyBrackets),
        );
        doc.add_section("S").unwrap().set_value("k", "v");
        assert_eq!(write_str(&doc).unwrap(), "{S}\nk : v\n");
    }

    #[test]
    fn test_unnamed_key_keeps_indentation() {
        let options = IniOptions::default().with_space_around_delimiter(true);
        let mut doc = Document::new(options.clone());
        doc.add_section("S")
            .unwrap()
            .push_key(Key::new("", "v").with_indentation(2))
            .unwrap();
        let text = write_str(&doc).unwrap();
        assert_eq!(text, "[S]\n  = v\n");
        assert_eq!(parse_str(&text, options).unwrap(), doc);
    }

    #[test]
    fn test_crlf_output() {
        let options = IniOptions::default().with_line_ending(LineEnding::CrLf);
        assert_eq!(round_trip("[S]\nk=v\n", options), "[S]\r\nk=v\r\n");
    }

    #[test]
    fn test_global_section_has_no_header() {
        let options = IniOptions::default().with_global_section(true);
        assert_eq!(round_trip(";g\ng=1\n[S]\nk=v\n", options), ";g\ng=1\n[S]\nk=v\n");
    }

    #[test]
    fn test_empty_value_keeps_comment_spacing() {
        for spaced in [false, true] {
            let options = IniOptions::default().with_space_around_delimiter(spaced);
            let mut doc = Document::new(options.clone());
            let key = doc.add_section("S").unwrap().set_value("k", "");
            key.trailing_comment = StyledLine::new("c").with_indentation(3);

            let text = write_str(&doc).unwrap();
            assert_eq!(parse_str(&text, options).unwrap(), doc, "text was {text:?}");
        }
    }

    #[test]
    fn test_value_with_comment_marker_is_rejected() {
        let mut doc = Document::default();
        doc.add_section("S").unwrap().set_value("k", "a;b");
        assert_eq!(rejected(&doc), "value reads back as 'a'");

        // Quoted, the marker stays part of the value
        doc.section_mut("S").unwrap().set_value("k", "\"a;b\"");
        assert_eq!(write_str(&doc).unwrap(), "[S]\nk=\"a;b\"\n");

        // Under another comment marker the semicolon is plain text
        let mut doc = Document::new(IniOptions::default().with_comment_starter(CommentStarter::Hash));
        doc.add_section("S").unwrap().set_value("k", "a;b");
        assert_eq!(write_str(&doc).unwrap(), "[S]\nk=a;b\n");
    }

    #[test]
    fn test_line_breaks_are_rejected() {
        let mut doc = Document::default();
        doc.add_section("S").unwrap().set_value("k", "x\n[Injected]\nevil=1");
        assert_eq!(rejected(&doc), "value contains a line break");

        let mut doc = Document::default();
        doc.add_section("S\n").unwrap();
        assert_eq!(rejected(&doc), "name contains a line break");

        let mut doc = Document::default();
        let key = doc.add_section("S").unwrap().set_value("k", "v");
        key.trailing_comment = StyledLine::new("a\nb").with_indentation(1);
        assert_eq!(rejected(&doc), "same-line comment contains a line break");
    }

    #[test]
    fn test_key_names_that_read_back_differently() {
        for (name, reason) in [
            ("a=b", "name contains the key delimiter"),
            (" a", "name starts or ends with whitespace"),
            (";a", "name starts with the comment marker"),
            ("[a", "name starts like a section header"),
        ] {
            let mut doc = Document::default();
            doc.add_section("S").unwrap().set_value(name, "v");
            assert_eq!(rejected(&doc), reason);
        }
    }

    #[test]
    fn test_section_names() {
        let mut doc = Document::default();
        doc.add_section("a]b").unwrap();
        doc.add_section(";").unwrap();
        assert_eq!(write_str(&doc).unwrap(), "[a]b]\n[;]\n");

        let mut doc = Document::default();
        doc.add_section("a];b").unwrap();
        assert_eq!(rejected(&doc), "name reads back as 'a'");
    }

    #[test]
    fn test_blank_lines_need_a_leading_comment() {
        let mut doc = Document::default();
        let key = doc.add_section("S").unwrap().set_value("k", "v");
        key.trailing_comment.empty_lines_before = 1;
        assert!(rejected(&doc).starts_with("blank lines before"));

        key_in(&mut doc).leading_comment = StyledLine::new("about");
        assert_eq!(write_str(&doc).unwrap(), "[S]\n;about\n\nk=v\n");
    }

    fn key_in(doc: &mut Document) -> &mut Key {
        doc.section_mut("S").unwrap().key_mut("k").unwrap()
    }

    #[test]
    fn test_global_section_checks() {
        let mut doc = Document::new(IniOptions::default().with_global_section(true));
        doc.global_section_mut().unwrap();
        assert_eq!(rejected(&doc), "it has no keys, and nothing else marks it in text");

        doc.global_section_mut().unwrap().set_value("g", "1");
        doc.global_section_mut().unwrap().leading_comment = StyledLine::new("top");
        assert_eq!(rejected(&doc), "it has no header to carry comments or indentation");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(write_str(&Document::default()).unwrap(), "");
    }
}
