//! Placeholder substitution in key values.
//!
//! A placeholder is a name wrapped in the configured markers, `@{name}` by
//! default. Binding replaces each placeholder with a value looked up in:
//!
//! 1. an external name-to-text source supplied to [`Binding`], if it has the name
//! 2. the document itself: `@{Section|Key}` names a key directly, a bare
//!    `@{Key}` is searched in the placeholder's own section and then in every
//!    section in order
//!
//! A placeholder naming another key is replaced by that key's own expanded
//! value, so chains resolve in one run. Each key is expanded once. A reference
//! back to a key that is still being expanded, or one deeper than the depth
//! limit, stays verbatim, so self-referential and cyclic chains terminate
//! without growing. Substituted text is not scanned again. A placeholder that
//! never resolves stays in the value verbatim.
//!
//! Names may nest: in `@{@{Kind} Path}` the inner placeholder is expanded
//! first and the result is looked up.
//!
//! An optional [`BindingHook`] sees every occurrence and decides the text that
//! is actually substituted.
//!
//! ## Examples
//!
//! ```rust
//! use ini_doc::Binding;
//!
//! let mut doc = ini_doc::from_str(
//!     "[Package]\nName=Example\nVersion=1.0\nFullName=@{Name} v@{Version}\nUser=@{Alias}\n",
//! )
//! .unwrap();
//!
//! Binding::new().with_pair("Alias", "Johny").bind(&mut doc);
//! assert_eq!(doc.value("Package", "FullName"), Some("Example v1.0"));
//! assert_eq!(doc.value("Package", "User"), Some("Johny"));
//! ```

use crate::document::{Document, Key, Section};
use log::{debug, trace};
use std::borrow::Cow;
use std::collections::HashMap;

/// Separator between section and key in a qualified placeholder name.
pub const QUALIFIER: char = '|';

/// One placeholder occurrence, as seen by a [`BindingHook`].
#[derive(Debug)]
pub struct BindingEvent<'a> {
    key: &'a Key,
    section: &'a str,
    placeholder: &'a str,
    value: Option<&'a str>,
}

impl<'a> BindingEvent<'a> {
    /// The key whose value contains the placeholder.
    #[must_use]
    pub fn key(&self) -> &'a Key {
        self.key
    }

    #[must_use]
    pub fn section_name(&self) -> &'a str {
        self.section
    }

    /// The name between the markers.
    #[must_use]
    pub fn placeholder_name(&self) -> &'a str {
        self.placeholder
    }

    #[must_use]
    pub fn is_value_found(&self) -> bool {
        self.value.is_some()
    }

    /// The value found by the default lookup.
    #[must_use]
    pub fn value(&self) -> Option<&'a str> {
        self.value
    }
}

/// Decides the text substituted for one placeholder occurrence.
///
/// Returning `None` leaves the placeholder verbatim; returning `Some` replaces
/// it even when the default lookup found nothing. Closures taking a
/// `&BindingEvent` implement this trait.
pub trait BindingHook {
    fn on_binding(&mut self, event: &BindingEvent<'_>) -> Option<String>;
}

impl<F> BindingHook for F
where
    F: FnMut(&BindingEvent<'_>) -> Option<String>,
{
    fn on_binding(&mut self, event: &BindingEvent<'_>) -> Option<String> {
        self(event)
    }
}

/// A top-level placeholder found in a value.
#[derive(Debug, PartialEq)]
struct Placeholder<'v> {
    start: usize,
    end: usize,
    /// Text between the markers, possibly holding nested placeholders
    name: &'v str,
}

/// Finds the top-level placeholders in `value`.
///
/// An open marker without a matching close marker, or with nothing before
/// it, is plain text.
fn find_placeholders<'v>(value: &'v str, open: &str, close: &str) -> Vec<Placeholder<'v>> {
    let mut found = Vec::new();
    if open.is_empty() || close.is_empty() {
        return found;
    }
    let mut from = 0;
    while let Some(offset) = value[from..].find(open) {
        let start = from + offset;
        let name_start = start + open.len();
        match matching_close(value, name_start, open, close) {
            Some(name_end) if name_end > name_start => {
                let end = name_end + close.len();
                found.push(Placeholder {
                    start,
                    end,
                    name: &value[name_start..name_end],
                });
                from = end;
            }
            _ => from = name_start,
        }
    }
    found
}

/// Finds the close marker balancing an open marker that ends at `from`.
fn matching_close(value: &str, mut from: usize, open: &str, close: &str) -> Option<usize> {
    let mut depth = 1;
    loop {
        let next_close = from + value[from..].find(close)?;
        match value[from..].find(open).map(|index| from + index) {
            Some(next_open) if next_open < next_close => {
                depth += 1;
                from = next_open + open.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(next_close);
                }
                from = next_close + close.len();
            }
        }
    }
}

/// Where a placeholder name points.
enum Target {
    /// Text from the external source, substituted as is
    Text(String),
    /// A key of the document, by section and key index
    Key((usize, usize)),
}

/// State of one binding run.
struct Expansion<'d> {
    document: &'d Document,
    open: &'d str,
    close: &'d str,
    max_depth: usize,
    /// Expanded values and their substitution counts, computed once per key
    done: HashMap<(usize, usize), (String, usize)>,
    /// Keys being expanded, innermost last
    stack: Vec<(usize, usize)>,
}

/// A configured binding run over a document.
///
/// # Examples
///
/// ```rust
/// use ini_doc::{Binding, BindingEvent};
///
/// let mut doc = ini_doc::from_str("[S]\nPath=@{Root}/bin\nHome=@{Missing}\n").unwrap();
///
/// let count = Binding::new()
///     .with_source([("Root", "/opt/app")])
///     .with_hook(|event: &BindingEvent<'_>| {
///         Some(event.value().unwrap_or("<unset>").to_string())
///     })
///     .bind(&mut doc);
///
/// assert_eq!(count, 2);
/// assert_eq!(doc.value("S", "Path"), Some("/opt/app/bin"));
/// assert_eq!(doc.value("S", "Home"), Some("<unset>"));
/// ```
#[derive(Default)]
pub struct Binding<'h> {
    source: HashMap<String, String>,
    section: Option<String>,
    hook: Option<Box<dyn BindingHook + 'h>>,
    max_depth: Option<usize>,
}

impl<'h> Binding<'h> {
    /// Creates a binding that resolves from the document only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds external name/value pairs. They take precedence over document keys.
    #[must_use]
    pub fn with_source<I, K, V>(mut self, source: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.source
            .extend(source.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds a single external name/value pair.
    #[must_use]
    pub fn with_pair(mut self, name: &str, value: &str) -> Self {
        self.source.insert(name.to_string(), value.to_string());
        self
    }

    /// Restricts substitution to the keys of one section.
    ///
    /// Lookups still search the whole document.
    #[must_use]
    pub fn in_section(mut self, name: &str) -> Self {
        self.section = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn with_hook<H: BindingHook + 'h>(mut self, hook: H) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Overrides the document's depth limit.
    ///
    /// Expansion recurses once per level, so very large limits need a
    /// correspondingly large stack.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth.max(1));
        self
    }

    /// Runs the binding and returns the number of substitutions made.
    pub fn bind(mut self, document: &mut Document) -> usize {
        let scope = match &self.section {
            Some(name) => match document.section_index(name) {
                Some(index) => Some(index),
                None => {
                    debug!("binding skipped: section '{}' not found", name);
                    return 0;
                }
            },
            None => None,
        };

        let (updates, total) = self.resolve(document, scope);
        debug!(
            "binding made {} substitutions in {} keys",
            total,
            updates.len()
        );
        for (section_index, key_index, value) in updates {
            if let Some(key) = document
                .section_at_mut(section_index)
                .and_then(|section| section.key_at_mut(key_index))
            {
                key.value = value;
            }
        }
        total
    }

    /// Computes the new values of the keys in scope without touching the document.
    fn resolve(
        &mut self,
        document: &Document,
        scope: Option<usize>,
    ) -> (Vec<(usize, usize, String)>, usize) {
        let options = document.options();
        let mut state = Expansion {
            document,
            open: &options.placeholder_open,
            close: &options.placeholder_close,
            max_depth: self.max_depth.unwrap_or(options.binding_depth).max(1),
            done: HashMap::new(),
            stack: Vec::new(),
        };
        let mut updates = Vec::new();
        let mut total = 0;

        for (section_index, section) in document.sections().enumerate() {
            if scope.is_some_and(|index| index != section_index) {
                continue;
            }
            for (key_index, key) in section.keys().enumerate() {
                let (value, count) = self.expand_key(&mut state, (section_index, key_index));
                if value != key.value {
                    total += count;
                    updates.push((section_index, key_index, value));
                }
            }
        }
        (updates, total)
    }

    /// Expands a key's value, or returns the expansion computed earlier.
    ///
    /// A key reached again through a cycle or beyond the depth limit keeps
    /// that placeholder verbatim, and the result is reused from then on.
    fn expand_key(&mut self, state: &mut Expansion<'_>, at: (usize, usize)) -> (String, usize) {
        if let Some(done) = state.done.get(&at) {
            return done.clone();
        }
        let document = state.document;
        let Some((section, key)) = document
            .section_at(at.0)
            .and_then(|section| Some((section, section.key_at(at.1)?)))
        else {
            return (String::new(), 0);
        };
        state.stack.push(at);
        let expanded = self.expand_text(state, at.0, section, key, &key.value, 0);
        state.stack.pop();
        state.done.insert(at, expanded.clone());
        expanded
    }

    /// Substitutes every placeholder of `text`, which belongs to `key`.
    fn expand_text(
        &mut self,
        state: &mut Expansion<'_>,
        section_index: usize,
        section: &Section,
        key: &Key,
        text: &str,
        nesting: usize,
    ) -> (String, usize) {
        let placeholders = find_placeholders(text, state.open, state.close);
        if placeholders.is_empty() {
            return (text.to_string(), 0);
        }
        let mut output = String::with_capacity(text.len());
        let mut count = 0;
        let mut last = 0;

        for placeholder in placeholders {
            output.push_str(&text[last..placeholder.start]);
            last = placeholder.end;

            // Inner placeholders form the name first
            let name = if nesting < state.max_depth && placeholder.name.contains(state.open) {
                let (name, inner) =
                    self.expand_text(state, section_index, section, key, placeholder.name, nesting + 1);
                count += inner;
                Cow::Owned(name)
            } else {
                Cow::Borrowed(placeholder.name)
            };

            let found = match self.lookup(state.document, section_index, &name) {
                Some(Target::Text(value)) => Some(value),
                Some(Target::Key(target)) if state.stack.contains(&target) => {
                    trace!("binding: '{}' in '{}' refers back to itself", name, key.name());
                    None
                }
                Some(Target::Key(_)) if state.stack.len() >= state.max_depth => {
                    trace!("binding: '{}' in '{}' is beyond the depth limit", name, key.name());
                    None
                }
                Some(Target::Key(target)) => Some(self.expand_key(state, target).0),
                None => None,
            };
            let replacement = match self.hook.as_mut() {
                Some(hook) => hook.on_binding(&BindingEvent {
                    key,
                    section: section.name(),
                    placeholder: &name,
                    value: found.as_deref(),
                }),
                None => found,
            };
            match replacement {
                Some(value) => {
                    output.push_str(&value);
                    count += 1;
                }
                None => {
                    output.push_str(state.open);
                    output.push_str(&name);
                    output.push_str(state.close);
                }
            }
        }
        output.push_str(&text[last..]);
        (output, count)
    }

    /// Looks `name` up in the external source, then in the document.
    fn lookup(&self, document: &Document, section_index: usize, name: &str) -> Option<Target> {
        if let Some(value) = self.source.get(name) {
            return Some(Target::Text(value.clone()));
        }
        if let Some((section, key)) = name.split_once(QUALIFIER) {
            let section_index = document.section_index(section)?;
            let key_index = document.section_at(section_index)?.key_index(key)?;
            return Some(Target::Key((section_index, key_index)));
        }
        let local = document
            .section_at(section_index)
            .and_then(|section| section.key_index(name))
            .map(|key_index| (section_index, key_index));
        local
            .or_else(|| {
                document
                    .sections()
                    .enumerate()
                    .find_map(|(index, section)| Some((index, section.key_index(name)?)))
            })
            .map(Target::Key)
    }
}

impl Document {
    /// Resolves placeholders from the document's own keys.
    ///
    /// Returns the number of substitutions made. See [`Binding`] for
    /// external sources and hooks.
    pub fn bind(&mut self) -> usize {
        Binding::new().bind(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_placeholders() {
        let found = find_placeholders("a @{x} b @{y|z}", "@{", "}");
        let names: Vec<_> = found.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["x", "y|z"]);
        assert_eq!(found[0].start, 2);
        assert_eq!(found[0].end, 6);
    }

    #[test]
    fn test_find_nested_and_malformed() {
        let found = find_placeholders("@{Outer @{Inner}}", "@{", "}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Outer @{Inner}");
        assert!(find_placeholders("@{} @{open", "@{", "}").is_empty());
        assert!(find_placeholders("@{x}", "", "}").is_empty());

        // An unclosed outer marker is text, the inner placeholder still counts
        let found = find_placeholders("@{open @{x}", "@{", "}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "x");
    }

    #[test]
    fn test_find_with_identical_markers() {
        let found = find_placeholders("%a% and %b%", "%", "%");
        let names: Vec<_> = found.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_nested_placeholder_resolves_inside_out() {
        let mut doc =
            crate::from_str("[S]\nTest=Nested\nNested Value=done\nKey=@{@{Test} Value}\n")
                .unwrap();
        doc.bind();
        assert_eq!(doc.value("S", "Key"), Some("done"));
    }

    #[test]
    fn test_self_reference_terminates() {
        let mut doc = crate::from_str("[S]\nA=@{B}\nB=@{A}\nC=x@{C}\n").unwrap();
        doc.bind();
        assert_eq!(doc.value("S", "A"), Some("@{A}"));
        assert_eq!(doc.value("S", "B"), Some("@{A}"));
        assert_eq!(doc.value("S", "C"), Some("x@{C}"));
    }

    #[test]
    fn test_depth_limit() {
        let mut doc = crate::from_str("[S]\nA=@{B}\nB=@{C}\nC=@{D}\nD=end\n").unwrap();
        Binding::new().with_max_depth(2).bind(&mut doc);
        assert_eq!(doc.value("S", "A"), Some("@{C}"));
        assert_eq!(doc.value("S", "B"), Some("@{C}"));
        assert_eq!(doc.value("S", "C"), Some("end"));
        doc.bind();
        assert_eq!(doc.value("S", "A"), Some("end"));
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let deep = format!("{}x{}", "@{".repeat(64), "}".repeat(64));
        let mut doc = crate::from_str(&format!("[S]\nx=1\nk={}\n", deep)).unwrap();
        Binding::new().with_max_depth(4).bind(&mut doc);
        assert!(doc.value("S", "k").unwrap().ends_with("}}}}"));
    }

    #[test]
    fn test_hook_called_once_per_occurrence() {
        let mut doc = crate::from_str("[S]\nA=@{Missing}\nB=@{A}\n").unwrap();
        let mut calls = 0;
        Binding::new()
            .with_hook(|event: &BindingEvent<'_>| {
                calls += 1;
                event.value().map(str::to_string)
            })
            .bind(&mut doc);
        assert_eq!(doc.value("S", "A"), Some("@{Missing}"));
        assert_eq!(doc.value("S", "B"), Some("@{Missing}"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_scoped_binding() {
        let mut doc = crate::from_str("[A]\nx=@{v}\n[B]\ny=@{v}\n").unwrap();
        Binding::new().with_pair("v", "1").in_section("b").bind(&mut doc);
        assert_eq!(doc.value("A", "x"), Some("@{v}"));
        assert_eq!(doc.value("B", "y"), Some("1"));
    }

    #[test]
    fn test_comments_untouched() {
        let mut doc = crate::from_str(";@{v}\n[S]\nk=@{v} ;@{v}\n").unwrap();
        Binding::new().with_pair("v", "1").bind(&mut doc);
        assert_eq!(crate::to_string(&doc).unwrap(), ";@{v}\n[S]\nk=1 ;@{v}\n");
    }
}
