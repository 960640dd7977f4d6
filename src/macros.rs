/// Builds a [`Document`](crate::Document) from section and key literals.
///
/// Values may be any expression implementing `ToString`. An optional leading
/// `options;` sets the dialect.
///
/// # Examples
///
/// ```rust
/// use ini_doc::{ini, IniOptions, KeyDelimiter};
///
/// let doc = ini!({
///     "Server": { "host": "localhost", "port": 8080 },
///     "Flags": { "verbose": true },
/// });
/// assert_eq!(
///     ini_doc::to_string(&doc).unwrap(),
///     "[Server]\nhost=localhost\nport=8080\n[Flags]\nverbose=true\n"
/// );
///
/// let doc = ini!(IniOptions::new().with_key_delimiter(KeyDelimiter::Colon); {
///     "S": { "k": 1.5 }
/// });
/// assert_eq!(ini_doc::to_string(&doc).unwrap(), "[S]\nk:1.5\n");
/// ```
#[macro_export]
macro_rules! ini {
    // Handle empty document
    ({}) => {
        $crate::Document::default()
    };

    // Handle default dialect
    ({ $($section:literal : { $($key:literal : $value:expr),* $(,)? }),* $(,)? }) => {
        $crate::ini!($crate::IniOptions::default(); { $($section : { $($key : $value),* }),* })
    };

    // Handle explicit dialect
    ($options:expr; { $($section:literal : { $($key:literal : $value:expr),* $(,)? }),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut document = $crate::Document::new($options);
        $(
            #[allow(unused_variables)]
            let section = document.section_entry($section);
            $(
                section.set_value($key, $value.to_string());
            )*
        )*
        document
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Document, Duplication, IniOptions};

    #[test]
    fn test_ini_macro_empty() {
        assert_eq!(ini!({}), Document::default());
    }

    #[test]
    fn test_ini_macro_sections() {
        let doc = ini!({
            "A": { "x": 1, "y": "two" },
            "B": {},
        });
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.value("a", "X"), Some("1"));
        assert_eq!(doc.value("A", "y"), Some("two"));
        assert!(doc.section("B").unwrap().is_empty());
    }

    #[test]
    fn test_ini_macro_repeated_section_merges() {
        let doc = ini!(IniOptions::new().with_key_duplicate(Duplication::Disallowed); {
            "A": { "x": 1 },
            "A": { "y": 2 },
        });
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.section("A").unwrap().len(), 2);
    }
}
