use ini_doc::{ini, to_string, CommentStarter, Document, IniOptions, SectionWrapper};

#[test]
fn test_ini_macro_empty() {
    let doc = ini!({});
    assert_eq!(doc, Document::default());
    assert_eq!(to_string(&doc).unwrap(), "");
}

#[test]
fn test_ini_macro_values_of_any_display_type() {
    let port: u16 = 8080;
    let doc = ini!({
        "Server": {
            "host": "localhost",
            "port": port,
            "ratio": 0.25,
            "debug": false,
            "initial": 'x',
        },
    });

    let server = doc.section("Server").unwrap();
    assert_eq!(server.len(), 5);
    assert_eq!(server.value("port"), Some("8080"));
    assert_eq!(server.value("ratio"), Some("0.25"));
    assert_eq!(server.value("debug"), Some("false"));
    assert_eq!(server.value("initial"), Some("x"));
}

#[test]
fn test_ini_macro_preserves_order() {
    let doc = ini!({
        "Zeta": { "b": 2, "a": 1 },
        "Alpha": { "z": 26 },
    });
    assert_eq!(to_string(&doc).unwrap(), "[Zeta]\nb=2\na=1\n[Alpha]\nz=26\n");
}

#[test]
fn test_ini_macro_with_options() {
    let options = IniOptions::new()
        .with_comment_starter(CommentStarter::Hash)
        .with_section_wrapper(SectionWrapper::AngleBrackets)
        .with_space_around_delimiter(true);
    let doc = ini!(options; {
        "S": { "k": "v" },
    });
    assert_eq!(doc.options().comment_starter, CommentStarter::Hash);
    assert_eq!(to_string(&doc).unwrap(), "<S>\nk = v\n");
}

#[test]
fn test_ini_macro_case_insensitive_merge() {
    let doc = ini!({
        "Section": { "Key": 1 },
        "SECTION": { "key": 2, "other": 3 },
    });
    assert_eq!(doc.len(), 1);
    let section = doc.section("section").unwrap();
    assert_eq!(section.name(), "Section");
    assert_eq!(section.key("KEY").unwrap().name(), "Key");
    assert_eq!(section.value("key"), Some("2"));
    assert_eq!(section.value("other"), Some("3"));
}

#[test]
fn test_ini_macro_document_is_editable() {
    let mut doc = ini!({ "S": { "a": 1 } });
    doc.section_mut("S").unwrap().set_value("b", "2");
    let reparsed = ini_doc::from_str(&to_string(&doc).unwrap()).unwrap();
    assert_eq!(reparsed, doc);
}
