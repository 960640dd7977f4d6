use ini_doc::{
    from_slice_with_options, from_str, from_str_with_options, to_string, to_vec, Binding,
    CommentStarter, Document, Duplication, Error, IniOptions, KeyDelimiter, LineEnding,
    SectionWrapper, StyledLine,
};

const SAMPLE: &str = "\
; Machine wide settings

[MachineSettings]
ProgramFiles = C:\\Program Files ; default location
Temp=C:\\Temp

  ; per-user
[User Settings]
  Name=Alice
Home=@{MachineSettings|ProgramFiles}\\Alice
";

#[test]
fn test_read_sample() {
    let doc = from_str(SAMPLE).unwrap();
    assert_eq!(doc.len(), 2);

    let machine = doc.section("machinesettings").unwrap();
    assert_eq!(machine.name(), "MachineSettings");
    assert_eq!(machine.value("ProgramFiles"), Some("C:\\Program Files"));
    assert_eq!(
        machine.leading_comment.text.as_deref(),
        Some(" Machine wide settings")
    );
    assert_eq!(machine.trailing_comment.empty_lines_before, 1);

    let key = machine.key("programfiles").unwrap();
    assert_eq!(key.trailing_comment.text.as_deref(), Some(" default location"));
    assert_eq!(key.trailing_comment.indentation, 1);

    let user = doc.section("User Settings").unwrap();
    assert_eq!(user.leading_comment.indentation, 2);
    assert_eq!(user.leading_comment.empty_lines_before, 1);
    assert_eq!(user.key("Name").unwrap().indentation, 2);
}

#[test]
fn test_write_sample() {
    let doc = from_str(SAMPLE).unwrap();
    let expected = "\
; Machine wide settings

[MachineSettings]
ProgramFiles=C:\\Program Files ; default location
Temp=C:\\Temp

  ; per-user
[User Settings]
  Name=Alice
Home=@{MachineSettings|ProgramFiles}\\Alice
";
    assert_eq!(to_string(&doc).unwrap(), expected);
}

#[test]
fn test_idempotent_serialization() {
    let doc = from_str(SAMPLE).unwrap();
    let once = to_string(&doc).unwrap();
    let twice = to_string(&from_str(&once).unwrap()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_edit_then_write() {
    let mut doc = from_str("[A]\nx=1\n; about y\ny=2\n").unwrap();
    doc.section_mut("A").unwrap().remove_key("x");
    doc.section_mut("A").unwrap().set_value("z", "3");
    doc.add_section("B")
        .unwrap()
        .add_key("w", "4")
        .unwrap()
        .leading_comment = StyledLine::new(" new").with_empty_lines_before(1);

    assert_eq!(to_string(&doc).unwrap(), "[A]\n; about y\ny=2\nz=3\n[B]\n\n; new\nw=4\n");
}

#[test]
fn test_hash_colon_curly_dialect() {
    let options = IniOptions::new()
        .with_comment_starter(CommentStarter::Hash)
        .with_key_delimiter(KeyDelimiter::Colon)
        .with_space_around_delimiter(true)
        .with_section_wrapper(SectionWrapper::CurlyBrackets)
        .with_line_ending(LineEnding::CrLf);

    let doc = from_str_with_options("# top\n{Server}\nhost: example.org # prod\n", options).unwrap();
    assert_eq!(doc.value("server", "HOST"), Some("example.org"));
    assert_eq!(
        to_string(&doc).unwrap(),
        "# top\r\n{Server}\r\nhost : example.org # prod\r\n"
    );
}

#[test]
fn test_angle_and_parentheses_wrappers() {
    for (wrapper, text) in [
        (SectionWrapper::AngleBrackets, "<S>\nk=v\n"),
        (SectionWrapper::Parentheses, "(S)\nk=v\n"),
    ] {
        let options = IniOptions::new().with_section_wrapper(wrapper);
        let doc = from_str_with_options(text, options).unwrap();
        assert_eq!(doc.value("S", "k"), Some("v"));
        assert_eq!(to_string(&doc).unwrap(), text);
    }
}

#[test]
fn test_other_comment_starter_is_text() {
    let options = IniOptions::new().with_comment_starter(CommentStarter::Hash);
    let doc = from_str_with_options("[S]\nk=a;b\n", options).unwrap();
    assert_eq!(doc.value("S", "k"), Some("a;b"));
}

#[test]
fn test_quoted_value_keeps_comment_marker() {
    let doc = from_str("[S]\nk = \"a;b\" ;c\n").unwrap();
    let key = doc.section("S").unwrap().key("k").unwrap();
    assert_eq!(key.value(), "\"a;b\"");
    assert_eq!(key.trailing_comment.text.as_deref(), Some("c"));
}

#[test]
fn test_section_name_with_brackets() {
    let doc = from_str("[[;]];comment\nk=v\n").unwrap();
    let section = doc.section_at(0).unwrap();
    assert_eq!(section.name(), "[;]");
    assert_eq!(section.trailing_comment.text.as_deref(), Some("comment"));
    assert_eq!(to_string(&doc).unwrap(), "[[;]];comment\nk=v\n");
}

#[test]
fn test_global_section() {
    let options = IniOptions::new()
        .with_global_section(true)
        .with_global_section_name("Root");
    let doc = from_str_with_options("a=1\n[S]\nb=2\n", options).unwrap();

    let global = doc.global_section().unwrap();
    assert_eq!(global.name(), "Root");
    assert!(global.is_global());
    assert_eq!(doc.value("Root", "a"), Some("1"));
    assert_eq!(to_string(&doc).unwrap(), "a=1\n[S]\nb=2\n");
}

#[test]
fn test_global_section_disabled() {
    let err = from_str("a=1\n[S]\n").unwrap_err();
    assert_eq!(err.line(), Some(1));

    let mut doc = Document::default();
    assert!(matches!(
        doc.global_section_mut(),
        Err(Error::GlobalSectionDisabled)
    ));
}

#[test]
fn test_parse_errors_carry_line_numbers() {
    let cases = [
        ("[S]\nk=v\n[Broken\n", 3),
        ("[S]\nno delimiter here\n", 2),
        ("[S] trailing text\n", 1),
    ];
    for (input, line) in cases {
        match from_str(input) {
            Err(Error::Parse { line: actual, .. }) => assert_eq!(actual, line, "{input:?}"),
            other => panic!("expected parse error for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_duplicate_policies_while_parsing() {
    let input = "[S]\nk=1\nk=2\n[s]\nj=3\n";

    let doc = from_str(input).unwrap();
    let section = doc.section("S").unwrap();
    assert_eq!(section.value("k"), Some("2"));
    assert_eq!(section.value("j"), Some("3"));

    let options = IniOptions::new()
        .with_key_duplicate(Duplication::Ignored)
        .with_section_duplicate(Duplication::Ignored);
    let doc = from_str_with_options(input, options).unwrap();
    let section = doc.section("S").unwrap();
    assert_eq!(section.value("k"), Some("1"));
    assert!(!section.contains_key("j"));

    let options = IniOptions::new().with_key_duplicate(Duplication::Disallowed);
    assert!(matches!(
        from_str_with_options(input, options),
        Err(Error::DuplicateName { kind: "key", .. })
    ));

    let options = IniOptions::new().with_section_duplicate(Duplication::Disallowed);
    assert!(matches!(
        from_str_with_options(input, options),
        Err(Error::DuplicateName { kind: "section", .. })
    ));
}

#[test]
fn test_case_sensitive_names() {
    let options = IniOptions::new()
        .with_section_name_case_sensitive(true)
        .with_key_name_case_sensitive(true);
    let doc = from_str_with_options("[S]\nk=1\nK=2\n[s]\nk=3\n", options).unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.value("S", "k"), Some("1"));
    assert_eq!(doc.value("S", "K"), Some("2"));
    assert_eq!(doc.value("s", "k"), Some("3"));
    assert_eq!(doc.value("s", "K"), None);
}

#[test]
fn test_binding_internal() {
    let mut doc = from_str("[Package]\nName=Example\nVersion=1.0\nFullName=@{Name} v@{Version}\n").unwrap();
    doc.bind();
    assert_eq!(doc.value("Package", "FullName"), Some("Example v1.0"));
}

#[test]
fn test_binding_qualified() {
    let mut doc = from_str(SAMPLE).unwrap();
    doc.bind();
    assert_eq!(
        doc.value("User Settings", "Home"),
        Some("C:\\Program Files\\Alice")
    );
}

#[test]
fn test_binding_external() {
    let mut doc = from_str("[User]\nNickname=@{User Alias}\nOther=@{Missing}\n").unwrap();
    Binding::new()
        .with_source([("User Alias", "Johny")])
        .bind(&mut doc);
    assert_eq!(doc.value("User", "Nickname"), Some("Johny"));
    assert_eq!(doc.value("User", "Other"), Some("@{Missing}"));
}

#[test]
fn test_envelope_round_trip() {
    let options = IniOptions::new()
        .with_compression(true)
        .with_encryption_password("s3cret");
    let doc = from_str_with_options(SAMPLE, options.clone()).unwrap();

    let bytes = to_vec(&doc).unwrap();
    assert!(!bytes.windows(12).any(|w| w == b"ProgramFiles"));

    let back = from_slice_with_options(&bytes, options).unwrap();
    assert_eq!(back, doc);
    assert_eq!(to_string(&back).unwrap(), to_string(&doc).unwrap());
}

#[test]
fn test_envelope_wrong_password() {
    let doc = from_str_with_options(
        SAMPLE,
        IniOptions::new().with_encryption_password("right"),
    )
    .unwrap();
    let bytes = to_vec(&doc).unwrap();

    let wrong = IniOptions::new().with_encryption_password("wrong");
    assert!(matches!(
        from_slice_with_options(&bytes, wrong),
        Err(Error::Decryption(_))
    ));
}

#[test]
fn test_compressed_bytes_require_compression() {
    let doc = from_str_with_options("[S]\nk=v\n", IniOptions::new()).unwrap();
    let plain = to_vec(&doc).unwrap();
    let options = IniOptions::new().with_compression(true);
    assert!(matches!(
        from_slice_with_options(&plain, options),
        Err(Error::Decompression(_))
    ));
}

#[test]
fn test_typed_parsing() {
    let mut doc = from_str("[S]\nbig=9999999\nflag=Yes\n").unwrap();
    assert_eq!(doc.parse_value::<i32>("S", "big"), Some(9_999_999));
    assert_eq!(doc.parse_value::<i16>("S", "big"), None);
    assert_eq!(doc.parse_value::<bool>("S", "flag"), None);

    doc.value_mappings_mut().add("yes", true).unwrap();
    assert_eq!(doc.parse_value::<bool>("S", "flag"), Some(true));
    assert_eq!(doc.parse_value::<bool>("S", "missing"), None);
}

#[test]
fn test_encoding_round_trip() {
    let options = IniOptions::new().with_encoding(encoding_rs::WINDOWS_1252);
    let doc = from_str_with_options("[S]\nname=Café\n", options.clone()).unwrap();

    let bytes = to_vec(&doc).unwrap();
    assert_eq!(bytes, b"[S]\nname=Caf\xe9\n");
    let back = from_slice_with_options(&bytes, options).unwrap();
    assert_eq!(back.value("S", "name"), Some("Café"));
}

#[test]
fn test_utf16_round_trip() {
    for encoding in [encoding_rs::UTF_16LE, encoding_rs::UTF_16BE] {
        let options = IniOptions::new().with_encoding(encoding);
        let doc = from_str_with_options("[S]\nname=Café\n", options.clone()).unwrap();

        let bytes = to_vec(&doc).unwrap();
        assert_eq!(bytes.len(), 2 + 2 * "[S]\nname=Café\n".chars().count());
        let back = from_slice_with_options(&bytes, options).unwrap();
        assert_eq!(back, doc);

        let detected = from_slice_with_options(&bytes, IniOptions::new()).unwrap();
        assert_eq!(detected.value("S", "name"), Some("Café"));
    }
}

#[test]
fn test_compressed_bytes_with_trailing_data() {
    let options = IniOptions::new().with_compression(true);
    let doc = from_str_with_options("[S]\nk=v\n", options.clone()).unwrap();
    let mut bytes = to_vec(&doc).unwrap();
    bytes.extend_from_slice(b"[Injected]\n");
    assert!(matches!(
        from_slice_with_options(&bytes, options),
        Err(Error::Decompression(_))
    ));
}
