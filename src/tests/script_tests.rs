//! Tests for operation scripts.

use crate::data_structures::{LanaiTrie, LanaiTrieConfig};
use crate::error::script::ScriptError;
use crate::script::{Script, ScriptValue, Step, ValueType};
use crate::tests::test_utils::TestFixture;

const HEADER_SCRIPT: &str = r#"
[[step]]
op = "insert"
key = "port"
value = 8080

[[step]]
op = "insert"
key = "portal"
value = "https://example.com"

[[step]]
op = "insert"
key = "port"
value = 9090
expect = false

[[step]]
op = "get"
key = "port"
type = "int"
expect = true

[[step]]
op = "get"
key = "port"
type = "string"
expect = false

[[step]]
op = "remove"
key = "port"
expect = true

[[step]]
op = "contains"
key = "portal"
expect = true

[[step]]
op = "get"
key = "port"
type = "int"
expect = false
"#;

#[test]
fn test_parse_steps() {
    let script: Script = HEADER_SCRIPT.parse().unwrap();
    assert_eq!(script.steps().len(), 8);
    assert_eq!(
        script.steps()[0],
        Step::Insert {
            key: "port".to_string(),
            value: ScriptValue::Int(8080),
            expect: None,
        }
    );
    assert_eq!(
        script.steps()[4],
        Step::Get {
            key: "port".to_string(),
            value_type: ValueType::String,
            expect: Some(false),
        }
    );
}

#[test]
fn test_parse_value_types() {
    let script: Script = r#"
        [[step]]
        op = "insert"
        key = "a"
        value = true

        [[step]]
        op = "insert"
        key = "b"
        value = 1.5
    "#
    .parse()
    .unwrap();

    assert!(matches!(
        script.steps()[0],
        Step::Insert { value: ScriptValue::Bool(true), .. }
    ));
    assert!(matches!(
        script.steps()[1],
        Step::Insert { value: ScriptValue::Float(v), .. } if v == 1.5
    ));
}

#[test]
fn test_run_meets_expectations() {
    let script: Script = HEADER_SCRIPT.parse().unwrap();
    let trie = LanaiTrie::new();
    let report = script.run(&trie);

    assert!(report.passed());
    assert_eq!(report.succeeded(), 5);
    assert_eq!(report.outcomes()[3].detail.as_deref(), Some("8080"));
    assert_eq!(trie.len(), 1);
    assert_eq!(
        trie.get::<String>("portal"),
        Some("https://example.com".to_string())
    );
}

#[test]
fn test_run_reports_unmet_expectations() {
    let script: Script = r#"
        [[step]]
        op = "remove"
        key = "missing"
        expect = true
    "#
    .parse()
    .unwrap();

    let report = script.run(&LanaiTrie::new());
    assert!(!report.passed());
    let unmet: Vec<_> = report.unmet_expectations().collect();
    assert_eq!(unmet.len(), 1);
    assert_eq!(unmet[0].detail.as_deref(), Some("Key not found: missing"));
}

#[test]
fn test_run_respects_trie_config() {
    let script: Script = r#"
        [[step]]
        op = "insert"
        key = "toolong"
        value = 1
        expect = false
    "#
    .parse()
    .unwrap();

    let trie = LanaiTrie::with_config(LanaiTrieConfig::new().with_max_key_len(3));
    assert!(script.run(&trie).passed());
    assert!(trie.is_empty());
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        "[[step]]\nop = \"upsert\"\nkey = \"a\"\n".parse::<Script>(),
        Err(ScriptError::ParseError(_))
    ));
    assert!(matches!(
        "[[step]]\nop = \"get\"\nkey = \"a\"\ntype = \"bytes\"\n".parse::<Script>(),
        Err(ScriptError::ParseError(_))
    ));
    assert_eq!("".parse::<Script>().unwrap().steps().len(), 0);
}

#[test]
fn test_from_path() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture.create_file("script.toml", HEADER_SCRIPT).unwrap();
    assert_eq!(Script::from_path(&path).unwrap().steps().len(), 8);

    let missing = fixture.temp_dir.path().join("missing.toml");
    assert!(matches!(
        Script::from_path(&missing),
        Err(ScriptError::FileNotFound(_))
    ));
}

#[test]
fn test_from_path_unreadable_is_io_error() {
    let fixture = TestFixture::new().unwrap();
    assert!(matches!(
        Script::from_path(fixture.temp_dir.path()),
        Err(ScriptError::Io(_))
    ));

    let binary = fixture.create_file("binary.toml", [0xffu8, 0xfe, 0x00]).unwrap();
    assert!(matches!(
        Script::from_path(&binary),
        Err(ScriptError::Io(_))
    ));
}

#[test]
fn test_demo_script_passes() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/headers.toml");
    let script = Script::from_path(path).unwrap();
    let trie = LanaiTrie::new();
    assert!(script.run(&trie).passed());
    assert_eq!(trie.len(), 2);
}
