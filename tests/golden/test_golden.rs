use std::fs;
use std::path::PathBuf;

use mcp_schema_validator::registry::SchemaRegistry;
use serde_json::json;

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/golden/fixtures")
}

fn read_expected(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden/expected")
        .join(name);
    fs::read_to_string(path)
        .expect("expected file missing")
        .trim_end()
        .to_string()
}

fn load_fixtures() -> SchemaRegistry {
    SchemaRegistry::load(&fixtures_root().join("schemas")).expect("fixture root must load")
}

#[test]
fn golden_registry_listing() {
    let registry = load_fixtures();

    let listing = serde_json::to_string_pretty(&registry.entries()).unwrap();
    assert_eq!(listing, read_expected("schemas.json"), "registry listing does not match golden");
}

#[test]
fn golden_registry_rejections() {
    let registry = load_fixtures();
    let rejected = registry.rejected();

    // Non-JSON files and subdirectories are never considered.
    let names: Vec<&str> = rejected.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["flags", "truncated"]);

    assert_eq!(
        rejected[0].reason,
        r#"invalid schema: property "enabled": key "minLength" is not allowed on boolean schema (allowed: type, default)"#
    );
    assert!(rejected[1].reason.starts_with("JSON parse error: "), "{}", rejected[1].reason);

    assert!(registry.get("flags").is_none());
    assert!(registry.get("ignored").is_none());
}

#[test]
fn golden_registered_schemas_validate_data() {
    let registry = load_fixtures();
    assert_eq!(registry.len(), 2);

    let status = &registry.get("status").unwrap().schema;
    assert!(status.check(&json!({ "code": 200 })).is_valid());
    assert_eq!(
        status.check(&json!({})).reason.as_deref(),
        Some(r#"missing required properties: "code""#)
    );

    let tags = &registry.get("tags").unwrap().schema;
    assert!(tags.check(&json!(["rust", "json"])).is_valid());
    assert_eq!(
        tags.check(&json!(["a", "b", "c", "d", "e"])).reason.as_deref(),
        Some("maxItems violated: 5 > 4")
    );
    assert_eq!(
        tags.check(&json!(["ok", ""])).reason.as_deref(),
        Some("item 1: minLength violated: 0 < 1")
    );
}

#[test]
fn missing_root_is_an_error() {
    let err = SchemaRegistry::load(&fixtures_root().join("does-not-exist")).unwrap_err();
    assert!(err.to_string().contains("is not a directory"), "{err}");
}

#[test]
fn unreadable_file_is_rejected_without_failing_the_load() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("good.json"), r#"{ "type": "number" }"#).unwrap();
    fs::write(tmp.path().join("bad.json"), [0xff, 0xfe, 0x7b]).unwrap();

    let registry = SchemaRegistry::load(tmp.path()).expect("one bad file must not fail the load");

    assert!(registry.get("good").is_some());
    assert!(registry.get("bad").is_none());

    let rejected = registry.rejected();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].name, "bad");
    assert!(rejected[0].reason.starts_with("cannot read schema file: "), "{}", rejected[0].reason);
}
