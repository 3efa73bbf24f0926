use std::fs;

use monitor_engine::{pretty_artifact, write_artifact, ResultDocument};
use tempfile::TempDir;

#[test]
fn json_artifact_is_pretty_printed() {
    let pretty = pretty_artifact(r#"{"summary":"s"}"#);
    assert_eq!(pretty, "{\n  \"summary\": \"s\"\n}");
}

#[test]
fn non_json_artifact_is_kept_verbatim() {
    assert_eq!(pretty_artifact("plain text"), "plain text");
}

#[test]
fn result_document_is_best_effort() {
    let doc = ResultDocument::parse(
        r#"{"proofread_transcription":"t","summary":"s","metadata":{"tags":["a"]}}"#,
    )
    .expect("document");
    assert_eq!(doc.proofread_transcription.as_deref(), Some("t"));
    assert_eq!(doc.summary, Some(serde_json::json!("s")));

    let partial = ResultDocument::parse("{}").expect("empty object parses");
    assert_eq!(partial.summary, None);
    assert!(ResultDocument::parse("not json").is_none());
}

#[test]
fn write_creates_parent_and_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out").join("result.json");

    let written = write_artifact(&target, r#"{"a":1}"#).unwrap();
    assert_eq!(written, target);
    assert_eq!(fs::read_to_string(&target).unwrap(), "{\n  \"a\": 1\n}\n");

    write_artifact(&target, "second").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "second\n");
}

#[test]
fn write_into_a_file_path_fails_cleanly() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = write_artifact(&blocker.join("result.json"), "data");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
