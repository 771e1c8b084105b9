use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use trace_uml_studio::input::{parse_traces, JsonFileReader, TraceReader};
use trace_uml_studio::utils::error::InputError;

fn trace_json(trace_id: &str) -> serde_json::Value {
    json!({
        "traceID": trace_id,
        "spans": [
            {"traceID": trace_id, "spanID": "a", "operationName": "GET /", "references": [],
             "startTime": 1, "duration": 2, "tags": [], "processID": "p1"}
        ],
        "processes": {"p1": {"serviceName": "frontend", "tags": []}}
    })
}

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

#[test]
fn test_parse_all_three_shapes() {
    let envelope = parse_traces(json!({"data": [trace_json("t1"), trace_json("t2")]})).unwrap();
    let array = parse_traces(json!([trace_json("t1"), trace_json("t2")])).unwrap();
    let single = parse_traces(trace_json("t1")).unwrap();

    assert_eq!(envelope.len(), 2);
    assert_eq!(envelope, array);
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].trace_id, "t1");
}

#[test]
fn test_unrecognised_shape_is_error() {
    assert!(parse_traces(json!({"result": []})).is_err());
    assert!(parse_traces(json!(42)).is_err());
}

#[test]
fn test_read_single_file_sets_source_name() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "checkout-flow.json", &json!({"data": [trace_json("t1")]}));

    let traces = JsonFileReader::new(dir.path().join("checkout-flow.json"))
        .read_traces()
        .unwrap();

    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].source_name.as_deref(), Some("checkout-flow"));
}

#[test]
fn test_read_directory_sorted_and_filtered() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "b.json", &trace_json("from-b"));
    write_json(dir.path(), "a.json", &json!([trace_json("from-a")]));
    fs::write(dir.path().join("notes.txt"), "not a trace").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    write_json(&dir.path().join("nested"), "c.json", &trace_json("from-c"));

    let traces = JsonFileReader::new(dir.path()).read_traces().unwrap();
    let ids: Vec<&str> = traces.iter().map(|t| t.trace_id.as_str()).collect();

    assert_eq!(ids, vec!["from-a", "from-b"]);
    assert_eq!(traces[0].source_name.as_deref(), Some("a"));
}

#[test]
fn test_empty_directory_is_empty_result() {
    let dir = TempDir::new().unwrap();
    let traces = JsonFileReader::new(dir.path()).read_traces().unwrap();
    assert!(traces.is_empty());
}

#[test]
fn test_malformed_file_is_hard_error() {
    let dir = TempDir::new().unwrap();
    write_json(dir.path(), "good.json", &trace_json("ok"));
    fs::write(dir.path().join("zz-bad.json"), "{\"data\": [").unwrap();

    let err = JsonFileReader::new(dir.path()).read_traces().unwrap_err();
    match err {
        InputError::ParseFailed { path, .. } => assert!(path.ends_with("zz-bad.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_path() {
    let dir = TempDir::new().unwrap();
    let result = JsonFileReader::new(dir.path().join("nope.json")).read_traces();
    assert!(matches!(result, Err(InputError::NotFound(_))));
}
