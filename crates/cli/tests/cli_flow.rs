use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const CHAIN_STREAM: &str = concat!(
    "data: {\"status\":\"start\",\"message\":\"analysing\",\"timestamp\":1718000000.0}\n\n",
    "data: {\"status\":\"step1_start\",\"message\":\"searching news\"}\n\n",
    "data: {garbage\n\n",
    "data: {\"status\":\"step3_complete\",\"message\":\"graph ready\"}\n\n",
    "data: {\"status\":\"success\",\"message\":\"done\",\"data\":{",
    "\"query\":\"why did yields rise\",",
    "\"nodes\":[{\"id\":\"a\",\"label\":\"Inflation\",\"type\":\"cause\",",
    "\"realtime_state\":{\"latest_value\":\"3.4%\",\"trend\":\"rising\",",
    "\"sources\":[{\"url\":\"https://stats.example/cpi\",\"title\":\"CPI\",\"domain\":\"stats.example\"}]}},",
    "{\"id\":\"b\",\"label\":\"Rate hikes\"},{\"id\":\"c\",\"label\":\"Bond yields\",\"type\":\"effect\"}],",
    "\"edges\":[{\"source\":\"a\",\"target\":\"b\",\"strength\":0.8},{\"source\":\"b\",\"target\":\"c\"}]}}\n\n",
);

#[allow(deprecated)]
fn causal_flow() -> Command {
    Command::cargo_bin("causal-flow").expect("binary")
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("valid json on stdout")
}

#[test]
fn ingest_prints_snapshot() {
    let output = causal_flow()
        .arg("ingest")
        .write_stdin(CHAIN_STREAM)
        .output()
        .expect("command run");
    assert!(output.status.success(), "{output:?}");

    let snapshot = stdout_json(&output);
    let nodes = snapshot["positionedNodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    let xs: Vec<f64> = nodes.iter().map(|n| n["x"].as_f64().unwrap()).collect();
    assert!(xs[0] < xs[1] && xs[1] < xs[2]);
    assert_eq!(nodes[0]["y"], nodes[2]["y"]);
    assert_eq!(snapshot["edges"][0]["strengthLevel"], "strong");
    assert_eq!(snapshot["edges"][1]["strengthLevel"], "moderate");
    assert_eq!(snapshot["citationList"][0]["nodeLabel"], "Inflation");
    assert!(snapshot["validationWarnings"].as_array().unwrap().is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("searching news"), "stderr: {stderr}");
}

#[test]
fn ingest_from_file_with_direction_and_export() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("stream.txt");
    fs::write(&input, CHAIN_STREAM).unwrap();

    let output = causal_flow()
        .arg("--quiet")
        .arg("ingest")
        .arg("--input")
        .arg(&input)
        .args(["--direction", "tb", "--export"])
        .output()
        .expect("command run");
    assert!(output.status.success(), "{output:?}");

    let document = stdout_json(&output);
    assert_eq!(document["version"], "1.0.0");
    assert_eq!(document["query"], "why did yields rise");
    assert!(document["timestampMs"].as_u64().unwrap() > 0);
    let nodes = document["snapshot"]["positionedNodes"].as_array().unwrap();
    let ys: Vec<f64> = nodes.iter().map(|n| n["y"].as_f64().unwrap()).collect();
    assert!(ys[0] < ys[1] && ys[1] < ys[2]);
    assert_eq!(document["snapshot"]["direction"], "TB");
}

#[test]
fn upstream_error_is_reported() {
    let stream = concat!(
        "data: {\"status\":\"start\"}\n",
        "data: {\"status\":\"error\",\"message\":\"upstream model unavailable\"}\n",
    );
    let output = causal_flow()
        .arg("ingest")
        .write_stdin(stream)
        .output()
        .expect("command run");
    assert!(!output.status.success());
    let body = stdout_json(&output);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "upstream model unavailable");
}

#[test]
fn stream_without_result_fails() {
    causal_flow()
        .arg("ingest")
        .write_stdin("data: {\"status\":\"start\"}\ndata: {\"status\":\"success\"")
        .assert()
        .failure()
        .stdout(contains("\"status\":\"error\""));
}

#[test]
fn layout_payload_with_config_file() {
    let temp = tempdir().unwrap();
    let payload = temp.path().join("payload.json");
    fs::write(
        &payload,
        r#"{"nodes":[{"id":"a"},{"id":"b"}],"edges":[{"source":"a","target":"b"},{"source":"a","target":"zzz"}]}"#,
    )
    .unwrap();
    let config = temp.path().join("layout.toml");
    fs::write(&config, "direction = \"RL\"\nmarginX = 0.0\nlayerGap = 30.0\n").unwrap();

    let output = causal_flow()
        .arg("layout")
        .arg("--payload")
        .arg(&payload)
        .arg("--config")
        .arg(&config)
        .output()
        .expect("command run");
    assert!(output.status.success(), "{output:?}");

    let snapshot = stdout_json(&output);
    assert_eq!(snapshot["direction"], "RL");
    let nodes = snapshot["positionedNodes"].as_array().unwrap();
    assert_eq!(nodes[0]["x"], 250.0);
    assert_eq!(nodes[1]["x"], 0.0);
    let warnings = snapshot["validationWarnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["kind"], "unknown_target");
}

#[test]
fn invalid_config_is_rejected() {
    let temp = tempdir().unwrap();
    let payload = temp.path().join("payload.json");
    fs::write(&payload, "{}").unwrap();
    let config = temp.path().join("layout.toml");
    fs::write(&config, "nodeWidth = -1.0\n").unwrap();

    causal_flow()
        .arg("layout")
        .arg("--payload")
        .arg(&payload)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(contains("nodeWidth"));
}

#[test]
fn unknown_direction_is_a_usage_error() {
    causal_flow()
        .args(["ingest", "--direction", "sideways"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(contains("unknown direction"));
}

#[test]
fn schema_lists_status_values() {
    let output = causal_flow().arg("schema").output().expect("command run");
    assert!(output.status.success());
    let schema = stdout_json(&output);
    assert!(schema["properties"]["status"].is_object());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("step2_complete"));
}
