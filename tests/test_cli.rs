//! Integration tests for the talequiz binary
//!
//! Every command runs inside a throwaway project directory so no user
//! configuration is discovered. Nothing here needs a model server: generation
//! runs with `--offline` and the probe targets a closed loopback port.

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// A closed port: connections are refused immediately
const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/v1";

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    temp
}

fn project_with_config(body: &str) -> TempDir {
    let temp = project();
    fs::create_dir(temp.path().join(".talequiz")).unwrap();
    fs::write(temp.path().join(".talequiz").join("config.toml"), body).unwrap();
    temp
}

fn talequiz(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("talequiz"));
    cmd.current_dir(dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn help_lists_commands() {
    let dir = project();
    talequiz(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("categories"));
}

#[test]
fn categories_lists_builtin_catalog() {
    let dir = project();
    talequiz(&dir)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("animals"))
        .stdout(predicate::str::contains("นิทานสัตว์"));

    let json = stdout_json(talequiz(&dir).args(["categories", "--json"]));
    let entries = json.as_array().unwrap();
    assert!(entries.len() >= 5);
    assert!(entries.iter().any(|e| e["key"] == "animals"));
    assert!(entries.iter().all(|e| !e["themes"].as_array().unwrap().is_empty()));
}

#[test]
fn config_shows_sources() {
    let dir = project_with_config("[generation]\npacing_ms = 0\n");
    let json = stdout_json(talequiz(&dir).args(["config", "--json", "--model", "typhoon"]));

    assert_eq!(json["model"]["value"], "typhoon");
    assert_eq!(json["model"]["source"], "cli");
    assert_eq!(json["pacing_ms"]["source"], "config");
    assert_eq!(json["rounds"]["value"], "10");
    assert_eq!(json["rounds"]["source"], "default");
}

#[test]
fn offline_generate_emits_ten_fallback_items() {
    let dir = project();
    let output = talequiz(&dir)
        .args(["generate", "animals", "--offline", "--json", "--seed", "7"])
        .args(["--base-url", DEAD_ENDPOINT])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[10/10]"), "progress missing from stderr: {stderr}");

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["category"], "animals");
    assert_eq!(json["isOnline"], false);
    assert_eq!(json["modelSourced"], 0);

    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    for (i, item) in items.iter().enumerate() {
        assert_eq!(item["storyTitle"], format!("นิทานสัตว์ {}", i + 1));
        assert_eq!(item["storySource"], "fallback");
        let options = item["options"].as_array().unwrap();
        assert_eq!(options.len(), 4);
        let correct = item["correctIndex"].as_u64().unwrap() as usize;
        assert_eq!(options[correct], item["moral"]);
    }
}

#[test]
fn offline_generate_is_reproducible_with_seed() {
    let dir = project();
    let run = || {
        let json = stdout_json(talequiz(&dir).args([
            "generate",
            "friendship",
            "--offline",
            "--json",
            "--seed",
            "3",
            "-n",
            "4",
        ]));
        json["items"].clone()
    };
    let first = run();
    assert_eq!(first.as_array().unwrap().len(), 4);
    assert_eq!(first, run());
}

#[test]
fn offline_generate_text_output() {
    let dir = project();
    talequiz(&dir)
        .args(["generate", "animals", "--offline", "-n", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. นิทานสัตว์ 1"))
        .stdout(predicate::str::contains("คำถาม:"))
        .stdout(predicate::str::contains("✓ 3 questions (0 from the model, 3 from the corpus)"));
}

#[test]
fn generate_with_unset_api_key_uses_the_corpus() {
    const VAR: &str = "TALEQUIZ_CLI_TEST_UNSET_KEY";
    let dir = project_with_config(&format!("[llm]\napi_key_env = \"{VAR}\"\n"));

    for extra in [&["--offline"][..], &["--base-url", DEAD_ENDPOINT][..]] {
        let output = talequiz(&dir)
            .env_remove(VAR)
            .args(["generate", "animals", "--json", "-n", "3", "--pacing-ms", "0"])
            .args(extra)
            .output()
            .unwrap();

        assert_eq!(
            output.status.code(),
            Some(0),
            "{extra:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let json: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["isOnline"], false);
        assert_eq!(json["useFallback"], true);
        assert_eq!(json["modelSourced"], 0);
        assert_eq!(json["items"].as_array().unwrap().len(), 3);
    }
}

#[test]
fn unknown_category_exits_with_code_4() {
    let dir = project();
    talequiz(&dir)
        .args(["generate", "dragons", "--offline"])
        .assert()
        .code(4)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("dragons"))
        .stderr(predicate::str::contains("talequiz categories"));
}

#[test]
fn invalid_config_file_exits_with_code_3() {
    let dir = project_with_config("[generation\nrounds = ");
    talequiz(&dir)
        .arg("categories")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn zero_rounds_is_rejected() {
    let dir = project();
    talequiz(&dir)
        .args(["generate", "animals", "--offline", "-n", "0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("rounds"));
}

#[test]
fn probe_reports_unavailable_endpoint() {
    let dir = project_with_config("[llm]\nmax_retries = 0\ntimeout_secs = 5\n");
    let json = stdout_json(talequiz(&dir).args(["probe", "--json", "--base-url", DEAD_ENDPOINT]));

    assert_eq!(json["isOnline"], false);
    assert_eq!(json["useFallback"], true);
    assert_eq!(json["endpoint"], "http://127.0.0.1:9/v1/chat/completions");
}

#[test]
fn probe_require_online_exits_with_code_69() {
    let dir = project_with_config("[llm]\nmax_retries = 0\ntimeout_secs = 5\n");
    talequiz(&dir)
        .args(["probe", "--require-online", "--base-url", DEAD_ENDPOINT])
        .assert()
        .code(69)
        .stdout(predicate::str::contains("unavailable"));
}

#[test]
fn corpus_reports_builtin_fallback_for_missing_file() {
    let dir = project();
    let json = stdout_json(talequiz(&dir).args(["corpus", "--json"]));
    assert_eq!(json["source"], "bundled");
    assert_eq!(json["usedBuiltin"], false);
    assert!(json["stories"].as_u64().unwrap() >= 10);

    let json = stdout_json(talequiz(&dir).args(["corpus", "--json", "--corpus", "missing.json"]));
    assert_eq!(json["usedBuiltin"], true);
    assert_eq!(json["stories"], 2);
}
