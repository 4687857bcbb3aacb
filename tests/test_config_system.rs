//! Configuration flowing from files and CLI overrides into the quiz service

use serial_test::serial;
use std::fs;
use tempfile::TempDir;

use talequiz::llm::{ChatBackend as _, ConnectivityError};
use talequiz::{CliArgs, Config, ConfigSource, QuizService, TaleQuizError};

fn project_with_config(body: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    fs::create_dir(temp.path().join(".talequiz")).unwrap();
    fs::write(temp.path().join(".talequiz").join("config.toml"), body).unwrap();
    temp
}

#[test]
fn explicit_config_path_wins_over_discovery() {
    let discovered = project_with_config("[generation]\nrounds = 3\n");
    let other = TempDir::new().unwrap();
    let explicit = other.path().join("quiz.toml");
    fs::write(&explicit, "[generation]\nrounds = 7\n").unwrap();

    let cli = CliArgs {
        config_path: Some(explicit),
        ..Default::default()
    };
    let config = Config::discover_from(discovered.path(), &cli).unwrap();
    assert_eq!(config.generation.rounds, 7);
}

#[test]
fn effective_config_reports_every_layer() {
    let temp = project_with_config(
        r#"
[llm]
model = "typhoon-7b"

[generation]
pacing_ms = 250
"#,
    );
    let cli = CliArgs {
        rounds: Some(4),
        ..Default::default()
    };
    let config = Config::discover_from(temp.path(), &cli).unwrap();
    let effective = config.effective_config();

    assert_eq!(effective["model"], ("typhoon-7b".to_string(), "config".to_string()));
    assert_eq!(effective["pacing_ms"], ("250".to_string(), "config".to_string()));
    assert_eq!(effective["rounds"], ("4".to_string(), "cli".to_string()));
    assert_eq!(effective["base_url"].1, "default");
    assert_eq!(config.overridden_keys().get("rounds"), Some(&&ConfigSource::Cli));
}

#[test]
fn out_of_range_rounds_is_rejected_with_key() {
    let temp = project_with_config("[generation]\nrounds = 0\n");
    let err = Config::discover_from(temp.path(), &CliArgs::default()).unwrap_err();
    let typed = err.downcast_ref::<TaleQuizError>().expect("typed config error");
    assert!(typed.to_string().contains("rounds"));
    assert_eq!(typed.to_exit_code().as_i32(), 3);
}

#[tokio::test]
async fn seeded_config_produces_reproducible_offline_sets() {
    let config = Config::builder().seed(11).pacing_ms(0).build().unwrap();
    let category = config.category("animals").unwrap();

    let mut sets = Vec::new();
    for _ in 0..2 {
        let backend = talequiz::llm::from_config(&config).unwrap();
        let mut service = QuizService::from_config(&config, backend);
        sets.push(
            service
                .generate_question_set(&category.name, &category.themes, 5, None)
                .await,
        );
    }
    assert_eq!(sets[0], sets[1]);
    assert_eq!(sets[0].len(), 5);
}

#[test]
#[serial]
fn missing_api_key_variable_is_a_misconfiguration() {
    const VAR: &str = "TALEQUIZ_TEST_MISSING_KEY";
    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::remove_var(VAR) };

    let config = Config::builder().api_key_env(VAR).build().unwrap();
    match talequiz::llm::from_config(&config) {
        Err(ConnectivityError::Misconfiguration(msg)) => assert!(msg.contains(VAR)),
        Err(other) => panic!("Expected Misconfiguration, got {other:?}"),
        Ok(_) => panic!("Expected Misconfiguration, got a backend"),
    }
}

#[test]
#[serial]
fn present_api_key_variable_builds_backend() {
    const VAR: &str = "TALEQUIZ_TEST_PRESENT_KEY";
    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::set_var(VAR, "local-secret") };

    let config = Config::builder().api_key_env(VAR).build().unwrap();
    let backend = talequiz::llm::from_config(&config).unwrap();
    assert_eq!(backend.name(), "openai-compatible");

    unsafe { std::env::remove_var(VAR) };
}
