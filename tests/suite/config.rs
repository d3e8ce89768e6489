//! Config files drive the session's collaborators.

use threshold_engine::{ConfigError, ThresholdConfig};
use threshold_gestures::OrientationSupport;
use threshold_providers::{ContentSource, RemoteJudge};

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn full_config_builds_every_collaborator() {
    unsafe {
        std::env::set_var("THRESHOLD_IT_CONTENT_KEY", "anon-from-env");
    }
    let (_dir, path) = write_config(
        r#"
[unlock]
tap_trigger_count = 3
challenge_enabled = true

[judge]
kind = "claude"
api_key = "sk-ant-file"
timeout_secs = 4

[content]
base_url = "https://example.supabase.co"
api_key = "${THRESHOLD_IT_CONTENT_KEY}"

[device]
orientation = "unsupported"
"#,
    );

    let config = ThresholdConfig::load_from(&path).unwrap().unwrap();
    assert_eq!(config.unlock.tap_trigger_count(), 3);
    assert!(matches!(config.judge(), Ok(RemoteJudge::Claude(_))));
    assert_eq!(config.evaluation_timeout().as_secs(), 4);
    assert!(matches!(config.content_source(), Ok(ContentSource::Rest(_))));
    assert_eq!(config.orientation_support(), OrientationSupport::Unsupported);

    let debug = format!("{config:?}");
    assert!(!debug.contains("sk-ant-file"));
    assert!(!debug.contains("anon-from-env"));

    unsafe {
        std::env::remove_var("THRESHOLD_IT_CONTENT_KEY");
    }
}

#[test]
fn invalid_unlock_value_is_a_parse_error() {
    let (_dir, path) = write_config("[unlock]\nswipe_divisor_px = 0\n");
    let err = ThresholdConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn function_judge_without_url_is_invalid() {
    let (_dir, path) = write_config("[judge]\nkind = \"function\"\n");
    let config = ThresholdConfig::load_from(&path).unwrap().unwrap();
    assert!(matches!(
        config.judge(),
        Err(ConfigError::Invalid { field: "judge.url", .. })
    ));
}
