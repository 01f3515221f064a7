use super::{normalize_api_url, resolve_settings, Settings};

use std::{collections::HashMap, path::PathBuf};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn falls_back_to_defaults_without_file_or_env() {
    assert_eq!(resolve_settings(None, env_from(&[])), Settings::default());
}

#[test]
fn settings_file_overrides_defaults() {
    let raw = r#"
api_url = "http://predict.internal:9000"
output_dir = "results"
"#;
    let settings = resolve_settings(Some(raw), env_from(&[]));
    assert_eq!(settings.api_url, "http://predict.internal:9000");
    assert_eq!(settings.output_dir, PathBuf::from("results"));
}

#[test]
fn environment_overrides_settings_file() {
    let raw = r#"api_url = "http://from-file:9000""#;
    let settings = resolve_settings(
        Some(raw),
        env_from(&[
            ("PREDICT_API_URL", "http://from-env:8000"),
            ("PREDICT_OUTPUT_DIR", "/tmp/out"),
        ]),
    );
    assert_eq!(settings.api_url, "http://from-env:8000");
    assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
}

#[test]
fn app_prefixed_environment_wins() {
    let settings = resolve_settings(
        None,
        env_from(&[
            ("PREDICT_API_URL", "http://plain:8000"),
            ("APP__API_URL", "http://prefixed:8000"),
        ]),
    );
    assert_eq!(settings.api_url, "http://prefixed:8000");
}

#[test]
fn ignores_malformed_settings_file() {
    let settings = resolve_settings(Some("api_url = [not toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn normalizes_trailing_slashes_and_whitespace() {
    assert_eq!(
        normalize_api_url("  http://localhost:8000/  ").expect("valid"),
        "http://localhost:8000"
    );
    assert_eq!(
        normalize_api_url("https://predict.example.com/base//").expect("valid"),
        "https://predict.example.com/base"
    );
}

#[test]
fn rejects_empty_unparsable_and_non_http_urls() {
    assert!(normalize_api_url("   ").is_err());
    assert!(normalize_api_url("not a url").is_err());
    let err = normalize_api_url("ftp://files.example.com").expect_err("ftp");
    assert!(err.to_string().contains("http or https"), "{err}");
}
