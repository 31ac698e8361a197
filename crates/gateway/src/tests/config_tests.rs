use super::{GatewaySettings, DEFAULT_ENDPOINT, DEFAULT_MODEL};

use std::{collections::HashMap, time::Duration};

fn settings_with(vars: &[(&str, &str)]) -> GatewaySettings {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    GatewaySettings::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_match_reference_behavior() {
    let settings = settings_with(&[]);
    assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(settings.model, DEFAULT_MODEL);
    assert_eq!(settings.max_retries, 0);
    assert_eq!(settings.request_timeout, None);
    assert_eq!(settings.api_key_vars, vec!["GEMINI_API_KEY", "API_KEY"]);
}

#[test]
fn prefixed_variables_override_plain_ones() {
    let settings = settings_with(&[
        ("GEMINI_MODEL", "plain-model"),
        ("APP__GEMINI_MODEL", "prefixed-model"),
        ("GEMINI_ENDPOINT", "http://plain"),
    ]);
    assert_eq!(settings.model, "prefixed-model");
    assert_eq!(settings.endpoint, "http://plain");
}

#[test]
fn parses_retry_and_timeout_knobs() {
    let settings = settings_with(&[
        ("APP__GENERATION_MAX_RETRIES", "3"),
        ("APP__GENERATION_RETRY_BACKOFF_MS", "250"),
        ("APP__GENERATION_TIMEOUT_SECS", "90"),
    ]);
    assert_eq!(settings.max_retries, 3);
    assert_eq!(settings.retry_backoff, Duration::from_millis(250));
    assert_eq!(settings.request_timeout, Some(Duration::from_secs(90)));
}

#[test]
fn ignores_unparsable_numbers_and_treats_zero_timeout_as_none() {
    let settings = settings_with(&[
        ("APP__GENERATION_MAX_RETRIES", "many"),
        ("APP__GENERATION_TIMEOUT_SECS", "0"),
    ]);
    assert_eq!(settings.max_retries, 0);
    assert_eq!(settings.request_timeout, None);
}

#[test]
fn builds_generate_content_url() {
    let settings = settings_with(&[
        ("APP__GEMINI_ENDPOINT", "http://127.0.0.1:9999/"),
        ("APP__GEMINI_MODEL", "test-model"),
    ]);
    assert_eq!(
        settings.generate_url(),
        "http://127.0.0.1:9999/v1beta/models/test-model:generateContent"
    );
}

#[test]
fn resolves_first_non_blank_key() {
    std::env::set_var("CHARACTER_STUDIO_TEST_BLANK_KEY", "   ");
    std::env::set_var("CHARACTER_STUDIO_TEST_REAL_KEY", " secret ");
    let settings = GatewaySettings {
        api_key_vars: vec![
            "CHARACTER_STUDIO_TEST_UNSET_KEY".into(),
            "CHARACTER_STUDIO_TEST_BLANK_KEY".into(),
            "CHARACTER_STUDIO_TEST_REAL_KEY".into(),
        ],
        ..GatewaySettings::default()
    };
    assert_eq!(settings.resolve_api_key().as_deref(), Some("secret"));

    let missing = GatewaySettings {
        api_key_vars: vec!["CHARACTER_STUDIO_TEST_UNSET_KEY".into()],
        ..GatewaySettings::default()
    };
    assert_eq!(missing.resolve_api_key(), None);
}
