//! Integration tests for the full Config::from_file_with_env pipeline.
//!
//! These tests exercise the end-to-end flow: TOML file -> raw parse -> env var
//! expansion -> final Config with KeySource metadata -> catalog, roster and
//! provider bindings.
//!
//! Each test uses unique env var names to avoid parallel test interference.

use std::io::Write;

use modelpick::config::{Config, ConfigError, KeySource};
use modelpick::router::Bindings;
use modelpick::{Priority, Provider, Selector, TaskRequest, TaskType};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(content.as_bytes()).expect("write temp config");
    file
}

/// ${VAR} references in api_key are expanded from the environment.
#[test]
fn test_env_expansion_resolves_var() {
    let var_name = "MODELPICK_TEST_CFG_EXPAND_KEY";
    unsafe { std::env::set_var(var_name, "sk-resolved") };

    let file = write_config(&format!(
        r#"
[[providers]]
name = "openai"
url = "http://localhost:4000/v1"
api_key = "${{{}}}"
"#,
        var_name
    ));

    let (config, key_sources) = Config::from_file_with_env(file.path()).unwrap();

    let provider = config
        .providers
        .iter()
        .find(|p| p.name == Provider::OpenAi)
        .expect("openai provider should exist");
    assert_eq!(
        provider.api_key.as_ref().unwrap().expose_secret(),
        "sk-resolved"
    );
    assert_eq!(
        key_sources,
        vec![("openai".to_string(), KeySource::EnvExpanded)]
    );

    // The binding carries the configured endpoint and key
    let selector = Selector::new(config.catalog().unwrap());
    let bindings = Bindings::from_config(&config.providers);
    let model = selector
        .select_model(&TaskRequest::new(TaskType::Coding, Priority::Premium))
        .unwrap();
    let binding = bindings.bind(model);
    assert_eq!(binding.model, "gpt-4o");
    assert_eq!(binding.base_url, "http://localhost:4000/v1");
    assert_eq!(binding.api_key.unwrap().expose_secret(), "sk-resolved");

    unsafe { std::env::remove_var(var_name) };
}

/// Missing env vars produce errors naming the variable and provider.
#[test]
fn test_env_expansion_missing_var_errors() {
    let var_name = "MODELPICK_TEST_CFG_DEFINITELY_MISSING";
    unsafe { std::env::remove_var(var_name) };

    let file = write_config(&format!(
        r#"
[[providers]]
name = "glm"
api_key = "${{{}}}"
"#,
        var_name
    ));

    let err = Config::from_file_with_env(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::EnvVar { .. }));
    let msg = err.to_string();
    assert!(msg.contains(var_name), "{}", msg);
    assert!(msg.contains("glm"), "{}", msg);
}

/// A literal key is used as-is.
#[test]
fn test_literal_key() {
    let file = write_config(
        r#"
[[providers]]
name = "deepseek"
api_key = "ds-literal"
"#,
    );

    let (config, key_sources) = Config::from_file_with_env(file.path()).unwrap();
    assert_eq!(key_sources[0].1, KeySource::Literal);
    assert_eq!(
        config.providers[0].api_key.as_ref().unwrap().expose_secret(),
        "ds-literal"
    );
    assert_eq!(config.providers[0].base_url(), "https://api.deepseek.com/v1");
}

/// A missing file is an I/O error naming the path.
#[test]
fn test_missing_file() {
    let err = Config::from_file_with_env("/nonexistent/modelpick.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/modelpick.toml"));
}

/// A custom model table replaces the built-in one and drives selection.
#[test]
fn test_custom_table_drives_selection() {
    let file = write_config(
        r#"
[server]
listen = "127.0.0.1:0"

[[models]]
name = "glm-4.5-air"
cost_per_1k_tokens = 0.00015
tags = ["research", "creative", "analysis", "coding"]
tier = "budget"

[[models]]
name = "glm-4.5"
cost_per_1k_tokens = 0.00020
tags = ["research", "creative", "analysis", "coding"]
tier = "balanced"

[[agents]]
name = "translator"
task_type = "creative"
priority = "premium"

[[pipelines]]
name = "localize"
kind = "workflow"
steps = [
  { name = "Draft", agent = "content-writer" },
  { name = "Translate", agent = "translator" },
]
"#,
    );

    let (config, _) = Config::from_file_with_env(file.path()).unwrap();
    assert!(config.coverage_gaps().is_empty());

    let selector = Selector::new(config.catalog().unwrap());
    assert_eq!(selector.cheapest_model().name, "glm-4.5-air");

    let roster = config.roster().unwrap();
    // No premium designee in this table: premium drops to the balanced one
    assert_eq!(
        roster.resolve_agent(&selector, "translator").unwrap().name,
        "glm-4.5"
    );

    let plan = roster.plan(&selector, "localize").unwrap();
    let models: Vec<&str> = plan.steps.iter().map(|s| s.model.name.as_str()).collect();
    assert_eq!(models, vec!["glm-4.5", "glm-4.5"]);
}

/// Validation errors surface as ConfigError::Validation.
#[test]
fn test_invalid_model_cost_rejected() {
    let file = write_config(
        r#"
[[models]]
name = "gpt-4o"
cost_per_1k_tokens = -0.5
tags = ["research"]
"#,
    );

    let err = Config::from_file_with_env(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "{}", err);
}

/// default_model, pinned agents and per-model generation settings from a file.
#[test]
fn test_default_model_and_pinned_agent() {
    let file = write_config(
        r#"
default_model = "gpt-4o-mini"

[[models]]
name = "gpt-4o-mini"
cost_per_1k_tokens = 0.00015
tags = ["research", "creative", "analysis", "coding"]
tier = "balanced"

[[models]]
name = "gemini-2.0-flash"
cost_per_1k_tokens = 0.00030
tags = ["research", "analysis"]
tier = "premium"
max_tokens = 8192
temperature = 0.4

[[agents]]
name = "vision-analyst"
task_type = "analysis"
pinned_model = "gemini-2.0-flash"

[[agents]]
name = "rag-assistant"
task_type = "research"
"#,
    );

    let (config, _) = Config::from_file_with_env(file.path()).unwrap();
    let selector = config.selector().unwrap();
    assert_eq!(selector.default_model().name, "gpt-4o-mini");

    let roster = config.roster().unwrap();
    let vision = roster.resolve_agent(&selector, "vision-analyst").unwrap();
    assert_eq!(vision.name, "gemini-2.0-flash");

    let binding = Bindings::from_config(&config.providers).bind(vision);
    assert_eq!(binding.max_tokens, 8192);
    assert_eq!(binding.temperature, 0.4);

    // Overriding a pinned built-in with an unpinned profile restores selection
    let rag = roster.resolve_agent(&selector, "rag-assistant").unwrap();
    assert_eq!(rag.name, "gpt-4o-mini");
}
