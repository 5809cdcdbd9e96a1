//! Configuration parsing and validation for modelpick.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;

use crate::agents::{AgentProfile, Pipeline, Roster};
use crate::catalog::{Catalog, ModelDescriptor, Priority, Provider, TaskType};
use crate::router::Selector;

/// Environment variable that overrides `default_model`.
pub const DEFAULT_MODEL_ENV: &str = "DEFAULT_MODEL_ID";

/// Root configuration, with provider keys already resolved.
///
/// Built by [`Config::from_file_with_env`] or [`Config::parse_str_with_env`];
/// `Config::default()` is the built-in setup with no providers configured.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// Replaces the built-in model table when non-empty
    pub models: Vec<ModelConfig>,
    pub providers: Vec<ProviderConfig>,
    pub agents: Vec<AgentProfile>,
    pub pipelines: Vec<Pipeline>,
    /// Model returned to callers that do not describe a task
    pub default_model: Option<String>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8080")
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// One entry of the model table.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    /// Detected from the model name when omitted
    pub provider: Option<Provider>,
    /// Price in USD per 1000 tokens
    pub cost_per_1k_tokens: f64,
    pub tags: Vec<TaskType>,
    #[serde(default)]
    pub tier: Priority,
    /// Sampling temperature override
    pub temperature: Option<f64>,
    /// Response token limit override
    pub max_tokens: Option<u32>,
}

impl ModelConfig {
    fn to_descriptor(&self) -> Result<ModelDescriptor, ConfigError> {
        let provider = self
            .provider
            .or_else(|| Provider::detect(&self.name))
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "Cannot detect provider for model '{}'; set `provider` explicitly",
                    self.name
                ))
            })?;

        let mut descriptor = ModelDescriptor::new(
            self.name.clone(),
            provider,
            self.cost_per_1k_tokens,
            &self.tags,
            self.tier,
        );
        if let Some(temperature) = self.temperature {
            descriptor = descriptor.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            descriptor = descriptor.with_max_tokens(max_tokens);
        }
        Ok(descriptor)
    }
}

/// Provider API key. Prints and serializes as `[REDACTED]`.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        ApiKey(SecretString::from(s))
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        ApiKey(SecretString::from(s))
    }
}

/// Where a provider's API key came from, reported by `modelpick check`.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySource {
    Literal,
    /// `${VAR}` references in the config value
    EnvExpanded,
    /// `<PROVIDER>_API_KEY`, holding the variable name
    Convention(String),
    None,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Literal => write!(f, "config-literal"),
            KeySource::EnvExpanded => write!(f, "env-expanded"),
            KeySource::Convention(var) => write!(f, "convention ({})", var),
            KeySource::None => write!(f, "none"),
        }
    }
}

/// Provider endpoint configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Which provider this entry configures
    pub name: Provider,
    /// Base URL override; the provider default is used when absent
    pub url: Option<String>,
    /// Optional API key
    pub api_key: Option<ApiKey>,
}

impl ProviderConfig {
    /// Configured URL, or the provider's public endpoint.
    pub fn base_url(&self) -> &str {
        self.url
            .as_deref()
            .unwrap_or_else(|| self.name.default_base_url())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for (i, provider) in self.providers.iter().enumerate() {
            if provider.url.as_deref().is_some_and(|u| u.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "Provider '{}' has empty URL",
                    provider.name
                )));
            }
            if self.providers[..i].iter().any(|p| p.name == provider.name) {
                return Err(ConfigError::Validation(format!(
                    "Provider '{}' is configured more than once",
                    provider.name
                )));
            }
        }

        self.selector()?;
        self.roster()?;

        Ok(())
    }

    /// Build the selector over the model table, with the default model applied.
    pub fn selector(&self) -> Result<Selector, ConfigError> {
        let selector = Selector::new(self.catalog()?);
        match &self.default_model {
            Some(name) => selector.with_default_model(name).map_err(|_| {
                ConfigError::Validation(format!(
                    "Default model '{}' is not in the model table",
                    name
                ))
            }),
            None => Ok(selector),
        }
    }

    /// Build the model table: the configured models, or the built-in table.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        if self.models.is_empty() {
            return Ok(Catalog::builtin());
        }

        let models = self
            .models
            .iter()
            .map(ModelConfig::to_descriptor)
            .collect::<Result<Vec<_>, _>>()?;

        Catalog::new(models)
    }

    /// Build the agent roster: built-ins plus configured overrides.
    pub fn roster(&self) -> Result<Roster, ConfigError> {
        Roster::with_overrides(self.agents.clone(), self.pipelines.clone())
    }

    /// Task types the model table cannot serve at all.
    pub fn coverage_gaps(&self) -> Vec<TaskType> {
        self.catalog()
            .map(|catalog| catalog.coverage_gaps())
            .unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable '{var}' not set for provider '{provider}': {message}")]
    EnvVar {
        var: String,
        provider: String,
        message: String,
    },
}

/// Provider entry as written in the file; `api_key` may hold `${VAR}` references.
#[derive(Deserialize)]
struct RawProviderConfig {
    name: Provider,
    url: Option<String>,
    api_key: Option<String>,
}

/// The file as written, before key resolution.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    models: Vec<ModelConfig>,
    #[serde(default)]
    providers: Vec<RawProviderConfig>,
    #[serde(default)]
    agents: Vec<AgentProfile>,
    #[serde(default)]
    pipelines: Vec<Pipeline>,
    default_model: Option<String>,
}

/// Expand all `${VAR}` references in a string using a custom lookup function.
///
/// Supports multiple `${VAR}` in one string (e.g., `${SCHEME}://${HOST}/v1`).
/// Fails on first missing variable, unclosed `${`, or empty variable name.
fn expand_env_vars_with<F>(
    input: &str,
    provider_name: &str,
    lookup: F,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains("${") {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let end = after.find('}').ok_or_else(|| ConfigError::EnvVar {
            var: "<unclosed>".to_string(),
            provider: provider_name.to_string(),
            message: format!("Unclosed '${{' in config value: {}", input),
        })?;

        let var_name = &after[..end];
        if var_name.is_empty() {
            return Err(ConfigError::EnvVar {
                var: "".to_string(),
                provider: provider_name.to_string(),
                message: "Empty variable name in '${}' reference".to_string(),
            });
        }

        let value = lookup(var_name).ok_or_else(|| ConfigError::EnvVar {
            var: var_name.to_string(),
            provider: provider_name.to_string(),
            message: format!(
                "Environment variable '{}' is not set (referenced in provider '{}')",
                var_name, provider_name
            ),
        })?;

        result.push_str(&value);
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Derive the convention-based env var name for a provider.
///
/// Transforms provider name to `<UPPER_SNAKE_NAME>_API_KEY`:
/// - "openai" -> "OPENAI_API_KEY"
/// - "deepseek" -> "DEEPSEEK_API_KEY"
/// - "my-gateway" -> "MY_GATEWAY_API_KEY"
pub fn convention_env_var_name(provider_name: &str) -> String {
    let upper_snake = provider_name.to_uppercase().replace(['-', ' '], "_");
    format!("{}_API_KEY", upper_snake)
}

impl Config {
    /// Resolve provider keys and the default model through `lookup`.
    ///
    /// A key with `${VAR}` references is expanded, a plain key is used as
    /// written, and a missing key falls back to `<PROVIDER>_API_KEY`.
    /// `DEFAULT_MODEL_ID`, when set and non-empty, overrides `default_model`.
    fn from_raw_with<F>(
        raw: RawConfig,
        lookup: F,
    ) -> Result<(Self, Vec<(String, KeySource)>), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut providers = Vec::with_capacity(raw.providers.len());
        let mut key_sources = Vec::with_capacity(raw.providers.len());

        for rp in raw.providers {
            let provider_name = rp.name.as_str();
            let (api_key, source) = match rp.api_key {
                Some(ref raw_key) if raw_key.contains("${") => {
                    let expanded = expand_env_vars_with(raw_key, provider_name, &lookup)?;
                    (Some(ApiKey::from(expanded)), KeySource::EnvExpanded)
                }
                Some(ref raw_key) => (Some(ApiKey::from(raw_key.as_str())), KeySource::Literal),
                None => {
                    let var_name = convention_env_var_name(provider_name);
                    match lookup(&var_name) {
                        Some(value) => (Some(ApiKey::from(value)), KeySource::Convention(var_name)),
                        None => (None, KeySource::None),
                    }
                }
            };

            key_sources.push((provider_name.to_string(), source));

            providers.push(ProviderConfig {
                name: rp.name,
                url: rp.url,
                api_key,
            });
        }

        let default_model = lookup(DEFAULT_MODEL_ENV)
            .filter(|name| !name.trim().is_empty())
            .or(raw.default_model);

        let config = Config {
            server: raw.server,
            logging: raw.logging,
            models: raw.models,
            providers,
            agents: raw.agents,
            pipelines: raw.pipelines,
            default_model,
        };

        Ok((config, key_sources))
    }

    /// Parse and validate a TOML string, resolving keys from the environment.
    pub fn parse_str_with_env(
        content: &str,
    ) -> Result<(Self, Vec<(String, KeySource)>), ConfigError> {
        Self::parse_str_with(content, |name| std::env::var(name).ok())
    }

    fn parse_str_with<F>(
        content: &str,
        lookup: F,
    ) -> Result<(Self, Vec<(String, KeySource)>), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw: RawConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        let (config, key_sources) = Self::from_raw_with(raw, lookup)?;
        config.validate()?;

        Ok((config, key_sources))
    }

    /// Read, parse and validate a config file, resolving keys from the
    /// environment. Also returns where each provider's key came from.
    pub fn from_file_with_env(
        path: impl AsRef<Path>,
    ) -> Result<(Self, Vec<(String, KeySource)>), ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;

        Self::parse_str_with_env(&content)
    }
}
