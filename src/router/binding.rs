//! Provider endpoint resolution for selected models.

use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::{ModelDescriptor, Priority, Provider};
use crate::config::{convention_env_var_name, ApiKey, ProviderConfig};

/// Everything the hosted-LLM client needs to call a selected model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelBinding {
    pub model: String,
    pub provider: Provider,
    pub base_url: String,
    /// Redacted when serialized
    pub api_key: Option<ApiKey>,
    pub cost_per_1k_tokens: f64,
    pub tier: Priority,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
struct Endpoint {
    base_url: String,
    api_key: Option<ApiKey>,
}

/// Provider endpoints, resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    endpoints: HashMap<Provider, Endpoint>,
}

impl Bindings {
    /// Resolve endpoints from config, falling back to provider defaults and
    /// `<PROVIDER>_API_KEY` environment variables.
    pub fn from_config(providers: &[ProviderConfig]) -> Self {
        Self::with_lookup(providers, |name| std::env::var(name).ok())
    }

    /// Same as [`Bindings::from_config`] with an injectable env lookup.
    pub fn with_lookup<F>(providers: &[ProviderConfig], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut endpoints = HashMap::new();

        for provider in Provider::ALL {
            let configured = providers.iter().find(|p| p.name == provider);

            let base_url = configured
                .map(ProviderConfig::base_url)
                .unwrap_or_else(|| provider.default_base_url())
                .to_string();

            let api_key = match configured.and_then(|p| p.api_key.clone()) {
                Some(key) => Some(key),
                None => lookup(&convention_env_var_name(provider.as_str())).map(ApiKey::from),
            };

            endpoints.insert(provider, Endpoint { base_url, api_key });
        }

        Self { endpoints }
    }

    /// Bind a selected model to its provider endpoint.
    pub fn bind(&self, model: &ModelDescriptor) -> ModelBinding {
        let (base_url, api_key) = match self.endpoints.get(&model.provider) {
            Some(endpoint) => (endpoint.base_url.clone(), endpoint.api_key.clone()),
            None => (model.provider.default_base_url().to_string(), None),
        };

        ModelBinding {
            model: model.name.clone(),
            provider: model.provider,
            base_url,
            api_key,
            cost_per_1k_tokens: model.cost_per_1k_tokens,
            tier: model.tier,
            temperature: model.temperature,
            max_tokens: model.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_config() {
        let bindings = Bindings::with_lookup(&[], no_env);
        let catalog = Catalog::builtin();
        let binding = bindings.bind(catalog.get("deepseek-chat").unwrap());

        assert_eq!(binding.model, "deepseek-chat");
        assert_eq!(binding.provider, Provider::DeepSeek);
        assert_eq!(binding.base_url, "https://api.deepseek.com/v1");
        assert!(binding.api_key.is_none());
        assert_eq!(binding.temperature, 0.7);
        assert_eq!(binding.max_tokens, 4096);
    }

    #[test]
    fn test_binding_carries_model_generation_defaults() {
        let bindings = Bindings::with_lookup(&[], no_env);
        let model = Catalog::builtin()
            .get("gpt-4o")
            .unwrap()
            .clone()
            .with_temperature(0.3);
        let binding = bindings.bind(&model);

        assert_eq!(binding.temperature, 0.3);
        assert_eq!(binding.max_tokens, 8192);
    }

    #[test]
    fn test_configured_provider_without_url_uses_default() {
        let providers = vec![ProviderConfig {
            name: Provider::Google,
            url: None,
            api_key: Some(ApiKey::from("g-key")),
        }];
        let bindings = Bindings::with_lookup(&providers, no_env);
        let binding = bindings.bind(Catalog::builtin().get("gemini-2.0-flash").unwrap());

        assert_eq!(binding.base_url, Provider::Google.default_base_url());
        assert_eq!(binding.api_key.unwrap().expose_secret(), "g-key");
    }

    #[test]
    fn test_configured_url_and_key_win() {
        let providers = vec![ProviderConfig {
            name: Provider::Glm,
            url: Some("http://localhost:9000/v1".to_string()),
            api_key: Some(ApiKey::from("glm-secret")),
        }];
        let lookup = |_: &str| -> Option<String> { Some("from-env".to_string()) };
        let bindings = Bindings::with_lookup(&providers, lookup);
        let catalog = Catalog::builtin();
        let binding = bindings.bind(catalog.get("glm-4.5").unwrap());

        assert_eq!(binding.base_url, "http://localhost:9000/v1");
        assert_eq!(binding.api_key.unwrap().expose_secret(), "glm-secret");
    }

    #[test]
    fn test_convention_env_var_fallback() {
        let lookup = |name: &str| match name {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        };
        let bindings = Bindings::with_lookup(&[], lookup);
        let catalog = Catalog::builtin();

        let openai = bindings.bind(catalog.get("gpt-4o").unwrap());
        assert_eq!(openai.api_key.unwrap().expose_secret(), "sk-test");

        let google = bindings.bind(catalog.get("gemini-2.0-flash").unwrap());
        assert!(google.api_key.is_none());
    }

    #[test]
    fn test_binding_serialization_redacts_key() {
        let providers = vec![ProviderConfig {
            name: Provider::OpenAi,
            url: None,
            api_key: Some(ApiKey::from("sk-very-secret")),
        }];
        let bindings = Bindings::with_lookup(&providers, no_env);
        let binding = bindings.bind(Catalog::builtin().get("gpt-4o-mini").unwrap());

        let json = serde_json::to_string(&binding).unwrap();
        assert!(!json.contains("sk-very-secret"));
        assert!(json.contains("[REDACTED]"));
        assert!(!format!("{:?}", binding).contains("sk-very-secret"));
    }
}
