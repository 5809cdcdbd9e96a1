//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::agents::AgentProfile;
use crate::catalog::{ModelDescriptor, Priority, Provider, TaskType};
use crate::router::ModelBinding;

/// A selected model as returned to callers. Never carries the API key itself.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectionResponse {
    pub model: String,
    pub provider: Provider,
    pub base_url: String,
    pub cost_per_1k_tokens: f64,
    pub tier: Priority,
    /// Default sampling temperature for this model
    pub temperature: f64,
    /// Default response token limit for this model
    pub max_tokens: u32,
    /// Whether an API key is available for the provider
    pub has_api_key: bool,
}

impl From<ModelBinding> for SelectionResponse {
    fn from(binding: ModelBinding) -> Self {
        Self {
            has_api_key: binding.api_key.is_some(),
            model: binding.model,
            provider: binding.provider,
            base_url: binding.base_url,
            cost_per_1k_tokens: binding.cost_per_1k_tokens,
            tier: binding.tier,
            temperature: binding.temperature,
            max_tokens: binding.max_tokens,
        }
    }
}

/// Body of POST /v1/models/compare.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompareRequest {
    pub models: Vec<String>,
}

/// One row of a cost comparison.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComparisonEntry {
    /// 1-based position in ascending cost order
    pub cost_rank: usize,
    pub name: String,
    pub provider: Provider,
    pub cost_per_1k_tokens: f64,
    pub tier: Priority,
    pub suitable_for: Vec<TaskType>,
}

impl ComparisonEntry {
    pub fn ranked(rank: usize, model: &ModelDescriptor) -> Self {
        Self {
            cost_rank: rank,
            name: model.name.clone(),
            provider: model.provider,
            cost_per_1k_tokens: model.cost_per_1k_tokens,
            tier: model.tier,
            suitable_for: model.capability_tags.clone(),
        }
    }
}

/// Response of POST /v1/models/compare.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompareResponse {
    pub models: Vec<ComparisonEntry>,
}

/// An agent profile with its resolved model.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    #[serde(flatten)]
    pub profile: AgentProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<SelectionResponse>,
    /// Why resolution failed, when it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;

    #[test]
    fn test_selection_response_hides_key() {
        let binding = ModelBinding {
            model: "gpt-4o".to_string(),
            provider: Provider::OpenAi,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: Some(ApiKey::from("sk-hidden")),
            cost_per_1k_tokens: 0.003,
            tier: Priority::Premium,
            temperature: 0.7,
            max_tokens: 8192,
        };
        let response = SelectionResponse::from(binding);
        assert!(response.has_api_key);
        assert_eq!(response.max_tokens, 8192);

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("sk-hidden"));
        assert!(!json.contains(r#""api_key""#));
        assert!(json.contains(r#""provider":"openai""#), "{}", json);
    }

    #[test]
    fn test_agent_response_flattens_profile() {
        let response = AgentResponse {
            profile: AgentProfile {
                name: "fact-checker".to_string(),
                description: String::new(),
                task_type: TaskType::Analysis,
                priority: Priority::Balanced,
                max_cost_per_1k: None,
                pinned_model: None,
            },
            model: None,
            error: Some("No eligible model for task 'analysis'".to_string()),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["name"], "fact-checker");
        assert_eq!(json["task_type"], "analysis");
        assert!(json.get("model").is_none());
        assert!(json["error"].as_str().unwrap().contains("analysis"));
    }
}
