//! Core catalog types: task types, priority tiers, providers and model descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Category of work used to pick a suitable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Research,
    Creative,
    Analysis,
    Coding,
}

impl TaskType {
    /// All task types, in canonical order.
    pub const ALL: [TaskType; 4] = [
        TaskType::Research,
        TaskType::Creative,
        TaskType::Analysis,
        TaskType::Coding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Research => "research",
            TaskType::Creative => "creative",
            TaskType::Analysis => "analysis",
            TaskType::Coding => "coding",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::BadRequest(format!("Unknown task type '{}'", s)))
    }
}

/// Priority tier trading cost against capability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Budget,
    #[default]
    Balanced,
    Premium,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Budget, Priority::Balanced, Priority::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Budget => "budget",
            Priority::Balanced => "balanced",
            Priority::Premium => "premium",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::BadRequest(format!("Unknown priority '{}'", s)))
    }
}

/// Hosted model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    DeepSeek,
    Glm,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::OpenAi,
        Provider::DeepSeek,
        Provider::Glm,
        Provider::Google,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::DeepSeek => "deepseek",
            Provider::Glm => "glm",
            Provider::Google => "google",
        }
    }

    /// Base URL of the provider's OpenAI-compatible API.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::DeepSeek => "https://api.deepseek.com/v1",
            Provider::Glm => "https://api.z.ai/api/paas/v4",
            Provider::Google => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    /// Detect the provider from a model name prefix.
    ///
    /// - "gpt-4o-mini" -> OpenAi
    /// - "deepseek-coder" -> DeepSeek
    /// - "glm-4.5-air" -> Glm
    /// - "gemini-2.0-flash" -> Google
    pub fn detect(model: &str) -> Option<Provider> {
        let model = model.to_ascii_lowercase();
        if model.starts_with("gpt") || model.starts_with("o1") || model.starts_with("o3") {
            Some(Provider::OpenAi)
        } else if model.starts_with("deepseek") {
            Some(Provider::DeepSeek)
        } else if model.starts_with("glm") {
            Some(Provider::Glm)
        } else if model.starts_with("gemini") {
            Some(Provider::Google)
        } else {
            None
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::BadRequest(format!("Unknown provider '{}'", s)))
    }
}

/// Sampling temperature handed to the client unless a model overrides it.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Response token limit handed to the client unless a model overrides it.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// A concrete named model with its price and capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub provider: Provider,
    /// Price in USD per 1000 tokens
    pub cost_per_1k_tokens: f64,
    /// Task types this model is suitable for
    pub capability_tags: Vec<TaskType>,
    /// Priority tier this model is pre-designated for
    pub tier: Priority,
    /// Default sampling temperature for calls to this model
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Default response token limit for calls to this model
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl ModelDescriptor {
    pub fn new(
        name: impl Into<String>,
        provider: Provider,
        cost_per_1k_tokens: f64,
        capability_tags: &[TaskType],
        tier: Priority,
    ) -> Self {
        let mut tags = capability_tags.to_vec();
        tags.sort();
        tags.dedup();
        Self {
            name: name.into(),
            provider,
            cost_per_1k_tokens,
            capability_tags: tags,
            tier,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn supports(&self, task_type: TaskType) -> bool {
        self.capability_tags.contains(&task_type)
    }

    /// Estimated cost in USD for the given number of tokens.
    pub fn estimate_cost(&self, tokens: u64) -> f64 {
        self.cost_per_1k_tokens * tokens as f64 / 1000.0
    }
}

/// An abstract task descriptor to be mapped onto a concrete model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub task_type: TaskType,
    #[serde(default)]
    pub priority: Priority,
    /// Maximum acceptable price in USD per 1000 tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost_per_1k: Option<f64>,
}

impl TaskRequest {
    pub fn new(task_type: TaskType, priority: Priority) -> Self {
        Self {
            task_type,
            priority,
            max_cost_per_1k: None,
        }
    }

    pub fn with_max_cost(mut self, max_cost_per_1k: f64) -> Self {
        self.max_cost_per_1k = Some(max_cost_per_1k);
        self
    }

    /// Reject cost ceilings that are negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if let Some(max) = self.max_cost_per_1k {
            if !max.is_finite() || max < 0.0 {
                return Err(Error::BadRequest(format!(
                    "max_cost_per_1k must be a non-negative number, got {}",
                    max
                )));
            }
        }
        Ok(())
    }
}
