//! Model catalog: the static table of models the selection policy draws from.
//!
//! The table is built once at startup (either the built-in table or the
//! `[[models]]` section of the config file) and never mutated afterwards.

mod builtin;
mod types;

pub use builtin::builtin_models;
pub use types::{
    ModelDescriptor, Priority, Provider, TaskRequest, TaskType, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};

use crate::config::ConfigError;

/// Immutable, ordered table of model descriptors.
///
/// Insertion order is significant: it breaks cost ties and decides which
/// descriptor is the designee for a tier when several qualify.
#[derive(Debug, Clone)]
pub struct Catalog {
    models: Vec<ModelDescriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting empty tables, duplicate names and bad prices.
    pub fn new(models: Vec<ModelDescriptor>) -> Result<Self, ConfigError> {
        if models.is_empty() {
            return Err(ConfigError::Validation("Model table is empty".to_string()));
        }

        for (i, model) in models.iter().enumerate() {
            if model.name.trim().is_empty() {
                return Err(ConfigError::Validation("Model with empty name".to_string()));
            }
            if !model.cost_per_1k_tokens.is_finite() || model.cost_per_1k_tokens < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "Model '{}' has invalid cost_per_1k_tokens {}",
                    model.name, model.cost_per_1k_tokens
                )));
            }
            if !(0.0..=2.0).contains(&model.temperature) {
                return Err(ConfigError::Validation(format!(
                    "Model '{}' has temperature {} outside 0.0..=2.0",
                    model.name, model.temperature
                )));
            }
            if model.max_tokens == 0 {
                return Err(ConfigError::Validation(format!(
                    "Model '{}' has max_tokens = 0",
                    model.name
                )));
            }
            if model.capability_tags.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Model '{}' has no capability tags",
                    model.name
                )));
            }
            if models[..i].iter().any(|m| m.name == model.name) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate model '{}'",
                    model.name
                )));
            }
        }

        Ok(Self { models })
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        Self {
            models: builtin_models(),
        }
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Descriptors tagged for a task type, in table order.
    pub fn supporting(&self, task_type: TaskType) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter().filter(move |m| m.supports(task_type))
    }

    /// Task types with no tagged model in this table.
    pub fn coverage_gaps(&self) -> Vec<TaskType> {
        TaskType::ALL
            .into_iter()
            .filter(|t| self.supporting(*t).next().is_none())
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
