//! Agent profiles: which kind of model each agent needs.

use serde::{Deserialize, Serialize};

use crate::catalog::{ModelDescriptor, Priority, TaskRequest, TaskType};
use crate::error::Result;
use crate::router::Selector;

/// A configured agent's model requirements.
///
/// An agent either describes its task and lets the selector choose, or pins
/// a model by name. A pinned model skips selection entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub task_type: TaskType,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost_per_1k: Option<f64>,
    /// Model to use regardless of task and priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_model: Option<String>,
}

impl AgentProfile {
    fn builtin(name: &str, description: &str, task_type: TaskType, priority: Priority) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            task_type,
            priority,
            max_cost_per_1k: None,
            pinned_model: None,
        }
    }

    fn pinned(mut self, model: &str) -> Self {
        self.pinned_model = Some(model.to_string());
        self
    }

    /// The selection request this agent makes.
    pub fn task_request(&self) -> TaskRequest {
        TaskRequest {
            task_type: self.task_type,
            priority: self.priority,
            max_cost_per_1k: self.max_cost_per_1k,
        }
    }

    /// The model this agent should be built with.
    pub fn resolve<'s>(&self, selector: &'s Selector) -> Result<&'s ModelDescriptor> {
        match &self.pinned_model {
            Some(name) => selector.model(name),
            None => selector.select_model(&self.task_request()),
        }
    }
}

/// Built-in agent profiles.
pub fn builtin_agents() -> Vec<AgentProfile> {
    use Priority::{Balanced, Budget, Premium};
    use TaskType::{Analysis, Creative, Research};

    vec![
        AgentProfile::builtin("web-agent", "Web search and source gathering", Research, Balanced),
        AgentProfile::builtin(
            "research-analyst",
            "High-volume research synthesis",
            Research,
            Budget,
        ),
        AgentProfile::builtin("content-writer", "Long-form content drafting", Creative, Balanced),
        AgentProfile::builtin("fact-checker", "Claim verification", Analysis, Balanced),
        AgentProfile::builtin("seo-optimizer", "Search optimization review", Analysis, Balanced),
        AgentProfile::builtin(
            "multi-format-parser",
            "Document comprehension across formats",
            Analysis,
            Premium,
        ),
        AgentProfile::builtin("agno-assist", "Framework documentation helper", Analysis, Balanced),
        AgentProfile::builtin(
            "rag-assistant",
            "Answers from the document knowledge base",
            Research,
            Premium,
        )
        .pinned("gemini-2.0-flash"),
        AgentProfile::builtin("vision-analyst", "Image description and OCR", Analysis, Premium)
            .pinned("gemini-2.0-flash"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_request_carries_ceiling() {
        let profile = AgentProfile {
            name: "cheap-writer".to_string(),
            description: String::new(),
            task_type: TaskType::Creative,
            priority: Priority::Premium,
            max_cost_per_1k: Some(0.0002),
            pinned_model: None,
        };
        let req = profile.task_request();
        assert_eq!(req.task_type, TaskType::Creative);
        assert_eq!(req.priority, Priority::Premium);
        assert_eq!(req.max_cost_per_1k, Some(0.0002));
    }

    #[test]
    fn test_pinned_model_skips_selection() {
        let selector = Selector::default();
        let mut profile = AgentProfile::builtin("coder", "", TaskType::Coding, Priority::Budget);
        assert_eq!(profile.resolve(&selector).unwrap().name, "deepseek-coder");

        // gemini-2.0-flash is not tagged for coding; pinning bypasses that
        profile = profile.pinned("gemini-2.0-flash");
        assert_eq!(profile.resolve(&selector).unwrap().name, "gemini-2.0-flash");
    }

    #[test]
    fn test_pinned_model_missing_from_table() {
        let selector = Selector::default();
        let profile = AgentProfile::builtin("vision", "", TaskType::Analysis, Priority::Premium)
            .pinned("gemini-1.5-flash");
        assert!(matches!(
            profile.resolve(&selector),
            Err(crate::Error::UnknownModel { name }) if name == "gemini-1.5-flash"
        ));
    }

    #[test]
    fn test_builtin_names_unique() {
        let agents = builtin_agents();
        for (i, a) in agents.iter().enumerate() {
            assert!(!agents[..i].iter().any(|b| b.name == a.name), "{}", a.name);
        }
    }
}
