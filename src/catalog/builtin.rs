//! Built-in model table.

use super::types::{ModelDescriptor, Priority, Provider, TaskType};

use Priority::{Balanced, Budget, Premium};
use TaskType::{Analysis, Coding, Creative, Research};

/// The default model table, in tie-break order.
///
/// Every (task type, priority) pair has a reachable designee here.
pub fn builtin_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new(
            "deepseek-chat",
            Provider::DeepSeek,
            0.00014,
            &[Research, Creative, Analysis],
            Budget,
        ),
        ModelDescriptor::new("deepseek-coder", Provider::DeepSeek, 0.00014, &[Coding], Budget),
        ModelDescriptor::new(
            "gpt-4o-mini",
            Provider::OpenAi,
            0.00015,
            &[Research, Creative, Analysis, Coding],
            Balanced,
        ),
        ModelDescriptor::new("glm-4.5-air", Provider::Glm, 0.00015, &[Research, Analysis], Budget),
        ModelDescriptor::new(
            "glm-4.5",
            Provider::Glm,
            0.00020,
            &[Research, Creative, Analysis],
            Balanced,
        ),
        ModelDescriptor::new(
            "gemini-2.0-flash",
            Provider::Google,
            0.00030,
            &[Research, Analysis],
            Premium,
        ),
        ModelDescriptor::new(
            "gpt-4o",
            Provider::OpenAi,
            0.00300,
            &[Research, Creative, Analysis, Coding],
            Premium,
        )
        .with_max_tokens(8192),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_task_has_each_tier_or_budget_fallback() {
        let models = builtin_models();
        for task in TaskType::ALL {
            for tier in [Balanced, Premium] {
                assert!(
                    models.iter().any(|m| m.supports(task) && m.tier == tier),
                    "no {} designee for {}",
                    tier,
                    task
                );
            }
        }
    }

    #[test]
    fn test_generation_defaults() {
        let models = builtin_models();
        assert!(models.iter().all(|m| m.temperature == 0.7));
        for model in &models {
            let expected = if model.name == "gpt-4o" { 8192 } else { 4096 };
            assert_eq!(model.max_tokens, expected, "{}", model.name);
        }
    }

    #[test]
    fn test_providers_match_name_prefix() {
        for model in builtin_models() {
            assert_eq!(Provider::detect(&model.name), Some(model.provider));
        }
    }
}
