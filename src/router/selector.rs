//! Model selection policy.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::catalog::{Catalog, ModelDescriptor, Priority, TaskRequest, TaskType};
use crate::error::{Error, Result};

/// Cost-aware model selector over an immutable catalog.
///
/// Every operation is a pure lookup; a `Selector` can be cloned and shared
/// across threads freely.
#[derive(Debug, Clone)]
pub struct Selector {
    catalog: Arc<Catalog>,
    default_model: Option<String>,
}

impl Selector {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            default_model: None,
        }
    }

    /// Use a named model for callers that do not describe a task.
    pub fn with_default_model(mut self, name: &str) -> Result<Self> {
        self.model(name)?;
        self.default_model = Some(name.to_string());
        Ok(self)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Select the model for a task request.
    ///
    /// Picks the designee for the requested priority tier among models tagged
    /// for the task. If a cost ceiling is given and the designee exceeds it,
    /// falls back to the cheapest tagged model at or under the ceiling.
    pub fn select_model(&self, request: &TaskRequest) -> Result<&ModelDescriptor> {
        request.validate()?;

        let no_eligible = || Error::NoEligibleModel {
            task_type: request.task_type,
            max_cost_per_1k: request.max_cost_per_1k,
        };

        let ranked = self
            .ranked_pick(request.task_type, request.priority)
            .ok_or_else(no_eligible)?;

        let Some(max) = request.max_cost_per_1k else {
            return Ok(ranked);
        };

        if ranked.cost_per_1k_tokens <= max {
            return Ok(ranked);
        }

        let fallback = cheapest(
            self.catalog
                .supporting(request.task_type)
                .filter(|m| m.cost_per_1k_tokens <= max),
        )
        .ok_or_else(no_eligible)?;

        tracing::debug!(
            task_type = %request.task_type,
            priority = %request.priority,
            preferred = %ranked.name,
            selected = %fallback.name,
            max_cost_per_1k = max,
            "Preferred model over cost ceiling, fell back to cheapest eligible"
        );

        Ok(fallback)
    }

    /// The pre-ranked pick for a tier, ignoring any cost ceiling.
    fn ranked_pick(&self, task_type: TaskType, priority: Priority) -> Option<&ModelDescriptor> {
        let designee = |tier: Priority| {
            self.catalog
                .supporting(task_type)
                .find(|m| m.tier == tier)
        };
        let cheapest_eligible = || cheapest(self.catalog.supporting(task_type));

        match priority {
            Priority::Budget => cheapest_eligible(),
            Priority::Balanced => designee(Priority::Balanced).or_else(cheapest_eligible),
            Priority::Premium => designee(Priority::Premium)
                .or_else(|| designee(Priority::Balanced))
                .or_else(cheapest_eligible),
        }
    }

    /// The cheapest model in the whole table; ties go to the earliest entry.
    pub fn cheapest_model(&self) -> &ModelDescriptor {
        cheapest(self.catalog.models().iter()).expect("Catalog::new rejects empty tables")
    }

    /// The configured default model, or the cheapest model in the table.
    pub fn default_model(&self) -> &ModelDescriptor {
        self.default_model
            .as_deref()
            .and_then(|name| self.catalog.get(name))
            .unwrap_or_else(|| self.cheapest_model())
    }

    /// Look up models by name and sort them by ascending cost.
    ///
    /// Ties keep the input order.
    pub fn compare_models<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&ModelDescriptor>> {
        let mut models = names
            .iter()
            .map(|name| self.model(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        models.sort_by(|a, b| by_cost(a, b));
        Ok(models)
    }

    /// Look up a model by name.
    pub fn model(&self, name: &str) -> Result<&ModelDescriptor> {
        self.catalog.get(name).ok_or_else(|| Error::UnknownModel {
            name: name.to_string(),
        })
    }

    /// Price per 1000 tokens for a named model.
    pub fn model_cost(&self, name: &str) -> Result<f64> {
        Ok(self.model(name)?.cost_per_1k_tokens)
    }

    /// Estimated cost in USD of `tokens` tokens on a named model.
    pub fn estimate_cost(&self, name: &str, tokens: u64) -> Result<f64> {
        Ok(self.model(name)?.estimate_cost(tokens))
    }

    /// Task types a named model is suitable for.
    pub fn suitable_for(&self, name: &str) -> Result<Vec<TaskType>> {
        Ok(self.model(name)?.capability_tags.clone())
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

fn by_cost(a: &ModelDescriptor, b: &ModelDescriptor) -> Ordering {
    a.cost_per_1k_tokens.total_cmp(&b.cost_per_1k_tokens)
}

/// First minimum-cost model in iteration order.
fn cheapest<'a>(models: impl Iterator<Item = &'a ModelDescriptor>) -> Option<&'a ModelDescriptor> {
    models.min_by(|a, b| by_cost(a, b))
}
