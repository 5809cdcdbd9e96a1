//! Agents, teams and workflows.
//!
//! An agent is a named selection request; a pipeline is an ordered list of
//! steps handled by agents. Resolving either against a [`Selector`] yields the
//! concrete models agent-construction code should bind. Nothing here runs an
//! agent.

mod pipeline;
mod profile;

pub use pipeline::{builtin_pipelines, Pipeline, PipelineKind, Step};
pub use profile::{builtin_agents, AgentProfile};

use serde::Serialize;

use crate::catalog::ModelDescriptor;
use crate::config::ConfigError;
use crate::error::{Error, Result};
use crate::router::Selector;

/// Validated set of agent profiles and pipelines.
#[derive(Debug, Clone)]
pub struct Roster {
    agents: Vec<AgentProfile>,
    pipelines: Vec<Pipeline>,
}

/// A pipeline step with its resolved model.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
    pub step: String,
    pub agent: String,
    pub model: ModelDescriptor,
}

/// A pipeline with every step resolved, in step order.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub pipeline: String,
    pub kind: PipelineKind,
    pub steps: Vec<PlannedStep>,
    /// Sum of per-step prices per 1000 tokens
    pub total_cost_per_1k: f64,
}

impl Roster {
    /// Build a roster, checking names, ceilings and step references.
    pub fn new(
        agents: Vec<AgentProfile>,
        pipelines: Vec<Pipeline>,
    ) -> std::result::Result<Self, ConfigError> {
        for (i, agent) in agents.iter().enumerate() {
            if agents[..i].iter().any(|a| a.name == agent.name) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate agent '{}'",
                    agent.name
                )));
            }
            if let Some(max) = agent.max_cost_per_1k {
                if !max.is_finite() || max < 0.0 {
                    return Err(ConfigError::Validation(format!(
                        "Agent '{}' has invalid max_cost_per_1k {}",
                        agent.name, max
                    )));
                }
                if agent.pinned_model.is_some() {
                    return Err(ConfigError::Validation(format!(
                        "Agent '{}' pins a model and also sets max_cost_per_1k",
                        agent.name
                    )));
                }
            }
        }

        for (i, pipeline) in pipelines.iter().enumerate() {
            if pipelines[..i].iter().any(|p| p.name == pipeline.name) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate pipeline '{}'",
                    pipeline.name
                )));
            }
            if pipeline.steps.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Pipeline '{}' has no steps",
                    pipeline.name
                )));
            }
            for step in &pipeline.steps {
                if !agents.iter().any(|a| a.name == step.agent) {
                    return Err(ConfigError::Validation(format!(
                        "Pipeline '{}' step '{}' references unknown agent '{}'",
                        pipeline.name, step.name, step.agent
                    )));
                }
            }
        }

        Ok(Self { agents, pipelines })
    }

    pub fn builtin() -> Self {
        Self {
            agents: builtin_agents(),
            pipelines: builtin_pipelines(),
        }
    }

    /// Built-in roster with configured entries replacing same-named built-ins.
    pub fn with_overrides(
        agents: Vec<AgentProfile>,
        pipelines: Vec<Pipeline>,
    ) -> std::result::Result<Self, ConfigError> {
        Self::new(
            merge_by_name(builtin_agents(), agents, |a| &a.name),
            merge_by_name(builtin_pipelines(), pipelines, |p| &p.name),
        )
    }

    pub fn agents(&self) -> &[AgentProfile] {
        &self.agents
    }

    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    pub fn agent(&self, name: &str) -> Result<&AgentProfile> {
        self.agents
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::UnknownAgent {
                name: name.to_string(),
            })
    }

    pub fn pipeline(&self, name: &str) -> Result<&Pipeline> {
        self.pipelines
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::UnknownPipeline {
                name: name.to_string(),
            })
    }

    /// The model for a named agent: its pinned model, or a selection.
    pub fn resolve_agent<'s>(
        &self,
        selector: &'s Selector,
        name: &str,
    ) -> Result<&'s ModelDescriptor> {
        self.agent(name)?.resolve(selector)
    }

    /// Resolve every step of a named pipeline, in order.
    pub fn plan(&self, selector: &Selector, name: &str) -> Result<Plan> {
        let pipeline = self.pipeline(name)?;

        let steps = pipeline
            .steps
            .iter()
            .map(|step| {
                let model = self.resolve_agent(selector, &step.agent)?;
                Ok(PlannedStep {
                    step: step.name.clone(),
                    agent: step.agent.clone(),
                    model: model.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let total_cost_per_1k: f64 = steps.iter().map(|s| s.model.cost_per_1k_tokens).sum();

        Ok(Plan {
            pipeline: pipeline.name.clone(),
            kind: pipeline.kind,
            steps,
            total_cost_per_1k,
        })
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Replace entries of `base` that share a name with an override, append the rest.
fn merge_by_name<T, F>(mut base: Vec<T>, overrides: Vec<T>, name: F) -> Vec<T>
where
    F: Fn(&T) -> &String,
{
    for item in overrides {
        match base.iter().position(|b| name(b) == name(&item)) {
            Some(idx) => base[idx] = item,
            None => base.push(item),
        }
    }
    base
}
