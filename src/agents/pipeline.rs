//! Teams and linear workflows: ordered steps, each handled by an agent.

use serde::{Deserialize, Serialize};

/// Whether a pipeline is a team (members) or a workflow (sequenced steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    Team,
    Workflow,
}

/// One step of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub agent: String,
}

/// A named, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    pub kind: PipelineKind,
    pub steps: Vec<Step>,
}

impl Pipeline {
    fn builtin(name: &str, kind: PipelineKind, steps: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            steps: steps
                .iter()
                .map(|(step, agent)| Step {
                    name: step.to_string(),
                    agent: agent.to_string(),
                })
                .collect(),
        }
    }
}

/// Built-in team and workflows.
pub fn builtin_pipelines() -> Vec<Pipeline> {
    vec![
        Pipeline::builtin(
            "research-team",
            PipelineKind::Team,
            &[
                ("Web Research", "web-agent"),
                ("Analysis", "research-analyst"),
                ("Verification", "fact-checker"),
            ],
        ),
        Pipeline::builtin(
            "blog-workflow",
            PipelineKind::Workflow,
            &[
                ("Topic Analysis", "research-analyst"),
                ("Research Execution", "web-agent"),
                ("Content Planning", "content-writer"),
                ("Blog Writing", "content-writer"),
                ("SEO Optimization", "seo-optimizer"),
                ("Fact Checking", "fact-checker"),
                ("Final Integration", "content-writer"),
            ],
        ),
        Pipeline::builtin(
            "simple-blog-workflow",
            PipelineKind::Workflow,
            &[
                ("Research", "web-agent"),
                ("Writing", "content-writer"),
                ("SEO Optimization", "seo-optimizer"),
            ],
        ),
    ]
}
