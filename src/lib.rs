//! modelpick - Cost-aware LLM model selection for agent construction
//!
//! This library maps abstract task descriptors (task type, priority tier,
//! optional cost ceiling) onto concrete hosted models, and resolves agents,
//! teams and workflows to the models they should be built with.

pub mod agents;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod router;

pub use catalog::{Catalog, ModelDescriptor, Priority, Provider, TaskRequest, TaskType};
pub use config::Config;
pub use error::{Error, Result};
pub use router::Selector;
