//! Router module for model selection.
//!
//! This module handles selecting the model for a task based on:
//! - Task type (capability tags)
//! - Priority tier
//! - Cost ceiling
//!
//! and binding the selected model to its provider endpoint.

mod binding;
mod selector;

pub use binding::{Bindings, ModelBinding};
pub use selector::Selector;
