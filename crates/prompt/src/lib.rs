//! Prompt system for Docs Copilot.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions with workspace overrides
//! - Handlebars template rendering
//! - The built-in grounded-answer prompt used by the RAG workflow

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use defaults::{grounded_answer, GROUNDED_ANSWER_ID};
pub use loader::{load_or_default, load_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
