//! Retrieval-augmented answering: retriever, abstention gate, answer
//! generator, and the workflow that sequences them.

pub mod gate;
pub mod generator;
pub mod retriever;
pub mod types;
pub mod workflow;

pub use gate::decide;
pub use generator::{contains_sentinel, format_context, AnswerGenerator, GeneratedAnswer};
pub use retriever::{IndexRetriever, Retriever};
pub use types::{
    excerpt, Citation, Decision, EvidenceItem, EvidenceSet, Stage, WorkflowState,
};
pub use workflow::RagWorkflow;
