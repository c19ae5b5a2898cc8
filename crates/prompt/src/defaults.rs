//! Built-in prompt definitions.

use crate::types::PromptDefinition;

/// Identifier of the grounded-answer prompt used by the RAG workflow.
pub const GROUNDED_ANSWER_ID: &str = "rag.answer.grounded";

const GROUNDED_ANSWER_TEMPLATE: &str = r#"You are a documentation assistant. Answer the question using ONLY the numbered context passages below.

Rules:
- Do not use any knowledge that is not in the context.
- If the context does not contain the answer, reply with exactly: I don't know
- Cite the passages that support each claim with their bracket numbers, for example [1] or [2].
- Keep the answer concise and accurate.
- Finish with a "Citations" section that maps every bracket number you used to its chunk ID.

Context:
{{context}}

Question: {{question}}

Answer:"#;

/// The built-in grounded-answer prompt.
///
/// `context` holds the numbered evidence block, `question` the user's question.
pub fn grounded_answer() -> PromptDefinition {
    PromptDefinition {
        id: GROUNDED_ANSWER_ID.to_string(),
        title: "Grounded documentation answer".to_string(),
        api_version: "1.0".to_string(),
        system: None,
        template: GROUNDED_ANSWER_TEMPLATE.to_string(),
        required_variables: vec!["context".to_string(), "question".to_string()],
    }
}
