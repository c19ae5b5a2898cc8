//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use copilot_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Every variable listed in `required_variables` must be supplied; values
/// are inserted verbatim (no HTML escaping).
///
/// # Example
/// ```no_run
/// use copilot_prompt::{build_prompt, grounded_answer};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "How do I install?".to_string());
/// vars.insert("context".to_string(), "[1] Run the installer.".to_string());
///
/// let built = build_prompt(&grounded_answer(), vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    if let Some(missing) = definition
        .required_variables
        .iter()
        .find(|v| !variables.contains_key(*v))
    {
        return Err(AppError::Prompt(format!(
            "Missing variable '{}' for prompt {}",
            missing, definition.id
        )));
    }

    let user = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt::new(
        definition.system.clone(),
        user,
        definition.id.clone(),
        variables,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
