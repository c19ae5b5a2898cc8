//! Prompt loader for YAML prompt overrides.

use crate::defaults;
use crate::types::PromptDefinition;
use copilot_core::{AppError, AppResult};
use std::path::Path;

/// Directory, relative to the workspace, holding prompt overrides.
pub const PROMPTS_DIR: &str = ".copilot/prompts";

/// Load a prompt definition by ID from the workspace.
///
/// Searches for `<id>.yml` in `.copilot/prompts/`.
///
/// # Errors
/// Returns `AppError::Prompt` when the file is missing, unreadable, not
/// valid YAML, or fails validation.
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = workspace_path
        .join(PROMPTS_DIR)
        .join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load the workspace override for the grounded-answer prompt, or fall back
/// to the built-in definition when no override file exists.
///
/// An override that exists but is invalid is an error, never silently
/// replaced by the default.
pub fn load_or_default(workspace_path: &Path) -> AppResult<PromptDefinition> {
    let id = defaults::GROUNDED_ANSWER_ID;
    let override_file = workspace_path.join(PROMPTS_DIR).join(format!("{}.yml", id));

    if !override_file.exists() {
        tracing::debug!("No prompt override for {}, using built-in", id);
        return Ok(defaults::grounded_answer());
    }

    let mut definition = load_prompt(workspace_path, id)?;

    // Overrides must still accept the variables the workflow supplies.
    let builtin = defaults::grounded_answer();
    for var in &builtin.required_variables {
        if !definition.required_variables.contains(var) {
            definition.required_variables.push(var.clone());
        }
    }
    validate_prompt(&definition)?;

    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    for var in &def.required_variables {
        if !def.template.contains(&format!("{{{{{}}}}}", var)) {
            return Err(AppError::Prompt(format!(
                "Prompt {} does not reference required variable '{}'",
                def.id, var
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_override(dir: &Path, id: &str, body: &str) {
        let prompts = dir.join(PROMPTS_DIR);
        fs::create_dir_all(&prompts).unwrap();
        fs::write(prompts.join(format!("{}.yml", id)), body).unwrap();
    }

    #[test]
    fn test_load_prompt_success() {
        let temp = TempDir::new().unwrap();
        write_override(
            temp.path(),
            "test.prompt",
            r#"
id: test.prompt
title: Test Prompt
apiVersion: "1.0"
template: "Hello {{name}}"
requiredVariables: [name]
"#,
        );

        let def = load_prompt(temp.path(), "test.prompt").unwrap();
        assert_eq!(def.id, "test.prompt");
        assert_eq!(def.title, "Test Prompt");
    }

    #[test]
    fn test_load_prompt_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load_prompt(temp.path(), "nonexistent").unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert_eq!(err.kind(), "prompt_error");
    }

    #[test]
    fn test_invalid_api_version() {
        let temp = TempDir::new().unwrap();
        write_override(
            temp.path(),
            "bad",
            "id: bad\ntitle: Bad\napiVersion: \"1\"\ntemplate: x\n",
        );

        let err = load_prompt(temp.path(), "bad").unwrap_err();
        assert!(err.to_string().contains("apiVersion"));
    }

    #[test]
    fn test_default_when_no_override() {
        let temp = TempDir::new().unwrap();
        let def = load_or_default(temp.path()).unwrap();
        assert_eq!(def.id, defaults::GROUNDED_ANSWER_ID);
        assert!(def.template.contains("{{question}}"));
    }

    #[test]
    fn test_override_replaces_default() {
        let temp = TempDir::new().unwrap();
        write_override(
            temp.path(),
            defaults::GROUNDED_ANSWER_ID,
            r#"
id: rag.answer.grounded
title: Terse answers
apiVersion: "1.1"
template: "Only use this:\n{{context}}\nQ: {{question}}"
"#,
        );

        let def = load_or_default(temp.path()).unwrap();
        assert_eq!(def.title, "Terse answers");
        assert_eq!(def.required_variables, vec!["context", "question"]);
    }

    #[test]
    fn test_override_missing_variable_rejected() {
        let temp = TempDir::new().unwrap();
        write_override(
            temp.path(),
            defaults::GROUNDED_ANSWER_ID,
            r#"
id: rag.answer.grounded
title: No context
apiVersion: "1.0"
template: "Just answer {{question}}"
"#,
        );

        let err = load_or_default(temp.path()).unwrap_err();
        assert_eq!(err.kind(), "prompt_error");
        assert!(err.to_string().contains("context"));
    }
}
