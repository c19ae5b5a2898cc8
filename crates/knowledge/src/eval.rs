//! Keyword-based evaluation harness.
//!
//! Each case is run through the workflow; a case passes when at least half
//! of its expected keywords appear (case-insensitively) in the answer.

use crate::rag::RagWorkflow;
use copilot_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One evaluation case, as written in the cases file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalCase {
    pub description: String,
    pub question: String,
    #[serde(default)]
    pub expected_keywords: Vec<String>,
}

/// Outcome of a single case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalCaseResult {
    pub description: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub abstained: bool,
    pub matched_keywords: Vec<String>,
    pub expected_keywords: Vec<String>,
    pub passed: bool,
    /// Error kind when the execution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate report over all cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalReport {
    pub results: Vec<EvalCaseResult>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Fraction of passing cases in `[0, 1]`
    pub success_rate: f64,
}

/// Load cases from a YAML file holding a list of cases.
pub fn load_cases(path: &Path) -> AppResult<Vec<EvalCase>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Knowledge(format!("Failed to read eval cases {:?}: {}", path, e))
    })?;

    let cases: Vec<EvalCase> = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Knowledge(format!("Failed to parse eval cases {:?}: {}", path, e))
    })?;

    if let Some(blank) = cases.iter().find(|c| c.question.trim().is_empty()) {
        return Err(AppError::Knowledge(format!(
            "Eval case '{}' in {:?} has an empty question",
            blank.description, path
        )));
    }

    tracing::debug!("Loaded {} eval cases from {:?}", cases.len(), path);
    Ok(cases)
}

/// Expected keywords found in `answer`, ignoring case.
pub fn matched_keywords(answer: &str, expected: &[String]) -> Vec<String> {
    let answer = answer.to_lowercase();
    expected
        .iter()
        .filter(|keyword| answer.contains(&keyword.to_lowercase()))
        .cloned()
        .collect()
}

/// Whether `matched` out of `expected` keywords is a pass (at least half).
pub fn passes(matched: usize, expected: usize) -> bool {
    matched * 2 >= expected
}

/// Run every case sequentially through the workflow.
pub async fn run_eval(workflow: &RagWorkflow, cases: &[EvalCase]) -> EvalReport {
    let mut results = Vec::with_capacity(cases.len());

    for case in cases {
        tracing::info!("Evaluating: {}", case.description);

        let result = match workflow.execute(&case.question).await {
            Ok(state) => {
                let answer = state.answer_text().to_string();
                let matched = matched_keywords(&answer, &case.expected_keywords);
                let passed = passes(matched.len(), case.expected_keywords.len());

                tracing::debug!(
                    "Case '{}': {}/{} keywords matched",
                    case.description,
                    matched.len(),
                    case.expected_keywords.len()
                );

                EvalCaseResult {
                    description: case.description.clone(),
                    question: case.question.clone(),
                    answer: Some(answer),
                    abstained: state.should_abstain,
                    matched_keywords: matched,
                    expected_keywords: case.expected_keywords.clone(),
                    passed,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!("Case '{}' failed: {}", case.description, e);

                EvalCaseResult {
                    description: case.description.clone(),
                    question: case.question.clone(),
                    answer: None,
                    abstained: false,
                    matched_keywords: Vec::new(),
                    expected_keywords: case.expected_keywords.clone(),
                    passed: false,
                    error: Some(e.kind().to_string()),
                }
            }
        };

        results.push(result);
    }

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let success_rate = if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64
    };

    tracing::info!(
        "Evaluation finished: {}/{} passed ({:.1}%)",
        passed,
        total,
        success_rate * 100.0
    );

    EvalReport {
        results,
        total,
        passed,
        failed: total - passed,
        success_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_matched_keywords_case_insensitive() {
        let matched = matched_keywords(
            "Set PROXY_URL and restart the Daemon.",
            &keywords(&["proxy_url", "daemon", "firewall"]),
        );
        assert_eq!(matched, keywords(&["proxy_url", "daemon"]));
    }

    #[test]
    fn test_pass_threshold_is_half() {
        assert!(passes(2, 4));
        assert!(passes(2, 3));
        assert!(!passes(1, 3));
        assert!(!passes(0, 1));
        assert!(passes(0, 0));
    }

    #[test]
    fn test_load_cases() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cases.yaml");
        std::fs::write(
            &path,
            r#"
- description: Installation
  question: How do I install it?
  expectedKeywords: [install, cargo]
- description: No keywords
  question: Anything?
"#,
        )
        .unwrap();

        let cases = load_cases(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].expected_keywords, keywords(&["install", "cargo"]));
        assert!(cases[1].expected_keywords.is_empty());
    }

    #[test]
    fn test_load_cases_rejects_blank_question() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cases.yaml");
        std::fs::write(
            &path,
            r#"
- description: Fine
  question: How do I install it?
- description: Whitespace only
  question: "   "
"#,
        )
        .unwrap();

        let err = load_cases(&path).unwrap_err();
        assert_eq!(err.kind(), "knowledge_error");
        assert!(err.to_string().contains("Whitespace only"));
    }

    #[test]
    fn test_load_cases_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cases.yaml");
        std::fs::write(&path, "not: [a, list").unwrap();

        let err = load_cases(&path).unwrap_err();
        assert_eq!(err.kind(), "knowledge_error");
    }
}
