//! Eval command handler.

use super::prepare;
use clap::Args;
use copilot_core::{config::AppConfig, AppResult};
use copilot_knowledge::{load_cases, run_eval, Copilot, EvalReport};
use std::path::PathBuf;

/// Run keyword evaluation cases against the corpus
#[derive(Args, Debug)]
pub struct EvalCommand {
    /// YAML file with a list of {description, question, expectedKeywords}
    pub cases: PathBuf,

    /// Docs directory (overrides configuration)
    #[arg(long)]
    pub docs: Option<PathBuf>,

    /// Output the full report as JSON
    #[arg(long)]
    pub json: bool,
}

impl EvalCommand {
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        let config = prepare(config, self.docs.clone())?;
        tracing::info!("Executing eval command with {:?}", self.cases);

        let cases = load_cases(&self.cases)?;

        let copilot = Copilot::from_config(&config)?;
        copilot.ingest(false).await?;

        let report = run_eval(&copilot.workflow(), &cases).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", render_report(&report));
        }

        Ok(())
    }
}

fn render_report(report: &EvalReport) -> String {
    let mut out = String::new();

    for result in &report.results {
        let status = if result.passed { "PASS" } else { "FAIL" };
        let detail = match &result.error {
            Some(kind) => format!("error: {}", kind),
            None if result.abstained => format!(
                "abstained, {}/{} keywords",
                result.matched_keywords.len(),
                result.expected_keywords.len()
            ),
            None => format!(
                "{}/{} keywords",
                result.matched_keywords.len(),
                result.expected_keywords.len()
            ),
        };
        out.push_str(&format!("{} {} ({})\n", status, result.description, detail));
    }

    out.push_str(&format!(
        "\n{}/{} passed, {} failed ({:.1}%)\n",
        report.passed,
        report.total,
        report.failed,
        report.success_rate * 100.0
    ));
    out
}
