//! Result rendering (JSON for machines, coloured text for people)

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use sshcheck_core::domain::{CheckResult, ExecutionStatus, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_subjects(subjects: &[Subject], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(subjects),
        OutputFormat::Text => Ok(subjects
            .iter()
            .map(|s| format!("{} {} ({})", "•".cyan(), s.title.bold(), s.subject_type))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

pub fn render_result(result: &CheckResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Text => Ok(render_text(result)),
    }
}

fn render_text(result: &CheckResult) -> String {
    let mut lines = Vec::new();

    let status = match result.status {
        ExecutionStatus::Success => result.status.to_string().green().bold(),
        ExecutionStatus::Error => result.status.to_string().red().bold(),
    };
    lines.push(format!("Status: {}", status));

    for obs in &result.observations {
        let title = if result.findings.is_empty() {
            obs.title.green()
        } else {
            obs.title.yellow()
        };
        lines.push(format!("Observation: {}", title));
        lines.push(format!("  {}", obs.description));
        for evidence in &obs.relevant_evidence {
            lines.push(format!("  - {}", evidence.description));
        }
        lines.push(format!("  Expires: {}", obs.expires.to_rfc3339()));
    }

    for finding in &result.findings {
        lines.push(format!("Finding: {}", finding.title.red()));
        lines.push(format!("  {}", finding.description));
        lines.push(format!("  Remediation: {}", finding.remarks));
    }

    for log in &result.logs {
        lines.push(format!(
            "Log: {} ({} -> {})",
            log.description.dimmed(),
            log.start.to_rfc3339(),
            log.end.to_rfc3339()
        ));
    }

    lines.join("\n")
}
