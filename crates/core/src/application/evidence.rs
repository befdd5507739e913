// Evidence Generator - turns a classified command outcome into evidence

use crate::application::constants::{
    CHECK_LOG_TITLE, FAILURE_FINDING_TITLE, FAILURE_OBSERVATION_TITLE, OBSERVATION_TTL_MONTHS,
    SUCCESS_OBSERVATION_TITLE, SUCCESS_REMARKS,
};
use crate::domain::{
    Finding, LogEntry, Observation, Property, RelevantEvidence, SshConfig, Subject, SubjectType,
    Verdict,
};
use crate::port::{CommandOutput, IdProvider, TimeProvider};
use chrono::{DateTime, Months, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Observations, findings and logs produced by one check execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceBundle {
    pub observations: Vec<Observation>,
    pub findings: Vec<Finding>,
    pub logs: Vec<LogEntry>,
}

/// Expiry policy: one calendar month after collection
pub fn expiry_for(collected: DateTime<Utc>) -> DateTime<Utc> {
    collected
        .checked_add_months(Months::new(OBSERVATION_TTL_MONTHS))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Build the single subject describing the SSH target
pub fn subject_for(config: &SshConfig) -> Subject {
    let id = config.target_id();
    Subject {
        title: format!("SSH target ssh {}", id),
        subject_type: SubjectType::InventoryItem,
        props: BTreeMap::from([("id".to_string(), id.clone())]),
        id,
    }
}

/// Builds evidence entities with injected IDs and clock
pub struct EvidenceGenerator {
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl EvidenceGenerator {
    pub fn new(id_provider: Arc<dyn IdProvider>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            id_provider,
            time_provider,
        }
    }

    /// Generate evidence for a command that ran to completion
    ///
    /// # Arguments
    /// * `config` - Resolved configuration of this invocation
    /// * `verdict` - Classification of `output.exit_code`
    /// * `output` - Raw command outcome
    /// * `started_at` - Captured before configuration resolution
    pub fn generate(
        &self,
        config: &SshConfig,
        verdict: Verdict,
        output: &CommandOutput,
        started_at: DateTime<Utc>,
    ) -> EvidenceBundle {
        let observation = self.observation(config, verdict, output.exit_code);

        let findings = match verdict {
            Verdict::Success => Vec::new(),
            Verdict::Failure => vec![self.finding(config, &output.output, &observation.id)],
        };

        let log = LogEntry {
            title: CHECK_LOG_TITLE.to_string(),
            description: "SSH command check has run successfully".to_string(),
            start: started_at,
            end: self.time_provider.now(),
        };

        EvidenceBundle {
            observations: vec![observation],
            findings,
            logs: vec![log],
        }
    }

    /// Log entry for a run that never produced evidence
    pub fn error_log(&self, started_at: DateTime<Utc>, error: &impl std::fmt::Display) -> LogEntry {
        LogEntry {
            title: CHECK_LOG_TITLE.to_string(),
            description: format!("SSH command check could not run: {}", error),
            start: started_at,
            end: self.time_provider.now(),
        }
    }

    fn observation(&self, config: &SshConfig, verdict: Verdict, exit_code: i32) -> Observation {
        let command_line = config.command_line();
        let collected = self.time_provider.now();

        let (title, description, remarks) = match verdict {
            Verdict::Success => (
                SUCCESS_OBSERVATION_TITLE,
                format!("The command: {} succeeded.", command_line),
                SUCCESS_REMARKS.to_string(),
            ),
            Verdict::Failure => (
                FAILURE_OBSERVATION_TITLE,
                format!("The command: {} did not succeed.", command_line),
                format!(
                    "The command: '{}' should return a zero exit code.",
                    command_line
                ),
            ),
        };

        Observation {
            id: self.id_provider.generate_id(),
            title: title.to_string(),
            description,
            collected,
            expires: expiry_for(collected),
            links: Vec::new(),
            props: vec![Property::new("Command", command_line.clone())],
            relevant_evidence: vec![RelevantEvidence {
                description: format!(
                    "The command returned an exit code of {} for the command: {}",
                    exit_code, command_line
                ),
            }],
            remarks,
        }
    }

    fn finding(&self, config: &SshConfig, output: &str, observation_id: &str) -> Finding {
        let command_line = config.command_line();

        Finding {
            id: self.id_provider.generate_id(),
            title: FAILURE_FINDING_TITLE.to_string(),
            description: format!(
                "The command {} did not succeed, and produced output: {}.",
                command_line,
                output.trim_end()
            ),
            remarks: format!("Correct the command {}.", command_line),
            related_observations: vec![observation_id.to_string()],
        }
    }
}
