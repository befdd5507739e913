// Evidence Domain Model
//
// Value objects handed back to the assessment host. Built once per
// invocation and never mutated afterwards; persistence is the host's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of thing being assessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectType {
    #[serde(rename = "inventory item")]
    InventoryItem,
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectType::InventoryItem => write!(f, "inventory item"),
        }
    }
}

/// The SSH target + command pairing under assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
    pub title: String,
    pub props: BTreeMap<String, String>,
}

/// Name/value pair attached to an observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Free-text description of a raw signal (exit code, output, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevantEvidence {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// A single timestamped fact collected during a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub collected: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub links: Vec<Link>,
    pub props: Vec<Property>,
    pub relevant_evidence: Vec<RelevantEvidence>,
    pub remarks: String,
}

/// Compliance conclusion derived from one or more observations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub title: String,
    pub description: String,
    pub remarks: String,
    pub related_observations: Vec<String>,
}

/// Audit record of one execution window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Whether the check run itself completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Success,
    Error,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStatus::Success => write!(f, "SUCCESS"),
            ExecutionStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Structured result returned to the host for one Execute call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: ExecutionStatus,
    pub observations: Vec<Observation>,
    pub findings: Vec<Finding>,
    pub logs: Vec<LogEntry>,
}

impl CheckResult {
    /// Result for a check that could not run: no observations, no findings
    pub fn errored(log: LogEntry) -> Self {
        Self {
            status: ExecutionStatus::Error,
            observations: Vec::new(),
            findings: Vec::new(),
            logs: vec![log],
        }
    }
}
