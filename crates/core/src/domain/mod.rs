// Domain Layer - Pure check model and evidence entities

pub mod config;
pub mod error;
pub mod evidence;
pub mod verdict;

// Re-exports
pub use config::{Configuration, HostKeyPolicy, SshConfig, CONFIGURATION_KEY, DEFAULT_PORT};
pub use error::ConfigError;
pub use evidence::{
    CheckResult, ExecutionStatus, Finding, Link, LogEntry, Observation, Property,
    RelevantEvidence, Subject, SubjectType,
};
pub use verdict::Verdict;
