// Check Service - orchestrates Identify and Execute

use crate::application::config_resolver;
use crate::application::evidence::{subject_for, EvidenceGenerator};
use crate::domain::{CheckResult, Configuration, ExecutionStatus, Subject, Verdict};
use crate::error::{AppError, Result};
use crate::port::{CancelToken, IdProvider, RemoteExecutor, TimeProvider};
use std::sync::Arc;
use tracing::{info, warn};

/// One instance per configured check; owned by the host
pub struct CheckService {
    executor: Arc<dyn RemoteExecutor>,
    time_provider: Arc<dyn TimeProvider>,
    evidence: EvidenceGenerator,
}

impl CheckService {
    pub fn new(
        executor: Arc<dyn RemoteExecutor>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            executor,
            evidence: EvidenceGenerator::new(id_provider, time_provider.clone()),
            time_provider,
        }
    }

    /// Identify the single subject this check assesses (no network I/O)
    pub fn identify(&self, input: &Configuration) -> Result<Vec<Subject>> {
        let config = config_resolver::resolve(input)?;
        Ok(vec![subject_for(&config)])
    }

    /// Run the check
    pub async fn execute(&self, input: &Configuration) -> Result<CheckResult> {
        self.execute_with_cancel(input, CancelToken::never()).await
    }

    /// Run the check, observing an external cancellation token
    ///
    /// # Errors
    /// - AppError::Config if the configuration cannot be resolved
    /// - AppError::Execution if the command could not be run at all.
    ///   A non-zero exit code is not an error.
    pub async fn execute_with_cancel(
        &self,
        input: &Configuration,
        cancel: CancelToken,
    ) -> Result<CheckResult> {
        let started_at = self.time_provider.now();
        let config = config_resolver::resolve(input)?;

        info!(
            target_id = %config.target_id(),
            host_key_policy = %config.host_key_policy,
            "Running SSH command check"
        );

        let output = match self.executor.execute(&config, cancel).await {
            Ok(output) => output,
            Err(e) => {
                warn!(target_id = %config.target_id(), error = %e, "SSH command check could not run");
                return Err(e.into());
            }
        };

        let verdict = Verdict::from_exit_code(output.exit_code);

        info!(
            target_id = %config.target_id(),
            exit_code = output.exit_code,
            verdict = %verdict,
            duration_ms = output.duration_ms,
            "SSH command completed"
        );

        let bundle = self
            .evidence
            .generate(&config, verdict, &output, started_at);

        Ok(CheckResult {
            status: ExecutionStatus::Success,
            observations: bundle.observations,
            findings: bundle.findings,
            logs: bundle.logs,
        })
    }

    /// Run the check and report execution failures as an `ERROR` result.
    ///
    /// Configuration errors are still returned as `Err`: there is no check to
    /// report on.
    pub async fn report(&self, input: &Configuration, cancel: CancelToken) -> Result<CheckResult> {
        let started_at = self.time_provider.now();

        match self.execute_with_cancel(input, cancel).await {
            Err(AppError::Execution(e)) => {
                Ok(CheckResult::errored(self.evidence.error_log(started_at, &e)))
            }
            other => other,
        }
    }
}
