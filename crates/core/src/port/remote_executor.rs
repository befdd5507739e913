// Remote Executor Port
// Abstraction for running one command on a remote host

use crate::domain::SshConfig;
use crate::port::CancelToken;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Raw outcome of a command that ran to completion on the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Combined stdout + stderr, in arrival order
    pub output: String,
    /// Remote exit status (-1 when terminated by a signal)
    pub exit_code: i32,
    pub duration_ms: i64,
}

/// Failures that prevent the command from completing.
///
/// A non-zero exit status is NOT one of these; it comes back as a normal
/// `CommandOutput`.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("failed to dial {address}: {reason}")]
    Connect { address: String, reason: String },

    #[error("host key for {host} rejected (SHA256:{fingerprint}): {reason}")]
    HostKeyRejected {
        host: String,
        fingerprint: String,
        reason: String,
    },

    #[error("authentication failed for user {username}")]
    Authentication { username: String },

    #[error("failed to create session: {0}")]
    Session(String),

    #[error("failed to execute command: {0}")]
    Dispatch(String),

    #[error("remote command exited without reporting an exit status")]
    MissingExitStatus,

    #[error("remote execution timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("remote execution cancelled")]
    Cancelled,
}

/// Remote Executor trait
///
/// Implementations:
/// - RusshExecutor (infra-ssh): password-authenticated SSH exec channel
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Run `config.command` on `config.host` and collect its output
    ///
    /// # Errors
    /// - ExecutionError::Connect if the TCP/SSH handshake fails
    /// - ExecutionError::HostKeyRejected if the host key is not trusted
    /// - ExecutionError::Authentication if the credential is refused
    /// - ExecutionError::Timeout / Cancelled if the run was cut short
    async fn execute(
        &self,
        config: &SshConfig,
        cancel: CancelToken,
    ) -> Result<CommandOutput, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Command ran and exited with this code and output
        Exit(i32, String),
        /// Connection refused at dial time
        ConnectRefused,
        /// Credential rejected
        AuthFailed,
    }

    /// Mock Remote Executor for testing
    pub struct MockRemoteExecutor {
        behavior: Arc<Mutex<MockBehavior>>,
        calls: Arc<Mutex<Vec<SshConfig>>>,
    }

    impl MockRemoteExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_exit(exit_code: i32, output: impl Into<String>) -> Self {
            Self::new(MockBehavior::Exit(exit_code, output.into()))
        }

        pub fn new_refused() -> Self {
            Self::new(MockBehavior::ConnectRefused)
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Configurations seen by `execute`, in call order
        pub fn calls(&self) -> Vec<SshConfig> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteExecutor for MockRemoteExecutor {
        async fn execute(
            &self,
            config: &SshConfig,
            _cancel: CancelToken,
        ) -> Result<CommandOutput, ExecutionError> {
            self.calls.lock().unwrap().push(config.clone());

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Exit(exit_code, output) => Ok(CommandOutput {
                    output,
                    exit_code,
                    duration_ms: 10,
                }),
                MockBehavior::ConnectRefused => Err(ExecutionError::Connect {
                    address: config.address(),
                    reason: "Connection refused (os error 111)".to_string(),
                }),
                MockBehavior::AuthFailed => Err(ExecutionError::Authentication {
                    username: config.username.clone(),
                }),
            }
        }
    }
}
