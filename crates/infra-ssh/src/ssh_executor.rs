// SSH executor implementation
// reason: russh for the SSH transport, tokio for timeout/cancellation
use async_trait::async_trait;
use russh::client::{self, Handle, Msg};
use russh::{Channel, ChannelMsg, Disconnect};
use russh_keys::key::PublicKey;
use russh_keys::PublicKeyBase64;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use sshcheck_core::domain::SshConfig;
use sshcheck_core::port::remote_executor::{CommandOutput, ExecutionError, RemoteExecutor};
use sshcheck_core::port::{CancelToken, HostKey, HostKeyError, HostKeyVerifier, TimeProvider};

use crate::known_hosts::verifier_for;

/// Exit code recorded when the remote process was killed by a signal
const SIGNALLED_EXIT_CODE: i32 = -1;

/// Errors raised inside the russh client handler
#[derive(Error, Debug)]
enum HandlerError {
    #[error(transparent)]
    Russh(#[from] russh::Error),

    #[error("host key rejected: {reason}")]
    HostKey {
        fingerprint: String,
        reason: HostKeyError,
    },
}

/// russh client handler: delegates host key trust to a `HostKeyVerifier`
struct CheckClient {
    host: String,
    port: u16,
    verifier: Arc<dyn HostKeyVerifier>,
}

#[async_trait]
impl client::Handler for CheckClient {
    type Error = HandlerError;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        let key = HostKey {
            host: self.host.clone(),
            port: self.port,
            algorithm: server_public_key.name().to_string(),
            fingerprint: server_public_key.fingerprint(),
            key_base64: server_public_key.public_key_base64(),
        };

        match self.verifier.verify(&key) {
            Ok(()) => {
                debug!(host = %key.host, algorithm = %key.algorithm, "Host key accepted");
                Ok(true)
            }
            Err(reason) => Err(HandlerError::HostKey {
                fingerprint: key.fingerprint,
                reason,
            }),
        }
    }
}

/// SSH executor
/// Runs one command per call over a password-authenticated exec channel
pub struct RusshExecutor {
    time_provider: Arc<dyn TimeProvider>,
}

impl RusshExecutor {
    /// Create a new SSH executor
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { time_provider }
    }

    /// Open the transport and verify the host key
    async fn connect(&self, config: &SshConfig) -> Result<Handle<CheckClient>, ExecutionError> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });

        let handler = CheckClient {
            host: config.host.clone(),
            port: config.port,
            verifier: verifier_for(&config.host_key_policy),
        };

        client::connect(ssh_config, (config.host.as_str(), config.port), handler)
            .await
            .map_err(|e| match e {
                HandlerError::HostKey {
                    fingerprint,
                    reason,
                } => ExecutionError::HostKeyRejected {
                    host: config.host.clone(),
                    fingerprint,
                    reason: reason.to_string(),
                },
                HandlerError::Russh(e) => ExecutionError::Connect {
                    address: config.address(),
                    reason: e.to_string(),
                },
            })
    }

    /// Connect, run, and always disconnect
    async fn run(&self, config: &SshConfig) -> Result<CommandOutput, ExecutionError> {
        let start_time = self.time_provider.now();

        info!(
            address = %config.address(),
            username = %config.username,
            command = %config.command,
            "Starting SSH command execution"
        );

        let mut session = self.connect(config).await?;
        let result = authenticate_and_exec(&mut session, config).await;

        if let Err(e) = session
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
        {
            debug!(error = %e, "SSH disconnect failed");
        }

        let (output, exit_code) = result?;
        let duration_ms = (self.time_provider.now() - start_time).num_milliseconds();

        info!(
            address = %config.address(),
            exit_code = exit_code,
            duration_ms = duration_ms,
            "SSH command execution completed"
        );

        Ok(CommandOutput {
            output: String::from_utf8_lossy(&output).to_string(),
            exit_code,
            duration_ms,
        })
    }
}

async fn authenticate_and_exec(
    session: &mut Handle<CheckClient>,
    config: &SshConfig,
) -> Result<(Vec<u8>, i32), ExecutionError> {
    let authenticated = session
        .authenticate_password(config.username.as_str(), config.password.as_str())
        .await
        .map_err(|e| ExecutionError::Session(format!("authentication exchange failed: {}", e)))?;

    if !authenticated {
        return Err(ExecutionError::Authentication {
            username: config.username.clone(),
        });
    }

    let mut channel = session
        .channel_open_session()
        .await
        .map_err(|e| ExecutionError::Session(e.to_string()))?;

    let result = collect_output(&mut channel, &config.command).await;

    // Usually already closed by the server once the command exits
    if let Err(e) = channel.close().await {
        debug!(error = %e, "SSH channel close failed");
    }

    result
}

/// Send the command and read stdout + stderr until the channel closes
async fn collect_output(
    channel: &mut Channel<Msg>,
    command: &str,
) -> Result<(Vec<u8>, i32), ExecutionError> {
    channel
        .exec(true, command)
        .await
        .map_err(|e| ExecutionError::Dispatch(e.to_string()))?;

    let mut output = Vec::new();
    let mut exit_code = None;

    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::Data { ref data } => output.extend_from_slice(data),
            ChannelMsg::ExtendedData { ref data, .. } => output.extend_from_slice(data),
            ChannelMsg::ExitStatus { exit_status } => {
                exit_code = Some(i32::try_from(exit_status).unwrap_or(i32::MAX));
            }
            ChannelMsg::ExitSignal { signal_name, .. } => {
                warn!(signal = ?signal_name, "Remote command terminated by signal");
                exit_code.get_or_insert(SIGNALLED_EXIT_CODE);
            }
            ChannelMsg::Failure => {
                return Err(ExecutionError::Dispatch(
                    "exec request rejected by server".to_string(),
                ));
            }
            _ => {}
        }
    }

    exit_code
        .map(|code| (output, code))
        .ok_or(ExecutionError::MissingExitStatus)
}

#[async_trait]
impl RemoteExecutor for RusshExecutor {
    async fn execute(
        &self,
        config: &SshConfig,
        mut cancel: CancelToken,
    ) -> Result<CommandOutput, ExecutionError> {
        // Losing the race drops the in-flight run, and with it the session handle
        tokio::select! {
            result = tokio::time::timeout(config.timeout, self.run(config)) => {
                result.unwrap_or_else(|_| {
                    warn!(address = %config.address(), timeout = ?config.timeout, "SSH command timed out");
                    Err(ExecutionError::Timeout(config.timeout))
                })
            }
            _ = cancel.cancelled() => {
                warn!(address = %config.address(), "SSH command cancelled");
                Err(ExecutionError::Cancelled)
            }
        }
    }
}
