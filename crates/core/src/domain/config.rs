// Check Configuration Domain Model

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Raw configuration handed over by the assessment host (key -> string)
pub type Configuration = HashMap<String, String>;

/// Key under which the host places the YAML check blob
pub const CONFIGURATION_KEY: &str = "yaml";

/// Port used when the blob has no (or an empty) `port`
pub const DEFAULT_PORT: &str = "22";

/// Upper bound for one remote execution when `timeout_secs` is absent
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the remote host key is trusted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Key must match an entry in a known_hosts file (None = `~/.ssh/known_hosts`)
    Strict { known_hosts: Option<String> },
    /// Key must match a pinned SHA-256 fingerprint
    Fingerprint(String),
    /// Accept any key. Opt-in only.
    Insecure,
}

impl Default for HostKeyPolicy {
    fn default() -> Self {
        HostKeyPolicy::Strict { known_hosts: None }
    }
}

impl fmt::Display for HostKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostKeyPolicy::Strict { .. } => write!(f, "strict"),
            HostKeyPolicy::Fingerprint(_) => write!(f, "fingerprint"),
            HostKeyPolicy::Insecure => write!(f, "insecure"),
        }
    }
}

/// Validated connection/command parameters for one check invocation.
///
/// Only built by the configuration resolver, so `username`, `host` and
/// `command` are never blank and `port` is always set.
#[derive(Clone, PartialEq, Eq)]
pub struct SshConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub command: String,
    pub timeout: Duration,
    pub host_key_policy: HostKeyPolicy,
}

impl SshConfig {
    /// `host:port` dial address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Deterministic subject identifier: `user@host:port command`
    pub fn target_id(&self) -> String {
        format!(
            "{}@{}:{} {}",
            self.username, self.host, self.port, self.command
        )
    }

    /// Human-readable command line recorded in evidence
    pub fn command_line(&self) -> String {
        format!(
            "ssh -p {} {}@{} {}",
            self.port, self.username, self.host, self.command
        )
    }
}

// Password stays out of logs and panics
impl fmt::Debug for SshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("command", &self.command)
            .field("timeout", &self.timeout)
            .field("host_key_policy", &self.host_key_policy)
            .finish()
    }
}
