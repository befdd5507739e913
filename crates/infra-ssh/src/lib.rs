// SSH Check Infrastructure - SSH Adapters
// Implements: RemoteExecutor, HostKeyVerifier

pub mod known_hosts;
pub mod ssh_executor;

pub use known_hosts::{verifier_for, KnownHostsVerifier, DEFAULT_KNOWN_HOSTS};
pub use ssh_executor::RusshExecutor;
