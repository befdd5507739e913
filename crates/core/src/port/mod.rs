// Port Layer - Interfaces for external dependencies

pub mod cancel;
pub mod host_key_verifier;
pub mod id_provider; // For deterministic testing
pub mod remote_executor;
pub mod time_provider;

// Re-exports
pub use cancel::{cancel_channel, CancelHandle, CancelToken};
pub use host_key_verifier::{
    HostKey, HostKeyError, HostKeyVerifier, InsecureAcceptAny, PinnedFingerprintVerifier,
};
pub use id_provider::IdProvider;
pub use remote_executor::{CommandOutput, ExecutionError, RemoteExecutor};
pub use time_provider::TimeProvider;
