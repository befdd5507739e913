// Host key verification adapters
use std::path::PathBuf;
use std::sync::Arc;

use sshcheck_core::domain::HostKeyPolicy;
use sshcheck_core::port::{
    HostKey, HostKeyError, HostKeyVerifier, InsecureAcceptAny, PinnedFingerprintVerifier,
};

/// Known hosts file used when the policy does not name one
pub const DEFAULT_KNOWN_HOSTS: &str = "~/.ssh/known_hosts";

/// Verifies keys against an OpenSSH known_hosts file (hashed entries and
/// `[host]:port` forms included)
pub struct KnownHostsVerifier {
    path: PathBuf,
}

impl KnownHostsVerifier {
    /// `~` in `path` is expanded to the current user's home
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(shellexpand::tilde(path).into_owned()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl HostKeyVerifier for KnownHostsVerifier {
    fn verify(&self, key: &HostKey) -> Result<(), HostKeyError> {
        let public_key = russh_keys::parse_public_key_base64(&key.key_base64)
            .map_err(|e| HostKeyError::Store(format!("unparseable server key: {}", e)))?;

        match russh_keys::check_known_hosts_path(&key.host, key.port, &public_key, &self.path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(HostKeyError::UnknownHost(self.path.display().to_string())),
            Err(russh_keys::Error::KeyChanged { line }) => Err(HostKeyError::KeyChanged {
                path: self.path.display().to_string(),
                line,
            }),
            Err(e) => Err(HostKeyError::Store(e.to_string())),
        }
    }
}

/// Build the verifier selected by the check's host key policy
pub fn verifier_for(policy: &HostKeyPolicy) -> Arc<dyn HostKeyVerifier> {
    match policy {
        HostKeyPolicy::Strict { known_hosts } => Arc::new(KnownHostsVerifier::new(
            known_hosts.as_deref().unwrap_or(DEFAULT_KNOWN_HOSTS),
        )),
        HostKeyPolicy::Fingerprint(fingerprint) => {
            Arc::new(PinnedFingerprintVerifier::new(fingerprint))
        }
        HostKeyPolicy::Insecure => Arc::new(InsecureAcceptAny),
    }
}
