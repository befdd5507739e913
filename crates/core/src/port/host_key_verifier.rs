// Host Key Verifier Port
// Trust decision for the server key presented during the SSH handshake

use thiserror::Error;

/// Server host key as seen by the transport adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostKey {
    pub host: String,
    pub port: u16,
    /// Algorithm name, e.g. `ssh-ed25519`
    pub algorithm: String,
    /// Base64 SHA-256 fingerprint without the `SHA256:` prefix or padding
    pub fingerprint: String,
    /// Base64 public key blob as it appears in known_hosts
    pub key_base64: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostKeyError {
    #[error("host is not listed in {0}")]
    UnknownHost(String),

    #[error("key differs from {path} line {line}")]
    KeyChanged { path: String, line: usize },

    #[error("fingerprint does not match pinned SHA256:{0}")]
    FingerprintMismatch(String),

    #[error("cannot read known hosts: {0}")]
    Store(String),
}

/// Host key trust capability
pub trait HostKeyVerifier: Send + Sync {
    /// Accept or reject the presented key
    fn verify(&self, key: &HostKey) -> Result<(), HostKeyError>;
}

/// Strip an optional `SHA256:` prefix and base64 padding
pub fn normalize_fingerprint(fingerprint: &str) -> String {
    let trimmed = fingerprint.trim();
    trimmed
        .strip_prefix("SHA256:")
        .unwrap_or(trimmed)
        .trim_end_matches('=')
        .to_string()
}

/// Accepts only a key whose SHA-256 fingerprint was pinned in configuration
pub struct PinnedFingerprintVerifier {
    expected: String,
}

impl PinnedFingerprintVerifier {
    pub fn new(fingerprint: &str) -> Self {
        Self {
            expected: normalize_fingerprint(fingerprint),
        }
    }
}

impl HostKeyVerifier for PinnedFingerprintVerifier {
    fn verify(&self, key: &HostKey) -> Result<(), HostKeyError> {
        if normalize_fingerprint(&key.fingerprint) == self.expected {
            Ok(())
        } else {
            Err(HostKeyError::FingerprintMismatch(self.expected.clone()))
        }
    }
}

/// Accepts every key. Only reachable through `host_key_policy: insecure`.
pub struct InsecureAcceptAny;

impl HostKeyVerifier for InsecureAcceptAny {
    fn verify(&self, key: &HostKey) -> Result<(), HostKeyError> {
        tracing::warn!(
            host = %key.host,
            fingerprint = %key.fingerprint,
            "Host key verification disabled, accepting key"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(fingerprint: &str) -> HostKey {
        HostKey {
            host: "10.0.0.5".to_string(),
            port: 22,
            algorithm: "ssh-ed25519".to_string(),
            fingerprint: fingerprint.to_string(),
            key_base64: "AAAAC3NzaC1lZDI1NTE5AAAAIA".to_string(),
        }
    }

    #[test]
    fn test_normalize_fingerprint() {
        assert_eq!(normalize_fingerprint("SHA256:abc+/="), "abc+/");
        assert_eq!(normalize_fingerprint("  abc  "), "abc");
    }

    #[test]
    fn test_pinned_fingerprint_accepts_match() {
        let verifier = PinnedFingerprintVerifier::new("SHA256:nThbg6kXUpJWGl7E1IGOCspRomTxdCARLviKw6E5SY8");
        assert!(verifier
            .verify(&key("nThbg6kXUpJWGl7E1IGOCspRomTxdCARLviKw6E5SY8"))
            .is_ok());
    }

    #[test]
    fn test_pinned_fingerprint_rejects_other_key() {
        let verifier = PinnedFingerprintVerifier::new("expected");
        let err = verifier.verify(&key("something-else")).unwrap_err();
        assert_eq!(err, HostKeyError::FingerprintMismatch("expected".to_string()));
    }

    #[test]
    fn test_insecure_accepts_anything() {
        assert!(InsecureAcceptAny.verify(&key("whatever")).is_ok());
    }
}
