// Configuration Resolver
//
// Validation order (first failure wins):
//   1. `yaml` key present
//   2. blob decodes as YAML
//   3. username, host, command non-blank (in that order)
//   4. port (default 22)
//   5. timeout_secs (default 30)
//   6. host key policy (default strict)

use crate::domain::config::DEFAULT_TIMEOUT;
use crate::domain::error::Result;
use crate::domain::{
    ConfigError, Configuration, HostKeyPolicy, SshConfig, CONFIGURATION_KEY, DEFAULT_PORT,
};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Check blob as written by the host, before validation
#[derive(Debug, Default, Deserialize)]
struct RawSshConfig {
    #[serde(default)]
    username: Option<String>,
    #[serde(default, alias = "credential")]
    password: Option<String>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    port: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    host_key_policy: Option<String>,
    #[serde(default)]
    known_hosts: Option<String>,
    #[serde(default)]
    host_key_fingerprint: Option<String>,
}

/// Resolve the host's configuration map into a validated `SshConfig`
pub fn resolve(input: &Configuration) -> Result<SshConfig> {
    let blob = input
        .get(CONFIGURATION_KEY)
        .ok_or_else(|| ConfigError::MissingBlob(CONFIGURATION_KEY.to_string()))?;

    let raw = decode(blob)?;

    let username = required(raw.username, "username")?.trim().to_string();
    let host = required(raw.host, "host")?.trim().to_string();
    let command = required(raw.command, "command")?;
    let port = resolve_port(raw.port.as_deref())?;
    let timeout = resolve_timeout(raw.timeout_secs)?;
    let host_key_policy = resolve_host_key_policy(
        raw.host_key_policy.as_deref(),
        raw.known_hosts,
        raw.host_key_fingerprint,
    )?;

    debug!(
        username = %username,
        host = %host,
        port = port,
        host_key_policy = %host_key_policy,
        "Resolved check configuration"
    );

    Ok(SshConfig {
        username,
        password: raw.password.unwrap_or_default(),
        host,
        port,
        command,
        timeout,
        host_key_policy,
    })
}

fn decode(blob: &str) -> Result<RawSshConfig> {
    Config::builder()
        .add_source(File::from_str(blob, FileFormat::Yaml))
        .build()
        .and_then(|cfg| cfg.try_deserialize::<RawSshConfig>())
        .map_err(|e| ConfigError::Malformed(e.to_string()))
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField(field)),
    }
}

fn resolve_port(port: Option<&str>) -> Result<u16> {
    let port = match port.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => DEFAULT_PORT,
    };

    match port.parse::<u16>() {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(ConfigError::InvalidPort(port.to_string())),
    }
}

fn resolve_timeout(timeout_secs: Option<u64>) -> Result<Duration> {
    match timeout_secs {
        None => Ok(DEFAULT_TIMEOUT),
        Some(0) => Err(ConfigError::InvalidTimeout),
        Some(secs) => Ok(Duration::from_secs(secs)),
    }
}

fn resolve_host_key_policy(
    policy: Option<&str>,
    known_hosts: Option<String>,
    fingerprint: Option<String>,
) -> Result<HostKeyPolicy> {
    let known_hosts = known_hosts.filter(|p| !p.trim().is_empty());

    match policy.map(|p| p.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("strict") => Ok(HostKeyPolicy::Strict { known_hosts }),
        Some("fingerprint") => {
            let fingerprint = required(fingerprint, "host_key_fingerprint")?;
            Ok(HostKeyPolicy::Fingerprint(fingerprint.trim().to_string()))
        }
        Some("insecure") => Ok(HostKeyPolicy::Insecure),
        Some(other) => Err(ConfigError::InvalidHostKeyPolicy(other.to_string())),
    }
}
