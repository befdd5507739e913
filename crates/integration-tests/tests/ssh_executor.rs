//! SSH adapter integration tests
//!
//! Run the real russh executor against local sockets; no SSH server needed.

use std::net::TcpListener;
use std::sync::Arc;

use sshcheck_core::application::CheckService;
use sshcheck_core::domain::{Configuration, ExecutionStatus, CONFIGURATION_KEY};
use sshcheck_core::port::id_provider::UuidProvider;
use sshcheck_core::port::time_provider::SystemTimeProvider;
use sshcheck_core::port::{CancelToken, ExecutionError};
use sshcheck_core::AppError;
use sshcheck_infra_ssh::RusshExecutor;
use tokio_test::{assert_err, assert_ok};

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn input(port: u16, extra: &str) -> Configuration {
    let yaml = format!(
        "username: svc\npassword: pw\nhost: 127.0.0.1\nport: \"{}\"\ncommand: systemctl is-active nginx\n{}",
        port, extra
    );
    Configuration::from([(CONFIGURATION_KEY.to_string(), yaml)])
}

fn service() -> CheckService {
    let time_provider = Arc::new(SystemTimeProvider);
    CheckService::new(
        Arc::new(RusshExecutor::new(time_provider.clone())),
        Arc::new(UuidProvider),
        time_provider,
    )
}

/// Scenario: connection refused at dial time
#[tokio::test]
async fn test_connection_refused_returns_execution_error() {
    let port = closed_port();

    let err = assert_err!(service().execute(&input(port, "")).await);

    match err {
        AppError::Execution(ExecutionError::Connect { address, .. }) => {
            assert_eq!(address, format!("127.0.0.1:{}", port));
        }
        other => panic!("expected connect error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_reports_error_result() {
    let result = assert_ok!(
        service()
            .report(&input(closed_port(), ""), CancelToken::never())
            .await
    );

    assert_eq!(result.status, ExecutionStatus::Error);
    assert!(result.observations.is_empty());
    assert!(result.findings.is_empty());
    assert_eq!(result.logs.len(), 1);
    assert!(result.logs[0].description.contains("failed to dial"));
}

#[tokio::test]
async fn test_service_survives_failed_run() {
    let service = service();

    // One failing check must not poison the next invocation
    assert_err!(service.execute(&input(closed_port(), "")).await);
    let subjects = assert_ok!(service.identify(&input(2222, "")));
    assert_eq!(subjects[0].id, "svc@127.0.0.1:2222 systemctl is-active nginx");
}

#[tokio::test]
async fn test_unresponsive_host_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let err = assert_err!(
        service()
            .execute(&input(port, "timeout_secs: 1\nhost_key_policy: insecure"))
            .await
    );

    assert!(matches!(
        err,
        AppError::Execution(ExecutionError::Timeout(_))
    ));
    drop(listener);
}
