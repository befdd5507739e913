//! Check flow integration tests
//!
//! Drives `CheckService` end to end through the mock executor and checks the
//! evidence contract the host relies on.

use std::sync::Arc;

use chrono::{Months, TimeZone, Utc};
use sshcheck_core::application::CheckService;
use sshcheck_core::domain::{
    ConfigError, Configuration, ExecutionStatus, SubjectType, CONFIGURATION_KEY,
};
use sshcheck_core::port::id_provider::mocks::SequentialIdProvider;
use sshcheck_core::port::id_provider::UuidProvider;
use sshcheck_core::port::remote_executor::mocks::MockRemoteExecutor;
use sshcheck_core::port::time_provider::mocks::FixedTimeProvider;
use sshcheck_core::port::time_provider::SystemTimeProvider;
use sshcheck_core::AppError;

const NGINX_CHECK: &str = "
username: svc
password: changeme
host: 10.0.0.5
port: \"22\"
command: systemctl is-active nginx
";

fn input(yaml: &str) -> Configuration {
    Configuration::from([(CONFIGURATION_KEY.to_string(), yaml.to_string())])
}

fn service_with(executor: Arc<MockRemoteExecutor>) -> CheckService {
    CheckService::new(executor, Arc::new(UuidProvider), Arc::new(SystemTimeProvider))
}

/// Scenario: exit code 0
#[tokio::test]
async fn test_nginx_active_is_compliant() {
    let service = service_with(Arc::new(MockRemoteExecutor::new_exit(0, "active\n")));

    let result = service.execute(&input(NGINX_CHECK)).await.unwrap();

    assert_eq!(result.status, ExecutionStatus::Success);
    assert_eq!(result.observations.len(), 1);
    assert_eq!(result.observations[0].title, "SSH Command Succeeded");
    assert_eq!(result.observations[0].remarks, "All OK.");
    assert!(result.findings.is_empty());
    assert_eq!(result.logs.len(), 1);
}

/// Scenario: exit code 3
#[tokio::test]
async fn test_nginx_inactive_produces_finding() {
    let service = service_with(Arc::new(MockRemoteExecutor::new_exit(3, "inactive\n")));

    let result = service.execute(&input(NGINX_CHECK)).await.unwrap();

    assert_eq!(result.status, ExecutionStatus::Success);
    assert_eq!(result.observations.len(), 1);
    assert_eq!(result.findings.len(), 1);

    let observation = &result.observations[0];
    let finding = &result.findings[0];
    assert_eq!(observation.title, "SSH Command Did Not Succeed");
    assert_eq!(finding.title, "SSH Command Failure");
    assert_eq!(finding.related_observations, vec![observation.id.clone()]);
    assert!(finding
        .remarks
        .contains("ssh -p 22 svc@10.0.0.5 systemctl is-active nginx"));
}

#[tokio::test]
async fn test_every_non_zero_exit_links_one_finding() {
    for code in [1, 2, 3, 126, 127, 255, -1] {
        let service = service_with(Arc::new(MockRemoteExecutor::new_exit(code, "")));
        let result = service.execute(&input(NGINX_CHECK)).await.unwrap();

        assert_eq!(result.observations.len(), 1, "exit code {}", code);
        assert_eq!(result.findings.len(), 1, "exit code {}", code);
        assert!(
            !result.findings[0].related_observations.is_empty(),
            "exit code {}",
            code
        );
        assert_eq!(
            result.findings[0].related_observations[0],
            result.observations[0].id
        );
    }
}

#[tokio::test]
async fn test_missing_required_fields_fail_both_operations() {
    let cases = [
        ("host: h\ncommand: c", "username"),
        ("username: u\ncommand: c", "host"),
        ("username: u\nhost: h", "command"),
    ];

    for (yaml, field) in cases {
        let executor = Arc::new(MockRemoteExecutor::new_exit(0, ""));
        let service = service_with(executor.clone());

        let err = service.identify(&input(yaml)).unwrap_err();
        assert!(
            matches!(err, AppError::Config(ConfigError::MissingField(f)) if f == field),
            "identify: {:?}",
            err
        );

        let err = service.execute(&input(yaml)).await.unwrap_err();
        assert!(
            matches!(err, AppError::Config(ConfigError::MissingField(f)) if f == field),
            "execute: {:?}",
            err
        );

        assert_eq!(executor.call_count(), 0);
    }
}

#[tokio::test]
async fn test_absent_port_defaults_everywhere() {
    let executor = Arc::new(MockRemoteExecutor::new_exit(0, ""));
    let service = service_with(executor.clone());
    let yaml = "username: svc\nhost: 10.0.0.5\ncommand: uptime";

    let subjects = service.identify(&input(yaml)).unwrap();
    assert_eq!(subjects[0].id, "svc@10.0.0.5:22 uptime");

    let result = service.execute(&input(yaml)).await.unwrap();
    assert_eq!(executor.calls()[0].port, 22);
    assert_eq!(
        result.observations[0].props[0].value,
        "ssh -p 22 svc@10.0.0.5 uptime"
    );
}

#[test]
fn test_identify_twice_yields_same_subject() {
    let service = service_with(Arc::new(MockRemoteExecutor::new_exit(0, "")));

    let first = service.identify(&input(NGINX_CHECK)).unwrap();
    let second = service.identify(&input(NGINX_CHECK)).unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert_eq!(first[0].subject_type, SubjectType::InventoryItem);
    assert_eq!(first[0].props["id"], first[0].id);
}

#[tokio::test]
async fn test_expiry_is_one_month_after_collection() {
    let start = Utc.with_ymd_and_hms(2023, 12, 15, 9, 30, 0).unwrap();
    let service = CheckService::new(
        Arc::new(MockRemoteExecutor::new_exit(0, "")),
        Arc::new(SequentialIdProvider::default()),
        Arc::new(FixedTimeProvider::new(start)),
    );

    let result = service.execute(&input(NGINX_CHECK)).await.unwrap();
    let observation = &result.observations[0];

    assert_eq!(
        observation.expires,
        observation.collected.checked_add_months(Months::new(1)).unwrap()
    );
    assert_eq!(observation.id, "id-1");

    // Log window brackets the observation
    let log = &result.logs[0];
    assert_eq!(log.start, start);
    assert!(log.start <= observation.collected);
    assert!(log.end >= observation.collected);
}

#[tokio::test]
async fn test_result_serializes_rfc3339_timestamps() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let service = CheckService::new(
        Arc::new(MockRemoteExecutor::new_exit(3, "inactive")),
        Arc::new(SequentialIdProvider::default()),
        Arc::new(FixedTimeProvider::new(start)),
    );

    let result = service.execute(&input(NGINX_CHECK)).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["status"], "SUCCESS");
    assert_eq!(json["logs"][0]["start"], "2024-03-01T00:00:00Z");
    assert_eq!(json["observations"][0]["collected"], "2024-03-01T00:00:01Z");
    assert_eq!(json["observations"][0]["expires"], "2024-04-01T00:00:01Z");
    assert_eq!(json["findings"][0]["related_observations"][0], "id-1");
}
