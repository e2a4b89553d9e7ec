//! Tests for the process exit status chosen per run failure

use std::path::PathBuf;

use ip_ledger::error_handling::{
    InitializationError, InputError, LookupError, StoreError, SyncError,
};
use ip_ledger::RunError;

#[test]
fn test_fatal_lookup_exits_one() {
    let err = RunError::FatalLookup {
        ip: "8.8.8.8".to_string(),
        appended: 3,
        source: LookupError::Timeout("operation timed out".to_string()),
    };
    assert_eq!(err.exit_code(), 1);
    assert_eq!(
        err.to_string(),
        "8.8.8.8 - Timeout error occurred: operation timed out"
    );
}

#[test]
fn test_missing_api_key_exits_one() {
    let err = RunError::from(InitializationError::ConfigError("no key".to_string()));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_pull_failure_exits_two() {
    let err = RunError::SyncUnavailable(SyncError::Pull {
        url: "https://raw.githubusercontent.com/o/r/main/ip_data.txt".to_string(),
        message: "404 Not Found".to_string(),
    });
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_store_errors_exit_three() {
    let locked = RunError::from(StoreError::Locked(PathBuf::from("ip_data.txt")));
    assert_eq!(locked.exit_code(), 3);

    let unavailable = RunError::from(StoreError::Unavailable {
        path: PathBuf::from("ip_data.txt"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    });
    assert_eq!(unavailable.exit_code(), 3);
}

#[test]
fn test_no_ips_exits_four() {
    let err = RunError::from(InputError::NoIpsFound);
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn test_unhandled_exits_one() {
    let err = RunError::from(anyhow::anyhow!("something broke"));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_panicked_run_task_is_unhandled() {
    let join_error = tokio::spawn(async {
        let ips: Vec<&str> = Vec::new();
        ips[3].to_string()
    })
    .await
    .expect_err("task panics");

    let err = RunError::from(join_error);
    assert!(matches!(err, RunError::Unhandled(_)));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().starts_with("Run task panicked: index out of bounds"));
}
