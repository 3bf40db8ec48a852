// Integration tests for logging functionality
// Initializes the global subscriber, so it lives in its own test binary.

use integration_settings::infrastructure::logging::{
    LogConfig, LogFormat, LoggerImpl, RotationPolicy,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_file_output_is_json_and_scrubbed() {
    let temp_dir = TempDir::new().unwrap();

    let config = LogConfig {
        level: "info".to_string(),
        format: LogFormat::Pretty,
        log_dir: Some(temp_dir.path().to_path_buf()),
        enable_stdout: false,
        rotation: RotationPolicy::Never,
    };

    let logger = LoggerImpl::init(&config).unwrap();

    tracing::info!(project_id = 42, "Connecting with api_key=sk_live_123");
    tracing::info!("Forwarding Authorization: Bearer abc.def.ghi");
    tracing::debug!("below the configured level");

    // Dropping the logger flushes the non-blocking writer.
    drop(logger);

    let contents = fs::read_to_string(temp_dir.path().join("integration-settings.log")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2, "unexpected log output: {contents}");

    for line in &lines {
        let entry: serde_json::Value = serde_json::from_str(line).expect("log line should be JSON");
        assert_eq!(entry["level"], "INFO");
    }
    assert!(contents.contains("api_key=[REDACTED]"));
    assert!(contents.contains("Bearer [TOKEN_REDACTED]"));
    assert!(!contents.contains("sk_live_123"));
    assert!(!contents.contains("abc.def.ghi"));
    assert!(!contents.contains("below the configured level"));
}
