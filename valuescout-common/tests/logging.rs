use valuescout_common::observability::{init_logging, LogConfig};

// The subscriber is global, so this binary holds a single test.
#[test]
fn returned_log_path_exists_when_local_clock_is_ahead_of_utc() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig {
        log_dir: Some(dir.path().to_path_buf()),
        emit_stderr: false,
        ..LogConfig::default()
    };

    let path = temp_env::with_var("TZ", Some("Etc/GMT-10"), || init_logging(config).unwrap());
    tracing::info!("log sink ready");

    let on_disk: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert!(
        path.exists(),
        "{} missing; found {on_disk:?}",
        path.display()
    );
    let expected = format!("valuescout.log.{}", chrono::Utc::now().format("%Y-%m-%d"));
    assert_eq!(path.file_name().unwrap().to_string_lossy(), expected);
}
