//! Integration tests for logger behavior.

use gradeplan::logger::{level, set_level, set_level_from_str, Level};
use gradeplan::{debug, error, info, verbose, warn};

#[test]
fn level_parse_accepts_valid() {
    assert_eq!(set_level_from_str("error"), Ok(Level::Error));
    assert_eq!(set_level_from_str("warn"), Ok(Level::Warn));
    assert_eq!(set_level_from_str("info"), Ok(Level::Info));
    assert_eq!(set_level_from_str("debug"), Ok(Level::Debug));
    assert_eq!(level(), Level::Debug);
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(set_level_from_str("invalid").is_err());
    assert!(set_level_from_str("").is_err());
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
    verbose!("verbose integration");
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_appends_messages() {
    use gradeplan::logger::{close_file_logging, init_file_logging};
    use tempfile::TempDir;

    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("logs").join("gradeplan.log");

    assert!(init_file_logging(&path));
    error!("written to file {}", 42);
    close_file_logging();

    let content = std::fs::read_to_string(&path).expect("log file");
    assert!(content.contains("[ERROR] written to file 42"));
}
