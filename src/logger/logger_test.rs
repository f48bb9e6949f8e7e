use super::Logger;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_log_text_writes_into_run_directory() {
    let root = tempdir().unwrap();
    let logger = Logger::new_in(root.path()).unwrap();

    logger.log_text("query.txt", "prompt body").unwrap();

    let content = fs::read_to_string(logger.log_dir().join("query.txt")).unwrap();
    assert_eq!(content, "prompt body");
    assert!(logger.log_dir().starts_with(root.path()));
}

#[test]
fn test_log_json_pretty_prints() {
    let root = tempdir().unwrap();
    let logger = Logger::new_in(root.path()).unwrap();

    logger
        .log_json("response.json", &json!({"ok": true, "n": 3}))
        .unwrap();

    let content = fs::read_to_string(logger.log_dir().join("response.json")).unwrap();
    assert!(content.contains("\"ok\": true"));
    // Pretty output spans multiple lines.
    assert!(content.lines().count() > 1);
}
