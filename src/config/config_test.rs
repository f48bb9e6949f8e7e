use super::{read_commander_file, read_system_file, Config, INSTRUCTIONS_FILE, SYSTEM_FILE};
use crate::app_error::AppError;
use crate::cli::{CliArgs, Provider};
use std::fs;
use tempfile::tempdir;

fn args_for(provider: Provider) -> CliArgs {
    CliArgs {
        provider,
        recursive: false,
        extensions: vec!["py".to_string()],
        assume_yes: false,
        files: Vec::new(),
        trace: false,
    }
}

#[test]
fn test_read_commander_file_trims_content() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(INSTRUCTIONS_FILE), "\n  do the thing  \n").unwrap();

    assert_eq!(read_commander_file(dir.path()).unwrap(), "do the thing");
}

#[test]
fn test_missing_commander_file_is_a_config_error() {
    let dir = tempdir().unwrap();

    let result = read_commander_file(dir.path());
    assert!(matches!(result, Err(AppError::Config(_))));
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("'commander.txt' not found"));
}

#[test]
fn test_read_system_file_skips_comment_lines() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(SYSTEM_FILE),
        "# a comment\nkeep this\n  # indented comment\nand this\n",
    )
    .unwrap();

    assert_eq!(
        read_system_file(dir.path()).unwrap(),
        "keep this\nand this"
    );
}

#[test]
fn test_missing_system_file_is_empty() {
    let dir = tempdir().unwrap();
    assert_eq!(read_system_file(dir.path()).unwrap(), "");
}

#[test]
fn test_load_combines_system_and_commander_text() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(INSTRUCTIONS_FILE), "rename foo to bar").unwrap();
    fs::write(dir.path().join(SYSTEM_FILE), "always keep comments\n").unwrap();

    // The key is read from the environment; pick a provider and set its
    // variable for the duration of this test.
    std::env::set_var("XAI_API_KEY", "test-key-123");
    let config = Config::load_from_dir(&args_for(Provider::Xai), dir.path()).unwrap();

    assert_eq!(config.api_key, "test-key-123");
    assert_eq!(
        config.instructions,
        "always keep comments\n\nrename foo to bar"
    );
    assert!(config.project_id.is_none());
}

#[test]
fn test_missing_api_key_names_the_variable() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(INSTRUCTIONS_FILE), "instructions").unwrap();

    std::env::remove_var("ANTHROPIC_API_KEY");
    let result = Config::load_from_dir(&args_for(Provider::Claude), dir.path());

    assert!(matches!(result, Err(AppError::Config(_))));
    assert!(result.unwrap_err().to_string().contains("ANTHROPIC_API_KEY"));
}
