use clap::Parser;
use dupscan::cli::Cli;
use dupscan::config::{Config, ConfigError};
use dupscan::output::ReportFormat;
use dupscan::scanner::{HashAlgorithm, MAX_BLOCK_SIZE};
use figment::providers::Serialized;
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();

    assert_eq!(config.block_size, 8192);
    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.format, ReportFormat::Markdown);
    assert!(config.progress);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(
        &config_path,
        r#"
algorithm = "sha256"
format = "json"
skip_hidden = true
follow_symlinks = true
min_size = 4096
progress = false
"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Sha256);
    assert_eq!(config.format, ReportFormat::Json);
    assert!(config.skip_hidden);
    assert!(config.follow_symlinks);
    assert!(!config.skip_empty);
    assert_eq!(config.min_size, Some(4096));
    assert!(!config.progress);
}

#[test]
fn test_config_env_overrides_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "block_size = 2048\n").unwrap();

    // block_size does not change any scan result, so other tests are unaffected
    std::env::set_var("DUPSCAN_BLOCK_SIZE", "1024");
    let config: Config = Config::figment(Some(&config_path)).extract().unwrap();
    std::env::remove_var("DUPSCAN_BLOCK_SIZE");

    assert_eq!(config.block_size, 1024);
}

#[test]
fn test_config_oversized_block_size_is_capped() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "block_size = 70368744177664\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    // DUPSCAN_BLOCK_SIZE may be set by another test, so only the cap is checked
    assert!(config.block_size <= MAX_BLOCK_SIZE);
}

#[test]
fn test_config_malformed_file_falls_back() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "algorithm = \"md5\"\nformat = [").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.format, ReportFormat::Markdown);
}

#[test]
fn test_config_missing_explicit_file() {
    let temp_dir = tempdir().unwrap();
    let result = Config::load(Some(&temp_dir.path().join("absent.toml")));

    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_cli_overrides_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "algorithm = \"sha256\"\nformat = \"json\"\n").unwrap();

    let cli = Cli::try_parse_from(["dupscan", "/data", "--format", "markdown"]).unwrap();
    let config = Config::load(Some(&config_path))
        .unwrap()
        .with_cli_overrides(&cli);

    assert_eq!(config.format, ReportFormat::Markdown);
    assert_eq!(config.algorithm, HashAlgorithm::Sha256);
}
