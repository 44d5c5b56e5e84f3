//! Config files driving the workloads

use coopsched::run_search;
use coopsched::util::config::{load_config, save_config, Config, ConfigError};
use coopsched::util::logger::LogLevel;

#[test]
fn test_config_file_drives_workload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.ron");
    std::fs::write(
        &path,
        "(log: (level: warn), scheduler: (log_resumptions: false), search: (min_digits: [9]))",
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.log.level, LogLevel::Warn);
    assert!(!config.scheduler.log_resumptions);

    let report = run_search(&config.scheduler, &config.search.min_digits).unwrap();
    assert_eq!(report.tasks.len(), 1);
    assert_eq!(report.stats.resumptions, 40);
}

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.ron");

    let mut config = Config::default();
    config.search.prime_count = 8;
    save_config(&config, &path).unwrap();

    assert_eq!(load_config(Some(&path)).unwrap(), config);
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.ron");
    assert!(matches!(
        load_config(Some(&missing)),
        Err(ConfigError::Io { .. })
    ));
}
