use std::path::PathBuf;

use blast_puzzle::cli::{load_config_file, parse_args, resolve_config, Mode};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn write_temp(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("blast-puzzle-{}-{}.json", name, std::process::id()));
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn json_config_fills_missing_fields_with_defaults() {
    let path = write_temp("partial", r#"{ "rows": 6, "thresholds": { "a": 4 } }"#);
    let config = load_config_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.rows, 6);
    assert_eq!(config.columns, 8);
    assert_eq!(config.thresholds.a, 4);
    assert_eq!(config.thresholds.b, 5);
}

#[test]
fn env_and_flags_override_the_file() {
    let path = write_temp("layered", r#"{ "rows": 6, "columns": 6, "color_count": 3 }"#);
    let path_arg = path.to_string_lossy().to_string();
    let parsed = parse_args(&args(&["autoplay", "--config", &path_arg, "--columns", "9"])).unwrap();
    assert_eq!(parsed.mode, Mode::Autoplay { moves: 50, json: false });

    let env = |key: &str| match key {
        "BLAST_ROWS" => Some("4".to_string()),
        "BLAST_COLUMNS" => Some("5".to_string()),
        "BLAST_SEED" => Some("31".to_string()),
        _ => None,
    };
    let config = resolve_config(&parsed, env).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.rows, 4);
    assert_eq!(config.columns, 9);
    assert_eq!(config.color_count, 3);
    assert_eq!(config.seed, Some(31));
}

#[test]
fn out_of_range_values_are_clamped() {
    let parsed = parse_args(&args(&["--rows", "40", "--columns", "1", "--colors", "0"])).unwrap();
    let config = resolve_config(&parsed, |_| None).unwrap();
    assert_eq!(config.rows, 10);
    assert_eq!(config.columns, 2);
    assert_eq!(config.color_count, 2);
}

#[test]
fn broken_config_file_is_an_error() {
    let path = write_temp("broken", "{ rows: ");
    let path_arg = path.to_string_lossy().to_string();
    let parsed = parse_args(&args(&["--config", &path_arg])).unwrap();
    let result = resolve_config(&parsed, |_| None);
    std::fs::remove_file(&path).ok();
    assert!(result.is_err());

    let missing = parse_args(&args(&["--config", "/nonexistent/blast.json"])).unwrap();
    assert!(resolve_config(&missing, |_| None).is_err());
}
