//! Command-line and environment configuration for the runner.
//!
//! Precedence, lowest first: built-in defaults, `--config <file.json>`,
//! `BLAST_*` environment variables, command-line flags. The result is always
//! sanitized before use.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::types::BoardConfig;

/// Turns played by `autoplay` when `--moves` is absent.
pub const DEFAULT_AUTOPLAY_MOVES: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Interactive terminal game.
    Play,
    /// Headless bot run.
    Autoplay { moves: u32, json: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub mode: Mode,
    pub config_path: Option<PathBuf>,
    pub rows: Option<u8>,
    pub columns: Option<u8>,
    pub colors: Option<u8>,
    pub seed: Option<u32>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            mode: Mode::Play,
            config_path: None,
            rows: None,
            columns: None,
            colors: None,
            seed: None,
        }
    }
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

fn parse_num<T: std::str::FromStr>(v: &str, flag: &str) -> Result<T> {
    v.parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}

/// Parse arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut i = 0usize;

    if args.first().map(String::as_str) == Some("autoplay") {
        out.mode = Mode::Autoplay {
            moves: DEFAULT_AUTOPLAY_MOVES,
            json: false,
        };
        i = 1;
    }

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--config" => {
                i += 1;
                out.config_path = Some(PathBuf::from(flag_value(args, i, flag)?));
            }
            "--rows" => {
                i += 1;
                out.rows = Some(parse_num(flag_value(args, i, flag)?, flag)?);
            }
            "--columns" => {
                i += 1;
                out.columns = Some(parse_num(flag_value(args, i, flag)?, flag)?);
            }
            "--colors" => {
                i += 1;
                out.colors = Some(parse_num(flag_value(args, i, flag)?, flag)?);
            }
            "--seed" => {
                i += 1;
                out.seed = Some(parse_num(flag_value(args, i, flag)?, flag)?);
            }
            "--moves" => {
                i += 1;
                let v: u32 = parse_num(flag_value(args, i, flag)?, flag)?;
                match &mut out.mode {
                    Mode::Autoplay { moves, .. } => *moves = v,
                    Mode::Play => return Err(anyhow!("--moves only applies to autoplay")),
                }
            }
            "--json" => match &mut out.mode {
                Mode::Autoplay { json, .. } => *json = true,
                Mode::Play => return Err(anyhow!("--json only applies to autoplay")),
            },
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(out)
}

/// Read a JSON board configuration. Missing fields keep their defaults.
pub fn load_config_file(path: &Path) -> Result<BoardConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

/// Overlay `BLAST_ROWS`, `BLAST_COLUMNS`, `BLAST_COLORS` and `BLAST_SEED`.
///
/// Unparsable values are ignored. `lookup` is usually `std::env::var(..).ok()`.
pub fn apply_env(config: &mut BoardConfig, lookup: impl Fn(&str) -> Option<String>) {
    let num = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u32>().ok());

    if let Some(v) = num("BLAST_ROWS") {
        config.rows = v.min(u8::MAX as u32) as u8;
    }
    if let Some(v) = num("BLAST_COLUMNS") {
        config.columns = v.min(u8::MAX as u32) as u8;
    }
    if let Some(v) = num("BLAST_COLORS") {
        config.color_count = v.min(u8::MAX as u32) as u8;
    }
    if let Some(v) = num("BLAST_SEED") {
        config.seed = Some(v);
    }
}

pub fn apply_flags(config: &mut BoardConfig, args: &CliArgs) {
    if let Some(v) = args.rows {
        config.rows = v;
    }
    if let Some(v) = args.columns {
        config.columns = v;
    }
    if let Some(v) = args.colors {
        config.color_count = v;
    }
    if let Some(v) = args.seed {
        config.seed = Some(v);
    }
}

/// Build the effective configuration from every source.
pub fn resolve_config(
    args: &CliArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<BoardConfig> {
    let mut config = match &args.config_path {
        Some(path) => load_config_file(path)?,
        None => BoardConfig::default(),
    };
    apply_env(&mut config, lookup);
    apply_flags(&mut config, args);
    Ok(config.sanitized())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_is_play() {
        assert_eq!(parse_args(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_autoplay_flags() {
        let parsed = parse_args(&args(&["autoplay", "--moves", "7", "--json", "--seed", "9"])).unwrap();
        assert_eq!(parsed.mode, Mode::Autoplay { moves: 7, json: true });
        assert_eq!(parsed.seed, Some(9));
    }

    #[test]
    fn test_bad_flags_are_errors() {
        assert!(parse_args(&args(&["--rows"])).is_err());
        assert!(parse_args(&args(&["--rows", "many"])).is_err());
        assert!(parse_args(&args(&["--moves", "3"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_flags_beat_env() {
        let parsed = parse_args(&args(&["--rows", "5", "--colors", "9"])).unwrap();
        let env = |key: &str| match key {
            "BLAST_ROWS" => Some("6".to_string()),
            "BLAST_COLUMNS" => Some("7".to_string()),
            "BLAST_SEED" => Some("nope".to_string()),
            _ => None,
        };
        let config = resolve_config(&parsed, env).unwrap();
        assert_eq!(config.rows, 5);
        assert_eq!(config.columns, 7);
        assert_eq!(config.color_count, 6);
        assert_eq!(config.seed, None);
    }
}
