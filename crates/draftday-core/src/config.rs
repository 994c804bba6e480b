// Configuration loading and parsing (league.toml, lottery.toml, schedule.toml).

use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::league::{Owner, Standings};
use crate::lottery::chances::ChancesPolicy;
use crate::lottery::session::LotterySettings;
use crate::schedule::builder::{Division, ScheduleOptions};

/// Names of the config files, in load order.
pub const CONFIG_FILES: &[&str] = &["league.toml", "lottery.toml", "schedule.toml"];

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub lottery: LotterySettings,
    pub schedule: ScheduleConfig,
}

// ---------------------------------------------------------------------------
// league.toml
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub num_teams: usize,
    #[serde(default)]
    pub owners: Vec<Owner>,
}

impl LeagueConfig {
    pub fn standings(&self) -> Standings {
        Standings::new(self.owners.clone())
    }
}

// ---------------------------------------------------------------------------
// lottery.toml
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct LotteryFile {
    lottery: LotterySettings,
}

// ---------------------------------------------------------------------------
// schedule.toml
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ScheduleFile {
    schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_prefer_pods")]
    pub prefer_pods: bool,
    pub divisions: Vec<Division>,
    /// Team -> rival. Every rivalry is listed in both directions.
    pub rivals: HashMap<String, String>,
}

fn default_prefer_pods() -> bool {
    true
}

impl ScheduleConfig {
    pub fn options(&self) -> ScheduleOptions {
        ScheduleOptions {
            seed: self.seed,
            prefer_pods: self.prefer_pods,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/league.toml`, `config/lottery.toml` and
/// `config/schedule.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` handles that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league: LeagueFile = parse_file(&config_dir.join("league.toml"))?;
    let lottery: LotteryFile = parse_file(&config_dir.join("lottery.toml"))?;
    let schedule: ScheduleFile = parse_file(&config_dir.join("schedule.toml"))?;

    let config = Config {
        league: league.league,
        lottery: lottery.lottery,
        schedule: schedule.schedule,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy any of [`CONFIG_FILES`] missing from `config/` out of `defaults/`.
///
/// Existing files are left alone so local edits survive. Other files in
/// `defaults/` (such as `*.example` templates) are ignored. Returns the
/// paths that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            debug!(dir = %config_dir.display(), "no defaults/ directory, using config/ as is");
            return Ok(Vec::new());
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither defaults/ nor config/ directory found in {}; \
                 run from the project root or ensure defaults/ is present",
                base_dir.display()
            ),
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create {}: {e}", config_dir.display()),
    })?;

    let mut copied = Vec::new();
    for name in CONFIG_FILES {
        let source = defaults_dir.join(name);
        if !source.is_file() {
            debug!(file = *name, "no shipped default");
            continue;
        }
        let target = config_dir.join(name);
        if copy_if_missing(&source, &target)? {
            info!(path = %target.display(), "copied default config");
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Create `target` with the contents of `source` unless it already exists.
fn copy_if_missing(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let copy_error = |action: &str, path: &Path, e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to {action} {}: {e}", path.display()),
    };

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(copy_error("create", target, e)),
    };
    let mut src = std::fs::File::open(source).map_err(|e| copy_error("open", source, e))?;
    std::io::copy(&mut src, &mut dest).map_err(|e| copy_error("write", target, e))?;
    Ok(true)
}

/// Loads config relative to `base_dir`, copying defaults first.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;
    let num_teams = league.num_teams;

    if num_teams == 0 {
        return Err(invalid("league.num_teams", "must be greater than 0"));
    }
    if league.owners.len() != num_teams {
        return Err(invalid(
            "league.owners",
            format!("expected {num_teams} owners, got {}", league.owners.len()),
        ));
    }
    let mut names = BTreeSet::new();
    for owner in &league.owners {
        if owner.owner.trim().is_empty() {
            return Err(invalid("league.owners", "owner names must not be empty"));
        }
        if !names.insert(owner.owner.as_str()) {
            return Err(invalid(
                "league.owners",
                format!("owner {} is listed more than once", owner.owner),
            ));
        }
    }

    // Lottery validations
    let lottery = &config.lottery;
    if lottery.balls == 0 || lottery.balls > num_teams {
        return Err(invalid(
            "lottery.balls",
            format!("must be between 1 and {num_teams}, got {}", lottery.balls),
        ));
    }
    if let Some(picks) = lottery.picks {
        if picks == 0 || picks > num_teams {
            return Err(invalid(
                "lottery.picks",
                format!("must be between 1 and {num_teams}, got {picks}"),
            ));
        }
    }
    if lottery.iterations == 0 {
        return Err(invalid("lottery.iterations", "must be > 0"));
    }
    match &lottery.chances {
        ChancesPolicy::Linear { max, min } if min > max => {
            return Err(invalid(
                "lottery.chances.max",
                format!("must be at least min ({min}), got {max}"),
            ));
        }
        ChancesPolicy::Explicit { values } if values.len() != num_teams => {
            return Err(invalid(
                "lottery.chances.values",
                format!("expected {num_teams} entries, got {}", values.len()),
            ));
        }
        _ => {}
    }

    // Schedule teams must be league owners
    for division in &config.schedule.divisions {
        for team in &division.teams {
            if !names.contains(team.as_str()) {
                return Err(invalid(
                    "schedule.divisions",
                    format!("team {team} in division {} is not a league owner", division.name),
                ));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
