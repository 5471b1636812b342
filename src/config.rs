use clap::Parser;
use config::{
    Config as ConfigCrate, // Need this for builder
    ConfigError as ConfigCrateError,
    Environment,
    File,
    Map,
    Source,
    Value,
};
use directories::ProjectDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::ruleset::{
    Ruleset, DEFAULT_KINSOKU_END, DEFAULT_KINSOKU_HEAD, DEFAULT_SELF_CLOSING_TAGS,
};
use crate::wrap::{LineWrapper, DEFAULT_LOOKAHEAD};

const DEFAULT_STRIP_COMMANDS: bool = true;
const DEFAULT_LOG_LEVEL: &str = "warn";
const VERBOSE_LOG_LEVEL: &str = "debug";
const ENV_PREFIX: &str = "KINSOKU_WRAP";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Invalid command pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Optional fields allow for layered config (defaults -> file -> env -> args).
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    lookahead_window: Option<usize>,
    strip_commands: Option<bool>,
    kinsoku_head: Option<String>,
    kinsoku_end: Option<String>,
    self_closing_tags: Option<Vec<String>>,
    command_patterns: Option<Vec<String>>,
    log_level: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub script_mode: bool,
    pub lookahead_window: usize,
    pub strip_commands: bool,
    pub kinsoku_head: String,
    pub kinsoku_end: String,
    pub self_closing_tags: Vec<String>,
    pub command_patterns: Vec<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: None,
            output: None,
            script_mode: false,
            lookahead_window: DEFAULT_LOOKAHEAD,
            strip_commands: DEFAULT_STRIP_COMMANDS,
            kinsoku_head: DEFAULT_KINSOKU_HEAD.to_string(),
            kinsoku_end: DEFAULT_KINSOKU_END.to_string(),
            self_closing_tags: default_self_closing_tags(),
            command_patterns: Vec::new(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Builds the ruleset described by this configuration.
    pub fn ruleset(&self) -> Result<Ruleset, ConfigError> {
        let patterns = self
            .command_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Ruleset::empty()
            .with_kinsoku_head(&self.kinsoku_head)
            .with_kinsoku_end(&self.kinsoku_end)
            .with_self_closing_tags(self.self_closing_tags.iter().cloned())
            .with_command_patterns(patterns))
    }

    /// A wrapper using this configuration's options over `rules`.
    pub fn wrapper<'a>(&self, rules: &'a Ruleset) -> LineWrapper<'a> {
        LineWrapper::new(rules)
            .lookahead(self.lookahead_window)
            .strip_commands(self.strip_commands)
    }
}

// Command line arguments defined using clap.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Kinsoku-aware line wrapper for scenario text", long_about = None)]
pub struct CliArgs {
    /// Text file or script export to wrap (reads stdin when omitted)
    pub input: Option<PathBuf>,

    /// Write the wrapped result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Characters searched past an overflow for a kinsoku break point
    #[arg(long)]
    pub lookahead: Option<usize>,

    /// Strip configured command patterns before wrapping
    #[arg(long)]
    pub strip_commands: Option<bool>,

    /// Treat the input as a script export and wrap every MSG block
    #[arg(long)]
    pub script: bool,

    /// Print the visible character count to stderr
    #[arg(long)]
    pub count: bool,

    /// Print every wrapped line with its length and display width
    #[arg(long)]
    pub inspect: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub debug_config: bool,
}

// Function to load configuration from all sources.
pub fn load_config(args: &CliArgs) -> Result<Config, ConfigError> {
    let env_source = Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("self_closing_tags");
    // Missing env vars are fine; anything else falls back to no overrides.
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_else(|_| Map::new());

    build_config_from_args(args, Some(env_map))
}

// Separate function to allow testing with specific args and override sources
fn build_config_from_args(
    args: &CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<Config, ConfigError> {
    let config_file_path = args.config.clone().or_else(default_config_path);

    let mut config_builder = ConfigCrate::builder();

    if let Some(ref path) = config_file_path {
        config_builder = config_builder.add_source(File::from(path.clone()).required(false));
    }

    // Overrides take priority over the file source.
    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            config_builder = config_builder.set_override(&key, value)?;
        }
    }

    let loaded_sources: FileConfig = config_builder.build()?.try_deserialize()?;

    // args > overrides > file > defaults
    let config = Config {
        input: args.input.clone(),
        output: args.output.clone(),
        script_mode: args.script,
        lookahead_window: args
            .lookahead
            .or(loaded_sources.lookahead_window)
            .unwrap_or(DEFAULT_LOOKAHEAD),
        strip_commands: args
            .strip_commands
            .or(loaded_sources.strip_commands)
            .unwrap_or(DEFAULT_STRIP_COMMANDS),
        kinsoku_head: loaded_sources
            .kinsoku_head
            .unwrap_or_else(|| DEFAULT_KINSOKU_HEAD.to_string()),
        kinsoku_end: loaded_sources
            .kinsoku_end
            .unwrap_or_else(|| DEFAULT_KINSOKU_END.to_string()),
        self_closing_tags: loaded_sources
            .self_closing_tags
            .unwrap_or_else(default_self_closing_tags),
        command_patterns: loaded_sources.command_patterns.unwrap_or_default(),
        log_level: if args.verbose {
            VERBOSE_LOG_LEVEL.to_string()
        } else {
            loaded_sources
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
        },
    };

    validate_config(&config)?;

    Ok(config)
}

/// Rejects settings the wrapper cannot use.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.lookahead_window == 0 {
        return Err(ConfigError::ValidationError(
            "lookahead_window must be at least 1".to_string(),
        ));
    }

    if let Some(c) = config
        .kinsoku_head
        .chars()
        .find(|c| config.kinsoku_end.contains(*c))
    {
        return Err(ConfigError::ValidationError(format!(
            "{c:?} is listed in both kinsoku_head and kinsoku_end"
        )));
    }

    if config.self_closing_tags.iter().any(|tag| tag.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "self_closing_tags must not contain empty names".to_string(),
        ));
    }

    // Compiles every command pattern.
    config.ruleset()?;

    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kinsoku-wrap").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn default_self_closing_tags() -> Vec<String> {
    DEFAULT_SELF_CLOSING_TAGS
        .iter()
        .map(|tag| tag.to_string())
        .collect()
}
