pub mod paging;
pub mod sorting;

pub use crate::{
    config::{
        paging::PagingConfig,
        sorting::{SortDirectionPolicy, SortingConfig},
    },
    defaults,
};
pub use clap::{Args, Parser};
use serde::Deserialize;
use std::{
    fs::File,
    io::Error,
    path::{Path, PathBuf},
    str::FromStr,
};
use strum::{AsRefStr, EnumString};
use thiserror::Error;

/// Error type returned by configuration operations.
#[derive(Error, Debug)]
pub enum PreprocessConfigError {
    #[error("Error processing file: {0:?}")]
    ConfigFileError(#[from] Error),
    #[error("Error processing YAML file: {0:?}")]
    SerdeYamlError(#[from] serde_yaml::Error),
    #[error("Invalid value for {0:?}: {1:?}")]
    InvalidEnvValue(String, String),
}

/// Result type returned by configuration operations.
pub type PreprocessConfigResult<T> = core::result::Result<T, PreprocessConfigError>;

/// Environment variables that override file or CLI settings.
#[derive(Debug, EnumString, AsRefStr)]
pub enum EnvVar {
    #[strum(serialize = "PREPROCESS_MAX_PAGE_SIZE")]
    MaxPageSize,
    #[strum(serialize = "PREPROCESS_SORT_DIRECTION_POLICY")]
    SortDirectionPolicy,
}

/// Return the value of an environment variable, if it is set.
pub fn env_var(var: EnvVar) -> Option<String> {
    std::env::var(var.as_ref()).ok()
}

/// Command line options for hosts embedding the pre-processing engine.
#[derive(Debug, Parser, Clone)]
#[clap(
    name = "GraphQL Pre-Processing",
    about = "Selection introspection and pagination for GraphQL resolvers.",
    version
)]
pub struct PreprocessArgs {
    /// Log level passed to the pre-processing engine.
    #[clap(long, default_value = defaults::LOG_LEVEL, value_parser(["info", "debug", "error", "warn", "trace"]), help = "Log level passed to the pre-processing engine.")]
    pub log_level: String,

    /// Pre-processing config file.
    #[clap(
        short,
        long,
        value_name = "FILE",
        help = "Pre-processing config file."
    )]
    pub config: Option<PathBuf>,

    /// Maximum number of items returned in a single page.
    #[clap(
        long,
        default_value_t = defaults::MAX_PAGE_SIZE,
        help = "Maximum number of items returned in a single page."
    )]
    pub max_page_size: usize,

    /// Always compute total counts, even when `totalCount` is not selected.
    #[clap(
        long,
        help = "Always compute total counts, even when `totalCount` is not selected."
    )]
    pub include_total_count: bool,

    /// How unknown sort direction tokens are handled.
    #[clap(long, default_value = defaults::SORT_DIRECTION_POLICY, value_parser(["lenient", "strict"]), help = "How unknown sort direction tokens are handled.")]
    pub sort_direction_policy: String,

    /// Enable verbose logging.
    #[clap(short, long, help = "Enable verbose logging.")]
    pub verbose: bool,
}

impl Default for PreprocessArgs {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_string(),
            config: None,
            max_page_size: defaults::MAX_PAGE_SIZE,
            include_total_count: defaults::INCLUDE_TOTAL_COUNT,
            sort_direction_policy: defaults::SORT_DIRECTION_POLICY.to_string(),
            verbose: defaults::VERBOSE_LOGGING,
        }
    }
}

pub trait Env {
    fn inject_opt_env_vars(&mut self) -> PreprocessConfigResult<()>;
}

/// Pre-processing engine configuration.
#[derive(Clone, Deserialize, Debug)]
#[serde(default)]
pub struct PreprocessConfig {
    pub log_level: String,
    pub verbose: bool,
    pub paging: PagingConfig,
    pub sorting: SortingConfig,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_string(),
            verbose: defaults::VERBOSE_LOGGING,
            paging: PagingConfig::default(),
            sorting: SortingConfig::default(),
        }
    }
}

impl From<PreprocessArgs> for PreprocessConfig {
    fn from(args: PreprocessArgs) -> Self {
        // `value_parser` already restricts the accepted strings.
        let direction_policy = SortDirectionPolicy::from_str(&args.sort_direction_policy)
            .unwrap_or_default();

        PreprocessConfig {
            log_level: args.log_level,
            verbose: args.verbose,
            paging: PagingConfig {
                max_page_size: args.max_page_size,
                include_total_count: args.include_total_count,
            },
            sorting: SortingConfig { direction_policy },
        }
    }
}

impl PreprocessConfig {
    /// Build the config from a YAML file. Any missing section, or missing setting
    /// within a section, is replaced with its default value.
    pub fn from_file(path: impl AsRef<Path>) -> PreprocessConfigResult<Self> {
        let file = File::open(path)?;
        let mut config: PreprocessConfig = serde_yaml::from_reader(file)?;

        config.inject_opt_env_vars()?;

        Ok(config)
    }

    /// Build the config from CLI arguments. When `--config` is given the file is
    /// the only source besides environment overrides, and every other flag is
    /// ignored.
    pub fn from_args(args: PreprocessArgs) -> PreprocessConfigResult<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => {
                let mut config = PreprocessConfig::from(args);
                config.inject_opt_env_vars()?;
                Ok(config)
            }
        }
    }

    // Inject env vars into each section of the config
    pub fn inject_opt_env_vars(&mut self) -> PreprocessConfigResult<()> {
        self.paging.inject_opt_env_vars()?;
        self.sorting.inject_opt_env_vars()?;

        Ok(())
    }
}
