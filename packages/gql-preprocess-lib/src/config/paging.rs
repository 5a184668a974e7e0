use crate::{
    config::{env_var, Env, EnvVar, PreprocessConfigError, PreprocessConfigResult},
    defaults,
};
use serde::Deserialize;

/// Pagination configuration.
#[derive(Clone, Deserialize, Debug)]
#[serde(default)]
pub struct PagingConfig {
    /// Maximum number of items returned in a single page.
    pub max_page_size: usize,

    /// Always compute total counts, even when `totalCount` is not selected.
    pub include_total_count: bool,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_page_size: defaults::MAX_PAGE_SIZE,
            include_total_count: defaults::INCLUDE_TOTAL_COUNT,
        }
    }
}

impl Env for PagingConfig {
    fn inject_opt_env_vars(&mut self) -> PreprocessConfigResult<()> {
        if let Some(value) = env_var(EnvVar::MaxPageSize) {
            self.max_page_size = value.parse().map_err(|_| {
                PreprocessConfigError::InvalidEnvValue(
                    EnvVar::MaxPageSize.as_ref().to_string(),
                    value.clone(),
                )
            })?;
        }

        Ok(())
    }
}
