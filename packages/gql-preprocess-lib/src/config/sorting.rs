use crate::{
    config::{env_var, Env, EnvVar, PreprocessConfigError, PreprocessConfigResult},
    defaults,
};
use serde::Deserialize;
use std::str::FromStr;
use strum::{AsRefStr, EnumString};

/// How a sort direction token that is neither `ASC…` nor `DESC…` is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
pub enum SortDirectionPolicy {
    /// Unknown tokens sort ascending.
    #[default]
    #[strum(serialize = "lenient")]
    Lenient,

    /// Sort entries with unknown tokens are dropped.
    #[strum(serialize = "strict")]
    Strict,
}

/// Sorting configuration.
#[derive(Clone, Deserialize, Debug)]
#[serde(default)]
pub struct SortingConfig {
    pub direction_policy: SortDirectionPolicy,
}

impl Default for SortingConfig {
    fn default() -> Self {
        Self {
            direction_policy: SortDirectionPolicy::from_str(
                defaults::SORT_DIRECTION_POLICY,
            )
            .unwrap_or_default(),
        }
    }
}

impl Env for SortingConfig {
    fn inject_opt_env_vars(&mut self) -> PreprocessConfigResult<()> {
        if let Some(value) = env_var(EnvVar::SortDirectionPolicy) {
            self.direction_policy =
                SortDirectionPolicy::from_str(&value.to_lowercase()).map_err(|_| {
                    PreprocessConfigError::InvalidEnvValue(
                        EnvVar::SortDirectionPolicy.as_ref().to_string(),
                        value.clone(),
                    )
                })?;
        }

        Ok(())
    }
}
