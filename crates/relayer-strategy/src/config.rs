//! Strategy configuration: selection of the relay strategy, transaction
//! limits, commitment query paging and retry policy, and proof heights.

pub mod error;
pub mod types;

use core::fmt::{Display, Error as FmtError, Formatter};
use core::time::Duration;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde_derive::{Deserialize, Serialize};

pub use error::Error;
pub use types::{MaxMsgNum, MaxTxSize, ProofHeightOffset};

use crate::chain::endpoint::PageRequest;

pub mod default {
    use super::*;

    pub fn page_limit() -> u64 {
        1000
    }

    pub fn page_offset() -> u64 {
        0
    }

    pub fn max_attempts() -> u32 {
        5
    }

    pub fn retry_delay() -> Duration {
        Duration::from_millis(400)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    #[default]
    Naive,
}

impl Display for StrategyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            StrategyType::Naive => write!(f, "naive"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyConfig {
    pub strategy: StrategyType,
    pub max_tx_size: MaxTxSize,
    pub max_msg_num: MaxMsgNum,
    pub proof_height_offset: ProofHeightOffset,
    pub query: QueryConfig,
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), Error> {
        self.query.validate()
    }
}

/// Paging and retry settings for the commitment queries that start every
/// reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    #[serde(default = "default::page_limit")]
    pub page_limit: u64,
    #[serde(default = "default::page_offset")]
    pub page_offset: u64,
    pub retry: RetryConfig,
}

impl QueryConfig {
    pub fn page(&self) -> PageRequest {
        PageRequest {
            offset: self.page_offset,
            limit: self.page_limit,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.page_limit == 0 {
            return Err(Error::invalid_page_limit(self.page_limit));
        }

        self.retry.validate()
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_limit: default::page_limit(),
            page_offset: default::page_offset(),
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    #[serde(default = "default::max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default::retry_delay", with = "humantime_serde")]
    pub delay: Duration,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.max_attempts == 0 {
            return Err(Error::invalid_retry(self.max_attempts));
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default::max_attempts(),
            delay: default::retry_delay(),
        }
    }
}

/// Attempt to load and parse the TOML config file as a `StrategyConfig`.
pub fn load(path: impl AsRef<Path>) -> Result<StrategyConfig, Error> {
    let config_toml = fs::read_to_string(&path).map_err(Error::io)?;

    let config = toml::from_str::<StrategyConfig>(&config_toml[..]).map_err(Error::decode)?;
    config.validate()?;

    Ok(config)
}

/// Serialize the given `StrategyConfig` as TOML to the given config file.
pub fn store(config: &StrategyConfig, path: impl AsRef<Path>) -> Result<(), Error> {
    let mut file = if path.as_ref().exists() {
        fs::OpenOptions::new().write(true).truncate(true).open(path)
    } else {
        File::create(path)
    }
    .map_err(Error::io)?;

    store_writer(config, &mut file)
}

/// Serialize the given `StrategyConfig` as TOML to the given writer.
pub(crate) fn store_writer(config: &StrategyConfig, mut writer: impl Write) -> Result<(), Error> {
    let toml_config = toml::to_string_pretty(&config).map_err(Error::encode)?;

    writeln!(writer, "{toml_config}").map_err(Error::io)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: StrategyConfig = toml::from_str("").unwrap();

        assert_eq!(config, StrategyConfig::default());
        assert_eq!(config.strategy, StrategyType::Naive);
        assert_eq!(usize::from(config.max_msg_num), 30);
        assert_eq!(usize::from(config.max_tx_size), 2 * 1048576);
        assert_eq!(config.query.page(), PageRequest { offset: 0, limit: 1000 });
        assert_eq!(config.query.retry.max_attempts, 5);
        assert_eq!(config.query.retry.delay, Duration::from_millis(400));
        assert_eq!(config.proof_height_offset.to_u64(), 1);
    }

    #[test]
    fn parse_full_config() {
        let config: StrategyConfig = toml::from_str(
            r#"
            strategy = "naive"
            max_tx_size = 180000
            max_msg_num = 10
            proof_height_offset = 2

            [query]
            page_limit = 500
            page_offset = 20

            [query.retry]
            max_attempts = 3
            delay = "250ms"
            "#,
        )
        .unwrap();

        assert_eq!(usize::from(config.max_tx_size), 180000);
        assert_eq!(usize::from(config.max_msg_num), 10);
        assert_eq!(config.proof_height_offset.to_u64(), 2);
        assert_eq!(config.query.page(), PageRequest { offset: 20, limit: 500 });
        assert_eq!(config.query.retry.max_attempts, 3);
        assert_eq!(config.query.retry.delay, Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!(toml::from_str::<StrategyConfig>(r#"strategy = "ordered""#).is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(toml::from_str::<StrategyConfig>("max_msg_length = 10").is_err());
    }

    #[test]
    fn zero_attempts_fail_validation() {
        let config: StrategyConfig = toml::from_str("[query.retry]\nmax_attempts = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_page_limit_fails_validation() {
        let config: StrategyConfig = toml::from_str("[query]\npage_limit = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn serialize_then_parse() {
        let config = StrategyConfig::default();

        let mut buffer = Vec::new();
        store_writer(&config, &mut buffer).unwrap();

        let toml_config = String::from_utf8(buffer).unwrap();
        let parsed: StrategyConfig = toml::from_str(&toml_config).unwrap();

        assert_eq!(parsed, config);
    }
}
