//! Application configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

use crate::controller::reveal::RevealTimings;
use crate::controller::sidebar::SidebarConfig;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub sidebar: SidebarConfig,
    pub reveal: RevealTimings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            port: DEFAULT_PORT,
            sidebar: SidebarConfig::default(),
            reveal: RevealTimings::default(),
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// All optional:
    /// - `BIND_ADDR`: default `127.0.0.1`
    /// - `PORT`: default 3001
    /// - `FINCHAT_SIDEBAR_WIDTH`: fully-open sidebar width, default 300
    /// - `FINCHAT_THINKING_DELAY_MS`: default 800
    /// - `FINCHAT_REPLY_DELAY_MS`: default 1500
    /// - `FINCHAT_REVEAL_TICK_MS`: default 30
    /// - `FINCHAT_SETTLE_DELAY_MS`: default 500
    /// - `FINCHAT_CLEANUP_DELAY_MS`: default 100
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a value is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let bind_addr = parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?;
        let port = parse_or(&lookup, "PORT", defaults.port)?;

        let width = parse_or(&lookup, "FINCHAT_SIDEBAR_WIDTH", defaults.sidebar.width)?;
        if !width.is_finite() || width <= 0.0 {
            return Err(ConfigError::Invalid { var: "FINCHAT_SIDEBAR_WIDTH", value: width.to_string() });
        }

        let d = defaults.reveal;
        let reveal = RevealTimings {
            thinking_delay: parse_ms(&lookup, "FINCHAT_THINKING_DELAY_MS", d.thinking_delay)?,
            reply_delay: parse_ms(&lookup, "FINCHAT_REPLY_DELAY_MS", d.reply_delay)?,
            tick: parse_ms(&lookup, "FINCHAT_REVEAL_TICK_MS", d.tick)?,
            settle_delay: parse_ms(&lookup, "FINCHAT_SETTLE_DELAY_MS", d.settle_delay)?,
            cleanup_delay: parse_ms(&lookup, "FINCHAT_CLEANUP_DELAY_MS", d.cleanup_delay)?,
        };
        if reveal.tick.is_zero() {
            return Err(ConfigError::Invalid { var: "FINCHAT_REVEAL_TICK_MS", value: "0".into() });
        }

        Ok(Self { bind_addr, port, sidebar: SidebarConfig { width }, reveal })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

fn parse_ms(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_or(lookup, var, default_ms).map(Duration::from_millis)
}
