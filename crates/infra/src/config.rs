//! Emitter configuration loading.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults (`EmitterConfig::default()`)
//! 2. Environment variables prefixed with `FLOWBUS_`
//!    (`FLOWBUS_SOURCE`, `FLOWBUS_SCAN_HISTORY`, `FLOWBUS_SUBSCRIBER_FAILURE`)

use std::sync::Arc;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flowbus_events::{Signals, SubscriberFailurePolicy};

pub const ENV_PREFIX: &str = "FLOWBUS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load emitter configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// How an [`crate::EventEmittingBackend`] publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Sender name handed to every subscriber.
    pub source: String,
    /// Scan unseen history on `poll_decision_task` (child starts, activity timeouts).
    ///
    /// Turning this off loses every `process_started` for child processes and
    /// every timeout the backend records on its own: `StartChildProcess`
    /// decisions publish nothing, so the poll is the only place they surface.
    pub scan_history: bool,
    /// Policy used by [`EmitterConfig::build_signals`]. An injected registry's
    /// own policy takes precedence (see [`crate::EventEmittingBackend::with_config`]).
    pub subscriber_failure: SubscriberFailurePolicy,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            source: "event-emitting-backend".to_string(),
            scan_history: true,
            subscriber_failure: SubscriberFailurePolicy::Isolate,
        }
    }
}

impl EmitterConfig {
    /// Defaults overridden by `FLOWBUS_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(environment()))
    }

    /// Read the same keys from TOML text (e.g. a host application's config file).
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_scan_history(mut self, scan_history: bool) -> Self {
        self.scan_history = scan_history;
        self
    }

    pub fn with_subscriber_failure(mut self, policy: SubscriberFailurePolicy) -> Self {
        self.subscriber_failure = policy;
        self
    }

    /// A fresh channel registry using the configured subscriber-failure policy.
    pub fn build_signals(&self) -> Arc<Signals> {
        Arc::new(Signals::with_policy(self.subscriber_failure))
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self, ConfigError> {
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_isolate_and_scan() {
        let config = EmitterConfig::default();
        assert_eq!(config.source, "event-emitting-backend");
        assert!(config.scan_history);
        assert_eq!(config.subscriber_failure, SubscriberFailurePolicy::Isolate);
    }

    #[test]
    fn toml_overrides_only_what_it_names() {
        let config = EmitterConfig::from_toml_str(
            r#"
            source = "billing-backend"
            subscriber_failure = "halt"
            "#,
        )
        .unwrap();

        assert_eq!(config.source, "billing-backend");
        assert_eq!(config.subscriber_failure, SubscriberFailurePolicy::Halt);
        assert!(config.scan_history);
    }

    #[test]
    fn environment_variables_are_read_with_prefix() {
        let vars = config::Map::from([
            ("FLOWBUS_SCAN_HISTORY".to_string(), "false".to_string()),
            ("FLOWBUS_SOURCE".to_string(), "env-backend".to_string()),
            ("OTHER_SOURCE".to_string(), "ignored".to_string()),
        ]);
        let config =
            EmitterConfig::build(Config::builder().add_source(environment().source(Some(vars)))).unwrap();

        assert!(!config.scan_history);
        assert_eq!(config.source, "env-backend");
    }

    #[test]
    fn load_reads_the_process_environment() {
        let config = EmitterConfig::load().unwrap();
        if std::env::vars().all(|(key, _)| !key.starts_with("FLOWBUS_")) {
            assert_eq!(config, EmitterConfig::default());
        }
    }

    #[test]
    fn unknown_policy_is_a_load_error() {
        let err = EmitterConfig::from_toml_str(r#"subscriber_failure = "retry""#).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn built_signals_use_the_policy() {
        let signals = EmitterConfig::default()
            .with_subscriber_failure(SubscriberFailurePolicy::Halt)
            .build_signals();
        assert_eq!(signals.process_started.policy(), SubscriberFailurePolicy::Halt);
    }
}
