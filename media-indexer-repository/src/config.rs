//! AWS client configuration.
//!
//! The deployment hands the indexer a small JSON blob of client tuning (retry
//! policy, timeouts, user agent suffix) in the `botoConfig` environment
//! variable. It is parsed once into [`ClientTuning`] and applied to the shared
//! AWS SDK configuration used by both the object store and request signing.

use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{AppName, BehaviorVersion, SdkConfig};
use serde::Deserialize;
use tracing::{debug, warn};

/// Retry settings inside the tuning blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RetrySettings {
    /// Retries after the initial attempt.
    pub max_attempts: Option<u32>,
    /// Attempts including the initial one; wins over `max_attempts`.
    pub total_max_attempts: Option<u32>,
    /// `standard`, `adaptive` or `legacy`.
    pub mode: Option<String>,
}

/// Client tuning shared by all AWS clients of the process.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientTuning {
    /// Suffix appended to the user agent.
    pub user_agent_extra: Option<String>,
    /// Retry policy.
    pub retries: Option<RetrySettings>,
    /// Connect timeout in seconds.
    pub connect_timeout: Option<f64>,
    /// Read timeout in seconds.
    pub read_timeout: Option<f64>,
}

impl ClientTuning {
    /// Parse the tuning blob. Unknown keys are ignored.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }

    /// Retry policy to install, if the blob configures one.
    pub fn retry_config(&self) -> Option<RetryConfig> {
        let retries = self.retries.as_ref()?;

        let base = match retries.mode.as_deref() {
            Some("adaptive") => RetryConfig::adaptive(),
            _ => RetryConfig::standard(),
        };

        let attempts = retries
            .total_max_attempts
            .or(retries.max_attempts.map(|retries| retries + 1));

        Some(match attempts {
            Some(attempts) => base.with_max_attempts(attempts.max(1)),
            None => base,
        })
    }

    /// Timeouts to install, if the blob configures any.
    pub fn timeout_config(&self) -> Option<TimeoutConfig> {
        if self.connect_timeout.is_none() && self.read_timeout.is_none() {
            return None;
        }

        let mut builder = TimeoutConfig::builder();
        if let Some(secs) = self.connect_timeout.and_then(seconds) {
            builder = builder.connect_timeout(secs);
        }
        if let Some(secs) = self.read_timeout.and_then(seconds) {
            builder = builder.read_timeout(secs);
        }
        Some(builder.build())
    }

    /// The user agent suffix as an SDK app name.
    ///
    /// App names only allow a restricted character set, so anything outside
    /// it (typically `/`) is replaced with `-`.
    pub fn app_name(&self) -> Option<AppName> {
        let raw = self.user_agent_extra.as_deref()?;
        let sanitized = sanitize_app_name(raw);

        match AppName::new(sanitized) {
            Ok(name) => Some(name),
            Err(e) => {
                warn!(user_agent_extra = %raw, error = %e, "Ignoring unusable user agent suffix");
                None
            }
        }
    }
}

fn seconds(value: f64) -> Option<Duration> {
    if value > 0.0 {
        Duration::try_from_secs_f64(value).ok()
    } else {
        None
    }
}

fn sanitize_app_name(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c) {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Load the shared AWS SDK configuration with `tuning` applied.
///
/// Region and credentials come from the ambient environment.
pub async fn load_sdk_config(tuning: &ClientTuning) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(retry) = tuning.retry_config() {
        loader = loader.retry_config(retry);
    }
    if let Some(timeouts) = tuning.timeout_config() {
        loader = loader.timeout_config(timeouts);
    }
    if let Some(app_name) = tuning.app_name() {
        loader = loader.app_name(app_name);
    }

    let config = loader.load().await;
    debug!(region = ?config.region(), "Loaded AWS SDK configuration");
    config
}
