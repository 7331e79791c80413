use std::time::Duration;

use gpw_analyst_core::LoaderConfig;

use crate::cli::ConnectionArgs;
use crate::constants::{DEFAULT_BASE_URL, PREDICTION_DELAY_MS, REQUEST_TIMEOUT_SECS};

/// Upstream location and pacing for the terminal client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub prediction_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            prediction_delay: Duration::from_millis(PREDICTION_DELAY_MS),
        }
    }
}

impl ClientConfig {
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            prediction_delay: self.prediction_delay,
        }
    }
}

impl From<&ConnectionArgs> for ClientConfig {
    fn from(args: &ConnectionArgs) -> Self {
        Self {
            base_url: args.base_url.clone(),
            request_timeout: Duration::from_secs(args.timeout_secs.max(1)),
            prediction_delay: Duration::from_millis(args.delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_onto_config() {
        let args = ConnectionArgs {
            base_url: "http://gpw.local:9000".into(),
            delay_ms: 0,
            timeout_secs: 0,
        };

        let config = ClientConfig::from(&args);
        assert_eq!(config.base_url, "http://gpw.local:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.loader_config().prediction_delay, Duration::ZERO);
    }

    #[test]
    fn default_paces_predictions_at_300ms() {
        let config = ClientConfig::default();
        assert_eq!(config.prediction_delay, Duration::from_millis(300));
        assert_eq!(config.loader_config(), LoaderConfig::default());
    }
}
