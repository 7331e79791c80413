use std::time::Duration;

use anyhow::{bail, Context, Result};
use gpw_analyst_core::{DataLoader, FetchError, Pause, Prediction, StockApi, StockRecord};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;

/// `StockApi` over HTTP with reqwest.
pub struct HttpStockApi {
    client: Client,
    base: Url,
}

impl HttpStockApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("invalid base URL {:?}", config.base_url))?;
        if base.cannot_be_a_base() {
            bail!("base URL {:?} cannot carry a path", config.base_url);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("gpw-analyst/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        serde_json::from_slice(&body).map_err(|err| FetchError::Decode(err.to_string()))
    }
}

impl StockApi for HttpStockApi {
    async fn fetch_stocks(&self) -> Result<Vec<StockRecord>, FetchError> {
        self.get_json(self.endpoint(&["api", "stocks"])).await
    }

    async fn fetch_prediction(&self, ticker: &str) -> Result<Prediction, FetchError> {
        self.get_json(self.endpoint(&["api", "stock", ticker, "predict"]))
            .await
    }
}

/// Pause backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioPause;

impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub type HttpLoader = DataLoader<HttpStockApi, TokioPause>;

pub fn build_loader(config: &ClientConfig) -> Result<HttpLoader> {
    let api = HttpStockApi::new(config)?;
    Ok(DataLoader::with_config(
        api,
        TokioPause,
        config.loader_config(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> HttpStockApi {
        let config = ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        };
        HttpStockApi::new(&config).expect("valid config")
    }

    #[test]
    fn endpoints_extend_the_base_path() {
        let api = api("http://127.0.0.1:8000/");
        assert_eq!(
            api.endpoint(&["api", "stocks"]).as_str(),
            "http://127.0.0.1:8000/api/stocks"
        );
        assert_eq!(
            api.endpoint(&["api", "stock", "PKO.WA", "predict"]).as_str(),
            "http://127.0.0.1:8000/api/stock/PKO.WA/predict"
        );
    }

    #[test]
    fn endpoints_keep_a_path_prefix() {
        let api = api("https://example.com/gpw");
        assert_eq!(
            api.endpoint(&["api", "stocks"]).as_str(),
            "https://example.com/gpw/api/stocks"
        );
    }

    #[test]
    fn ticker_is_encoded_as_one_segment() {
        let api = api("http://localhost:8000");
        assert_eq!(
            api.endpoint(&["api", "stock", "A/B C", "predict"]).as_str(),
            "http://localhost:8000/api/stock/A%2FB%20C/predict"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = ClientConfig {
            base_url: "not a url".into(),
            ..ClientConfig::default()
        };
        assert!(HttpStockApi::new(&config).is_err());

        let config = ClientConfig {
            base_url: "mailto:desk@example.com".into(),
            ..ClientConfig::default()
        };
        assert!(HttpStockApi::new(&config).is_err());
    }
}
