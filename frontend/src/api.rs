use std::time::Duration;

use gloo_net::http::Request;
use gpw_analyst_core::{DataLoader, FetchError, Pause, Prediction, StockApi, StockRecord};
use serde::de::DeserializeOwned;

pub type BrowserLoader = DataLoader<GlooStockApi, GlooPause>;

/// `StockApi` over the browser fetch API.
#[derive(Clone, Debug)]
pub struct GlooStockApi {
    base: String,
}

impl GlooStockApi {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// API served from the same origin as the page.
    pub fn same_origin() -> Self {
        let origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_default();
        Self::new(origin)
    }

    fn stocks_url(&self) -> String {
        format!("{}/api/stocks", self.base)
    }

    fn prediction_url(&self, ticker: &str) -> String {
        let ticker = String::from(js_sys::encode_uri_component(ticker));
        format!("{}/api/stock/{ticker}/predict", self.base)
    }
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|err| FetchError::Transport(err.to_string()))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    response
        .json::<T>()
        .await
        .map_err(|err| FetchError::Decode(err.to_string()))
}

impl StockApi for GlooStockApi {
    async fn fetch_stocks(&self) -> Result<Vec<StockRecord>, FetchError> {
        get_json(&self.stocks_url()).await
    }

    async fn fetch_prediction(&self, ticker: &str) -> Result<Prediction, FetchError> {
        get_json(&self.prediction_url(ticker)).await
    }
}

/// Pause backed by `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooPause;

impl Pause for GlooPause {
    async fn pause(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_is_normalised() {
        let api = GlooStockApi::new("https://gpw.example.com/");
        assert_eq!(api.stocks_url(), "https://gpw.example.com/api/stocks");

        let api = GlooStockApi::new("");
        assert_eq!(api.stocks_url(), "/api/stocks");
    }
}
