use std::time::Duration;

use crate::error::{FetchError, LoadError, PredictionFailure};
use crate::stock::{Prediction, StockRecord};
use crate::store::{StockStore, StoreHandle};

/// Gap between two prediction requests; the upstream rate-limits bursts.
pub const DEFAULT_PREDICTION_DELAY: Duration = Duration::from_millis(300);

/// The two upstream endpoints the dashboard consumes.
#[allow(async_fn_in_trait)]
pub trait StockApi {
    /// `GET /api/stocks`
    async fn fetch_stocks(&self) -> Result<Vec<StockRecord>, FetchError>;

    /// `GET /api/stock/{ticker}/predict`
    async fn fetch_prediction(&self, ticker: &str) -> Result<Prediction, FetchError>;
}

/// Cooperative wait between prediction requests.
#[allow(async_fn_in_trait)]
pub trait Pause {
    async fn pause(&self, duration: Duration);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub prediction_delay: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            prediction_delay: DEFAULT_PREDICTION_DELAY,
        }
    }
}

/// Outcome of a cycle whose baseline fetch succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub requested: usize,
    pub attached: usize,
    pub failed: Vec<PredictionFailure>,
}

/// Runs load cycles: one baseline fetch, then one prediction fetch per
/// ticker, strictly one after another.
pub struct DataLoader<A, P> {
    api: A,
    pause: P,
    config: LoaderConfig,
}

impl<A: StockApi, P: Pause> DataLoader<A, P> {
    pub fn new(api: A, pause: P) -> Self {
        Self::with_config(api, pause, LoaderConfig::default())
    }

    pub fn with_config(api: A, pause: P, config: LoaderConfig) -> Self {
        Self { api, pause, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Run one full cycle against `store`.
    ///
    /// The baseline replaces the store contents as soon as it arrives; each
    /// prediction is merged before the next request is issued. A failed
    /// baseline leaves the previous records in place. Calls made while a
    /// cycle is running are rejected with [`LoadError::Busy`].
    pub async fn refresh<S: StoreHandle>(&self, store: &S) -> Result<RefreshSummary, LoadError> {
        if store.read(StockStore::is_busy) {
            log::warn!(target: "loader.refresh", "refresh ignored while a cycle is running");
            return Err(LoadError::Busy);
        }

        store.apply(StockStore::begin_baseline);
        let baseline_guard = PhaseGuard::new(store, StockStore::end_baseline);

        let baseline = match self.api.fetch_stocks().await {
            Ok(records) => records,
            Err(err) => {
                drop(baseline_guard);
                log::error!(
                    target: "loader.baseline",
                    "baseline fetch failed, keeping previous records: {err}"
                );
                return Err(LoadError::BaselineFetchFailed(err));
            }
        };

        let mut duplicates = Vec::new();
        let mut tickers = Vec::new();
        store.apply(|state| {
            duplicates = state.install_baseline(baseline);
            tickers = state.stocks().map(|record| record.ticker.clone()).collect();
        });
        drop(baseline_guard);

        for ticker in &duplicates {
            log::warn!(
                target: "loader.baseline",
                ticker = ticker.as_str();
                "duplicate ticker in baseline, later entry kept"
            );
        }
        log::info!(
            target: "loader.baseline",
            records = tickers.len();
            "baseline installed"
        );

        store.apply(StockStore::begin_predictions);
        let _predict_guard = PhaseGuard::new(store, StockStore::end_predictions);

        let mut summary = RefreshSummary {
            requested: tickers.len(),
            ..RefreshSummary::default()
        };

        for ticker in &tickers {
            match self.fetch_checked(ticker).await {
                Ok(prediction) => {
                    let mut attached = false;
                    store.apply(|state| attached = state.attach_prediction(prediction));
                    if attached {
                        summary.attached += 1;
                        log::debug!(
                            target: "loader.prediction",
                            ticker = ticker.as_str();
                            "prediction attached"
                        );
                    }
                }
                Err(err) => {
                    log::warn!(
                        target: "loader.prediction",
                        ticker = ticker.as_str();
                        "prediction unavailable: {err}"
                    );
                    summary.failed.push(PredictionFailure {
                        ticker: ticker.clone(),
                        error: err,
                    });
                }
            }

            self.pause.pause(self.config.prediction_delay).await;
        }

        log::info!(
            target: "loader.cycle",
            requested = summary.requested,
            attached = summary.attached,
            failed = summary.failed.len();
            "prediction pass finished"
        );

        Ok(summary)
    }

    async fn fetch_checked(&self, ticker: &str) -> Result<Prediction, FetchError> {
        let prediction = self.api.fetch_prediction(ticker).await?;
        if prediction.ticker != ticker {
            return Err(FetchError::TickerMismatch {
                requested: ticker.to_string(),
                received: prediction.ticker,
            });
        }
        Ok(prediction)
    }
}

/// Clears a phase flag when the cycle leaves that phase, including when the
/// cycle future is dropped mid-flight.
struct PhaseGuard<'a, S: StoreHandle> {
    store: &'a S,
    end: fn(&mut StockStore),
}

impl<'a, S: StoreHandle> PhaseGuard<'a, S> {
    fn new(store: &'a S, end: fn(&mut StockStore)) -> Self {
        Self { store, end }
    }
}

impl<S: StoreHandle> Drop for PhaseGuard<'_, S> {
    fn drop(&mut self) {
        self.store.apply(self.end);
    }
}
