//! Progressive loading and table derivation for the GPW Analyst dashboard.
//!
//! The browser front end and the terminal client share this crate: both run
//! [`DataLoader::refresh`] against their own [`StockApi`] and [`StoreHandle`]
//! and render the rows produced by [`derive_rows`].

pub mod error;
pub mod loader;
pub mod metrics;
pub mod score;
pub mod stock;
pub mod store;
pub mod table;

pub use error::{FetchError, LoadError, PredictionFailure};
pub use loader::{DataLoader, LoaderConfig, Pause, RefreshSummary, StockApi};
pub use score::{quality_score, QualityBreakdown, QualityTier};
pub use stock::{Prediction, StockRecord, Trend};
pub use store::{StockStore, StoreHandle};
pub use table::{derive_rows, SortDirection, SortKey, SortState};
