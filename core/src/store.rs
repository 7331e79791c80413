use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::stock::{Prediction, StockRecord};

/// Progressive view of one load cycle: the baseline records keyed by ticker
/// in arrival order, plus the two phase flags the view uses to lock the
/// refresh trigger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockStore {
    stocks: IndexMap<String, StockRecord>,
    baseline_loading: bool,
    predicting: bool,
}

impl StockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stocks(&self) -> impl ExactSizeIterator<Item = &StockRecord> + '_ {
        self.stocks.values()
    }

    /// Owned copy of the records in baseline order.
    pub fn to_vec(&self) -> Vec<StockRecord> {
        self.stocks.values().cloned().collect()
    }

    pub fn get(&self, ticker: &str) -> Option<&StockRecord> {
        self.stocks.get(ticker)
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    pub fn predicted_count(&self) -> usize {
        self.stocks
            .values()
            .filter(|record| record.prediction.is_some())
            .count()
    }

    pub fn is_baseline_loading(&self) -> bool {
        self.baseline_loading
    }

    pub fn is_predicting(&self) -> bool {
        self.predicting
    }

    /// True while either phase of a cycle is running.
    pub fn is_busy(&self) -> bool {
        self.baseline_loading || self.predicting
    }

    pub fn begin_baseline(&mut self) {
        self.baseline_loading = true;
    }

    pub fn end_baseline(&mut self) {
        self.baseline_loading = false;
    }

    /// Replace the whole collection with a fresh baseline.
    ///
    /// Predictions embedded in the payload are dropped; they only arrive
    /// through [`StockStore::attach_prediction`]. Returns the tickers that
    /// appeared more than once.
    pub fn install_baseline(&mut self, records: Vec<StockRecord>) -> Vec<String> {
        let mut stocks = IndexMap::with_capacity(records.len());
        let mut duplicates = Vec::new();
        for mut record in records {
            record.prediction = None;
            let ticker = record.ticker.clone();
            if stocks.insert(ticker.clone(), record).is_some() {
                duplicates.push(ticker);
            }
        }
        self.stocks = stocks;
        self.baseline_loading = false;
        duplicates
    }

    pub fn begin_predictions(&mut self) {
        self.predicting = true;
    }

    pub fn end_predictions(&mut self) {
        self.predicting = false;
    }

    /// Attach a forecast to the record with the same ticker.
    ///
    /// Returns `false` when the ticker is unknown or the record already holds
    /// a prediction for this cycle.
    pub fn attach_prediction(&mut self, prediction: Prediction) -> bool {
        match self.stocks.get_mut(&prediction.ticker) {
            Some(record) if record.prediction.is_none() => {
                record.prediction = Some(prediction);
                true
            }
            _ => false,
        }
    }
}

/// Access to the store shared between the loader and the view.
///
/// The browser wraps a reactive signal, the terminal client and tests use a
/// `RefCell`.
pub trait StoreHandle {
    fn apply(&self, f: impl FnOnce(&mut StockStore));

    fn read<R>(&self, f: impl FnOnce(&StockStore) -> R) -> R;
}

impl StoreHandle for RefCell<StockStore> {
    fn apply(&self, f: impl FnOnce(&mut StockStore)) {
        f(&mut self.borrow_mut());
    }

    fn read<R>(&self, f: impl FnOnce(&StockStore) -> R) -> R {
        f(&self.borrow())
    }
}

impl<S: StoreHandle> StoreHandle for Rc<S> {
    fn apply(&self, f: impl FnOnce(&mut StockStore)) {
        self.as_ref().apply(f);
    }

    fn read<R>(&self, f: impl FnOnce(&StockStore) -> R) -> R {
        self.as_ref().read(f)
    }
}
