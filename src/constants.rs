pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const BASE_URL_ENV: &str = "GPW_API_URL";
pub const PREDICTION_DELAY_MS: u64 = 300;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const WATCH_INTERVAL_SECS: u64 = 300;
