use std::cell::RefCell;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use gpw_analyst::config::ClientConfig;
use gpw_analyst::upstream::{HttpStockApi, TokioPause};
use gpw_analyst_core::{
    DataLoader, FetchError, LoadError, LoaderConfig, StockApi, StockStore,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

fn stocks_body() -> Value {
    json!([
        {
            "ticker": "A.WA",
            "name": "Alpha",
            "sector": "Energy",
            "price": 10.0,
            "pe": 8.0,
            "pbv": 1.1,
            "roe": 0.2,
            "div_yield": 0.05,
            "beta": 0.8
        },
        { "ticker": "B.WA", "name": "Beta", "price": null }
    ])
}

async fn stocks() -> Json<Value> {
    Json(stocks_body())
}

async fn predict(Path(ticker): Path<String>) -> Response {
    if ticker == "A.WA" {
        Json(json!({
            "ticker": "A.WA",
            "current_price": 10.0,
            "predicted_price": 10.5,
            "trend_pct": 5.0,
            "trend": "up",
            "forecast_days": 7
        }))
        .into_response()
    } else {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

async fn failing() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    addr
}

fn healthy_router() -> Router {
    Router::new()
        .route("/api/stocks", get(stocks))
        .route("/api/stock/:ticker/predict", get(predict))
}

fn loader(addr: SocketAddr) -> DataLoader<HttpStockApi, TokioPause> {
    let config = ClientConfig {
        base_url: format!("http://{addr}"),
        request_timeout: Duration::from_secs(5),
        prediction_delay: Duration::ZERO,
    };
    let api = HttpStockApi::new(&config).expect("api");
    DataLoader::with_config(
        api,
        TokioPause,
        LoaderConfig {
            prediction_delay: Duration::ZERO,
        },
    )
}

#[tokio::test]
async fn refresh_attaches_available_predictions() {
    let addr = serve(healthy_router()).await;
    let loader = loader(addr);
    let store = RefCell::new(StockStore::new());

    let summary = loader.refresh(&store).await.expect("refresh");
    assert_eq!(summary.requested, 2);
    assert_eq!(summary.attached, 1);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].ticker, "B.WA");
    assert_eq!(summary.failed[0].error, FetchError::Status(500));

    let store = store.borrow();
    let tickers: Vec<&str> = store.stocks().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["A.WA", "B.WA"]);
    assert_eq!(store.get("A.WA").and_then(|r| r.trend_pct()), Some(5.0));
    assert!(store.get("B.WA").is_some_and(|r| r.prediction.is_none()));
    assert!(!store.is_busy());
}

#[tokio::test]
async fn baseline_failure_surfaces_status() {
    let router = Router::new().route("/api/stocks", get(failing));
    let addr = serve(router).await;
    let loader = loader(addr);
    let store = RefCell::new(StockStore::new());

    let err = loader.refresh(&store).await.expect_err("baseline should fail");
    assert!(matches!(
        err,
        LoadError::BaselineFetchFailed(FetchError::Status(500))
    ));
    assert!(store.borrow().is_empty());
    assert!(!store.borrow().is_busy());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let router = Router::new().route("/api/stocks", get(|| async { "not json" }));
    let addr = serve(router).await;
    let loader = loader(addr);

    let err = loader.api().fetch_stocks().await.expect_err("decode");
    assert!(matches!(err, FetchError::Decode(_)));
}
