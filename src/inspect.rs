use anyhow::{Context, Result};
use gpw_analyst_core::StockApi;

use crate::cli::InspectArgs;
use crate::config::ClientConfig;
use crate::render;
use crate::upstream::HttpStockApi;

pub async fn run(args: InspectArgs) -> Result<()> {
    let config = ClientConfig::from(&args.connection);
    let api = HttpStockApi::new(&config)?;

    let stocks = api
        .fetch_stocks()
        .await
        .with_context(|| format!("failed to load stocks from {}", api.base_url()))?;
    let mut record = stocks
        .into_iter()
        .find(|record| record.ticker.eq_ignore_ascii_case(&args.ticker))
        .with_context(|| format!("ticker {} is not served by the upstream", args.ticker))?;

    match api.fetch_prediction(&record.ticker).await {
        Ok(prediction) if prediction.ticker == record.ticker => record.prediction = Some(prediction),
        Ok(prediction) => log::warn!(
            target: "inspect.prediction",
            ticker = record.ticker.as_str();
            "ignoring prediction returned for {}", prediction.ticker
        ),
        Err(err) => log::warn!(
            target: "inspect.prediction",
            ticker = record.ticker.as_str();
            "prediction unavailable: {err}"
        ),
    }

    print!("{}", render::render_detail(&record));
    Ok(())
}
