use std::cell::RefCell;

use anyhow::{Context, Result};
use gpw_analyst_core::{derive_rows, RefreshSummary, StockStore};

use crate::cli::{TableArgs, ViewArgs};
use crate::config::ClientConfig;
use crate::render;
use crate::upstream::{self, HttpLoader};

pub async fn run(args: TableArgs) -> Result<()> {
    let config = ClientConfig::from(&args.connection);
    let loader = upstream::build_loader(&config)?;
    let store = RefCell::new(StockStore::new());

    let summary = load_cycle(&loader, &store).await?;
    print!("{}", render_view(&store.borrow(), &args.view, Some(&summary))?);
    Ok(())
}

/// Run one refresh cycle, attaching the upstream location to a failure.
pub(crate) async fn load_cycle(
    loader: &HttpLoader,
    store: &RefCell<StockStore>,
) -> Result<RefreshSummary> {
    loader
        .refresh(store)
        .await
        .with_context(|| format!("failed to load stocks from {}", loader.api().base_url()))
}

/// Table (or JSON) for the current store contents under the requested view.
pub(crate) fn render_view(
    store: &StockStore,
    view: &ViewArgs,
    summary: Option<&RefreshSummary>,
) -> Result<String> {
    let rows = derive_rows(&store.to_vec(), view.search_term(), view.sort());
    if view.json {
        let mut json = render::render_json(&rows).context("failed to serialise rows")?;
        json.push('\n');
        return Ok(json);
    }

    let mut out = render::render_table(&rows);
    out.push_str(&render::render_footer(store, rows.len(), summary));
    Ok(out)
}
