use std::cell::RefCell;
use std::time::Duration;

use anyhow::Result;
use gpw_analyst_core::StockStore;
use tokio::signal;

use crate::cli::WatchArgs;
use crate::config::ClientConfig;
use crate::snapshot::{load_cycle, render_view};
use crate::upstream;

pub async fn run(args: WatchArgs) -> Result<()> {
    let config = ClientConfig::from(&args.connection);
    let loader = upstream::build_loader(&config)?;
    let store = RefCell::new(StockStore::new());
    let interval = Duration::from_secs(args.interval_secs.max(1));

    log::info!(
        target: "watch.start",
        interval_secs = interval.as_secs();
        "watching {}", loader.api().base_url()
    );

    loop {
        // Ctrl-C drops the cycle future; the loader clears its flags on drop.
        let outcome = tokio::select! {
            outcome = load_cycle(&loader, &store) => outcome,
            _ = signal::ctrl_c() => break,
        };

        match outcome {
            Ok(summary) => {
                print!("{}", render_view(&store.borrow(), &args.view, Some(&summary))?);
            }
            Err(err) => {
                log::error!(target: "watch.cycle", "{err:#}");
                if !store.borrow().is_empty() {
                    print!("{}", render_view(&store.borrow(), &args.view, None)?);
                }
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = signal::ctrl_c() => break,
        }
    }

    log::info!(target: "watch.stop", "watch interrupted");
    Ok(())
}
