use gpw_analyst_core::metrics::{
    DebtRisk, NOT_AVAILABLE, Signal, UNKNOWN, format_decimal, format_fraction_pct,
    format_leverage, format_market_cap, format_pe, format_signed_pct, net_debt_to_ebitda,
    recommendation_label, roe_is_healthy, sector_margin_comparison, sector_pe_comparison,
};
use gpw_analyst_core::{QualityTier, StockRecord, StockStore, quality_score};
use leptos::*;

use crate::view_model::{
    COLUMNS, relative_class, risk_class, row_key, signal_class, sort_indicator, tier_class,
    trend_class,
};

use super::dashboard::{SortSignal, StockStoreSignal, VisibleRows};

const COLUMN_COUNT: usize = COLUMNS.len() + 1;

#[component]
pub fn StockTable() -> impl IntoView {
    let store = use_context::<StockStoreSignal>().expect("stock store context missing");
    let sort = use_context::<SortSignal>().expect("sort context missing");
    let rows = use_context::<VisibleRows>().expect("visible rows context missing");

    let baseline_loading = move || store.0.with(StockStore::is_baseline_loading);
    let has_stocks = move || store.0.with(|state| !state.is_empty());

    view! {
        <section class="stock-table">
            <Show when=baseline_loading>
                <div class="stock-table__overlay">
                    <span class="spinner"></span>
                    <span>"Loading market data…"</span>
                </div>
            </Show>
            <Show
                when=has_stocks
                fallback=move || view! {
                    <p class="stock-table__empty">"No market data loaded yet."</p>
                }
            >
                <table>
                    <thead>
                        <tr>
                            {header_cells(sort)}
                            <th>"ND/EBITDA"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <Show
                            when=move || rows.0.with(|rows| !rows.is_empty())
                            fallback=|| view! {
                                <tr class="stock-table__no-match">
                                    <td colspan=COLUMN_COUNT.to_string()>"No companies match your search."</td>
                                </tr>
                            }
                        >
                            <For
                                each=move || rows.0.get()
                                key=row_key
                                children=move |record: StockRecord| view! { <StockRow record=record /> }
                            />
                        </Show>
                    </tbody>
                </table>
            </Show>
        </section>
    }
}

fn header_cells(sort: SortSignal) -> View {
    COLUMNS
        .into_iter()
        .map(|(key, label)| {
            view! {
                <th
                    class="stock-table__sortable"
                    on:click=move |_| sort.0.update(|state| state.toggle(key))
                >
                    {label}
                    <span class="stock-table__indicator">
                        {move || sort.0.with(|state| sort_indicator(state, key))}
                    </span>
                </th>
            }
        })
        .collect_view()
}

#[component]
fn StockRow(record: StockRecord) -> impl IntoView {
    let score = quality_score(&record);
    let tier = QualityTier::from_score(score);
    let signal = Signal::classify(record.recommendation.as_deref());
    let leverage = net_debt_to_ebitda(&record);

    let pe_class = sector_pe_comparison(&record)
        .map(|(relative, _)| relative_class(relative))
        .unwrap_or_default();
    let pe_title = format!("Sector P/E: {}", format_decimal(record.sector_pe_avg, 1));
    let margin_class = sector_margin_comparison(&record)
        .map(|(relative, _)| relative_class(relative))
        .unwrap_or_default();
    let margin_title = format!(
        "Sector margin: {}",
        format_fraction_pct(record.sector_margin_avg)
    );
    let roe_class = match record.roe {
        Some(_) if roe_is_healthy(&record) => "roe--healthy",
        Some(_) => "roe--weak",
        None => "",
    };
    let signal_label = match (record.recommendation.as_deref(), signal) {
        (Some(raw), Some(_)) => recommendation_label(raw),
        _ => UNKNOWN.to_string(),
    };
    let leverage_class = leverage
        .map(|ratio| risk_class(DebtRisk::from_ratio(ratio)))
        .unwrap_or_default();

    let forecast = match &record.prediction {
        Some(prediction) => view! {
            <span class=format!("forecast {}", trend_class(prediction.trend))>
                {format!("{:.2}", prediction.predicted_price)}
                <small>{format_signed_pct(prediction.trend_pct)}</small>
            </span>
        }
        .into_view(),
        None => view! { <span class="forecast forecast--pending">{UNKNOWN}</span> }.into_view(),
    };

    view! {
        <tr>
            <td class="stock-table__ticker">{record.ticker.clone()}</td>
            <td>
                <span class="stock-table__name">{record.name.clone()}</span>
                <small class="stock-table__sector">
                    {record.sector.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())}
                </small>
            </td>
            <td>{format_decimal(record.price, 2)}</td>
            <td>{format_market_cap(record.market_cap)}</td>
            <td class=pe_class title=pe_title>{format_pe(record.pe)}</td>
            <td>{format_decimal(record.pbv, 2)}</td>
            <td class=roe_class>{format_fraction_pct(record.roe)}</td>
            <td class=margin_class title=margin_title>{format_fraction_pct(record.operating_margin)}</td>
            <td class=format!("signal {}", signal_class(signal))>{signal_label}</td>
            <td>{forecast}</td>
            <td class=format!("quality {}", tier_class(tier))>{format!("{score}/100")}</td>
            <td class=leverage_class>{format_leverage(leverage)}</td>
        </tr>
    }
}
