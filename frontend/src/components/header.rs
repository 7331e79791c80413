use std::str::FromStr;

use gpw_analyst_core::StockStore;
use leptos::event_target_value;
use leptos::{ev, *};

use crate::view_model::status_badges;

use super::dashboard::{RefreshTrigger, StockStoreSignal, Theme, ThemeSignal};

#[component]
pub fn Header() -> impl IntoView {
    let store = use_context::<StockStoreSignal>().expect("stock store context missing");
    let refresh = use_context::<RefreshTrigger>().expect("refresh context missing");
    let theme_signal = use_context::<ThemeSignal>().expect("theme signal context missing");

    let badges = create_memo(move |_| store.0.with(status_badges));
    let busy = move || store.0.with(StockStore::is_busy);
    let total = move || store.0.with(StockStore::len);

    let theme_select_value = move || theme_signal.0.get().as_str().to_string();

    let on_theme_change = {
        let theme = theme_signal;
        move |ev: ev::Event| {
            let value = event_target_value(&ev);
            if let Ok(theme_value) = Theme::from_str(&value) {
                theme.0.set(theme_value);
            }
        }
    };

    view! {
        <header class="dashboard__header">
            <div class="dashboard__title">
                <h1>"GPW Analyst"</h1>
                <p>"Warsaw Stock Exchange fundamentals with AI price forecasts."</p>
            </div>
            <div class="dashboard__status">
                <For
                    each=move || badges.get()
                    key=|badge| badge.clone()
                    children=move |(class, label)| {
                        view! { <span class=format!("status-badge {class}")>{label}</span> }
                    }
                />
                <span class="dashboard__total">{move || format!("{} companies", total())}</span>
            </div>
            <div class="dashboard__actions">
                <button
                    class="refresh-button"
                    disabled=busy
                    on:click=move |_| refresh.0.call(())
                >
                    {move || if busy() { "Refreshing…" } else { "Refresh" }}
                </button>
                <label class="dashboard__theme">
                    <span>"Theme"</span>
                    <select class="theme-select" on:change=on_theme_change prop:value=theme_select_value>
                        <For
                            each=move || Theme::ALL.into_iter()
                            key=|theme| theme.as_str()
                            children=move |theme: Theme| {
                                view! {
                                    <option value=theme.as_str()>{theme.label()}</option>
                                }
                            }
                        />
                    </select>
                </label>
            </div>
        </header>
    }
}
