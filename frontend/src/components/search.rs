use leptos::{ev, event_target_value, *};

use crate::view_model::found_label;

use super::dashboard::{SearchSignal, VisibleRows};

#[component]
pub fn SearchBar() -> impl IntoView {
    let search = use_context::<SearchSignal>().expect("search context missing");
    let rows = use_context::<VisibleRows>().expect("visible rows context missing");

    view! {
        <div class="search-bar">
            <input
                type="search"
                class="search-bar__input"
                placeholder="Search by company, ticker or sector"
                prop:value=move || search.0.get()
                on:input=move |ev: ev::Event| search.0.set(event_target_value(&ev))
            />
            <Show when=move || search.0.with(|term| !term.trim().is_empty())>
                <span class="search-bar__count">
                    {move || rows.0.with(|rows| found_label(rows.len()))}
                </span>
            </Show>
            <button
                class="search-bar__clear"
                on:click=move |_| search.0.set(String::new())
            >
                "Clear"
            </button>
        </div>
    }
}
