use leptos::*;
use leptos_meta::{Title, provide_meta_context};
use wasm_bindgen::prelude::wasm_bindgen;

mod api;
mod components;
mod logging;
pub mod view_model;

pub use api::{BrowserLoader, GlooPause, GlooStockApi};
pub use components::dashboard::{Dashboard, StockStoreSignal};
pub use logging::init_logging;

/// Root component bootstrapping the dashboard.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="GPW Analyst" />
        <main class="app-root">
            <Dashboard />
        </main>
    }
}

/// WASM entry point called automatically by `trunk`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), wasm_bindgen::JsValue> {
    init_logging();
    console_error_panic_hook::set_once();

    leptos::mount_to_body(|| view! { <App /> });
    Ok(())
}
