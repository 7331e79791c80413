use std::rc::Rc;

use gpw_analyst_core::{SortState, StockRecord, StockStore, StoreHandle, derive_rows};
use leptos::*;

use crate::api::{BrowserLoader, GlooPause, GlooStockApi};

use super::{header::Header, search::SearchBar, stock_table::StockTable};

/// Store signal handed to the loader and read by the views.
#[derive(Clone, Copy)]
pub struct StockStoreSignal(pub RwSignal<StockStore>);

impl StoreHandle for StockStoreSignal {
    fn apply(&self, f: impl FnOnce(&mut StockStore)) {
        self.0.update(f);
    }

    fn read<R>(&self, f: impl FnOnce(&StockStore) -> R) -> R {
        self.0.with_untracked(f)
    }
}

#[derive(Clone, Copy)]
pub struct SearchSignal(pub RwSignal<String>);

#[derive(Clone, Copy)]
pub struct SortSignal(pub RwSignal<SortState>);

/// Rows after search and sort, recomputed whenever an input changes.
#[derive(Clone, Copy)]
pub struct VisibleRows(pub Memo<Vec<StockRecord>>);

#[derive(Clone, Copy)]
pub struct RefreshTrigger(pub Callback<()>);

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy)]
pub struct ThemeSignal(pub RwSignal<Theme>);

/// Top-level dashboard wrapper providing shared application state via context.
#[component]
pub fn Dashboard() -> impl IntoView {
    let store = StockStoreSignal(create_rw_signal(StockStore::new()));
    let search = create_rw_signal(String::new());
    let sort = create_rw_signal(SortState::default());
    let theme = create_rw_signal(Theme::Dark);

    let visible = create_memo(move |_| {
        let order = sort.get().active();
        search.with(|term| store.0.with(|state| derive_rows(&state.to_vec(), term, order)))
    });

    let loader = Rc::new(BrowserLoader::new(GlooStockApi::same_origin(), GlooPause));
    let refresh = Callback::new(move |()| start_refresh(Rc::clone(&loader), store));

    #[cfg(target_arch = "wasm32")]
    {
        leptos::create_effect(move |_| refresh.call(()));

        let theme_signal = theme;
        leptos::create_effect(move |_| {
            let theme = theme_signal.get();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                if let Some(element) = document.document_element() {
                    let _ = element.set_attribute("data-theme", theme.as_str());
                }
            }
        });
    }

    provide_context(store);
    provide_context(SearchSignal(search));
    provide_context(SortSignal(sort));
    provide_context(VisibleRows(visible));
    provide_context(RefreshTrigger(refresh));
    provide_context(ThemeSignal(theme));

    view! {
        <div class="dashboard">
            <Header />
            <section class="dashboard__body">
                <SearchBar />
                <StockTable />
            </section>
        </div>
    }
}

fn start_refresh(loader: Rc<BrowserLoader>, store: StockStoreSignal) {
    spawn_local(async move {
        match loader.refresh(&store).await {
            Ok(summary) => log::info!(
                target: "dashboard.refresh",
                attached = summary.attached,
                failed = summary.failed.len();
                "refresh finished"
            ),
            Err(err) => log::warn!(target: "dashboard.refresh", "{err}"),
        }
    });
}
