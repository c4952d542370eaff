//! App Root Component
//!
//! Sidebar and content layout, plus the shell that fills the content area.

use std::rc::Rc;

use admin_shell::{
    NavigationShell, NavigationStore, PanelRegistry, ShellConfig, CONTENT_AREA, SECTION_TITLE,
};
use leptos::*;

use crate::api::GlooFetcher;
use crate::components::Sidebar;
use crate::dom::DomView;
use crate::storage::{get_base_url, LocalStorage};

fn build_shell(config: &ShellConfig) -> Option<NavigationShell> {
    let view = Rc::new(DomView::from_window()?);
    let fetcher = Rc::new(GlooFetcher::new(get_base_url()));
    let store = NavigationStore::new(Rc::new(LocalStorage), config.home_url.clone());

    Some(NavigationShell::new(
        view,
        fetcher,
        store,
        PanelRegistry::with_defaults(config),
    ))
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let config = ShellConfig::default();

    let Some(shell) = build_shell(&config) else {
        web_sys::console::error_1(&"Admin shell needs a browser document".into());
        return view! { <p>"Admin shell needs a browser document"</p> }.into_view();
    };
    let shell = store_value(Rc::new(shell));

    // Runs once, after the layout is in the document
    create_effect(move |_| {
        let shell = shell.get_value();
        spawn_local(async move {
            shell.restore().await;
        });
    });

    view! {
        <div class="d-flex">
            <Sidebar links=config.sidebar.clone() shell=shell />

            <main class="flex-grow-1 p-4">
                <h2 id=SECTION_TITLE class="mb-4">"Dashboard"</h2>
                <div id=CONTENT_AREA></div>
            </main>
        </div>
    }
    .into_view()
}
