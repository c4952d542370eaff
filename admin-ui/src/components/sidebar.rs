//! Sidebar Component
//!
//! Navigation links rendered from the configured sidebar. Clicks go to the
//! shell instead of the browser; the shell toggles the active class itself.

use std::rc::Rc;

use admin_shell::{NavigationShell, SidebarLink};
use leptos::*;

/// Sidebar with one link per configured panel
#[component]
pub fn Sidebar(links: Vec<SidebarLink>, shell: StoredValue<Rc<NavigationShell>>) -> impl IntoView {
    view! {
        <nav class="d-flex flex-column p-3 bg-dark min-vh-100" style="width: 240px">
            <span class="fs-5 fw-bold text-white mb-4">"Admin Panel"</span>
            <ul class="nav nav-pills flex-column gap-1">
                {links
                    .into_iter()
                    .enumerate()
                    .map(|(index, link)| view! { <NavLink index=index link=link shell=shell /> })
                    .collect_view()}
            </ul>
        </nav>
    }
}

/// Individual sidebar link
#[component]
fn NavLink(
    index: usize,
    link: SidebarLink,
    shell: StoredValue<Rc<NavigationShell>>,
) -> impl IntoView {
    let on_click = move |ev: ev::MouseEvent| {
        ev.prevent_default();

        let shell = shell.get_value();
        spawn_local(async move {
            shell.select_entry(index).await;
        });
    };

    view! {
        <li class="nav-item">
            <a
                href=link.url.clone()
                data-url=link.url
                class="nav-link text-white sidebar-link"
                on:click=on_click
            >
                {link.label}
            </a>
        </li>
    }
}
