//! Admin Dashboard
//!
//! Browser host for the admin shell, built with Leptos (WASM).
//!
//! # Architecture
//!
//! Client-side rendered Leptos app. Leptos renders the static layout (sidebar,
//! section title, content area); the [`admin_shell::NavigationShell`] owns
//! everything inside the content area, talking to the page through
//! [`dom::DomView`] and to the backend through [`api::GlooFetcher`].

use leptos::*;

mod api;
mod app;
mod components;
mod dom;
mod storage;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
