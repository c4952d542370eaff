//! # Admin Shell
//!
//! Navigation shell and panel initializers for the debt/order admin
//! dashboard: swaps server-rendered panel fragments into the page, remembers
//! the last panel, and draws the dashboard and debtor charts.
//!
//! ## Features
//!
//! - **Fragment navigation**: loading indicator, error notice, per-navigation
//!   cancellation so a superseded request never touches the page
//! - **Panel registry**: initializers keyed by exact panel URL, run right after
//!   the fragment is inserted
//! - **Dashboard**: orders, top clients and collection rate charts plus the
//!   recent activity feed
//! - **Debtors**: per-client paid vs remaining and payment timeline charts from
//!   embedded JSON
//!
//! ## Modules
//!
//! - [`shell`]: the navigation shell
//! - [`panels`]: panel initializers and their registry
//! - [`view`]: DOM contract and the in-memory [`HeadlessDocument`]
//! - [`storage`]: persisted navigation state
//! - [`fetch`]: HTTP port
//! - [`chart`]: chart descriptions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use std::time::Duration;
//! use admin_shell::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let view = Rc::new(HeadlessDocument::new(config.shell.sidebar_entries()));
//!     let fetcher = Rc::new(HttpFetcher::new(&config.shell.base_url, Duration::from_secs(30))?);
//!     let store = NavigationStore::new(Rc::new(MemoryStorage::new()), config.shell.home_url.clone());
//!
//!     let shell = NavigationShell::new(
//!         view.clone(),
//!         fetcher,
//!         store,
//!         PanelRegistry::with_defaults(&config.shell),
//!     );
//!
//!     shell.restore().await;
//!     println!("{}", view.html(CONTENT_AREA).unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod chart;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod panels;
pub mod shell;
pub mod storage;
pub mod templates;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use cancel::CancellationToken;

pub use chart::{ChartKind, ChartSpec, Dataset};

pub use config::{Config, ConfigError, LoggingConfig, ShellConfig, SidebarLink, StorageConfig};

pub use error::{ShellError, ShellResult};

pub use fetch::{FetchError, FetchResponse, Fetcher};

#[cfg(feature = "native")]
pub use fetch::HttpFetcher;

pub use model::{
    collection_percentage, Activity, ClientDebtRecord, DashboardSummary, NavigationState, Payment,
};

pub use panels::{
    init_dashboard, render_debtor_charts, DashboardPanel, DebtorChartsPanel, PanelContext,
    PanelInitializer, PanelRegistry,
};

pub use shell::{NavigationOutcome, NavigationShell, ShellEvent};

pub use storage::{FileStorage, MemoryStorage, NavigationStore, StoragePort};

pub use view::{
    HeadlessDocument, SidebarEntry, View, ACTIVITY_SECTION, CHART_SECTION, CONTENT_AREA,
    SECTION_TITLE,
};
