//! Navigation Shell
//!
//! Swaps panel fragments into the content region, remembers the last panel,
//! and hands freshly inserted fragments to their initializers.
//!
//! # Navigation sequence
//!
//! ```text
//! load_content(url, label)
//!   cancel previous navigation → loading indicator → GET url
//!     ├─ superseded  → nothing else touched
//!     ├─ failure     → error notice
//!     └─ success     → swap fragment → title + persist (if labelled)
//!                      → FragmentInserted → registry[url].initialize()
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::error::ShellError;
use crate::fetch::Fetcher;
use crate::model::NavigationState;
use crate::panels::{PanelContext, PanelRegistry};
use crate::storage::NavigationStore;
use crate::templates::{self, FragmentError, LoadingIndicator};
use crate::view::{View, CONTENT_AREA, SECTION_TITLE};

const EVENT_CAPACITY: usize = 64;

/// Lifecycle notifications published by the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    NavigationStarted { navigation_id: Uuid, url: String },
    /// The fragment is in the content region; published before the initializer runs
    FragmentInserted { navigation_id: Uuid, url: String },
    FragmentFailed { navigation_id: Uuid, url: String, reason: String },
    PanelInitialized { navigation_id: Uuid, url: String, panel: String },
    PanelFailed { navigation_id: Uuid, url: String, panel: String, error: String },
    Superseded { navigation_id: Uuid, url: String },
}

/// How a call to [`NavigationShell::load_content`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Fragment inserted; carries the initializer's error if it failed
    Loaded { panel_error: Option<String> },
    /// Fragment fetch failed and the error notice is showing
    FragmentFailed,
    /// A newer navigation took over before this one finished
    Superseded,
}

/// Content-swapping navigation for the admin panel
pub struct NavigationShell {
    view: Rc<dyn View>,
    fetcher: Rc<dyn Fetcher>,
    store: NavigationStore,
    registry: PanelRegistry,
    current: RefCell<Option<CancellationToken>>,
    events: broadcast::Sender<ShellEvent>,
}

impl NavigationShell {
    pub fn new(
        view: Rc<dyn View>,
        fetcher: Rc<dyn Fetcher>,
        store: NavigationStore,
        registry: PanelRegistry,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            view,
            fetcher,
            store,
            registry,
            current: RefCell::new(None),
            events,
        }
    }

    /// Receive [`ShellEvent`]s published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &NavigationStore {
        &self.store
    }

    fn emit(&self, event: ShellEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Start a navigation, cancelling the one in flight
    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.current.replace(Some(token.clone())) {
            previous.cancel();
        }
        token
    }

    fn superseded(&self, navigation_id: Uuid, url: &str) -> NavigationOutcome {
        tracing::debug!(%navigation_id, url, "Navigation superseded");
        self.emit(ShellEvent::Superseded {
            navigation_id,
            url: url.to_string(),
        });
        NavigationOutcome::Superseded
    }

    /// Fetch the fragment at `url` into the content region.
    ///
    /// A non-empty `label` becomes the section title and is persisted with
    /// `url` once the fragment is in place.
    pub async fn load_content(&self, url: &str, label: &str) -> NavigationOutcome {
        let navigation_id = Uuid::new_v4();
        let token = self.begin();

        tracing::info!(%navigation_id, url, label, "Loading panel");
        self.emit(ShellEvent::NavigationStarted {
            navigation_id,
            url: url.to_string(),
        });

        self.view
            .set_html(CONTENT_AREA, &templates::render(&LoadingIndicator));

        let response = match token.run_until_cancelled(self.fetcher.get(url)).await {
            Some(response) => response,
            None => return self.superseded(navigation_id, url),
        };

        let body = match response {
            Ok(response) if response.is_success() => response.body,
            Ok(response) => {
                return self.fail(navigation_id, url, format!("HTTP {}", response.status))
            }
            Err(e) => return self.fail(navigation_id, url, e.to_string()),
        };

        self.view.set_html(CONTENT_AREA, &body);

        if !label.is_empty() {
            self.view.set_text(SECTION_TITLE, label);
            if let Err(e) = self.store.save(&NavigationState::new(url, label)) {
                tracing::warn!(%navigation_id, error = %e, "Failed to persist navigation state");
            }
        }

        tracing::debug!(%navigation_id, url, bytes = body.len(), "Fragment inserted");
        self.emit(ShellEvent::FragmentInserted {
            navigation_id,
            url: url.to_string(),
        });

        let panel = match self.registry.get(url) {
            Some(panel) => panel,
            None => return NavigationOutcome::Loaded { panel_error: None },
        };

        let ctx = PanelContext {
            url,
            navigation_id,
            view: self.view.as_ref(),
            fetcher: self.fetcher.as_ref(),
            token: &token,
        };

        match panel.initialize(&ctx).await {
            Ok(()) => {
                self.emit(ShellEvent::PanelInitialized {
                    navigation_id,
                    url: url.to_string(),
                    panel: panel.name().to_string(),
                });
                NavigationOutcome::Loaded { panel_error: None }
            }
            Err(e) if e.is_superseded() => self.superseded(navigation_id, url),
            Err(e) => {
                tracing::warn!(%navigation_id, panel = panel.name(), error = %e, "Panel initializer failed");
                self.emit(ShellEvent::PanelFailed {
                    navigation_id,
                    url: url.to_string(),
                    panel: panel.name().to_string(),
                    error: e.to_string(),
                });
                NavigationOutcome::Loaded {
                    panel_error: Some(e.to_string()),
                }
            }
        }
    }

    fn fail(&self, navigation_id: Uuid, url: &str, reason: String) -> NavigationOutcome {
        let error = ShellError::FragmentLoad {
            url: url.to_string(),
            reason: reason.clone(),
        };
        tracing::warn!(%navigation_id, %error, "Fragment load failed");

        self.view
            .set_html(CONTENT_AREA, &templates::render(&FragmentError));
        self.emit(ShellEvent::FragmentFailed {
            navigation_id,
            url: url.to_string(),
            reason,
        });
        NavigationOutcome::FragmentFailed
    }

    /// Page load: reopen the persisted panel (home by default) and mark its
    /// sidebar entry active
    pub async fn restore(&self) -> NavigationOutcome {
        let state = self.store.load();

        let active = self
            .view
            .sidebar_entries()
            .iter()
            .position(|entry| entry.url == state.last_url);
        self.view.mark_active(active);

        self.load_content(&state.last_url, &state.last_label).await
    }

    /// Sidebar click on the entry at `index`; `None` if there is no such entry
    pub async fn select_entry(&self, index: usize) -> Option<NavigationOutcome> {
        let entry = self.view.sidebar_entries().get(index).cloned()?;

        self.view.mark_active(Some(index));
        Some(self.load_content(&entry.url, &entry.label()).await)
    }

    /// Sidebar click on the first entry whose label is `label`
    pub async fn select_label(&self, label: &str) -> Option<NavigationOutcome> {
        let index = self
            .view
            .sidebar_entries()
            .iter()
            .position(|entry| entry.label().eq_ignore_ascii_case(label.trim()))?;
        self.select_entry(index).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;
    use crate::error::ShellResult;
    use crate::fetch::{FetchError, FetchResponse};
    use crate::panels::PanelInitializer;
    use crate::storage::{MemoryStorage, StoragePort};
    use crate::testing::StubFetcher;
    use crate::view::{HeadlessDocument, SidebarEntry, CHART_SECTION};
    use async_trait::async_trait;
    use std::cell::Cell;

    const HOME_FRAGMENT: &str =
        r#"<h3>Overview</h3><div id="chart-section"></div><div id="activity-section"></div>"#;

    const DEBTORS_FRAGMENT: &str = r#"<canvas id="compare-chart-1"></canvas><canvas id="timeline-chart-1"></canvas>
<script id="client-data" type="application/json">[{"total_debt": 200, "total_paid": 150, "payments": [{"date": "2025-01-01", "amount": 150}]}]</script>"#;

    const SUMMARY: &str = r#"{"total_debt": 200, "total_paid": 150, "months": ["January"], "order_counts": [2],
        "top_clients_names": ["Kofi"], "top_clients_orders": [2], "recent_activities": []}"#;

    struct Harness {
        doc: Rc<HeadlessDocument>,
        fetcher: Rc<StubFetcher>,
        storage: Rc<MemoryStorage>,
        shell: NavigationShell,
    }

    fn harness_with(registry: impl FnOnce(&mut PanelRegistry)) -> Harness {
        let config = ShellConfig::default();
        let doc = Rc::new(HeadlessDocument::new(vec![
            SidebarEntry::new("/home", "  Dashboard\n"),
            SidebarEntry::new("/debtors", "Debtors"),
            SidebarEntry::new("/payments", "Payments"),
        ]));
        let fetcher = Rc::new(StubFetcher::new());
        let storage = Rc::new(MemoryStorage::new());

        let mut panels = PanelRegistry::with_defaults(&config);
        registry(&mut panels);

        let shell = NavigationShell::new(
            doc.clone(),
            fetcher.clone(),
            NavigationStore::new(storage.clone(), config.home_url.clone()),
            panels,
        );

        Harness {
            doc,
            fetcher,
            storage,
            shell,
        }
    }

    fn harness() -> Harness {
        harness_with(|_| {})
    }

    #[tokio::test]
    async fn test_load_with_label_persists() {
        let h = harness();
        h.fetcher.respond("/payments", 200, "<table>payments</table>");

        let outcome = h.shell.load_content("/payments", "Payments").await;

        assert_eq!(outcome, NavigationOutcome::Loaded { panel_error: None });
        assert_eq!(h.doc.html(CONTENT_AREA).unwrap(), "<table>payments</table>");
        assert_eq!(h.doc.title(), "Payments");
        assert_eq!(
            h.shell.store().peek().unwrap(),
            Some(NavigationState::new("/payments", "Payments"))
        );
    }

    #[tokio::test]
    async fn test_load_without_label_does_not_persist() {
        let h = harness();
        h.fetcher.respond("/payments", 200, "<table></table>");

        h.shell.load_content("/payments", "").await;

        assert_eq!(h.doc.title(), "");
        assert!(h.storage.is_empty());
    }

    #[tokio::test]
    async fn test_loading_indicator_while_in_flight() {
        let h = harness();
        let reply = h.fetcher.gate("/payments");

        let doc = h.doc.clone();
        let (outcome, ()) = tokio::join!(h.shell.load_content("/payments", "Payments"), async move {
            tokio::task::yield_now().await;
            assert!(doc.html(CONTENT_AREA).unwrap().contains("Loading..."));
            let _ = reply.send(Ok(FetchResponse::ok("<p>done</p>")));
        });

        assert_eq!(outcome, NavigationOutcome::Loaded { panel_error: None });
        assert_eq!(h.doc.html(CONTENT_AREA).unwrap(), "<p>done</p>");
    }

    #[tokio::test]
    async fn test_http_error_shows_notice() {
        let h = harness();
        h.storage.set("adminLastUrl", "/debtors").unwrap();
        h.fetcher.respond("/payments", 500, "<h1>Internal Server Error</h1>");

        let outcome = h.shell.load_content("/payments", "Payments").await;

        assert_eq!(outcome, NavigationOutcome::FragmentFailed);
        let html = h.doc.html(CONTENT_AREA).unwrap();
        assert!(html.contains("Failed to load content."));
        assert!(!html.contains("Loading..."));
        assert_eq!(h.storage.get("adminLastUrl").unwrap().as_deref(), Some("/debtors"));
    }

    #[tokio::test]
    async fn test_network_error_shows_notice() {
        let h = harness();
        h.fetcher.fail("/home", FetchError::Network("connection refused".into()));

        let outcome = h.shell.load_content("/home", "Dashboard").await;

        assert_eq!(outcome, NavigationOutcome::FragmentFailed);
        assert!(h.doc.html(CONTENT_AREA).unwrap().contains("Failed to load content."));
        // The dashboard initializer never ran
        assert_eq!(h.fetcher.requests(), vec!["/home"]);
    }

    #[tokio::test]
    async fn test_home_runs_dashboard() {
        let h = harness();
        h.fetcher
            .respond("/home", 200, HOME_FRAGMENT)
            .respond("/home/details", 200, SUMMARY);

        let outcome = h.shell.load_content("/home", "Dashboard").await;

        assert_eq!(outcome, NavigationOutcome::Loaded { panel_error: None });
        assert_eq!(h.fetcher.requests(), vec!["/home", "/home/details"]);
        assert_eq!(
            h.doc.chart("debtChart").unwrap().center_label.as_deref(),
            Some("75%")
        );
    }

    #[tokio::test]
    async fn test_dashboard_failure_is_reported() {
        let h = harness();
        h.fetcher
            .respond("/home", 200, HOME_FRAGMENT)
            .respond("/home/details", 500, r#"{"error":"db down"}"#);

        let outcome = h.shell.load_content("/home", "Dashboard").await;

        assert_eq!(
            outcome,
            NavigationOutcome::Loaded {
                panel_error: Some("db down".to_string())
            }
        );
        assert!(h.doc.html(CHART_SECTION).unwrap().contains("db down"));
    }

    #[tokio::test]
    async fn test_debtors_runs_chart_initializer() {
        let h = harness();
        h.fetcher.respond("/debtors", 200, DEBTORS_FRAGMENT);

        h.shell.load_content("/debtors", "Debtors").await;

        assert_eq!(h.doc.chart("compare-chart-1").unwrap().values(), &[150.0, 50.0]);
        assert!(h.doc.chart("timeline-chart-1").is_some());
        assert_eq!(h.fetcher.requests(), vec!["/debtors"]);
    }

    struct ProbePanel {
        doc: Rc<HeadlessDocument>,
        saw_fragment: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl PanelInitializer for ProbePanel {
        fn name(&self) -> &str {
            "probe"
        }

        async fn initialize(&self, _ctx: &PanelContext<'_>) -> ShellResult<()> {
            let html = self.doc.html(CONTENT_AREA).unwrap_or_default();
            self.saw_fragment.set(html.contains("probe-fragment"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_fragment_inserted_before_initializer() {
        let h = harness();
        let probe = Rc::new(ProbePanel {
            doc: h.doc.clone(),
            saw_fragment: Cell::new(false),
        });

        let mut registry = PanelRegistry::new();
        registry.register("/probe", probe.clone());
        let shell = NavigationShell::new(
            h.doc.clone(),
            h.fetcher.clone(),
            NavigationStore::new(h.storage.clone(), "/home"),
            registry,
        );
        let mut events = shell.subscribe();

        h.fetcher.respond("/probe", 200, "<div>probe-fragment</div>");
        shell.load_content("/probe", "Probe").await;

        assert!(probe.saw_fragment.get());

        let started = events.recv().await.unwrap();
        let inserted = events.recv().await.unwrap();
        let initialized = events.recv().await.unwrap();
        assert!(matches!(started, ShellEvent::NavigationStarted { .. }));
        assert!(matches!(inserted, ShellEvent::FragmentInserted { ref url, .. } if url == "/probe"));
        assert!(matches!(initialized, ShellEvent::PanelInitialized { ref panel, .. } if panel == "probe"));
    }

    #[tokio::test]
    async fn test_restore_defaults_to_home() {
        let h = harness();
        h.fetcher
            .respond("/home", 200, "<p>home</p>")
            .respond("/home/details", 200, SUMMARY);

        h.shell.restore().await;

        assert_eq!(h.fetcher.requests()[0], "/home");
        assert_eq!(h.doc.active_entries(), vec![0]);
        // Unlabelled restore does not write state
        assert!(h.storage.is_empty());
    }

    #[tokio::test]
    async fn test_restore_reopens_last_panel() {
        let h = harness();
        h.fetcher.respond("/payments", 200, "<p>payments</p>");
        h.shell.load_content("/payments", "Payments").await;

        // Page reload: fresh view and shell over the same storage
        let doc = Rc::new(HeadlessDocument::new(h.doc.sidebar_entries()));
        let shell = NavigationShell::new(
            doc.clone(),
            h.fetcher.clone(),
            NavigationStore::new(h.storage.clone(), "/home"),
            PanelRegistry::new(),
        );

        shell.restore().await;

        assert_eq!(doc.html(CONTENT_AREA).unwrap(), "<p>payments</p>");
        assert_eq!(doc.title(), "Payments");
        assert_eq!(doc.active_entries(), vec![2]);
    }

    #[tokio::test]
    async fn test_select_entry_marks_exactly_one_active() {
        let h = harness();
        h.fetcher
            .respond("/debtors", 200, "<p>none</p>")
            .respond("/payments", 200, "<p>payments</p>");

        h.shell.select_entry(1).await.unwrap();
        assert_eq!(h.doc.active_entries(), vec![1]);

        h.shell.select_entry(2).await.unwrap();
        assert_eq!(h.doc.active_entries(), vec![2]);
        assert_eq!(h.doc.title(), "Payments");

        assert!(h.shell.select_entry(7).await.is_none());
        assert_eq!(h.doc.active_entries(), vec![2]);
    }

    #[tokio::test]
    async fn test_select_entry_trims_label() {
        let h = harness();
        h.fetcher
            .respond("/home", 200, "<p>disabled</p>")
            .respond("/home/details", 200, SUMMARY);

        h.shell.select_label("dashboard").await.unwrap();

        assert_eq!(h.doc.title(), "Dashboard");
        assert_eq!(
            h.shell.store().load(),
            NavigationState::new("/home", "Dashboard")
        );
    }

    #[tokio::test]
    async fn test_superseded_fetch_does_not_touch_view() {
        let h = harness();
        let slow = h.fetcher.gate("/debtors");
        h.fetcher.respond("/payments", 200, "<p>payments</p>");

        let (first, second) = tokio::join!(h.shell.load_content("/debtors", "Debtors"), async {
            tokio::task::yield_now().await;
            let outcome = h.shell.load_content("/payments", "Payments").await;
            let _ = slow.send(Ok(FetchResponse::ok(DEBTORS_FRAGMENT)));
            outcome
        });

        assert_eq!(first, NavigationOutcome::Superseded);
        assert_eq!(second, NavigationOutcome::Loaded { panel_error: None });
        assert_eq!(h.doc.html(CONTENT_AREA).unwrap(), "<p>payments</p>");
        assert_eq!(h.doc.title(), "Payments");
        assert_eq!(
            h.shell.store().load(),
            NavigationState::new("/payments", "Payments")
        );
    }

    #[tokio::test]
    async fn test_superseded_dashboard_does_not_render() {
        let h = harness();
        h.fetcher.respond("/home", 200, HOME_FRAGMENT);
        let details = h.fetcher.gate("/home/details");
        h.fetcher.respond("/payments", 200, HOME_FRAGMENT);

        let (first, second) = tokio::join!(h.shell.load_content("/home", "Dashboard"), async {
            tokio::task::yield_now().await;
            let outcome = h.shell.load_content("/payments", "Payments").await;
            let _ = details.send(Ok(FetchResponse::ok(SUMMARY)));
            outcome
        });

        assert_eq!(first, NavigationOutcome::Superseded);
        assert_eq!(second, NavigationOutcome::Loaded { panel_error: None });
        // The payments fragment happens to carry the same regions; they stay empty
        assert_eq!(h.doc.html(CHART_SECTION), None);
        assert!(h.doc.charts().is_empty());
    }
}
