//! Panel Initializers
//!
//! Routines that bring a freshly inserted fragment to life. The shell looks
//! up the initializer for a URL in a [`PanelRegistry`] (exact match) right
//! after the fragment swap and awaits it.
//!
//! - **dashboard**: `/home`, fetches the summary and draws charts + activity feed
//! - **debtors**: `/debtors`, draws per-client charts from embedded JSON

pub mod dashboard;
pub mod debtors;

pub use dashboard::{init_dashboard, DashboardPanel};
pub use debtors::{render_debtor_charts, DebtorChartsPanel, DebtorChartsRendered};

use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::chart::ChartSpec;
use crate::config::ShellConfig;
use crate::error::{ShellError, ShellResult};
use crate::fetch::{FetchResponse, Fetcher};
use crate::view::View;

/// Everything an initializer may touch for one navigation.
///
/// View writes go through the context and are dropped once the navigation
/// has been superseded.
pub struct PanelContext<'a> {
    pub url: &'a str,
    pub navigation_id: Uuid,
    pub view: &'a dyn View,
    pub fetcher: &'a dyn Fetcher,
    pub token: &'a CancellationToken,
}

impl<'a> PanelContext<'a> {
    fn superseded(&self) -> ShellError {
        ShellError::Superseded(self.url.to_string())
    }

    /// Fail with [`ShellError::Superseded`] once the navigation is cancelled
    pub fn ensure_current(&self) -> ShellResult<()> {
        if self.token.is_cancelled() {
            Err(self.superseded())
        } else {
            Ok(())
        }
    }

    /// GET `url`, abandoning the request if the navigation is superseded
    pub async fn fetch(&self, url: &str) -> ShellResult<FetchResponse> {
        match self.token.run_until_cancelled(self.fetcher.get(url)).await {
            Some(Ok(response)) => Ok(response),
            Some(Err(e)) => Err(ShellError::DataLoad(e.to_string())),
            None => Err(self.superseded()),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.view.contains(id)
    }

    pub fn text_content(&self, id: &str) -> Option<String> {
        self.view.text_content(id)
    }

    pub fn set_html(&self, id: &str, html: &str) -> ShellResult<bool> {
        self.ensure_current()?;
        Ok(self.view.set_html(id, html))
    }

    pub fn draw_chart(&self, id: &str, chart: &ChartSpec) -> ShellResult<bool> {
        self.ensure_current()?;
        Ok(self.view.draw_chart(id, chart))
    }
}

/// Post-insertion hook for one panel
#[async_trait(?Send)]
pub trait PanelInitializer {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Run after the panel's fragment has been inserted
    async fn initialize(&self, ctx: &PanelContext<'_>) -> ShellResult<()>;
}

/// Maps panel URLs to their initializers
#[derive(Default, Clone)]
pub struct PanelRegistry {
    panels: HashMap<String, Rc<dyn PanelInitializer>>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the dashboard and debtors panels wired to `config`
    pub fn with_defaults(config: &ShellConfig) -> Self {
        let mut registry = Self::new();
        registry.register(
            config.home_url.clone(),
            Rc::new(DashboardPanel::new(config.details_url.clone())),
        );
        registry.register(
            config.debtors_url.clone(),
            Rc::new(DebtorChartsPanel::new(config.client_data_id.clone())),
        );
        registry
    }

    /// Register `initializer` for `url`, replacing any previous one
    pub fn register(&mut self, url: impl Into<String>, initializer: Rc<dyn PanelInitializer>) {
        self.panels.insert(url.into(), initializer);
    }

    /// Initializer for exactly `url`
    pub fn get(&self, url: &str) -> Option<Rc<dyn PanelInitializer>> {
        self.panels.get(url).cloned()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_exact_match() {
        let registry = PanelRegistry::with_defaults(&ShellConfig::default());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("/home").unwrap().name(), "dashboard");
        assert_eq!(registry.get("/debtors").unwrap().name(), "debtors");
        assert!(registry.get("/home/").is_none());
        assert!(registry.get("/home/details").is_none());
        assert!(registry.get("/payments").is_none());
    }
}
