//! Dashboard panel
//!
//! Fetches the summary behind the home panel and fills its chart and
//! activity regions.

use async_trait::async_trait;
use serde::Deserialize;

use super::{PanelContext, PanelInitializer};
use crate::chart::ChartSpec;
use crate::error::{ShellError, ShellResult};
use crate::model::DashboardSummary;
use crate::templates::{
    self, ActivityList, ChartSection, LoadFailed, DEBT_CHART_ID, ORDERS_CHART_ID,
    TOP_CLIENTS_CHART_ID,
};
use crate::view::{ACTIVITY_SECTION, CHART_SECTION};

/// Message shown when an error response carries no usable message
pub const DEFAULT_ERROR_MESSAGE: &str = "Failed to fetch dashboard data.";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Initializer registered for the home panel
pub struct DashboardPanel {
    details_url: String,
}

impl DashboardPanel {
    pub fn new(details_url: impl Into<String>) -> Self {
        Self {
            details_url: details_url.into(),
        }
    }
}

#[async_trait(?Send)]
impl PanelInitializer for DashboardPanel {
    fn name(&self) -> &str {
        "dashboard"
    }

    async fn initialize(&self, ctx: &PanelContext<'_>) -> ShellResult<()> {
        init_dashboard(ctx, &self.details_url).await
    }
}

/// Fetch the dashboard summary from `details_url` and render it.
///
/// On failure both regions are replaced with the failure message and the
/// error is returned; a superseded navigation leaves the view untouched.
pub async fn init_dashboard(ctx: &PanelContext<'_>, details_url: &str) -> ShellResult<()> {
    if !ctx.contains(CHART_SECTION) && !ctx.contains(ACTIVITY_SECTION) {
        tracing::debug!(url = %ctx.url, "Dashboard regions absent, nothing to initialize");
        return Ok(());
    }

    let result = match fetch_summary(ctx, details_url).await {
        Ok(summary) => render_summary(ctx, &summary),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_superseded() => Err(e),
        Err(e) => {
            tracing::error!(
                navigation_id = %ctx.navigation_id,
                error = %e,
                "Dashboard error"
            );
            let message = e.to_string();
            ctx.set_html(
                CHART_SECTION,
                &templates::render(&LoadFailed {
                    what: "Chart",
                    message: &message,
                }),
            )?;
            ctx.set_html(
                ACTIVITY_SECTION,
                &templates::render(&LoadFailed {
                    what: "Activity",
                    message: &message,
                }),
            )?;
            Err(e)
        }
    }
}

async fn fetch_summary(ctx: &PanelContext<'_>, details_url: &str) -> ShellResult<DashboardSummary> {
    let response = ctx.fetch(details_url).await?;

    if !response.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.error)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
        return Err(ShellError::DataLoad(message));
    }

    let summary: DashboardSummary = serde_json::from_str(&response.body)
        .map_err(|e| ShellError::DataLoad(format!("Invalid dashboard data: {}", e)))?;
    summary.validate()?;
    Ok(summary)
}

fn render_summary(ctx: &PanelContext<'_>, summary: &DashboardSummary) -> ShellResult<()> {
    ctx.set_html(
        CHART_SECTION,
        &templates::render(&ChartSection::for_summary(summary)),
    )?;

    ctx.draw_chart(ORDERS_CHART_ID, &ChartSpec::monthly_orders(summary))?;
    ctx.draw_chart(TOP_CLIENTS_CHART_ID, &ChartSpec::top_clients(summary))?;
    ctx.draw_chart(DEBT_CHART_ID, &ChartSpec::collection_rate(summary))?;

    ctx.set_html(
        ACTIVITY_SECTION,
        &templates::render(&ActivityList::new(&summary.recent_activities)),
    )?;

    tracing::debug!(
        navigation_id = %ctx.navigation_id,
        percentage = summary.collection_percentage(),
        activities = summary.recent_activities.len(),
        "Dashboard rendered"
    );
    Ok(())
}
