//! Debtors panel
//!
//! Draws per-client charts from the JSON the backend embeds in the debtors
//! fragment. No network round trip.

use async_trait::async_trait;

use super::{PanelContext, PanelInitializer};
use crate::chart::ChartSpec;
use crate::error::{ShellError, ShellResult};
use crate::model::ClientDebtRecord;
use crate::view::{compare_chart_id, timeline_chart_id, View};

/// Counts of the charts drawn by [`render_debtor_charts`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebtorChartsRendered {
    pub clients: usize,
    pub comparison: usize,
    pub timeline: usize,
}

/// Initializer registered for the debtors panel
pub struct DebtorChartsPanel {
    data_element_id: String,
}

impl DebtorChartsPanel {
    pub fn new(data_element_id: impl Into<String>) -> Self {
        Self {
            data_element_id: data_element_id.into(),
        }
    }
}

#[async_trait(?Send)]
impl PanelInitializer for DebtorChartsPanel {
    fn name(&self) -> &str {
        "debtors"
    }

    async fn initialize(&self, ctx: &PanelContext<'_>) -> ShellResult<()> {
        ctx.ensure_current()?;
        let rendered = render_debtor_charts(ctx.view, &self.data_element_id)?;
        tracing::debug!(
            navigation_id = %ctx.navigation_id,
            clients = rendered.clients,
            comparison = rendered.comparison,
            timeline = rendered.timeline,
            "Debtor charts rendered"
        );
        Ok(())
    }
}

/// Draw comparison and timeline charts for every embedded client record.
///
/// Client `i` (1-based) draws into `compare-chart-{i}` when it has an
/// outstanding debt and into `timeline-chart-{i}` when it has payments;
/// missing canvases are skipped. A page without the data element is left
/// alone.
pub fn render_debtor_charts(
    view: &dyn View,
    data_element_id: &str,
) -> ShellResult<DebtorChartsRendered> {
    let raw = match view.text_content(data_element_id) {
        Some(raw) => raw,
        None => {
            tracing::debug!(element = data_element_id, "No embedded client data");
            return Ok(DebtorChartsRendered::default());
        }
    };

    let raw = if raw.trim().is_empty() { "[]" } else { raw.as_str() };
    let records: Vec<ClientDebtRecord> = serde_json::from_str(raw).map_err(|e| {
        ShellError::EmbeddedData(format!("#{} is not valid client data: {}", data_element_id, e))
    })?;

    let mut rendered = DebtorChartsRendered {
        clients: records.len(),
        ..Default::default()
    };

    for (idx, record) in records.iter().enumerate() {
        let n = idx + 1;

        let compare_id = compare_chart_id(n);
        if record.has_debt()
            && view.contains(&compare_id)
            && view.draw_chart(&compare_id, &ChartSpec::paid_vs_remaining(record))
        {
            rendered.comparison += 1;
        }

        let timeline_id = timeline_chart_id(n);
        if record.has_payments()
            && view.contains(&timeline_id)
            && view.draw_chart(&timeline_id, &ChartSpec::payment_timeline(record))
        {
            rendered.timeline += 1;
        }
    }

    Ok(rendered)
}
