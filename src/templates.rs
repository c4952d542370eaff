//! Shell Markup
//!
//! askama templates for the markup the shell itself produces. Dynamic text is
//! escaped; activity icons are backend-supplied markup and pass through.

use askama::Template;

use crate::model::{Activity, DashboardSummary};

/// Canvas id of the monthly orders chart
pub const ORDERS_CHART_ID: &str = "ordersChart";
/// Canvas id of the top clients chart
pub const TOP_CLIENTS_CHART_ID: &str = "topClientsChart";
/// Canvas id of the collection rate doughnut
pub const DEBT_CHART_ID: &str = "debtChart";

#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingIndicator;

#[derive(Template)]
#[template(path = "fragment_error.html")]
pub struct FragmentError;

#[derive(Template)]
#[template(path = "chart_section.html")]
pub struct ChartSection<'a> {
    pub orders_chart_id: &'a str,
    pub top_clients_chart_id: &'a str,
    pub debt_chart_id: &'a str,
    pub total_debt: f64,
    pub total_paid: f64,
}

impl<'a> ChartSection<'a> {
    pub fn for_summary(summary: &DashboardSummary) -> Self {
        Self {
            orders_chart_id: ORDERS_CHART_ID,
            top_clients_chart_id: TOP_CLIENTS_CHART_ID,
            debt_chart_id: DEBT_CHART_ID,
            total_debt: summary.total_debt,
            total_paid: summary.total_paid,
        }
    }
}

/// Activity prepared for display
pub struct ActivityRow {
    pub icon: String,
    pub color: String,
    pub text: String,
    pub time: String,
}

impl From<&Activity> for ActivityRow {
    fn from(act: &Activity) -> Self {
        Self {
            icon: act.icon.clone(),
            color: act.color.clone(),
            text: act.text.clone(),
            time: act.display_time(),
        }
    }
}

#[derive(Template)]
#[template(path = "activity_list.html")]
pub struct ActivityList {
    pub activities: Vec<ActivityRow>,
}

impl ActivityList {
    pub fn new(activities: &[Activity]) -> Self {
        Self {
            activities: activities.iter().map(ActivityRow::from).collect(),
        }
    }
}

/// "<what> load failed: <message>" notice
#[derive(Template)]
#[template(path = "load_failed.html")]
pub struct LoadFailed<'a> {
    pub what: &'a str,
    pub message: &'a str,
}

/// Render a template, logging and returning an empty string on failure
pub fn render<T: Template>(template: &T) -> String {
    template.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Template rendering failed");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(text: &str) -> Activity {
        Activity {
            icon: "<i class='bi bi-cash-stack'></i>".to_string(),
            color: "text-primary".to_string(),
            text: text.to_string(),
            time: "2025-03-04T15:06:07".to_string(),
        }
    }

    #[test]
    fn test_loading_and_error() {
        assert!(render(&LoadingIndicator).contains("Loading..."));
        assert!(render(&FragmentError).contains("Failed to load content."));
    }

    #[test]
    fn test_chart_section() {
        let summary: DashboardSummary =
            serde_json::from_str(r#"{"total_debt": 200, "total_paid": 150.5}"#).unwrap();
        let html = render(&ChartSection::for_summary(&summary));

        assert!(html.contains(r#"id="ordersChart""#));
        assert!(html.contains(r#"id="topClientsChart""#));
        assert!(html.contains(r#"id="debtChart""#));
        assert!(html.contains("Out of GHS 200, you've collected GHS 150.5"));
    }

    #[test]
    fn test_activity_list() {
        let html = render(&ActivityList::new(&[activity("Payment of GHS 50 confirmed")]));

        assert!(html.contains("<i class='bi bi-cash-stack'></i>"));
        assert!(html.contains("Payment of GHS 50 confirmed"));
        assert!(html.contains("03:06:07 PM"));
        assert!(!html.contains("No recent activities"));
    }

    #[test]
    fn test_activity_text_is_escaped() {
        let html = render(&ActivityList::new(&[activity("<script>x</script>")]));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_activity_list() {
        let html = render(&ActivityList::new(&[]));
        assert!(html.contains("No recent activities"));
        assert!(!html.contains("activityList"));
    }

    #[test]
    fn test_load_failed() {
        let html = render(&LoadFailed {
            what: "Chart",
            message: "db down",
        });
        assert!(html.contains("Chart load failed: db down"));
    }
}
