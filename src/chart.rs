//! Chart Descriptions
//!
//! Plain-data descriptions of the charts the panels draw. Hosts either plot
//! them directly (the browser host draws on canvas) or hand the
//! Chart.js-compatible configuration from [`ChartSpec::to_chartjs`] to a
//! charting library.

use serde::Serialize;
use serde_json::{json, Value};

use crate::model::{ClientDebtRecord, DashboardSummary};

pub const COLOR_BLUE: &str = "#007bff";
pub const COLOR_AMBER: &str = "#ffc107";
pub const COLOR_GREEN: &str = "#28a745";
pub const COLOR_RED: &str = "#dc3545";
const COLOR_BLUE_FILL: &str = "rgba(0,123,255,0.1)";

/// Chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    /// Bar chart with categories on the y axis
    HorizontalBar,
    Line,
    Doughnut,
}

/// One series of values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: Option<String>,
    pub data: Vec<f64>,
    /// One colour for the whole series, or one per value
    pub colors: Vec<String>,
    pub border_color: Option<String>,
    pub fill: bool,
}

impl Dataset {
    pub fn new(label: Option<&str>, data: Vec<f64>, colors: &[&str]) -> Self {
        Self {
            label: label.map(str::to_string),
            data,
            colors: colors.iter().map(|c| c.to_string()).collect(),
            border_color: None,
            fill: false,
        }
    }

    /// Colour for the value at `index`
    pub fn color_at(&self, index: usize) -> &str {
        match self.colors.len() {
            0 => COLOR_BLUE,
            1 => self.colors[0].as_str(),
            n => self.colors[index % n].as_str(),
        }
    }
}

/// Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Category labels, in order
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub title: Option<String>,
    pub show_legend: bool,
    pub x_axis_title: Option<String>,
    pub y_axis_title: Option<String>,
    /// Text drawn in the middle of a doughnut
    pub center_label: Option<String>,
}

impl ChartSpec {
    fn new(kind: ChartKind, labels: Vec<String>, dataset: Dataset) -> Self {
        Self {
            kind,
            labels,
            datasets: vec![dataset],
            title: None,
            show_legend: true,
            x_axis_title: None,
            y_axis_title: None,
            center_label: None,
        }
    }

    /// Orders per month, vertical bars
    pub fn monthly_orders(summary: &DashboardSummary) -> Self {
        Self::new(
            ChartKind::Bar,
            summary.months.clone(),
            Dataset::new(Some("Orders"), summary.order_counts.clone(), &[COLOR_BLUE]),
        )
    }

    /// Orders of the top clients, horizontal bars
    pub fn top_clients(summary: &DashboardSummary) -> Self {
        Self::new(
            ChartKind::HorizontalBar,
            summary.top_clients_names.clone(),
            Dataset::new(
                Some("Orders"),
                summary.top_clients_orders.clone(),
                &[COLOR_AMBER],
            ),
        )
    }

    /// Collected vs remaining doughnut with the rate in the centre
    pub fn collection_rate(summary: &DashboardSummary) -> Self {
        let mut chart = Self::new(
            ChartKind::Doughnut,
            vec!["Collected".to_string(), "Remaining".to_string()],
            Dataset::new(
                None,
                vec![summary.total_paid, summary.remaining()],
                &[COLOR_GREEN, COLOR_RED],
            ),
        );
        chart.show_legend = false;
        chart.center_label = Some(format!("{}%", summary.collection_percentage()));
        chart
    }

    /// Paid vs remaining bars for one client
    pub fn paid_vs_remaining(record: &ClientDebtRecord) -> Self {
        let mut chart = Self::new(
            ChartKind::Bar,
            vec!["Total Paid".to_string(), "Amount Left".to_string()],
            Dataset::new(
                Some("GHS"),
                vec![record.total_paid, record.remaining()],
                &[COLOR_GREEN, COLOR_RED],
            ),
        );
        chart.title = Some("Total Paid vs Amount Left".to_string());
        chart.show_legend = false;
        chart.y_axis_title = Some("Amount (GHS)".to_string());
        chart
    }

    /// Payment amounts over payment dates, in the order supplied
    pub fn payment_timeline(record: &ClientDebtRecord) -> Self {
        let mut dataset = Dataset::new(
            Some("Confirmed Payments"),
            record.payments.iter().map(|p| p.amount).collect(),
            &[COLOR_BLUE_FILL],
        );
        dataset.border_color = Some(COLOR_BLUE.to_string());
        dataset.fill = true;

        let mut chart = Self::new(
            ChartKind::Line,
            record.payments.iter().map(|p| p.date.clone()).collect(),
            dataset,
        );
        chart.y_axis_title = Some("Amount (GHS)".to_string());
        chart.x_axis_title = Some("Date".to_string());
        chart
    }

    /// Values of the first series
    pub fn values(&self) -> &[f64] {
        self.datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[])
    }

    /// Largest value across all series, 0 when empty
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .fold(0.0, f64::max)
    }

    /// Chart.js configuration object for this chart
    pub fn to_chartjs(&self) -> Value {
        let chart_type = match self.kind {
            ChartKind::Bar | ChartKind::HorizontalBar => "bar",
            ChartKind::Line => "line",
            ChartKind::Doughnut => "doughnut",
        };

        let datasets: Vec<Value> = self
            .datasets
            .iter()
            .map(|d| {
                let background: Value = if d.colors.len() == 1 {
                    json!(d.colors[0])
                } else {
                    json!(d.colors)
                };
                let mut ds = json!({
                    "data": d.data,
                    "backgroundColor": background,
                });
                if let Some(label) = &d.label {
                    ds["label"] = json!(label);
                }
                if let Some(border) = &d.border_color {
                    ds["borderColor"] = json!(border);
                }
                if d.fill {
                    ds["fill"] = json!(true);
                    ds["tension"] = json!(0.3);
                }
                ds
            })
            .collect();

        let mut plugins = json!({ "legend": { "display": self.show_legend } });
        if let Some(title) = &self.title {
            plugins["title"] = json!({ "display": true, "text": title });
        }
        if let Some(center) = &self.center_label {
            plugins["centerText"] = json!({ "text": center });
        }

        let mut options = json!({ "responsive": true, "plugins": plugins });
        match self.kind {
            ChartKind::Doughnut => {
                options["cutout"] = json!("70%");
            }
            ChartKind::HorizontalBar => {
                options["indexAxis"] = json!("y");
                options["scales"] = json!({ "x": { "beginAtZero": true } });
            }
            ChartKind::Bar | ChartKind::Line => {
                let mut y = json!({ "beginAtZero": true });
                if let Some(title) = &self.y_axis_title {
                    y["title"] = json!({ "display": true, "text": title });
                }
                let mut scales = json!({ "y": y });
                if let Some(title) = &self.x_axis_title {
                    scales["x"] = json!({ "title": { "display": true, "text": title } });
                }
                options["scales"] = scales;
            }
        }

        json!({
            "type": chart_type,
            "data": { "labels": self.labels, "datasets": datasets },
            "options": options,
        })
    }
}
