//! Panel data model
//!
//! Shapes of the data the shell reads: the persisted navigation state, the
//! dashboard summary served by `/home/details`, and the client debt records
//! embedded in the debtors fragment.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ShellError, ShellResult};

/// URL restored when nothing has been persisted yet
pub const DEFAULT_HOME_URL: &str = "/home";

/// Last panel the user navigated to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub last_url: String,
    pub last_label: String,
}

impl NavigationState {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            last_url: url.into(),
            last_label: label.into(),
        }
    }

    /// State used when storage holds nothing
    pub fn home(home_url: &str) -> Self {
        Self::new(home_url, "")
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::home(DEFAULT_HOME_URL)
    }
}

/// One entry of the dashboard activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Icon markup supplied by the backend (e.g. `<i class='bi bi-cash-stack'></i>`)
    pub icon: String,
    /// CSS colour class applied to icon and text
    pub color: String,
    pub text: String,
    /// Timestamp as sent by the backend (ISO 8601, with or without offset)
    pub time: String,
}

impl Activity {
    /// Timestamp rendered for display, or the raw value if it does not parse
    pub fn display_time(&self) -> String {
        format_timestamp(&self.time)
    }
}

/// Aggregated metrics behind the home panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_debt: f64,
    #[serde(default)]
    pub total_paid: f64,
    #[serde(default)]
    pub months: Vec<String>,
    #[serde(default)]
    pub order_counts: Vec<f64>,
    #[serde(default)]
    pub top_clients_names: Vec<String>,
    #[serde(default)]
    pub top_clients_orders: Vec<f64>,
    #[serde(default)]
    pub recent_activities: Vec<Activity>,
}

impl DashboardSummary {
    /// Collection rate as a whole percentage
    pub fn collection_percentage(&self) -> i64 {
        collection_percentage(self.total_debt, self.total_paid)
    }

    /// Outstanding amount (may be negative if overpaid)
    pub fn remaining(&self) -> f64 {
        self.total_debt - self.total_paid
    }

    /// Check that the parallel sequences line up
    pub fn validate(&self) -> ShellResult<()> {
        if self.months.len() != self.order_counts.len() {
            return Err(ShellError::DataLoad(format!(
                "Dashboard data is inconsistent: {} months but {} order counts",
                self.months.len(),
                self.order_counts.len()
            )));
        }
        if self.top_clients_names.len() != self.top_clients_orders.len() {
            return Err(ShellError::DataLoad(format!(
                "Dashboard data is inconsistent: {} top clients but {} order totals",
                self.top_clients_names.len(),
                self.top_clients_orders.len()
            )));
        }
        Ok(())
    }
}

/// A confirmed payment against a client's latest order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub date: String,
    pub amount: f64,
}

/// Debt position of one client, embedded in the debtors fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDebtRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    pub total_debt: f64,
    pub total_paid: f64,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl ClientDebtRecord {
    pub fn remaining(&self) -> f64 {
        self.total_debt - self.total_paid
    }

    /// Paid vs remaining is only meaningful for an outstanding debt
    pub fn has_debt(&self) -> bool {
        self.total_debt > 0.0
    }

    pub fn has_payments(&self) -> bool {
        !self.payments.is_empty()
    }
}

/// `round(total_paid / total_debt * 100)`, or 0 when there is no debt.
///
/// Halves round up, as browsers' `Math.round` does.
pub fn collection_percentage(total_debt: f64, total_paid: f64) -> i64 {
    if total_debt > 0.0 {
        (total_paid / total_debt * 100.0 + 0.5).floor() as i64
    } else {
        0
    }
}

/// Format a backend timestamp the way the admin panel displays it.
///
/// Offset-aware timestamps are converted to local time; naive ones are shown
/// as-is.
pub fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%m/%d/%Y, %I:%M:%S %p";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY).to_string();
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return naive.format(DISPLAY).to_string();
        }
    }

    raw.to_string()
}
