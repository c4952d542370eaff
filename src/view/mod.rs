//! View Port
//!
//! The DOM contract the shell and the panel initializers depend on. The
//! browser host implements it over `web_sys` elements; [`HeadlessDocument`]
//! implements it in memory for the native host and for tests.

mod headless;

pub use headless::HeadlessDocument;

use crate::chart::ChartSpec;

/// Region the panel fragments are swapped into
pub const CONTENT_AREA: &str = "content-area";
/// Visible title of the current section
pub const SECTION_TITLE: &str = "section-title";
/// Dashboard region holding the three chart cards
pub const CHART_SECTION: &str = "chart-section";
/// Dashboard region holding the activity feed
pub const ACTIVITY_SECTION: &str = "activity-section";

/// Canvas id of the paid-vs-remaining chart of the `n`th client (1-based)
pub fn compare_chart_id(n: usize) -> String {
    format!("compare-chart-{}", n)
}

/// Canvas id of the payment timeline of the `n`th client (1-based)
pub fn timeline_chart_id(n: usize) -> String {
    format!("timeline-chart-{}", n)
}

/// A sidebar link: the panel URL it loads and its visible text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub url: String,
    pub text: String,
}

impl SidebarEntry {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }

    /// Section label derived from the visible text
    pub fn label(&self) -> String {
        self.text.trim().to_string()
    }
}

/// Element-level operations on the admin page
///
/// Methods returning `bool` report whether the target element existed; a
/// missing element is never an error at this level.
pub trait View {
    /// Replace the inner markup of element `id`
    fn set_html(&self, id: &str, html: &str) -> bool;

    /// Replace the text of element `id`
    fn set_text(&self, id: &str, text: &str) -> bool;

    /// Text content of element `id`
    fn text_content(&self, id: &str) -> Option<String>;

    /// Whether element `id` is currently on the page
    fn contains(&self, id: &str) -> bool;

    /// Sidebar links, in page order
    fn sidebar_entries(&self) -> Vec<SidebarEntry>;

    /// Mark the sidebar entry at `index` active and every other one inactive
    fn mark_active(&self, index: Option<usize>);

    /// Draw `chart` into canvas `id`
    fn draw_chart(&self, id: &str, chart: &ChartSpec) -> bool;
}
