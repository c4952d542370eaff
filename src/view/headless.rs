//! In-memory page model
//!
//! Tracks the markup of every region that has been written, which element
//! ids that markup introduces, the charts drawn into them, and the sidebar
//! state. Replacing a region drops everything nested inside its old markup.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use super::{SidebarEntry, View, CONTENT_AREA, SECTION_TITLE};
use crate::chart::ChartSpec;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?:^|\s)id\s*=\s*["']([^"']+)["']"#).expect("valid id pattern")
    })
}

/// Element ids declared in a chunk of markup
fn element_ids(html: &str) -> Vec<String> {
    id_pattern()
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Inner markup of the element carrying `id` in `html`
fn element_inner(html: &str, id: &str) -> Option<String> {
    let open = Regex::new(&format!(
        r#"<([a-zA-Z][a-zA-Z0-9-]*)(?:\s[^>]*)?\sid\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(id)
    ))
    .ok()?;

    let caps = open.captures(html)?;
    let start = caps.get(0)?.end();
    let close = format!("</{}>", &caps[1]);
    let end = html[start..].find(&close)? + start;

    Some(html[start..end].to_string())
}

#[derive(Default)]
struct DocumentState {
    /// Markup or text of every region written so far
    regions: HashMap<String, String>,
    charts: BTreeMap<String, ChartSpec>,
    sidebar: Vec<SidebarEntry>,
    active: Vec<bool>,
}

impl DocumentState {
    fn exists(&self, id: &str) -> bool {
        id == CONTENT_AREA
            || id == SECTION_TITLE
            || self.regions.contains_key(id)
            || self
                .regions
                .values()
                .any(|html| element_ids(html).iter().any(|found| found == id))
    }

    /// Forget regions and charts declared inside `id`'s current markup
    fn drop_nested(&mut self, id: &str) {
        let nested = match self.regions.get(id) {
            Some(html) => element_ids(html),
            None => return,
        };

        for child in nested {
            if child == id {
                continue;
            }
            self.drop_nested(&child);
            self.regions.remove(&child);
            self.charts.remove(&child);
        }
    }
}

/// Page model used by the native host and in tests
pub struct HeadlessDocument {
    state: RefCell<DocumentState>,
}

impl HeadlessDocument {
    /// Empty page with the given sidebar links
    pub fn new(sidebar: Vec<SidebarEntry>) -> Self {
        let active = vec![false; sidebar.len()];
        Self {
            state: RefCell::new(DocumentState {
                sidebar,
                active,
                ..Default::default()
            }),
        }
    }

    /// Current markup (or text) of region `id`
    pub fn html(&self, id: &str) -> Option<String> {
        self.state.borrow().regions.get(id).cloned()
    }

    /// Current section title
    pub fn title(&self) -> String {
        self.html(SECTION_TITLE).unwrap_or_default()
    }

    /// Chart currently drawn in canvas `id`
    pub fn chart(&self, id: &str) -> Option<ChartSpec> {
        self.state.borrow().charts.get(id).cloned()
    }

    /// All charts on the page, ordered by canvas id
    pub fn charts(&self) -> Vec<(String, ChartSpec)> {
        self.state
            .borrow()
            .charts
            .iter()
            .map(|(id, chart)| (id.clone(), chart.clone()))
            .collect()
    }

    /// Indices of the sidebar entries marked active
    pub fn active_entries(&self) -> Vec<usize> {
        self.state
            .borrow()
            .active
            .iter()
            .enumerate()
            .filter(|(_, active)| **active)
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl View for HeadlessDocument {
    fn set_html(&self, id: &str, html: &str) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.exists(id) {
            return false;
        }

        state.drop_nested(id);
        state.regions.insert(id.to_string(), html.to_string());
        true
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        self.set_html(id, text)
    }

    fn text_content(&self, id: &str) -> Option<String> {
        let state = self.state.borrow();
        if let Some(content) = state.regions.get(id) {
            return Some(content.clone());
        }
        state
            .regions
            .values()
            .find_map(|html| element_inner(html, id))
    }

    fn contains(&self, id: &str) -> bool {
        self.state.borrow().exists(id)
    }

    fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        self.state.borrow().sidebar.clone()
    }

    fn mark_active(&self, index: Option<usize>) {
        let mut state = self.state.borrow_mut();
        for (idx, active) in state.active.iter_mut().enumerate() {
            *active = Some(idx) == index;
        }
    }

    fn draw_chart(&self, id: &str, chart: &ChartSpec) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.exists(id) {
            return false;
        }
        state.charts.insert(id.to_string(), chart.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DashboardSummary;

    fn doc() -> HeadlessDocument {
        HeadlessDocument::new(vec![
            SidebarEntry::new("/home", " Dashboard "),
            SidebarEntry::new("/debtors", "Debtors"),
        ])
    }

    fn chart() -> ChartSpec {
        ChartSpec::monthly_orders(&DashboardSummary {
            total_debt: 0.0,
            total_paid: 0.0,
            months: vec!["January".into()],
            order_counts: vec![1.0],
            top_clients_names: vec![],
            top_clients_orders: vec![],
            recent_activities: vec![],
        })
    }

    #[test]
    fn test_element_ids() {
        let ids = element_ids(r#"<div id="a"><canvas id='b'></canvas></div>"#);
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_data_attributes_are_not_ids() {
        let html = r#"<table><tr data-id="client-data" data-url='/debtors'><td id="cell">Kofi</td></tr></table>"#;
        assert_eq!(element_ids(html), vec!["cell"]);
        assert_eq!(element_inner(html, "client-data"), None);

        let doc = doc();
        doc.set_html(CONTENT_AREA, html);
        assert!(!doc.contains("client-data"));
        assert!(!doc.contains("/debtors"));
        assert_eq!(doc.text_content("client-data"), None);
        assert_eq!(doc.text_content("cell").as_deref(), Some("Kofi"));
    }

    #[test]
    fn test_nested_regions() {
        let doc = doc();
        assert!(!doc.contains("chart-section"));
        assert!(!doc.set_html("chart-section", "x"));

        assert!(doc.set_html(CONTENT_AREA, r#"<div id="chart-section"></div>"#));
        assert!(doc.set_html("chart-section", r#"<canvas id="ordersChart"></canvas>"#));
        assert!(doc.draw_chart("ordersChart", &chart()));
        assert!(doc.chart("ordersChart").is_some());

        // Swapping the content area removes everything nested in it
        assert!(doc.set_html(CONTENT_AREA, "<p>other</p>"));
        assert!(!doc.contains("chart-section"));
        assert!(!doc.contains("ordersChart"));
        assert!(doc.charts().is_empty());
        assert!(!doc.draw_chart("ordersChart", &chart()));
    }

    #[test]
    fn test_text_content() {
        let doc = doc();
        doc.set_html(
            CONTENT_AREA,
            r#"<h1>Debtors</h1><script type="application/json" id="client-data">[{"a":1}]</script>"#,
        );

        assert_eq!(doc.text_content("client-data").as_deref(), Some(r#"[{"a":1}]"#));
        assert_eq!(doc.text_content("missing"), None);

        doc.set_text(SECTION_TITLE, "Debtors");
        assert_eq!(doc.title(), "Debtors");
    }

    #[test]
    fn test_mark_active() {
        let doc = doc();
        doc.mark_active(Some(1));
        assert_eq!(doc.active_entries(), vec![1]);
        doc.mark_active(Some(0));
        assert_eq!(doc.active_entries(), vec![0]);
        doc.mark_active(None);
        assert!(doc.active_entries().is_empty());
        assert_eq!(doc.sidebar_entries()[0].label(), "Dashboard");
    }
}
