//! DOM View
//!
//! [`View`] over the live document. Regions and canvases are looked up by id
//! on every call since fragments replace them wholesale.

use admin_shell::{ChartSpec, SidebarEntry, View};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement};

use crate::components::chart::draw_chart;

/// Sidebar links the shell navigates with
pub const SIDEBAR_LINK_SELECTOR: &str = ".sidebar-link[data-url]";
pub const ACTIVE_CLASS: &str = "active-link";

pub struct DomView {
    document: Document,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// View over `window.document`; `None` outside a browser page
    pub fn from_window() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn sidebar_links(&self) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(SIDEBAR_LINK_SELECTOR) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

impl View for DomView {
    fn set_html(&self, id: &str, html: &str) -> bool {
        match self.element(id) {
            Some(el) => {
                el.set_inner_html(html);
                true
            }
            None => false,
        }
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        match self.element(id) {
            Some(el) => {
                el.set_text_content(Some(text));
                true
            }
            None => false,
        }
    }

    fn text_content(&self, id: &str) -> Option<String> {
        self.element(id).map(|el| el.text_content().unwrap_or_default())
    }

    fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        self.sidebar_links()
            .iter()
            .map(|link| {
                SidebarEntry::new(
                    link.get_attribute("data-url").unwrap_or_default(),
                    link.text_content().unwrap_or_default(),
                )
            })
            .collect()
    }

    fn mark_active(&self, index: Option<usize>) {
        for (i, link) in self.sidebar_links().iter().enumerate() {
            let _ = link.class_list().toggle_with_force(ACTIVE_CLASS, Some(i) == index);
        }
    }

    fn draw_chart(&self, id: &str, chart: &ChartSpec) -> bool {
        let Some(canvas) = self
            .element(id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            return false;
        };

        // Fragment canvases come without a drawing size; take the laid-out one
        let width = canvas.client_width();
        if width > 0 {
            canvas.set_width(width as u32);
            canvas.set_height((width as f64 * 0.6) as u32);
        }

        draw_chart(&canvas, chart);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn view_with(html: &str) -> DomView {
        let view = DomView::from_window().unwrap();
        let body = view.document.body().unwrap();
        body.set_inner_html(html);
        view
    }

    #[wasm_bindgen_test]
    fn test_regions_and_sidebar() {
        let view = view_with(
            r#"<a class="sidebar-link" data-url="/home"> Dashboard </a>
               <a class="sidebar-link" data-url="/debtors">Debtors</a>
               <a class="sidebar-link">Logout</a>
               <h2 id="section-title"></h2>
               <div id="content-area"></div>"#,
        );

        let entries = view.sidebar_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label(), "Dashboard");
        assert_eq!(entries[1].url, "/debtors");

        view.mark_active(Some(1));
        let links = view.sidebar_links();
        assert!(!links[0].class_list().contains(ACTIVE_CLASS));
        assert!(links[1].class_list().contains(ACTIVE_CLASS));

        assert!(view.set_html("content-area", r#"<canvas id="compare-chart-1"></canvas>"#));
        assert!(view.contains("compare-chart-1"));
        assert!(!view.set_text("missing", "x"));
        assert!(view.set_text("section-title", "Debtors"));
        assert_eq!(view.text_content("section-title").as_deref(), Some("Debtors"));
    }
}
