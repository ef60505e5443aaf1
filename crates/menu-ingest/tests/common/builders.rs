//! Builders for dining hall pages and registries.

#![allow(dead_code)]

use menu_ingest::config::{DiningHallSource, SourceRegistry};

/// Base URL every test hall is registered under.
pub const TEST_BASE_URL: &str = "https://cafe.test";

pub fn hall_url(id: &str) -> String {
    format!("{}/cafe/{}/", TEST_BASE_URL, id)
}

pub fn registry(ids: &[&str]) -> SourceRegistry {
    SourceRegistry::new(
        ids.iter()
            .map(|id| DiningHallSource::new(*id, hall_url(id)))
            .collect(),
    )
    .expect("test registry is valid")
}

struct Panel {
    label: String,
    time: Option<String>,
    items: Vec<String>,
    hidden_items: Vec<String>,
}

/// Builder for a cafe page with one section per meal period.
#[derive(Default)]
pub struct PageBuilder {
    panels: Vec<Panel>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a meal panel with a visible tab holding `items`.
    pub fn meal(mut self, label: &str, time: Option<&str>, items: &[&str]) -> Self {
        self.panels.push(Panel {
            label: label.to_string(),
            time: time.map(str::to_string),
            items: items.iter().map(|s| s.to_string()).collect(),
            hidden_items: Vec::new(),
        });
        self
    }

    /// Add items in a hidden tab to the most recent panel.
    pub fn hidden(mut self, items: &[&str]) -> Self {
        if let Some(panel) = self.panels.last_mut() {
            panel.hidden_items = items.iter().map(|s| s.to_string()).collect();
        }
        self
    }

    pub fn build(self) -> String {
        let mut html = String::from("<!DOCTYPE html><html><head><title>Cafe</title></head><body>\n");
        for panel in self.panels {
            html.push_str(&format!(
                "<section class=\"panel s-wrapper site-panel site-panel--daypart\" data-jump-nav-title=\"{}\">\n",
                panel.label
            ));
            if let Some(time) = panel.time {
                html.push_str(&format!(
                    "  <div class=\"site-panel__daypart-time\">{}</div>\n",
                    time
                ));
            }
            html.push_str(&tab(false, &panel.items));
            if !panel.hidden_items.is_empty() {
                html.push_str(&tab(true, &panel.hidden_items));
            }
            html.push_str("</section>\n");
        }
        html.push_str("</body></html>\n");
        html
    }
}

fn tab(hidden: bool, items: &[String]) -> String {
    let mut out = format!(
        "  <div class=\"c-tab__content site-panel__daypart-tab-content\" aria-hidden=\"{}\">\n",
        hidden
    );
    for item in items {
        out.push_str(&format!(
            "    <button class=\"h4 site-panel__daypart-item-title\">{}</button>\n",
            item
        ));
    }
    out.push_str("  </div>\n");
    out
}
