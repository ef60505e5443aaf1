//! Scraper for Bon Appetit cafe pages.
//!
//! Each meal period is a `section.site-panel--daypart` carrying its label in
//! `data-jump-nav-title`. Inside, every language or date variant of the menu
//! is a tab; only the tab with `aria-hidden="false"` is the live menu.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{ExtractionError, MenuScraper};
use crate::model::{MealPeriod, RawMealBlock};

const LABEL_ATTR: &str = "data-jump-nav-title";

static PANEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section.site-panel--daypart").expect("valid panel selector"));

static TIME_WINDOW: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".site-panel__daypart-time").expect("valid time selector")
});

static ACTIVE_TAB: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div.site-panel__daypart-tab-content[aria-hidden="false"]"#)
        .expect("valid tab selector")
});

static ITEM_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("button.site-panel__daypart-item-title").expect("valid item selector")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct DaypartScraper;

impl DaypartScraper {
    pub fn new() -> Self {
        Self
    }
}

impl MenuScraper for DaypartScraper {
    fn extract(&self, html: &str) -> Result<Vec<RawMealBlock>, ExtractionError> {
        if html.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }
        if !html.contains('<') {
            return Err(ExtractionError::NotHtml);
        }

        let document = Html::parse_document(html);
        let mut blocks: Vec<RawMealBlock> = Vec::new();

        for panel in document.select(&PANEL) {
            let Some(block) = read_panel(panel) else {
                continue;
            };

            match blocks.iter_mut().find(|b| b.meal_period == block.meal_period) {
                Some(existing) => merge_into(existing, block),
                None => blocks.push(block),
            }
        }

        Ok(blocks)
    }
}

fn read_panel(panel: ElementRef<'_>) -> Option<RawMealBlock> {
    let label = panel.value().attr(LABEL_ATTR)?;
    let Some(meal_period) = MealPeriod::from_label(label) else {
        debug!(label, "Skipping daypart panel with unknown meal label");
        return None;
    };

    let mut block = RawMealBlock::new(meal_period);

    block.time_window = panel
        .select(&TIME_WINDOW)
        .map(collapsed_text)
        .find(|text| !text.is_empty());

    for tab in panel.select(&ACTIVE_TAB) {
        for button in tab.select(&ITEM_TITLE) {
            let name = button.text().collect::<String>();
            let name = name.trim();
            if !name.is_empty() {
                block.items.push(name.to_string());
            }
        }
    }

    Some(block)
}

/// Folds a second panel for the same meal period into the first one.
fn merge_into(existing: &mut RawMealBlock, other: RawMealBlock) {
    if existing.time_window.is_none() {
        existing.time_window = other.time_window;
    }
    for item in other.items {
        if !existing.items.contains(&item) {
            existing.items.push(item);
        }
    }
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(label: Option<&str>, time: Option<&str>, active: &[&str], hidden: &[&str]) -> String {
        let label_attr = label
            .map(|l| format!(r#" data-jump-nav-title="{}""#, l))
            .unwrap_or_default();
        let time_div = time
            .map(|t| format!(r#"<div class="site-panel__daypart-time">{}</div>"#, t))
            .unwrap_or_default();
        let buttons = |items: &[&str]| {
            items
                .iter()
                .map(|i| format!(r#"<button class="h4 site-panel__daypart-item-title">{}</button>"#, i))
                .collect::<String>()
        };
        format!(
            r#"<section class="panel s-wrapper site-panel site-panel--daypart"{label_attr}>
                 <h2>{label}</h2>{time_div}
                 <div class="c-tab__content site-panel__daypart-tab-content" aria-hidden="false">{active}</div>
                 <div class="c-tab__content site-panel__daypart-tab-content" aria-hidden="true">{hidden}</div>
               </section>"#,
            label = label.unwrap_or(""),
            active = buttons(active),
            hidden = buttons(hidden),
        )
    }

    fn page(panels: &[String]) -> String {
        format!("<html><body>{}</body></html>", panels.concat())
    }

    fn extract(html: &str) -> Vec<RawMealBlock> {
        DaypartScraper::new().extract(html).unwrap()
    }

    #[test]
    fn test_extracts_label_time_and_active_items() {
        let html = page(&[panel(
            Some("Breakfast"),
            Some("7:00 am - 10:00 am"),
            &["Scrambled Eggs", "  Toast  "],
            &["Huevos Revueltos"],
        )]);

        let blocks = extract(&html);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].meal_period, MealPeriod::Breakfast);
        assert_eq!(blocks[0].time_window.as_deref(), Some("7:00 am - 10:00 am"));
        assert_eq!(blocks[0].items, vec!["Scrambled Eggs", "Toast"]);
    }

    #[test]
    fn test_no_panels_yields_no_blocks() {
        assert!(extract("<html><body><p>Closed today</p></body></html>").is_empty());
    }

    #[test]
    fn test_panel_without_label_is_skipped() {
        let html = page(&[panel(None, Some("7:00 am - 10:00 am"), &["Eggs"], &[])]);
        assert!(extract(&html).is_empty());
    }

    #[test]
    fn test_unknown_label_is_skipped() {
        let html = page(&[
            panel(Some("Late Night"), Some("10:00 pm - 1:00 am"), &["Wings"], &[]),
            panel(Some("Dinner"), Some("5:00 pm - 8:00 pm"), &["Pasta"], &[]),
        ]);
        let blocks = extract(&html);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].meal_period, MealPeriod::Dinner);
    }

    #[test]
    fn test_missing_time_leaves_window_empty() {
        let html = page(&[panel(Some("Lunch"), None, &["Soup"], &[])]);
        let blocks = extract(&html);
        assert_eq!(blocks[0].time_window, None);
        assert_eq!(blocks[0].items, vec!["Soup"]);
    }

    #[test]
    fn test_empty_active_tab_still_yields_block() {
        let html = page(&[panel(Some("Dinner"), Some("5:00 pm - 8:00 pm"), &[], &["Hidden Dish"])]);
        let blocks = extract(&html);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].items.is_empty());
        assert!(!blocks[0].has_items());
    }

    #[test]
    fn test_blank_item_titles_are_discarded() {
        let html = page(&[panel(Some("Lunch"), None, &["   ", "Salad"], &[])]);
        assert_eq!(extract(&html)[0].items, vec!["Salad"]);
    }

    #[test]
    fn test_time_window_whitespace_is_collapsed() {
        let html = page(&[panel(Some("Lunch"), Some("\n 11:00 am\n   -  2:00 pm "), &["Soup"], &[])]);
        assert_eq!(extract(&html)[0].time_window.as_deref(), Some("11:00 am - 2:00 pm"));
    }

    #[test]
    fn test_repeated_meal_period_is_merged() {
        let html = page(&[
            panel(Some("Lunch"), None, &["Soup", "Salad"], &[]),
            panel(Some("lunch"), Some("11:00 am - 2:00 pm"), &["Salad", "Wrap"], &[]),
        ]);
        let blocks = extract(&html);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].items, vec!["Soup", "Salad", "Wrap"]);
        assert_eq!(blocks[0].time_window.as_deref(), Some("11:00 am - 2:00 pm"));
    }

    #[test]
    fn test_blocks_follow_page_order() {
        let html = page(&[
            panel(Some("Brunch"), None, &["Waffles"], &[]),
            panel(Some("Dinner"), None, &["Steak"], &[]),
        ]);
        let periods: Vec<MealPeriod> = extract(&html).iter().map(|b| b.meal_period).collect();
        assert_eq!(periods, vec![MealPeriod::Brunch, MealPeriod::Dinner]);
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let html = page(&[panel(Some("Lunch"), Some("11:00 am - 2:00 pm"), &["Soup"], &[])]);
        assert_eq!(extract(&html), extract(&html));
    }

    #[test]
    fn test_non_html_input_is_an_error() {
        let scraper = DaypartScraper::new();
        assert_eq!(scraper.extract("   \n"), Err(ExtractionError::EmptyDocument));
        assert_eq!(scraper.extract("503 upstream error"), Err(ExtractionError::NotHtml));
    }
}
