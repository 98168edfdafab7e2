//! Food-relevant section extraction from reference HTML.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Keywords that mark a heading or block as the start of a food section.
pub const SECTION_KEYWORDS: &[&str] = &[
    "food",
    "diet",
    "grapefruit",
    "alcohol",
    "meals",
    "eating",
    "nutrition",
    "supplements",
    "vitamins",
    "minerals",
];

/// Broader keywords used when no section qualifies.
pub const FALLBACK_KEYWORDS: &[&str] = &[
    "food",
    "grapefruit",
    "drink",
    "eat",
    "meal",
    "cheese",
    "tyramine",
    "alcohol",
    "diet",
    "nutrition",
    "supplement",
    "vitamin",
    "mineral",
    "herb",
    "spice",
    "juice",
];

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const CONTENT_TAGS: &[&str] = &["p", "li", "div"];

static SECTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, p, li, div").expect("section selector is valid")
});

static FALLBACK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, li").expect("fallback selector is valid"));

/// Outcome of extraction, with how it was reached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedSections {
    pub sections: Vec<String>,
    /// Sections came from the broad paragraph scan
    pub used_fallback_scan: bool,
    /// A food was given but no section mentioned it, so all sections were kept
    pub food_filter_fallback: bool,
}

impl ExtractedSections {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn joined(&self) -> String {
        self.sections.join(" ")
    }
}

/// Extract food-relevant sections, narrowed to `food` when it is mentioned.
pub fn extract_sections(html: &str, food: Option<&str>) -> ExtractedSections {
    let document = Html::parse_document(html);

    let mut sections = keyword_sections(&document);
    let used_fallback_scan = sections.is_empty();
    if used_fallback_scan {
        sections = fallback_paragraphs(&document);
    }

    let mut food_filter_fallback = false;
    if let Some(food) = food.map(str::trim).filter(|f| !f.is_empty()) {
        let food_lower = food.to_lowercase();
        let specific: Vec<String> = sections
            .iter()
            .filter(|s| s.to_lowercase().contains(&food_lower))
            .cloned()
            .collect();
        if !specific.is_empty() {
            sections = specific;
        } else if !sections.is_empty() {
            food_filter_fallback = true;
        }
    }

    ExtractedSections {
        sections,
        used_fallback_scan,
        food_filter_fallback,
    }
}

/// Visible text of an element with whitespace collapsed.
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn keyword_sections(document: &Html) -> Vec<String> {
    document
        .select(&SECTION_SELECTOR)
        .filter_map(|element| {
            let text = element_text(&element);
            if contains_any(&text, SECTION_KEYWORDS) {
                section_content(&element, text)
            } else {
                None
            }
        })
        .collect()
}

/// The element's own text plus following content siblings up to the next heading.
fn section_content(element: &ElementRef<'_>, own_text: String) -> Option<String> {
    let mut content = Vec::new();
    if !own_text.is_empty() {
        content.push(own_text);
    }

    for sibling in element.next_siblings().filter_map(ElementRef::wrap) {
        let name = sibling.value().name();
        if HEADING_TAGS.contains(&name) {
            break;
        }
        if CONTENT_TAGS.contains(&name) {
            let text = element_text(&sibling);
            if !text.is_empty() {
                content.push(text);
            }
        }
    }

    if content.is_empty() {
        None
    } else {
        Some(content.join(" "))
    }
}

fn fallback_paragraphs(document: &Html) -> Vec<String> {
    document
        .select(&FALLBACK_SELECTOR)
        .map(|element| element_text(&element))
        .filter(|text| contains_any(text, FALLBACK_KEYWORDS))
        .collect()
}
