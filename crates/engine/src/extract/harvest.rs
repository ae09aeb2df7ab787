//! Harvest label/value candidates from a product page's DOM.
//!
//! Three sources in priority order: `<table>` rows, `<dl>` definition
//! lists, then generic "label: value" lines inside spec/detail/info
//! blocks. `CandidatePairs` keeps the first writer, so earlier sources
//! shadow later ones per label.

use scraper::{ElementRef, Html, Selector};

use super::candidates::CandidatePairs;

/// Page-title suffixes the catalog appends; stripped before the title is
/// used as a field value.
const TITLE_SUFFIXES: &[&str] = &[" | MoBase", " | Siemens Mobility"];

/// Structured sources: table rows (first two cells) and dt/dd pairs.
pub fn harvest_structured(doc: &Html) -> CandidatePairs {
    let mut pairs = CandidatePairs::new();

    let row_sel = Selector::parse("table tr").unwrap();
    let cell_sel = Selector::parse("td, th").unwrap();
    for row in doc.select(&row_sel) {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() >= 2 {
            pairs.insert_first(&element_text(cells[0]), &element_text(cells[1]));
        }
    }

    let dl_sel = Selector::parse("dl").unwrap();
    let dt_sel = Selector::parse("dt").unwrap();
    let dd_sel = Selector::parse("dd").unwrap();
    for dl in doc.select(&dl_sel) {
        let terms: Vec<ElementRef> = dl.select(&dt_sel).collect();
        let defs: Vec<ElementRef> = dl.select(&dd_sel).collect();
        for (dt, dd) in terms.iter().zip(defs.iter()) {
            pairs.insert_first(&element_text(*dt), &element_text(*dd));
        }
    }

    pairs
}

/// Last-resort source: colon-delimited lines inside blocks whose class
/// hints at specifications.
pub fn harvest_text(doc: &Html) -> CandidatePairs {
    let mut pairs = CandidatePairs::new();

    let block_sel =
        Selector::parse(r#"[class*="spec"], [class*="detail"], [class*="info"]"#).unwrap();
    for block in doc.select(&block_sel) {
        for line in block.text().flat_map(|t| t.lines()) {
            if let Some((label, value)) = line.split_once(':') {
                pairs.insert_first(label, value);
            }
        }
    }

    pairs
}

/// The page title with catalog suffixes removed; `None` for error pages.
pub fn harvest_title(doc: &Html) -> Option<String> {
    let title_sel = Selector::parse("title").unwrap();
    let raw = element_text(doc.select(&title_sel).next()?);
    if raw.is_empty() || raw.contains("404") || raw.contains("Not Found") {
        return None;
    }
    let mut title = raw;
    for suffix in TITLE_SUFFIXES {
        if let Some(stripped) = title.strip_suffix(suffix) {
            title = stripped.to_string();
        }
    }
    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Visible text of an element, whitespace-collapsed.
fn element_text(el: ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
