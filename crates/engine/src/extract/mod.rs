//! Multi-strategy field extraction from one fetched catalog document.
//!
//! Three paths run in fixed priority order, each producing its own
//! [`PartialFields`] merged with `merge_keeping_first`:
//!
//! 1. table / definition-list path (structured DOM),
//! 2. embedded product object (`window.initialData` island), gaps only,
//! 3. generic "label: value" text blocks, last resort.
//!
//! Later paths are skipped entirely once the field set is complete.

pub mod candidates;
pub mod embedded;
pub mod harvest;
pub mod rules;

use regex::Regex;
use scraper::Html;

use crate::model::{fill, ExtractedFieldSet, FetchStatus};
use crate::normalize;

pub use candidates::CandidatePairs;

/// A fetched document as the transport hands it over: HTTP status plus the
/// raw body. A non-200 status means "no usable content", never an error.
#[derive(Debug, Clone)]
pub struct Document {
    pub status: u16,
    pub body: String,
}

/// Run the extraction cascade over one document.
pub fn extract_document(external_id: &str, source_url: &str, doc: &Document) -> ExtractedFieldSet {
    let mut out = ExtractedFieldSet::new(external_id, source_url);

    match doc.status {
        200 => {}
        404 => {
            out.status = FetchStatus::Failed("Produkt nicht gefunden (404)".into());
            return out;
        }
        other => {
            out.status = FetchStatus::Failed(format!("HTTP-Fehler: {other}"));
            return out;
        }
    }

    let dom = Html::parse_document(&doc.body);

    // Path 1: tables and definition lists, plus the page title.
    let mut fields = rules::apply_candidates(&harvest::harvest_structured(&dom));
    fill(&mut fields.title, harvest::harvest_title(&dom));

    // Path 2: embedded product object fills gaps.
    if !fields.is_complete() {
        if let Some(product) = embedded::parse_embedded(&doc.body) {
            fields.merge_keeping_first(embedded::apply_embedded(&product));
        }
    }

    // Path 3: free-text "label: value" lines, last resort.
    if !fields.is_complete() {
        fields.merge_keeping_first(rules::apply_candidates(&harvest::harvest_text(&dom)));
    }

    out.status = if fields.has_core_data() {
        FetchStatus::Succeeded
    } else {
        FetchStatus::PartiallySucceeded
    };
    out.fields = fields;
    out
}

/// Re-render raw dimension text canonically: `L×B×H: l×w×h mm`, the
/// `Ø×H: d×h mm` form when a diameter marker is present, `L×B: a×b mm`
/// for pairs. Text without a recognizable pattern passes through as-is.
pub fn render_dimensions(raw: &str) -> String {
    let compact: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '×' | '*' | 'ｘ' | '＊' => 'x',
            other => other,
        })
        .collect::<String>()
        .replace(',', ".");

    let num = r"(\d+(?:\.\d+)?)";

    if compact.contains('⌀') || compact.contains('ø') {
        let re = Regex::new(&format!(r"[⌀ø]?{num}x{num}")).unwrap();
        if let Some(caps) = re.captures(&compact) {
            return format!("Ø×H: {}×{} mm", &caps[1], &caps[2]);
        }
    }

    let re3 = Regex::new(&format!(r"{num}x{num}x{num}")).unwrap();
    if let Some(caps) = re3.captures(&compact) {
        let triple = normalize::parse_dimension_triple(raw);
        // The triple heuristic and the pattern agree on the first three
        // tokens; render from the heuristic so both consumers line up.
        if let (Some(l), Some(w), Some(h)) = (triple.length, triple.width, triple.height) {
            return format!(
                "L×B×H: {}×{}×{} mm",
                crate::model::render_number(l),
                crate::model::render_number(w),
                crate::model::render_number(h),
            );
        }
        return format!("L×B×H: {}×{}×{} mm", &caps[1], &caps[2], &caps[3]);
    }

    let re2 = Regex::new(&format!(r"{num}x{num}")).unwrap();
    if let Some(caps) = re2.captures(&compact) {
        return format!("L×B: {}×{} mm", &caps[1], &caps[2]);
    }

    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_dimension_forms() {
        assert_eq!(render_dimensions("100 x 50 x 30"), "L×B×H: 100×50×30 mm");
        assert_eq!(render_dimensions("100×50 mm"), "L×B: 100×50 mm");
        assert_eq!(render_dimensions("ø 120 x 40"), "Ø×H: 120×40 mm");
        assert_eq!(render_dimensions("3x30x107,3x228"), "L×B×H: 3×30×107.3 mm");
        assert_eq!(render_dimensions("rund, passend"), "rund, passend");
    }

    #[test]
    fn non_200_status_is_no_usable_content() {
        let doc = Document { status: 404, body: "<html>irrelevant</html>".into() };
        let fs = extract_document("A2V1", "https://example.test/p/A2V1", &doc);
        assert_eq!(fs.status, FetchStatus::Failed("Produkt nicht gefunden (404)".into()));
        assert!(fs.fields.title.is_none());

        let doc = Document { status: 503, body: String::new() };
        let fs = extract_document("A2V1", "https://example.test/p/A2V1", &doc);
        assert_eq!(fs.status, FetchStatus::Failed("HTTP-Fehler: 503".into()));
    }

    #[test]
    fn empty_page_is_partially_succeeded() {
        let doc = Document { status: 200, body: "<html><body>leer</body></html>".into() };
        let fs = extract_document("A2V1", "https://example.test/p/A2V1", &doc);
        assert_eq!(fs.status, FetchStatus::PartiallySucceeded);
    }
}
