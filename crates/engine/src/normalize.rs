//! Locale- and unit-tolerant normalization of raw tokens.
//!
//! Every function here is pure and total: unparseable input yields `None`
//! (or an empty string for identifier folding), never an error. Canonical
//! units are kilograms for mass and millimeters for length.

use regex::Regex;

/// Up to three axis values in millimeters, extracted positionally.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DimensionTriple {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl DimensionTriple {
    pub fn any_axis(&self) -> bool {
        self.length.is_some() || self.width.is_some() || self.height.is_some()
    }
}

/// Extract the first signed decimal run from `raw`. Whitespace is stripped
/// and a comma counts as the decimal separator ("2,5" == 2.5).
pub fn parse_numeric_token(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.replace(',', ".");
    let re = Regex::new(r"-?\d+(?:\.\d+)?").unwrap();
    re.find(&compact)?.as_str().parse::<f64>().ok()
}

/// Normalize a raw weight string to kilograms.
///
/// Unit markers are matched by substring containment on the lower-cased,
/// whitespace-free string. "mg" is checked before "g", and the bare gram
/// marker must exclude "kg"; an unmarked value is assumed to be kilograms
/// already.
pub fn normalize_mass_kg(raw: &str) -> Option<f64> {
    let s = compact_lower(raw);
    if s.is_empty() {
        return None;
    }
    let num = parse_numeric_token(&s)?;
    if s.contains("mg") {
        return Some(num / 1e6);
    }
    if s.contains('g') && !s.contains("kg") {
        return Some(num / 1000.0);
    }
    if s.contains('t') {
        return Some(num * 1000.0);
    }
    Some(num)
}

/// Normalize a raw length string to millimeters. Unmarked values are
/// assumed to be millimeters; "m" must exclude the "mm" marker.
pub fn normalize_length_mm(raw: &str) -> Option<f64> {
    let s = compact_lower(raw);
    if s.is_empty() {
        return None;
    }
    let num = parse_numeric_token(&s)?;
    if s.contains("cm") {
        return Some(num * 10.0);
    }
    if s.contains('m') && !s.contains("mm") {
        return Some(num * 1000.0);
    }
    Some(num)
}

/// Best-effort split of free-form dimension text into L/W/H millimeters.
///
/// Multiplication symbols (×, x, X, *, fullwidth variants) collapse to one
/// separator, whitespace is stripped, then the first three decimal tokens
/// are taken positionally. This is a heuristic, not a grammar: any text
/// with at least one numeric run produces a partial result.
///
/// `"BT 3x30x107,3x228"` yields 3 / 30 / 107.3 — the fourth token is
/// dropped.
pub fn parse_dimension_triple(raw: &str) -> DimensionTriple {
    let s = collapse_separators(raw);
    let re = Regex::new(r"-?\d+(?:\.\d+)?").unwrap();
    let mut tokens = re.find_iter(&s).map(|m| m.as_str().to_string());

    DimensionTriple {
        length: tokens.next().and_then(|t| normalize_length_mm(&t)),
        width: tokens.next().and_then(|t| normalize_length_mm(&t)),
        height: tokens.next().and_then(|t| normalize_length_mm(&t)),
    }
}

/// Fold a part number for tolerant matching: uppercase, no whitespace, no
/// hyphens.
pub fn normalize_part_no(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Map a material-classification phrase to the coded rating the workbook
/// carries in column N. Only the canonical negation phrase (not weldable /
/// castable / bondable / forgeable) is recognized.
pub fn map_material_classification(raw: &str) -> Option<&'static str> {
    let t = raw.to_lowercase();
    let not_weldable = t.contains("nicht") && (t.contains("schweiss") || t.contains("schweiß"));
    if not_weldable {
        return Some("OHNE/N/N/N/N");
    }
    None
}

/// Lowercase, strip whitespace, comma becomes decimal point.
fn compact_lower(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replace(',', ".")
}

/// Normalize the separator zoo in dimension strings: fullwidth commas to
/// plain, every multiplication symbol to a single `x`, whitespace gone,
/// comma as decimal point.
fn collapse_separators(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '，' | '、' => ',',
            '×' | '*' | 'ｘ' | '＊' => 'x',
            other => other,
        })
        .collect::<String>()
        .replace(',', ".")
}
