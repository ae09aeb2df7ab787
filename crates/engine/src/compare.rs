//! Field comparators producing three-way verdicts.
//!
//! Every comparator distinguishes "sides disagree" (Mismatch) from "a side
//! is missing" (Inconclusive). Verdict comments carry the operator-facing
//! German strings the report renders verbatim.

use serde::Deserialize;

use crate::model::{
    ExtractedFieldSet, InventoryRecord, RawCell, RecordVerdicts, Verdict, VerdictStatus,
};
use crate::normalize;

/// Weight comparison policy. The default is strict: any non-zero delta
/// beyond the float-noise epsilon is a mismatch. A percentage tolerance can
/// be configured per run.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeightTolerance {
    /// Accepted relative delta in percent of the inventory-side value.
    #[serde(default)]
    pub pct: f64,
    /// Absolute floor so a zero inventory weight doesn't reject float noise.
    #[serde(default = "default_eps")]
    pub eps: f64,
}

fn default_eps() -> f64 {
    1e-6
}

impl Default for WeightTolerance {
    fn default() -> Self {
        Self { pct: 0.0, eps: default_eps() }
    }
}

impl WeightTolerance {
    pub fn percent(pct: f64) -> Self {
        Self { pct, ..Self::default() }
    }

    fn accepts(&self, excel_kg: f64, web_kg: f64) -> bool {
        let tol = excel_kg.abs() * (self.pct / 100.0);
        (web_kg - excel_kg).abs() <= tol.max(self.eps)
    }
}

// ---------------------------------------------------------------------------
// Comparators
// ---------------------------------------------------------------------------

/// Case- and whitespace-folded text equality.
pub fn compare_text(excel: Option<&str>, web: Option<&str>) -> Verdict {
    match missing_sides(excel, web) {
        Some(v) => v,
        None => {
            let a = fold_text(excel.unwrap_or(""));
            let b = fold_text(web.unwrap_or(""));
            if a == b {
                Verdict::new(VerdictStatus::Match, "identisch")
            } else {
                Verdict::new(VerdictStatus::Mismatch, "abweichend")
            }
        }
    }
}

/// Part-number equality after identifier folding (case, whitespace,
/// hyphens).
pub fn compare_part_no(excel: Option<&str>, web: Option<&str>) -> Verdict {
    match missing_sides(excel, web) {
        Some(v) => v,
        None => {
            let a = excel.unwrap_or("");
            let b = web.unwrap_or("");
            if normalize::normalize_part_no(a) == normalize::normalize_part_no(b) {
                Verdict::new(VerdictStatus::Match, "identisch (normalisiert)")
            } else {
                Verdict::new(
                    VerdictStatus::Mismatch,
                    format!("abweichend: Excel {a} vs. Web {b}"),
                )
            }
        }
    }
}

/// Weight comparison in kilograms under the configured tolerance. The
/// comment always reports the relative delta to one decimal place.
pub fn compare_weight(excel: &RawCell, web: Option<&str>, tolerance: &WeightTolerance) -> Verdict {
    let excel_kg = match excel {
        RawCell::Number(n) => Some(*n),
        RawCell::Text(s) => normalize::normalize_mass_kg(s),
        RawCell::Empty => None,
    };
    let web_kg = web.and_then(normalize::normalize_mass_kg);

    match (excel_kg, web_kg) {
        (None, None) => Verdict::new(VerdictStatus::Inconclusive, "Beide fehlen"),
        (None, Some(_)) => Verdict::new(VerdictStatus::Inconclusive, "Excel fehlt"),
        (Some(_), None) => Verdict::new(VerdictStatus::Inconclusive, "Web fehlt/unklar"),
        (Some(ex), Some(wb)) => {
            let delta_pct = (wb - ex) / ex.abs().max(1e-9) * 100.0;
            if tolerance.accepts(ex, wb) {
                Verdict::new(VerdictStatus::Match, format!("Δ {delta_pct:.1}%"))
            } else {
                Verdict::new(
                    VerdictStatus::Mismatch,
                    format!("Excel {ex:.3} kg vs. Web {wb:.3} kg (Δ {delta_pct:.1}%)"),
                )
            }
        }
    }
}

/// Dimension comparison: inventory axes are raw numbers, the web side goes
/// through the triple heuristic. Every axis present on both sides must
/// match within 1e-6; one bad axis fails the whole triple.
pub fn compare_dimensions(
    length: &RawCell,
    width: &RawCell,
    height: &RawCell,
    web_text: Option<&str>,
) -> Verdict {
    let ex = [length.as_number(), width.as_number(), height.as_number()];
    let web = web_text
        .map(normalize::parse_dimension_triple)
        .unwrap_or_default();
    let wb = [web.length, web.width, web.height];

    let any_excel = ex.iter().any(Option::is_some);
    let any_web = wb.iter().any(Option::is_some);

    if !any_excel && !any_web {
        return Verdict::new(VerdictStatus::Inconclusive, "Beide fehlen");
    }
    if !any_excel {
        return Verdict::new(VerdictStatus::Inconclusive, "Excel fehlt");
    }
    if !any_web {
        return Verdict::new(VerdictStatus::Inconclusive, "Web fehlt/unklar");
    }

    let mut common = 0;
    let mut all_equal = true;
    for (a, b) in ex.iter().zip(wb.iter()) {
        if let (Some(a), Some(b)) = (a, b) {
            common += 1;
            if (a - b).abs() >= 1e-6 {
                all_equal = false;
            }
        }
    }

    if common > 0 && all_equal {
        Verdict::new(VerdictStatus::Match, "L×B×H identisch (mm)")
    } else {
        Verdict::new(
            VerdictStatus::Mismatch,
            format!(
                "Excel {}×{}×{} mm vs. Web {}×{}×{} mm",
                fmt_axis(ex[0]),
                fmt_axis(ex[1]),
                fmt_axis(ex[2]),
                fmt_axis(wb[0]),
                fmt_axis(wb[1]),
                fmt_axis(wb[2]),
            ),
        )
    }
}

/// Map the web-side classification phrase to its code, then require
/// case-insensitive equality against the inventory code.
pub fn compare_material_classification(excel_code: Option<&str>, web_text: Option<&str>) -> Verdict {
    let excel = excel_code.map(str::trim).filter(|s| !s.is_empty());
    let mapped = web_text.and_then(normalize::map_material_classification);

    match (excel, mapped) {
        (None, None) => Verdict::new(VerdictStatus::Inconclusive, "Beide fehlen"),
        (None, Some(_)) => Verdict::new(VerdictStatus::Inconclusive, "Excel fehlt"),
        (Some(_), None) => Verdict::new(VerdictStatus::Inconclusive, "Web nicht interpretierbar"),
        (Some(code), Some(mapped)) => {
            if code.eq_ignore_ascii_case(mapped) {
                Verdict::new(VerdictStatus::Match, "identisch")
            } else {
                Verdict::new(
                    VerdictStatus::Mismatch,
                    format!("Excel {code} vs. Web {mapped}"),
                )
            }
        }
    }
}

/// Per-field verdicts for one inventory record against one field set. The
/// engine-level entry point for the batch driver.
pub fn reconcile_record(
    record: &InventoryRecord,
    fields: &ExtractedFieldSet,
    tolerance: &WeightTolerance,
) -> RecordVerdicts {
    let f = &fields.fields;
    let web_id = if fields.external_id.trim().is_empty() {
        None
    } else {
        Some(fields.external_id.as_str())
    };

    RecordVerdicts {
        external_id: compare_text(record.external_id.as_deref(), web_id),
        manufacturer_part_no: compare_part_no(
            record.manufacturer_part_no.as_deref(),
            f.secondary_part_no.as_deref(),
        ),
        title: compare_text(record.title.as_deref(), f.title.as_deref()),
        weight: compare_weight(&record.weight, f.weight.as_deref(), tolerance),
        dimensions: compare_dimensions(
            &record.length,
            &record.width,
            &record.height,
            f.dimensions.as_deref(),
        ),
        material: compare_text(record.material.as_deref(), f.material.as_deref()),
        classification: compare_material_classification(
            record.material_note.as_deref(),
            f.material_classification.as_deref(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Shared missing-side logic for the text-like comparators. `None` means
/// both sides are present.
fn missing_sides(excel: Option<&str>, web: Option<&str>) -> Option<Verdict> {
    let excel_missing = excel.map_or(true, |s| s.trim().is_empty());
    let web_missing = web.map_or(true, |s| s.trim().is_empty());
    match (excel_missing, web_missing) {
        (true, true) => Some(Verdict::new(VerdictStatus::Inconclusive, "Beide fehlen")),
        (true, false) => Some(Verdict::new(VerdictStatus::Inconclusive, "Excel fehlt")),
        (false, true) => Some(Verdict::new(VerdictStatus::Inconclusive, "Web fehlt")),
        (false, false) => None,
    }
}

fn fold_text(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn fmt_axis(v: Option<f64>) -> String {
    match v {
        Some(n) => crate::model::render_number(n),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_missing_sides() {
        let v = compare_text(Some(""), Some("anything"));
        assert_eq!(v.status, VerdictStatus::Inconclusive);
        assert_eq!(v.comment, "Excel fehlt");

        let v = compare_text(None, None);
        assert_eq!(v.status, VerdictStatus::Inconclusive);
        assert_eq!(v.comment, "Beide fehlen");

        let v = compare_text(Some("Bremsscheibe"), None);
        assert_eq!(v.comment, "Web fehlt");
    }

    #[test]
    fn text_folding() {
        let v = compare_text(Some("  Brems  Scheibe "), Some("brems scheibe"));
        assert_eq!(v.status, VerdictStatus::Match);
        let v = compare_text(Some("Bremsscheibe"), Some("Radsatzwelle"));
        assert_eq!(v.status, VerdictStatus::Mismatch);
    }

    #[test]
    fn part_no_normalized_equality() {
        let v = compare_part_no(Some("abc-123"), Some("ABC 123"));
        assert_eq!(v.status, VerdictStatus::Match);
        let v = compare_part_no(Some("abc-123"), Some("abc-124"));
        assert_eq!(v.status, VerdictStatus::Mismatch);
        assert!(v.comment.contains("abc-123"));
    }

    #[test]
    fn weight_strict_default_rejects_small_delta() {
        let tol = WeightTolerance::default();
        let v = compare_weight(&RawCell::Number(10.0), Some("10,001 kg"), &tol);
        assert_eq!(v.status, VerdictStatus::Mismatch);
        assert!(v.comment.contains("Δ 0.0%"), "comment: {}", v.comment);
    }

    #[test]
    fn weight_five_percent_accepts_same_delta() {
        let tol = WeightTolerance::percent(5.0);
        let v = compare_weight(&RawCell::Number(10.0), Some("10,001 kg"), &tol);
        assert_eq!(v.status, VerdictStatus::Match);
    }

    #[test]
    fn weight_unit_mix() {
        let tol = WeightTolerance::default();
        let v = compare_weight(&RawCell::Text("0,5 kg".into()), Some("500 g"), &tol);
        assert_eq!(v.status, VerdictStatus::Match);
    }

    #[test]
    fn weight_missing_sides() {
        let tol = WeightTolerance::default();
        let v = compare_weight(&RawCell::Empty, Some("1 kg"), &tol);
        assert_eq!(v.comment, "Excel fehlt");
        let v = compare_weight(&RawCell::Number(1.0), Some("unbekannt"), &tol);
        assert_eq!(v.comment, "Web fehlt/unklar");
    }

    #[test]
    fn dimensions_exact_match() {
        let v = compare_dimensions(
            &RawCell::Number(100.0),
            &RawCell::Number(50.0),
            &RawCell::Number(30.0),
            Some("L×B×H: 100×50×30 mm"),
        );
        assert_eq!(v.status, VerdictStatus::Match);
    }

    #[test]
    fn dimensions_one_axis_off_fails_triple() {
        let v = compare_dimensions(
            &RawCell::Number(100.0),
            &RawCell::Number(50.0),
            &RawCell::Number(30.0),
            Some("L×B×H: 100×50×31 mm"),
        );
        assert_eq!(v.status, VerdictStatus::Mismatch);
        assert!(v.comment.contains("100×50×30"));
        assert!(v.comment.contains("100×50×31"));
    }

    #[test]
    fn dimensions_missing_sides() {
        let v = compare_dimensions(&RawCell::Empty, &RawCell::Empty, &RawCell::Empty, None);
        assert_eq!(v.comment, "Beide fehlen");
        let v = compare_dimensions(
            &RawCell::Number(10.0),
            &RawCell::Empty,
            &RawCell::Empty,
            Some("ohne Angabe"),
        );
        assert_eq!(v.comment, "Web fehlt/unklar");
    }

    #[test]
    fn classification_mapping() {
        let v = compare_material_classification(
            Some("OHNE/N/N/N/N"),
            Some("Material ist nicht schweissbar, gießbar, klebbar oder schmiedbar"),
        );
        assert_eq!(v.status, VerdictStatus::Match);

        let v = compare_material_classification(Some("OHNE/N/N/N/N"), Some("frei schweißbar"));
        assert_eq!(v.status, VerdictStatus::Inconclusive);
        assert_eq!(v.comment, "Web nicht interpretierbar");
    }

    #[test]
    fn reconcile_failed_fetch_is_all_inconclusive() {
        let record = InventoryRecord {
            external_id: Some("A2V00001".into()),
            title: Some("Bremsscheibe".into()),
            weight: RawCell::Number(12.0),
            ..Default::default()
        };
        let fs = ExtractedFieldSet::failed("A2V00001", "https://example.test/p/A2V00001", "timeout");
        let verdicts = reconcile_record(&record, &fs, &WeightTolerance::default());
        // external id still echoes back and matches; the data fields don't.
        assert_eq!(verdicts.external_id.status, VerdictStatus::Match);
        assert_eq!(verdicts.title.status, VerdictStatus::Inconclusive);
        assert_eq!(verdicts.weight.status, VerdictStatus::Inconclusive);
        assert_eq!(verdicts.dimensions.status, VerdictStatus::Inconclusive);
    }
}
