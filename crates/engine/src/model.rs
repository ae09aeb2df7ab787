use serde::Serialize;

use crate::normalize;

// ---------------------------------------------------------------------------
// Inventory side
// ---------------------------------------------------------------------------

/// A loosely-typed spreadsheet cell. Unit-ambiguous values ("2,5 kg" vs a
/// bare `2.5`) survive Excel typing either way.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawCell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(_) => false,
        }
    }

    /// Numeric view: numbers pass through, text goes through the
    /// locale-tolerant token parser.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawCell::Empty => None,
            RawCell::Number(n) => Some(*n),
            RawCell::Text(s) => normalize::parse_numeric_token(s),
        }
    }

    /// Textual view; `None` when the cell is blank.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawCell::Empty => None,
            RawCell::Number(n) => Some(render_number(*n)),
            RawCell::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
        }
    }
}

/// Render a cell number the way it would display in the sheet (no trailing
/// `.0` on integers).
pub fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// One row of the authoritative workbook. Identity is the row position;
/// the engine only reads it.
#[derive(Debug, Clone, Default)]
pub struct InventoryRecord {
    /// Canonical vendor identifier (column Z), e.g. "A2V00001234567".
    pub external_id: Option<String>,
    /// Manufacturer part number (column E), free-form.
    pub manufacturer_part_no: Option<String>,
    /// Short title (column C).
    pub title: Option<String>,
    /// Weight cell (column S), unit ambiguous.
    pub weight: RawCell,
    /// Dimension cells (columns U/V/W), unit ambiguous.
    pub length: RawCell,
    pub width: RawCell,
    pub height: RawCell,
    /// Material (column P).
    pub material: Option<String>,
    /// Coded material classification note (column N), e.g. "OHNE/N/N/N/N".
    pub material_note: Option<String>,
}

// ---------------------------------------------------------------------------
// Extracted side
// ---------------------------------------------------------------------------

/// Lifecycle of one identifier through the fetch orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    NotAttempted,
    Fetching,
    Succeeded,
    PartiallySucceeded,
    Failed(String),
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAttempted => write!(f, "Nicht versucht"),
            Self::Fetching => write!(f, "Wird geladen"),
            Self::Succeeded => write!(f, "Erfolgreich"),
            Self::PartiallySucceeded => write!(f, "Teilweise erfolgreich"),
            Self::Failed(reason) => write!(f, "Fehler: {reason}"),
        }
    }
}

/// Fields one extraction pass found. `None` is the not-found sentinel and
/// is distinct from an empty string a source genuinely carried.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartialFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub secondary_part_no: Option<String>,
    pub weight: Option<String>,
    /// Canonical dimension text, e.g. "L×B×H: 100×50×30 mm".
    pub dimensions: Option<String>,
    pub material: Option<String>,
    /// Classification phrase as published by the source.
    pub material_classification: Option<String>,
    /// Derived coded rating, e.g. "OHNE/N/N/N/N".
    pub classification_code: Option<String>,
    pub statistical_code: Option<String>,
    pub origin_country: Option<String>,
    pub availability: Option<String>,
}

impl PartialFields {
    /// Non-destructive merge: a field already populated by an earlier
    /// (higher-priority) pass is never replaced by a later one.
    pub fn merge_keeping_first(&mut self, later: PartialFields) {
        fill(&mut self.title, later.title);
        fill(&mut self.description, later.description);
        fill(&mut self.secondary_part_no, later.secondary_part_no);
        fill(&mut self.weight, later.weight);
        fill(&mut self.dimensions, later.dimensions);
        fill(&mut self.material, later.material);
        fill(&mut self.material_classification, later.material_classification);
        fill(&mut self.classification_code, later.classification_code);
        fill(&mut self.statistical_code, later.statistical_code);
        fill(&mut self.origin_country, later.origin_country);
        fill(&mut self.availability, later.availability);
    }

    /// True when every extractable field is populated. Lets the extractor
    /// cascade stop early; the derived classification code doesn't count,
    /// it only exists when the classification text maps.
    pub fn is_complete(&self) -> bool {
        self.title.is_some()
            && self.description.is_some()
            && self.secondary_part_no.is_some()
            && self.weight.is_some()
            && self.dimensions.is_some()
            && self.material.is_some()
            && self.material_classification.is_some()
            && self.statistical_code.is_some()
            && self.origin_country.is_some()
            && self.availability.is_some()
    }

    /// True when the pass found anything a comparison can bite on.
    pub fn has_core_data(&self) -> bool {
        self.material.is_some()
            || self.material_classification.is_some()
            || self.weight.is_some()
            || self.dimensions.is_some()
    }
}

/// Set `slot` if still unset. The single place the non-overwrite rule lives.
pub(crate) fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        if let Some(v) = value {
            *slot = Some(v);
        }
    }
}

/// The engine's output for one external document. Created fresh per fetch,
/// owned by the orchestrator until handed to the reconciler, never mutated
/// after being returned.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedFieldSet {
    pub external_id: String,
    pub source_url: String,
    pub status: FetchStatus,
    pub fields: PartialFields,
}

impl ExtractedFieldSet {
    pub fn new(external_id: &str, source_url: &str) -> Self {
        Self {
            external_id: external_id.to_string(),
            source_url: source_url.to_string(),
            status: FetchStatus::NotAttempted,
            fields: PartialFields::default(),
        }
    }

    /// Terminal failure set: every field stays at the sentinel, so all
    /// downstream verdicts come out inconclusive rather than wrong.
    pub fn failed(external_id: &str, source_url: &str, reason: impl Into<String>) -> Self {
        Self {
            external_id: external_id.to_string(),
            source_url: source_url.to_string(),
            status: FetchStatus::Failed(reason.into()),
            fields: PartialFields::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

/// Three-way comparison outcome. Absence of data is a distinct outcome from
/// disagreement and is never folded into either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Match,
    Mismatch,
    Inconclusive,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub comment: String,
}

impl Verdict {
    pub fn new(status: VerdictStatus, comment: impl Into<String>) -> Self {
        Self { status, comment: comment.into() }
    }
}

/// Per-field verdicts for one record, consumed by the report writer.
#[derive(Debug, Clone, Serialize)]
pub struct RecordVerdicts {
    pub external_id: Verdict,
    pub manufacturer_part_no: Verdict,
    pub title: Verdict,
    pub weight: Verdict,
    pub dimensions: Verdict,
    pub material: Verdict,
    pub classification: Verdict,
}
