//! Ordered label-classification rules.
//!
//! Source layouts label the same facts inconsistently ("Abmessungen",
//! "Größe", "Dimensions", …). Each harvested label is classified by keyword
//! containment against this table, top to bottom, first match wins.
//! Precedence is data here, not code order in some if-chain: a label
//! containing both "material" and "klassifizierung" hits the
//! classification rule before the generic material rule can fire.

use super::candidates::CandidatePairs;
use crate::model::{fill, PartialFields};
use crate::normalize;

/// Target field for a classified label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Dimensions,
    Weight,
    MaterialClassification,
    Material,
    SecondaryPartNo,
    StatisticalCode,
    OriginCountry,
    Availability,
}

/// One classification rule: the label must contain at least one trigger
/// from `any` and none from `none`.
pub struct LabelRule {
    pub field: FieldKey,
    pub any: &'static [&'static str],
    pub none: &'static [&'static str],
}

/// Most-specific rules first. "Gewichtseinheit" is a unit label, not a
/// weight; "Materialklassifizierung" must never feed the material field;
/// "Additional Material Numbers" is a part-number label, so it outranks the
/// generic material rule too.
pub const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        field: FieldKey::Dimensions,
        any: &["abmessung", "größe", "dimension"],
        none: &[],
    },
    LabelRule {
        field: FieldKey::Weight,
        any: &["gewicht", "weight"],
        none: &["einheit", "unit"],
    },
    LabelRule {
        field: FieldKey::MaterialClassification,
        any: &["materialklassifizierung", "material classification"],
        none: &[],
    },
    LabelRule {
        field: FieldKey::SecondaryPartNo,
        any: &[
            "weitere artikelnummer",
            "additional article number",
            "additional material",
            "part number",
        ],
        none: &[],
    },
    LabelRule {
        field: FieldKey::Material,
        any: &["werkstoff", "material"],
        none: &["klassifizierung", "classification"],
    },
    LabelRule {
        field: FieldKey::StatisticalCode,
        any: &["statistische warennummer", "statistical", "import"],
        none: &[],
    },
    LabelRule {
        field: FieldKey::OriginCountry,
        any: &["ursprungsland", "origin"],
        none: &[],
    },
    LabelRule {
        field: FieldKey::Availability,
        any: &["verfügbar", "stock", "lager"],
        none: &[],
    },
];

/// Classify a lower-cased label. `None` for labels the engine doesn't map.
pub fn classify_label(label: &str) -> Option<FieldKey> {
    LABEL_RULES
        .iter()
        .find(|rule| {
            rule.any.iter().any(|kw| label.contains(kw))
                && !rule.none.iter().any(|kw| label.contains(kw))
        })
        .map(|rule| rule.field)
}

/// Run the rule table over a candidate map, producing this pass's partial
/// field set. Writes go through `fill`, so duplicate labels mapping to the
/// same field keep the first-seen value.
pub fn apply_candidates(pairs: &CandidatePairs) -> PartialFields {
    let mut out = PartialFields::default();
    for (label, value) in pairs.iter() {
        apply_classified(&mut out, label, value);
    }
    out
}

/// Route one label/value pair into `out` under the rule table.
pub fn apply_classified(out: &mut PartialFields, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        return;
    }
    match classify_label(label) {
        Some(FieldKey::Dimensions) => {
            fill(&mut out.dimensions, Some(super::render_dimensions(value)));
        }
        Some(FieldKey::Weight) => fill(&mut out.weight, Some(value.to_string())),
        Some(FieldKey::MaterialClassification) => {
            fill(&mut out.material_classification, Some(value.to_string()));
            if let Some(code) = normalize::map_material_classification(value) {
                fill(&mut out.classification_code, Some(code.to_string()));
            }
        }
        Some(FieldKey::Material) => fill(&mut out.material, Some(value.to_string())),
        Some(FieldKey::SecondaryPartNo) => {
            fill(&mut out.secondary_part_no, Some(value.to_string()));
        }
        Some(FieldKey::StatisticalCode) => {
            fill(&mut out.statistical_code, Some(value.to_string()));
        }
        Some(FieldKey::OriginCountry) => {
            fill(&mut out.origin_country, Some(value.to_string()));
        }
        Some(FieldKey::Availability) => fill(&mut out.availability, Some(value.to_string())),
        None => {}
    }
}
