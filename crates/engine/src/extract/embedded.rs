//! Embedded product object: some catalog pages ship a richer JSON state
//! blob (`window.initialData = {...};`) alongside the rendered tables.
//! When present it is the second extraction path, filling gaps the table
//! path left.

use serde_json::Value;

use super::rules::apply_classified;
use crate::model::{fill, PartialFields};

const MARKER: &str = "window.initialData";

/// Locate and parse the embedded state object. Returns the product node,
/// or `None` when the page carries no island or it doesn't parse.
pub fn parse_embedded(body: &str) -> Option<Value> {
    let start = body.find(MARKER)?;
    let after = &body[start + MARKER.len()..];
    let eq = after.find('=')?;
    let json = extract_json_object(&after[eq + 1..])?;
    let root: Value = serde_json::from_str(json).ok()?;
    let product = root.get("product/dataProduct")?.get("data")?.get("product")?;
    Some(product.clone())
}

/// Map the embedded product object to a partial field set: name and
/// description directly, technical-specification entries through the label
/// rules, then direct properties as in-object fallback.
pub fn apply_embedded(product: &Value) -> PartialFields {
    let mut out = PartialFields::default();

    fill(&mut out.title, value_text(product.get("name")));
    fill(&mut out.description, value_text(product.get("description")));

    let specs = product
        .get("localizations")
        .and_then(|l| l.get("technicalSpecifications"))
        .and_then(Value::as_array);
    if let Some(specs) = specs {
        for spec in specs {
            let key = spec.get("key").and_then(Value::as_str).unwrap_or("");
            if let Some(value) = value_text(spec.get("value")) {
                apply_classified(&mut out, &key.trim().to_lowercase(), &value);
            }
        }
    }

    // Direct properties only plug holes the specification list left.
    fill(&mut out.weight, value_text(product.get("weight")));
    fill(&mut out.dimensions, value_text(product.get("dimensions")));
    fill(&mut out.material, value_text(product.get("basicMaterial")));
    fill(
        &mut out.material_classification,
        value_text(product.get("materialClassification")),
    );
    fill(
        &mut out.statistical_code,
        value_text(product.get("importCodeNumber")),
    );
    fill(
        &mut out.secondary_part_no,
        value_text(product.get("additionalMaterialNumbers")),
    );

    if out.classification_code.is_none() {
        if let Some(text) = out.material_classification.as_deref() {
            if let Some(code) = crate::normalize::map_material_classification(text) {
                out.classification_code = Some(code.to_string());
            }
        }
    }

    out
}

/// Scalar JSON value as non-empty trimmed text.
fn value_text(v: Option<&Value>) -> Option<String> {
    let text = match v? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Slice the balanced `{...}` object starting at the first brace,
/// respecting string literals and escapes. Script islands end with
/// arbitrary trailing code, so a plain regex can't find the closing brace.
fn extract_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
