//! End-to-end extraction + reconciliation over a realistic product page.

use partcheck_engine::{
    extract_document, reconcile_record, Document, FetchStatus, InventoryRecord, RawCell,
    VerdictStatus, WeightTolerance,
};

const PRODUCT_PAGE: &str = r#"
<html>
<head><title>Bremsscheibe 640x110 | MoBase</title></head>
<body>
  <h1>Bremsscheibe 640x110</h1>
  <table class="technical-data">
    <tr><th>Gewicht</th><td>12,5 kg</td></tr>
    <tr><th>Gewichtseinheit</th><td>kg</td></tr>
    <tr><th>Abmessungen</th><td>100 x 50 x 30 mm</td></tr>
    <tr><th>Werkstoff</th><td>S355J2G3</td></tr>
    <tr><th>Materialklassifizierung</th><td>Material ist nicht schweissbar, gussfähig, klebbar oder schmiedbar</td></tr>
  </table>
  <dl>
    <dt>Ursprungsland</dt><dd>Deutschland</dd>
  </dl>
  <script>
    window.initialData = {"product/dataProduct":{"data":{"product":{
      "name": "Ganz anderer Titel",
      "code": "A2V00002146432",
      "localizations": {"technicalSpecifications": [
        {"key": "Weitere Artikelnummer", "value": "7 603 296"},
        {"key": "Statistische Warennummer", "value": "86073080"},
        {"key": "Gewicht", "value": "999 kg"}
      ]},
      "importCodeNumber": "00000000"
    }}}};
  </script>
  <div class="product-info">
    Verfügbarkeit: auf Lager
  </div>
</body>
</html>"#;

fn fetch_fixture() -> partcheck_engine::ExtractedFieldSet {
    let doc = Document { status: 200, body: PRODUCT_PAGE.to_string() };
    extract_document(
        "A2V00002146432",
        "https://www.mymobase.com/de/p/A2V00002146432",
        &doc,
    )
}

#[test]
fn table_path_wins_over_embedded_object() {
    let fs = fetch_fixture();
    assert_eq!(fs.status, FetchStatus::Succeeded);
    // Table value survives; the embedded "999 kg" and the conflicting
    // embedded title may only fill gaps.
    assert_eq!(fs.fields.weight.as_deref(), Some("12,5 kg"));
    assert_eq!(fs.fields.title.as_deref(), Some("Bremsscheibe 640x110"));
}

#[test]
fn embedded_object_fills_gaps() {
    let fs = fetch_fixture();
    assert_eq!(fs.fields.secondary_part_no.as_deref(), Some("7 603 296"));
    // Spec-list entry beats the direct importCodeNumber property.
    assert_eq!(fs.fields.statistical_code.as_deref(), Some("86073080"));
}

#[test]
fn text_path_is_last_resort() {
    let fs = fetch_fixture();
    assert_eq!(fs.fields.availability.as_deref(), Some("auf Lager"));
}

#[test]
fn dimensions_are_rendered_canonically() {
    let fs = fetch_fixture();
    assert_eq!(fs.fields.dimensions.as_deref(), Some("L×B×H: 100×50×30 mm"));
}

#[test]
fn classification_code_is_derived() {
    let fs = fetch_fixture();
    assert_eq!(fs.fields.classification_code.as_deref(), Some("OHNE/N/N/N/N"));
    assert_eq!(fs.fields.material.as_deref(), Some("S355J2G3"));
}

#[test]
fn full_reconciliation_verdicts() {
    let fs = fetch_fixture();
    let record = InventoryRecord {
        external_id: Some("A2V00002146432".into()),
        manufacturer_part_no: Some("7603-296".into()),
        title: Some("Bremsscheibe 640x110".into()),
        weight: RawCell::Number(12.5),
        length: RawCell::Number(100.0),
        width: RawCell::Number(50.0),
        height: RawCell::Number(30.0),
        material: Some("S355J2G3".into()),
        material_note: Some("OHNE/N/N/N/N".into()),
    };

    let verdicts = reconcile_record(&record, &fs, &WeightTolerance::default());
    assert_eq!(verdicts.external_id.status, VerdictStatus::Match);
    assert_eq!(verdicts.manufacturer_part_no.status, VerdictStatus::Match);
    assert_eq!(verdicts.title.status, VerdictStatus::Match);
    assert_eq!(verdicts.weight.status, VerdictStatus::Match);
    assert_eq!(verdicts.dimensions.status, VerdictStatus::Match);
    assert_eq!(verdicts.material.status, VerdictStatus::Match);
    assert_eq!(verdicts.classification.status, VerdictStatus::Match);
}

#[test]
fn mismatching_record_is_flagged_not_inconclusive() {
    let fs = fetch_fixture();
    let record = InventoryRecord {
        external_id: Some("A2V00002146432".into()),
        manufacturer_part_no: Some("0000000".into()),
        title: Some("Radsatzwelle".into()),
        weight: RawCell::Number(11.0),
        length: RawCell::Number(100.0),
        width: RawCell::Number(50.0),
        height: RawCell::Number(31.0),
        material: Some("42CrMo4".into()),
        material_note: Some("OHNE/N/N/N/N".into()),
    };

    let verdicts = reconcile_record(&record, &fs, &WeightTolerance::default());
    assert_eq!(verdicts.manufacturer_part_no.status, VerdictStatus::Mismatch);
    assert_eq!(verdicts.title.status, VerdictStatus::Mismatch);
    assert_eq!(verdicts.weight.status, VerdictStatus::Mismatch);
    assert!(verdicts.weight.comment.contains('Δ'));
    assert_eq!(verdicts.dimensions.status, VerdictStatus::Mismatch);
    assert_eq!(verdicts.material.status, VerdictStatus::Mismatch);
}
