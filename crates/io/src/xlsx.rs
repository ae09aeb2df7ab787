use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use partcheck_engine::normalize::parse_dimension_triple;
use partcheck_engine::{
    ExtractedFieldSet, InventoryRecord, RawCell, RecordVerdicts, Verdict, VerdictStatus,
};
use rust_xlsxwriter::{Color, Format, Workbook as XlsxWorkbook, Worksheet};

use crate::columns;

/// 0-based index of the header row (sheet row 3).
pub const HEADER_ROW: usize = 2;
/// 0-based index of the first data row (sheet row 4).
pub const FIRST_DATA_ROW: usize = 3;

/// Columns that detect a product row when any of them is non-empty.
const PRESENCE_COLS: [usize; 4] = [0, 1, columns::TITLE, columns::EXTERNAL_ID];

/// Verdict fill colors (match the legacy report palette).
const FILL_MATCH: u32 = 0xD5F4E6;
const FILL_MISMATCH: u32 = 0xFDEAEA;
const FILL_INCONCLUSIVE: u32 = 0xFFF3CD;

/// One sheet of the inventory workbook: the raw cell grid for pass-through
/// re-rendering, plus the typed records found below the header.
#[derive(Debug)]
pub struct InventorySheet {
    pub name: String,
    pub grid: Vec<Vec<RawCell>>,
    pub records: Vec<RecordRow>,
}

/// A typed record and the grid row it came from.
#[derive(Debug)]
pub struct RecordRow {
    pub row: usize,
    pub record: InventoryRecord,
}

/// Everything the report writer needs for one processed record.
#[derive(Debug)]
pub struct RecordOutcome {
    pub row: usize,
    pub fields: ExtractedFieldSet,
    pub verdicts: RecordVerdicts,
}

/// Read the inventory workbook (xlsx, xls, xlsb, ods).
pub fn load_inventory(path: &Path) -> Result<Vec<InventorySheet>, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Arbeitsmappe konnte nicht geöffnet werden: {e}"))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err("Arbeitsmappe enthält keine Blätter".to_string());
    }

    let mut sheets = Vec::new();
    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| format!("Blatt '{name}' konnte nicht gelesen werden: {e}"))?;

        let mut grid: Vec<Vec<RawCell>> = Vec::new();
        if let Some((end_row, end_col)) = range.end() {
            for r in 0..=end_row {
                let mut row = Vec::with_capacity(end_col as usize + 1);
                for c in 0..=end_col {
                    row.push(convert_cell(range.get_value((r, c))));
                }
                grid.push(row);
            }
        }

        let records = collect_records(&grid);
        sheets.push(InventorySheet { name: name.clone(), grid, records });
    }

    Ok(sheets)
}

/// Write the report workbook: the original grid with a web-data row and a
/// color-filled comparison row inserted after each processed record.
/// `outcomes` is parallel to `sheets` and keyed by source grid row.
pub fn write_report(
    path: &Path,
    sheets: &[InventorySheet],
    outcomes: &[HashMap<usize, RecordOutcome>],
) -> Result<(), String> {
    let mut workbook = XlsxWorkbook::new();

    for (sheet_idx, sheet) in sheets.iter().enumerate() {
        let worksheet = workbook
            .add_worksheet()
            .set_name(&sheet.name)
            .map_err(|e| format!("Blatt '{}' konnte nicht angelegt werden: {e}", sheet.name))?;

        let empty = HashMap::new();
        let sheet_outcomes = outcomes.get(sheet_idx).unwrap_or(&empty);

        let mut out_row: u32 = 0;
        for (src_row, cells) in sheet.grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                write_cell(worksheet, out_row, col as u16, cell)?;
            }
            out_row += 1;

            if let Some(outcome) = sheet_outcomes.get(&src_row) {
                write_web_row(worksheet, out_row, &outcome.fields)?;
                out_row += 1;
                write_comparison_row(worksheet, out_row, &outcome.verdicts)?;
                out_row += 1;
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| format!("Bericht konnte nicht gespeichert werden: {e}"))
}

// ---------------------------------------------------------------------------
// Import helpers
// ---------------------------------------------------------------------------

fn convert_cell(value: Option<&Data>) -> RawCell {
    match value {
        None | Some(Data::Empty) | Some(Data::Error(_)) => RawCell::Empty,
        Some(Data::String(s)) => RawCell::Text(s.clone()),
        Some(Data::Float(n)) => RawCell::Number(*n),
        Some(Data::Int(n)) => RawCell::Number(*n as f64),
        Some(Data::Bool(b)) => RawCell::Text(b.to_string()),
        Some(Data::DateTime(dt)) => RawCell::Number(dt.as_f64()),
        Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => RawCell::Text(s.clone()),
    }
}

fn collect_records(grid: &[Vec<RawCell>]) -> Vec<RecordRow> {
    let mut records = Vec::new();
    for (row, cells) in grid.iter().enumerate().skip(FIRST_DATA_ROW) {
        let present = PRESENCE_COLS
            .iter()
            .any(|&c| cells.get(c).is_some_and(|cell| !cell.is_empty()));
        if present {
            records.push(RecordRow { row, record: record_from_row(cells) });
        }
    }
    records
}

fn record_from_row(cells: &[RawCell]) -> InventoryRecord {
    let cell = |c: usize| cells.get(c).cloned().unwrap_or_default();
    let text = |c: usize| cell(c).as_text();

    InventoryRecord {
        external_id: text(columns::EXTERNAL_ID),
        manufacturer_part_no: text(columns::PART_NO),
        title: text(columns::TITLE),
        weight: cell(columns::WEIGHT),
        length: cell(columns::LENGTH),
        width: cell(columns::WIDTH),
        height: cell(columns::HEIGHT),
        material: text(columns::MATERIAL),
        material_note: text(columns::CLASSIFICATION),
    }
}

// ---------------------------------------------------------------------------
// Export helpers
// ---------------------------------------------------------------------------

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, cell: &RawCell) -> Result<(), String> {
    let result = match cell {
        RawCell::Empty => return Ok(()),
        RawCell::Text(s) => ws.write_string(row, col, s),
        RawCell::Number(n) => ws.write_number(row, col, *n),
    };
    result.map_err(|e| format!("Zelle ({row},{col}) konnte nicht geschrieben werden: {e}"))?;
    Ok(())
}

/// The web-data row carries only allow-listed columns; dimensions are
/// split back into the three axis columns.
fn write_web_row(ws: &mut Worksheet, row: u32, fields: &ExtractedFieldSet) -> Result<(), String> {
    let f = &fields.fields;

    write_opt_string(ws, row, columns::EXTERNAL_ID, Some(&fields.external_id))?;
    write_opt_string(ws, row, columns::PART_NO, f.secondary_part_no.as_deref())?;
    write_opt_string(ws, row, columns::TITLE, f.title.as_deref())?;
    write_opt_string(ws, row, columns::WEIGHT, f.weight.as_deref())?;

    if let Some(dim_text) = f.dimensions.as_deref() {
        let triple = parse_dimension_triple(dim_text);
        for (col, axis) in [
            (columns::LENGTH, triple.length),
            (columns::WIDTH, triple.width),
            (columns::HEIGHT, triple.height),
        ] {
            if let Some(value) = axis {
                ws.write_number(row, col as u16, value)
                    .map_err(|e| format!("Achsenwert konnte nicht geschrieben werden: {e}"))?;
            }
        }
    }

    write_opt_string(ws, row, columns::MATERIAL, f.material.as_deref())?;
    write_opt_string(ws, row, columns::CLASSIFICATION, f.classification_code.as_deref())?;
    Ok(())
}

/// Comparison row: verdict comment plus status fill per compared column.
/// The dimension verdict goes into the length column only.
fn write_comparison_row(ws: &mut Worksheet, row: u32, v: &RecordVerdicts) -> Result<(), String> {
    for (col, verdict) in [
        (columns::EXTERNAL_ID, &v.external_id),
        (columns::PART_NO, &v.manufacturer_part_no),
        (columns::TITLE, &v.title),
        (columns::WEIGHT, &v.weight),
        (columns::LENGTH, &v.dimensions),
        (columns::MATERIAL, &v.material),
        (columns::CLASSIFICATION, &v.classification),
    ] {
        write_verdict(ws, row, col, verdict)?;
    }
    Ok(())
}

fn write_verdict(ws: &mut Worksheet, row: u32, col: usize, verdict: &Verdict) -> Result<(), String> {
    ws.write_string_with_format(row, col as u16, &verdict.comment, &verdict_fill(verdict.status))
        .map_err(|e| format!("Vergleichszelle konnte nicht geschrieben werden: {e}"))?;
    Ok(())
}

fn write_opt_string(
    ws: &mut Worksheet,
    row: u32,
    col: usize,
    value: Option<&str>,
) -> Result<(), String> {
    if let Some(value) = value {
        ws.write_string(row, col as u16, value)
            .map_err(|e| format!("Webdaten-Zelle konnte nicht geschrieben werden: {e}"))?;
    }
    Ok(())
}

fn verdict_fill(status: VerdictStatus) -> Format {
    let rgb = match status {
        VerdictStatus::Match => FILL_MATCH,
        VerdictStatus::Mismatch => FILL_MISMATCH,
        VerdictStatus::Inconclusive => FILL_INCONCLUSIVE,
    };
    Format::new().set_background_color(Color::RGB(rgb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use partcheck_engine::{reconcile_record, FetchStatus, PartialFields, WeightTolerance};

    /// Build a minimal inventory workbook on disk via rust_xlsxwriter.
    fn write_fixture(path: &Path) {
        let mut wb = XlsxWorkbook::new();
        let ws = wb.add_worksheet().set_name("Bestand").unwrap();

        ws.write_string(HEADER_ROW as u32, columns::TITLE as u16, "Kurztext").unwrap();
        let r = FIRST_DATA_ROW as u32;
        ws.write_string(r, columns::EXTERNAL_ID as u16, "A2V00002146432").unwrap();
        ws.write_string(r, columns::PART_NO as u16, "7603-296").unwrap();
        ws.write_string(r, columns::TITLE as u16, "Bremsscheibe").unwrap();
        ws.write_number(r, columns::WEIGHT as u16, 12.5).unwrap();
        ws.write_number(r, columns::LENGTH as u16, 100.0).unwrap();
        ws.write_number(r, columns::WIDTH as u16, 50.0).unwrap();
        ws.write_number(r, columns::HEIGHT as u16, 30.0).unwrap();
        ws.write_string(r, columns::MATERIAL as u16, "S355").unwrap();
        ws.write_string(r, columns::CLASSIFICATION as u16, "OHNE/N/N/N/N").unwrap();
        // A blank spacer row, then a second record with only an id.
        ws.write_string(r + 2, columns::EXTERNAL_ID as u16, "A2V00001111111").unwrap();

        wb.save(path).unwrap();
    }

    #[test]
    fn load_finds_records_below_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bestand.xlsx");
        write_fixture(&path);

        let sheets = load_inventory(&path).unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].name, "Bestand");
        assert_eq!(sheets[0].records.len(), 2);

        let first = &sheets[0].records[0];
        assert_eq!(first.row, FIRST_DATA_ROW);
        assert_eq!(first.record.external_id.as_deref(), Some("A2V00002146432"));
        assert_eq!(first.record.title.as_deref(), Some("Bremsscheibe"));
        assert_eq!(first.record.weight, RawCell::Number(12.5));
        assert_eq!(first.record.material_note.as_deref(), Some("OHNE/N/N/N/N"));

        let second = &sheets[0].records[1];
        assert_eq!(second.record.external_id.as_deref(), Some("A2V00001111111"));
        assert!(second.record.title.is_none());
    }

    #[test]
    fn report_inserts_two_rows_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bestand.xlsx");
        let output = dir.path().join("bericht.xlsx");
        write_fixture(&input);

        let sheets = load_inventory(&input).unwrap();
        let record = &sheets[0].records[0];

        let mut fields = ExtractedFieldSet::new(
            "A2V00002146432",
            "https://example.test/p/A2V00002146432",
        );
        fields.status = FetchStatus::Succeeded;
        fields.fields = PartialFields {
            title: Some("Bremsscheibe".into()),
            secondary_part_no: Some("7 603 296".into()),
            weight: Some("12,5 kg".into()),
            dimensions: Some("L×B×H: 100×50×30 mm".into()),
            material: Some("S355".into()),
            material_classification: Some("nicht schweißbar".into()),
            classification_code: Some("OHNE/N/N/N/N".into()),
            ..Default::default()
        };
        let verdicts = reconcile_record(&record.record, &fields, &WeightTolerance::default());

        let mut outcomes = HashMap::new();
        outcomes.insert(record.row, RecordOutcome { row: record.row, fields, verdicts });
        write_report(&output, &sheets, &[outcomes]).unwrap();

        // Re-read the report: the web row and comparison row sit directly
        // below the record row, shifting the second record down by two.
        let report = load_inventory(&output).unwrap();
        let grid = &report[0].grid;
        let web_row = &grid[FIRST_DATA_ROW + 1];
        assert_eq!(
            web_row[columns::EXTERNAL_ID].as_text().as_deref(),
            Some("A2V00002146432")
        );
        assert_eq!(web_row[columns::LENGTH], RawCell::Number(100.0));
        assert_eq!(web_row[columns::CLASSIFICATION].as_text().as_deref(), Some("OHNE/N/N/N/N"));

        let cmp_row = &grid[FIRST_DATA_ROW + 2];
        assert_eq!(cmp_row[columns::TITLE].as_text().as_deref(), Some("identisch"));
        assert_eq!(
            cmp_row[columns::PART_NO].as_text().as_deref(),
            Some("identisch (normalisiert)")
        );

        let moved = &grid[FIRST_DATA_ROW + 4];
        assert_eq!(
            moved[columns::EXTERNAL_ID].as_text().as_deref(),
            Some("A2V00001111111")
        );
    }
}
