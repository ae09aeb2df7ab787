//! `partcheck run` — the batch driver: workbook in, report out.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use partcheck_engine::{reconcile_record, ExtractedFieldSet, WeightTolerance};
use partcheck_fetch::{CatalogClient, Orchestrator};
use partcheck_io::{load_inventory, write_report, InventorySheet, RecordOutcome};

use crate::config::AppConfig;
use crate::CliError;

pub fn cmd_run(
    input: PathBuf,
    out: PathBuf,
    config_path: Option<&Path>,
    concurrency: Option<usize>,
    tolerance_pct: Option<f64>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = AppConfig::load(config_path)?;
    let catalog = config.catalog();
    let tolerance = config.tolerance(tolerance_pct)?;

    let sheets = load_inventory(&input).map_err(CliError::io)?;

    let ids = collect_ids(&sheets, &catalog.id_prefix);
    let total_records: usize = sheets.iter().map(|s| s.records.len()).sum();
    if !quiet {
        eprintln!(
            "{} Datensätze gefunden, {} eindeutige {}-Nummern",
            total_records,
            ids.len(),
            catalog.id_prefix
        );
    }

    let client = CatalogClient::new(&catalog.base_url, catalog.timeout_secs);
    let mut orch = Orchestrator::new(client);
    if !quiet {
        orch = orch.with_progress();
    }
    let results = orch.fetch_many(&ids, concurrency.unwrap_or(catalog.concurrency));

    let (outcomes, not_attempted) = build_outcomes(&sheets, &results, &tolerance);
    write_report(&out, &sheets, &outcomes).map_err(CliError::io)?;

    if !quiet {
        let (ok, partial, failed) = orch.summary();
        println!(
            "Erfolgreich: {ok}, Teilweise: {partial}, Fehler: {failed}, Nicht versucht: {not_attempted}"
        );
        println!("Bericht: {}", out.display());
    }
    Ok(())
}

/// Pair every record with its fetched field set and verdicts. A record
/// whose identifier was never fetched (missing or without the configured
/// prefix) still gets its report rows: a `NotAttempted` field set whose
/// comparisons all come out inconclusive. Returns the outcome maps plus
/// the not-attempted count for the summary line.
fn build_outcomes(
    sheets: &[InventorySheet],
    results: &HashMap<String, ExtractedFieldSet>,
    tolerance: &WeightTolerance,
) -> (Vec<HashMap<usize, RecordOutcome>>, usize) {
    let mut not_attempted = 0usize;
    let mut outcomes = Vec::with_capacity(sheets.len());

    for sheet in sheets {
        let mut sheet_outcomes = HashMap::new();
        for rr in &sheet.records {
            let id = rr.record.external_id.as_deref().unwrap_or("").trim();
            let fields = match results.get(id) {
                Some(fs) => fs.clone(),
                None => {
                    not_attempted += 1;
                    // Nothing came from the web, so the set stays empty;
                    // echoing the inventory id here would fake a match.
                    ExtractedFieldSet::new("", "")
                }
            };
            let verdicts = reconcile_record(&rr.record, &fields, tolerance);
            sheet_outcomes.insert(rr.row, RecordOutcome { row: rr.row, fields, verdicts });
        }
        outcomes.push(sheet_outcomes);
    }

    (outcomes, not_attempted)
}

/// Identifiers worth fetching: trimmed, carrying the configured prefix.
/// Duplicates are kept; the orchestrator deduplicates.
fn collect_ids(sheets: &[InventorySheet], prefix: &str) -> Vec<String> {
    sheets
        .iter()
        .flat_map(|s| &s.records)
        .filter_map(|rr| rr.record.external_id.as_deref())
        .map(str::trim)
        .filter(|id| id.starts_with(prefix))
        .map(str::to_string)
        .collect()
}
