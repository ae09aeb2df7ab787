//! `partcheck fetch` — ad-hoc lookup of individual catalog pages.

use std::path::Path;

use partcheck_engine::ExtractedFieldSet;
use partcheck_fetch::{CatalogClient, Orchestrator};

use crate::config::AppConfig;
use crate::CliError;

pub fn cmd_fetch(ids: &[String], config_path: Option<&Path>, json: bool) -> Result<(), CliError> {
    let config = AppConfig::load(config_path)?;
    let catalog = config.catalog();

    let client = CatalogClient::new(&catalog.base_url, catalog.timeout_secs);
    let mut orch = Orchestrator::new(client);

    let mut sets: Vec<ExtractedFieldSet> = Vec::with_capacity(ids.len());
    for id in ids {
        sets.push(orch.fetch_one(id).clone());
    }

    if json {
        let text = serde_json::to_string_pretty(&sets)
            .map_err(|e| CliError::runtime(format!("JSON-Ausgabe fehlgeschlagen: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    for fields in &sets {
        print_human(fields);
    }
    Ok(())
}

fn print_human(set: &ExtractedFieldSet) {
    println!("{}  [{}]", set.external_id, set.status);
    println!("  URL: {}", set.source_url);
    let f = &set.fields;
    let rows: [(&str, &Option<String>); 11] = [
        ("Titel", &f.title),
        ("Beschreibung", &f.description),
        ("Zweite Teilenummer", &f.secondary_part_no),
        ("Gewicht", &f.weight),
        ("Abmessungen", &f.dimensions),
        ("Werkstoff", &f.material),
        ("Materialklassifizierung", &f.material_classification),
        ("Klassifizierungscode", &f.classification_code),
        ("Statistische Warennummer", &f.statistical_code),
        ("Ursprungsland", &f.origin_country),
        ("Verfügbarkeit", &f.availability),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
}
