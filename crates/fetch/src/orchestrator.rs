//! Bounded-concurrency fetch orchestration with per-batch memoization.
//!
//! One orchestrator lives for one batch: the cache opens with it and dies
//! with it, so a given identifier is fetched at most once per batch —
//! failures included. There is no ambient process-wide state; the
//! transport is injected.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use partcheck_engine::{extract_document, ExtractedFieldSet, FetchStatus};
use serde::Deserialize;

use crate::client::CatalogClient;

/// Catalog/transport settings, TOML-loadable.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Identifiers must carry this prefix to be fetched at all.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://www.mymobase.com/de/p/".to_string()
}

fn default_id_prefix() -> String {
    "A2V".to_string()
}

fn default_concurrency() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            id_prefix: default_id_prefix(),
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Fetch-and-extract orchestrator for one batch.
pub struct Orchestrator {
    client: CatalogClient,
    cache: HashMap<String, ExtractedFieldSet>,
    quiet: bool,
}

impl Orchestrator {
    pub fn new(client: CatalogClient) -> Self {
        Self { client, cache: HashMap::new(), quiet: true }
    }

    /// Enable per-identifier progress lines on stderr.
    pub fn with_progress(mut self) -> Self {
        self.quiet = false;
        self
    }

    /// Fetch one identifier, memoized: a cached result (success or
    /// failure) is returned without touching the transport again.
    pub fn fetch_one(&mut self, id: &str) -> &ExtractedFieldSet {
        let key = id.trim().to_string();
        let Self { client, cache, quiet } = self;
        cache
            .entry(key.clone())
            .or_insert_with(|| fetch_and_extract(client, &key, *quiet))
    }

    /// Fetch a batch with a fixed-size worker pool.
    ///
    /// Identifiers are deduplicated first (trimmed, case-sensitive,
    /// first-occurrence order kept), so no two workers ever write the
    /// same cache key. Workers claim indices from a shared cursor;
    /// completion order does not affect the result mapping. One
    /// identifier's failure never aborts the batch.
    pub fn fetch_many(
        &mut self,
        ids: &[String],
        concurrency: usize,
    ) -> HashMap<String, ExtractedFieldSet> {
        let unique = dedup_ids(ids);
        let todo: Vec<String> = unique
            .iter()
            .filter(|id| !self.cache.contains_key(*id))
            .cloned()
            .collect();

        if !todo.is_empty() {
            let workers = concurrency.max(1).min(todo.len());
            let cursor = AtomicUsize::new(0);
            let done = Mutex::new(Vec::with_capacity(todo.len()));
            let client = &self.client;
            let quiet = self.quiet;

            thread::scope(|s| {
                for _ in 0..workers {
                    s.spawn(|| loop {
                        let i = cursor.fetch_add(1, Ordering::SeqCst);
                        let Some(id) = todo.get(i) else { break };
                        let fields = fetch_and_extract(client, id, quiet);
                        done.lock().unwrap().push((id.clone(), fields));
                    });
                }
            });

            for (id, fields) in done.into_inner().unwrap() {
                self.cache.insert(id, fields);
            }
        }

        unique
            .iter()
            .filter_map(|id| self.cache.get(id).map(|fs| (id.clone(), fs.clone())))
            .collect()
    }

    /// Batch counts of succeeded / partially succeeded / failed sets.
    pub fn summary(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for fs in self.cache.values() {
            match fs.status {
                FetchStatus::Succeeded => counts.0 += 1,
                FetchStatus::PartiallySucceeded => counts.1 += 1,
                FetchStatus::Failed(_) => counts.2 += 1,
                _ => {}
            }
        }
        counts
    }
}

/// One fetch-and-extract unit of work. Transport failure becomes a
/// `Failed` field set instead of an error.
fn fetch_and_extract(client: &CatalogClient, id: &str, quiet: bool) -> ExtractedFieldSet {
    let url = client.product_url(id);
    let fields = match client.get_product(id) {
        Ok(doc) => extract_document(id, &url, &doc),
        Err(e) => ExtractedFieldSet::failed(id, &url, e.to_string()),
    };

    if !quiet {
        eprintln!("  {id}: {}", fields.status);
    }
    fields
}

/// Trimmed, case-sensitive deduplication keeping first-occurrence order.
fn dedup_ids(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        let id = id.trim();
        if !id.is_empty() && seen.insert(id.to_string()) {
            out.push(id.to_string());
        }
    }
    out
}
