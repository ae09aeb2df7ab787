//! `partcheck-engine` — inventory-vs-catalog reconciliation engine.
//!
//! Pure engine crate: receives inventory records and fetched documents,
//! returns extracted field sets and per-field verdicts. No HTTP or file
//! IO dependencies.

pub mod compare;
pub mod extract;
pub mod model;
pub mod normalize;

pub use compare::{reconcile_record, WeightTolerance};
pub use extract::{extract_document, Document};
pub use model::{
    ExtractedFieldSet, FetchStatus, InventoryRecord, PartialFields, RawCell, RecordVerdicts,
    Verdict, VerdictStatus,
};
