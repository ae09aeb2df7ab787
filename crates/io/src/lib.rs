//! `partcheck-io` — workbook import and report export for the fixed
//! inventory layout.
//!
//! Import is one-way: calamine reads the workbook into a loose cell grid
//! plus typed records. Export re-emits the grid through rust_xlsxwriter,
//! inserting the web-data and comparison rows — a presentation snapshot,
//! not a round-trip format.

mod xlsx;

pub use xlsx::{
    load_inventory, write_report, InventorySheet, RecordOutcome, RecordRow, FIRST_DATA_ROW,
    HEADER_ROW,
};

pub mod columns {
    //! 0-based column indices of the fixed inventory layout.

    /// C — short title.
    pub const TITLE: usize = 2;
    /// E — manufacturer part number.
    pub const PART_NO: usize = 4;
    /// N — coded material classification.
    pub const CLASSIFICATION: usize = 13;
    /// P — material.
    pub const MATERIAL: usize = 15;
    /// S — weight.
    pub const WEIGHT: usize = 18;
    /// U/V/W — length, width, height.
    pub const LENGTH: usize = 20;
    pub const WIDTH: usize = 21;
    pub const HEIGHT: usize = 22;
    /// Z — vendor identifier.
    pub const EXTERNAL_ID: usize = 25;
}
