//! Exit code registry — single source of truth for the process exit
//! contract. Exit codes are part of the shell contract; scripts rely on
//! them, so change values only with a changelog note.

/// Command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General runtime failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error. clap emits this itself on bad arguments; listed here so
/// the full contract is in one place.
pub const EXIT_USAGE: u8 = 2;

/// Workbook or filesystem I/O failure.
pub const EXIT_IO: u8 = 3;

/// Invalid configuration (file, flag, or environment).
pub const EXIT_CONFIG: u8 = 4;
