//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (including "files identical")    |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 3-9     | diff             | Input, output and config failures        |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into [`diff_exit_code`]

use sheetdiff_recon::{DiffError, SheetError, SourceError};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - a diff was written, or there was nothing to write (no common
/// columns, no matching records, identical files).
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options. clap exits with
/// this code on its own.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Diff (3-9)
// =============================================================================

/// An input could not be read or the output could not be written.
pub const EXIT_IO: u8 = 3;

/// An input could not be parsed (malformed CSV, id column absent, ...).
pub const EXIT_PARSE: u8 = 5;

/// The config file is unreadable or invalid.
pub const EXIT_CONFIG: u8 = 6;

/// Map a DiffError to its exit code.
pub fn diff_exit_code(err: &DiffError) -> u8 {
    match err {
        DiffError::Parse { source: SheetError::Source(SourceError::Io(_)), .. } => EXIT_IO,
        DiffError::Parse { .. } => EXIT_PARSE,
        DiffError::Output { .. } => EXIT_IO,
        DiffError::Config(_) => EXIT_CONFIG,
        DiffError::Row { .. } | DiffError::Assemble(_) => EXIT_ERROR,
    }
}
