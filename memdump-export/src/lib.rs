//! # memdump export
//!
//! Writes decoded datasets as delimited text. The defaults reproduce the
//! files written by the legacy desktop viewer: every field is followed by
//! `;` and lines end with `"\n\r"`.

pub mod csv;
pub mod error;

pub use csv::{CsvOptions, export_csv, write_csv};
pub use error::{ExportError, Result};
