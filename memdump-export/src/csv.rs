//! Delimited text serialization.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use memdump_core::Dataset;

use crate::error::{ExportError, Result};

/// Layout of an exported file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Separator written between fields.
    pub field_delimiter: String,
    /// Terminator written after every line.
    pub line_terminator: String,
    /// Also write the field delimiter after the last field of a line.
    pub trailing_delimiter: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            field_delimiter: ";".to_string(),
            line_terminator: "\n\r".to_string(),
            trailing_delimiter: true,
        }
    }
}

impl CsvOptions {
    /// Conventional comma-separated layout with `\n` line endings.
    #[must_use]
    pub fn rfc4180() -> Self {
        Self {
            field_delimiter: ",".to_string(),
            line_terminator: "\n".to_string(),
            trailing_delimiter: false,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn field_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.field_delimiter = delimiter.into();
        self
    }

    /// Sets the line terminator.
    #[must_use]
    pub fn line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.line_terminator = terminator.into();
        self
    }

    /// Enables or disables the delimiter after the last field.
    #[must_use]
    pub fn trailing_delimiter(mut self, enabled: bool) -> Self {
        self.trailing_delimiter = enabled;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.field_delimiter.is_empty() {
            return Err(ExportError::invalid_options("empty field delimiter"));
        }
        if self.line_terminator.is_empty() {
            return Err(ExportError::invalid_options("empty line terminator"));
        }
        Ok(())
    }

    fn write_line<W, I, T>(&self, out: &mut W, fields: I) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 && !self.trailing_delimiter {
                out.write_all(self.field_delimiter.as_bytes())?;
            }
            write!(out, "{}", field)?;
            if self.trailing_delimiter {
                out.write_all(self.field_delimiter.as_bytes())?;
            }
        }
        out.write_all(self.line_terminator.as_bytes())?;
        Ok(())
    }
}

/// Writes `dataset` to `out`: the column names on the first line, then one
/// line per row.
///
/// # Errors
/// Returns `ExportError::InvalidOptions` for empty delimiters and
/// `ExportError::Io` if writing fails.
pub fn write_csv<W: Write>(dataset: &Dataset, out: &mut W, options: &CsvOptions) -> Result<()> {
    options.validate()?;
    options.write_line(out, dataset.columns())?;
    for row in dataset.rows() {
        options.write_line(out, row.cells())?;
    }
    out.flush()?;
    Ok(())
}

/// Writes `dataset` to a file at `path`, appending a `.csv` extension when
/// the path lacks one. Returns the path actually written.
///
/// # Errors
/// See [`write_csv`].
pub fn export_csv(dataset: &Dataset, path: &Path, options: &CsvOptions) -> Result<PathBuf> {
    let path = with_csv_extension(path);
    let mut out = BufWriter::new(File::create(&path)?);
    write_csv(dataset, &mut out, options)?;
    tracing::info!(
        "Exported {} rows x {} columns to {}",
        dataset.height(),
        dataset.width(),
        path.display()
    );
    Ok(path)
}

fn with_csv_extension(path: &Path) -> PathBuf {
    let has_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if has_csv {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".csv");
    PathBuf::from(name)
}
