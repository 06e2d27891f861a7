//! Decoded tabular dataset.

/// A decoded numeric value.
///
/// Wide enough for the full unsigned 32-bit cell range and for the negative
/// values produced by [`crate::CellEncoding::LegacySigned`].
pub type Cell = i64;

/// One decoded record: a cell per column, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Creates a row from its cells.
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Returns the cells of this row.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at `column`, if any.
    #[must_use]
    pub fn get(&self, column: usize) -> Option<Cell> {
        self.cells.get(column).copied()
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Consumes the row, returning its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

impl From<Vec<Cell>> for Row {
    fn from(cells: Vec<Cell>) -> Self {
        Self::new(cells)
    }
}

/// Column names plus the rows decoded beneath them.
///
/// Every row holds exactly [`Dataset::width`] cells. A dataset is produced
/// fresh by each decode call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
    complete: bool,
    discarded_bytes: usize,
}

impl Dataset {
    /// Creates a dataset with no rows, as seen before the log-stop marker
    /// has arrived.
    #[must_use]
    pub fn pending(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            complete: false,
            discarded_bytes: 0,
        }
    }

    /// Creates a dataset from a fully delimited frame.
    ///
    /// `discarded_bytes` counts trailing value bytes too short to form a row.
    #[must_use]
    pub fn complete(columns: Vec<String>, rows: Vec<Row>, discarded_bytes: usize) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self {
            columns,
            rows,
            complete: true,
            discarded_bytes,
        }
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the decoded rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the log-stop marker was found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns the number of trailing bytes dropped as a partial row.
    #[must_use]
    pub fn discarded_bytes(&self) -> usize {
        self.discarded_bytes
    }

    /// Returns the index of the first column called `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns every value of the first column called `name`, top to bottom.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<Cell>> {
        let index = self.column_index(name)?;
        self.rows.iter().map(|row| row.get(index)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::complete(
            vec!["X".into(), "Y".into()],
            vec![Row::new(vec![1, 2]), Row::new(vec![3, 4])],
            5,
        )
    }

    #[test]
    fn test_pending_dataset() {
        let ds = Dataset::pending(vec!["A".into()]);
        assert_eq!(ds.width(), 1);
        assert_eq!(ds.height(), 0);
        assert!(!ds.is_complete());
        assert_eq!(ds.discarded_bytes(), 0);
    }

    #[test]
    fn test_complete_dataset_accessors() {
        let ds = sample();
        assert!(ds.is_complete());
        assert_eq!(ds.width(), 2);
        assert_eq!(ds.height(), 2);
        assert_eq!(ds.discarded_bytes(), 5);
        assert_eq!(ds.rows()[1].cells(), &[3, 4]);
    }

    #[test]
    fn test_column_lookup() {
        let ds = sample();
        assert_eq!(ds.column_index("Y"), Some(1));
        assert_eq!(ds.column("Y"), Some(vec![2, 4]));
        assert_eq!(ds.column("Z"), None);
    }

    #[test]
    fn test_row_access() {
        let row: Row = vec![7, 8, 9].into();
        assert_eq!(row.len(), 3);
        assert_eq!(row.get(2), Some(9));
        assert_eq!(row.get(3), None);
        assert_eq!(row.into_cells(), vec![7, 8, 9]);
        assert!(Row::default().is_empty());
    }
}
