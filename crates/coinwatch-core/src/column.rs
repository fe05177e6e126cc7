//! Option-valued indicator column aligned with a series.

/// A computed indicator column.
///
/// Always has exactly one entry per source-series row. `None` means the value
/// is not yet computable at that row (insufficient lookback, or the input
/// shape does not carry the fields this indicator needs) — never an error and
/// never a fabricated number.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    values: Vec<Option<f64>>,
}

impl Column {
    /// Wrap precomputed values.
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    /// A column of `len` undefined entries.
    pub fn undefined(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    /// A fully-defined column.
    pub fn defined(values: Vec<f64>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at the given row, if computable there.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Value at the last row.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Index of the first defined value, if any.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(|v| v.is_some())
    }

    /// Iterator over `(row_index, value)` for defined entries.
    pub fn iter_defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|val| (i, val)))
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}
