//! The canonical time-indexed candle table.

use std::ops::Range;

use crate::{OHLCV_COLUMNS, OPEN_TIME, Ohlcv, SchemaError};

/// A named column of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<f64>,
}

impl Column {
    /// Creates a column.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns the column label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Normalized candle data keyed by open time.
///
/// Invariants, checked by [`CanonicalTable::new`]:
/// - the index is strictly increasing;
/// - every column has one value per index entry;
/// - every value is finite;
/// - column labels are unique and differ from the index label.
///
/// Tables are never patched in place. A new fetch produces a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTable {
    index_label: String,
    index: Vec<i64>,
    columns: Vec<Column>,
}

impl CanonicalTable {
    /// Creates a table, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] describing the first violated invariant.
    pub fn new(
        index_label: impl Into<String>,
        index: Vec<i64>,
        columns: Vec<Column>,
    ) -> Result<Self, SchemaError> {
        let index_label = index_label.into();

        for position in 1..index.len() {
            if index[position] == index[position - 1] {
                return Err(SchemaError::DuplicateIndex {
                    time: index[position],
                });
            }
            if index[position] < index[position - 1] {
                return Err(SchemaError::UnsortedIndex { position });
            }
        }

        for (i, column) in columns.iter().enumerate() {
            if column.name == index_label
                || columns[..i].iter().any(|c| c.name == column.name)
            {
                return Err(SchemaError::InvalidSchema(format!(
                    "duplicate column label '{}'",
                    column.name
                )));
            }
            if column.values.len() != index.len() {
                return Err(SchemaError::ColumnLength {
                    column: column.name.clone(),
                    expected: index.len(),
                    found: column.values.len(),
                });
            }
            if let Some(row) = column.values.iter().position(|v| !v.is_finite()) {
                return Err(SchemaError::NonFinite {
                    column: column.name.clone(),
                    row,
                });
            }
        }

        Ok(Self {
            index_label,
            index,
            columns,
        })
    }

    /// Creates a table with the standard `open time` index and OHLCV columns.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the table invariants do not hold.
    pub fn from_ohlcv(bars: &[Ohlcv]) -> Result<Self, SchemaError> {
        fn pick(bars: &[Ohlcv], f: impl Fn(&Ohlcv) -> f64) -> Vec<f64> {
            bars.iter().map(f).collect()
        }

        let index = bars.iter().map(|b| b.open_time).collect();
        let columns = vec![
            Column::new(OHLCV_COLUMNS[0], pick(bars, |b| b.open)),
            Column::new(OHLCV_COLUMNS[1], pick(bars, |b| b.high)),
            Column::new(OHLCV_COLUMNS[2], pick(bars, |b| b.low)),
            Column::new(OHLCV_COLUMNS[3], pick(bars, |b| b.close)),
            Column::new(OHLCV_COLUMNS[4], pick(bars, |b| b.volume)),
        ];
        Self::new(OPEN_TIME, index, columns)
    }

    /// Returns the label of the index.
    #[must_use]
    pub fn index_label(&self) -> &str {
        &self.index_label
    }

    /// Returns the open times, ascending.
    #[must_use]
    pub fn index(&self) -> &[i64] {
        &self.index
    }

    /// Returns the value columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the value column labels in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Returns the values of the named column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(Column::values)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the earliest open time.
    #[must_use]
    pub fn first_time(&self) -> Option<i64> {
        self.index.first().copied()
    }

    /// Returns the latest open time.
    #[must_use]
    pub fn last_time(&self) -> Option<i64> {
        self.index.last().copied()
    }

    /// Returns true if `time` is in the index.
    #[must_use]
    pub fn contains_time(&self, time: i64) -> bool {
        self.index.binary_search(&time).is_ok()
    }

    /// Returns a view of the row at `position`.
    #[must_use]
    pub fn row(&self, position: usize) -> Option<Row<'_>> {
        (position < self.len()).then_some(Row {
            table: self,
            position,
        })
    }

    /// Iterates over rows in index order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_>> {
        (0..self.len()).map(move |position| Row {
            table: self,
            position,
        })
    }

    /// Returns a new table holding the rows in `range`.
    ///
    /// The range is clamped to the table length.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Self {
            index_label: self.index_label.clone(),
            index: self.index[start..end].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.values[start..end].to_vec()))
                .collect(),
        }
    }

    /// Returns a new table holding the last `n` rows.
    #[must_use]
    pub fn tail(&self, n: usize) -> Self {
        self.slice(self.len().saturating_sub(n)..self.len())
    }

    /// Returns the rows as OHLCV bars.
    ///
    /// Returns `None` unless all of `Open`, `High`, `Low`, `Close` and
    /// `Volume` are present.
    #[must_use]
    pub fn ohlcv(&self) -> Option<Vec<Ohlcv>> {
        let open = self.column(OHLCV_COLUMNS[0])?;
        let high = self.column(OHLCV_COLUMNS[1])?;
        let low = self.column(OHLCV_COLUMNS[2])?;
        let close = self.column(OHLCV_COLUMNS[3])?;
        let volume = self.column(OHLCV_COLUMNS[4])?;

        Some(
            (0..self.len())
                .map(|i| {
                    Ohlcv::new(self.index[i], open[i], high[i], low[i], close[i], volume[i])
                })
                .collect(),
        )
    }

    /// Compares two tables bit for bit.
    ///
    /// Unlike `==`, this distinguishes `0.0` from `-0.0`.
    #[must_use]
    pub fn bitwise_eq(&self, other: &Self) -> bool {
        self.index_label == other.index_label
            && self.index == other.index
            && self.columns.len() == other.columns.len()
            && self.columns.iter().zip(&other.columns).all(|(a, b)| {
                a.name == b.name
                    && a.values.len() == b.values.len()
                    && a
                        .values
                        .iter()
                        .zip(&b.values)
                        .all(|(x, y)| x.to_bits() == y.to_bits())
            })
    }
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a CanonicalTable,
    position: usize,
}

impl<'a> Row<'a> {
    /// Returns the row's open time.
    #[must_use]
    pub fn time(&self) -> i64 {
        self.table.index[self.position]
    }

    /// Returns the value of the named column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.table.column(column).map(|values| values[self.position])
    }

    /// Iterates over the row's values in column order.
    pub fn values(&self) -> impl Iterator<Item = f64> + 'a {
        let position = self.position;
        self.table.columns.iter().map(move |c| c.values[position])
    }
}
