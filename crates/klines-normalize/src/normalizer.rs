//! Raw candle to canonical table conversion.

use klines_types::{
    CanonicalTable, Column, ConversionError, KlineBatch, KlineSchema, KlinesError, RawCandle,
    RawField, Result, SchemaError,
};
use tracing::debug;

/// Converts raw candle tuples into a [`CanonicalTable`].
///
/// The schema is resolved to field positions once, so a normalizer can be
/// reused across batches.
#[derive(Debug, Clone)]
pub struct Normalizer {
    schema: KlineSchema,
    index_position: usize,
    retained_positions: Vec<usize>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::binance()
    }
}

impl Normalizer {
    /// Creates a normalizer for the given schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] if the schema is inconsistent.
    pub fn new(schema: KlineSchema) -> std::result::Result<Self, SchemaError> {
        schema.validate()?;
        let invalid = || SchemaError::InvalidSchema("unresolvable label".to_string());
        let index_position = schema.index_position().ok_or_else(invalid)?;
        let retained_positions = schema.retained_positions().ok_or_else(invalid)?;
        Ok(Self {
            schema,
            index_position,
            retained_positions,
        })
    }

    /// Creates a normalizer for Binance klines keeping only OHLCV columns.
    #[must_use]
    pub fn binance() -> Self {
        Self {
            schema: KlineSchema::binance(),
            index_position: 0,
            retained_positions: vec![1, 2, 3, 4, 5],
        }
    }

    /// Returns the schema in use.
    #[must_use]
    pub const fn schema(&self) -> &KlineSchema {
        &self.schema
    }

    /// Normalizes a sequence of raw candles.
    ///
    /// Labels are assigned positionally, the index field is promoted to the
    /// table index, fields outside the retained set are dropped and every
    /// retained field is cast to `f64`. Rows are sorted by open time.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::Empty`] if `raw` is empty
    /// - [`SchemaError::FieldCount`] if a row has the wrong width
    /// - [`ConversionError`] if a field is not numeric
    /// - [`SchemaError::DuplicateIndex`] if two rows share an open time
    pub fn normalize(&self, raw: &[RawCandle]) -> Result<CanonicalTable> {
        if raw.is_empty() {
            return Err(SchemaError::Empty.into());
        }

        let width = self.schema.width();
        if let Some((row, candle)) = raw.iter().enumerate().find(|(_, c)| c.len() != width) {
            return Err(SchemaError::FieldCount {
                row,
                expected: width,
                found: candle.len(),
            }
            .into());
        }

        let mut times = Vec::with_capacity(raw.len());
        let mut values: Vec<Vec<f64>> =
            vec![Vec::with_capacity(raw.len()); self.retained_positions.len()];

        for (row, candle) in raw.iter().enumerate() {
            let fields = candle.fields();

            let time = fields[self.index_position]
                .as_millis()
                .ok_or_else(|| self.conversion_error(row, self.index_position, fields))?;
            times.push(time);

            for (column, &position) in values.iter_mut().zip(&self.retained_positions) {
                let value = fields[position]
                    .as_f64()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| self.conversion_error(row, position, fields))?;
                column.push(value);
            }
        }

        let table = if times.is_sorted() {
            self.build(times, values)?
        } else {
            let mut order: Vec<usize> = (0..times.len()).collect();
            order.sort_by_key(|&i| times[i]);
            let times = order.iter().map(|&i| times[i]).collect();
            let values = values
                .iter()
                .map(|column| order.iter().map(|&i| column[i]).collect())
                .collect();
            self.build(times, values)?
        };

        debug!(
            rows = table.len(),
            columns = ?self.schema.retained,
            "normalized candles"
        );
        Ok(table)
    }

    /// Normalizes a fetched batch, refusing batches from failed fetches.
    ///
    /// # Errors
    ///
    /// Returns [`KlinesError::FetchFailed`] if the batch status is not 2xx,
    /// otherwise any error from [`Normalizer::normalize`].
    pub fn normalize_batch(&self, batch: &KlineBatch) -> Result<CanonicalTable> {
        if !batch.is_success() {
            return Err(KlinesError::FetchFailed {
                status: batch.status,
            });
        }
        self.normalize(&batch.candles)
    }

    fn build(&self, times: Vec<i64>, values: Vec<Vec<f64>>) -> Result<CanonicalTable> {
        let columns = self
            .schema
            .retained
            .iter()
            .zip(values)
            .map(|(name, values)| Column::new(name.clone(), values))
            .collect();
        Ok(CanonicalTable::new(self.schema.index.clone(), times, columns)?)
    }

    fn conversion_error(
        &self,
        row: usize,
        position: usize,
        fields: &[RawField],
    ) -> ConversionError {
        ConversionError {
            row,
            column: self.schema.labels[position].clone(),
            value: fields[position].to_string(),
        }
    }
}

/// Normalizes Binance klines with the default OHLCV schema.
///
/// # Errors
///
/// See [`Normalizer::normalize`].
pub fn normalize(raw: &[RawCandle]) -> Result<CanonicalTable> {
    Normalizer::binance().normalize(raw)
}

/// Normalizes a fetched Binance batch with the default OHLCV schema.
///
/// # Errors
///
/// See [`Normalizer::normalize_batch`].
pub fn normalize_batch(batch: &KlineBatch) -> Result<CanonicalTable> {
    Normalizer::binance().normalize_batch(batch)
}
