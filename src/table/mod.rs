//! Sample tables (Arrow-backed)
//!
//! A [`SampleTable`] is one row per depth sample, columns are named log
//! curves. The wrapper owns a single Arrow [`RecordBatch`]; buffers are
//! reference counted so cloning a table is cheap and every transform returns
//! a new table instead of mutating the old one.
//!
//! Numeric columns are always read through [`SampleTable::numeric`], which
//! coerces integer, float and string columns to `f64` with nulls mapped to
//! NaN. Derived columns are written back with [`SampleTable::with_columns`] in
//! one step so a failed calculation never leaves half of its outputs behind.

pub mod columns;

use crate::{Error, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, UInt32Array,
};
use arrow::compute;
use arrow::datatypes::{DataType, Field, FieldRef, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// Column payload written by a calculation
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Float column, NaN marks an absent value
    Float(Vec<f64>),
    /// Integer column (flags, group ids)
    Int(Vec<i64>),
    /// Nullable categorical column
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Number of rows held
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Whether the column holds no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn into_array(self) -> ArrayRef {
        match self {
            Self::Float(v) => Arc::new(Float64Array::from(v)),
            Self::Int(v) => Arc::new(Int64Array::from(v)),
            Self::Text(v) => Arc::new(StringArray::from(v)),
        }
    }
}

/// Depth-indexed table of log samples
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    batch: RecordBatch,
}

impl From<RecordBatch> for SampleTable {
    fn from(batch: RecordBatch) -> Self {
        Self { batch }
    }
}

impl SampleTable {
    /// Wrap an existing record batch
    #[must_use]
    pub const fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Start building a table column by column
    #[must_use]
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Table with no columns and no rows
    #[must_use]
    pub fn empty() -> Self {
        Self {
            batch: RecordBatch::new_empty(Arc::new(Schema::empty())),
        }
    }

    /// Underlying record batch
    #[must_use]
    pub const fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Unwrap into the record batch
    #[must_use]
    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    /// Table schema
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Number of depth samples
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Column names in schema order
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Whether a column with this exact name exists
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    /// Names from `names` that are not in the table, in the given order
    #[must_use]
    pub fn missing<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }

    /// Check that every column in `names` exists
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumns`] listing all absent columns
    pub fn require(&self, calculation: &str, names: &[&str]) -> Result<()> {
        let missing = self.missing(names);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::missing_columns(calculation, missing))
        }
    }

    /// Raw Arrow column
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumns`] if the column does not exist
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| Error::missing_columns("column lookup", [name]))
    }

    /// Read a column as `f64`, coercing integers and numeric strings.
    ///
    /// Nulls and unparsable strings become NaN.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingColumns`] if the column does not exist
    /// - [`Error::TypeCoercion`] if the type has no numeric reading, or a
    ///   string column has values but none of them parse
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>> {
        let column = self.column(name)?;
        let data_type = column.data_type();

        let coercible = data_type.is_numeric()
            || matches!(
                data_type,
                DataType::Utf8 | DataType::LargeUtf8 | DataType::Boolean | DataType::Null
            );
        if !coercible {
            return Err(type_coercion(name, data_type));
        }

        let cast = if *data_type == DataType::Float64 {
            Arc::clone(column)
        } else {
            compute::cast(column, &DataType::Float64)
                .map_err(|_| type_coercion(name, data_type))?
        };
        let values = cast
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| type_coercion(name, data_type))?;

        let is_text = matches!(data_type, DataType::Utf8 | DataType::LargeUtf8);
        if is_text && column.null_count() < column.len() && values.null_count() == values.len() {
            return Err(type_coercion(name, data_type));
        }

        Ok(values.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    /// Read a column as optional strings (numbers are formatted)
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or cannot be cast to text
    pub fn text(&self, name: &str) -> Result<Vec<Option<String>>> {
        let column = self.column(name)?;
        let data_type = column.data_type();
        let cast = if *data_type == DataType::Utf8 {
            Arc::clone(column)
        } else {
            compute::cast(column, &DataType::Utf8).map_err(|_| type_coercion(name, data_type))?
        };
        let values = cast
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| type_coercion(name, data_type))?;
        Ok(values.iter().map(|v| v.map(str::to_string)).collect())
    }

    /// Replace or append columns in one step.
    ///
    /// Existing columns keep their schema position; new columns are appended
    /// in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a column length differs from the
    /// table's row count
    pub fn with_columns<S, I>(&self, updates: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, ColumnData)>,
    {
        let schema = self.batch.schema();
        let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
        let mut arrays: Vec<ArrayRef> = self.batch.columns().to_vec();
        let num_rows = self.num_rows();

        for (name, data) in updates {
            let name: String = name.into();
            if data.len() != num_rows {
                return Err(Error::InvalidInput(format!(
                    "Column '{name}' has {} rows, table has {num_rows}",
                    data.len()
                )));
            }
            let array = data.into_array();
            let field = Arc::new(Field::new(name.as_str(), array.data_type().clone(), true));
            match fields.iter().position(|f| f.name() == &name) {
                Some(i) => {
                    fields[i] = field;
                    arrays[i] = array;
                }
                None => {
                    fields.push(field);
                    arrays.push(array);
                }
            }
        }

        let schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
        Self::assemble(schema, arrays, num_rows)
    }

    /// Replace or append a single float column
    ///
    /// # Errors
    ///
    /// Returns an error if the length differs from the row count
    pub fn with_f64(&self, name: &str, values: Vec<f64>) -> Result<Self> {
        self.with_columns([(name, ColumnData::Float(values))])
    }

    /// Replace or append a single nullable text column
    ///
    /// # Errors
    ///
    /// Returns an error if the length differs from the row count
    pub fn with_text(&self, name: &str, values: Vec<Option<String>>) -> Result<Self> {
        self.with_columns([(name, ColumnData::Text(values))])
    }

    /// Drop a column if present
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining batch cannot be assembled
    pub fn without_column(&self, name: &str) -> Result<Self> {
        let Ok(index) = self.batch.schema().index_of(name) else {
            return Ok(self.clone());
        };
        let schema = self.batch.schema();
        let fields: Vec<FieldRef> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, f)| Arc::clone(f))
            .collect();
        let arrays: Vec<ArrayRef> = self
            .batch
            .columns()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, a)| Arc::clone(a))
            .collect();
        let schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
        Self::assemble(schema, arrays, self.num_rows())
    }

    /// Keep rows where `mask` is true
    ///
    /// # Errors
    ///
    /// Returns an error if the mask length differs from the row count
    pub fn filter_rows(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.num_rows() {
            return Err(Error::InvalidInput(format!(
                "Row mask has {} entries, table has {} rows",
                mask.len(),
                self.num_rows()
            )));
        }
        let kept = mask.iter().filter(|&&keep| keep).count();
        let mask = BooleanArray::from(mask.to_vec());
        let arrays = self
            .batch
            .columns()
            .iter()
            .map(|column| compute::filter(column.as_ref(), &mask))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::assemble(self.batch.schema(), arrays, kept)
    }

    /// Gather rows by position (duplicates and reordering allowed)
    ///
    /// # Errors
    ///
    /// Returns an error if an index is out of bounds
    pub fn take_rows(&self, indices: &[usize]) -> Result<Self> {
        let num_rows = self.num_rows();
        let indices = indices
            .iter()
            .map(|&i| {
                if i < num_rows {
                    u32::try_from(i).map_err(|_| {
                        Error::InvalidInput(format!("Row index {i} exceeds u32 range"))
                    })
                } else {
                    Err(Error::InvalidInput(format!(
                        "Row index {i} out of bounds (table has {num_rows} rows)"
                    )))
                }
            })
            .collect::<Result<Vec<u32>>>()?;
        let taken = indices.len();
        let indices = UInt32Array::from(indices);
        let arrays = self
            .batch
            .columns()
            .iter()
            .map(|column| compute::take(column.as_ref(), &indices, None))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::assemble(self.batch.schema(), arrays, taken)
    }

    /// Concatenate tables that share a schema
    ///
    /// # Errors
    ///
    /// Returns an error for an empty input or mismatched schemas
    pub fn concat(tables: &[Self]) -> Result<Self> {
        let first = tables
            .first()
            .ok_or_else(|| Error::InvalidInput("No tables to concatenate".to_string()))?;
        if tables.len() == 1 {
            return Ok(first.clone());
        }
        let schema = first.schema();
        if let Some(other) = tables.iter().find(|t| t.schema() != schema) {
            return Err(Error::StorageError(format!(
                "Schema mismatch: expected {:?}, got {:?}",
                schema.fields(),
                other.schema().fields()
            )));
        }
        let batch = compute::concat_batches(&schema, tables.iter().map(Self::batch))?;
        Ok(Self { batch })
    }

    /// Split rows by the value of a categorical column.
    ///
    /// Partitions are returned in order of first appearance. Null keys form
    /// their own partition under the empty string so no row is lost.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing
    pub fn partition_by(&self, name: &str) -> Result<Vec<(String, Self)>> {
        let keys = self.text(name)?;
        let mut order: Vec<String> = Vec::new();
        let mut rows: rustc_hash::FxHashMap<String, Vec<usize>> = rustc_hash::FxHashMap::default();
        for (i, key) in keys.into_iter().enumerate() {
            let key = key.unwrap_or_default();
            rows.entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(i);
        }
        order
            .into_iter()
            .map(|key| {
                let indices = rows.remove(&key).unwrap_or_default();
                let part = self.take_rows(&indices)?;
                Ok((key, part))
            })
            .collect()
    }

    fn assemble(schema: SchemaRef, arrays: Vec<ArrayRef>, num_rows: usize) -> Result<Self> {
        let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
        let batch = RecordBatch::try_new_with_options(schema, arrays, &options)?;
        Ok(Self { batch })
    }
}

fn type_coercion(column: &str, data_type: &DataType) -> Error {
    Error::TypeCoercion {
        column: column.to_string(),
        data_type: data_type.to_string(),
    }
}

/// Builder for [`SampleTable`]
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<(String, ColumnData)>,
}

impl TableBuilder {
    /// Add a float column
    #[must_use]
    pub fn f64(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), ColumnData::Float(values)));
        self
    }

    /// Add an integer column
    #[must_use]
    pub fn i64(mut self, name: impl Into<String>, values: Vec<i64>) -> Self {
        self.columns.push((name.into(), ColumnData::Int(values)));
        self
    }

    /// Add a text column
    #[must_use]
    pub fn text<S: Into<String>>(mut self, name: impl Into<String>, values: Vec<S>) -> Self {
        let values = values.into_iter().map(|v| Some(v.into())).collect();
        self.columns.push((name.into(), ColumnData::Text(values)));
        self
    }

    /// Build the table
    ///
    /// # Errors
    ///
    /// Returns an error if column lengths differ or a name repeats
    pub fn build(self) -> Result<SampleTable> {
        let num_rows = self.columns.first().map_or(0, |(_, c)| c.len());
        let mut fields = Vec::with_capacity(self.columns.len());
        let mut arrays = Vec::with_capacity(self.columns.len());
        for (name, data) in self.columns {
            if data.len() != num_rows {
                return Err(Error::InvalidInput(format!(
                    "Column '{name}' has {} rows, expected {num_rows}",
                    data.len()
                )));
            }
            if fields.iter().any(|f: &Field| f.name() == &name) {
                return Err(Error::InvalidInput(format!("Duplicate column '{name}'")));
            }
            let array = data.into_array();
            fields.push(Field::new(name, array.data_type().clone(), true));
            arrays.push(array);
        }
        SampleTable::assemble(Arc::new(Schema::new(fields)), arrays, num_rows)
    }
}
