use std::sync::Arc;

use arrow::array::builder::{BooleanBuilder, Float64Builder, Int64Builder, StringBuilder};
use arrow::array::{
    Array, ArrayBuilder, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::errors::{Result, SeshatError};
use crate::record::{FieldValue, Record};

/// Creates an array builder for the given data type.
fn create_builder(data_type: &DataType) -> Result<Box<dyn ArrayBuilder>> {
    match data_type {
        DataType::Utf8 => Ok(Box::new(StringBuilder::new())),
        DataType::Int64 => Ok(Box::new(Int64Builder::new())),
        DataType::Float64 => Ok(Box::new(Float64Builder::new())),
        DataType::Boolean => Ok(Box::new(BooleanBuilder::new())),
        other => Err(SeshatError::Arrow(format!(
            "unsupported Arrow data type for builder: {other:?}"
        ))),
    }
}

/// Appends row `source_row_index` of `source_array` to a builder.
fn append_array_value(
    builder: &mut Box<dyn ArrayBuilder>,
    source_array: &ArrayRef,
    source_row_index: usize,
    data_type: &DataType,
) -> Result<()> {
    match data_type {
        DataType::Utf8 => {
            let builder = downcast_builder::<StringBuilder>(builder)?;
            let source_array = downcast_array::<StringArray>(source_array)?;
            if source_array.is_null(source_row_index) {
                builder.append_null();
            } else {
                builder.append_value(source_array.value(source_row_index));
            }
        }
        DataType::Int64 => {
            let builder = downcast_builder::<Int64Builder>(builder)?;
            let source_array = downcast_array::<Int64Array>(source_array)?;
            if source_array.is_null(source_row_index) {
                builder.append_null();
            } else {
                builder.append_value(source_array.value(source_row_index));
            }
        }
        DataType::Float64 => {
            let builder = downcast_builder::<Float64Builder>(builder)?;
            let source_array = downcast_array::<Float64Array>(source_array)?;
            if source_array.is_null(source_row_index) {
                builder.append_null();
            } else {
                builder.append_value(source_array.value(source_row_index));
            }
        }
        DataType::Boolean => {
            let builder = downcast_builder::<BooleanBuilder>(builder)?;
            let source_array = downcast_array::<BooleanArray>(source_array)?;
            if source_array.is_null(source_row_index) {
                builder.append_null();
            } else {
                builder.append_value(source_array.value(source_row_index));
            }
        }
        other => {
            return Err(SeshatError::Arrow(format!(
                "unsupported Arrow data type for appending: {other:?}"
            )));
        }
    }
    Ok(())
}

/// Appends a scalar [`FieldValue`] to a builder of the given type.
fn append_field_value(
    builder: &mut Box<dyn ArrayBuilder>,
    value: &FieldValue,
    data_type: &DataType,
) -> Result<()> {
    match (data_type, value) {
        (DataType::Utf8, FieldValue::Utf8(v)) => {
            downcast_builder::<StringBuilder>(builder)?.append_value(v);
        }
        (DataType::Utf8, FieldValue::Null) => {
            downcast_builder::<StringBuilder>(builder)?.append_null();
        }
        (DataType::Int64, FieldValue::Int64(v)) => {
            downcast_builder::<Int64Builder>(builder)?.append_value(*v);
        }
        (DataType::Int64, FieldValue::Null) => {
            downcast_builder::<Int64Builder>(builder)?.append_null();
        }
        (DataType::Float64, FieldValue::Float64(v)) => {
            downcast_builder::<Float64Builder>(builder)?.append_value(*v);
        }
        (DataType::Float64, FieldValue::Null) => {
            downcast_builder::<Float64Builder>(builder)?.append_null();
        }
        (DataType::Boolean, FieldValue::Boolean(v)) => {
            downcast_builder::<BooleanBuilder>(builder)?.append_value(*v);
        }
        (DataType::Boolean, FieldValue::Null) => {
            downcast_builder::<BooleanBuilder>(builder)?.append_null();
        }
        (data_type, value) => {
            return Err(SeshatError::Arrow(format!(
                "value {value:?} does not fit schema field of type {data_type:?}"
            )));
        }
    }
    Ok(())
}

/// Reads the scalar at `row` of `array` into a [`FieldValue`].
fn field_value_at(array: &ArrayRef, data_type: &DataType, row: usize) -> Result<FieldValue> {
    if array.is_null(row) {
        return Ok(FieldValue::Null);
    }
    match data_type {
        DataType::Utf8 => Ok(FieldValue::Utf8(
            downcast_array::<StringArray>(array)?.value(row).to_string(),
        )),
        DataType::Int64 => Ok(FieldValue::Int64(
            downcast_array::<Int64Array>(array)?.value(row),
        )),
        DataType::Float64 => Ok(FieldValue::Float64(
            downcast_array::<Float64Array>(array)?.value(row),
        )),
        DataType::Boolean => Ok(FieldValue::Boolean(
            downcast_array::<BooleanArray>(array)?.value(row),
        )),
        other => Err(SeshatError::Arrow(format!(
            "unsupported Arrow data type for reading: {other:?}"
        ))),
    }
}

/// Materializes a list of records sharing `schema` into one `RecordBatch`.
pub fn records_to_batch(schema: SchemaRef, records: &[Record]) -> Result<RecordBatch> {
    let mut builders: Vec<Box<dyn ArrayBuilder>> = schema
        .fields()
        .iter()
        .map(|field| create_builder(field.data_type()))
        .collect::<Result<_>>()?;

    for record in records {
        if record.values().len() != schema.fields().len() {
            return Err(SeshatError::Arrow(format!(
                "record has {} values but the batch schema has {} fields",
                record.values().len(),
                schema.fields().len()
            )));
        }
        for (column_index, field) in schema.fields().iter().enumerate() {
            append_field_value(
                &mut builders[column_index],
                &record.values()[column_index],
                field.data_type(),
            )?;
        }
    }

    finish_batch(schema, builders)
}

/// Explodes a `RecordBatch` into one [`Record`] per row, each carrying
/// the batch schema.
pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<Record>> {
    let schema = batch.schema();
    let mut records = Vec::with_capacity(batch.num_rows());

    for row in 0..batch.num_rows() {
        let mut values = Vec::with_capacity(schema.fields().len());
        for (column_index, field) in schema.fields().iter().enumerate() {
            values.push(field_value_at(
                batch.column(column_index),
                field.data_type(),
                row,
            )?);
        }
        records.push(Record::new(Arc::clone(&schema), values)?);
    }

    Ok(records)
}

/// Returns a batch with a Utf8 column of the given name filled from
/// `values`, one entry per row. An existing column of that name is
/// replaced; otherwise the column is appended.
pub fn with_utf8_column(
    batch: &RecordBatch,
    name: &str,
    values: Vec<String>,
) -> Result<RecordBatch> {
    if values.len() != batch.num_rows() {
        return Err(SeshatError::Arrow(format!(
            "column '{name}' has {} values for a batch of {} rows",
            values.len(),
            batch.num_rows()
        )));
    }

    let schema = batch.schema();
    let new_array: ArrayRef = Arc::new(StringArray::from(values));
    let new_field = Field::new(name, DataType::Utf8, true);

    let mut fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();

    match schema.column_with_name(name) {
        Some((index, _)) => {
            fields[index] = new_field;
            columns[index] = new_array;
        }
        None => {
            fields.push(new_field);
            columns.push(new_array);
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .map_err(|e| SeshatError::Arrow(format!("failed to rebuild batch with '{name}': {e}")))
}

/// Concatenates batches that all share `schema` into one batch, in order.
pub fn concat_batches(schema: &SchemaRef, batches: &[RecordBatch]) -> Result<RecordBatch> {
    let mut builders: Vec<Box<dyn ArrayBuilder>> = schema
        .fields()
        .iter()
        .map(|field| create_builder(field.data_type()))
        .collect::<Result<_>>()?;

    for batch in batches {
        if batch.schema() != *schema {
            return Err(SeshatError::Arrow(
                "schema mismatch between batches being concatenated".to_string(),
            ));
        }
        for row in 0..batch.num_rows() {
            for (column_index, field) in schema.fields().iter().enumerate() {
                append_array_value(
                    &mut builders[column_index],
                    batch.column(column_index),
                    row,
                    field.data_type(),
                )?;
            }
        }
    }

    finish_batch(Arc::clone(schema), builders)
}

/// Redistributes the rows of a batch round-robin across `partitions`
/// batches. Every row lands in exactly one partition; partitions may be
/// empty when the batch has fewer rows than partitions.
pub fn round_robin_split(batch: &RecordBatch, partitions: usize) -> Result<Vec<RecordBatch>> {
    if partitions == 0 {
        return Err(SeshatError::Config(
            "cannot repartition into zero partitions".to_string(),
        ));
    }

    let schema = batch.schema();
    let mut partition_builders: Vec<Vec<Box<dyn ArrayBuilder>>> = (0..partitions)
        .map(|_| {
            schema
                .fields()
                .iter()
                .map(|field| create_builder(field.data_type()))
                .collect::<Result<_>>()
        })
        .collect::<Result<_>>()?;

    for row in 0..batch.num_rows() {
        let builders = &mut partition_builders[row % partitions];
        for (column_index, field) in schema.fields().iter().enumerate() {
            append_array_value(
                &mut builders[column_index],
                batch.column(column_index),
                row,
                field.data_type(),
            )?;
        }
    }

    partition_builders
        .into_iter()
        .map(|builders| finish_batch(Arc::clone(&schema), builders))
        .collect()
}

fn finish_batch(schema: SchemaRef, builders: Vec<Box<dyn ArrayBuilder>>) -> Result<RecordBatch> {
    let arrays: Vec<ArrayRef> = builders
        .into_iter()
        .map(|mut builder| builder.finish())
        .collect();

    RecordBatch::try_new(schema, arrays)
        .map_err(|e| SeshatError::Arrow(format!("failed to create RecordBatch: {e}")))
}

fn downcast_builder<'a, T: ArrayBuilder>(
    builder: &'a mut Box<dyn ArrayBuilder>,
) -> Result<&'a mut T> {
    builder.as_any_mut().downcast_mut::<T>().ok_or_else(|| {
        SeshatError::Arrow(format!(
            "failed to downcast builder to {}",
            std::any::type_name::<T>()
        ))
    })
}

fn downcast_array<'a, T: Array + 'static>(array: &'a ArrayRef) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        SeshatError::Arrow(format!(
            "failed to downcast array to {}",
            std::any::type_name::<T>()
        ))
    })
}
