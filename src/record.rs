use std::fmt;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

use crate::errors::{Result, SeshatError};

/// A scalar value in a record field.
///
/// This is the subset of Arrow types the planning layer manipulates
/// directly. Anything else stays opaque inside a `RecordBatch` and never
/// reaches per-key planning.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Missing value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit floating point number.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// Boolean.
    Boolean(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "NULL"),
            FieldValue::Int64(v) => write!(f, "{}", v),
            FieldValue::Float64(v) => write!(f, "{}", v),
            FieldValue::Utf8(v) => write!(f, "{}", v),
            FieldValue::Boolean(v) => write!(f, "{}", v),
        }
    }
}

/// A single row of named, typed fields with an attached schema.
///
/// Records are immutable value types: "appending" a field via
/// [`Record::with_field`] produces a new record, never mutating shared
/// state. The same arriving record set may be read by concurrent
/// key-partition workers, so nothing here uses interior mutability.
///
/// A record can be built without a schema (rows arriving from a
/// collaborator that failed to attach one); every schema-dependent
/// operation then fails with [`SeshatError::SchemaMissing`] rather than
/// guessing field positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Option<SchemaRef>,
    values: Vec<FieldValue>,
}

impl Record {
    /// Creates a record from a schema and one value per schema field.
    pub fn new(schema: SchemaRef, values: Vec<FieldValue>) -> Result<Self> {
        if schema.fields().len() != values.len() {
            return Err(SeshatError::Arrow(format!(
                "record has {} values but its schema has {} fields",
                values.len(),
                schema.fields().len()
            )));
        }
        Ok(Self {
            schema: Some(schema),
            values,
        })
    }

    /// Creates a record with no attached schema.
    ///
    /// Such a record is rejected by every planner; this constructor
    /// exists so upstream shaping code can carry rows it has not yet
    /// typed, and so tests can exercise the schema-missing error path.
    pub fn schemaless(values: Vec<FieldValue>) -> Self {
        Self {
            schema: None,
            values,
        }
    }

    /// Returns the attached schema, if any.
    pub fn schema(&self) -> Option<&SchemaRef> {
        self.schema.as_ref()
    }

    /// Returns the field values in schema order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    fn require_schema(&self) -> Result<&SchemaRef> {
        self.schema.as_ref().ok_or_else(|| {
            SeshatError::SchemaMissing("record does not contain a schema".to_string())
        })
    }

    /// Looks up a field value by name through the schema.
    pub fn field(&self, name: &str) -> Result<&FieldValue> {
        let schema = self.require_schema()?;
        let (index, _) = schema.column_with_name(name).ok_or_else(|| {
            SeshatError::Arrow(format!("field '{name}' not found in record schema"))
        })?;
        Ok(&self.values[index])
    }

    /// Returns a new record with the named field set to `value`.
    ///
    /// If the schema already has a field of that name its value is
    /// replaced; otherwise a nullable field of `data_type` is appended
    /// and the schema of the returned record grows by one field.
    pub fn with_field(&self, name: &str, data_type: DataType, value: FieldValue) -> Result<Self> {
        let schema = self.require_schema()?;

        if let Some((index, _)) = schema.column_with_name(name) {
            let mut values = self.values.clone();
            values[index] = value;
            return Ok(Self {
                schema: Some(Arc::clone(schema)),
                values,
            });
        }

        let mut fields: Vec<Field> = schema
            .fields()
            .iter()
            .map(|f| f.as_ref().clone())
            .collect();
        fields.push(Field::new(name, data_type, true));

        let mut values = self.values.clone();
        values.push(value);

        Ok(Self {
            schema: Some(Arc::new(Schema::new(fields))),
            values,
        })
    }

    /// Extracts the event time carried in the named field.
    ///
    /// Event time is canonically an `Int64` field holding milliseconds
    /// since the epoch; any other type is an error so that timestamp
    /// comparisons stay total.
    pub fn event_time(&self, timestamp_field: &str) -> Result<i64> {
        match self.field(timestamp_field)? {
            FieldValue::Int64(millis) => Ok(*millis),
            other => Err(SeshatError::Arrow(format!(
                "timestamp field '{timestamp_field}' must be Int64, got {other:?}"
            ))),
        }
    }

    /// Returns whether this record and `other` differ on any of the named
    /// fields, compared by value equality.
    pub fn differs_on(&self, other: &Record, field_names: &[String]) -> Result<bool> {
        for name in field_names {
            if self.field(name)? != other.field(name)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
