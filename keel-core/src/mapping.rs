use crate::{AsValue, FieldDef, Result, RowLabeled, Shape, Value, projected_columns};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use time::{Date, PrimitiveDateTime};

/// Typed column extraction strategy, resolved from the prototype of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Short,
    Long,
    Timestamp,
    Date,
    Decimal,
    Double,
    Float,
    Integer,
    Boolean,
    String,
}

impl Extraction {
    /// Strategy for a field whose runtime type is described by `prototype`.
    pub fn resolve(prototype: &Value) -> Self {
        match prototype {
            Value::Int8(..) | Value::Int16(..) | Value::UInt8(..) => Extraction::Short,
            Value::Int32(..) | Value::UInt16(..) => Extraction::Integer,
            Value::Int64(..) | Value::UInt32(..) | Value::UInt64(..) => Extraction::Long,
            Value::Timestamp(..) | Value::TimestampWithTimezone(..) => Extraction::Timestamp,
            Value::Date(..) => Extraction::Date,
            Value::Decimal(..) => Extraction::Decimal,
            Value::Float64(..) => Extraction::Double,
            Value::Float32(..) => Extraction::Float,
            Value::Boolean(..) => Extraction::Boolean,
            _ => Extraction::String,
        }
    }

    /// Canonical value of the strategy for `value`, a `NULL` stays a typed `NULL`.
    pub fn extract(self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(self.null());
        }
        Ok(match self {
            Extraction::Short => Value::Int16(Some(i16::try_from_value(value)?)),
            Extraction::Integer => Value::Int32(Some(i32::try_from_value(value)?)),
            Extraction::Long => Value::Int64(Some(i64::try_from_value(value)?)),
            Extraction::Timestamp => match value {
                v @ Value::TimestampWithTimezone(..) => v,
                v => Value::Timestamp(Some(PrimitiveDateTime::try_from_value(v)?)),
            },
            Extraction::Date => Value::Date(Some(Date::try_from_value(value)?)),
            Extraction::Decimal => Value::Decimal(Some(Decimal::try_from_value(value)?)),
            Extraction::Double => Value::Float64(Some(f64::try_from_value(value)?)),
            Extraction::Float => Value::Float32(Some(f32::try_from_value(value)?)),
            Extraction::Boolean => Value::Boolean(Some(bool::try_from_value(value)?)),
            Extraction::String => match value {
                // No text form, handed over untouched
                v @ (Value::Blob(..) | Value::List(..) | Value::Uuid(..)) => v,
                v => Value::Varchar(Some(String::try_from_value(v)?)),
            },
        })
    }

    pub fn null(self) -> Value {
        match self {
            Extraction::Short => Value::Int16(None),
            Extraction::Long => Value::Int64(None),
            Extraction::Timestamp => Value::Timestamp(None),
            Extraction::Date => Value::Date(None),
            Extraction::Decimal => Value::Decimal(None),
            Extraction::Double => Value::Float64(None),
            Extraction::Float => Value::Float32(None),
            Extraction::Integer => Value::Int32(None),
            Extraction::Boolean => Value::Boolean(None),
            Extraction::String => Value::Varchar(None),
        }
    }
}

/// Extraction strategy of every field of a shape that a raw statement projects.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: BTreeMap<&'static str, Extraction>,
}

impl ColumnMapping {
    /// Intersects the select list of `sql` with the fields of `S` (and of its parent).
    ///
    /// Tokens match field names exactly. When the select list cannot be found the mapping
    /// is empty and every column of the result is dropped.
    pub fn for_statement<S: Shape>(sql: &str) -> Self {
        let projected = projected_columns(sql);
        if projected.is_empty() {
            log::debug!(
                "No select list found for `{}`, {} will be materialized from an empty mapping",
                crate::truncate_long!(sql),
                S::shape_name(),
            );
            return Self::default();
        }
        Self::from_fields(
            S::fields().iter().chain(S::parent_fields()),
            projected.into_iter(),
        )
    }

    pub fn from_fields<'a>(
        fields: impl Iterator<Item = &'static FieldDef> + Clone,
        projected: impl Iterator<Item = &'a str>,
    ) -> Self {
        let mut columns = BTreeMap::new();
        for token in projected {
            if let Some(field) = fields.clone().find(|f| f.name == token) {
                columns
                    .entry(field.name)
                    .or_insert_with(|| Extraction::resolve(&field.value));
            }
        }
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<Extraction> {
        self.columns.get(name).copied()
    }

    /// Mapped field names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Keeps only the mapped columns of `row`, each converted by its strategy.
    pub fn apply(&self, row: RowLabeled) -> Result<RowLabeled> {
        row.labels
            .iter()
            .zip(row.values.into_vec())
            .filter_map(|(label, value)| {
                self.get(label).map(|extraction| {
                    extraction
                        .extract(value)
                        .map(|v| (label.clone(), v))
                        .map_err(|e| e.context(format!("While mapping column `{label}`")))
                })
            })
            .collect()
    }
}
