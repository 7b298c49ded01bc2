use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    mem::discriminant,
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed value moved between records, statements and drivers.
///
/// Every variant carries an `Option` payload: `None` is a typed `NULL` and it is also
/// what field definitions store as the type prototype of a field.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
    List(Option<Vec<Value>>, /* type: */ Box<Value>),
    /// Text the driver could not attach a type to.
    Unknown(Option<String>),
}

/// Generic key-value result shape, one entry per projected column.
pub type RowMap = BTreeMap<String, Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::UInt8(v) => v.is_none(),
            Value::UInt16(v) => v.is_none(),
            Value::UInt32(v) => v.is_none(),
            Value::UInt64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampWithTimezone(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
            Value::List(v, ..) => v.is_none(),
            Value::Unknown(v) => v.is_none(),
        }
    }

    /// Null or the empty string, the inputs that filter conditions ignore.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => v.is_empty(),
            v => v.is_null(),
        }
    }

    pub fn same_type(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(.., l), Self::List(.., r)) => l.same_type(r),
            _ => discriminant(self) == discriminant(other),
        }
    }

    /// Typed `NULL` of the same variant.
    pub fn as_null(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int8(..) => Value::Int8(None),
            Value::Int16(..) => Value::Int16(None),
            Value::Int32(..) => Value::Int32(None),
            Value::Int64(..) => Value::Int64(None),
            Value::UInt8(..) => Value::UInt8(None),
            Value::UInt16(..) => Value::UInt16(None),
            Value::UInt32(..) => Value::UInt32(None),
            Value::UInt64(..) => Value::UInt64(None),
            Value::Float32(..) => Value::Float32(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Decimal(..) => Value::Decimal(None),
            Value::Varchar(..) => Value::Varchar(None),
            Value::Blob(..) => Value::Blob(None),
            Value::Date(..) => Value::Date(None),
            Value::Time(..) => Value::Time(None),
            Value::Timestamp(..) => Value::Timestamp(None),
            Value::TimestampWithTimezone(..) => Value::TimestampWithTimezone(None),
            Value::Uuid(..) => Value::Uuid(None),
            Value::List(.., inner) => Value::List(None, inner.clone()),
            Value::Unknown(..) => Value::Unknown(None),
        }
    }

    /// Integral content of numeric variants, `None` for anything else.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int8(Some(v)) => Some(*v as _),
            Value::Int16(Some(v)) => Some(*v as _),
            Value::Int32(Some(v)) => Some(*v as _),
            Value::Int64(Some(v)) => Some(*v as _),
            Value::UInt8(Some(v)) => Some(*v as _),
            Value::UInt16(Some(v)) => Some(*v as _),
            Value::UInt32(Some(v)) => Some(*v as _),
            Value::UInt64(Some(v)) => Some(*v as _),
            Value::Float32(Some(v)) if v.is_finite() && v.fract() == 0.0 => Some(*v as _),
            Value::Float64(Some(v)) if v.is_finite() && v.fract() == 0.0 => Some(*v as _),
            Value::Decimal(Some(v)) if v.fract().is_zero() => v.to_i128(),
            _ => None,
        }
    }

    /// Interprets the value as a row count. Text and non numeric values yield `None`.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Value::Float32(Some(v)) if v.is_finite() && *v >= 0.0 => Some(*v as u64),
            Value::Float64(Some(v)) if v.is_finite() && *v >= 0.0 => Some(*v as u64),
            Value::Decimal(Some(v)) => v.trunc().to_u64(),
            Value::Unknown(Some(v)) => v.trim().parse().ok(),
            v => v.as_i128().and_then(|v| u64::try_from(v).ok()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            v if v.is_null() => f.write_str("NULL"),
            Value::Boolean(Some(v)) => write!(f, "{v}"),
            Value::Int8(Some(v)) => write!(f, "{v}"),
            Value::Int16(Some(v)) => write!(f, "{v}"),
            Value::Int32(Some(v)) => write!(f, "{v}"),
            Value::Int64(Some(v)) => write!(f, "{v}"),
            Value::UInt8(Some(v)) => write!(f, "{v}"),
            Value::UInt16(Some(v)) => write!(f, "{v}"),
            Value::UInt32(Some(v)) => write!(f, "{v}"),
            Value::UInt64(Some(v)) => write!(f, "{v}"),
            Value::Float32(Some(v)) => write!(f, "{v}"),
            Value::Float64(Some(v)) => write!(f, "{v}"),
            Value::Decimal(Some(v)) => write!(f, "{v}"),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => f.write_str(v),
            Value::Blob(Some(v)) => {
                for b in v.iter() {
                    write!(f, "{b:02X}")?;
                }
                Ok(())
            }
            Value::Date(Some(v)) => write!(f, "{v}"),
            Value::Time(Some(v)) => write!(f, "{v}"),
            Value::Timestamp(Some(v)) => write!(f, "{v}"),
            Value::TimestampWithTimezone(Some(v)) => write!(f, "{v}"),
            Value::Uuid(Some(v)) => write!(f, "{v}"),
            Value::List(Some(v), ..) => {
                f.write_str("[")?;
                for (i, v) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            _ => f.write_str("NULL"),
        }
    }
}
