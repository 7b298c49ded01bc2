use crate::{Error, Result, Value, truncate_long};
use atoi::FromRadix10SignedChecked;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::{any, borrow::Cow, str::FromStr};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};
use uuid::Uuid;

/// Conversion between Rust types and the dynamically typed [`Value`].
///
/// It backs statement arguments, row decoding and the column extraction strategies.
///
/// # Conversion rules
/// - The canonical variant for the type is always accepted.
/// - Numeric variants of a different width are accepted after a range check, the
///   error names both the offending value and the target type.
/// - Text (`Varchar` and `Unknown`) is parsed with [`AsValue::parse`].
///
/// ```rust
/// use keel_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Typed `NULL` for this type, used as the prototype of a field.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse the whole input text as `Self`.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse `{}` as {}",
            truncate_long!(input.as_ref()),
            any::type_name::<Self>()
        )))
    }
}

fn cannot_convert<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {value:?} to {}",
        any::type_name::<T>()
    ))
}

fn parse_integer(input: &str) -> Result<i128> {
    let trimmed = input.trim();
    let (value, used) = i128::from_radix_10_signed_checked(trimmed.as_bytes());
    match value {
        Some(v) if used == trimmed.len() && trimmed.bytes().any(|b| b.is_ascii_digit()) => Ok(v),
        _ => Err(Error::msg(format!(
            "Cannot parse `{}` as an integer",
            truncate_long!(input)
        ))),
    }
}

impl AsValue for Value {
    fn as_empty_value() -> Value {
        Value::Null
    }
    fn as_value(self) -> Value {
        self
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

impl AsValue for &'static str {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Err(cannot_convert::<Self>(&value))
    }
}

macro_rules! impl_from {
    ($source:ty) => {
        impl From<$source> for Value {
            fn from(value: $source) -> Self {
                value.as_value()
            }
        }
    };
}

macro_rules! impl_as_value_integer {
    ($source:ty, $variant:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                if let $variant(Some(v)) = &value {
                    return Ok(*v);
                }
                let wide = match &value {
                    Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => parse_integer(v)?,
                    Value::Boolean(Some(v)) => *v as i128,
                    v => v.as_i128().ok_or_else(|| cannot_convert::<Self>(&value))?,
                };
                <$source>::try_from(wide).map_err(|_| {
                    Error::msg(format!(
                        "Value {wide} is out of range for {}",
                        any::type_name::<Self>()
                    ))
                })
            }
            fn parse(input: impl AsRef<str>) -> Result<Self> {
                let wide = parse_integer(input.as_ref())?;
                <$source>::try_from(wide).map_err(|_| {
                    Error::msg(format!(
                        "Value {wide} is out of range for {}",
                        any::type_name::<Self>()
                    ))
                })
            }
        }
        impl_from!($source);
    };
}
impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value_integer!(u64, Value::UInt64);

macro_rules! impl_as_value_float {
    ($source:ty, $variant:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                #[allow(unreachable_patterns)]
                match value {
                    $variant(Some(v)) => Ok(v),
                    Value::Float32(Some(v)) => Ok(v as _),
                    Value::Float64(Some(v)) => Ok(v as _),
                    Value::Decimal(Some(v)) => v
                        .to_f64()
                        .map(|v| v as _)
                        .ok_or_else(|| cannot_convert::<Self>(&Value::Decimal(Some(v)))),
                    Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                        <Self as AsValue>::parse(v)
                    }
                    ref v => v
                        .as_i128()
                        .map(|v| v as _)
                        .ok_or_else(|| cannot_convert::<Self>(v)),
                }
            }
            fn parse(input: impl AsRef<str>) -> Result<Self> {
                let input = input.as_ref();
                fast_float::parse::<$source, _>(input.trim()).map_err(|_| {
                    Error::msg(format!(
                        "Cannot parse `{}` as {}",
                        truncate_long!(input),
                        any::type_name::<Self>()
                    ))
                })
            }
        }
        impl_from!($source);
    };
}
impl_as_value_float!(f32, Value::Float32);
impl_as_value_float!(f64, Value::Float64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            ref v => match v.as_i128() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(cannot_convert::<Self>(v)),
            },
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref().trim();
        if ["true", "t", "1"].iter().any(|v| input.eq_ignore_ascii_case(v)) {
            Ok(true)
        } else if ["false", "f", "0"].iter().any(|v| input.eq_ignore_ascii_case(v)) {
            Ok(false)
        } else {
            Err(Error::msg(format!(
                "Cannot parse `{}` as bool",
                truncate_long!(input)
            )))
        }
    }
}
impl_from!(bool);

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => Ok(v),
            Value::Blob(..) | Value::List(..) => Err(cannot_convert::<Self>(&value)),
            v if v.is_null() => Err(cannot_convert::<Self>(&v)),
            v => Ok(v.to_string()),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        Ok(input.as_ref().to_owned())
    }
}
impl_from!(String);

impl<'a> AsValue for Cow<'a, str> {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into_owned()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Cow::Owned)
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(Some(v)) => Ok(v),
            Value::Float32(Some(v)) => {
                Decimal::from_f32(v).ok_or_else(|| cannot_convert::<Self>(&Value::Float32(Some(v))))
            }
            Value::Float64(Some(v)) => {
                Decimal::from_f64(v).ok_or_else(|| cannot_convert::<Self>(&Value::Float64(Some(v))))
            }
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            ref v => v
                .as_i128()
                .and_then(Decimal::from_i128)
                .ok_or_else(|| cannot_convert::<Self>(v)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref().trim();
        Decimal::from_str(input)
            .or_else(|_| Decimal::from_scientific(input))
            .map_err(|e| {
                Error::new(e).context(format!(
                    "Cannot parse `{}` as Decimal",
                    truncate_long!(input)
                ))
            })
    }
}
impl_from!(Decimal);

fn parse_timestamp(input: &str) -> Result<PrimitiveDateTime> {
    let input = input.trim();
    let formats = [
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    ];
    for format in formats {
        if let Ok(v) = PrimitiveDateTime::parse(input, format) {
            return Ok(v);
        }
    }
    if let Ok(v) = Date::parse(input, format_description!("[year]-[month]-[day]")) {
        return Ok(v.midnight());
    }
    Err(Error::msg(format!(
        "Cannot parse `{}` as a timestamp",
        truncate_long!(input)
    )))
}

impl AsValue for Date {
    fn as_empty_value() -> Value {
        Value::Date(None)
    }
    fn as_value(self) -> Value {
        Value::Date(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.date()),
            Value::TimestampWithTimezone(Some(v)) => Ok(v.date()),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            ref v => Err(cannot_convert::<Self>(v)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref().trim();
        Date::parse(input, format_description!("[year]-[month]-[day]"))
            .map_err(Error::new)
            .or_else(|_| parse_timestamp(input).map(|v| v.date()))
    }
}
impl_from!(Date);

impl AsValue for Time {
    fn as_empty_value() -> Value {
        Value::Time(None)
    }
    fn as_value(self) -> Value {
        Value::Time(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.time()),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            ref v => Err(cannot_convert::<Self>(v)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref().trim();
        let formats = [
            format_description!("[hour]:[minute]:[second].[subsecond]"),
            format_description!("[hour]:[minute]:[second]"),
            format_description!("[hour]:[minute]"),
        ];
        for format in formats {
            if let Ok(v) = Time::parse(input, format) {
                return Ok(v);
            }
        }
        Err(Error::msg(format!(
            "Cannot parse `{}` as a time",
            truncate_long!(input)
        )))
    }
}
impl_from!(Time);

impl AsValue for PrimitiveDateTime {
    fn as_empty_value() -> Value {
        Value::Timestamp(None)
    }
    fn as_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(Some(v)) => Ok(v),
            Value::TimestampWithTimezone(Some(v)) => {
                let v = v.to_offset(UtcOffset::UTC);
                Ok(PrimitiveDateTime::new(v.date(), v.time()))
            }
            Value::Date(Some(v)) => Ok(v.midnight()),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            ref v => Err(cannot_convert::<Self>(v)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        parse_timestamp(input.as_ref())
    }
}
impl_from!(PrimitiveDateTime);

impl AsValue for OffsetDateTime {
    fn as_empty_value() -> Value {
        Value::TimestampWithTimezone(None)
    }
    fn as_value(self) -> Value {
        Value::TimestampWithTimezone(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::TimestampWithTimezone(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
            Value::Date(Some(v)) => Ok(v.midnight().assume_utc()),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            ref v => Err(cannot_convert::<Self>(v)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref().trim();
        OffsetDateTime::parse(input, &Rfc3339)
            .map_err(Error::new)
            .or_else(|_| parse_timestamp(input).map(PrimitiveDateTime::assume_utc))
    }
}
impl_from!(OffsetDateTime);

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) | Value::Unknown(Some(ref v)) => {
                <Self as AsValue>::parse(v)
            }
            ref v => Err(cannot_convert::<Self>(v)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        Uuid::parse_str(input.trim()).map_err(|e| {
            Error::new(e).context(format!("Cannot parse `{}` as Uuid", truncate_long!(input)))
        })
    }
}
impl_from!(Uuid);

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
            ref v => Err(cannot_convert::<Self>(v)),
        }
    }
}
impl_from!(Box<[u8]>);

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

impl<T: AsValue> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.as_value()
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_empty_value() -> Value {
        Value::List(None, Box::new(T::as_empty_value()))
    }
    fn as_value(self) -> Value {
        Value::List(
            Some(self.into_iter().map(AsValue::as_value).collect()),
            Box::new(T::as_empty_value()),
        )
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(Some(v), ..) => v.into_iter().map(T::try_from_value).collect(),
            ref v => Err(cannot_convert::<Self>(v)),
        }
    }
}

impl<T: AsValue> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        value.as_value()
    }
}
