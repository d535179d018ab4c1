// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! This module implements the typed column decoder.

use super::{
    Blob,
    ConversionError,
    Value,
};
use chrono::{
    DateTime,
    NaiveDateTime,
    TimeZone,
    Utc,
};
use std::convert::TryFrom;
use uuid::Uuid;

/// Decode a typed value out of a result column.
pub trait ColumnDecoder: Sized {
    /// The type name reported in conversion errors
    const TYPE_NAME: &'static str;

    /// Decode a non-null column value.
    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError>;

    /// Decode a column value which may be null. Only `Option<T>` accepts a null value.
    fn try_decode_nullable(column: &str, value: &Value) -> Result<Self, ConversionError> {
        if value.is_null() {
            Err(ConversionError::UnexpectedNull(column.to_owned()))
        } else {
            Self::try_decode_column(column, value)
        }
    }
}

fn incompatible<T: ColumnDecoder>(column: &str, value: &Value) -> ConversionError {
    ConversionError::Incompatible {
        column: column.to_owned(),
        found: value.type_name(),
        expected: T::TYPE_NAME,
    }
}

impl<T: ColumnDecoder> ColumnDecoder for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
        T::try_decode_column(column, value).map(Some)
    }

    fn try_decode_nullable(column: &str, value: &Value) -> Result<Self, ConversionError> {
        if value.is_null() {
            Ok(None)
        } else {
            Self::try_decode_column(column, value)
        }
    }
}

impl ColumnDecoder for Value {
    const TYPE_NAME: &'static str = "value";

    fn try_decode_column(_column: &str, value: &Value) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }

    fn try_decode_nullable(_column: &str, value: &Value) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

impl ColumnDecoder for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Boolean(v) => Ok(*v),
            _ => Err(incompatible::<Self>(column, value)),
        }
    }
}

macro_rules! integer_decoder {
    ($($t:ty => $name:literal),*) => {
        $(
            impl ColumnDecoder for $t {
                const TYPE_NAME: &'static str = $name;

                fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
                    let wide = value.as_i64().ok_or_else(|| incompatible::<Self>(column, value))?;
                    <$t>::try_from(wide).map_err(|_| ConversionError::OutOfRange {
                        column: column.to_owned(),
                        value: wide.to_string(),
                        expected: $name,
                    })
                }
            }
        )*
    };
}

integer_decoder!(i8 => "tinyint", i16 => "smallint", i32 => "int", i64 => "bigint");

impl ColumnDecoder for f32 {
    const TYPE_NAME: &'static str = "float";

    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(v) => Ok(*v),
            _ => Err(incompatible::<Self>(column, value)),
        }
    }
}

impl ColumnDecoder for f64 {
    const TYPE_NAME: &'static str = "double";

    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Double(v) => Ok(*v),
            Value::Float(v) => Ok(*v as f64),
            _ => Err(incompatible::<Self>(column, value)),
        }
    }
}

impl ColumnDecoder for String {
    const TYPE_NAME: &'static str = "text";

    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            Value::Blob(v) => String::from_utf8(v.to_vec()).map_err(|_| ConversionError::InvalidUtf8 {
                column: column.to_owned(),
            }),
            _ => Err(incompatible::<Self>(column, value)),
        }
    }
}

impl ColumnDecoder for Blob {
    const TYPE_NAME: &'static str = "blob";

    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Blob(v) => Ok(v.clone()),
            Value::Text(v) => Ok(Blob::from_utf8_str(v)),
            _ => Err(incompatible::<Self>(column, value)),
        }
    }
}

impl ColumnDecoder for Uuid {
    const TYPE_NAME: &'static str = "uuid";

    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Uuid(v) => Ok(*v),
            _ => Err(incompatible::<Self>(column, value)),
        }
    }
}

impl ColumnDecoder for DateTime<Utc> {
    const TYPE_NAME: &'static str = "timestamp";

    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Timestamp(v) => Ok(*v),
            // epoch millis stored in a bigint column
            Value::BigInt(millis) => Utc.timestamp_millis_opt(*millis).single().ok_or_else(|| {
                ConversionError::OutOfRange {
                    column: column.to_owned(),
                    value: millis.to_string(),
                    expected: Self::TYPE_NAME,
                }
            }),
            _ => Err(incompatible::<Self>(column, value)),
        }
    }
}

impl ColumnDecoder for NaiveDateTime {
    const TYPE_NAME: &'static str = "timestamp";

    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
        DateTime::<Utc>::try_decode_column(column, value).map(|v| v.naive_utc())
    }
}

impl<E: ColumnDecoder> ColumnDecoder for Vec<E> {
    const TYPE_NAME: &'static str = "list";

    fn try_decode_column(column: &str, value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::List(elements) => elements
                .iter()
                .map(|e| E::try_decode_nullable(column, e))
                .collect(),
            _ => Err(incompatible::<Self>(column, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen_and_narrow_with_range_checks() {
        assert_eq!(i64::try_decode_column("n", &Value::TinyInt(-3)).unwrap(), -3);
        assert_eq!(i8::try_decode_column("n", &Value::BigInt(100)).unwrap(), 100);
        assert_eq!(
            i8::try_decode_column("n", &Value::Int(300)),
            Err(ConversionError::OutOfRange {
                column: "n".to_owned(),
                value: "300".to_owned(),
                expected: "tinyint",
            })
        );
        assert!(matches!(
            i32::try_decode_column("n", &Value::Double(1.0)),
            Err(ConversionError::Incompatible { .. })
        ));
    }

    #[test]
    fn strings_from_text_and_blobs() {
        let blob = Value::Blob(Blob::from_utf8_str("this is a blob"));
        assert_eq!(String::try_decode_column("bl", &blob).unwrap(), "this is a blob");
        let bad = Value::Blob(Blob::new(vec![0xff, 0xfe]));
        assert_eq!(
            String::try_decode_column("bl", &bad),
            Err(ConversionError::InvalidUtf8 { column: "bl".to_owned() })
        );
    }

    #[test]
    fn timestamps_from_bigint_millis() {
        let ts = DateTime::<Utc>::try_decode_column("bi", &Value::BigInt(1_500_000_000_123)).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_500_000_000_123);
        assert!(matches!(
            DateTime::<Utc>::try_decode_column("vc", &Value::Text("a".to_owned())),
            Err(ConversionError::Incompatible {
                found: "text",
                expected: "timestamp",
                ..
            })
        ));
    }

    #[test]
    fn floats_widen_but_never_narrow() {
        assert_eq!(f64::try_decode_column("f", &Value::Float(1.5)).unwrap(), 1.5);
        assert_eq!(f64::try_decode_column("d", &Value::Double(2.25)).unwrap(), 2.25);
        assert_eq!(
            f32::try_decode_column("d", &Value::Double(2.25)),
            Err(ConversionError::Incompatible {
                column: "d".to_owned(),
                found: "double",
                expected: "float",
            })
        );
    }

    #[test]
    fn naive_timestamps() {
        let ts = Utc.timestamp_millis_opt(1_500_000_000_123).unwrap();
        assert_eq!(
            NaiveDateTime::try_decode_column("ts", &Value::Timestamp(ts)).unwrap(),
            ts.naive_utc()
        );
        assert_eq!(
            NaiveDateTime::try_decode_column("bi", &Value::BigInt(1_500_000_000_123)).unwrap(),
            ts.naive_utc()
        );
        assert!(matches!(
            NaiveDateTime::try_decode_column("i", &Value::Int(1)),
            Err(ConversionError::Incompatible { found: "int", .. })
        ));
    }

    #[test]
    fn nulls() {
        assert_eq!(
            String::try_decode_nullable("vc", &Value::Null),
            Err(ConversionError::UnexpectedNull("vc".to_owned()))
        );
        assert_eq!(Option::<String>::try_decode_nullable("vc", &Value::Null).unwrap(), None);
        let list = Value::List(vec![Value::Int(1), Value::Null]);
        assert_eq!(
            Vec::<Option<i32>>::try_decode_nullable("l", &list).unwrap(),
            vec![Some(1), None]
        );
    }
}
