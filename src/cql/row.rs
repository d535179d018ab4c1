// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! This module defines the result row with typed column access.

use super::{
    ColumnDecoder,
    ConversionError,
    Value,
};

/// A result row: column names with their values, in the order the backend returned them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column to this row
    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((name.into(), value.into()));
    }

    /// Check whether the row has a column with the given name
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Check whether the row has a column, failing if it is required but absent.
    pub fn has_column(&self, name: &str, required: bool) -> Result<bool, ConversionError> {
        let exists = self.contains(name);
        if !exists && required {
            return Err(ConversionError::MissingColumn(name.to_owned()));
        }
        Ok(exists)
    }

    /// The raw value of a column
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Read a required column.
    ///
    /// Fails if the column is absent, if it is null and `T` is not an `Option`, or if its value
    /// cannot be converted to `T`.
    pub fn get<T: ColumnDecoder>(&self, name: &str) -> Result<T, ConversionError> {
        let value = self
            .value(name)
            .ok_or_else(|| ConversionError::MissingColumn(name.to_owned()))?;
        T::try_decode_nullable(name, value)
    }

    /// Read an optional column. An absent column or a null value yields `None`.
    pub fn get_opt<T: ColumnDecoder>(&self, name: &str) -> Result<Option<T>, ConversionError> {
        match self.value(name) {
            Some(value) => Option::<T>::try_decode_nullable(name, value),
            None => Ok(None),
        }
    }

    /// The column names of this row
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<N: Into<String>, V: Into<Value>> std::iter::FromIterator<(N, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Row {
            columns: iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{
        DateTime,
        TimeZone,
        Utc,
    };
    use uuid::Uuid;

    fn row() -> Row {
        Row::new()
            .with_column("id", Uuid::nil())
            .with_column("vc", "\u{20AC}hello")
            .with_column("ts", Utc.timestamp_millis_opt(1_000).unwrap())
            .with_column("missing_ts", None::<DateTime<Utc>>)
    }

    #[test]
    fn required_columns() {
        let row = row();
        assert_eq!(row.get::<Uuid>("id").unwrap(), Uuid::nil());
        assert_eq!(row.get::<String>("vc").unwrap(), "\u{20AC}hello");
        assert_eq!(
            row.get::<String>("notexists"),
            Err(ConversionError::MissingColumn("notexists".to_owned()))
        );
        assert!(row.has_column("notexists", true).is_err());
        assert_eq!(row.has_column("notexists", false), Ok(false));
    }

    #[test]
    fn optional_columns() {
        let row = row();
        assert_eq!(row.get_opt::<DateTime<Utc>>("notexists").unwrap(), None);
        assert_eq!(row.get_opt::<DateTime<Utc>>("missing_ts").unwrap(), None);
        assert_eq!(row.get::<Option<DateTime<Utc>>>("missing_ts").unwrap(), None);
        assert_eq!(
            row.get_opt::<DateTime<Utc>>("ts").unwrap(),
            Some(Utc.timestamp_millis_opt(1_000).unwrap())
        );
        // present but not convertible is still an error
        assert!(row.get_opt::<DateTime<Utc>>("vc").is_err());
    }

    #[test]
    fn collects_from_pairs() {
        let row: Row = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(row.len(), 2);
    }
}
