// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! CQL values as they are bound to statements and read back from result rows.

mod consistency;
mod decoder;
mod paging;
mod row;
mod value;

pub use consistency::Consistency;
pub use decoder::ColumnDecoder;
pub use paging::PagingState;
pub use row::Row;
pub use value::Value;

use derive_more::{
    Deref,
    DerefMut,
    From,
    Into,
};
use std::fmt;
use thiserror::Error;

/// A CQL `blob` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deref, DerefMut, From, Into)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Blob(data)
    }

    /// Store the UTF-8 bytes of a string as a blob
    pub fn from_utf8_str(s: &str) -> Self {
        Blob(s.as_bytes().to_vec())
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in self.0.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// A column value could not be read as the requested type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Column {0} is not present")]
    MissingColumn(String),
    #[error("Column {0} is null")]
    UnexpectedNull(String),
    #[error("Unable to convert {found} <-> {expected} for column {column}")]
    Incompatible {
        column: String,
        found: &'static str,
        expected: &'static str,
    },
    #[error("Value {value} of column {column} does not fit in {expected}")]
    OutOfRange {
        column: String,
        value: String,
        expected: &'static str,
    },
    #[error("Column {column} does not hold valid UTF-8")]
    InvalidUtf8 { column: String },
}
