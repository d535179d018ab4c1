// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::{
    access::Command,
    cql::{
        Consistency,
        ConversionError,
    },
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
/// The query error.
pub enum Error {
    /// The query was executed without a row mapper.
    #[error("A row mapper must be set prior to execute")]
    MissingRowMapper,
    /// An UPSERT needs the primary keys to build its WHERE clause.
    #[error("UPSERT not allowed (primary keys not set)")]
    MissingPrimaryKeys,
    /// No model was registered for the requested type.
    #[error("Model for type {0} was not registered!")]
    UnregisteredModel(&'static str),
    /// Serial consistency only accepts the serial levels.
    #[error("Serial consistency must be SERIAL or LOCAL_SERIAL, got {0}")]
    InvalidSerialConsistency(Consistency),
    /// The configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// The bound statement could not be assembled.
    #[error("Unable to assemble statement: {0}")]
    Statement(String),
    /// The backend did not apply a conditional statement.
    #[error("Unable to apply {command}")]
    Unapplied { command: Command },
    /// An `IF NOT EXISTS` insert found the row already present.
    #[error("Duplicate entry for primary key '{primary_key}' in table {table}")]
    DuplicateEntry { primary_key: String, table: String },
    /// An `IF <lock>=?` update found the lock column changed.
    #[error("Data has changed. Updated [0] rows for primary key '{primary_key}' in table {table}")]
    OptimisticLock { primary_key: String, table: String },
    /// A column could not be read as the requested type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// An error reported by the session.
    #[error(transparent)]
    Session(#[from] anyhow::Error),
}

impl Error {
    /// Whether this error was raised before reaching the session
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingRowMapper
                | Error::MissingPrimaryKeys
                | Error::UnregisteredModel(_)
                | Error::InvalidSerialConsistency(_)
                | Error::Config(_)
                | Error::Statement(_)
        )
    }

    /// Whether the backend declined to apply the statement
    pub fn is_unapplied(&self) -> bool {
        matches!(
            self,
            Error::Unapplied { .. } | Error::DuplicateEntry { .. } | Error::OptimisticLock { .. }
        )
    }

    pub fn is_duplicate_entry(&self) -> bool {
        matches!(self, Error::DuplicateEntry { .. })
    }

    pub fn is_optimistic_lock(&self) -> bool {
        matches!(self, Error::OptimisticLock { .. })
    }
}
