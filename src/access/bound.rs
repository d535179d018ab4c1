// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use super::{
    Command,
    Parameter,
};
use crate::{
    cql::Value,
    Error,
};
use std::collections::BTreeSet;

/// A rendered statement: the CQL text and the parameters for its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    pub(crate) command: Command,
    pub(crate) cql: String,
    pub(crate) table_name: String,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) primary_keys: BTreeSet<String>,
    pub(crate) optimistic_lock: Option<Parameter>,
}

impl BoundQuery {
    /// The effective command, an UPSERT being resolved into INSERT or UPDATE
    pub fn command(&self) -> Command {
        self.command
    }

    pub fn cql(&self) -> &str {
        &self.cql
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn primary_keys(&self) -> &BTreeSet<String> {
        &self.primary_keys
    }

    /// The optimistic lock in play, only set for UPSERTs
    pub fn optimistic_lock(&self) -> Option<&Parameter> {
        self.optimistic_lock.as_ref()
    }

    /// The positional values to bind
    pub fn to_values(&self) -> Vec<Value> {
        self.parameters.iter().map(|p| p.value().clone()).collect()
    }

    /// The error to report when the backend did not apply this statement.
    ///
    /// With an optimistic lock in play a null prior value means the row was expected not to
    /// exist (`IF NOT EXISTS`), any other value means it was expected unchanged (`IF <lock>=?`).
    pub fn unapplied_error(&self) -> Error {
        match &self.optimistic_lock {
            Some(lock) => {
                let primary_key = self
                    .parameters
                    .iter()
                    .filter(|p| self.primary_keys.contains(p.name()))
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                let table = self.table_name.clone();
                if lock.value().is_null() {
                    Error::DuplicateEntry { primary_key, table }
                } else {
                    Error::OptimisticLock { primary_key, table }
                }
            }
            None => Error::Unapplied { command: self.command },
        }
    }
}
