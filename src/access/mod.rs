// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

/// Provides the `BoundQuery`, the rendered form of a statement
/// and the contract between the builder and the executor
pub(crate) mod bound;
/// Provides the `CqlBuilder` which accumulates clauses and
/// values and renders them into CQL text
pub(crate) mod builder;
/// Provides the `Clause` comparisons of a WHERE clause
pub(crate) mod clause;
pub(crate) mod execute;
/// Provides the result consumers `FindIterator` and `PagedList`
pub(crate) mod find;
/// Provides the fluent `Query` which binds a builder to a session
pub(crate) mod query;

pub use bound::BoundQuery;
pub use builder::CqlBuilder;
pub use clause::{
    Clause,
    Operator,
};
pub use find::{
    FindIterator,
    PagedList,
};
pub use query::{
    ColMapper,
    Query,
    RowMapper,
};

use crate::cql::Value;
use std::fmt;

/// The statement kinds a query can be built for.
///
/// `Upsert` is not sent to the backend as such: it resolves into an `Insert` or an `Update`
/// depending on the optimistic lock.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Select,
    Insert,
    Update,
    Delete,
    Upsert,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Select => "SELECT",
            Command::Insert => "INSERT",
            Command::Update => "UPDATE",
            Command::Delete => "DELETE",
            Command::Upsert => "UPSERT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named value bound to one placeholder of a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: Value,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
