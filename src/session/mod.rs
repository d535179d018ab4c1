// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The session collaborator: whatever connects to the cluster, prepares and executes statements.

mod prepared;

pub use prepared::PreparedCache;

use crate::cql::{
    Consistency,
    PagingState,
    Row,
    Value,
};
use derive_builder::Builder;
use std::collections::VecDeque;

/// The name of the column a lightweight transaction reports its outcome in.
pub const APPLIED_COLUMN: &str = "[applied]";

/// A connected, ready session.
///
/// Implementations own transport, pooling, retries and timeouts; errors they return are passed
/// to the caller unmodified.
#[async_trait::async_trait]
pub trait Session: Send + Sync + 'static {
    /// The prepared form of a statement
    type Prepared: Clone + Send + Sync + 'static;

    /// Prepare a CQL text
    async fn prepare(&self, cql: &str) -> anyhow::Result<Self::Prepared>;

    /// Execute an unprepared statement
    async fn query(&self, statement: Statement) -> anyhow::Result<ResultSet>;

    /// Execute a prepared statement, binding the values of `statement`
    async fn execute(&self, prepared: &Self::Prepared, statement: Statement) -> anyhow::Result<ResultSet>;
}

/// A statement ready to be sent: its CQL text, the positional values and the request options.
#[derive(Clone, Debug, PartialEq, Builder)]
#[builder(pattern = "owned", setter(strip_option))]
pub struct Statement {
    /// The CQL text
    #[builder(setter(into))]
    pub(crate) cql: String,
    /// The positional values
    #[builder(default)]
    pub(crate) values: Vec<Value>,
    /// The page size
    #[builder(default)]
    pub(crate) page_size: Option<i32>,
    /// The paging state to resume from
    #[builder(default)]
    pub(crate) paging_state: Option<PagingState>,
    /// The consistency level
    #[builder(default)]
    pub(crate) consistency: Option<Consistency>,
    /// The serial consistency level
    #[builder(default)]
    pub(crate) serial_consistency: Option<Consistency>,
}

impl Statement {
    /// Get the CQL text.
    pub fn cql(&self) -> &str {
        &self.cql
    }

    /// Get the bound values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get the page size.
    pub fn page_size(&self) -> Option<i32> {
        self.page_size
    }

    /// Get the paging state.
    pub fn paging_state(&self) -> Option<&PagingState> {
        self.paging_state.as_ref()
    }

    /// Get the consistency level.
    pub fn consistency(&self) -> Option<Consistency> {
        self.consistency
    }

    /// Get the serial consistency level.
    pub fn serial_consistency(&self) -> Option<Consistency> {
        self.serial_consistency
    }
}

/// One page of results, as returned by the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: VecDeque<Row>,
    applied: Option<bool>,
    paging_state: Option<PagingState>,
}

impl ResultSet {
    /// A result holding the rows of the current page
    pub fn new(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            applied: None,
            paging_state: None,
        }
    }

    /// Report the outcome of a conditional statement explicitly
    pub fn with_applied(mut self, applied: bool) -> Self {
        self.applied = Some(applied);
        self
    }

    /// The token of the next page, if any
    pub fn with_paging_state(mut self, paging_state: impl Into<PagingState>) -> Self {
        self.paging_state = Some(paging_state.into());
        self
    }

    /// Whether a conditional statement was applied.
    ///
    /// Uses the flag reported by the session if any, otherwise the `[applied]` column of the first
    /// row. Unconditional statements are always applied.
    pub fn was_applied(&self) -> bool {
        if let Some(applied) = self.applied {
            return applied;
        }
        self.rows
            .front()
            .and_then(|row| row.get_opt::<bool>(APPLIED_COLUMN).ok().flatten())
            .unwrap_or(true)
    }

    /// The number of rows available without fetching another page
    pub fn available_without_fetching(&self) -> usize {
        self.rows.len()
    }

    /// The paging state of the next page, absent on the last page
    pub fn paging_state(&self) -> Option<&PagingState> {
        self.paging_state.as_ref()
    }

    pub fn has_more_pages(&self) -> bool {
        self.paging_state.is_some()
    }

    /// Take the next row of this page
    pub fn one(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }

    pub(crate) fn take_paging_state(&mut self) -> Option<PagingState> {
        self.paging_state.take()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> VecDeque<Row> {
        self.rows
    }
}
