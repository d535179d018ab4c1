// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! This module implements the fluent query and its terminal operations.

use super::{
    execute::Executor,
    BoundQuery,
    Clause,
    Command,
    CqlBuilder,
    FindIterator,
    Operator,
    PagedList,
};
use crate::{
    cql::{
        Consistency,
        PagingState,
        Row,
        Value,
    },
    model::Model,
    session::{
        PreparedCache,
        ResultSet,
        Session,
    },
    Error,
};
use std::{
    collections::HashMap,
    fmt,
    sync::Arc,
};

/// Maps a result row into a domain value.
pub type RowMapper<T> = Arc<dyn Fn(&Row) -> Result<T, Error> + Send + Sync>;
/// Converts a value before it is bound to a column.
pub type ColMapper = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A single-use statement bound to a session.
///
/// Chained calls accumulate the statement; a terminal operation (`execute`, `find_one`,
/// `find_list`, `find_iterator`, `find_paged_list`) consumes it.
pub struct Query<S: Session, T> {
    id: u64,
    session: Arc<S>,
    cache: Arc<PreparedCache<S::Prepared>>,
    builder: CqlBuilder,
    row_mapper: Option<RowMapper<T>>,
    col_mappers: HashMap<String, ColMapper>,
    prepared: bool,
    fetch_size: Option<i32>,
    paging_state: Option<PagingState>,
    consistency: Option<Consistency>,
    serial_consistency: Option<Consistency>,
}

impl<S: Session, T> fmt::Debug for Query<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("id", &self.id)
            .field("builder", &self.builder)
            .field("row_mapper", &self.row_mapper.is_some())
            .field("prepared", &self.prepared)
            .field("fetch_size", &self.fetch_size)
            .field("paging_state", &self.paging_state)
            .field("consistency", &self.consistency)
            .field("serial_consistency", &self.serial_consistency)
            .finish()
    }
}

impl<S: Session, T> Query<S, T> {
    /// Create a query without a row mapper or table.
    pub fn new(id: u64, session: Arc<S>, cache: Arc<PreparedCache<S::Prepared>>, command: Command) -> Self {
        Self {
            id,
            session,
            cache,
            builder: CqlBuilder::new(command),
            row_mapper: None,
            col_mappers: HashMap::new(),
            prepared: false,
            fetch_size: None,
            paging_state: None,
            consistency: None,
            serial_consistency: None,
        }
    }

    /// Apply the table, row mapper, primary keys and column mappers of a model
    pub fn model(self, model: &Model<T>) -> Self {
        let mut query = self
            .row_mapper_arc(model.row_mapper().clone())
            .primary_keys(model.primary_keys().iter().cloned())
            .table(model.table_name());
        query.col_mappers = model.col_mappers().clone();
        query
    }

    /// The process-unique id of this query, as it appears in the logs
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The command the query was created for
    pub fn command(&self) -> Command {
        self.builder.command()
    }

    /// Map the result rows with `row_mapper`, changing the query's result type
    pub fn row_mapper<U, F>(self, row_mapper: F) -> Query<S, U>
    where
        F: Fn(&Row) -> Result<U, Error> + Send + Sync + 'static,
    {
        self.row_mapper_arc(Arc::new(row_mapper))
    }

    fn row_mapper_arc<U>(self, row_mapper: RowMapper<U>) -> Query<S, U> {
        Query {
            id: self.id,
            session: self.session,
            cache: self.cache,
            builder: self.builder,
            row_mapper: Some(row_mapper),
            col_mappers: self.col_mappers,
            prepared: self.prepared,
            fetch_size: self.fetch_size,
            paging_state: self.paging_state,
            consistency: self.consistency,
            serial_consistency: self.serial_consistency,
        }
    }

    fn map_builder(mut self, f: impl FnOnce(CqlBuilder) -> CqlBuilder) -> Self {
        self.builder = f(self.builder);
        self
    }

    fn col_value(&self, name: &str, value: Value) -> Value {
        match self.col_mappers.get(name) {
            Some(col_mapper) => col_mapper(value),
            None => value,
        }
    }

    /// Set the table the statement targets
    pub fn table(self, table_name: impl Into<String>) -> Self {
        self.map_builder(|b| b.table(table_name))
    }

    /// The projected columns of a SELECT or DELETE, rendered verbatim (ie. `"a, b"`)
    pub fn columns(self, columns: impl Into<String>) -> Self {
        self.map_builder(|b| b.columns(columns))
    }

    /// Set the primary key columns an UPSERT builds its WHERE clause from
    pub fn primary_keys<I, K>(self, primary_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.map_builder(|b| b.primary_keys(primary_keys))
    }

    /// Set a value to persist
    pub fn val(self, name: &str, value: impl Into<Value>) -> Self {
        let value = self.col_value(name, value.into());
        self.map_builder(|b| b.val(name, value))
    }

    /// Add a pre-built clause to the WHERE clause
    pub fn where_clause(self, clause: Clause) -> Self {
        self.map_builder(|b| b.where_clause(clause))
    }

    fn basic(self, name: &str, operator: Operator, value: impl Into<Value>) -> Self {
        let value = self.col_value(name, value.into());
        self.where_clause(Clause::basic(name, operator, value))
    }

    /// `<name>=?`, the value passing through the column mapper of `name`
    pub fn eq(self, name: &str, value: impl Into<Value>) -> Self {
        self.basic(name, Operator::Equal, value)
    }

    /// `<name>>?`
    pub fn gt(self, name: &str, value: impl Into<Value>) -> Self {
        self.basic(name, Operator::GreaterThan, value)
    }

    /// `<name>>=?`
    pub fn ge(self, name: &str, value: impl Into<Value>) -> Self {
        self.basic(name, Operator::GreaterThanOrEqual, value)
    }

    /// `<name><?`
    pub fn lt(self, name: &str, value: impl Into<Value>) -> Self {
        self.basic(name, Operator::LessThan, value)
    }

    /// `<name><=?`
    pub fn le(self, name: &str, value: impl Into<Value>) -> Self {
        self.basic(name, Operator::LessThanOrEqual, value)
    }

    /// `<name> IN ?`, the values being bound as one list
    pub fn in_list<I, V>(self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_clause(Clause::in_list(name, values))
    }

    /// Guard an UPSERT with the previously read value of a column. A null prior value means the
    /// row must not exist yet.
    pub fn optimistic_lock(self, name: &str, prior_value: impl Into<Value>) -> Self {
        let value = self.col_value(name, prior_value.into());
        self.map_builder(|b| b.optimistic_lock(name, value))
    }

    /// The `GROUP BY` expression of a SELECT
    pub fn group_by(self, group_by: impl Into<String>) -> Self {
        self.map_builder(|b| b.group_by(group_by))
    }

    /// The `ORDER BY` expression of a SELECT
    pub fn order_by(self, order_by: impl Into<String>) -> Self {
        self.map_builder(|b| b.order_by(order_by))
    }

    /// Append `ALLOW FILTERING`
    pub fn set_allow_filtering(self, allow_filtering: bool) -> Self {
        self.map_builder(|b| b.set_allow_filtering(allow_filtering))
    }

    /// Shorthand for `set_allow_filtering(true)`
    pub fn allow_filtering(self) -> Self {
        self.set_allow_filtering(true)
    }

    /// The number of rows the backend returns per page
    pub fn set_fetch_size(mut self, fetch_size: i32) -> Self {
        self.fetch_size = Some(fetch_size);
        self
    }

    /// Resume from a paging token returned by an earlier page. An empty token starts from the
    /// first page.
    pub fn set_paging_state(mut self, paging_state: impl AsRef<str>) -> Self {
        self.paging_state = PagingState::parse(paging_state.as_ref());
        self
    }

    /// The consistency level of this query, overriding the facade default
    pub fn set_consistency_level(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }

    /// The serial consistency of a lightweight transaction, `SERIAL` or `LOCAL_SERIAL`
    pub fn set_serial_consistency_level(mut self, serial_consistency: Consistency) -> Self {
        self.serial_consistency = Some(serial_consistency);
        self
    }

    /// Execute through the prepared-statement cache
    pub fn set_prepared(mut self, prepared: bool) -> Self {
        self.prepared = prepared;
        self
    }

    pub(crate) fn defaults(
        mut self,
        prepared: bool,
        fetch_size: Option<i32>,
        consistency: Option<Consistency>,
        serial_consistency: Option<Consistency>,
    ) -> Self {
        self.prepared = prepared;
        self.fetch_size = fetch_size;
        self.consistency = consistency;
        self.serial_consistency = serial_consistency;
        self
    }

    /// Render the statement without executing it
    pub fn build(&self) -> Result<BoundQuery, Error> {
        self.builder.build()
    }

    fn into_parts(self) -> Result<(Executor<S>, RowMapper<T>, BoundQuery, Option<PagingState>), Error> {
        let row_mapper = self.row_mapper.ok_or(Error::MissingRowMapper)?;
        let executor = Executor {
            id: self.id,
            session: self.session,
            cache: self.cache,
            prepared: self.prepared,
            fetch_size: self.fetch_size,
            consistency: self.consistency,
            serial_consistency: self.serial_consistency,
        };
        executor.validate()?;
        let query = self.builder.build()?;
        Ok((executor, row_mapper, query, self.paging_state))
    }

    /// Execute the statement and return the raw result page.
    ///
    /// Fails with [`Error::DuplicateEntry`], [`Error::OptimisticLock`] or [`Error::Unapplied`]
    /// when the backend did not apply the statement.
    pub async fn execute(self) -> Result<ResultSet, Error> {
        let (executor, _, query, paging_state) = self.into_parts()?;
        executor.execute(&query, paging_state).await
    }

    /// Execute and map the first row, if any
    pub async fn find_one(self) -> Result<Option<T>, Error> {
        let (executor, row_mapper, query, paging_state) = self.into_parts()?;
        let mut results = executor.execute(&query, paging_state).await?;
        results.one().map(|row| row_mapper(&row)).transpose()
    }

    /// Execute and map every row of the fetched page, in backend order
    pub async fn find_list(self) -> Result<Vec<T>, Error> {
        let (executor, row_mapper, query, paging_state) = self.into_parts()?;
        let results = executor.execute(&query, paging_state).await?;
        let mut list = Vec::with_capacity(results.available_without_fetching());
        for row in results.rows() {
            list.push(row_mapper(row)?);
        }
        Ok(list)
    }

    /// Execute and lazily map the rows, requesting the following pages as they are reached
    pub async fn find_iterator(self) -> Result<FindIterator<S, T>, Error> {
        let (executor, row_mapper, query, paging_state) = self.into_parts()?;
        let results = executor.execute(&query, paging_state).await?;
        Ok(FindIterator::new(executor, query, row_mapper, results))
    }

    /// Execute and map the current page only, along with the tokens of this page and the next
    pub async fn find_paged_list(self) -> Result<PagedList<T>, Error> {
        let (executor, row_mapper, query, paging_state) = self.into_parts()?;
        let page_size = executor.fetch_size;
        let current = paging_state.clone();
        let mut results = executor.execute(&query, paging_state).await?;
        let row_count = results.available_without_fetching();
        let next = results.take_paging_state();
        let mut rows = Vec::with_capacity(row_count);
        for row in results.rows().take(row_count) {
            rows.push(row_mapper(row)?);
        }
        Ok(PagedList::new(rows, page_size, current, next))
    }
}
