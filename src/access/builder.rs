// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! This module implements the CQL text synthesis.

use super::{
    BoundQuery,
    Clause,
    Command,
    Operator,
    Parameter,
};
use crate::{
    cql::Value,
    Error,
};
use std::collections::BTreeSet;

/// Accumulates the parts of one statement and renders them into a [`BoundQuery`].
///
/// The rendered parameter list always matches the `?` placeholders of the CQL text, position for
/// position, in the order they appear.
#[derive(Debug, Clone)]
pub struct CqlBuilder {
    command: Command,
    table_name: String,
    columns: Option<String>,
    allow_filtering: bool,
    clauses: Vec<Clause>,
    vals: Vec<Parameter>,
    primary_keys: Option<BTreeSet<String>>,
    optimistic_lock: Option<Parameter>,
    group_by: Option<String>,
    order_by: Option<String>,
}

impl CqlBuilder {
    /// Create an empty builder for `command`
    pub fn new(command: Command) -> Self {
        Self {
            command,
            table_name: String::new(),
            columns: None,
            allow_filtering: false,
            clauses: Vec::new(),
            vals: Vec::new(),
            primary_keys: None,
            optimistic_lock: None,
            group_by: None,
            order_by: None,
        }
    }

    /// The command the builder was created for, before UPSERT resolution
    pub fn command(&self) -> Command {
        self.command
    }

    /// Set the table the statement targets
    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// The projected columns of a SELECT or DELETE, rendered verbatim (ie. `"a, b"`). A SELECT
    /// defaults to `*`.
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    /// Set the primary key columns.
    /// 
    /// An UPSERT builds its WHERE clause from the values of these columns.
    pub fn primary_keys<I, K>(mut self, primary_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.primary_keys = Some(primary_keys.into_iter().map(Into::into).collect());
        self
    }

    /// Set a value to persist
    pub fn val(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vals.push(Parameter::new(name, value));
        self
    }

    /// Add a clause to the WHERE clause, joined to the previous ones with `AND`
    pub fn where_clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// `<name>=?`
    pub fn eq(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_clause(Clause::basic(name, Operator::Equal, value))
    }

    /// `<name>>?`
    pub fn gt(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_clause(Clause::basic(name, Operator::GreaterThan, value))
    }

    /// `<name>>=?`
    pub fn ge(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_clause(Clause::basic(name, Operator::GreaterThanOrEqual, value))
    }

    /// `<name><?`
    pub fn lt(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_clause(Clause::basic(name, Operator::LessThan, value))
    }

    /// `<name><=?`
    pub fn le(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_clause(Clause::basic(name, Operator::LessThanOrEqual, value))
    }

    /// `<name> IN ?`, the values being bound as one list
    pub fn in_list<I, V>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_clause(Clause::in_list(name, values))
    }

    /// Guard an UPSERT with the previously read value of a column. A null prior value means the
    /// row must not exist yet.
    pub fn optimistic_lock(mut self, name: impl Into<String>, prior_value: impl Into<Value>) -> Self {
        self.optimistic_lock = Some(Parameter::new(name, prior_value));
        self
    }

    /// The `GROUP BY` expression of a SELECT
    pub fn group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    /// The `ORDER BY` expression of a SELECT
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Append `ALLOW FILTERING`
    pub fn set_allow_filtering(mut self, allow_filtering: bool) -> Self {
        self.allow_filtering = allow_filtering;
        self
    }

    /// Shorthand for `set_allow_filtering(true)`
    pub fn allow_filtering(self) -> Self {
        self.set_allow_filtering(true)
    }

    /// The command sent to the backend: an UPSERT is an INSERT unless a non-null optimistic lock
    /// turns it into an UPDATE.
    pub fn effective_command(&self) -> Command {
        match self.command {
            Command::Upsert => match &self.optimistic_lock {
                Some(lock) if !lock.value().is_null() => Command::Update,
                _ => Command::Insert,
            },
            command => command,
        }
    }

    fn is_primary_key(&self, name: &str) -> bool {
        self.primary_keys.as_ref().map_or(false, |keys| keys.contains(name))
    }

    /// Render the statement.
    pub fn build(&self) -> Result<BoundQuery, Error> {
        let is_upsert = self.command == Command::Upsert;
        if is_upsert && self.primary_keys.as_ref().map_or(true, BTreeSet::is_empty) {
            return Err(Error::MissingPrimaryKeys);
        }
        let is_optimistic_locking = is_upsert && self.optimistic_lock.is_some();
        let cmd = self.effective_command();
        let mut cql = String::with_capacity(64);
        let mut parameters = Vec::with_capacity(self.vals.len() + self.clauses.len() + 1);

        cql.push_str(cmd.as_str());
        match cmd {
            Command::Select | Command::Delete => {
                let columns = match (&self.columns, cmd) {
                    (Some(columns), _) => Some(columns.as_str()),
                    (None, Command::Select) => Some("*"),
                    (None, _) => None,
                };
                if let Some(columns) = columns {
                    cql.push(' ');
                    cql.push_str(columns);
                }
                cql.push_str(" FROM ");
            }
            Command::Update => cql.push(' '),
            Command::Insert => cql.push_str(" INTO "),
            Command::Upsert => (),
        }
        cql.push_str(&self.table_name);

        if cmd == Command::Insert {
            cql.push_str(" (");
            for (i, p) in self.vals.iter().enumerate() {
                if i > 0 {
                    cql.push(',');
                }
                cql.push_str(p.name());
                parameters.push(p.clone());
            }
            cql.push_str(") VALUES (");
            for i in 0..self.vals.len() {
                if i > 0 {
                    cql.push(',');
                }
                cql.push('?');
            }
            cql.push(')');
        }

        if cmd == Command::Update {
            cql.push_str(" SET");
            let mut count = 0;
            // primary keys are only ever part of the WHERE clause of an upsert
            for p in self.vals.iter().filter(|p| !(is_upsert && self.is_primary_key(p.name()))) {
                if count > 0 {
                    cql.push(',');
                }
                cql.push(' ');
                cql.push_str(p.name());
                cql.push_str("=?");
                parameters.push(p.clone());
                count += 1;
            }
        }

        if let Command::Select | Command::Delete | Command::Update = cmd {
            let upsert_clauses;
            let clauses = if is_upsert {
                upsert_clauses = self
                    .vals
                    .iter()
                    .filter(|p| self.is_primary_key(p.name()))
                    .map(|p| Clause::eq(p.name(), p.value().clone()))
                    .collect::<Vec<_>>();
                &upsert_clauses
            } else {
                &self.clauses
            };
            if !clauses.is_empty() {
                cql.push_str(" WHERE ");
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        cql.push_str(" AND ");
                    }
                    clause.append_to(&mut cql, &mut parameters);
                }
            }
        }

        if cmd == Command::Select {
            if let Some(group_by) = &self.group_by {
                cql.push_str(" GROUP BY ");
                cql.push_str(group_by);
            }
            if let Some(order_by) = &self.order_by {
                cql.push_str(" ORDER BY ");
                cql.push_str(order_by);
            }
        }

        let optimistic_lock = if is_optimistic_locking {
            self.optimistic_lock.clone()
        } else {
            None
        };
        if let Some(lock) = &optimistic_lock {
            match cmd {
                Command::Insert => cql.push_str(" IF NOT EXISTS"),
                Command::Update => {
                    cql.push_str(" IF ");
                    cql.push_str(lock.name());
                    cql.push_str("=?");
                    parameters.push(lock.clone());
                }
                _ => (),
            }
        }

        if self.allow_filtering {
            cql.push_str(" ALLOW FILTERING");
        }

        Ok(BoundQuery {
            command: cmd,
            cql,
            table_name: self.table_name.clone(),
            parameters,
            primary_keys: self.primary_keys.clone().unwrap_or_default(),
            optimistic_lock,
        })
    }
}
