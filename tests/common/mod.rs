// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use scylla_orm::prelude::*;
use std::{
    collections::VecDeque,
    sync::Mutex,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockPrepared {
    pub id: usize,
    pub cql: String,
}

/// An in-memory session recording everything sent to it and replaying scripted results.
#[derive(Default)]
pub struct MockSession {
    prepared: Mutex<Vec<String>>,
    executed: Mutex<Vec<(Option<MockPrepared>, Statement)>>,
    results: Mutex<VecDeque<anyhow::Result<ResultSet>>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next execution
    pub fn push_result(&self, result: ResultSet) -> &Self {
        self.results.lock().unwrap().push_back(Ok(result));
        self
    }

    /// Queue a failure of the next execution
    pub fn push_error(&self, error: anyhow::Error) -> &Self {
        self.results.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn prepared(&self) -> Vec<String> {
        self.prepared.lock().unwrap().clone()
    }

    pub fn executed(&self) -> Vec<(Option<MockPrepared>, Statement)> {
        self.executed.lock().unwrap().clone()
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.executed().into_iter().map(|(_, s)| s).collect()
    }

    pub fn last_statement(&self) -> Statement {
        self.statements().pop().expect("nothing was executed")
    }

    fn next_result(&self) -> anyhow::Result<ResultSet> {
        self.results.lock().unwrap().pop_front().unwrap_or_else(|| Ok(ResultSet::default()))
    }
}

#[async_trait::async_trait]
impl Session for MockSession {
    type Prepared = MockPrepared;

    async fn prepare(&self, cql: &str) -> anyhow::Result<MockPrepared> {
        let mut prepared = self.prepared.lock().unwrap();
        prepared.push(cql.to_owned());
        Ok(MockPrepared {
            id: prepared.len(),
            cql: cql.to_owned(),
        })
    }

    async fn query(&self, statement: Statement) -> anyhow::Result<ResultSet> {
        self.executed.lock().unwrap().push((None, statement));
        self.next_result()
    }

    async fn execute(&self, prepared: &MockPrepared, statement: Statement) -> anyhow::Result<ResultSet> {
        anyhow::ensure!(prepared.cql == statement.cql(), "prepared statement mismatch");
        self.executed.lock().unwrap().push((Some(prepared.clone()), statement));
        self.next_result()
    }
}

/// A result page holding `rows`
pub fn page<I: IntoIterator<Item = Row>>(rows: I) -> ResultSet {
    ResultSet::new(rows)
}

pub fn user_row(id: i64, name: &str) -> Row {
    Row::new().with_column("id", id).with_column("name", name)
}
