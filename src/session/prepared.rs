// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use super::Session;
use dashmap::DashMap;
use log::debug;

/// Prepared statements keyed by their exact CQL text.
///
/// Shared by every query of a facade. Lookups never hold a guard while preparing, so concurrent
/// callers racing on the same text may each prepare it; the last one stored wins.
#[derive(Debug)]
pub struct PreparedCache<P> {
    statements: DashMap<String, P>,
}

impl<P> Default for PreparedCache<P> {
    fn default() -> Self {
        Self {
            statements: DashMap::new(),
        }
    }
}

impl<P: Clone> PreparedCache<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the prepared form of `cql`, preparing it through the session on a miss
    pub async fn get_or_prepare<S>(&self, session: &S, cql: &str) -> anyhow::Result<P>
    where
        S: Session<Prepared = P>,
    {
        if let Some(prepared) = self.get(cql) {
            return Ok(prepared);
        }
        debug!("Preparing statement: {}", cql);
        let prepared = session.prepare(cql).await?;
        self.statements.insert(cql.to_owned(), prepared.clone());
        Ok(prepared)
    }

    pub fn get(&self, cql: &str) -> Option<P> {
        self.statements.get(cql).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Forget every prepared statement, ie. after a schema change
    pub fn clear(&self) {
        self.statements.clear()
    }
}
