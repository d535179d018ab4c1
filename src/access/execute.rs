// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use super::BoundQuery;
use crate::{
    cql::{
        Consistency,
        PagingState,
    },
    session::{
        PreparedCache,
        ResultSet,
        Session,
        StatementBuilder,
    },
    Error,
};
use log::*;
use std::{
    sync::Arc,
    time::Instant,
};

/// Runs bound queries against the session with the request options of one query.
pub(crate) struct Executor<S: Session> {
    pub(crate) id: u64,
    pub(crate) session: Arc<S>,
    pub(crate) cache: Arc<PreparedCache<S::Prepared>>,
    pub(crate) prepared: bool,
    pub(crate) fetch_size: Option<i32>,
    pub(crate) consistency: Option<Consistency>,
    pub(crate) serial_consistency: Option<Consistency>,
}

impl<S: Session> Executor<S> {
    /// Check the request options before anything is sent
    pub(crate) fn validate(&self) -> Result<(), Error> {
        match self.serial_consistency {
            Some(level) if !level.is_serial() => Err(Error::InvalidSerialConsistency(level)),
            _ => Ok(()),
        }
    }

    /// Bind and execute a query, resuming from `paging_state` if given.
    ///
    /// A statement the backend did not apply is reported as an error.
    pub(crate) async fn execute(
        &self,
        query: &BoundQuery,
        paging_state: Option<PagingState>,
    ) -> Result<ResultSet, Error> {
        let mut builder = StatementBuilder::default().cql(query.cql()).values(query.to_values());
        if let Some(fetch_size) = self.fetch_size {
            builder = builder.page_size(fetch_size);
        }
        if let Some(paging_state) = paging_state {
            builder = builder.paging_state(paging_state);
        }
        if let Some(consistency) = self.consistency {
            builder = builder.consistency(consistency);
        }
        if let Some(serial_consistency) = self.serial_consistency {
            builder = builder.serial_consistency(serial_consistency);
        }
        let statement = builder.build().map_err(|e| Error::Statement(e.to_string()))?;

        if log_enabled!(Level::Trace) {
            trace!("[txn {}] cql {}", self.id, query.cql());
            trace!(
                "[txn {}] val [{}]",
                self.id,
                query
                    .parameters()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let start = Instant::now();
        let res = if self.prepared {
            match self.cache.get_or_prepare(&*self.session, query.cql()).await {
                Ok(prepared) => self.session.execute(&prepared, statement).await,
                Err(e) => Err(e),
            }
        } else {
            self.session.query(statement).await
        };
        trace!(
            "[txn {}] execute {} in {} ms",
            self.id,
            if res.is_ok() { "success" } else { "failed" },
            start.elapsed().as_millis()
        );

        let results = res?;
        if !results.was_applied() {
            let error = query.unapplied_error();
            debug!("[txn {}] {}", self.id, error);
            return Err(error);
        }
        Ok(results)
    }
}
