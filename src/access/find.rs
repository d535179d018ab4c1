// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use super::{
    execute::Executor,
    BoundQuery,
    RowMapper,
};
use crate::{
    cql::PagingState,
    session::{
        ResultSet,
        Session,
    },
    Error,
};
use futures::{
    stream,
    Stream,
};
use log::*;

/// A lazy, single-pass sequence of mapped rows.
///
/// When the current page is exhausted and the backend reported a following one, the same
/// statement is executed again from the echoed paging state.
pub struct FindIterator<S: Session, T> {
    executor: Executor<S>,
    query: BoundQuery,
    row_mapper: RowMapper<T>,
    results: ResultSet,
    count: u64,
}

impl<S: Session, T> FindIterator<S, T> {
    pub(crate) fn new(executor: Executor<S>, query: BoundQuery, row_mapper: RowMapper<T>, results: ResultSet) -> Self {
        Self {
            executor,
            query,
            row_mapper,
            results,
            count: 0,
        }
    }

    /// Map the next row, fetching the following page if needed.
    ///
    /// Returns `None` once the last page is exhausted. A failed fetch ends the sequence after
    /// its error is yielded.
    pub async fn next(&mut self) -> Option<Result<T, Error>> {
        loop {
            if let Some(row) = self.results.one() {
                self.count += 1;
                return Some((self.row_mapper)(&row));
            }
            let paging_state = self.results.take_paging_state()?;
            trace!("[txn {}] fetching page {}", self.executor.id, paging_state);
            match self.executor.execute(&self.query, Some(paging_state)).await {
                Ok(results) => self.results = results,
                Err(e) => return Some(Err(e)),
            }
        }
    }

    /// The number of rows yielded so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The CQL text being iterated
    pub fn cql(&self) -> &str {
        self.query.cql()
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<T, Error>> {
        stream::unfold(self, |mut iter| async move {
            let item = iter.next().await?;
            Some((item, iter))
        })
    }
}

/// One page of mapped rows along with the paging tokens of this page and the next.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    rows: Vec<T>,
    page_size: Option<i32>,
    current_token: Option<PagingState>,
    next_token: Option<PagingState>,
}

impl<T> PagedList<T> {
    pub(crate) fn new(
        rows: Vec<T>,
        page_size: Option<i32>,
        current_token: Option<PagingState>,
        next_token: Option<PagingState>,
    ) -> Self {
        Self {
            rows,
            page_size,
            current_token,
            next_token,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    /// The fetch size the page was requested with
    pub fn page_size(&self) -> Option<i32> {
        self.page_size
    }

    /// The token this page was requested from, absent for the first page
    pub fn current_token(&self) -> Option<&str> {
        self.current_token.as_ref().map(PagingState::as_str)
    }

    /// The token to request the following page with, absent on the last page
    pub fn next_token(&self) -> Option<&str> {
        self.next_token.as_ref().map(PagingState::as_str)
    }

    pub fn has_next(&self) -> bool {
        self.next_token.is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_list_tokens() {
        let page = PagedList::new(vec![1, 2], Some(2), None, Some(PagingState::from("abc")));
        assert_eq!(page.len(), 2);
        assert_eq!(page.current_token(), None);
        assert_eq!(page.next_token(), Some("abc"));
        assert!(page.has_next());
        let last = PagedList::<i32>::new(vec![], Some(2), Some("abc".into()), None);
        assert!(last.is_empty());
        assert!(!last.has_next());
        assert_eq!(last.current_token(), Some("abc"));
    }
}
