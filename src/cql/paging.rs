// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use derive_more::{
    AsRef,
    Display,
    From,
    Into,
};
use serde::{
    Deserialize,
    Serialize,
};

/// An opaque paging token echoed by the backend, marking where the next page of a result set starts.
///
/// The token is passed through untouched; its contents are defined by the session implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Into, AsRef, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PagingState(String);

impl PagingState {
    /// Wrap a token, treating an empty one as "no token"
    pub fn parse(token: &str) -> Option<Self> {
        if token.is_empty() {
            None
        } else {
            Some(PagingState(token.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PagingState {
    fn from(token: &str) -> Self {
        PagingState(token.to_owned())
    }
}
