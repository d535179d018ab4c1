// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Defaults applied to every query created by a [`crate::Cassandra`] facade.

use crate::{
    cql::Consistency,
    Error,
};
use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CassandraConfig {
    /// Execute statements through the prepared-statement cache
    pub prepared: bool,
    /// The default consistency level
    pub consistency: Option<Consistency>,
    /// The default serial consistency level for lightweight transactions
    pub serial_consistency: Option<Consistency>,
    /// The default page size
    pub fetch_size: Option<i32>,
}

impl CassandraConfig {
    /// Parse a configuration from JSON, rejecting a non-serial `serial_consistency`
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the defaults before any query uses them
    pub fn validate(&self) -> crate::Result<()> {
        match self.serial_consistency {
            Some(level) if !level.is_serial() => Err(Error::InvalidSerialConsistency(level)),
            _ => Ok(()),
        }
    }
}
