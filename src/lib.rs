// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! A fluent CQL statement builder which renders parameterized SELECT / INSERT / UPDATE / DELETE
//! statements, resolves UPSERTs into lightweight-transaction guarded INSERTs or UPDATEs, and maps the
//! resulting rows into domain values through a user supplied [`session::Session`].

pub mod access;
mod cassandra;
pub mod config;
pub mod cql;
pub mod error;
pub mod model;
pub mod session;

pub use cassandra::Cassandra;
pub use error::{
    Error,
    Result,
};

pub mod prelude {
    pub use super::{
        access::{
            BoundQuery,
            Clause,
            Command,
            CqlBuilder,
            FindIterator,
            Operator,
            PagedList,
            Parameter,
            Query,
        },
        config::CassandraConfig,
        cql::{
            Blob,
            ColumnDecoder,
            ConversionError,
            Consistency,
            PagingState,
            Row,
            Value,
        },
        error::{
            Error,
            Result,
        },
        model::{
            Model,
            ModelRegistry,
        },
        session::{
            PreparedCache,
            ResultSet,
            Session,
            Statement,
            StatementBuilder,
        },
        Cassandra,
    };
}
