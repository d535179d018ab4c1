// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::{
    access::{
        Command,
        Query,
    },
    config::CassandraConfig,
    cql::Row,
    model::{
        Model,
        ModelRegistry,
    },
    session::{
        PreparedCache,
        Session,
    },
    Error,
};
use std::sync::{
    atomic::{
        AtomicU64,
        Ordering,
    },
    Arc,
};

/// The entry point of the fluent API: creates queries against a session, by table name or by
/// registered model.
///
/// ## Example
/// ```
/// use scylla_orm::prelude::*;
///
/// struct MySession;
///
/// #[async_trait::async_trait]
/// impl Session for MySession {
///     type Prepared = String;
///
///     async fn prepare(&self, cql: &str) -> anyhow::Result<String> {
///         Ok(cql.to_owned())
///     }
///
///     async fn query(&self, _statement: Statement) -> anyhow::Result<ResultSet> {
///         Ok(ResultSet::new(vec![Row::new()
///             .with_column("id", 1i64)
///             .with_column("name", "alice")]))
///     }
///
///     async fn execute(&self, _prepared: &String, statement: Statement) -> anyhow::Result<ResultSet> {
///         self.query(statement).await
///     }
/// }
///
/// #[derive(Debug)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let mut cassandra = Cassandra::new(MySession);
/// cassandra.register_model(
///     Model::new("users", |row: &Row| {
///         Ok(User {
///             id: row.get("id")?,
///             name: row.get("name")?,
///         })
///     })
///     .with_primary_keys(vec!["id"]),
/// );
/// let query = cassandra
///     .select_model::<User>()?
///     .eq("id", 1i64)
///     .set_consistency_level(Consistency::LocalQuorum);
/// assert_eq!(query.build()?.cql(), "SELECT * FROM users WHERE id=?");
/// let user = query.find_one().await?;
/// assert_eq!(user.map(|u| u.name).as_deref(), Some("alice"));
/// # Ok(())
/// # }
/// ```
pub struct Cassandra<S: Session> {
    session: Arc<S>,
    models: ModelRegistry,
    cache: Arc<PreparedCache<S::Prepared>>,
    config: CassandraConfig,
    ids: AtomicU64,
}

impl<S: Session> std::fmt::Debug for Cassandra<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cassandra")
            .field("models", &self.models)
            .field("prepared", &self.cache.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<S: Session> Cassandra<S> {
    /// Create a facade with the default configuration
    pub fn new(session: S) -> Self {
        Self::with_config(session, CassandraConfig::default())
    }

    /// Create a facade applying `config` to every query it creates.
    /// 
    /// Use [`CassandraConfig::from_json`] to reject an invalid configuration up front.
    pub fn with_config(session: S, config: CassandraConfig) -> Self {
        Self {
            session: Arc::new(session),
            models: ModelRegistry::new(),
            cache: Arc::new(PreparedCache::new()),
            config,
            ids: AtomicU64::new(1),
        }
    }

    /// Register the model of `T` so its queries can be created with the `*_model` entry points
    pub fn register_model<T: 'static>(&mut self, model: Model<T>) -> &mut Self {
        self.models.register(model);
        self
    }

    /// The registered models
    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// The defaults applied to every query
    pub fn config(&self) -> &CassandraConfig {
        &self.config
    }

    /// The underlying session
    pub fn session(&self) -> &S {
        &self.session
    }

    /// The prepared statements shared by every query of this facade
    pub fn prepared_cache(&self) -> &PreparedCache<S::Prepared> {
        &self.cache
    }

    fn query<T>(&self, command: Command, model: &Model<T>) -> Query<S, T> {
        let id = self.ids.fetch_add(1, Ordering::Relaxed);
        Query::new(id, self.session.clone(), self.cache.clone(), command)
            .defaults(
                self.config.prepared,
                self.config.fetch_size,
                self.config.consistency,
                self.config.serial_consistency,
            )
            .model(model)
    }

    fn table_query(&self, command: Command, table_name: &str) -> Query<S, Row> {
        self.query(command, &Model::raw()).table(table_name)
    }

    fn model_query<T: 'static>(&self, command: Command) -> Result<Query<S, T>, Error> {
        Ok(self.query(command, self.models.resolve::<T>()?))
    }

    /// `SELECT * FROM <table_name>`, mapping raw rows
    pub fn select(&self, table_name: &str) -> Query<S, Row> {
        self.table_query(Command::Select, table_name)
    }

    /// `INSERT INTO <table_name>`, set the columns with `val`
    pub fn insert(&self, table_name: &str) -> Query<S, Row> {
        self.table_query(Command::Insert, table_name)
    }

    /// `UPDATE <table_name> SET ...`, set the columns with `val` and select the rows with clauses
    pub fn update(&self, table_name: &str) -> Query<S, Row> {
        self.table_query(Command::Update, table_name)
    }

    /// `DELETE FROM <table_name>`
    pub fn delete(&self, table_name: &str) -> Query<S, Row> {
        self.table_query(Command::Delete, table_name)
    }

    /// An INSERT or UPDATE depending on the optimistic lock. Requires `primary_keys`.
    pub fn upsert(&self, table_name: &str) -> Query<S, Row> {
        self.table_query(Command::Upsert, table_name)
    }

    /// `SELECT *` from the table of `T`'s model, mapping rows into `T`
    pub fn select_model<T: 'static>(&self) -> Result<Query<S, T>, Error> {
        self.model_query(Command::Select)
    }

    /// `INSERT INTO` the table of `T`'s model
    pub fn insert_model<T: 'static>(&self) -> Result<Query<S, T>, Error> {
        self.model_query(Command::Insert)
    }

    /// `UPDATE` the table of `T`'s model
    pub fn update_model<T: 'static>(&self) -> Result<Query<S, T>, Error> {
        self.model_query(Command::Update)
    }

    /// `DELETE FROM` the table of `T`'s model
    pub fn delete_model<T: 'static>(&self) -> Result<Query<S, T>, Error> {
        self.model_query(Command::Delete)
    }

    /// An UPSERT against the table and primary keys of `T`'s model
    pub fn upsert_model<T: 'static>(&self) -> Result<Query<S, T>, Error> {
        self.model_query(Command::Upsert)
    }
}
