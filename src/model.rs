// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Models describe how a domain type is stored: its table, its primary keys and how to map a row
//! into it.

use crate::{
    access::{
        ColMapper,
        RowMapper,
    },
    cql::{
        Row,
        Value,
    },
    Error,
};
use std::{
    any::{
        type_name,
        Any,
        TypeId,
    },
    collections::{
        BTreeSet,
        HashMap,
    },
    fmt,
    sync::Arc,
};

/// The table, row mapper, primary keys and column value mappers of a domain type.
pub struct Model<T> {
    table_name: String,
    row_mapper: RowMapper<T>,
    primary_keys: BTreeSet<String>,
    col_mappers: HashMap<String, ColMapper>,
}

impl<T> Clone for Model<T> {
    fn clone(&self) -> Self {
        Self {
            table_name: self.table_name.clone(),
            row_mapper: self.row_mapper.clone(),
            primary_keys: self.primary_keys.clone(),
            col_mappers: self.col_mappers.clone(),
        }
    }
}

impl<T> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("table_name", &self.table_name)
            .field("primary_keys", &self.primary_keys)
            .field("col_mappers", &self.col_mappers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> Model<T> {
    pub fn new<F>(table_name: impl Into<String>, row_mapper: F) -> Self
    where
        F: Fn(&Row) -> Result<T, Error> + Send + Sync + 'static,
    {
        Self {
            table_name: table_name.into(),
            row_mapper: Arc::new(row_mapper),
            primary_keys: BTreeSet::new(),
            col_mappers: HashMap::new(),
        }
    }

    pub fn with_primary_keys<I, K>(mut self, primary_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.primary_keys = primary_keys.into_iter().map(Into::into).collect();
        self
    }

    /// Convert every value bound to `column` before it reaches the statement
    pub fn with_col_mapper<F>(mut self, column: impl Into<String>, col_mapper: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.col_mappers.insert(column.into(), Arc::new(col_mapper));
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn row_mapper(&self) -> &RowMapper<T> {
        &self.row_mapper
    }

    pub fn primary_keys(&self) -> &BTreeSet<String> {
        &self.primary_keys
    }

    pub fn col_mappers(&self) -> &HashMap<String, ColMapper> {
        &self.col_mappers
    }
}

impl Model<Row> {
    /// The identity model, used when a table is addressed by name
    pub fn raw() -> Self {
        Model::new("", |row: &Row| Ok(row.clone()))
    }
}

/// Maps domain types to their registered [`Model`].
#[derive(Default)]
pub struct ModelRegistry {
    models: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the model of `T`, replacing any previous one
    pub fn register<T: 'static>(&mut self, model: Model<T>) -> &mut Self {
        self.models.insert(TypeId::of::<T>(), Box::new(model));
        self
    }

    /// Look up the model of `T`
    pub fn resolve<T: 'static>(&self) -> Result<&Model<T>, Error> {
        self.models
            .get(&TypeId::of::<T>())
            .and_then(|model| model.downcast_ref::<Model<T>>())
            .ok_or_else(|| Error::UnregisteredModel(type_name::<T>()))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.models.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry").field("models", &self.models.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Account {
        id: i64,
        name: String,
    }

    fn account_model() -> Model<Account> {
        Model::new("accounts", |row: &Row| {
            Ok(Account {
                id: row.get("id")?,
                name: row.get("name")?,
            })
        })
        .with_primary_keys(vec!["id"])
        .with_col_mapper("name", |v| match v {
            Value::Text(s) => Value::Text(s.to_lowercase()),
            v => v,
        })
    }

    #[test]
    fn register_and_resolve() {
        let mut registry = ModelRegistry::new();
        assert!(matches!(
            registry.resolve::<Account>(),
            Err(Error::UnregisteredModel(name)) if name.ends_with("Account")
        ));
        registry.register(account_model());
        let model = registry.resolve::<Account>().unwrap();
        assert_eq!(model.table_name(), "accounts");
        assert!(model.primary_keys().contains("id"));
        let row = Row::new().with_column("id", 7i64).with_column("name", "bob");
        assert_eq!(
            (model.row_mapper())(&row).unwrap(),
            Account {
                id: 7,
                name: "bob".to_owned()
            }
        );
        assert_eq!(
            (model.col_mappers()["name"])(Value::from("BOB")),
            Value::from("bob")
        );
    }

    #[test]
    fn row_mapper_reports_conversion_errors() {
        let model = account_model();
        let row = Row::new().with_column("id", "not a number").with_column("name", "bob");
        assert!(matches!((model.row_mapper())(&row), Err(Error::Conversion(_))));
    }

    #[test]
    fn raw_model_is_identity() {
        let row = Row::new().with_column("a", 1);
        assert_eq!((Model::raw().row_mapper())(&row).unwrap(), row);
    }
}
