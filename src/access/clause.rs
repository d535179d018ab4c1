// Copyright 2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use super::Parameter;
use crate::cql::Value;

/// The comparison operators of a basic relation.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
        }
    }
}

/// A relation of a WHERE clause. Every clause renders exactly one placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `<name><op>?`
    Basic {
        name: String,
        operator: Operator,
        value: Value,
    },
    /// `<name> IN ?`, binding the whole collection as one list value
    In { name: String, values: Value },
}

impl Clause {
    pub fn basic(name: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Clause::Basic {
            name: name.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::basic(name, Operator::Equal, value)
    }

    pub fn in_list<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Clause::In {
            name: name.into(),
            values: Value::list(values),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Clause::Basic { name, .. } | Clause::In { name, .. } => name,
        }
    }

    /// Render this clause and push its bound value
    pub fn append_to(&self, cql: &mut String, parameters: &mut Vec<Parameter>) {
        match self {
            Clause::Basic { name, operator, value } => {
                cql.push_str(name);
                cql.push_str(operator.as_str());
                cql.push('?');
                parameters.push(Parameter::new(name.as_str(), value.clone()));
            }
            Clause::In { name, values } => {
                cql.push_str(name);
                cql.push_str(" IN ?");
                parameters.push(Parameter::new(name.as_str(), values.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render() {
        let mut cql = String::new();
        let mut parameters = Vec::new();
        Clause::basic("a", Operator::GreaterThanOrEqual, 1).append_to(&mut cql, &mut parameters);
        cql.push_str(" AND ");
        Clause::in_list("d", vec![1, 2, 3]).append_to(&mut cql, &mut parameters);
        assert_eq!(cql, "a>=? AND d IN ?");
        assert_eq!(
            parameters,
            vec![Parameter::new("a", 1), Parameter::new("d", vec![1, 2, 3])]
        );
    }
}
