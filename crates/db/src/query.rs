//! Backend-neutral filters and sort orders.

use std::cmp::Ordering;

use serde_json::Value;

use crate::document::{DocId, Record, ID_FIELD};

/// Predicate over a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Field equals the value. A missing field never matches.
    Eq(String, Value),
    /// Field differs from the value. A missing field matches.
    Ne(String, Value),
    /// Case-insensitive literal substring match on any of the fields.
    Search { fields: Vec<String>, needle: String },
    /// Every inner filter matches.
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne(field.into(), value.into())
    }

    pub fn id(id: &DocId) -> Self {
        Self::eq(ID_FIELD, id.as_str())
    }

    pub fn search<I, S>(fields: I, needle: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Search {
            fields: fields.into_iter().map(Into::into).collect(),
            needle: needle.into(),
        }
    }

    /// Conjunction that flattens `All` away.
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), f) => {
                left.push(f);
                Filter::And(left)
            }
            (f, Filter::And(mut right)) => {
                right.insert(0, f);
                Filter::And(right)
            }
            (a, b) => Filter::And(vec![a, b]),
        }
    }

    /// Evaluate against a record held in memory.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => record.get(field) == Some(value),
            Filter::Ne(field, value) => record.get(field) != Some(value),
            Filter::Search { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|field| {
                    record
                        .get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            }
            Filter::And(filters) => filters.iter().all(|f| f.matches(record)),
        }
    }

    /// Equality pairs a document created by an upsert inherits.
    pub(crate) fn equalities(&self) -> Vec<(&str, &Value)> {
        match self {
            Filter::Eq(field, value) => vec![(field.as_str(), value)],
            Filter::And(filters) => filters.iter().flat_map(Filter::equalities).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Filter, sort, and limit for a multi-document read.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub sort: Vec<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            sort: Vec::new(),
            limit: None,
        }
    }

    pub fn all() -> Self {
        Self::new(Filter::All)
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort.push((field.into(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Compare two records under this query's sort keys.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for (field, direction) in &self.sort {
            let ordering = compare_values(a.get(field), b.get(field));
            let ordering = match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Missing and null sort lowest, then numbers, strings, and booleans.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Number(_)) => 1,
            Some(Value::String(_)) => 2,
            Some(Value::Bool(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
