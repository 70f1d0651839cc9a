//! Query description understood by every document-store adapter.
//!
//! Queries are deliberately small: one optional equality filter on a top-level
//! field, one optional ordering field and an optional limit. Ordering follows
//! PostgreSQL `jsonb` comparison rules so the in-memory adapter and the
//! PostgreSQL adapter return documents in the same order.

use std::cmp::Ordering;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    pub filter: Option<FieldFilter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl DocumentQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` when `data` passes the equality filter.
    #[must_use]
    pub fn matches(&self, data: &Value) -> bool {
        self.filter
            .as_ref()
            .is_none_or(|filter| data.get(&filter.field) == Some(&filter.value))
    }
}

/// Rank of a JSON type in `jsonb` ordering.
const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// ## Summary
/// Compares two JSON values the way PostgreSQL orders `jsonb` scalars.
/// Arrays and objects compare equal within their type.
#[must_use]
pub fn compare_json(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(0.0);
            let b = b.as_f64().unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// ## Summary
/// Orders two documents by an optional field. Missing fields sort last in either direction.
#[must_use]
pub fn compare_by_field(a: &Value, b: &Value, order: &OrderBy) -> Ordering {
    match (a.get(&order.field), b.get(&order.field)) {
        (Some(a), Some(b)) => match order.direction {
            Direction::Ascending => compare_json(a, b),
            Direction::Descending => compare_json(b, a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(compare_json(&json!(9), &json!(10)), Ordering::Less);
        assert_eq!(compare_json(&json!(2.5), &json!(2)), Ordering::Greater);
    }

    #[test]
    fn missing_fields_sort_last_when_descending() {
        let order = OrderBy {
            field: "points".to_string(),
            direction: Direction::Descending,
        };
        let mut docs = [json!({}), json!({"points": 3}), json!({"points": 7})];
        docs.sort_by(|a, b| compare_by_field(a, b, &order));
        assert_eq!(docs, [json!({"points": 7}), json!({"points": 3}), json!({})]);
    }

    #[test]
    fn filter_requires_exact_json_equality() {
        let query = DocumentQuery::new().where_eq("role", "mentor");
        assert!(query.matches(&json!({"role": "mentor"})));
        assert!(!query.matches(&json!({"role": "Mentor"})));
        assert!(!query.matches(&json!({})));
        assert!(DocumentQuery::new().matches(&json!({})));
    }
}
