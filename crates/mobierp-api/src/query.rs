// ── Collection query encoding ──
//
// The backend reads relation expansion, ordering and equality filters
// from JSON-encoded query parameters:
//
//   include=<json object>   orderBy=<json array>   where=<json object>
//
// plus repeated `include[]=<name>` for plain relation names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sort order inside an `orderBy` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Relation {
    Embed,
    Nested(Include),
}

/// Relation expansion for the `include` parameter.
///
/// Encoded as a JSON object keyed by relation name. A relation is either
/// embedded as-is (`"team": true`) or embedded with its own nested expansion
/// (`"items": {"include": {"product": true}}`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Include {
    relations: Vec<(String, Relation)>,
}

impl Include {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed a relation.
    pub fn relation(mut self, name: impl Into<String>) -> Self {
        self.relations.push((name.into(), Relation::Embed));
        self
    }

    /// Embed a relation together with its own related entities.
    pub fn nested(mut self, name: impl Into<String>, inner: Include) -> Self {
        self.relations.push((name.into(), Relation::Nested(inner)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Relation names at this level, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.relations.iter().map(|(name, _)| name.as_str())
    }

    /// JSON form sent to the backend.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (name, relation) in &self.relations {
            let value = match relation {
                Relation::Embed => Value::Bool(true),
                Relation::Nested(inner) => {
                    let mut nested = Map::new();
                    nested.insert("include".into(), inner.to_value());
                    Value::Object(nested)
                }
            };
            map.insert(name.clone(), value);
        }
        Value::Object(map)
    }
}

/// Query parameters for collection and single-record reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    include: Include,
    order_by: Vec<(String, SortOrder)>,
    filter: Map<String, Value>,
    relations: Vec<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the relation expansion.
    pub fn include(mut self, include: Include) -> Self {
        self.include = include;
        self
    }

    /// Append an ordering clause. Clauses apply in insertion order.
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.push((field.into(), order));
        self
    }

    /// Add an equality constraint to the `where` filter.
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    /// Add a plain relation name, sent as a repeated `include[]` parameter.
    pub fn relation(mut self, name: impl Into<String>) -> Self {
        self.relations.push(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
            && self.order_by.is_empty()
            && self.filter.is_empty()
            && self.relations.is_empty()
    }

    /// Encode as `(name, value)` pairs. Empty parts are omitted.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.include.is_empty() {
            params.push(("include".to_owned(), self.include.to_value().to_string()));
        }

        if !self.order_by.is_empty() {
            let clauses: Vec<Value> = self
                .order_by
                .iter()
                .map(|(field, order)| {
                    let mut clause = Map::new();
                    clause.insert(field.clone(), Value::from(order.as_str()));
                    Value::Object(clause)
                })
                .collect();
            params.push(("orderBy".to_owned(), Value::Array(clauses).to_string()));
        }

        if !self.filter.is_empty() {
            params.push((
                "where".to_owned(),
                Value::Object(self.filter.clone()).to_string(),
            ));
        }

        for name in &self.relations {
            params.push(("include[]".to_owned(), name.clone()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_query_has_no_params() {
        assert!(ListQuery::new().to_params().is_empty());
        assert!(ListQuery::new().is_empty());
    }

    #[test]
    fn include_encodes_nested_relations() {
        let include = Include::new()
            .relation("supplier")
            .nested("items", Include::new().relation("product"));

        assert_eq!(
            include.to_value(),
            json!({
                "supplier": true,
                "items": { "include": { "product": true } }
            })
        );
    }

    #[test]
    fn params_follow_backend_conventions() {
        let query = ListQuery::new()
            .include(Include::new().relation("team"))
            .order_by("createdAt", SortOrder::Desc)
            .filter_eq("status", "draft")
            .relation("position")
            .relation("team");

        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("include".to_owned(), r#"{"team":true}"#.to_owned()),
                ("orderBy".to_owned(), r#"[{"createdAt":"desc"}]"#.to_owned()),
                ("where".to_owned(), r#"{"status":"draft"}"#.to_owned()),
                ("include[]".to_owned(), "position".to_owned()),
                ("include[]".to_owned(), "team".to_owned()),
            ]
        );
    }

    #[test]
    fn multiple_order_clauses_keep_their_order() {
        let query = ListQuery::new()
            .order_by("status", SortOrder::Asc)
            .order_by("code", SortOrder::Desc);
        let params = query.to_params();
        assert_eq!(params[0].1, r#"[{"status":"asc"},{"code":"desc"}]"#);
    }
}
