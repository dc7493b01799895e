// ── Relation flattening ──
//
// Records fetched with an `include` directive carry their relations under
// the backend's relation names. Some of those names are plural (a staff
// record's `positions`) where the screens expect a single embedded value
// (`position`). Aliases are applied to the raw JSON before decoding.

use serde_json::Value;

/// Rename relation `from` to field `to`, collapsing a list to its first element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationAlias {
    pub from: &'static str,
    pub to: &'static str,
}

impl RelationAlias {
    pub const fn new(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }
}

/// Apply `aliases` to one record in place.
///
/// Deterministic and infallible: an absent (or empty, or null) relation
/// leaves the target field absent, and an already-present target field is
/// never overwritten.
pub fn apply_aliases(record: &mut Value, aliases: &[RelationAlias]) {
    let Value::Object(map) = record else {
        return;
    };

    for alias in aliases {
        let Some(raw) = map.remove(alias.from) else {
            continue;
        };
        let flattened = match raw {
            Value::Array(items) => items.into_iter().next(),
            Value::Null => None,
            other => Some(other),
        };
        if let Some(value) = flattened {
            map.entry(alias.to).or_insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const STAFF: &[RelationAlias] = &[
        RelationAlias::new("positions", "position"),
        RelationAlias::new("teams", "team"),
    ];

    #[test]
    fn plural_relation_collapses_to_first() {
        let mut record = json!({
            "id": 1,
            "positions": [{ "id": 4, "name": "Lead" }, { "id": 5, "name": "Other" }],
            "teams": { "id": 2, "name": "Assembly" }
        });
        apply_aliases(&mut record, STAFF);

        assert_eq!(
            record,
            json!({
                "id": 1,
                "position": { "id": 4, "name": "Lead" },
                "team": { "id": 2, "name": "Assembly" }
            })
        );
    }

    #[test]
    fn absent_relation_leaves_field_undefined() {
        let mut record = json!({ "id": 1, "positions": [] , "teams": null });
        apply_aliases(&mut record, STAFF);
        assert_eq!(record, json!({ "id": 1 }));
    }

    #[test]
    fn existing_field_wins() {
        let mut record = json!({ "position": { "id": 9 }, "positions": [{ "id": 4 }] });
        apply_aliases(&mut record, STAFF);
        assert_eq!(record, json!({ "position": { "id": 9 } }));
    }

    #[test]
    fn non_objects_are_untouched() {
        let mut record = json!([1, 2, 3]);
        apply_aliases(&mut record, STAFF);
        assert_eq!(record, json!([1, 2, 3]));
    }
}
