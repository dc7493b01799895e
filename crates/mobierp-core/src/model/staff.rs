// ── Staff and organization ──

use serde::{Deserialize, Serialize};

use mobierp_api::{Include, ListQuery, SortOrder};

use super::EntityId;
use crate::entity::{Entity, EntityKind};
use crate::relations::RelationAlias;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    /// `active` / `inactive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// The backend names these relations in plural form.
const STAFF_ALIASES: &[RelationAlias] = &[
    RelationAlias::new("positions", "position"),
    RelationAlias::new("teams", "team"),
];

impl Entity for Staff {
    const KIND: EntityKind = EntityKind::Staff;

    fn id(&self) -> &EntityId {
        &self.id
    }
    fn code(&self) -> &str {
        &self.code
    }
    fn title(&self) -> &str {
        &self.full_name
    }
    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.code.as_str()),
            Some(self.full_name.as_str()),
            self.email.as_deref(),
            self.phone.as_deref(),
            self.position.as_ref().map(|p| p.name.as_str()),
            self.team.as_ref().map(|t| t.name.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
    fn facet(&self) -> Option<&str> {
        self.status.as_deref()
    }
    fn sort_key(&self) -> &str {
        &self.full_name
    }
    fn list_query() -> ListQuery {
        ListQuery::new()
            .include(Include::new().relation("positions").relation("teams"))
            .order_by("fullName", SortOrder::Asc)
    }
    fn detail_query() -> ListQuery {
        ListQuery::new().include(Include::new().relation("positions").relation("teams"))
    }
    fn relation_aliases() -> &'static [RelationAlias] {
        STAFF_ALIASES
    }
    fn required_fields() -> &'static [&'static str] {
        &["code", "fullName"]
    }
}
