// ── Catalog: products, categories, warehouses ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mobierp_api::{Include, ListQuery, SortOrder};

use super::EntityId;
use crate::entity::{Entity, EntityKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> &EntityId {
        &self.id
    }
    fn code(&self) -> &str {
        &self.code
    }
    fn title(&self) -> &str {
        &self.name
    }
    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.code.as_str()),
            Some(self.name.as_str()),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
    fn sort_key(&self) -> &str {
        &self.name
    }
    fn list_query() -> ListQuery {
        ListQuery::new().order_by("name", SortOrder::Asc)
    }
    fn required_fields() -> &'static [&'static str] {
        &["name"]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::number::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &EntityId {
        &self.id
    }
    fn code(&self) -> &str {
        &self.code
    }
    fn title(&self) -> &str {
        &self.name
    }
    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.code.as_str()),
            Some(self.name.as_str()),
            self.category.as_ref().map(|c| c.name.as_str()),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
    /// Products facet on their category.
    fn facet(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
    fn list_query() -> ListQuery {
        ListQuery::new()
            .include(Include::new().relation("category"))
            .order_by("createdAt", SortOrder::Desc)
    }
    fn detail_query() -> ListQuery {
        ListQuery::new().include(Include::new().relation("category"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Entity for Warehouse {
    const KIND: EntityKind = EntityKind::Warehouse;

    fn id(&self) -> &EntityId {
        &self.id
    }
    fn code(&self) -> &str {
        &self.code
    }
    fn title(&self) -> &str {
        &self.name
    }
    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.code.as_str()),
            Some(self.name.as_str()),
            self.address.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
