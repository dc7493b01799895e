// ── Inventory transactions ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mobierp_api::{Include, ListQuery, SortOrder};

use super::{EntityId, Product, Warehouse};
use crate::entity::{Entity, EntityKind};

/// A stock movement. Transactions are immutable records of what happened;
/// they carry a movement type rather than a lifecycle status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    /// `in`, `out`, `transfer` or `adjustment`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<Warehouse>,
    #[serde(default, deserialize_with = "super::number::or_zero")]
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for InventoryTransaction {
    const KIND: EntityKind = EntityKind::InventoryTransaction;

    fn id(&self) -> &EntityId {
        &self.id
    }
    fn code(&self) -> &str {
        &self.code
    }
    fn title(&self) -> &str {
        self.product.as_ref().map_or("", |p| p.name.as_str())
    }
    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.code.as_str()),
            self.product.as_ref().map(|p| p.name.as_str()),
            self.warehouse.as_ref().map(|w| w.name.as_str()),
            self.reference.as_deref(),
            self.note.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
    fn facet(&self) -> Option<&str> {
        Some(&self.kind)
    }
    fn list_query() -> ListQuery {
        ListQuery::new()
            .include(Include::new().relation("product").relation("warehouse"))
            .order_by("createdAt", SortOrder::Desc)
    }
    fn detail_query() -> ListQuery {
        ListQuery::new().include(Include::new().relation("product").relation("warehouse"))
    }
    fn required_fields() -> &'static [&'static str] {
        &["code", "type", "productId", "warehouseId", "quantity"]
    }
}
