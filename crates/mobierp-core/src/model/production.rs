// ── Production: orders, plans, material requests ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mobierp_api::{Include, ListQuery, SortOrder};

use super::{DocumentLine, DocumentStatus, EntityId, Product, Staff, Warehouse};
use crate::entity::{Entity, EntityKind};
use crate::lifecycle::{DRAFT_DOCUMENT, Lifecycle};
use crate::relations::RelationAlias;

/// `done / total` as a percentage in `0..=100`; zero when nothing is planned.
pub fn progress_pct(done: f64, total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() || !done.is_finite() {
        return 0.0;
    }
    (done / total * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOrder {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(default, deserialize_with = "super::number::or_zero")]
    pub planned_quantity: f64,
    #[serde(default, deserialize_with = "super::number::or_zero")]
    pub produced_quantity: f64,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductionOrder {
    pub fn progress_pct(&self) -> f64 {
        progress_pct(self.produced_quantity, self.planned_quantity)
    }
}

impl Entity for ProductionOrder {
    const KIND: EntityKind = EntityKind::ProductionOrder;

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
            self.note.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
    fn facet(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
    fn list_query() -> ListQuery {
        ListQuery::new()
            .include(Include::new().relation("product"))
            .order_by("createdAt", SortOrder::Desc)
    }
    fn detail_query() -> ListQuery {
        ListQuery::new().include(Include::new().relation("product"))
    }
    fn lifecycle() -> Option<&'static Lifecycle> {
        Some(&DRAFT_DOCUMENT)
    }
    fn required_fields() -> &'static [&'static str] {
        &["code", "productId", "plannedQuantity"]
    }
}

/// A period plan grouping production orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlan {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, deserialize_with = "super::number::or_zero")]
    pub target_quantity: f64,
    #[serde(default, deserialize_with = "super::number::or_zero")]
    pub completed_quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orders: Vec<ProductionOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductionPlan {
    pub fn progress_pct(&self) -> f64 {
        progress_pct(self.completed_quantity, self.target_quantity)
    }
}

impl Entity for ProductionPlan {
    const KIND: EntityKind = EntityKind::ProductionPlan;

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
            self.note.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
    fn facet(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
    fn detail_query() -> ListQuery {
        ListQuery::new().include(
            Include::new().nested("orders", Include::new().relation("product")),
        )
    }
    fn lifecycle() -> Option<&'static Lifecycle> {
        Some(&DRAFT_DOCUMENT)
    }
}

/// The backend returns the requester as `requestedBy`.
const MATERIAL_REQUEST_ALIASES: &[RelationAlias] = &[RelationAlias::new("requestedBy", "requester")];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequest {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<Staff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<Warehouse>,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<DocumentLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for MaterialRequest {
    const KIND: EntityKind = EntityKind::MaterialRequest;

    fn id(&self) -> &EntityId {
        &self.id
    }
    fn code(&self) -> &str {
        &self.code
    }
    fn title(&self) -> &str {
        self.requester.as_ref().map_or("", |s| s.full_name.as_str())
    }
    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.code.as_str()),
            self.requester.as_ref().map(|s| s.full_name.as_str()),
            self.warehouse.as_ref().map(|w| w.name.as_str()),
            self.reason.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
    fn facet(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
    fn list_query() -> ListQuery {
        ListQuery::new()
            .include(Include::new().relation("requestedBy").relation("warehouse"))
            .order_by("createdAt", SortOrder::Desc)
    }
    fn detail_query() -> ListQuery {
        ListQuery::new().include(
            Include::new()
                .relation("requestedBy")
                .relation("warehouse")
                .nested("items", Include::new().relation("product")),
        )
    }
    fn relation_aliases() -> &'static [RelationAlias] {
        MATERIAL_REQUEST_ALIASES
    }
    fn lifecycle() -> Option<&'static Lifecycle> {
        Some(&DRAFT_DOCUMENT)
    }
    fn required_fields() -> &'static [&'static str] {
        &["code", "warehouseId"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        let mut order = ProductionOrder {
            planned_quantity: 200.0,
            produced_quantity: 50.0,
            ..ProductionOrder::default()
        };
        assert!((order.progress_pct() - 25.0).abs() < f64::EPSILON);

        order.produced_quantity = 250.0;
        assert!((order.progress_pct() - 100.0).abs() < f64::EPSILON);

        order.produced_quantity = -5.0;
        assert!(order.progress_pct().abs() < f64::EPSILON);
    }

    #[test]
    fn nothing_planned_is_zero_progress() {
        let plan = ProductionPlan {
            completed_quantity: 10.0,
            ..ProductionPlan::default()
        };
        assert!(plan.progress_pct().abs() < f64::EPSILON);
    }
}
