// ── Sales deliveries ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mobierp_api::{Include, ListQuery, SortOrder};

use super::{Customer, DocumentLine, DocumentStatus, EntityId, Warehouse};
use crate::entity::{Entity, EntityKind};
use crate::lifecycle::{DRAFT_DOCUMENT, Lifecycle};

/// Goods shipped from a warehouse to a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesDelivery {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<Warehouse>,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<DocumentLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for SalesDelivery {
    const KIND: EntityKind = EntityKind::SalesDelivery;

    fn id(&self) -> &EntityId {
        &self.id
    }
    fn code(&self) -> &str {
        &self.code
    }
    fn title(&self) -> &str {
        self.customer.as_ref().map_or("", |c| c.name.as_str())
    }
    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.code.as_str()),
            self.customer.as_ref().map(|c| c.name.as_str()),
            self.warehouse.as_ref().map(|w| w.name.as_str()),
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
            .include(Include::new().relation("customer").relation("warehouse"))
            .order_by("createdAt", SortOrder::Desc)
    }
    fn detail_query() -> ListQuery {
        ListQuery::new().include(
            Include::new()
                .relation("customer")
                .relation("warehouse")
                .nested("items", Include::new().relation("product")),
        )
    }
    fn lifecycle() -> Option<&'static Lifecycle> {
        Some(&DRAFT_DOCUMENT)
    }
    fn required_fields() -> &'static [&'static str] {
        &["code", "customerId", "warehouseId"]
    }
}
