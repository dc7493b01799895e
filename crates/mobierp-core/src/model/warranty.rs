// ── Warranty claims ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mobierp_api::{Include, ListQuery, SortOrder};

use super::{Customer, DocumentStatus, EntityId, Product};
use crate::entity::{Entity, EntityKind};
use crate::lifecycle::{Lifecycle, WARRANTY_CLAIM};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warranty {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Warranty {
    const KIND: EntityKind = EntityKind::Warranty;

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
            self.customer.as_ref().map(|c| c.name.as_str()),
            self.serial_number.as_deref(),
            self.issue.as_deref(),
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
            .include(Include::new().relation("product").relation("customer"))
            .order_by("createdAt", SortOrder::Desc)
    }
    fn detail_query() -> ListQuery {
        ListQuery::new().include(Include::new().relation("product").relation("customer"))
    }
    fn lifecycle() -> Option<&'static Lifecycle> {
        Some(&WARRANTY_CLAIM)
    }
    fn required_fields() -> &'static [&'static str] {
        &["code", "productId", "customerId"]
    }
}
