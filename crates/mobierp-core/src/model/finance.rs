// ── Payables and receivables ──
//
// Only backend-provided amounts are exposed. Totals and balances across
// records are not computed here; the backend does not provide them yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mobierp_api::{Include, ListQuery, SortOrder};

use super::{Customer, EntityId, Supplier};
use crate::entity::{Entity, EntityKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payable {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Supplier>,
    #[serde(default, deserialize_with = "super::number::or_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "super::number::or_zero")]
    pub paid_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// `unpaid`, `partial`, `paid` or `overdue`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Payable {
    const KIND: EntityKind = EntityKind::Payable;

    fn id(&self) -> &EntityId {
        &self.id
    }
    fn code(&self) -> &str {
        &self.code
    }
    fn title(&self) -> &str {
        self.supplier.as_ref().map_or("", |s| s.name.as_str())
    }
    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.code.as_str()),
            self.supplier.as_ref().map(|s| s.name.as_str()),
            self.note.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
    fn facet(&self) -> Option<&str> {
        self.status.as_deref()
    }
    fn list_query() -> ListQuery {
        ListQuery::new()
            .include(Include::new().relation("supplier"))
            .order_by("dueDate", SortOrder::Asc)
    }
    fn detail_query() -> ListQuery {
        ListQuery::new().include(Include::new().relation("supplier"))
    }
    fn required_fields() -> &'static [&'static str] {
        &["code", "supplierId", "amount"]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(default, deserialize_with = "super::number::or_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "super::number::or_zero")]
    pub collected_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Receivable {
    const KIND: EntityKind = EntityKind::Receivable;

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
            self.note.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
    fn facet(&self) -> Option<&str> {
        self.status.as_deref()
    }
    fn list_query() -> ListQuery {
        ListQuery::new()
            .include(Include::new().relation("customer"))
            .order_by("dueDate", SortOrder::Asc)
    }
    fn detail_query() -> ListQuery {
        ListQuery::new().include(Include::new().relation("customer"))
    }
    fn required_fields() -> &'static [&'static str] {
        &["code", "customerId", "amount"]
    }
}
