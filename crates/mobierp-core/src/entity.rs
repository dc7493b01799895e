// ── Entity contract ──
//
// Every list/detail/form screen is the same interaction over a different
// record type. `Entity` is what a record type tells the controllers:
// where it lives, how to search, facet and sort it, which relations to
// expand, and which status rules gate its mutations.

use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use mobierp_api::{ListQuery, SortOrder};

use crate::lifecycle::Lifecycle;
use crate::model::EntityId;
use crate::relations::RelationAlias;

/// Every record type the app manages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum EntityKind {
    Product,
    Category,
    Warehouse,
    Supplier,
    Customer,
    Staff,
    PurchaseReceive,
    SalesDelivery,
    Warranty,
    InventoryTransaction,
    ProductionOrder,
    ProductionPlan,
    MaterialRequest,
    Payable,
    Receivable,
}

impl EntityKind {
    /// REST resource segment: `/api/<resource>`.
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Product => "products",
            Self::Category => "categories",
            Self::Warehouse => "warehouses",
            Self::Supplier => "suppliers",
            Self::Customer => "customers",
            Self::Staff => "staff",
            Self::PurchaseReceive => "purchase-receives",
            Self::SalesDelivery => "sales-deliveries",
            Self::Warranty => "warranties",
            Self::InventoryTransaction => "inventory-transactions",
            Self::ProductionOrder => "production-orders",
            Self::ProductionPlan => "production-plans",
            Self::MaterialRequest => "material-requests",
            Self::Payable => "payables",
            Self::Receivable => "receivables",
        }
    }

    /// Human label for one record ("Purchase receive").
    pub fn singular(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Category => "Category",
            Self::Warehouse => "Warehouse",
            Self::Supplier => "Supplier",
            Self::Customer => "Customer",
            Self::Staff => "Staff member",
            Self::PurchaseReceive => "Purchase receive",
            Self::SalesDelivery => "Sales delivery",
            Self::Warranty => "Warranty",
            Self::InventoryTransaction => "Inventory transaction",
            Self::ProductionOrder => "Production order",
            Self::ProductionPlan => "Production plan",
            Self::MaterialRequest => "Material request",
            Self::Payable => "Payable",
            Self::Receivable => "Receivable",
        }
    }

    /// Human label for the collection ("Purchase receives").
    pub fn plural(self) -> &'static str {
        match self {
            Self::Product => "Products",
            Self::Category => "Categories",
            Self::Warehouse => "Warehouses",
            Self::Supplier => "Suppliers",
            Self::Customer => "Customers",
            Self::Staff => "Staff",
            Self::PurchaseReceive => "Purchase receives",
            Self::SalesDelivery => "Sales deliveries",
            Self::Warranty => "Warranties",
            Self::InventoryTransaction => "Inventory transactions",
            Self::ProductionOrder => "Production orders",
            Self::ProductionPlan => "Production plans",
            Self::MaterialRequest => "Material requests",
            Self::Payable => "Payables",
            Self::Receivable => "Receivables",
        }
    }

    /// Accept either the kind name (`purchase-receive`) or the resource
    /// segment (`purchase-receives`).
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::iter().find(|kind| {
            let key: &'static str = kind.into();
            key == name || kind.resource() == name
        })
    }
}

/// A backend record type managed by the screen controllers.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    const KIND: EntityKind;
    const RESOURCE: &'static str = Self::KIND.resource();

    fn id(&self) -> &EntityId;

    /// Business code shown on cards (e.g. `PO-001`).
    fn code(&self) -> &str;

    /// Main display text (name, partner, product...).
    fn title(&self) -> &str;

    /// Text fields matched by the free-text search.
    fn search_fields(&self) -> Vec<&str>;

    /// Status-like value used by the facet filter.
    fn facet(&self) -> Option<&str> {
        None
    }

    /// Current lifecycle status, checked against `lifecycle()` before mutating.
    fn status(&self) -> Option<&str> {
        None
    }

    /// Field compared by the optional sort.
    fn sort_key(&self) -> &str {
        self.code()
    }

    /// Collection request: relation includes plus newest-first ordering.
    fn list_query() -> ListQuery {
        ListQuery::new().order_by("createdAt", SortOrder::Desc)
    }

    /// Single-record request.
    fn detail_query() -> ListQuery {
        ListQuery::new()
    }

    /// Relation keys renamed before decoding.
    fn relation_aliases() -> &'static [RelationAlias] {
        &[]
    }

    /// Status rules gating edit/delete/transition, if the type has any.
    fn lifecycle() -> Option<&'static Lifecycle> {
        None
    }

    /// Fields a form must fill before submitting.
    fn required_fields() -> &'static [&'static str] {
        &["code", "name"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_accepts_kind_or_resource() {
        assert_eq!(EntityKind::lookup("purchase-receive"), Some(EntityKind::PurchaseReceive));
        assert_eq!(EntityKind::lookup("sales-deliveries"), Some(EntityKind::SalesDelivery));
        assert_eq!(EntityKind::lookup("Staff"), Some(EntityKind::Staff));
        assert_eq!(EntityKind::lookup("invoices"), None);
    }

    #[test]
    fn display_is_kebab_case() {
        assert_eq!(EntityKind::InventoryTransaction.to_string(), "inventory-transaction");
    }

    #[test]
    fn resources_are_unique() {
        let mut seen: Vec<&str> = EntityKind::iter().map(EntityKind::resource).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), EntityKind::iter().count());
    }
}
