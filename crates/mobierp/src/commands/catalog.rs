//! Static catalogs that need no backend: record kinds and screen routes.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use mobierp_core::{
    Category, Customer, Entity, EntityKind, InventoryTransaction, Lifecycle, MaterialRequest,
    Payable, Product, ProductionOrder, ProductionPlan, PurchaseReceive, Receivable, RouteEntry,
    SalesDelivery, Staff, Supplier, Warehouse, Warranty, route_table,
};

use crate::cli::GlobalOpts;
use crate::output;

// ── kinds ───────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
struct KindRow {
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "RESOURCE")]
    resource: &'static str,
    #[tabled(rename = "EDITABLE IN")]
    editable_in: String,
    #[tabled(rename = "DELETABLE IN")]
    deletable_in: String,
    #[tabled(rename = "REQUIRED")]
    required: String,
}

fn statuses(list: &[&str]) -> String {
    if list.is_empty() {
        "-".into()
    } else {
        list.join(", ")
    }
}

fn kind_row_for<E: Entity>() -> KindRow {
    let lifecycle: Option<&Lifecycle> = E::lifecycle();
    KindRow {
        kind: E::KIND.to_string(),
        resource: E::RESOURCE,
        editable_in: lifecycle.map_or_else(|| "any".into(), |l| statuses(l.editable_in)),
        deletable_in: lifecycle.map_or_else(|| "any".into(), |l| statuses(l.deletable_in)),
        required: E::required_fields().join(", "),
    }
}

fn kind_row(kind: EntityKind) -> KindRow {
    match kind {
        EntityKind::Product => kind_row_for::<Product>(),
        EntityKind::Category => kind_row_for::<Category>(),
        EntityKind::Warehouse => kind_row_for::<Warehouse>(),
        EntityKind::Supplier => kind_row_for::<Supplier>(),
        EntityKind::Customer => kind_row_for::<Customer>(),
        EntityKind::Staff => kind_row_for::<Staff>(),
        EntityKind::PurchaseReceive => kind_row_for::<PurchaseReceive>(),
        EntityKind::SalesDelivery => kind_row_for::<SalesDelivery>(),
        EntityKind::Warranty => kind_row_for::<Warranty>(),
        EntityKind::InventoryTransaction => kind_row_for::<InventoryTransaction>(),
        EntityKind::ProductionOrder => kind_row_for::<ProductionOrder>(),
        EntityKind::ProductionPlan => kind_row_for::<ProductionPlan>(),
        EntityKind::MaterialRequest => kind_row_for::<MaterialRequest>(),
        EntityKind::Payable => kind_row_for::<Payable>(),
        EntityKind::Receivable => kind_row_for::<Receivable>(),
    }
}

pub fn kinds(global: &GlobalOpts) {
    let rows: Vec<KindRow> = EntityKind::iter().map(kind_row).collect();
    let out = output::render_list(
        &global.output,
        &rows,
        KindRow::clone,
        |row| row.kind.clone(),
    );
    output::print_output(&out, global.quiet);
}

// ── routes ──────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
struct RouteRow {
    #[tabled(rename = "ROUTE")]
    name: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "BACK")]
    show_back: bool,
}

impl From<&RouteEntry> for RouteRow {
    fn from(entry: &RouteEntry) -> Self {
        Self {
            name: entry.name.clone(),
            title: entry.header.title.clone(),
            show_back: entry.header.show_back,
        }
    }
}

pub fn routes(global: &GlobalOpts) {
    let rows: Vec<RouteRow> = route_table().iter().map(RouteRow::from).collect();
    let out = output::render_list(
        &global.output,
        &rows,
        RouteRow::clone,
        |row| row.name.clone(),
    );
    output::print_output(&out, global.quiet);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_kinds_list_their_statuses() {
        let row = kind_row(EntityKind::PurchaseReceive);
        assert_eq!(row.resource, "purchase-receives");
        assert_ne!(row.editable_in, "any");

        let row = kind_row(EntityKind::Product);
        assert_eq!(row.editable_in, "any");
    }
}
