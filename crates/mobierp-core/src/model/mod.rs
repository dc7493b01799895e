// ── Domain model ──
//
// Records mirrored from the backend. The client never owns identity:
// every value here is the backend's last-known state, decoded leniently
// (missing fields fall back to defaults).

mod catalog;
mod entity_id;
mod finance;
mod inventory;
mod line;
mod number;
mod partner;
mod production;
mod purchase;
mod sales;
mod staff;
mod status;
mod warranty;

pub use catalog::{Category, Product, Warehouse};
pub use entity_id::EntityId;
pub use finance::{Payable, Receivable};
pub use inventory::InventoryTransaction;
pub use line::DocumentLine;
pub use partner::{Customer, Supplier};
pub use production::{MaterialRequest, ProductionOrder, ProductionPlan, progress_pct};
pub use purchase::PurchaseReceive;
pub use sales::SalesDelivery;
pub use staff::{Position, Staff, Team};
pub use status::DocumentStatus;
pub use warranty::Warranty;
