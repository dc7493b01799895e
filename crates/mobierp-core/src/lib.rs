//! Screen logic for the mobierp ERP client, independent of any UI toolkit.
//!
//! Every screen in the app is one of three shapes over some backend record
//! type, and this crate implements each shape once:
//!
//! - **[`ListController`]** -- fetches a collection into a [`ListView`],
//!   applies free-text search, a facet filter and an optional sort
//!   client-side, and gates delete/status changes behind the record type's
//!   [`Lifecycle`] and a confirmation. Fetches are numbered so only the
//!   latest response applies, and closing the screen aborts them.
//!
//! - **[`DetailController`]** -- fetches one record with its relations
//!   expanded (see [`relations`]) and exposes the same actions.
//!
//! - **[`FormController`]** -- collects fields and submits a create or a
//!   partial update.
//!
//! Controllers never reach for globals: a [`ScreenContext`] hands each one
//! its [`Backend`], [`Confirmer`] and [`Notifier`]. Focus-driven reloads
//! are an explicit [`ScreenSubscription`], and navigation is a static
//! [`route_table`] plus a [`Navigator`] stack.

pub mod backend;
pub mod config;
pub mod confirm;
pub mod detail;
pub mod entity;
pub mod error;
pub mod focus;
pub mod form;
pub mod lifecycle;
pub mod list;
pub mod model;
pub mod mutation;
pub mod notify;
pub mod relations;
pub mod router;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{Backend, ScreenContext};
pub use config::{BackendConfig, TlsVerification};
pub use confirm::{AutoConfirm, ConfirmGate, Confirmer, Decision, PendingPrompt, Prompt, confirmed};
pub use detail::{DetailController, DetailState};
pub use entity::{Entity, EntityKind};
pub use error::CoreError;
pub use focus::{FocusBus, FocusEvent, Reload, ScreenSubscription};
pub use form::{FormController, FormMode};
pub use lifecycle::{Action, DRAFT_DOCUMENT, Lifecycle, TransitionRule, WARRANTY_CLAIM};
pub use list::ListController;
pub use mutation::Outcome;
pub use notify::{ChannelNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use router::{HeaderConfig, NavEntry, Navigator, Route, RouteEntry, Screen, route_table};
pub use view::{Facet, ListView, LoadPhase, SortDirection};

pub use model::{
    Category, Customer, DocumentLine, DocumentStatus, EntityId, InventoryTransaction,
    MaterialRequest, Payable, Position, Product, ProductionOrder, ProductionPlan,
    PurchaseReceive, Receivable, SalesDelivery, Staff, Supplier, Team, Warehouse, Warranty,
};
