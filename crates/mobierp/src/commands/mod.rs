//! Command handlers.
//!
//! Record commands are generic over the entity type; `for_kind!` picks the
//! concrete type for the kind named on the command line.

pub mod catalog;
pub mod config_cmd;
pub mod records;
pub mod util;

use std::sync::Arc;

use strum::IntoEnumIterator;

use mobierp_core::{
    AutoConfirm, BackendConfig, Category, Confirmer, Customer, Decision, EntityKind,
    InventoryTransaction, MaterialRequest, Outcome, Payable, Product, ProductionOrder,
    ProductionPlan, PurchaseReceive, Receivable, SalesDelivery, ScreenContext, Staff, Supplier,
    Warehouse, Warranty,
};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::interact::{TerminalConfirm, TerminalNotifier};
use crate::output;

// ── Session ─────────────────────────────────────────────────────────

/// Everything a record command needs: the screen collaborators plus the
/// global flags.
pub struct Session<'a> {
    pub ctx: ScreenContext,
    pub notices: Arc<TerminalNotifier>,
    pub global: &'a GlobalOpts,
}

impl<'a> Session<'a> {
    pub fn connect(backend: &BackendConfig, global: &'a GlobalOpts) -> Result<Self, CliError> {
        let client = backend.connect()?;
        let notices = Arc::new(TerminalNotifier::new(
            output::should_color(&global.color),
            global.quiet,
        ));
        let confirmer: Arc<dyn Confirmer> = if global.yes {
            Arc::new(AutoConfirm(Decision::Confirmed))
        } else {
            Arc::new(TerminalConfirm)
        };

        Ok(Self {
            ctx: ScreenContext::new(Arc::new(client), confirmer, notices.clone()),
            notices,
            global,
        })
    }

    /// Turn a controller outcome into the command's result. Failures carry
    /// the notice the controller raised.
    pub fn settle(&self, outcome: Outcome) -> Result<(), CliError> {
        match outcome {
            Outcome::Applied | Outcome::Stale => Ok(()),
            Outcome::Cancelled => {
                if !self.global.quiet {
                    eprintln!("Cancelled.");
                }
                Ok(())
            }
            Outcome::Failed => {
                let (title, message) = self.take_notice("Request failed");
                Err(CliError::ActionFailed { title, message })
            }
            Outcome::Rejected => {
                let (title, message) = self.take_notice("Not allowed");
                Err(CliError::Rejected { title, message })
            }
        }
    }

    fn take_notice(&self, fallback: &str) -> (String, String) {
        self.notices.take_error().map_or_else(
            || (fallback.to_owned(), "no details reported".to_owned()),
            |notice| (notice.title, notice.message),
        )
    }
}

// ── Dispatch ────────────────────────────────────────────────────────

/// Run `handler::<T>(args...)` for the concrete type behind `$kind`.
macro_rules! for_kind {
    ($kind:expr, $($handler:ident)::+, $($arg:expr),* $(,)?) => {
        match $kind {
            EntityKind::Product => $($handler)::+::<Product>($($arg),*).await,
            EntityKind::Category => $($handler)::+::<Category>($($arg),*).await,
            EntityKind::Warehouse => $($handler)::+::<Warehouse>($($arg),*).await,
            EntityKind::Supplier => $($handler)::+::<Supplier>($($arg),*).await,
            EntityKind::Customer => $($handler)::+::<Customer>($($arg),*).await,
            EntityKind::Staff => $($handler)::+::<Staff>($($arg),*).await,
            EntityKind::PurchaseReceive => $($handler)::+::<PurchaseReceive>($($arg),*).await,
            EntityKind::SalesDelivery => $($handler)::+::<SalesDelivery>($($arg),*).await,
            EntityKind::Warranty => $($handler)::+::<Warranty>($($arg),*).await,
            EntityKind::InventoryTransaction => {
                $($handler)::+::<InventoryTransaction>($($arg),*).await
            }
            EntityKind::ProductionOrder => $($handler)::+::<ProductionOrder>($($arg),*).await,
            EntityKind::ProductionPlan => $($handler)::+::<ProductionPlan>($($arg),*).await,
            EntityKind::MaterialRequest => $($handler)::+::<MaterialRequest>($($arg),*).await,
            EntityKind::Payable => $($handler)::+::<Payable>($($arg),*).await,
            EntityKind::Receivable => $($handler)::+::<Receivable>($($arg),*).await,
        }
    };
}

pub async fn dispatch(cmd: Command, session: &Session<'_>) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => {
            let kind = resolve_kind(&args.kind)?;
            for_kind!(kind, records::list, session, &args)
        }
        Command::Get(args) => {
            let kind = resolve_kind(&args.kind)?;
            for_kind!(kind, records::get, session, &args)
        }
        Command::Create(args) => {
            let kind = resolve_kind(&args.kind)?;
            for_kind!(kind, records::create, session, &args)
        }
        Command::Update(args) => {
            let kind = resolve_kind(&args.kind)?;
            for_kind!(kind, records::update, session, &args)
        }
        Command::Delete(args) => {
            let kind = resolve_kind(&args.kind)?;
            for_kind!(kind, records::delete, session, &args)
        }
        Command::Transition(args) => {
            let kind = resolve_kind(&args.kind)?;
            for_kind!(kind, records::transition, session, &args)
        }
        // Local commands are handled before a session is opened
        Command::Kinds | Command::Routes | Command::Config(_) | Command::Completions(_) => {
            unreachable!()
        }
    }
}

/// Parse a kind name or resource segment from the command line.
pub fn resolve_kind(name: &str) -> Result<EntityKind, CliError> {
    EntityKind::lookup(name).ok_or_else(|| CliError::UnknownKind {
        kind: name.to_owned(),
        available: EntityKind::iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kinds_resolve_by_name_or_resource() {
        assert_eq!(resolve_kind("warranties").unwrap(), EntityKind::Warranty);
        assert_eq!(resolve_kind("production-plan").unwrap(), EntityKind::ProductionPlan);

        let err = resolve_kind("invoice").unwrap_err();
        assert!(matches!(err, CliError::UnknownKind { .. }));
        assert!(err.to_string().contains("invoice"));
    }
}
