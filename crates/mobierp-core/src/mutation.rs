// ── Shared mutation steps ──
//
// List and detail screens expose the same actions on a record: delete,
// move to another status, open for editing. Each runs the same sequence:
// local status check, confirmation, backend call, notification.

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::backend::ScreenContext;
use crate::confirm::{Decision, Prompt};
use crate::entity::Entity;
use crate::error::CoreError;
use crate::lifecycle::Action;
use crate::notify::Notice;
use crate::relations::apply_aliases;

/// How a controller operation ended. Failures have already been surfaced
/// through the notifier by the time an outcome is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation completed and its result was applied.
    Applied,
    /// The backend call failed; state was left untouched.
    Failed,
    /// A local precondition rejected the operation before any request.
    Rejected,
    /// The user declined, or the screen was closed mid-flight.
    Cancelled,
    /// A newer fetch was issued; this response was discarded.
    Stale,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

// ── Decoding ─────────────────────────────────────────────────────

/// Flatten relation aliases, then decode one record.
pub fn decode<E: Entity>(mut value: Value) -> Result<E, CoreError> {
    apply_aliases(&mut value, E::relation_aliases());
    serde_json::from_value(value).map_err(|e| CoreError::Decode {
        entity_type: E::KIND.singular().to_owned(),
        message: e.to_string(),
    })
}

/// Decode a collection, skipping records that do not decode. The batch
/// fails only when a non-empty payload yields no record at all.
pub fn decode_all<E: Entity>(values: Vec<Value>) -> Result<Vec<E>, CoreError> {
    let mut items = Vec::with_capacity(values.len());
    let mut first_error = None;
    for value in values {
        match decode::<E>(value) {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!(kind = %E::KIND, error = %e, "skipping undecodable record");
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) if items.is_empty() => Err(e),
        _ => Ok(items),
    }
}

// ── Status checks ────────────────────────────────────────────────

/// Apply the record type's status rules, if it has any.
pub fn check<E: Entity>(record: &E, action: Action<'_>) -> Result<(), CoreError> {
    match E::lifecycle() {
        Some(lifecycle) => lifecycle.check(action, record.status().unwrap_or_default()),
        None => Ok(()),
    }
}

/// Check that `record` may be edited; notifies and returns `false` if not.
pub fn ensure_editable<E: Entity>(ctx: &ScreenContext, record: &E) -> bool {
    match check(record, Action::Edit) {
        Ok(()) => true,
        Err(e) => {
            debug!(kind = %E::KIND, code = record.code(), error = %e, "edit rejected");
            ctx.notifier.notify(e.notice("Not allowed"));
            false
        }
    }
}

// ── Actions ──────────────────────────────────────────────────────

/// Status check, confirmation, then `DELETE`.
pub async fn delete<E: Entity>(ctx: &ScreenContext, record: &E) -> Outcome {
    if let Err(e) = check(record, Action::Delete) {
        debug!(kind = %E::KIND, code = record.code(), error = %e, "delete rejected");
        ctx.notifier.notify(e.notice("Not allowed"));
        return Outcome::Rejected;
    }

    let prompt = Prompt::new(
        format!("Delete {}", E::KIND.singular().to_lowercase()),
        format!("Delete {}? This cannot be undone.", display_name(record)),
    );
    if ctx.confirmer.confirm(prompt).await == Decision::Cancelled {
        return Outcome::Cancelled;
    }

    match ctx.backend.delete(E::RESOURCE, record.id()).await {
        Ok(()) => {
            info!(kind = %E::KIND, id = %record.id(), "record deleted");
            ctx.notifier.notify(Notice::success(
                "Deleted",
                format!("{} was deleted.", display_name(record)),
            ));
            Outcome::Applied
        }
        Err(e) => {
            warn!(kind = %E::KIND, id = %record.id(), error = %e, "delete failed");
            ctx.notifier.notify(e.notice("Delete failed"));
            Outcome::Failed
        }
    }
}

/// Status check, confirmation, then `PUT { status: to }`.
pub async fn transition<E: Entity>(ctx: &ScreenContext, record: &E, to: &str) -> Outcome {
    if let Err(e) = check(record, Action::Transition(to)) {
        debug!(kind = %E::KIND, code = record.code(), to, error = %e, "transition rejected");
        ctx.notifier.notify(e.notice("Not allowed"));
        return Outcome::Rejected;
    }

    let from = record.status().unwrap_or_default();
    let prompt = Prompt::new(
        "Change status",
        format!("Move {} from '{from}' to '{to}'?", display_name(record)),
    );
    if ctx.confirmer.confirm(prompt).await == Decision::Cancelled {
        return Outcome::Cancelled;
    }

    let body = json!({ "status": to });
    match ctx.backend.update(E::RESOURCE, record.id(), &body).await {
        Ok(_) => {
            info!(kind = %E::KIND, id = %record.id(), from, to, "status changed");
            Outcome::Applied
        }
        Err(e) => {
            warn!(kind = %E::KIND, id = %record.id(), error = %e, "status change failed");
            ctx.notifier.notify(e.notice("Status change failed"));
            Outcome::Failed
        }
    }
}

fn display_name<E: Entity>(record: &E) -> String {
    match (record.code(), record.title()) {
        ("", "") => format!("{} #{}", E::KIND.singular(), record.id()),
        ("", title) => title.to_owned(),
        (code, _) => code.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{DocumentStatus, EntityId, Payable, PurchaseReceive, Staff};

    #[test]
    fn decode_applies_aliases() {
        let staff: Staff = decode(json!({
            "id": 7,
            "code": "S-7",
            "fullName": "Lan Tran",
            "positions": [{ "id": 1, "name": "Buyer" }],
        }))
        .unwrap();
        assert_eq!(staff.position.unwrap().name, "Buyer");
    }

    #[test]
    fn decode_all_skips_bad_rows() {
        let items = decode_all::<PurchaseReceive>(vec![
            json!({ "id": 1, "code": "PO-001", "status": "draft" }),
            json!({ "id": 2, "code": 17 }),
            json!({ "id": 3, "code": "PO-003", "status": null }),
        ])
        .unwrap();
        let ids: Vec<_> = items.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![EntityId::Number(1), EntityId::Number(3)]);
        assert!(items[1].status.is_unknown());
    }

    #[test]
    fn decode_all_fails_when_nothing_decodes() {
        let result = decode_all::<PurchaseReceive>(vec![json!({ "id": 2, "code": 17 })]);
        assert!(matches!(result, Err(CoreError::Decode { .. })));
        assert!(decode_all::<PurchaseReceive>(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn decimal_string_amounts_decode() {
        let payable: Payable = decode(json!({
            "id": 4,
            "code": "AP-004",
            "amount": "1500000.00",
            "paidAmount": null,
        }))
        .unwrap();
        assert!((payable.amount - 1_500_000.0).abs() < f64::EPSILON);
        assert!(payable.paid_amount.abs() < f64::EPSILON);
    }

    #[test]
    fn missing_status_blocks_every_action() {
        let receive: PurchaseReceive = decode(json!({ "id": 5, "code": "PO-5" })).unwrap();
        assert!(check(&receive, Action::Edit).unwrap_err().is_precondition());
        assert!(check(&receive, Action::Delete).unwrap_err().is_precondition());
        assert!(check(&receive, Action::Transition("pending")).is_err());
    }

    #[test]
    fn check_uses_record_status() {
        let mut receive = PurchaseReceive {
            status: DocumentStatus::Completed,
            ..PurchaseReceive::default()
        };
        assert!(check(&receive, Action::Edit).unwrap_err().is_precondition());

        receive.status = DocumentStatus::Draft;
        assert!(check(&receive, Action::Edit).is_ok());
    }

    #[test]
    fn records_without_lifecycle_allow_everything() {
        let staff = Staff::default();
        assert!(check(&staff, Action::Delete).is_ok());
        assert!(check(&staff, Action::Transition("archived")).is_ok());
    }
}
