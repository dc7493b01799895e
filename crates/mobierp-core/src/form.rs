// ── Form controller ──
//
// Collects field input for a create or an edit and submits it as a POST
// or a partial PUT. Editing a record whose status forbids it is refused
// before the form is even opened.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use mobierp_api::normalize_object;

use crate::backend::ScreenContext;
use crate::entity::Entity;
use crate::error::CoreError;
use crate::mutation::{Outcome, decode, ensure_editable};
use crate::notify::Notice;

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode<E> {
    Create,
    Edit(E),
}

pub struct FormController<E: Entity> {
    ctx: ScreenContext,
    mode: FormMode<E>,
    fields: Map<String, Value>,
    saved: Option<E>,
}

impl<E: Entity> FormController<E> {
    /// An empty form for a new record.
    pub fn create(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            mode: FormMode::Create,
            fields: Map::new(),
            saved: None,
        }
    }

    /// A form over `existing`. Returns `None` (after notifying) when the
    /// record's status does not allow editing.
    pub fn edit(ctx: ScreenContext, existing: E) -> Option<Self> {
        if !ensure_editable(&ctx, &existing) {
            return None;
        }
        Some(Self {
            ctx,
            mode: FormMode::Edit(existing),
            fields: Map::new(),
            saved: None,
        })
    }

    pub fn mode(&self) -> &FormMode<E> {
        &self.mode
    }

    /// Screen title for the current mode.
    pub fn title(&self) -> String {
        let kind = E::KIND.singular().to_lowercase();
        match self.mode {
            FormMode::Create => format!("New {kind}"),
            FormMode::Edit(_) => format!("Edit {kind}"),
        }
    }

    /// Fields changed so far; this is exactly the request body.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Fill fields from a JSON object, e.g. one parsed from user input.
    pub fn set_fields(&mut self, values: Map<String, Value>) {
        self.fields.extend(values);
    }

    /// Required fields that are absent (create) or blanked (create and edit).
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let creating = matches!(self.mode, FormMode::Create);
        E::required_fields()
            .iter()
            .copied()
            .filter(|name| match self.fields.get(*name) {
                Some(value) => is_blank(value),
                None => creating,
            })
            .collect()
    }

    /// The record as the backend returned it after the last submit.
    pub fn saved(&self) -> Option<&E> {
        self.saved.as_ref()
    }

    /// Validate locally, then POST (create) or PUT (edit).
    pub async fn submit(&mut self) -> Outcome {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            let err = CoreError::ValidationFailed {
                message: format!("missing required field(s): {}", missing.join(", ")),
            };
            debug!(kind = %E::KIND, ?missing, "form rejected");
            self.ctx.notifier.notify(err.notice("Incomplete form"));
            return Outcome::Rejected;
        }

        let body = Value::Object(self.fields.clone());
        let result = match &self.mode {
            FormMode::Create => self.ctx.backend.create(E::RESOURCE, &body).await,
            FormMode::Edit(existing) => {
                self.ctx
                    .backend
                    .update(E::RESOURCE, existing.id(), &body)
                    .await
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(kind = %E::KIND, error = %e, "save failed");
                self.ctx.notifier.notify(e.notice("Save failed"));
                return Outcome::Failed;
            }
        };

        // Some endpoints answer with an empty body; keep what we know then.
        self.saved = match normalize_object(response) {
            Some(object) => match decode::<E>(object) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(kind = %E::KIND, error = %e, "saved record could not be decoded");
                    None
                }
            },
            None => match &self.mode {
                FormMode::Edit(existing) => Some(existing.clone()),
                FormMode::Create => None,
            },
        };

        info!(kind = %E::KIND, "record saved");
        self.ctx.notifier.notify(Notice::success(
            "Saved",
            format!("{} saved.", E::KIND.singular()),
        ));
        Outcome::Applied
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&Value::from("  ")));
        assert!(!is_blank(&Value::from(0)));
        assert!(!is_blank(&Value::from("PO-1")));
    }
}
