// ── Status rules ──
//
// Transactional records may only be edited or deleted in some statuses
// and may only move along declared transitions. These checks run before
// any request is sent; a violation is a local precondition failure.

use crate::error::CoreError;

/// One legal status move: into `to` from any status in `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub to: &'static str,
    pub from: &'static [&'static str],
}

/// An action requested against a record in its current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Edit,
    Delete,
    Transition(&'a str),
}

impl Action<'_> {
    fn describe(&self) -> String {
        match self {
            Self::Edit => "edit".to_owned(),
            Self::Delete => "delete".to_owned(),
            Self::Transition(to) => format!("move to '{to}'"),
        }
    }
}

fn reported(status: &str) -> String {
    if status.is_empty() {
        "unknown".to_owned()
    } else {
        status.to_owned()
    }
}

/// Status rules for one record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub editable_in: &'static [&'static str],
    pub deletable_in: &'static [&'static str],
    pub transitions: &'static [TransitionRule],
}

impl Lifecycle {
    /// Reject `action` unless `current` is in its allowed source set.
    pub fn check(&self, action: Action<'_>, current: &str) -> Result<(), CoreError> {
        let allowed: &[&str] = match action {
            Action::Edit => self.editable_in,
            Action::Delete => self.deletable_in,
            Action::Transition(to) => {
                let Some(rule) = self.transitions.iter().find(|r| r.to == to) else {
                    return Err(CoreError::Precondition {
                        action: action.describe(),
                        status: reported(current),
                        allowed: "none (unknown target status)".to_owned(),
                    });
                };
                rule.from
            }
        };

        if allowed.contains(&current) {
            Ok(())
        } else {
            Err(CoreError::Precondition {
                action: action.describe(),
                status: reported(current),
                allowed: if allowed.is_empty() {
                    "none".to_owned()
                } else {
                    allowed.join(", ")
                },
            })
        }
    }

    /// Statuses reachable from `current` in one step.
    pub fn targets_from<'s>(&'s self, current: &'s str) -> impl Iterator<Item = &'static str> + 's {
        self.transitions
            .iter()
            .filter(move |rule| rule.from.contains(&current))
            .map(|rule| rule.to)
    }
}

/// Receipts, deliveries, production and material requests: editable and
/// deletable only while still a draft.
pub static DRAFT_DOCUMENT: Lifecycle = Lifecycle {
    editable_in: &["draft"],
    deletable_in: &["draft"],
    transitions: &[
        TransitionRule {
            to: "pending",
            from: &["draft"],
        },
        TransitionRule {
            to: "approved",
            from: &["pending"],
        },
        TransitionRule {
            to: "in_progress",
            from: &["approved"],
        },
        TransitionRule {
            to: "completed",
            from: &["approved", "in_progress"],
        },
        TransitionRule {
            to: "cancelled",
            from: &["draft", "pending"],
        },
    ],
};

/// Warranty claims are worked on directly after intake.
pub static WARRANTY_CLAIM: Lifecycle = Lifecycle {
    editable_in: &["pending"],
    deletable_in: &["pending"],
    transitions: &[
        TransitionRule {
            to: "in_progress",
            from: &["pending"],
        },
        TransitionRule {
            to: "completed",
            from: &["in_progress"],
        },
        TransitionRule {
            to: "cancelled",
            from: &["pending", "in_progress"],
        },
    ],
};
