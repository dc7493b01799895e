// ── Detail controller ──
//
// Fetches one record with its relations expanded, flattens aliased
// relation names, and exposes the same edit/delete/status actions as the
// list. State moves idle → loading → ready | error, and back to loading on
// every refresh or focus. A reload keeps the last good record available,
// so actions keep working while it is in flight.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::ScreenContext;
use crate::entity::Entity;
use crate::error::CoreError;
use crate::focus::Reload;
use crate::model::EntityId;
use crate::mutation::{self, Outcome, decode, ensure_editable};
use crate::router::Navigator;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState<E> {
    #[default]
    Idle,
    /// A fetch is in flight; `previous` is the record shown before it.
    Loading { previous: Option<E> },
    Ready(E),
    Error(String),
}

impl<E> DetailState<E> {
    /// The record to show and act on: the loaded one, or during a reload
    /// the last one that loaded.
    pub fn record(&self) -> Option<&E> {
        match self {
            Self::Ready(record)
            | Self::Loading {
                previous: Some(record),
            } => Some(record),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// One detail screen's controller.
pub struct DetailController<E: Entity> {
    ctx: ScreenContext,
    id: EntityId,
    state: watch::Sender<DetailState<E>>,
    navigator: Option<Navigator>,
    generation: AtomicU64,
    cancel: CancellationToken,
}

impl<E: Entity> DetailController<E> {
    pub fn new(ctx: ScreenContext, id: EntityId) -> Self {
        let (state, _) = watch::channel(DetailState::Idle);
        Self {
            ctx,
            id,
            state,
            navigator: None,
            generation: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        }
    }

    /// Navigate back on load failure and after a successful delete.
    pub fn with_navigator(mut self, navigator: Navigator) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn state(&self) -> DetailState<E> {
        self.state.borrow().clone()
    }

    pub fn record(&self) -> Option<E> {
        self.state.borrow().record().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState<E>> {
        self.state.subscribe()
    }

    /// Fetch the record. Failures are notified and, with a navigator
    /// attached, send the user back to the previous screen.
    pub async fn load(&self) -> Outcome {
        if self.cancel.is_cancelled() {
            return Outcome::Cancelled;
        }

        let request = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            let previous = state.record().cloned();
            *state = DetailState::Loading { previous };
        });
        let _settle = SettleOnDrop {
            detail: self,
            request,
        };
        debug!(kind = %E::KIND, id = %self.id, request, "fetching record");

        let query = E::detail_query();
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!(kind = %E::KIND, id = %self.id, request, "fetch aborted: screen closed");
                return Outcome::Cancelled;
            }
            result = self.ctx.backend.get(E::RESOURCE, &self.id, &query) => result,
        };

        if !self.is_latest(request) {
            debug!(kind = %E::KIND, id = %self.id, request, "discarding stale response");
            return Outcome::Stale;
        }

        match result.and_then(decode::<E>) {
            Ok(record) => {
                self.state.send_replace(DetailState::Ready(record));
                Outcome::Applied
            }
            Err(e) => {
                warn!(kind = %E::KIND, id = %self.id, error = %e, "record fetch failed");
                self.state.send_replace(DetailState::Error(e.to_string()));
                self.ctx
                    .notifier
                    .notify(e.notice(format!("Could not load {}", E::KIND.singular().to_lowercase())));
                if let Some(nav) = &self.navigator {
                    nav.back();
                }
                Outcome::Failed
            }
        }
    }

    fn is_latest(&self, request: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == request
    }

    /// Put back what was shown before `request` if it is still the latest
    /// fetch and never settled.
    fn settle(&self, request: u64) {
        if self.is_latest(request) {
            self.state.send_if_modified(|state| {
                let DetailState::Loading { previous } = state else {
                    return false;
                };
                let previous = previous.take();
                *state = previous.map_or(DetailState::Idle, DetailState::Ready);
                true
            });
        }
    }

    /// The record to act on; notifies when none has loaded.
    fn loaded(&self) -> Option<E> {
        let record = self.record();
        if record.is_none() {
            let err = CoreError::NotFound {
                entity_type: E::KIND.singular().to_owned(),
                identifier: self.id.to_string(),
            };
            self.ctx.notifier.notify(err.notice("Not loaded"));
        }
        record
    }

    /// Confirm and delete the loaded record, then leave the screen.
    pub async fn remove(&self) -> Outcome {
        let Some(record) = self.loaded() else {
            return Outcome::Rejected;
        };
        let outcome = mutation::delete(&self.ctx, &record).await;
        if outcome.is_applied() {
            if let Some(nav) = &self.navigator {
                nav.back();
            }
        }
        outcome
    }

    /// Confirm and move the loaded record to `to`, then re-fetch it.
    pub async fn transition_status(&self, to: &str) -> Outcome {
        let Some(record) = self.loaded() else {
            return Outcome::Rejected;
        };
        let outcome = mutation::transition(&self.ctx, &record, to).await;
        if outcome.is_applied() {
            self.load().await;
        }
        outcome
    }

    /// The loaded record, if its status allows editing.
    pub fn begin_edit(&self) -> Option<E> {
        let record = self.loaded()?;
        ensure_editable(&self.ctx, &record).then_some(record)
    }

    pub fn close(&self) {
        self.cancel.cancel();
    }
}

/// Settles the state however a fetch ends, including when its future is
/// dropped mid-flight.
struct SettleOnDrop<'a, E: Entity> {
    detail: &'a DetailController<E>,
    request: u64,
}

impl<E: Entity> Drop for SettleOnDrop<'_, E> {
    fn drop(&mut self) {
        self.detail.settle(self.request);
    }
}

impl<E: Entity> Drop for DetailController<E> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<E: Entity> Reload for DetailController<E> {
    fn reload(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.load().await;
        })
    }
}

impl<E: Entity> fmt::Debug for DetailController<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetailController")
            .field("kind", &E::KIND)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
