// ── List-fetch-filter controller ──
//
// The reusable contract behind every list screen. Owns one `ListView`
// published on a `watch` channel; fetches replace the records wholesale,
// search/facet/sort edits are synchronous, and mutations are gated by
// the status rules and a confirmation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::ScreenContext;
use crate::entity::Entity;
use crate::error::CoreError;
use crate::focus::Reload;
use crate::model::EntityId;
use crate::mutation::{self, Outcome, decode_all, ensure_editable};
use crate::view::{Facet, ListView, LoadPhase, SortDirection};

/// One list screen's controller.
///
/// Every fetch is numbered; only the most recently issued one may apply
/// its response. Closing (or dropping) the controller aborts any fetch
/// still in flight.
pub struct ListController<E: Entity> {
    ctx: ScreenContext,
    view: watch::Sender<ListView<E>>,
    generation: AtomicU64,
    cancel: CancellationToken,
}

impl<E: Entity> ListController<E> {
    pub fn new(ctx: ScreenContext) -> Self {
        let (view, _) = watch::channel(ListView::new());
        Self {
            ctx,
            view,
            generation: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        }
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Initial fetch (full-screen spinner).
    pub async fn load(&self) -> Outcome {
        self.fetch(LoadPhase::Loading).await
    }

    /// Pull-to-refresh: same as `load` but flagged as refreshing.
    pub async fn refresh(&self) -> Outcome {
        self.fetch(LoadPhase::Refreshing).await
    }

    async fn fetch(&self, phase: LoadPhase) -> Outcome {
        if self.cancel.is_cancelled() {
            return Outcome::Cancelled;
        }

        let request = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.send_modify(|v| v.phase = phase);
        let _settle = SettleOnDrop {
            list: self,
            request,
        };
        debug!(kind = %E::KIND, request, ?phase, "fetching collection");

        let query = E::list_query();
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!(kind = %E::KIND, request, "fetch aborted: screen closed");
                return Outcome::Cancelled;
            }
            result = self.ctx.backend.list(E::RESOURCE, &query) => result,
        };

        if !self.is_latest(request) {
            debug!(kind = %E::KIND, request, "discarding stale response");
            return Outcome::Stale;
        }

        match result.and_then(decode_all::<E>) {
            Ok(items) => {
                debug!(kind = %E::KIND, request, count = items.len(), "collection replaced");
                self.view.send_modify(|v| {
                    v.raw_items = Arc::new(items);
                    v.phase = LoadPhase::Idle;
                });
                Outcome::Applied
            }
            Err(e) => {
                warn!(kind = %E::KIND, request, error = %e, "fetch failed, keeping last items");
                self.view.send_modify(|v| v.phase = LoadPhase::Idle);
                self.ctx
                    .notifier
                    .notify(e.notice(format!("Could not load {}", E::KIND.plural().to_lowercase())));
                Outcome::Failed
            }
        }
    }

    fn is_latest(&self, request: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == request
    }

    /// Clear the phase if `request` is still the latest fetch.
    fn settle(&self, request: u64) {
        if self.is_latest(request) {
            self.view.send_if_modified(|v| {
                let busy = v.phase != LoadPhase::Idle;
                v.phase = LoadPhase::Idle;
                busy
            });
        }
    }

    // ── View inputs ──────────────────────────────────────────────────

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.view.send_modify(|v| v.search_query = query);
    }

    pub fn set_facet_filter(&self, facet: Facet) {
        self.view.send_modify(|v| v.facet = facet);
    }

    pub fn set_sort_direction(&self, sort: Option<SortDirection>) {
        self.view.send_modify(|v| v.sort = sort);
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Current view state (cheap: records are shared).
    pub fn snapshot(&self) -> ListView<E> {
        self.view.borrow().clone()
    }

    /// Search + facet + sort applied to the current records.
    pub fn derived_items(&self) -> Vec<E> {
        self.view.borrow().derived_items()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListView<E>> {
        self.view.subscribe()
    }

    /// Stream of view states, starting with the current one.
    pub fn changes(&self) -> WatchStream<ListView<E>> {
        WatchStream::new(self.view.subscribe())
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Confirm, delete, then reload. No optimistic removal: the record
    /// disappears only when a successful reload no longer returns it.
    pub async fn remove(&self, id: &EntityId) -> Outcome {
        let Some(record) = self.lookup(id) else {
            return Outcome::Rejected;
        };
        let outcome = mutation::delete(&self.ctx, &record).await;
        if outcome.is_applied() {
            self.load().await;
        }
        outcome
    }

    /// Check the status rules, confirm, update, then reload.
    pub async fn transition_status(&self, id: &EntityId, to: &str) -> Outcome {
        let Some(record) = self.lookup(id) else {
            return Outcome::Rejected;
        };
        let outcome = mutation::transition(&self.ctx, &record, to).await;
        if outcome.is_applied() {
            self.load().await;
        }
        outcome
    }

    /// The record to open in an edit form, if its status allows editing.
    pub fn begin_edit(&self, id: &EntityId) -> Option<E> {
        let record = self.lookup(id)?;
        ensure_editable(&self.ctx, &record).then_some(record)
    }

    fn lookup(&self, id: &EntityId) -> Option<E> {
        let found = self.view.borrow().find(id).cloned();
        if found.is_none() {
            let err = CoreError::NotFound {
                entity_type: E::KIND.singular().to_owned(),
                identifier: id.to_string(),
            };
            self.ctx.notifier.notify(err.notice("Not found"));
        }
        found
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Unmount: abort in-flight fetches and refuse new ones.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Settles the load phase however a fetch ends, including when its future
/// is dropped mid-flight by a closing focus subscription.
struct SettleOnDrop<'a, E: Entity> {
    list: &'a ListController<E>,
    request: u64,
}

impl<E: Entity> Drop for SettleOnDrop<'_, E> {
    fn drop(&mut self) {
        self.list.settle(self.request);
    }
}

impl<E: Entity> Drop for ListController<E> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<E: Entity> Reload for ListController<E> {
    fn reload(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.load().await;
        })
    }
}
