// ── Confirmation-gated actions ──
//
// Destructive or state-changing actions wait for an explicit yes/no from
// the user. The wait is an async suspension point, never a blocking call.
// At most one prompt is pending per gate: a newer request supersedes the
// older one, whose waiter resolves as cancelled.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::future::BoxFuture;
use tokio::sync::{oneshot, watch};
use tracing::debug;

/// What the user is asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
}

impl Prompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// The user's answer. Dismissal counts as `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirmed,
    Cancelled,
}

/// Something that can ask the user to confirm.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: Prompt) -> BoxFuture<'_, Decision>;
}

/// Answers every prompt the same way (non-interactive front-ends, `--yes`).
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub Decision);

impl Confirmer for AutoConfirm {
    fn confirm(&self, prompt: Prompt) -> BoxFuture<'_, Decision> {
        debug!(title = %prompt.title, decision = ?self.0, "auto-answered prompt");
        let decision = self.0;
        Box::pin(async move { decision })
    }
}

/// Run `continuation` only if the user confirms `prompt`.
pub async fn confirmed<F, T>(confirmer: &dyn Confirmer, prompt: Prompt, continuation: F) -> Option<T>
where
    F: Future<Output = T>,
{
    match confirmer.confirm(prompt).await {
        Decision::Confirmed => Some(continuation.await),
        Decision::Cancelled => None,
    }
}

// ── ConfirmGate ──────────────────────────────────────────────────

/// A prompt currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPrompt {
    pub id: u64,
    pub prompt: Prompt,
}

struct Waiter {
    id: u64,
    reply: oneshot::Sender<Decision>,
}

/// UI-driven confirmer: publishes the visible prompt and resolves it when
/// the front-end calls [`respond`](Self::respond).
pub struct ConfirmGate {
    waiter: Mutex<Option<Waiter>>,
    visible: watch::Sender<Option<PendingPrompt>>,
    next_id: AtomicU64,
}

impl Default for ConfirmGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmGate {
    pub fn new() -> Self {
        let (visible, _) = watch::channel(None);
        Self {
            waiter: Mutex::new(None),
            visible,
            next_id: AtomicU64::new(1),
        }
    }

    /// Show `prompt` and wait for the answer.
    ///
    /// Registration happens immediately, before the returned future is
    /// polled, so a later call always supersedes this one.
    pub fn request(&self, prompt: Prompt) -> impl Future<Output = Decision> + Send + 'static {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply, rx) = oneshot::channel();

        let superseded = self
            .waiter
            .lock()
            .expect("confirm lock poisoned")
            .replace(Waiter { id, reply });
        if let Some(old) = superseded {
            debug!(superseded = old.id, by = id, "prompt replaced");
            // Dropping the sender resolves the old waiter as cancelled.
            drop(old);
        }
        self.visible
            .send_replace(Some(PendingPrompt { id, prompt }));

        async move { rx.await.unwrap_or(Decision::Cancelled) }
    }

    /// Resolve the visible prompt. Returns `false` if nothing was pending.
    pub fn respond(&self, decision: Decision) -> bool {
        let waiter = self.waiter.lock().expect("confirm lock poisoned").take();
        self.visible.send_replace(None);
        match waiter {
            Some(w) => {
                debug!(prompt = w.id, ?decision, "prompt answered");
                // The requester may have given up already.
                let _ = w.reply.send(decision);
                true
            }
            None => false,
        }
    }

    /// Dismiss the visible prompt (same as cancelling).
    pub fn dismiss(&self) -> bool {
        self.respond(Decision::Cancelled)
    }

    /// The prompt currently shown, if any.
    pub fn pending(&self) -> Option<PendingPrompt> {
        self.visible.borrow().clone()
    }

    /// Watch the visible prompt.
    pub fn subscribe(&self) -> watch::Receiver<Option<PendingPrompt>> {
        self.visible.subscribe()
    }
}

impl Confirmer for ConfirmGate {
    fn confirm(&self, prompt: Prompt) -> BoxFuture<'_, Decision> {
        Box::pin(self.request(prompt))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirm_resolves_waiter() {
        let gate = ConfirmGate::new();
        let answer = gate.request(Prompt::new("Delete", "Delete PO-001?"));

        assert_eq!(gate.pending().unwrap().prompt.title, "Delete");
        assert!(gate.respond(Decision::Confirmed));
        assert_eq!(answer.await, Decision::Confirmed);
        assert!(gate.pending().is_none());
    }

    #[tokio::test]
    async fn dismiss_cancels() {
        let gate = ConfirmGate::new();
        let answer = gate.request(Prompt::new("Delete", "sure?"));
        assert!(gate.dismiss());
        assert_eq!(answer.await, Decision::Cancelled);
    }

    #[tokio::test]
    async fn second_request_supersedes_first() {
        let gate = ConfirmGate::new();
        let first = gate.request(Prompt::new("first", ""));
        let second = gate.request(Prompt::new("second", ""));

        assert_eq!(gate.pending().unwrap().prompt.title, "second");
        assert_eq!(first.await, Decision::Cancelled);

        gate.respond(Decision::Confirmed);
        assert_eq!(second.await, Decision::Confirmed);
    }

    #[test]
    fn respond_without_prompt_is_noop() {
        let gate = ConfirmGate::new();
        assert!(!gate.respond(Decision::Confirmed));
    }

    #[tokio::test]
    async fn continuation_runs_only_on_confirm() {
        let yes = AutoConfirm(Decision::Confirmed);
        let no = AutoConfirm(Decision::Cancelled);

        assert_eq!(confirmed(&yes, Prompt::new("t", "m"), async { 7 }).await, Some(7));
        assert_eq!(confirmed(&no, Prompt::new("t", "m"), async { 7 }).await, None);
    }
}
