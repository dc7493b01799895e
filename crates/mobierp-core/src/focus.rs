// ── Screen focus lifecycle ──
//
// Screens re-fetch every time they become visible again. Instead of a
// framework hook, the front-end publishes focus events on a `FocusBus`
// and each screen holds a `ScreenSubscription` that reloads on `Gained`.
// Dropping the subscription ends the task and any reload it started.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const FOCUS_CHANNEL_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    Gained,
    Lost,
}

/// Focus notifications for one screen.
#[derive(Debug, Clone)]
pub struct FocusBus {
    tx: broadcast::Sender<FocusEvent>,
}

impl Default for FocusBus {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FOCUS_CHANNEL_SIZE);
        Self { tx }
    }

    /// Publish an event. Returns the number of live subscriptions.
    pub fn emit(&self, event: FocusEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn gained(&self) -> usize {
        self.emit(FocusEvent::Gained)
    }

    pub fn lost(&self) -> usize {
        self.emit(FocusEvent::Lost)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FocusEvent> {
        self.tx.subscribe()
    }
}

/// Anything a focus event should re-fetch.
pub trait Reload: Send + Sync {
    fn reload(&self) -> BoxFuture<'_, ()>;
}

/// A screen's live link to its focus bus.
///
/// Must be created inside a Tokio runtime.
pub struct ScreenSubscription {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ScreenSubscription {
    pub fn attach(target: Arc<dyn Reload>, bus: &FocusBus) -> Self {
        let cancel = CancellationToken::new();
        let rx = bus.subscribe();
        let handle = tokio::spawn(focus_task(target, rx, cancel.clone()));
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Stop reacting to focus and wait for the task to wind down.
    pub async fn close(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}

impl Drop for ScreenSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn focus_task(
    target: Arc<dyn Reload>,
    mut rx: broadcast::Receiver<FocusEvent>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = rx.recv() => event,
        };

        match event {
            // Missed events still mean the screen was shown at least once.
            Ok(FocusEvent::Gained) | Err(broadcast::error::RecvError::Lagged(_)) => {
                debug!("focus gained, reloading");
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = target.reload() => {}
                }
            }
            Ok(FocusEvent::Lost) => debug!("focus lost"),
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    debug!("focus subscription ended");
}
