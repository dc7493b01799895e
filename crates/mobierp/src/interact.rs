//! Terminal collaborators for the screen controllers.
//!
//! The controllers ask for confirmation and push notices through traits;
//! here they become a dialoguer prompt, colored stderr lines and an
//! indicatif spinner.

use std::io::{self, IsTerminal};
use std::sync::Mutex;
use std::time::Duration;

use futures_util::future::BoxFuture;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::sync::{oneshot, watch};
use tracing::warn;

use mobierp_core::{Confirmer, Decision, Notice, NoticeLevel, Notifier, Prompt};

// ── Confirmation ─────────────────────────────────────────────────────

/// Asks on the terminal. The blocking read runs off the async workers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirmer for TerminalConfirm {
    fn confirm(&self, prompt: Prompt) -> BoxFuture<'_, Decision> {
        Box::pin(async move {
            let question = format!("{}: {}", prompt.title, prompt.message);
            let answer = tokio::task::spawn_blocking(move || {
                dialoguer::Confirm::new()
                    .with_prompt(question)
                    .default(false)
                    .interact()
            })
            .await;

            match answer {
                Ok(Ok(true)) => Decision::Confirmed,
                Ok(Ok(false)) => Decision::Cancelled,
                Ok(Err(e)) => {
                    warn!(error = %e, "confirmation prompt failed");
                    Decision::Cancelled
                }
                Err(e) => {
                    warn!(error = %e, "confirmation task panicked");
                    Decision::Cancelled
                }
            }
        })
    }
}

// ── Notices ──────────────────────────────────────────────────────────

/// Prints success/info notices to stderr and holds on to the last error
/// so the command can turn it into its exit status.
#[derive(Debug)]
pub struct TerminalNotifier {
    color: bool,
    quiet: bool,
    last_error: Mutex<Option<Notice>>,
}

impl TerminalNotifier {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self {
            color,
            quiet,
            last_error: Mutex::new(None),
        }
    }

    /// Take the most recent error notice, if any.
    pub fn take_error(&self) -> Option<Notice> {
        self.last_error.lock().expect("lock poisoned").take()
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                *self.last_error.lock().expect("lock poisoned") = Some(notice);
            }
            NoticeLevel::Success | NoticeLevel::Info if self.quiet => {}
            NoticeLevel::Success => {
                if self.color {
                    eprintln!("{} {}", "✓".green(), notice.message);
                } else {
                    eprintln!("✓ {}", notice.message);
                }
            }
            NoticeLevel::Info => {
                if self.color {
                    eprintln!("{} {}", notice.title.cyan().bold(), notice.message);
                } else {
                    eprintln!("{}: {}", notice.title, notice.message);
                }
            }
        }
    }
}

// ── Loading spinner ──────────────────────────────────────────────────

/// Spinner shown on stderr while `is_busy` holds for the watched state.
///
/// Returns `None` (and draws nothing) when stderr is not a terminal or
/// output is quiet. Call [`LoadingSpinner::finish`] once the work is done.
pub struct LoadingSpinner {
    done: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl LoadingSpinner {
    pub fn track<T>(
        rx: watch::Receiver<T>,
        is_busy: fn(&T) -> bool,
        message: String,
        quiet: bool,
    ) -> Option<Self>
    where
        T: Send + Sync + 'static,
    {
        if quiet || !io::stderr().is_terminal() {
            return None;
        }
        let (done, done_rx) = oneshot::channel();
        let task = tokio::spawn(follow(rx, is_busy, message, done_rx));
        Some(Self { done, task })
    }

    pub async fn finish(self) {
        let _ = self.done.send(());
        let _ = self.task.await;
    }
}

async fn follow<T>(
    mut rx: watch::Receiver<T>,
    is_busy: fn(&T) -> bool,
    message: String,
    mut done: oneshot::Receiver<()>,
) where
    T: Send + Sync + 'static,
{
    let mut spinner: Option<ProgressBar> = None;
    loop {
        let busy = is_busy(&rx.borrow_and_update());
        spinner = match (busy, spinner.take()) {
            (true, None) => Some(start_spinner(&message)),
            (true, running) => running,
            (false, Some(pb)) => {
                pb.finish_and_clear();
                None
            }
            (false, None) => None,
        };

        tokio::select! {
            biased;
            _ = &mut done => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}

fn start_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
