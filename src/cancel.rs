//! Per-navigation cancellation
//!
//! Each call to `load_content` gets its own token. Starting a newer
//! navigation cancels the previous token, and every view mutation made on
//! behalf of a navigation is guarded by its token, so a superseded request
//! can finish its I/O but never touches the view.

use std::cell::Cell;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;

use futures_util::future::{self, Either};
use tokio::sync::Notify;

struct Inner {
    cancelled: Cell<bool>,
    notify: Notify,
}

/// Single-threaded cancellation token shared between a navigation and its
/// panel initializer
#[derive(Clone)]
pub struct CancellationToken {
    inner: Rc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                cancelled: Cell::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Cancel the token and wake everything waiting on it
    pub fn cancel(&self) {
        if !self.inner.cancelled.replace(true) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        // Registered before the flag check so a cancel in between is not lost.
        let notified = self.inner.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Drive `fut` to completion unless the token is cancelled first
    pub async fn run_until_cancelled<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        if self.is_cancelled() {
            return None;
        }

        let fut = pin!(fut);
        let cancelled = pin!(self.cancelled());

        match future::select(fut, cancelled).await {
            // Completed, but the result is stale if a cancel landed first
            Either::Left((output, _)) if !self.is_cancelled() => Some(output),
            _ => None,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_completes_when_not_cancelled() {
        let token = CancellationToken::new();
        let out = token.run_until_cancelled(async { 42 }).await;
        assert_eq!(out, Some(42));
    }

    #[tokio::test]
    async fn test_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.run_until_cancelled(async { 1 }).await, None);
    }

    #[tokio::test]
    async fn test_cancel_while_pending() {
        let token = CancellationToken::new();
        let (_tx, rx) = oneshot::channel::<u32>();

        let canceller = token.clone();
        let (out, ()) = tokio::join!(token.run_until_cancelled(rx), async move {
            tokio::task::yield_now().await;
            canceller.cancel();
        });

        assert!(out.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_before_poll_wins_over_ready_output() {
        let token = CancellationToken::new();
        let (tx, rx) = oneshot::channel::<u32>();
        tx.send(7).unwrap();

        let fut = token.run_until_cancelled(rx);
        token.cancel();
        assert!(fut.await.is_none());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }
}
