//! Callback subscriptions for in-flight requests.
//!
//! This module lets a caller start a fetch in the background, handing
//! completion over to callbacks and keeping only a cancellable handle.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::HttpError;
use crate::request::RequestBuilder;

/// Unique identifier for a subscribed request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A handle to a pending fetch that can be cancelled.
///
/// Dropping the handle does not cancel the request; only
/// [`cancel`](Self::cancel) does.
pub struct FetchHandle {
    /// The unique ID of this request.
    pub id: RequestId,
    cancel_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl FetchHandle {
    /// Cancel the pending fetch.
    ///
    /// Returns `true` for the one call that claims a still-pending fetch,
    /// `false` if the request already completed or another cancel claimed
    /// it first. After a successful cancel neither subscription callback
    /// runs, even if the fetch had just finished.
    pub fn cancel(&self) -> bool {
        if let Some(tx) = self.cancel_tx.lock().take() {
            // Taking the sender decides the winner; the send only wakes a
            // task that is still parked on the race
            let _ = tx.send(());
            true
        } else {
            false
        }
    }

    /// Check if the fetch is still pending.
    pub fn is_pending(&self) -> bool {
        self.cancel_tx.lock().is_some()
    }
}

impl Clone for FetchHandle {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cancel_tx: self.cancel_tx.clone(),
        }
    }
}

impl std::fmt::Debug for FetchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchHandle")
            .field("id", &self.id)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl RequestBuilder {
    /// Start the fetch in the background and deliver the body to a callback.
    ///
    /// Failures are logged and dropped; use
    /// [`subscribe_with`](Self::subscribe_with) to observe them. The fetch
    /// runs on the ambient tokio runtime, which must exist when this is
    /// called, and the callback is invoked on one of its workers.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let handle = client
    ///     .get("https://api.example.com/feed")
    ///     .subscribe(|body| println!("got {} bytes", body.len()));
    ///
    /// // Later, if the result is no longer wanted:
    /// handle.cancel();
    /// ```
    pub fn subscribe(self, on_success: impl FnOnce(Bytes) + Send + 'static) -> FetchHandle {
        self.subscribe_with(on_success, |err| {
            tracing::debug!(target: "petrel::handle", "Dropping unobserved fetch failure: {}", err);
        })
    }

    /// Start the fetch in the background with success and failure callbacks.
    ///
    /// Exactly one of the callbacks runs, unless the handle is cancelled
    /// first, in which case neither does.
    pub fn subscribe_with(
        self,
        on_success: impl FnOnce(Bytes) + Send + 'static,
        on_failure: impl FnOnce(HttpError) + Send + 'static,
    ) -> FetchHandle {
        let request_id = RequestId::new();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let handle = FetchHandle {
            id: request_id,
            cancel_tx: Arc::new(Mutex::new(Some(cancel_tx))),
        };

        let completion = handle.clone();

        // Race the fetch against the cancel channel
        tokio::spawn(async move {
            tokio::select! {
                result = self.fetch() => {
                    // The side that takes the sender out of the mutex wins;
                    // a claimed cancel suppresses delivery even when the
                    // result arrives in the same poll
                    if completion.cancel_tx.lock().take().is_some() {
                        match result {
                            Ok(body) => {
                                tracing::trace!(
                                    target: "petrel::handle",
                                    "Request {:?} delivered {} bytes",
                                    request_id,
                                    body.len()
                                );
                                on_success(body);
                            }
                            Err(err) => {
                                tracing::trace!(
                                    target: "petrel::handle",
                                    "Request {:?} failed: {}",
                                    request_id,
                                    err
                                );
                                on_failure(err);
                            }
                        }
                    } else {
                        tracing::debug!(
                            target: "petrel::handle",
                            "Request {:?} cancelled, discarding its result",
                            request_id
                        );
                    }
                }
                _ = cancel_rx => {
                    tracing::debug!(
                        target: "petrel::handle",
                        "Request {:?} cancelled before completion",
                        request_id
                    );
                }
            }
        });

        handle
    }
}
