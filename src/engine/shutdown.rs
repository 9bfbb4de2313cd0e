// src/engine/shutdown.rs

//! Shutdown request shared between a supervisor and whoever may stop it.
//!
//! The flag lives in a `watch` channel so that it can be read synchronously
//! at every decision point and also awaited inside the child wait and the
//! restart-interval wait. It only ever moves from `false` to `true`.

use std::future;
use std::sync::Arc;

use tokio::sync::watch;

/// Cloneable trigger owning the monotonic shutdown flag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request shutdown.
    ///
    /// Returns `true` only for the call that flipped the flag; repeated
    /// requests are harmless no-ops.
    pub fn request(&self) -> bool {
        self.tx.send_if_modified(|requested| {
            if *requested {
                false
            } else {
                *requested = true;
                true
            }
        })
    }

    pub fn is_requested(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side used by the blocking steps of the supervisor loop.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown has been requested (immediately if it already was).
    pub async fn requested(&mut self) {
        if self.rx.wait_for(|requested| *requested).await.is_err() {
            // Every trigger is gone, so a request can no longer arrive.
            future::pending::<()>().await;
        }
    }
}
