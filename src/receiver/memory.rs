// src/receiver/memory.rs

//! In-memory receiver implementation.
//!
//! This file contains a scripted, in-process implementation of the domain
//! [`Receiver`] contract. It is the **reference implementation** of receiver
//! semantics for this crate and the collaborator double used by the test
//! suite: tests drive it from the outside (inject events, fail connects)
//! and observe what the adapter handed it.
//!
//! ## Semantics
//!
//! - `connect()` records the preprocessed request and module configuration
//!   it was given, then hands back a connection whose inbox is fed by
//!   [`MemoryReceiverHandle::emit`].
//! - Events are delivered to a connection's inbox in emit order.
//! - `disconnect()` on the returned teardown only increments a counter;
//!   there is no transport to tear down.
//!
//! ## Non-Goals
//!
//! - Wire protocols, framing, acknowledgements
//! - Heartbeat timing or reconnection policy
//! - Network behavior or failure simulation beyond scripted connect failure

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;

use crate::{
    // ---
    Error,
    ModuleConfig,
    RawConnection,
    RawEvent,
    Receiver,
    ReceiverPtr,
    RequestConfig,
    Result,
    Teardown,
};

/// Acquire a mutex guard, intentionally ignoring poisoning.
///
/// The protected state is best-effort bookkeeping (recorded connects,
/// scripted failures); there are no invariants spanning multiple fields, so
/// a panic in another task holding the lock leaves nothing worth rescuing.
fn lock_ignore_poison<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // ---
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// One recorded `connect()` call: the configuration exactly as the adapter
/// handed it to the receiver (i.e. after preprocessing).
#[derive(Clone, Debug)]
pub struct ConnectRecord {
    /// Request config seen by the receiver.
    pub request: RequestConfig,
    /// Module config seen by the receiver.
    pub module: ModuleConfig,
}

struct Shared {
    // ---
    /// Scripted failure for the next connect attempt.
    fail_next: Mutex<Option<String>>,

    /// Every connect call observed, in order.
    connects: Mutex<Vec<ConnectRecord>>,

    /// Event senders for established connections, in connect order.
    senders: Mutex<Vec<mpsc::Sender<RawEvent>>>,

    /// Number of teardown `disconnect()` invocations across all connections.
    disconnects: AtomicUsize,
}

/// In-memory receiver.
struct MemoryReceiver {
    shared: Arc<Shared>,
}

struct MemoryTeardown {
    shared: Arc<Shared>,
}

#[async_trait::async_trait]
impl Teardown for MemoryTeardown {
    async fn disconnect(&self) -> Result<()> {
        // ---
        self.shared.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Receiver for MemoryReceiver {
    // ---
    async fn connect(
        &self,
        request: &RequestConfig,
        module: &ModuleConfig,
    ) -> Result<RawConnection> {
        // ---
        if let Some(reason) = lock_ignore_poison(&self.shared.fail_next).take() {
            return Err(Error::Connection(reason));
        }

        lock_ignore_poison(&self.shared.connects).push(ConnectRecord {
            request: request.clone(),
            module: module.clone(),
        });

        let (tx, rx) = mpsc::channel(16);
        lock_ignore_poison(&self.shared.senders).push(tx);

        Ok(RawConnection {
            events: rx,
            teardown: Arc::new(MemoryTeardown {
                shared: self.shared.clone(),
            }),
        })
    }
}

/// Scripting and inspection handle for a memory receiver.
///
/// Cheap to clone (internally `Arc`-backed).
#[derive(Clone)]
pub struct MemoryReceiverHandle {
    shared: Arc<Shared>,
}

impl MemoryReceiverHandle {
    // ---
    /// Make the next `connect()` attempt fail with the given reason.
    pub fn fail_next_connect(&self, reason: impl Into<String>) {
        *lock_ignore_poison(&self.shared.fail_next) = Some(reason.into());
    }

    /// Number of successful `connect()` calls observed so far.
    pub fn connect_count(&self) -> usize {
        lock_ignore_poison(&self.shared.connects).len()
    }

    /// The most recent recorded connect call, if any.
    pub fn last_connect(&self) -> Option<ConnectRecord> {
        lock_ignore_poison(&self.shared.connects).last().cloned()
    }

    /// Number of `disconnect()` calls across all handed-out teardowns.
    pub fn disconnect_count(&self) -> usize {
        self.shared.disconnects.load(Ordering::SeqCst)
    }

    /// Deliver a raw event to the most recently established connection.
    ///
    /// Returns `false` when there is no connection or its inbox was dropped.
    pub async fn emit(&self, event: RawEvent) -> bool {
        // ---
        // Clone the sender out of the lock; sending awaits.
        let sender = lock_ignore_poison(&self.shared.senders).last().cloned();

        match sender {
            Some(sender) => sender.send(event).await.is_ok(),
            None => false,
        }
    }
}

/// Create a new in-memory receiver and its scripting handle.
///
/// This receiver is always available and requires no external resources.
pub fn create_memory_receiver() -> (ReceiverPtr, MemoryReceiverHandle) {
    // ---
    let shared = Arc::new(Shared {
        fail_next: Mutex::new(None),
        connects: Mutex::new(Vec::new()),
        senders: Mutex::new(Vec::new()),
        disconnects: AtomicUsize::new(0),
    });

    let receiver = MemoryReceiver {
        shared: shared.clone(),
    };

    (Arc::new(receiver), MemoryReceiverHandle { shared })
}
