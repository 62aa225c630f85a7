// src/domain/subscription.rs

//! Subscription facade types returned to callers.

use crate::{Result, TeardownPtr};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Event emitted on a [`SubscriptionHandle`].
///
/// This is the stable, minimal event vocabulary exposed to callers,
/// decoupled from the receiver's raw package format. `Data` events carry the
/// `(channel, data)` pair produced by the configured extractor; lifecycle
/// events mirror the receiver's identically-named events.
#[derive(Clone, Debug)]
pub enum SubscriptionEvent {
    // ---
    /// Application data on a channel.
    Data {
        /// Channel identifier extracted from the raw package.
        channel: String,
        /// Payload extracted from the raw package.
        data: Value,
    },

    /// The underlying connection was lost; carries the receiver's error
    /// description.
    Disconnect(String),

    /// Protocol heartbeat observed by the receiver.
    Heartbeat,

    /// The receiver started a reconnection attempt.
    Reconnect,

    /// A reconnection attempt succeeded.
    Reconnected,
}

/// Handle returned from a successful connect.
///
/// The handle owns no transport resources itself. It drains normalized
/// events from `events` and holds a back-reference to the raw connection's
/// teardown operation, forwarded verbatim by [`disconnect`](Self::disconnect).
///
/// Events preserve the arrival order of the corresponding raw events:
/// forwarding is a direct per-event mapping with no reordering buffer.
///
/// Dropping the handle closes the event inbox, which stops the forwarding
/// task; it does not tear down the connection. Call `disconnect()` for that.
///
/// # Example
///
/// ```no_run
/// # use sub_client::{SubscriptionEvent, ReceiverPtr};
/// # async fn example(receiver: ReceiverPtr) -> sub_client::Result<()> {
/// let mut handle = sub_client::connect(
///     receiver,
///     serde_json::json!({ "channels": ["ch1"] }),
///     None,
/// )
/// .await?;
///
/// while let Some(event) = handle.events.recv().await {
///     if let SubscriptionEvent::Data { channel, data } = event {
///         println!("{channel}: {data}");
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct SubscriptionHandle {
    // ---
    /// Receiver channel for normalized subscription events.
    pub events: mpsc::Receiver<SubscriptionEvent>,

    /// Teardown delegate of the underlying connection.
    teardown: TeardownPtr,

    /// Forwarding task handle.
    ///
    /// Kept so the task isn't silently detached; if a caller-supplied
    /// extractor panics, the panic surfaces here rather than being swallowed.
    _pump: JoinHandle<()>,
}

impl SubscriptionHandle {
    // ---
    pub(crate) fn new(
        events: mpsc::Receiver<SubscriptionEvent>,
        teardown: TeardownPtr,
        pump: JoinHandle<()>,
    ) -> Self {
        Self {
            events,
            teardown,
            _pump: pump,
        }
    }

    /// Tear down the underlying connection.
    ///
    /// Pure delegation to the raw connection's teardown operation, with no
    /// added arguments and no wrapping. Teardown semantics (graceful vs
    /// immediate, idempotency) are the receiver's contract.
    pub async fn disconnect(&self) -> Result<()> {
        self.teardown.disconnect().await
    }
}
