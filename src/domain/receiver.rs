// src/domain/receiver.rs

//! Receiver domain abstractions.
//!
//! This module defines the contract this crate consumes from the external
//! receiver collaborator. The receiver owns the actual network connection,
//! framing, acknowledgement protocol, heartbeating, and reconnection state
//! machine; this crate only adapts its event stream into a simplified
//! subscription facade.
//!
//! The contract intentionally avoids any reference to concrete protocols,
//! brokers, or client libraries. The in-memory receiver under
//! `src/receiver/` provides the reference semantics used by the test suite.

use crate::{ModuleConfig, RequestConfig, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use tokio::sync::mpsc;

/// One message unit delivered by the receiver.
///
/// A data package carries at least a channel identifier and a payload.
/// The optional `name` field marks protocol-level packages; a package whose
/// name is `"acknowledge"` is an acknowledgement rather than application
/// data.
///
/// The payload is opaque to this layer; receiver implementations typically
/// decode wire JSON directly into this type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RawDataPackage {
    /// Channel the package was published on.
    pub channel: String,

    /// Opaque payload.
    pub data: Value,

    /// Optional protocol-level package name (e.g. `"acknowledge"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Raw event emitted by a receiver connection.
///
/// Events arrive on the connection's inbox in delivery order; the adapter
/// forwards them in the same order with `Data` packages mapped through the
/// configured extractor.
#[derive(Clone, Debug)]
pub enum RawEvent {
    // ---
    /// A data package arrived.
    Data(RawDataPackage),

    /// The connection was lost. Carries the receiver's error description.
    Disconnect(String),

    /// The receiver observed a protocol heartbeat.
    Heartbeat,

    /// The receiver started a reconnection attempt.
    Reconnect,

    /// A reconnection attempt succeeded.
    Reconnected,
}

/// Teardown capability of an established connection.
///
/// Semantics (graceful vs immediate, idempotency) are the receiver's
/// contract; the adapter forwards `disconnect()` calls verbatim and adds
/// nothing of its own.
#[async_trait::async_trait]
pub trait Teardown: Send + Sync {
    /// Tear down the underlying connection.
    async fn disconnect(&self) -> Result<()>;
}

/// Shared teardown pointer (`Arc<dyn Teardown>`); cheap to clone.
pub type TeardownPtr = Arc<dyn Teardown>;

/// An established raw connection, as handed back by a receiver.
///
/// The JS-style `on(event, handler)` surface is rendered as a single ordered
/// event stream: callers (the adapter) drain `events` and react per variant.
/// Dropping the inbox signals the receiver that nobody is listening.
pub struct RawConnection {
    // ---
    /// Inbox of raw events, in delivery order.
    pub events: mpsc::Receiver<RawEvent>,

    /// Teardown delegate for this connection.
    pub teardown: TeardownPtr,
}

/// Receiver collaborator abstraction.
///
/// A `Receiver` establishes connections on behalf of the adapter. It is
/// handed the preprocessed request configuration (connection parameters,
/// normalized `body.channels`) and the preprocessed module configuration
/// (with the acknowledge predicate installed), and resolves to a
/// [`RawConnection`] or fails with [`Error::Connection`].
///
/// Implementations must ensure that:
/// - Events for an established connection are delivered on its inbox in
///   arrival order.
/// - Connect failures are reported through the returned `Result`; no
///   half-open connection is ever handed back.
///
/// This crate never retries a failed connect and never interprets the
/// failure beyond propagating it.
///
/// [`Error::Connection`]: crate::Error::Connection
#[async_trait::async_trait]
pub trait Receiver: Send + Sync {
    // ---
    /// Establish a connection using the given configuration.
    async fn connect(
        &self,
        request: &RequestConfig,
        module: &ModuleConfig,
    ) -> Result<RawConnection>;
}

/// Shared receiver pointer.
///
/// This is an `Arc<dyn Receiver>`, which means:
/// - `.clone()` is cheap (only increments a reference count)
/// - Multiple clones share the same underlying collaborator
/// - Used to erase concrete receiver types behind a stable domain interface.
pub type ReceiverPtr = Arc<dyn Receiver>;
