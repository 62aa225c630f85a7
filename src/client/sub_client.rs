// src/client/sub_client.rs

//! Subscription adapter implementation.
//!
//! This module contains the core [`SubClient`] type, which normalizes
//! caller-supplied configuration, opens a connection through the receiver
//! collaborator, and wraps the resulting raw event source in a re-emitting
//! facade with a stable, minimal event vocabulary.
//!
//! # Architecture
//!
//! `connect()` consumes the adapter, which makes the one-connect-attempt-
//! per-instance lifecycle a compile-time property rather than a runtime
//! check. After the receiver hands back a raw connection, a forwarding task
//! drains its inbox: `Data` packages go through the configured extractor and
//! everything is re-emitted on the facade channel in arrival order. No
//! batching, reordering, or filtering happens at this layer.
//!
//! # Concurrency
//!
//! The forwarding task is the only thing spawned here. It performs a direct,
//! synchronous per-event mapping, so facade events preserve raw-event order.
//! The adapter performs no polling, timeouts, or cancellation of its own;
//! teardown is the caller's job via [`SubscriptionHandle::disconnect`].

use tokio::sync::mpsc;

use crate::config::{self, default_extractor};
use crate::{
    // ---
    log_debug,
    log_info,
    ModuleConfig,
    RawEvent,
    Receiver as _,
    ReceiverPtr,
    RequestConfig,
    Result,
    SubscriptionEvent,
    SubscriptionHandle,
};

/// Capacity of the facade event channel.
///
/// Matches the receiver-side inbox depth used by the reference receiver; a
/// slow consumer applies backpressure to the forwarding task, never drops.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Single-use subscription adapter.
///
/// Stores the caller's configuration and the receiver collaborator, and
/// turns them into a [`SubscriptionHandle`] via [`connect`](Self::connect).
/// For the common case, the free function [`crate::connect`] builds and
/// consumes an adapter in one call.
pub struct SubClient {
    // ---
    receiver: ReceiverPtr,
    request: RequestConfig,
    module: ModuleConfig,
}

impl SubClient {
    // ---
    /// Create an adapter with an explicitly provided receiver.
    ///
    /// `module` defaults to an empty configuration when omitted. The
    /// configuration is stored as-is; preprocessing happens in `connect()`.
    pub fn with_receiver(
        receiver: ReceiverPtr,
        request: RequestConfig,
        module: Option<ModuleConfig>,
    ) -> Self {
        // ---
        Self {
            receiver,
            request,
            module: module.unwrap_or_default(),
        }
    }

    /// Connect through the receiver and return the subscription facade.
    ///
    /// Preprocesses both configurations (in place, see
    /// [`preprocess_request_config`](crate::preprocess_request_config)),
    /// then delegates to the
    /// receiver. Preprocessing errors fail the returned future before the
    /// receiver is ever invoked; receiver failures propagate verbatim with
    /// no retry and no translation.
    ///
    /// The caller always receives either a fully wired handle or an error,
    /// never a half-initialized handle.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] - the request config failed normalization
    /// - [`Error::Connection`] - the receiver could not establish the
    ///   connection
    ///
    /// # Panics
    ///
    /// Never panics itself, but a panic inside a caller-supplied data
    /// extractor is not caught: the forwarding task dies with it, the
    /// facade's event channel closes, and the panic is observable through
    /// the handle's retained task handle. It is not silently swallowed.
    ///
    /// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
    /// [`Error::Connection`]: crate::Error::Connection
    pub async fn connect(mut self) -> Result<SubscriptionHandle> {
        // ---
        config::preprocess_request_config(&mut self.request)?;
        config::preprocess_module_config(&mut self.module);

        let raw = self.receiver.connect(&self.request, &self.module).await?;

        log_info!("receiver connection established");

        // Preprocessing guarantees the extractor is present; the fallback
        // keeps this path panic-free regardless.
        let extractor = self
            .module
            .data_extractor
            .clone()
            .unwrap_or_else(default_extractor);

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let mut events = raw.events;
        let pump = tokio::spawn(async move {
            // ---
            while let Some(event) = events.recv().await {
                let out = match event {
                    RawEvent::Data(package) => {
                        let extracted = extractor(&package);
                        SubscriptionEvent::Data {
                            channel: extracted.channel,
                            data: extracted.data,
                        }
                    }
                    RawEvent::Disconnect(reason) => SubscriptionEvent::Disconnect(reason),
                    RawEvent::Heartbeat => SubscriptionEvent::Heartbeat,
                    RawEvent::Reconnect => SubscriptionEvent::Reconnect,
                    RawEvent::Reconnected => SubscriptionEvent::Reconnected,
                };

                if tx.send(out).await.is_err() {
                    // Subscription handle dropped; stop forwarding.
                    log_debug!("subscription handle dropped, stopping event forwarding");
                    break;
                }
            }

            log_debug!("raw connection event stream ended");
        });

        Ok(SubscriptionHandle::new(rx, raw.teardown, pump))
    }
}

/// Connect through `receiver` and return a subscription handle.
///
/// Convenience wrapper that builds a single-use [`SubClient`] and runs its
/// [`connect`](SubClient::connect). See that method for error semantics.
pub async fn connect(
    receiver: ReceiverPtr,
    request: RequestConfig,
    module: Option<ModuleConfig>,
) -> Result<SubscriptionHandle> {
    // ---
    SubClient::with_receiver(receiver, request, module)
        .connect()
        .await
}
