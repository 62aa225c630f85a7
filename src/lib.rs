//! Simplified publish/subscribe client over a pluggable receiver transport
//!
//! This library is a thin adaptation layer: given connection parameters and
//! optional behavioral hooks, it produces a subscription handle that emits
//! normalized `(channel, data)` events plus lifecycle notifications
//! (disconnect, heartbeat, reconnect, reconnected). The actual network
//! connection, framing, acknowledgement protocol, heartbeating, and
//! reconnection state machine belong to the receiver collaborator behind
//! the [`Receiver`] trait; this layer never implements transport logic.
//!

// Import all sub modules once...
mod client;
mod domain;
mod receiver;

mod config;

mod error;
mod macros;

#[allow(unused_imports)]
pub(crate) use macros::{log_debug, log_error, log_info, log_warn};

// Re-export main types
pub use client::{connect, SubClient};

pub use config::{
    //
    preprocess_module_config,
    preprocess_request_config,
    AcknowledgeFilter,
    DataExtractor,
    ExtractedData,
    ModuleConfig,
    RequestConfig,
};

pub use error::{Error, Result};

pub use receiver::{create_memory_receiver, ConnectRecord, MemoryReceiverHandle};

// --- public re-exports
pub use domain::{
    //
    RawConnection,
    RawDataPackage,
    RawEvent,
    Receiver,
    ReceiverPtr,
    SubscriptionEvent,
    SubscriptionHandle,
    Teardown,
    TeardownPtr,
};
