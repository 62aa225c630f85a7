//! Domain layer public interface.
//!
//! This module defines domain-level abstractions that are independent of
//! receiver implementations, protocols, or infrastructure concerns.
//!
//! All domain consumers must import symbols via this module, not by
//! referencing individual files directly.

mod receiver;
mod subscription;

// --- Receiver domain re-exports ---

pub use receiver::{
    //
    RawConnection,
    RawDataPackage,
    RawEvent,
    Receiver,
    ReceiverPtr,
    Teardown,
    TeardownPtr,
};

// --- Subscription facade re-exports ---

pub use subscription::{SubscriptionEvent, SubscriptionHandle};
