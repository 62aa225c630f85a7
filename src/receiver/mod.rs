//! Receiver implementations.
//!
//! This module provides concrete implementations of the domain-level
//! `Receiver` trait, exposed only through constructor functions.
//!
//! Domain code must not depend on receiver-specific types.

mod memory;

pub use memory::{create_memory_receiver, ConnectRecord, MemoryReceiverHandle};
