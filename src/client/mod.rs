//! Subscription adapter layer.

mod sub_client;

pub use sub_client::{connect, SubClient};
