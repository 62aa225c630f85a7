use thiserror::Error;

/// Errors that can occur while establishing a subscription
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied configuration failed preprocessing
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The receiver collaborator failed to establish a connection.
    ///
    /// Produced by `Receiver::connect` implementations and propagated
    /// verbatim by the adapter (no translation, no retry).
    #[error("receiver connection failed: {0}")]
    Connection(String),
}

/// Result type alias for subscription operations
pub type Result<T> = std::result::Result<T, Error>;
