//! Client error type wrapping the protocol-level error kinds.

use std::time::Duration;

use thiserror::Error;
use xplane_connect_protocol::{EncodeError, ProtocolError};

/// Anything that can go wrong talking to the simulator.
///
/// There is no retry policy behind any of these: UDP loss is invisible to
/// the protocol layer and shows up only as a stale
/// [`ObservedValue`](crate::ObservedValue).
#[derive(Debug, Error)]
pub enum ClientError {
    /// An identifier did not fit its fixed wire field. Raised before any
    /// network I/O.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A received datagram violated the wire protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Socket creation, bind, send, or receive failed at the OS level.
    #[error("transport: {0}")]
    Transport(#[from] std::io::Error),

    /// A one-shot query got no reply within the configured timeout.
    #[error("no reply from the simulator within {0:?}")]
    QueryTimeout(Duration),
}

/// Specialized `Result` for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
