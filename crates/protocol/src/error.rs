//! Typed errors for packet encoding and decoding.

use thiserror::Error;

/// A request could not be encoded. Raised before any network I/O happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The dataref or command string does not fit its fixed wire field.
    ///
    /// X-Plane relies on the fixed field width plus NUL termination, so the
    /// identifier must leave at least one trailing zero byte (`max` is the
    /// field width minus one).
    #[error("identifier is {len} bytes but the wire field allows at most {max}")]
    IdentifierTooLong { len: usize, max: usize },

    /// The identifier contains an interior NUL byte, which the simulator
    /// would interpret as the end of the string.
    #[error("identifier contains an embedded NUL byte at offset {offset}")]
    EmbeddedNul { offset: usize },
}

/// A received datagram does not conform to the X-Plane wire protocol.
///
/// These are never silently recovered: they indicate either an incompatible
/// simulator build or a bug in request construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The 4-byte packet tag is not the one expected in this context.
    #[error("unexpected packet tag {got:?} (expected {expected:?})")]
    UnexpectedTag { expected: [u8; 4], got: [u8; 4] },

    /// The datagram is too short to carry a tag and NUL pad.
    #[error("datagram of {len} bytes is too short for a packet header")]
    Truncated { len: usize },

    /// An inbound RREF payload is not a whole number of 8-byte records.
    #[error("RREF payload of {len} bytes is not a multiple of 8")]
    MisalignedPayload { len: usize },

    /// An inbound record carries a slot index with no registered dataref.
    #[error("received RREF record for unknown slot index {slot}")]
    UnknownSlot { slot: i32 },

    /// A one-shot reply answered a different slot than the one requested.
    #[error("reply slot index {got} does not match requested slot {expected}")]
    SlotMismatch { expected: i32, got: i32 },

    /// A fixed-size packet arrived with the wrong total length.
    #[error("packet of {got} bytes where exactly {expected} were expected")]
    WrongLength { expected: usize, got: usize },
}
