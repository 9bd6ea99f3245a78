//! X-Plane UDP wire protocol codec.
//!
//! X-Plane exposes simulator state and controls over a fixed UDP packet
//! protocol (default peer `127.0.0.1:49000`). Every packet is a 4-byte
//! ASCII tag, one NUL pad byte, and a tag-specific fixed-size payload,
//! zero-padded to an exact total length. Numeric fields are little-endian
//! IEEE-754.
//!
//! | Tag  | Direction | Payload after tag + pad                          | Total |
//! |------|-----------|--------------------------------------------------|-------|
//! | RREF | out       | i32 frequency, i32 slot, dataref (400, NUL-pad)  | 413   |
//! | RREF | in        | k × (i32 slot, f32 value)                        | 5+8k  |
//! | DREF | out       | f32 value, dataref (500, NUL-pad)                | 509   |
//! | CMND | out       | command (500, NUL-pad)                           | 505   |
//! | VEHS | out       | i32 aircraft, f64 lat/lon/elev, f32 hdg/pitch/roll | 45  |
//! | RPOS | out       | ASCII decimal frequency (10, NUL-pad)            | 15    |
//! | RPOS | in        | f64 × 3, f32 × 10                                | 69    |
//!
//! This crate does no I/O; it only translates between typed values and the
//! byte layouts above. The companion `xplane-connect-client` crate owns the
//! sockets, subscription state, and background listener.

#![deny(static_mut_refs)]

pub mod codec;
pub mod error;
pub mod pose;

pub use codec::{
    CMND_LEN, DREF_IDENT_FIELD, DREF_WRITE_LEN, HEADER_LEN, RPOS_FREQ_FIELD, RPOS_REPLY_LEN,
    RPOS_REQUEST_LEN, RREF_DATAREF_FIELD, RREF_RECORD_LEN, RREF_REQUEST_LEN, RrefRecord, TAG_CMND,
    TAG_DREF, TAG_RPOS, TAG_RREF, TAG_VEHS, VEHS_LEN, decode_rpos, decode_rref_records,
    encode_cmnd, encode_dref_write, encode_rpos_request, encode_rref_request, encode_vehs,
    packet_tag,
};
pub use error::{EncodeError, ProtocolError};
pub use pose::{PoseCommand, PoseSnapshot};

/// Default address the simulator listens on, configurable in its network
/// settings.
pub const DEFAULT_XPLANE_PORT: u16 = 49000;
