//! Encoders and decoders for the fixed-layout X-Plane UDP packets.
//!
//! Every packet starts with a 4-byte ASCII tag and one NUL pad byte. The
//! remainder is a tag-specific payload, zero-padded to an exact total
//! length. All multi-byte numeric fields are little-endian.

use crate::error::{EncodeError, ProtocolError};
use crate::pose::PoseSnapshot;

/// Subscribe / request a dataref stream.
pub const TAG_RREF: [u8; 4] = *b"RREF";
/// Write a dataref value.
pub const TAG_DREF: [u8; 4] = *b"DREF";
/// Trigger a simulator command.
pub const TAG_CMND: [u8; 4] = *b"CMND";
/// Inject an aircraft pose.
pub const TAG_VEHS: [u8; 4] = *b"VEHS";
/// Subscribe to the pose stream.
pub const TAG_RPOS: [u8; 4] = *b"RPOS";

/// Tag plus one NUL pad byte.
pub const HEADER_LEN: usize = 5;

/// Dataref string field width in an RREF request.
pub const RREF_DATAREF_FIELD: usize = 400;
/// RREF request: header + i32 frequency + i32 slot + dataref field.
pub const RREF_REQUEST_LEN: usize = HEADER_LEN + 4 + 4 + RREF_DATAREF_FIELD;
/// One inbound RREF record: i32 slot + f32 value.
pub const RREF_RECORD_LEN: usize = 8;

/// Identifier field width in DREF and CMND packets.
pub const DREF_IDENT_FIELD: usize = 500;
/// DREF write: header + f32 value + dataref field.
pub const DREF_WRITE_LEN: usize = HEADER_LEN + 4 + DREF_IDENT_FIELD;
/// CMND: header + command field.
pub const CMND_LEN: usize = HEADER_LEN + DREF_IDENT_FIELD;

/// VEHS: header + i32 aircraft + f64 lat/lon/elev + f32 heading/pitch/roll.
pub const VEHS_LEN: usize = HEADER_LEN + 4 + 3 * 8 + 3 * 4;

/// Frequency field width in an RPOS request (ASCII decimal).
pub const RPOS_FREQ_FIELD: usize = 10;
/// RPOS request: header + ASCII frequency field.
pub const RPOS_REQUEST_LEN: usize = HEADER_LEN + RPOS_FREQ_FIELD;
/// RPOS reply: header + f64 × 3 + f32 × 10.
pub const RPOS_REPLY_LEN: usize = HEADER_LEN + 3 * 8 + 10 * 4;

// ── RPOS reply byte offsets ──────────────────────────────────────────────────
const OFF_RPOS_LON: usize = 5; // f64 degrees
const OFF_RPOS_LAT: usize = 13; // f64 degrees
const OFF_RPOS_ELEV: usize = 21; // f64 m MSL
const OFF_RPOS_AGL: usize = 29; // f32 m above terrain
const OFF_RPOS_PITCH: usize = 33; // f32 degrees
const OFF_RPOS_HEADING: usize = 37; // f32 degrees true
const OFF_RPOS_ROLL: usize = 41; // f32 degrees
const OFF_RPOS_VX: usize = 45; // f32 m/s east
const OFF_RPOS_VY: usize = 49; // f32 m/s up
const OFF_RPOS_VZ: usize = 53; // f32 m/s south
const OFF_RPOS_P: usize = 57; // f32 rad/s roll rate
const OFF_RPOS_Q: usize = 61; // f32 rad/s pitch rate
const OFF_RPOS_R: usize = 65; // f32 rad/s yaw rate

/// One slot/value pair from an inbound RREF data packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrefRecord {
    /// Client-assigned slot index echoed back by the simulator.
    pub slot: i32,
    /// Current dataref value, single precision on the wire.
    pub value: f32,
}

fn check_identifier(identifier: &str, field_width: usize) -> Result<(), EncodeError> {
    let bytes = identifier.as_bytes();
    if let Some(offset) = bytes.iter().position(|&b| b == 0) {
        return Err(EncodeError::EmbeddedNul { offset });
    }
    // The simulator finds the end of the string by NUL termination, so the
    // identifier must leave at least one zero byte inside the field.
    if bytes.len() >= field_width {
        return Err(EncodeError::IdentifierTooLong {
            len: bytes.len(),
            max: field_width - 1,
        });
    }
    Ok(())
}

/// Encode an RREF subscribe/unsubscribe request.
///
/// A `freq_hz` of 0 cancels the stream for this slot.
///
/// # Errors
/// [`EncodeError`] if the dataref does not fit the 400-byte wire field.
pub fn encode_rref_request(
    dataref: &str,
    slot: i32,
    freq_hz: i32,
) -> Result<[u8; RREF_REQUEST_LEN], EncodeError> {
    check_identifier(dataref, RREF_DATAREF_FIELD)?;
    let mut buf = [0u8; RREF_REQUEST_LEN];
    buf[..4].copy_from_slice(&TAG_RREF);
    buf[5..9].copy_from_slice(&freq_hz.to_le_bytes());
    buf[9..13].copy_from_slice(&slot.to_le_bytes());
    buf[13..13 + dataref.len()].copy_from_slice(dataref.as_bytes());
    Ok(buf)
}

/// Encode a DREF value write.
///
/// # Errors
/// [`EncodeError`] if the dataref does not fit the 500-byte wire field.
pub fn encode_dref_write(dataref: &str, value: f32) -> Result<[u8; DREF_WRITE_LEN], EncodeError> {
    check_identifier(dataref, DREF_IDENT_FIELD)?;
    let mut buf = [0u8; DREF_WRITE_LEN];
    buf[..4].copy_from_slice(&TAG_DREF);
    buf[5..9].copy_from_slice(&value.to_le_bytes());
    buf[9..9 + dataref.len()].copy_from_slice(dataref.as_bytes());
    Ok(buf)
}

/// Encode a CMND command trigger.
///
/// # Errors
/// [`EncodeError`] if the command does not fit the 500-byte wire field.
pub fn encode_cmnd(command: &str) -> Result<[u8; CMND_LEN], EncodeError> {
    check_identifier(command, DREF_IDENT_FIELD)?;
    let mut buf = [0u8; CMND_LEN];
    buf[..4].copy_from_slice(&TAG_CMND);
    buf[5..5 + command.len()].copy_from_slice(command.as_bytes());
    Ok(buf)
}

/// Encode a VEHS pose injection for the given aircraft index (0 = user).
pub fn encode_vehs(
    aircraft: i32,
    latitude_deg: f64,
    longitude_deg: f64,
    elevation_msl_m: f64,
    true_heading_deg: f32,
    pitch_deg: f32,
    roll_deg: f32,
) -> [u8; VEHS_LEN] {
    let mut buf = [0u8; VEHS_LEN];
    buf[..4].copy_from_slice(&TAG_VEHS);
    buf[5..9].copy_from_slice(&aircraft.to_le_bytes());
    buf[9..17].copy_from_slice(&latitude_deg.to_le_bytes());
    buf[17..25].copy_from_slice(&longitude_deg.to_le_bytes());
    buf[25..33].copy_from_slice(&elevation_msl_m.to_le_bytes());
    buf[33..37].copy_from_slice(&true_heading_deg.to_le_bytes());
    buf[37..41].copy_from_slice(&pitch_deg.to_le_bytes());
    buf[41..45].copy_from_slice(&roll_deg.to_le_bytes());
    buf
}

/// Encode an RPOS stream request. The frequency travels as an ASCII decimal
/// string; `0` cancels the stream.
pub fn encode_rpos_request(freq_hz: u32) -> [u8; RPOS_REQUEST_LEN] {
    let mut buf = [0u8; RPOS_REQUEST_LEN];
    buf[..4].copy_from_slice(&TAG_RPOS);
    let ascii = freq_hz.to_string();
    // u32 is at most 10 decimal digits, which is exactly the field width.
    buf[5..5 + ascii.len()].copy_from_slice(ascii.as_bytes());
    buf
}

/// Return the 4-byte tag of a datagram, if it is long enough to carry one.
pub fn packet_tag(datagram: &[u8]) -> Option<[u8; 4]> {
    datagram.get(..4).and_then(|b| b.try_into().ok())
}

fn check_tag(datagram: &[u8], expected: [u8; 4]) -> Result<(), ProtocolError> {
    let got = packet_tag(datagram).ok_or(ProtocolError::Truncated {
        len: datagram.len(),
    })?;
    if got != expected {
        return Err(ProtocolError::UnexpectedTag { expected, got });
    }
    Ok(())
}

/// Decode an inbound RREF data packet into its slot/value records.
///
/// # Errors
/// [`ProtocolError`] if the tag is not `RREF` or the payload is not a whole
/// number of 8-byte records.
pub fn decode_rref_records(datagram: &[u8]) -> Result<Vec<RrefRecord>, ProtocolError> {
    check_tag(datagram, TAG_RREF)?;
    let payload = datagram.get(HEADER_LEN..).ok_or(ProtocolError::Truncated {
        len: datagram.len(),
    })?;
    if !payload.len().is_multiple_of(RREF_RECORD_LEN) {
        return Err(ProtocolError::MisalignedPayload { len: payload.len() });
    }
    let mut records = Vec::with_capacity(payload.len() / RREF_RECORD_LEN);
    for chunk in payload.chunks_exact(RREF_RECORD_LEN) {
        if let (Some(slot), Some(value)) = (read_i32_le(chunk, 0), read_f32_le(chunk, 4)) {
            records.push(RrefRecord { slot, value });
        }
    }
    Ok(records)
}

/// Decode an inbound 69-byte RPOS pose packet.
///
/// # Errors
/// [`ProtocolError`] if the tag is not `RPOS` or the length is wrong.
pub fn decode_rpos(datagram: &[u8]) -> Result<PoseSnapshot, ProtocolError> {
    check_tag(datagram, TAG_RPOS)?;
    if datagram.len() != RPOS_REPLY_LEN {
        return Err(ProtocolError::WrongLength {
            expected: RPOS_REPLY_LEN,
            got: datagram.len(),
        });
    }
    Ok(PoseSnapshot {
        latitude_deg: read_f64_le(datagram, OFF_RPOS_LAT).unwrap_or(0.0),
        longitude_deg: read_f64_le(datagram, OFF_RPOS_LON).unwrap_or(0.0),
        elevation_msl_m: read_f64_le(datagram, OFF_RPOS_ELEV).unwrap_or(0.0),
        height_agl_m: read_f32_le(datagram, OFF_RPOS_AGL).unwrap_or(0.0),
        pitch_deg: read_f32_le(datagram, OFF_RPOS_PITCH).unwrap_or(0.0),
        true_heading_deg: read_f32_le(datagram, OFF_RPOS_HEADING).unwrap_or(0.0),
        roll_deg: read_f32_le(datagram, OFF_RPOS_ROLL).unwrap_or(0.0),
        vx_mps: read_f32_le(datagram, OFF_RPOS_VX).unwrap_or(0.0),
        vy_mps: read_f32_le(datagram, OFF_RPOS_VY).unwrap_or(0.0),
        vz_mps: read_f32_le(datagram, OFF_RPOS_VZ).unwrap_or(0.0),
        roll_rate_rps: read_f32_le(datagram, OFF_RPOS_P).unwrap_or(0.0),
        pitch_rate_rps: read_f32_le(datagram, OFF_RPOS_Q).unwrap_or(0.0),
        yaw_rate_rps: read_f32_le(datagram, OFF_RPOS_R).unwrap_or(0.0),
    })
}

fn read_i32_le(data: &[u8], offset: usize) -> Option<i32> {
    data.get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(i32::from_le_bytes)
}

fn read_f32_le(data: &[u8], offset: usize) -> Option<f32> {
    data.get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(f32::from_le_bytes)
}

fn read_f64_le(data: &[u8], offset: usize) -> Option<f64> {
    data.get(offset..offset + 8)
        .and_then(|b| b.try_into().ok())
        .map(f64::from_le_bytes)
}
