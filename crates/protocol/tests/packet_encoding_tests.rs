//! Integration tests for the `xplane-connect-protocol` crate.
//!
//! Verifies exact byte layouts of all outbound packet types and the decode
//! contracts for inbound RREF and RPOS datagrams.

use xplane_connect_protocol::{
    CMND_LEN, DREF_WRITE_LEN, EncodeError, ProtocolError, RPOS_REPLY_LEN, RPOS_REQUEST_LEN,
    RREF_REQUEST_LEN, RrefRecord, VEHS_LEN, decode_rpos, decode_rref_records, encode_cmnd,
    encode_dref_write, encode_rpos_request, encode_rref_request, encode_vehs, packet_tag,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Build a synthetic inbound RREF data packet from slot/value pairs, the way
/// the simulator streams them.
fn make_rref_data(records: &[(i32, f32)]) -> Vec<u8> {
    let mut data = vec![0u8; 5 + 8 * records.len()];
    data[..4].copy_from_slice(b"RREF");
    for (i, (slot, value)) in records.iter().enumerate() {
        let off = 5 + i * 8;
        data[off..off + 4].copy_from_slice(&slot.to_le_bytes());
        data[off + 4..off + 8].copy_from_slice(&value.to_le_bytes());
    }
    data
}

/// Build a synthetic 69-byte RPOS reply in the simulator's field order:
/// lon, lat, elev (f64), then AGL, pitch, heading, roll, vx, vy, vz,
/// p, q, r (f32).
fn make_rpos_reply(doubles: [f64; 3], floats: [f32; 10]) -> Vec<u8> {
    let mut data = vec![0u8; RPOS_REPLY_LEN];
    data[..4].copy_from_slice(b"RPOS");
    for (i, d) in doubles.iter().enumerate() {
        let off = 5 + i * 8;
        data[off..off + 8].copy_from_slice(&d.to_le_bytes());
    }
    for (i, f) in floats.iter().enumerate() {
        let off = 29 + i * 4;
        data[off..off + 4].copy_from_slice(&f.to_le_bytes());
    }
    data
}

// ── RREF request encoding ────────────────────────────────────────────────────

#[test]
fn rref_request_is_exactly_413_bytes() -> TestResult {
    let buf = encode_rref_request("sim/flightmodel/position/phi", 1, 10)?;
    assert_eq!(buf.len(), RREF_REQUEST_LEN);
    assert_eq!(RREF_REQUEST_LEN, 413);
    Ok(())
}

#[test]
fn rref_request_field_order_is_freq_then_slot() -> TestResult {
    let buf = encode_rref_request("sim/x", 7, 100)?;
    assert_eq!(i32::from_le_bytes(buf[5..9].try_into()?), 100);
    assert_eq!(i32::from_le_bytes(buf[9..13].try_into()?), 7);
    Ok(())
}

#[test]
fn rref_request_pads_dataref_with_zeros() -> TestResult {
    let dataref = "sim/cockpit2/controls/brake_fan_on";
    let buf = encode_rref_request(dataref, 2, 5)?;
    assert_eq!(&buf[13..13 + dataref.len()], dataref.as_bytes());
    assert!(buf[13 + dataref.len()..].iter().all(|&b| b == 0));
    Ok(())
}

#[test]
fn rref_request_accepts_399_byte_dataref() -> TestResult {
    let dataref = "x".repeat(399);
    let buf = encode_rref_request(&dataref, 1, 1)?;
    assert_eq!(buf.len(), RREF_REQUEST_LEN);
    // The field is 400 wide, so exactly one trailing NUL remains.
    assert_eq!(buf[412], 0);
    Ok(())
}

#[test]
fn rref_request_rejects_400_byte_dataref() {
    let dataref = "x".repeat(400);
    assert_eq!(
        encode_rref_request(&dataref, 1, 1),
        Err(EncodeError::IdentifierTooLong { len: 400, max: 399 })
    );
}

// ── DREF / CMND encoding ─────────────────────────────────────────────────────

#[test]
fn dref_write_is_exactly_509_bytes() -> TestResult {
    let buf = encode_dref_write("sim/cockpit/electrical/landing_lights_on", 1.0)?;
    assert_eq!(buf.len(), DREF_WRITE_LEN);
    assert_eq!(DREF_WRITE_LEN, 509);
    Ok(())
}

#[test]
fn dref_write_layout() -> TestResult {
    let dataref = "sim/cockpit2/controls/parking_brake_ratio";
    let buf = encode_dref_write(dataref, 0.75)?;
    assert_eq!(&buf[..4], b"DREF");
    assert_eq!(buf[4], 0);
    let value = f32::from_le_bytes(buf[5..9].try_into()?);
    assert!((value - 0.75).abs() < f32::EPSILON);
    assert_eq!(&buf[9..9 + dataref.len()], dataref.as_bytes());
    assert!(buf[9 + dataref.len()..].iter().all(|&b| b == 0));
    Ok(())
}

#[test]
fn dref_write_accepts_499_byte_dataref() -> TestResult {
    let dataref = "y".repeat(499);
    let buf = encode_dref_write(&dataref, 0.0)?;
    assert_eq!(buf.len(), DREF_WRITE_LEN);
    Ok(())
}

#[test]
fn dref_write_rejects_500_byte_dataref() {
    let dataref = "y".repeat(500);
    assert_eq!(
        encode_dref_write(&dataref, 0.0),
        Err(EncodeError::IdentifierTooLong { len: 500, max: 499 })
    );
}

#[test]
fn cmnd_is_exactly_505_bytes() -> TestResult {
    let buf = encode_cmnd("sim/operation/screenshot")?;
    assert_eq!(buf.len(), CMND_LEN);
    assert_eq!(CMND_LEN, 505);
    assert_eq!(&buf[..4], b"CMND");
    assert_eq!(&buf[5..29], b"sim/operation/screenshot");
    assert!(buf[29..].iter().all(|&b| b == 0));
    Ok(())
}

#[test]
fn cmnd_rejects_overlong_command() {
    let command = "z".repeat(501);
    assert!(matches!(
        encode_cmnd(&command),
        Err(EncodeError::IdentifierTooLong { len: 501, max: 499 })
    ));
}

// ── VEHS / RPOS request encoding ─────────────────────────────────────────────

#[test]
fn vehs_is_exactly_45_bytes_with_correct_layout() -> TestResult {
    let buf = encode_vehs(
        0,
        37.458194732666016,
        -122.11215209960938,
        2.239990472793579,
        321.83612060546875,
        -1.5,
        2.5,
    );
    assert_eq!(buf.len(), VEHS_LEN);
    assert_eq!(VEHS_LEN, 45);
    assert_eq!(&buf[..4], b"VEHS");
    assert_eq!(i32::from_le_bytes(buf[5..9].try_into()?), 0);
    assert_eq!(
        f64::from_le_bytes(buf[9..17].try_into()?),
        37.458194732666016
    );
    assert_eq!(
        f64::from_le_bytes(buf[17..25].try_into()?),
        -122.11215209960938
    );
    assert_eq!(
        f64::from_le_bytes(buf[25..33].try_into()?),
        2.239990472793579
    );
    assert_eq!(
        f32::from_le_bytes(buf[33..37].try_into()?),
        321.83612060546875
    );
    assert_eq!(f32::from_le_bytes(buf[37..41].try_into()?), -1.5);
    assert_eq!(f32::from_le_bytes(buf[41..45].try_into()?), 2.5);
    Ok(())
}

#[test]
fn rpos_request_carries_ascii_frequency() {
    let buf = encode_rpos_request(100);
    assert_eq!(buf.len(), RPOS_REQUEST_LEN);
    assert_eq!(&buf[..4], b"RPOS");
    assert_eq!(buf[4], 0);
    assert_eq!(&buf[5..8], b"100");
    assert!(buf[8..].iter().all(|&b| b == 0));
}

#[test]
fn rpos_unsubscribe_is_frequency_zero() {
    let buf = encode_rpos_request(0);
    assert_eq!(&buf[5..6], b"0");
    assert!(buf[6..].iter().all(|&b| b == 0));
}

// ── Inbound RREF decoding ────────────────────────────────────────────────────

#[test]
fn decode_single_rref_record() -> TestResult {
    let data = make_rref_data(&[(1, 12.5)]);
    let records = decode_rref_records(&data)?;
    assert_eq!(records, vec![RrefRecord { slot: 1, value: 12.5 }]);
    Ok(())
}

#[test]
fn decode_multi_record_rref_packet_preserves_order() -> TestResult {
    let data = make_rref_data(&[(3, 1.0), (1, -4.25), (2, 0.0)]);
    let records = decode_rref_records(&data)?;
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].slot, 3);
    assert_eq!(records[1].slot, 1);
    assert!((records[1].value + 4.25).abs() < f32::EPSILON);
    assert_eq!(records[2].slot, 2);
    Ok(())
}

#[test]
fn misaligned_rref_payload_is_a_protocol_error() {
    let mut data = make_rref_data(&[(1, 1.0)]);
    data.push(0); // 9-byte payload
    assert_eq!(
        decode_rref_records(&data),
        Err(ProtocolError::MisalignedPayload { len: 9 })
    );
}

#[test]
fn wrong_tag_is_a_protocol_error() {
    let mut data = make_rref_data(&[(1, 1.0)]);
    data[..4].copy_from_slice(b"DATA");
    assert_eq!(
        decode_rref_records(&data),
        Err(ProtocolError::UnexpectedTag {
            expected: *b"RREF",
            got: *b"DATA",
        })
    );
}

// ── Inbound RPOS decoding ────────────────────────────────────────────────────

#[test]
fn decode_rpos_reply_maps_fields() -> TestResult {
    let data = make_rpos_reply(
        [-122.112, 37.458, 2.24],
        [15.5, -2.0, 321.8, 1.0, 10.0, -0.5, 3.0, 0.01, 0.02, 0.03],
    );
    let pose = decode_rpos(&data)?;
    assert!((pose.longitude_deg + 122.112).abs() < 1e-9);
    assert!((pose.latitude_deg - 37.458).abs() < 1e-9);
    assert!((pose.elevation_msl_m - 2.24).abs() < 1e-9);
    assert!((pose.height_agl_m - 15.5).abs() < f32::EPSILON);
    assert!((pose.pitch_deg + 2.0).abs() < f32::EPSILON);
    assert!((pose.true_heading_deg - 321.8).abs() < 1e-4);
    assert!((pose.roll_deg - 1.0).abs() < f32::EPSILON);
    assert!((pose.vx_mps - 10.0).abs() < f32::EPSILON);
    assert!((pose.vy_mps + 0.5).abs() < f32::EPSILON);
    assert!((pose.vz_mps - 3.0).abs() < f32::EPSILON);
    assert!((pose.roll_rate_rps - 0.01).abs() < f32::EPSILON);
    assert!((pose.pitch_rate_rps - 0.02).abs() < f32::EPSILON);
    assert!((pose.yaw_rate_rps - 0.03).abs() < f32::EPSILON);
    Ok(())
}

#[test]
fn rpos_reply_with_wrong_length_is_rejected() {
    let mut data = make_rpos_reply([0.0; 3], [0.0; 10]);
    data.truncate(68);
    assert_eq!(
        decode_rpos(&data),
        Err(ProtocolError::WrongLength {
            expected: 69,
            got: 68,
        })
    );
}

#[test]
fn rpos_reply_with_wrong_tag_is_rejected() {
    let mut data = make_rpos_reply([0.0; 3], [0.0; 10]);
    data[..4].copy_from_slice(b"RREF");
    assert!(matches!(
        decode_rpos(&data),
        Err(ProtocolError::UnexpectedTag { .. })
    ));
}

#[test]
fn packet_tag_extraction() {
    assert_eq!(packet_tag(b"RREF\0rest"), Some(*b"RREF"));
    assert_eq!(packet_tag(b"RP"), None);
}
