use crate::error::SensorError;
use crate::types::{FaceDetection, SensorFrame};
use crate::Result;
use std::time::Duration;

// -- Bus identifiers --
pub const I2C_ADDRESS: u16 = 0x62;
pub const DEFAULT_I2C_BUS: u8 = 1;

// -- Frame geometry --
pub const HEADER_BYTES: usize = 4;
pub const FACE_RECORD_BYTES: usize = 8;
pub const MAX_FACES: usize = 4;
pub const CHECKSUM_BYTES: usize = 2;

/// Total size of one result read: header, face count, four fixed face
/// slots, trailing CRC. The sensor always reserves space for the
/// maximum face count.
pub const RESULT_BYTES: usize =
    HEADER_BYTES + 1 + MAX_FACES * FACE_RECORD_BYTES + CHECKSUM_BYTES;

// -- Identity codes --
pub const IDENTITY_SLOTS: usize = 8;
pub const UNKNOWN_IDENTITY: i8 = -1;

// -- Command opcodes --
const OP_MODE: u8 = 0x01;
const OP_ID_MODEL: u8 = 0x02;
const OP_ASSIGN_ID: u8 = 0x04;
const OP_PERSIST_IDS: u8 = 0x05;
const OP_ERASE_IDS: u8 = 0x06;

/// Default pause between sensor polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// An encoded command ready to be written to the bus: one opcode byte,
/// optionally followed by a single operand byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    bytes: [u8; 2],
    len: usize,
}

impl Command {
    fn opcode(op: u8) -> Self {
        Self { bytes: [op, 0], len: 1 }
    }

    fn with_operand(op: u8, operand: u8) -> Self {
        Self {
            bytes: [op, operand],
            len: 2,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl AsRef<[u8]> for Command {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Switch the sensor into continuous capture mode.
pub fn encode_continuous_mode() -> Command {
    Command::with_operand(OP_MODE, 0x01)
}

/// Turn the on-sensor identity model on or off.
pub fn encode_id_model(enabled: bool) -> Command {
    Command::with_operand(OP_ID_MODEL, enabled as u8)
}

/// Persist calibrated identities in sensor flash across power cycles.
pub fn encode_persist_ids(enabled: bool) -> Command {
    Command::with_operand(OP_PERSIST_IDS, enabled as u8)
}

/// Erase every calibrated identity stored on the sensor.
pub fn encode_clear() -> Command {
    Command::opcode(OP_ERASE_IDS)
}

/// Calibrate the next recognized face as identity `slot`.
pub fn encode_assign(slot: u8) -> Result<Command> {
    if slot as usize >= IDENTITY_SLOTS {
        return Err(SensorError::InvalidSlot(slot));
    }
    Ok(Command::with_operand(OP_ASSIGN_ID, slot))
}

/// Cursor over a result buffer. Advances by exact field widths and
/// fails closed when a field would run past the end of the input.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(SensorError::TruncatedFrame {
                expected: self.pos + n,
                actual: self.buf.len(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    // All multi-byte fields are little-endian; the sensor fixes the byte
    // order at the hardware level.
    fn u16_le(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }
}

/// Decode a result buffer into a [`SensorFrame`], verifying the trailing
/// CRC against the preceding bytes.
pub fn decode_result(buf: &[u8]) -> Result<SensorFrame> {
    let frame = decode_result_unchecked(buf)?;
    let computed = result_checksum(&buf[..RESULT_BYTES - CHECKSUM_BYTES]);
    if frame.checksum != computed {
        return Err(SensorError::ChecksumMismatch {
            expected: frame.checksum,
            computed,
        });
    }
    Ok(frame)
}

/// Decode a result buffer without verifying the trailing CRC.
///
/// Firmware revisions exist whose checksum does not match the CRC-16
/// this crate computes; this entry point keeps such sensors usable.
pub fn decode_result_unchecked(buf: &[u8]) -> Result<SensorFrame> {
    if buf.len() < RESULT_BYTES {
        return Err(SensorError::TruncatedFrame {
            expected: RESULT_BYTES,
            actual: buf.len(),
        });
    }

    let mut r = Reader::new(buf);
    r.take(2)?; // reserved header bytes
    let payload_length = r.u16_le()?;

    let face_count = r.u8()?;
    if face_count as usize > MAX_FACES {
        return Err(SensorError::MalformedFrame(format!(
            "face count {} exceeds maximum of {}",
            face_count, MAX_FACES
        )));
    }

    let mut faces = Vec::with_capacity(face_count as usize);
    for _ in 0..face_count {
        faces.push(decode_face(&mut r)?);
    }

    // The unused face slots are physically present; skip to the trailer.
    r.take((MAX_FACES - face_count as usize) * FACE_RECORD_BYTES)?;
    let checksum = r.u16_le()?;

    Ok(SensorFrame {
        payload_length,
        faces,
        checksum,
    })
}

fn decode_face(r: &mut Reader<'_>) -> Result<FaceDetection> {
    let box_confidence = r.u8()?;
    let box_left = r.u8()?;
    let box_top = r.u8()?;
    let box_right = r.u8()?;
    let box_bottom = r.u8()?;
    let id_confidence = r.u8()?;
    let identity_code = r.i8()?;
    let is_facing = r.i8()? != 0;

    if identity_code < UNKNOWN_IDENTITY || identity_code as i16 >= IDENTITY_SLOTS as i16 {
        return Err(SensorError::MalformedFrame(format!(
            "identity code {} out of range -1..={}",
            identity_code,
            IDENTITY_SLOTS - 1
        )));
    }

    Ok(FaceDetection {
        box_confidence,
        box_left,
        box_top,
        box_right,
        box_bottom,
        id_confidence,
        identity_code,
        is_facing,
    })
}

/// Encode a result frame in the sensor's wire layout.
///
/// The sensor is the only producer of result frames in production; this
/// encoder exists for loopback transports and test fixtures.
pub fn encode_result(faces: &[FaceDetection]) -> Result<Vec<u8>> {
    if faces.len() > MAX_FACES {
        return Err(SensorError::MalformedFrame(format!(
            "face count {} exceeds maximum of {}",
            faces.len(),
            MAX_FACES
        )));
    }

    let mut buf = Vec::with_capacity(RESULT_BYTES);
    buf.extend_from_slice(&[0x00, 0x00]); // reserved header bytes
    let payload_length = (RESULT_BYTES - HEADER_BYTES) as u16;
    buf.extend_from_slice(&payload_length.to_le_bytes());

    buf.push(faces.len() as u8);
    for face in faces {
        buf.push(face.box_confidence);
        buf.push(face.box_left);
        buf.push(face.box_top);
        buf.push(face.box_right);
        buf.push(face.box_bottom);
        buf.push(face.id_confidence);
        buf.push(face.identity_code as u8);
        buf.push(face.is_facing as u8);
    }
    for _ in faces.len()..MAX_FACES {
        buf.extend_from_slice(&[0u8; FACE_RECORD_BYTES]);
    }

    let crc = result_checksum(&buf);
    buf.extend_from_slice(&crc.to_le_bytes());
    Ok(buf)
}

/// CRC-16/CCITT (poly 0x1021, init 0xFFFF) over the frame bytes up to,
/// but not including, the trailing checksum field.
pub fn result_checksum(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
