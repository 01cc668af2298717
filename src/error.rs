/// Errors that can occur when talking to the Person Sensor.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("truncated frame: need {expected} bytes, got {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("checksum mismatch: frame carries 0x{expected:04x}, computed 0x{computed:04x}")]
    ChecksumMismatch { expected: u16, computed: u16 },

    #[error("invalid calibration slot {0} (valid: 0..=7)")]
    InvalidSlot(u8),

    #[error("unknown identity code {0} (valid: -1..=7)")]
    UnknownIdentityCode(i8),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("sensor stream stopped")]
    StreamStopped,

    #[error("timeout waiting for data")]
    Timeout,
}
