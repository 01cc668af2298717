use crate::protocol::UNKNOWN_IDENTITY;

/// One detected face within a result frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceDetection {
    /// Detector confidence for the bounding box itself (0-255).
    pub box_confidence: u8,
    /// Box edges in sensor pixel space (0-255). The sensor does not
    /// guarantee left <= right or top <= bottom; use [`bounds`] for
    /// ordered edges.
    ///
    /// [`bounds`]: FaceDetection::bounds
    pub box_left: u8,
    pub box_top: u8,
    pub box_right: u8,
    pub box_bottom: u8,
    /// Confidence of the identity match (0-255).
    pub id_confidence: u8,
    /// Calibrated identity code in -1..=7. -1 means no identity
    /// was recognized for this face.
    pub identity_code: i8,
    /// Whether the face is oriented toward the sensor.
    pub is_facing: bool,
}

impl FaceDetection {
    /// Box edges normalized to (left, top, right, bottom) with
    /// left <= right and top <= bottom, whichever order the sensor
    /// reported them in.
    pub fn bounds(&self) -> (u8, u8, u8, u8) {
        let (left, right) = if self.box_left <= self.box_right {
            (self.box_left, self.box_right)
        } else {
            (self.box_right, self.box_left)
        };
        let (top, bottom) = if self.box_top <= self.box_bottom {
            (self.box_top, self.box_bottom)
        } else {
            (self.box_bottom, self.box_top)
        };
        (left, top, right, bottom)
    }

    /// True when this face carries a usable identity: a calibrated code,
    /// facing the sensor, and an identity confidence of at least
    /// `min_confidence`.
    pub fn is_identified(&self, min_confidence: u8) -> bool {
        self.identity_code != UNKNOWN_IDENTITY
            && self.is_facing
            && self.id_confidence >= min_confidence
    }
}

/// One decoded result frame from the sensor.
///
/// Built fresh on every successful read and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorFrame {
    /// Payload length declared by the header. Informational only; the
    /// result layout itself is fixed-size.
    pub payload_length: u16,
    /// Detected faces in sensor priority order. Index 0 is the primary
    /// face. At most [`MAX_FACES`](crate::protocol::MAX_FACES) entries.
    pub faces: Vec<FaceDetection>,
    /// Trailing CRC as read from the wire.
    pub checksum: u16,
}

impl SensorFrame {
    /// The sensor's primary (highest-priority) face, if any.
    pub fn primary(&self) -> Option<&FaceDetection> {
        self.faces.first()
    }

    pub fn face_count(&self) -> u8 {
        self.faces.len() as u8
    }
}
