use crate::protocol::{self, Command, RESULT_BYTES};
use crate::transport::Transport;
use crate::types::SensorFrame;
use crate::Result;

/// An opened Person Sensor ready for polling and calibration.
///
/// Construction writes the enable sequence the sensor expects before
/// its first result read: continuous capture mode, identity model on,
/// and persistence of calibrated identities across power cycles.
pub struct Sensor<T: Transport> {
    transport: T,
}

impl<T: Transport> Sensor<T> {
    /// Take ownership of a transport and run the enable sequence.
    pub fn new(mut transport: T) -> Result<Self> {
        transport.write_all(protocol::encode_continuous_mode().as_bytes())?;
        transport.write_all(protocol::encode_id_model(true).as_bytes())?;
        transport.write_all(protocol::encode_persist_ids(true).as_bytes())?;
        log::info!("Person Sensor enabled: continuous mode, identity model, persistent IDs");
        Ok(Self { transport })
    }

    /// Wrap a transport without sending the enable sequence, for a
    /// sensor something else already configured.
    pub fn without_init(transport: T) -> Self {
        Self { transport }
    }

    /// Read and decode one result frame.
    pub fn read_result(&mut self) -> Result<SensorFrame> {
        let mut buf = [0u8; RESULT_BYTES];
        self.transport.read_exact(&mut buf)?;
        protocol::decode_result(&buf)
    }

    /// Write an encoded command to the sensor.
    pub fn send(&mut self, cmd: Command) -> Result<()> {
        self.transport.write_all(cmd.as_bytes())
    }

    /// Consume the handle and return the underlying transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

#[cfg(target_os = "linux")]
impl Sensor<crate::transport::I2cTransport> {
    /// Open the sensor on the default Linux I2C bus.
    pub fn open_default() -> Result<Self> {
        Self::open_bus(protocol::DEFAULT_I2C_BUS)
    }

    /// Open the sensor on /dev/i2c-`bus`.
    pub fn open_bus(bus: u8) -> Result<Self> {
        Self::new(crate::transport::I2cTransport::open(bus)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encode_result;
    use crate::transport::mock::MockTransport;
    use crate::types::FaceDetection;

    #[test]
    fn test_enable_sequence_on_open() {
        let transport = MockTransport::new();
        let _sensor = Sensor::new(transport.clone()).unwrap();

        assert_eq!(
            transport.writes(),
            vec![vec![0x01, 0x01], vec![0x02, 0x01], vec![0x05, 0x01]]
        );
    }

    #[test]
    fn test_without_init_sends_nothing() {
        let transport = MockTransport::new();
        let _sensor = Sensor::without_init(transport.clone());
        assert!(transport.writes().is_empty());
    }

    #[test]
    fn test_read_result_decodes_frame() {
        let face = FaceDetection {
            box_confidence: 180,
            box_left: 40,
            box_top: 30,
            box_right: 90,
            box_bottom: 120,
            id_confidence: 92,
            identity_code: 1,
            is_facing: true,
        };
        let transport = MockTransport::new();
        transport.push_read(encode_result(&[face]).unwrap());

        let mut sensor = Sensor::without_init(transport);
        let frame = sensor.read_result().unwrap();
        assert_eq!(frame.faces, vec![face]);
    }

    #[test]
    fn test_send_writes_command_bytes() {
        let transport = MockTransport::new();
        let mut sensor = Sensor::without_init(transport.clone());
        sensor.send(protocol::encode_clear()).unwrap();
        sensor.send(protocol::encode_assign(6).unwrap()).unwrap();

        assert_eq!(transport.writes(), vec![vec![0x06], vec![0x04, 0x06]]);
    }
}
