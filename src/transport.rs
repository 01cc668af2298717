use crate::Result;

/// Byte-oriented channel to the sensor peripheral.
///
/// Implementations block until the transfer completes or the bus
/// reports an error; timeout behavior belongs to the bus driver
/// underneath, not to this crate.
pub trait Transport: Send {
    /// Write a complete command to the peripheral.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read exactly `buf.len()` bytes from the peripheral.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;
}

#[cfg(target_os = "linux")]
pub use self::linux::I2cTransport;

#[cfg(target_os = "linux")]
mod linux {
    use super::Transport;
    use crate::error::SensorError;
    use crate::protocol::I2C_ADDRESS;
    use crate::Result;
    use i2cdev::core::I2CDevice;
    use i2cdev::linux::LinuxI2CDevice;

    /// Transport over a Linux /dev/i2c-N character device.
    pub struct I2cTransport {
        dev: LinuxI2CDevice,
    }

    impl I2cTransport {
        /// Open /dev/i2c-`bus` addressed to the sensor peripheral.
        pub fn open(bus: u8) -> Result<Self> {
            let path = format!("/dev/i2c-{}", bus);
            let dev = LinuxI2CDevice::new(&path, I2C_ADDRESS)
                .map_err(|e| SensorError::Transport(format!("open {}: {}", path, e)))?;
            log::info!("Opened {} (peripheral 0x{:02x})", path, I2C_ADDRESS);
            Ok(Self { dev })
        }
    }

    impl Transport for I2cTransport {
        fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
            self.dev
                .write(bytes)
                .map_err(|e| SensorError::Transport(format!("i2c write failed: {}", e)))
        }

        fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
            self.dev
                .read(buf)
                .map_err(|e| SensorError::Transport(format!("i2c read failed: {}", e)))
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::Transport;
    use crate::error::SensorError;
    use crate::Result;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    pub struct MockState {
        pub writes: Vec<Vec<u8>>,
        pub reads: VecDeque<Vec<u8>>,
        pub fail_reads: bool,
    }

    /// In-memory transport for tests: records every write and serves
    /// scripted read buffers. Cloning yields a second handle onto the
    /// same state, so tests can inspect traffic while the sensor (or a
    /// stream thread) owns the other handle.
    #[derive(Clone, Default)]
    pub struct MockTransport(Arc<Mutex<MockState>>);

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// A transport whose every read fails, like an absent sensor.
        pub fn failing() -> Self {
            let t = Self::new();
            t.0.lock().unwrap().fail_reads = true;
            t
        }

        pub fn push_read(&self, bytes: Vec<u8>) {
            self.0.lock().unwrap().reads.push_back(bytes);
        }

        pub fn writes(&self) -> Vec<Vec<u8>> {
            self.0.lock().unwrap().writes.clone()
        }
    }

    impl Transport for MockTransport {
        fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
            self.0.lock().unwrap().writes.push(bytes.to_vec());
            Ok(())
        }

        fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
            let mut state = self.0.lock().unwrap();
            if state.fail_reads {
                return Err(SensorError::Transport("scripted bus fault".into()));
            }
            match state.reads.pop_front() {
                Some(bytes) => {
                    assert_eq!(bytes.len(), buf.len(), "scripted read length mismatch");
                    buf.copy_from_slice(&bytes);
                    Ok(())
                }
                None => Err(SensorError::Transport("no scripted read available".into())),
            }
        }
    }
}
