use crate::error::SensorError;
use crate::protocol::DEFAULT_POLL_INTERVAL;
use crate::sensor::Sensor;
use crate::transport::Transport;
use crate::types::SensorFrame;
use std::time::Duration;

/// Result of one poll tick.
#[derive(Debug)]
pub enum PollOutcome {
    /// A frame was read and decoded.
    Decoded(SensorFrame),
    /// The read or decode failed this tick; retry on the next one.
    TransientError(SensorError),
}

/// Fixed-cadence poller over an opened sensor.
///
/// The loop holds no timer: an external scheduler (typically the
/// presentation layer's timer callback) calls [`tick`] once per
/// [`interval`], then renders. The sensor link is inherently
/// intermittent, so every per-tick failure is transient: `tick` never
/// panics and never gives up.
///
/// [`tick`]: PollLoop::tick
/// [`interval`]: PollLoop::interval
pub struct PollLoop<T: Transport> {
    sensor: Sensor<T>,
    interval: Duration,
}

impl<T: Transport> PollLoop<T> {
    pub fn new(sensor: Sensor<T>) -> Self {
        Self::with_interval(sensor, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(sensor: Sensor<T>, interval: Duration) -> Self {
        Self { sensor, interval }
    }

    /// Cadence the external scheduler should tick at.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Access the sensor, e.g. to write calibration commands between
    /// ticks. Reads and writes stay serialized because both go through
    /// this single owner.
    pub fn sensor_mut(&mut self) -> &mut Sensor<T> {
        &mut self.sensor
    }

    /// Read and decode one result frame.
    pub fn tick(&mut self) -> PollOutcome {
        match self.sensor.read_result() {
            Ok(frame) => PollOutcome::Decoded(frame),
            Err(e) => {
                log::warn!("poll tick failed: {}", e);
                PollOutcome::TransientError(e)
            }
        }
    }
}
