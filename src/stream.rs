use crate::protocol::Command;
use crate::sensor::Sensor;
use crate::transport::Transport;
use crate::types::SensorFrame;
use crate::{Result, SensorError};
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Handle to a background polling thread.
///
/// The reader thread owns the sensor, polls at a fixed interval, and
/// queues decoded frames on a bounded channel. Calibration commands
/// submitted through [`send`] are written by the reader thread between
/// polls, so reads and writes never interleave on the bus.
///
/// [`send`]: SensorStream::send
pub struct SensorStream {
    frames: Receiver<SensorFrame>,
    commands: Sender<Command>,
    stop_flag: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SensorStream {
    /// Spawn the polling thread, consuming the sensor handle.
    pub fn start<T: Transport + 'static>(
        sensor: Sensor<T>,
        interval: Duration,
    ) -> Result<SensorStream> {
        let (frame_tx, frame_rx) = crossbeam_channel::bounded(16);
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = stop_flag.clone();

        let thread = std::thread::Builder::new()
            .name("person-sensor-poll".into())
            .spawn(move || {
                poll_reader_loop(sensor, interval, frame_tx, cmd_rx, stop_clone);
            })
            .map_err(|e| SensorError::Transport(format!("failed to spawn poll thread: {}", e)))?;

        Ok(SensorStream {
            frames: frame_rx,
            commands: cmd_tx,
            stop_flag,
            thread: Some(thread),
        })
    }

    /// Receive the next frame (blocks until available).
    pub fn recv(&self) -> Result<SensorFrame> {
        self.frames.recv().map_err(|_| SensorError::StreamStopped)
    }

    /// Try to receive a frame without blocking.
    pub fn try_recv(&self) -> Option<SensorFrame> {
        self.frames.try_recv().ok()
    }

    /// Receive a frame with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<SensorFrame> {
        self.frames.recv_timeout(timeout).map_err(|e| match e {
            crossbeam_channel::RecvTimeoutError::Timeout => SensorError::Timeout,
            crossbeam_channel::RecvTimeoutError::Disconnected => SensorError::StreamStopped,
        })
    }

    /// Queue a command for the reader thread to write between polls.
    pub fn send(&self, cmd: Command) -> Result<()> {
        self.commands
            .send(cmd)
            .map_err(|_| SensorError::StreamStopped)
    }

    /// Check if the stream is still active.
    pub fn is_active(&self) -> bool {
        !self.stop_flag.load(Ordering::Relaxed)
    }

    /// Stop the stream and wait for the reader thread to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SensorStream {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The poll reader loop runs in a dedicated thread. Queued commands
/// are drained before each read so calibration writes and result reads
/// stay serialized on the one physical bus.
fn poll_reader_loop<T: Transport>(
    mut sensor: Sensor<T>,
    interval: Duration,
    frames: Sender<SensorFrame>,
    commands: Receiver<Command>,
    stop_flag: Arc<AtomicBool>,
) {
    log::info!("poll reader started (interval {:?})", interval);

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            log::info!("poll reader stopping (stop flag set)");
            break;
        }

        while let Ok(cmd) = commands.try_recv() {
            if let Err(e) = sensor.send(cmd) {
                log::warn!("command write failed: {}", e);
            }
        }

        match sensor.read_result() {
            Ok(frame) => {
                if let Err(e) = frames.try_send(frame) {
                    match e {
                        crossbeam_channel::TrySendError::Full(_) => {
                            log::trace!("frame channel full, dropping frame");
                        }
                        crossbeam_channel::TrySendError::Disconnected(_) => {
                            log::info!("frame channel disconnected, stopping reader");
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                // Transient by definition; the next pass retries.
                log::warn!("sensor read failed: {}", e);
            }
        }

        std::thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{encode_clear, encode_result};
    use crate::transport::mock::MockTransport;
    use crate::types::FaceDetection;
    use std::time::Instant;

    fn face() -> FaceDetection {
        FaceDetection {
            box_confidence: 150,
            box_left: 20,
            box_top: 30,
            box_right: 120,
            box_bottom: 140,
            id_confidence: 88,
            identity_code: 0,
            is_facing: false,
        }
    }

    #[test]
    fn test_stream_delivers_frames() {
        let transport = MockTransport::new();
        for _ in 0..4 {
            transport.push_read(encode_result(&[face()]).unwrap());
        }

        let stream = SensorStream::start(
            Sensor::without_init(transport),
            Duration::from_millis(1),
        )
        .unwrap();

        let frame = stream.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(frame.faces, vec![face()]);
        stream.stop();
    }

    #[test]
    fn test_queued_command_reaches_the_bus() {
        let transport = MockTransport::new();
        let stream = SensorStream::start(
            Sensor::without_init(transport.clone()),
            Duration::from_millis(1),
        )
        .unwrap();

        stream.send(encode_clear()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(1);
        loop {
            if transport.writes().iter().any(|w| w == &[0x06]) {
                break;
            }
            assert!(Instant::now() < deadline, "command never written to the bus");
            std::thread::sleep(Duration::from_millis(5));
        }
        stream.stop();
    }

    #[test]
    fn test_stop_joins_reader_thread() {
        let stream = SensorStream::start(
            Sensor::without_init(MockTransport::failing()),
            Duration::from_millis(1),
        )
        .unwrap();
        assert!(stream.is_active());
        stream.stop();
    }
}
