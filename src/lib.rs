//! # person-sensor - Rust SDK for the Person Sensor face-detection module
//!
//! Host-side driver for the Person Sensor over a Linux I2C bus. Provides:
//! - Result-frame decoding (up to four faces per read) with CRC verification
//! - Identity calibration through the sensor's command protocol
//! - Fixed-cadence polling that rides out transient bus faults
//!
//! ## Quick Start
//! ```no_run
//! use person_sensor::{IdentityRegistry, PollLoop, PollOutcome, Sensor};
//!
//! let sensor = Sensor::open_default().unwrap();
//! let registry = IdentityRegistry::default();
//! let mut poll = PollLoop::new(sensor);
//!
//! loop {
//!     match poll.tick() {
//!         PollOutcome::Decoded(frame) => {
//!             for face in &frame.faces {
//!                 let name = registry.name_for(face.identity_code).unwrap();
//!                 println!("{} conf={}", name, face.id_confidence);
//!             }
//!         }
//!         PollOutcome::TransientError(e) => eprintln!("retrying: {}", e),
//!     }
//!     std::thread::sleep(poll.interval());
//! }
//! ```

pub mod calibrate;
pub mod error;
pub mod poll;
pub mod protocol;
pub mod registry;
pub mod sensor;
pub mod stream;
pub mod transport;
pub mod types;

pub use calibrate::{ButtonEvent, CalibrationController};
pub use error::SensorError;
pub use poll::{PollLoop, PollOutcome};
pub use protocol::Command;
pub use registry::IdentityRegistry;
pub use sensor::Sensor;
pub use stream::SensorStream;
pub use types::*;

/// Result type alias for sensor operations.
pub type Result<T> = std::result::Result<T, SensorError>;
