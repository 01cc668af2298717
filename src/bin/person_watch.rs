//! Watch the Person Sensor and calibrate identities from the terminal.
//!
//! Polls in a background stream and prints each decoded frame. Commands
//! on stdin drive calibration: `c` clear, `-` decrement, `a` assign the
//! selected slot, `+` increment, `q` quit.

use clap::Parser;

#[derive(Parser)]
#[command(name = "person_watch", about = "Person Sensor terminal watcher")]
struct Args {
    /// I2C bus number (/dev/i2c-<bus>)
    #[arg(long, default_value_t = 1)]
    bus: u8,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 200)]
    interval_ms: u64,

    /// Comma-separated list of exactly eight identity names
    #[arg(long, value_delimiter = ',')]
    names: Option<Vec<String>>,
}

#[cfg(target_os = "linux")]
fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = app::run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_os = "linux"))]
fn main() {
    let _ = Args::parse();
    eprintln!("person_watch needs a Linux I2C bus (/dev/i2c-N)");
    std::process::exit(1);
}

#[cfg(target_os = "linux")]
mod app {
    use super::Args;
    use person_sensor::{
        ButtonEvent, CalibrationController, IdentityRegistry, Result, Sensor, SensorFrame,
        SensorStream,
    };
    use std::io::BufRead;
    use std::time::Duration;

    /// Identity confidence below this renders as an anonymous box.
    const MIN_ID_CONFIDENCE: u8 = 90;

    pub fn run(args: Args) -> Result<()> {
        let registry = match args.names {
            Some(names) => IdentityRegistry::new(names)?,
            None => IdentityRegistry::default(),
        };

        let sensor = Sensor::open_bus(args.bus)?;
        let interval = Duration::from_millis(args.interval_ms);
        let stream = SensorStream::start(sensor, interval)?;
        let mut controller = CalibrationController::new();

        // stdin runs on its own thread so frame printing never blocks
        // on the terminal.
        let (key_tx, key_rx) = crossbeam_channel::unbounded();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if key_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        println!("commands: c=clear  -=decrement  a=assign  +=increment  q=quit");
        print_slot(&controller, &registry);

        loop {
            if let Ok(frame) = stream.recv_timeout(interval * 2) {
                print_frame(&frame, &registry);
            }

            while let Ok(line) = key_rx.try_recv() {
                let event = match line.trim() {
                    "c" => ButtonEvent::Clear,
                    "-" => ButtonEvent::Decrement,
                    "a" => ButtonEvent::Assign,
                    "+" => ButtonEvent::Increment,
                    "q" => {
                        stream.stop();
                        return Ok(());
                    }
                    "" => continue,
                    other => {
                        eprintln!("unknown command: {}", other);
                        continue;
                    }
                };
                if let Some(cmd) = controller.handle(event) {
                    stream.send(cmd)?;
                }
                print_slot(&controller, &registry);
            }
        }
    }

    fn print_slot(controller: &CalibrationController, registry: &IdentityRegistry) {
        let slot = controller.current_slot();
        let name = registry.name_for(slot as i8).unwrap_or("?");
        println!("calibrate slot = {} ({})", slot, name);
    }

    fn print_frame(frame: &SensorFrame, registry: &IdentityRegistry) {
        if frame.faces.is_empty() {
            return;
        }
        for (i, face) in frame.faces.iter().enumerate() {
            let (left, top, right, bottom) = face.bounds();
            let label = if i == 0 && face.is_identified(MIN_ID_CONFIDENCE) {
                let name = registry.name_for(face.identity_code).unwrap_or("?");
                format!("{}({})", name, face.id_confidence)
            } else {
                format!("{}", face.box_confidence)
            };
            println!(
                "  [{}] box=({},{})-({},{})  facing={}  {}",
                i,
                left,
                top,
                right,
                bottom,
                if face.is_facing { "yes" } else { "no" },
                label
            );
        }
    }
}
