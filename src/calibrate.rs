use crate::protocol::{self, Command, IDENTITY_SLOTS};

/// User actions forwarded from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Clear,
    Decrement,
    Assign,
    Increment,
}

/// State machine for assigning calibrated identities.
///
/// Tracks the slot the next calibration will target. Operations that
/// need to reach the sensor return the encoded [`Command`]; the caller
/// owns the transport and decides when to write it. Thread-confined:
/// share across threads only behind external synchronization.
#[derive(Debug, Default)]
pub struct CalibrationController {
    current_slot: u8,
}

impl CalibrationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot the next `assign_current` will calibrate.
    pub fn current_slot(&self) -> u8 {
        self.current_slot
    }

    /// Erase all stored identities on the sensor and reset the
    /// selection to slot 0.
    pub fn clear(&mut self) -> Command {
        self.current_slot = 0;
        protocol::encode_clear()
    }

    /// Step the selected slot back, wrapping 0 -> 7. No bus traffic.
    pub fn decrement(&mut self) {
        self.current_slot = (self.current_slot + IDENTITY_SLOTS as u8 - 1) % IDENTITY_SLOTS as u8;
    }

    /// Step the selected slot forward, wrapping 7 -> 0. No bus traffic.
    pub fn increment(&mut self) {
        self.current_slot = (self.current_slot + 1) % IDENTITY_SLOTS as u8;
    }

    /// Calibrate the currently selected slot, then advance the
    /// selection. The returned command names the slot as it was before
    /// the advance.
    pub fn assign_current(&mut self) -> Command {
        let cmd = protocol::encode_assign(self.current_slot).expect("slot stays within 0..=7");
        self.increment();
        cmd
    }

    /// Forward a presentation button press to the matching operation.
    /// Returns the command to write, if the operation produces one.
    pub fn handle(&mut self, event: ButtonEvent) -> Option<Command> {
        match event {
            ButtonEvent::Clear => Some(self.clear()),
            ButtonEvent::Decrement => {
                self.decrement();
                None
            }
            ButtonEvent::Assign => Some(self.assign_current()),
            ButtonEvent::Increment => {
                self.increment();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_wraps_every_eight() {
        let mut ctl = CalibrationController::new();
        for _ in 0..10 {
            ctl.increment();
        }
        assert_eq!(ctl.current_slot(), 2);
    }

    #[test]
    fn test_decrement_wraps_to_seven() {
        let mut ctl = CalibrationController::new();
        ctl.decrement();
        assert_eq!(ctl.current_slot(), 7);
    }

    #[test]
    fn test_assign_emits_pre_advance_slot() {
        let mut ctl = CalibrationController::new();
        for _ in 0..3 {
            ctl.increment();
        }
        let cmd = ctl.assign_current();
        assert_eq!(cmd.as_bytes(), &[0x04, 3]);
        assert_eq!(ctl.current_slot(), 4);
    }

    #[test]
    fn test_assign_wraps_after_last_slot() {
        let mut ctl = CalibrationController::new();
        for _ in 0..7 {
            ctl.increment();
        }
        let cmd = ctl.assign_current();
        assert_eq!(cmd.as_bytes(), &[0x04, 7]);
        assert_eq!(ctl.current_slot(), 0);
    }

    #[test]
    fn test_clear_resets_from_any_slot() {
        let mut ctl = CalibrationController::new();
        for _ in 0..5 {
            ctl.increment();
        }
        let cmd = ctl.clear();
        assert_eq!(cmd.as_bytes(), &[0x06]);
        assert_eq!(ctl.current_slot(), 0);
    }

    #[test]
    fn test_button_events_map_to_operations() {
        let mut ctl = CalibrationController::new();
        assert!(ctl.handle(ButtonEvent::Increment).is_none());
        assert_eq!(ctl.current_slot(), 1);

        let cmd = ctl.handle(ButtonEvent::Assign).unwrap();
        assert_eq!(cmd.as_bytes(), &[0x04, 1]);
        assert_eq!(ctl.current_slot(), 2);

        assert!(ctl.handle(ButtonEvent::Decrement).is_none());
        assert_eq!(ctl.current_slot(), 1);

        let cmd = ctl.handle(ButtonEvent::Clear).unwrap();
        assert_eq!(cmd.as_bytes(), &[0x06]);
        assert_eq!(ctl.current_slot(), 0);
    }
}
