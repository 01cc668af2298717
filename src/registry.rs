use crate::error::SensorError;
use crate::protocol::{IDENTITY_SLOTS, UNKNOWN_IDENTITY};
use crate::Result;

/// Ordered mapping from calibrated identity codes to display names.
///
/// The sensor distinguishes exactly eight calibrated identities (codes
/// 0..=7) plus the sentinel code -1 for a face it does not recognize.
/// The registry is configuration: built once at startup, immutable
/// afterwards.
#[derive(Debug, Clone)]
pub struct IdentityRegistry {
    names: Vec<String>,
    sentinel: String,
}

impl IdentityRegistry {
    /// Build a registry from exactly [`IDENTITY_SLOTS`] names, with the
    /// default sentinel label for unrecognized faces.
    pub fn new(names: Vec<String>) -> Result<Self> {
        Self::with_sentinel(names, "unknown")
    }

    /// Build a registry with an explicit sentinel label.
    pub fn with_sentinel(names: Vec<String>, sentinel: impl Into<String>) -> Result<Self> {
        if names.len() != IDENTITY_SLOTS {
            return Err(SensorError::Config(format!(
                "identity registry needs exactly {} names, got {}",
                IDENTITY_SLOTS,
                names.len()
            )));
        }
        Ok(Self {
            names,
            sentinel: sentinel.into(),
        })
    }

    /// Display name for an identity code. Total over -1..=7; anything
    /// else is a programming error surfaced as `UnknownIdentityCode`
    /// (the frame decoder rejects such codes before they get here).
    pub fn name_for(&self, code: i8) -> Result<&str> {
        if code == UNKNOWN_IDENTITY {
            return Ok(&self.sentinel);
        }
        usize::try_from(code)
            .ok()
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
            .ok_or(SensorError::UnknownIdentityCode(code))
    }

    /// Label for unrecognized faces.
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }
}

impl Default for IdentityRegistry {
    /// Placeholder roster "Person 0".."Person 7".
    fn default() -> Self {
        let names = (0..IDENTITY_SLOTS).map(|i| format!("Person {}", i)).collect();
        Self {
            names,
            sentinel: "unknown".to_string(),
        }
    }
}
