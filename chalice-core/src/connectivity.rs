//! Phone-link state tracking.
//!
//! The host Bluetooth stack reports the raw connected flag; this module
//! turns it into the two things the face cares about: the glyph visibility
//! and a haptic pulse on the moment the phone goes away.

/// Request toward the vibration driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HapticRequest {
    DoublePulse,
}

/// Edge detector over the raw connectivity flag.
pub struct ConnectivityMonitor {
    connected: bool,
}

impl ConnectivityMonitor {
    /// Seed from the startup state read. Never pulses.
    pub fn new(connected: bool) -> Self {
        Self { connected }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Record a new state. Pulses only on the connected -> disconnected
    /// edge; reconnects and repeated states are silent.
    pub fn update(&mut self, connected: bool) -> Option<HapticRequest> {
        let lost = self.connected && !connected;
        self.connected = connected;
        lost.then_some(HapticRequest::DoublePulse)
    }
}
