//! Durable key/value settings synced from the companion app.
//!
//! The companion sends a record of `(key, i32)` pairs over the host
//! message channel. Accepted keys are persisted through a
//! [`SettingsBackend`] and a registered callback fires once per record so
//! the renderer can recompute its derived appearance. Keys the record does
//! not mention keep their stored value.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use heapless::Vec;

use crate::color;

/// Inbound message buffer budget for the transport channel.
pub const INBOX_SIZE: usize = 256;
/// Outbound message buffer budget for the transport channel.
pub const OUTBOX_SIZE: usize = 64;

/// Exclusive upper bound of the valid key space. A loop bound, not a key.
pub const SENTRY: u8 = 2;

/// The closed settings key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SettingsKey {
    /// Packed 24-bit RGB face color.
    FaceColor = 0,
    /// Hand style selector, 0 = bold (default), 1 = thin.
    Style = 1,
}

impl SettingsKey {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(SettingsKey::FaceColor),
            1 => Some(SettingsKey::Style),
            _ => None,
        }
    }
}

/// Where accepted settings are persisted. Absence of a key is a valid
/// state distinct from a stored zero.
pub trait SettingsBackend {
    fn read_i32(&self, key: SettingsKey) -> Option<i32>;
    fn write_i32(&mut self, key: SettingsKey, value: i32);
}

/// One inbound configuration record. Oversized for the current key space
/// so a newer companion can mention keys this firmware scans past.
pub type Record = Vec<(u8, i32), 4>;

/// Decode a record from its wire form: consecutive `(u8 key, i32 LE)`
/// pairs. Anything else is malformed and the message is dropped.
pub fn decode_record(bytes: &[u8]) -> Option<Record> {
    if bytes.is_empty() || bytes.len() % 5 != 0 {
        return None;
    }
    let mut record = Record::new();
    for pair in bytes.chunks_exact(5) {
        let value = i32::from_le_bytes(pair[1..5].try_into().ok()?);
        record.push((pair[0], value)).ok()?;
    }
    Some(record)
}

fn record_find(record: &Record, key: u8) -> Option<i32> {
    record.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Why the transport discarded an inbound message before we saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// The payload did not decode as a record.
    Malformed,
    /// The inbound queue was full.
    BufferFull,
}

/// Message channel lifecycle. `Listening` is terminal until process exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelState {
    Uninitialized,
    Listening,
}

/// The process-wide settings store.
pub struct SettingsStore<B, F>
where
    B: SettingsBackend,
    F: FnMut(),
{
    backend: B,
    state: ChannelState,
    on_changed: Option<F>,
}

impl<B, F> SettingsStore<B, F>
where
    B: SettingsBackend,
    F: FnMut(),
{
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: ChannelState::Uninitialized,
            on_changed: None,
        }
    }

    /// Register the settings-changed callback and start listening.
    ///
    /// Must be called once, before any message can arrive. A second call
    /// is ignored.
    pub fn init(&mut self, on_changed: F) {
        if self.state == ChannelState::Listening {
            #[cfg(feature = "defmt")]
            defmt::warn!("settings: init called twice, ignoring");
            return;
        }
        self.on_changed = Some(on_changed);
        self.state = ChannelState::Listening;
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Stored color for `key`, black when the key was never written.
    pub fn get_color(&self, key: SettingsKey) -> Rgb565 {
        match self.backend.read_i32(key) {
            Some(value) => color::from_hex(value as u32),
            None => Rgb565::BLACK,
        }
    }

    /// Stored integer for `key`, 0 when the key was never written.
    pub fn get_i32(&self, key: SettingsKey) -> i32 {
        self.backend.read_i32(key).unwrap_or(0)
    }

    /// Process one inbound record.
    ///
    /// Scans the whole key space; keys present in the record are
    /// persisted, missing keys are logged and left untouched. The
    /// settings-changed callback fires exactly once, after all keys.
    pub fn on_message(&mut self, record: &Record) {
        for raw in 0..SENTRY {
            let Some(value) = record_find(record, raw) else {
                #[cfg(feature = "defmt")]
                defmt::debug!("settings: key {} missing from inbound record", raw);
                continue;
            };
            if let Some(key) = SettingsKey::from_raw(raw) {
                self.backend.write_i32(key, value);
            }
        }

        if let Some(on_changed) = self.on_changed.as_mut() {
            on_changed();
        }
    }

    /// A message the transport dropped. There is nothing to recover: the
    /// stale settings stay in place until the companion sends again.
    pub fn on_dropped(&mut self, _reason: DropReason) {
        #[cfg(feature = "defmt")]
        defmt::debug!("settings: inbound message dropped: {}", _reason);
    }
}
