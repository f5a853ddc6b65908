//! Preset data model
//!
//! A [`Preset`] is a named snapshot of two DMX universes. Each [`Universe`]
//! owns its channel bytes and always knows its logical length, so a read
//! past the populated channels can be detected instead of returning stale
//! capacity bytes.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Channels per DMX512 universe
pub const DMX_UNIVERSE_SIZE: usize = 512;

/// Universes stored in every preset
pub const UNIVERSES_PER_PRESET: usize = 2;

/// Maximum preset name length in bytes
pub const MAX_NAME_LENGTH: usize = 31;

/// One DMX universe: up to 512 channel values plus the logical length.
///
/// Channels past the logical length read as zero and are never transmitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u8>", into = "Vec<u8>")]
pub struct Universe {
    channels: Vec<u8>,
}

impl Universe {
    /// Create an empty universe (logical length 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a universe from channel data, truncating anything past 512 channels
    pub fn from_slice(data: &[u8]) -> Self {
        if data.len() > DMX_UNIVERSE_SIZE {
            tracing::warn!(
                "Universe data of {} channels truncated to {}",
                data.len(),
                DMX_UNIVERSE_SIZE
            );
        }
        let len = data.len().min(DMX_UNIVERSE_SIZE);
        Self {
            channels: data[..len].to_vec(),
        }
    }

    /// Number of populated channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Length-bounded view of the populated channels
    pub fn as_slice(&self) -> &[u8] {
        &self.channels
    }

    /// Get a channel value, failing for channels past the logical length
    pub fn get(&self, channel: usize) -> Result<u8> {
        self.channels
            .get(channel)
            .copied()
            .ok_or(CoreError::OutOfRange {
                what: "channel",
                index: channel,
                limit: self.channels.len(),
            })
    }

    /// Set a channel value, growing the logical length when writing past it
    pub fn set(&mut self, channel: usize, value: u8) -> Result<()> {
        if channel >= DMX_UNIVERSE_SIZE {
            return Err(CoreError::invalid_argument(format!(
                "Channel {} out of range (max {})",
                channel,
                DMX_UNIVERSE_SIZE - 1
            )));
        }
        if channel >= self.channels.len() {
            self.channels.resize(channel + 1, 0);
        }
        self.channels[channel] = value;
        Ok(())
    }

    /// Full 512-channel frame, zero-filled past the logical length
    pub fn to_frame(&self) -> [u8; DMX_UNIVERSE_SIZE] {
        let mut frame = [0u8; DMX_UNIVERSE_SIZE];
        frame[..self.channels.len()].copy_from_slice(&self.channels);
        frame
    }

    pub fn clear(&mut self) {
        self.channels.clear();
    }
}

impl From<Vec<u8>> for Universe {
    fn from(mut channels: Vec<u8>) -> Self {
        channels.truncate(DMX_UNIVERSE_SIZE);
        Self { channels }
    }
}

impl From<Universe> for Vec<u8> {
    fn from(universe: Universe) -> Self {
        universe.channels
    }
}

/// A named snapshot of both universes, stored in a numbered slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    index: u8,
    name: String,
    universes: [Universe; UNIVERSES_PER_PRESET],
}

impl Preset {
    /// Create an empty preset for the given slot
    pub fn new(index: u8) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Create a preset with a name and both universes
    pub fn with_data(index: u8, name: &str, universe1: &[u8], universe2: &[u8]) -> Self {
        let mut preset = Self::new(index);
        preset.set_name(name);
        preset.universes = [Universe::from_slice(universe1), Universe::from_slice(universe2)];
        preset
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn set_index(&mut self, index: u8) {
        self.index = index;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name, truncated to 31 bytes on a character boundary
    pub fn set_name(&mut self, name: &str) {
        let mut end = name.len().min(MAX_NAME_LENGTH);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        self.name = name[..end].to_string();
    }

    /// Borrow one universe (0 or 1)
    pub fn universe(&self, universe: u8) -> Result<&Universe> {
        self.universes
            .get(universe as usize)
            .ok_or_else(|| universe_out_of_range(universe))
    }

    /// Replace a universe wholesale, truncating data past 512 channels
    pub fn set_universe_data(&mut self, universe: u8, data: &[u8]) -> Result<()> {
        let slot = self
            .universes
            .get_mut(universe as usize)
            .ok_or_else(|| invalid_universe(universe))?;
        *slot = Universe::from_slice(data);
        Ok(())
    }

    /// Set a single channel value
    pub fn set_universe_value(&mut self, universe: u8, channel: usize, value: u8) -> Result<()> {
        let slot = self
            .universes
            .get_mut(universe as usize)
            .ok_or_else(|| invalid_universe(universe))?;
        slot.set(channel, value).inspect_err(|e| {
            tracing::error!("Cannot set universe {} channel {}: {}", universe, channel, e);
        })
    }

    /// Read a single channel value.
    ///
    /// Reads past the logical length (or of an unknown universe) are logged
    /// and yield 0.
    pub fn universe_value(&self, universe: u8, channel: usize) -> u8 {
        match self.universe(universe).and_then(|u| u.get(channel)) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Read of universe {} channel {}: {}", universe, channel, e);
                0
            }
        }
    }

    /// Logical length of one universe (0 for an unknown universe)
    pub fn universe_length(&self, universe: u8) -> usize {
        self.universe(universe).map(Universe::len).unwrap_or(0)
    }

    /// Reset name and both universes; the slot index is kept
    pub fn clear(&mut self) {
        self.name.clear();
        for universe in &mut self.universes {
            universe.clear();
        }
    }

    /// Copy name and universes from another preset, keeping this slot index
    pub fn copy_from(&mut self, other: &Preset) {
        self.name.clone_from(&other.name);
        self.universes.clone_from(&other.universes);
    }
}

fn invalid_universe(universe: u8) -> CoreError {
    tracing::error!("Invalid universe {} (max 1)", universe);
    CoreError::invalid_argument(format!("Universe {} out of range (max 1)", universe))
}

fn universe_out_of_range(universe: u8) -> CoreError {
    tracing::error!("Universe {} out of range (max 1)", universe);
    CoreError::OutOfRange {
        what: "universe",
        index: universe as usize,
        limit: UNIVERSES_PER_PRESET,
    }
}
