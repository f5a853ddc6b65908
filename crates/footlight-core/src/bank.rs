//! Preset bank and selection cursor

use crate::error::{CoreError, Result};
use crate::preset::Preset;

/// Fixed bank capacity
pub const MAX_PRESETS: u8 = 20;
/// Smallest usable bank size
pub const MIN_PRESETS: u8 = 2;

/// Fixed-capacity bank of presets with an active count and a cursor.
///
/// `current_index < num_presets` holds at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetBank {
    presets: Vec<Preset>,
    num_presets: u8,
    current_index: u8,
}

impl Default for PresetBank {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetBank {
    /// Create a bank with all slots cleared and `MAX_PRESETS` active
    pub fn new() -> Self {
        Self {
            presets: (0..MAX_PRESETS).map(Preset::new).collect(),
            num_presets: MAX_PRESETS,
            current_index: 0,
        }
    }

    pub fn num_presets(&self) -> u8 {
        self.num_presets
    }

    pub fn current_index(&self) -> u8 {
        self.current_index
    }

    /// Change the active preset count, clamping the cursor back into range
    pub fn set_num_presets(&mut self, num_presets: u8) -> Result<()> {
        if !(MIN_PRESETS..=MAX_PRESETS).contains(&num_presets) {
            tracing::error!(
                "Invalid number of presets: {} (must be {}-{})",
                num_presets,
                MIN_PRESETS,
                MAX_PRESETS
            );
            return Err(CoreError::invalid_argument(format!(
                "number of presets {} outside {}-{}",
                num_presets, MIN_PRESETS, MAX_PRESETS
            )));
        }

        self.num_presets = num_presets;
        if self.current_index >= num_presets {
            self.current_index = 0;
        }
        Ok(())
    }

    /// Store a preset into an active slot
    pub fn add_preset(
        &mut self,
        index: u8,
        name: Option<&str>,
        universe1: Option<&[u8]>,
        universe2: Option<&[u8]>,
    ) -> Result<()> {
        self.check_index(index)?;

        let (Some(name), Some(universe1), Some(universe2)) = (name, universe1, universe2) else {
            tracing::error!("Preset {} is missing its name or universe data", index);
            return Err(CoreError::invalid_argument(format!(
                "preset {} is missing its name or universe data",
                index
            )));
        };

        let slot = &mut self.presets[index as usize];
        slot.set_index(index);
        slot.set_name(name);
        slot.set_universe_data(0, universe1)?;
        slot.set_universe_data(1, universe2)?;

        tracing::info!("Added preset at index {}: {}", index, slot.name());
        Ok(())
    }

    /// Copy a preset's contents into an active slot
    pub fn set_preset(&mut self, index: u8, preset: &Preset) -> Result<()> {
        self.check_index(index)?;
        let slot = &mut self.presets[index as usize];
        slot.copy_from(preset);
        slot.set_index(index);
        Ok(())
    }

    pub fn get_preset(&self, index: u8) -> Result<&Preset> {
        self.check_index(index)?;
        Ok(&self.presets[index as usize])
    }

    pub fn current_preset(&self) -> &Preset {
        &self.presets[self.current_index as usize]
    }

    /// The active presets in slot order
    pub fn presets(&self) -> &[Preset] {
        &self.presets[..self.num_presets as usize]
    }

    pub fn set_current_index(&mut self, index: u8) -> Result<()> {
        self.check_index(index)?;
        self.current_index = index;
        Ok(())
    }

    /// Advance the cursor, wrapping past the last active preset
    pub fn select_next(&mut self) -> u8 {
        self.current_index = (self.current_index + 1) % self.num_presets;
        self.current_index
    }

    /// Step the cursor back, wrapping below zero
    pub fn select_previous(&mut self) -> u8 {
        self.current_index = (self.current_index + self.num_presets - 1) % self.num_presets;
        self.current_index
    }

    /// Clear every slot and reset the cursor
    pub fn clear_all(&mut self) {
        for preset in &mut self.presets {
            preset.clear();
        }
        self.current_index = 0;
    }

    /// Replace the active presets with `presets`, in order.
    ///
    /// The active count becomes `presets.len()`; a count outside
    /// `MIN_PRESETS..=MAX_PRESETS` is rejected and leaves the bank untouched.
    pub fn replace_all(&mut self, presets: &[Preset]) -> Result<()> {
        let count = u8::try_from(presets.len())
            .map_err(|_| CoreError::invalid_argument("too many presets"))?;
        self.set_num_presets(count)?;
        self.clear_all();

        for (slot, preset) in presets.iter().enumerate() {
            // slot < MAX_PRESETS, checked above
            self.set_preset(slot as u8, preset)?;
        }

        tracing::info!("Presets updated: number of presets={}", self.num_presets);
        Ok(())
    }

    fn check_index(&self, index: u8) -> Result<()> {
        if index >= self.num_presets {
            tracing::error!(
                "Preset index {} out of range (max {})",
                index,
                self.num_presets - 1
            );
            return Err(CoreError::OutOfRange {
                what: "preset",
                index: index as usize,
                limit: self.num_presets as usize,
            });
        }
        Ok(())
    }
}
