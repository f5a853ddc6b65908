//! Footlight Core - Presets, Actor Runtime and Foot Switch Pipeline
//!
//! This crate contains the domain model and the concurrency substrate of the
//! Footlight DMX preset controller:
//! - Preset model (two DMX universes per preset) and the preset bank
//! - Mailbox/actor runtime with drop-on-full, non-blocking sends
//! - The closed message set exchanged between actors
//! - Foot switch pipeline: edge capture, debounce, classification, state machine
//! - Preset selector actor

pub mod bank;
pub mod config;
pub mod error;
pub mod footswitch;
pub mod logging;
pub mod message;
pub mod preset;
pub mod runtime;
pub mod selector;

pub use bank::{PresetBank, MAX_PRESETS, MIN_PRESETS};
pub use config::{DeviceConfig, DEFAULT_LONG_PRESS_THRESHOLD_MS};
pub use error::{CoreError, Result};
pub use footswitch::{
    EdgeEvent, EdgeInterrupt, FootSwitch, FootSwitchActor, InputPin, PressKind, SimulatedPin,
    SwitchState,
};
pub use logging::LogConfig;
pub use message::{Message, PresetFrame, SelectorStatus};
pub use preset::{Preset, Universe, DMX_UNIVERSE_SIZE, MAX_NAME_LENGTH, UNIVERSES_PER_PRESET};
pub use runtime::{mailbox, spawn, Actor, Address, Mailbox, Received, Tagged};
pub use selector::{PresetSelector, SelectorTargets};

/// Controller version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
