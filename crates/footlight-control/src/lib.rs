//! Footlight Control - I/O adapters of the foot switch controller
//!
//! This crate connects the core actors to the outside world:
//! - **DMX**: Art-Net output, one broadcast datagram per universe
//! - **OSC**: preset index, name and channel values over UDP
//! - **Display**: seven-segment rendering of the current preset index
//! - **Storage**: namespaced key-value persistence of configuration and presets
//! - **Web API**: JSON endpoints of the configuration page
//!
//! ## Feature Flags
//!
//! - `osc`: Enable OSC output (requires `rosc`)
//! - `http-api`: Enable web API (requires `axum`, `tower-http`)
//!
//! ## Modules
//!
//! - [`dmx`] - Art-Net sender and actor
//! - [`osc`] - OSC sender and actor
//! - [`display`] - Seven-segment display actor
//! - [`storage`] - Persistence actor and key-value stores
//! - [`handle`] - Request/response access used by the web API
//! - `web` - Web API server (requires `http-api` feature)
//! - [`error`] - Error types

#![allow(missing_docs)]

/// Error types
pub mod error;

/// Request/response access to the running actors
pub mod handle;

/// DMX output (Art-Net)
pub mod dmx;

/// Seven-segment display
pub mod display;

/// Configuration and preset persistence
pub mod storage;

#[cfg(feature = "osc")]
/// OSC client
pub mod osc;

#[cfg(feature = "http-api")]
/// Web API server
pub mod web;

// Re-exports
pub use error::{ControlError, Result};
pub use handle::ControlHandle;

pub use display::{SegmentDriver, SevenSegmentDisplay, TracingSegmentDriver};
pub use dmx::{ArtNetActor, ArtNetSender};
pub use storage::{FileStore, KeyValueStore, MemoryStore, NvsStorage, PersistenceActor};

#[cfg(feature = "osc")]
pub use osc::{OscActor, OscSender};

#[cfg(feature = "http-api")]
pub use web::{WebServer, WebServerConfig};
