//! Web adapter: JSON configuration API
//!
//! - `GET/POST /api/presets` - read or replace all presets
//! - `GET/POST /api/config` - read or store the foot switch configuration
//! - `GET /api/status` - version and selector cursor

pub mod handlers;
pub mod routes;
pub mod server;

pub use handlers::{ApiResponse, ConfigDto, Polarity, PresetDto};
pub use server::{build_app, AppState, WebServer, WebServerConfig};
