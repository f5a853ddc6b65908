//! DMX output
//!
//! This module provides DMX512 output via Art-Net.
//!
//! ## Art-Net
//!
//! Art-Net is a UDP broadcast protocol for DMX transmission over Ethernet.
//! - Uses UDP broadcast (255.255.255.255:6454)
//! - One datagram per universe, always 18 + 512 bytes
//! - Includes an 8-bit sequence number that wraps
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use footlight_control::dmx::ArtNetSender;
//!
//! # fn main() -> footlight_control::Result<()> {
//! let mut sender = ArtNetSender::new("255.255.255.255:6454")?;
//! sender.init()?;
//!
//! // Universe 0 with three channels, universe 1 skipped
//! sender.send_universes(&[255, 128, 0], &[])?;
//! # Ok(())
//! # }
//! ```

pub mod artnet;

pub use artnet::{build_packet, ArtNetActor, ArtNetSender, ARTNET_PORT, ARTNET_QUEUE_CAPACITY};
