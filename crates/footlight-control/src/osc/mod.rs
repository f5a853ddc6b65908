//! OSC (Open Sound Control) output
//!
//! Messages are encoded with `rosc` and sent as one UDP datagram each. Only
//! sending is supported.

pub mod sender;
pub mod types;

pub use sender::{encode_message, OscActor, OscSender, OSC_DEFAULT_PORT, OSC_QUEUE_CAPACITY};
pub use types::IntoOscArgs;
