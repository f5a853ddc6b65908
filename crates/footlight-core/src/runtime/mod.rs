//! Message-passing runtime
//!
//! Every component runs as an [`Actor`] on its own task with a private,
//! bounded [`Mailbox`]. Components never share mutable state; they exchange
//! value-typed messages through [`Address`] handles.

pub mod actor;
pub mod mailbox;

pub use actor::{spawn, Actor};
pub use mailbox::{mailbox, Address, Mailbox, Received, Tagged};
