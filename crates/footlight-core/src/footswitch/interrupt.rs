//! Interrupt side of the foot switch
//!
//! The interrupt handler reads the pin, maps the level through the polarity
//! setting and posts one [`EdgeEvent`]. It never blocks and never loops: a
//! full edge mailbox drops the event.

use crate::config::DeviceConfig;
use crate::error::Result;
use crate::runtime::{mailbox, Address, Mailbox};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

/// Edge mailbox capacity
pub const EDGE_QUEUE_CAPACITY: usize = 10;

/// Digital input the foot switch is wired to
pub trait InputPin: Send + Sync + 'static {
    fn is_high(&self) -> bool;
}

/// Pin backed by an atomic level, used on hosts without GPIO and in tests.
///
/// The input idles high (pull-up), so a new pin starts high.
#[derive(Debug)]
pub struct SimulatedPin {
    level: AtomicBool,
}

impl Default for SimulatedPin {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SimulatedPin {
    pub fn new(high: bool) -> Self {
        Self {
            level: AtomicBool::new(high),
        }
    }

    pub fn set_high(&self, high: bool) {
        self.level.store(high, Ordering::Release);
    }
}

impl InputPin for SimulatedPin {
    fn is_high(&self) -> bool {
        self.level.load(Ordering::Acquire)
    }
}

/// Raw edge posted by the interrupt handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    pub pressed: bool,
    pub at: Instant,
}

/// The single producer of edge events. Deliberately not `Clone`.
#[derive(Debug)]
pub struct EdgeSender {
    address: Address<EdgeEvent>,
}

impl EdgeSender {
    pub fn send(&self, event: EdgeEvent) -> Result<()> {
        self.address.send(event)
    }
}

/// Create the single-producer/single-consumer edge channel
pub fn edge_channel(capacity: usize) -> Result<(EdgeSender, Mailbox<EdgeEvent>)> {
    let (address, mailbox) = mailbox("foot_switch_edges", capacity)?;
    Ok((EdgeSender { address }, mailbox))
}

/// Interrupt handler bound to one pin
pub struct EdgeInterrupt<P: InputPin> {
    pin: Arc<P>,
    config: DeviceConfig,
    sender: EdgeSender,
}

impl<P: InputPin> EdgeInterrupt<P> {
    pub fn new(pin: Arc<P>, config: DeviceConfig, sender: EdgeSender) -> Self {
        Self {
            pin,
            config,
            sender,
        }
    }

    /// Whether the switch currently reads as pressed
    pub fn is_pressed(&self) -> bool {
        self.config.is_pressed(self.pin.is_high())
    }

    /// Handle one electrical edge: one read, one non-blocking send.
    pub fn on_edge(&self) -> Result<()> {
        self.sender.send(EdgeEvent {
            pressed: self.is_pressed(),
            at: Instant::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_edge_reads_polarity() {
        let pin = Arc::new(SimulatedPin::default());
        let (sender, mut edges) = edge_channel(4).unwrap();
        let interrupt = EdgeInterrupt::new(pin.clone(), DeviceConfig::default(), sender);

        pin.set_high(false);
        interrupt.on_edge().unwrap();
        pin.set_high(true);
        interrupt.on_edge().unwrap();

        assert!(edges.receive().await.unwrap().pressed);
        assert!(!edges.receive().await.unwrap().pressed);
    }

    #[tokio::test]
    async fn test_inverted_polarity() {
        let pin = Arc::new(SimulatedPin::new(false));
        let (sender, _edges) = edge_channel(1).unwrap();
        let interrupt = EdgeInterrupt::new(pin.clone(), DeviceConfig::new(true, 1000), sender);
        assert!(!interrupt.is_pressed());
        pin.set_high(true);
        assert!(interrupt.is_pressed());
    }

    #[tokio::test]
    async fn test_full_queue_drops_edge() {
        let pin = Arc::new(SimulatedPin::default());
        let (sender, _edges) = edge_channel(1).unwrap();
        let interrupt = EdgeInterrupt::new(pin, DeviceConfig::default(), sender);
        interrupt.on_edge().unwrap();
        assert!(interrupt.on_edge().is_err());
    }
}
