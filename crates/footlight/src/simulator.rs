//! Foot switch simulator for hosts without GPIO
//!
//! A stdin reader thread plays the interrupt context: it moves the simulated
//! pin and fires the edge handler, exactly like the hardware interrupt would.

use anyhow::{Context, Result};
use footlight_core::footswitch::{EdgeInterrupt, SimulatedPin};
use footlight_core::DeviceConfig;
use std::io::BufRead;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long a tap holds the switch down
const TAP_HOLD: Duration = Duration::from_millis(120);

/// Extra hold beyond the long-press threshold
const LONG_PRESS_MARGIN: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Press,
    Release,
    Tap,
    LongPress,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "p" => Some(Command::Press),
            "r" => Some(Command::Release),
            "t" => Some(Command::Tap),
            "l" => Some(Command::LongPress),
            "h" | "?" => Some(Command::Help),
            _ => None,
        }
    }
}

pub struct SwitchSimulator {
    pin: Arc<SimulatedPin>,
    interrupt: EdgeInterrupt<SimulatedPin>,
    config: DeviceConfig,
}

impl SwitchSimulator {
    pub fn new(
        pin: Arc<SimulatedPin>,
        interrupt: EdgeInterrupt<SimulatedPin>,
        config: DeviceConfig,
    ) -> Self {
        Self {
            pin,
            interrupt,
            config,
        }
    }

    /// Drive the pin to the logical `pressed` level and fire the edge.
    pub fn set_pressed(&self, pressed: bool) {
        // pressed reads `pin_high == inverted`
        let high = if pressed {
            self.config.switch_polarity_inverted
        } else {
            !self.config.switch_polarity_inverted
        };
        self.pin.set_high(high);

        if let Err(e) = self.interrupt.on_edge() {
            tracing::warn!("Foot switch edge dropped: {}", e);
        }
    }

    pub fn apply(&self, command: Command) {
        match command {
            Command::Press => self.set_pressed(true),
            Command::Release => self.set_pressed(false),
            Command::Tap => self.hold(TAP_HOLD),
            Command::LongPress => {
                let threshold =
                    Duration::from_millis(u64::from(self.config.long_press_threshold_ms));
                self.hold(threshold + LONG_PRESS_MARGIN);
            }
            Command::Help => print_help(),
        }
    }

    fn hold(&self, duration: Duration) {
        self.set_pressed(true);
        thread::sleep(duration);
        self.set_pressed(false);
    }

    /// Read commands from stdin on a dedicated thread until EOF
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("footswitch-sim".to_string())
            .spawn(move || {
                print_help();
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match Command::parse(&line) {
                        Some(command) => self.apply(command),
                        None => println!("Unknown command {:?}, type h for help", line.trim()),
                    }
                }
                tracing::debug!("Foot switch simulator input closed");
            })
            .context("Failed to start foot switch simulator")
    }
}

fn print_help() {
    println!("Foot switch simulator: p = press, r = release, t = tap, l = long press, h = help");
}

#[cfg(test)]
mod tests {
    use super::*;
    use footlight_core::footswitch::edge_channel;
    use footlight_core::{EdgeEvent, InputPin, Mailbox};

    fn simulator(config: DeviceConfig) -> (SwitchSimulator, Mailbox<EdgeEvent>) {
        let pin = Arc::new(SimulatedPin::default());
        let (sender, edges) = edge_channel(8).unwrap();
        let interrupt = EdgeInterrupt::new(pin.clone(), config, sender);
        (SwitchSimulator::new(pin, interrupt, config), edges)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("p\n"), Some(Command::Press));
        assert_eq!(Command::parse(" l "), Some(Command::LongPress));
        assert_eq!(Command::parse("x"), None);
    }

    #[tokio::test]
    async fn test_tap_posts_press_then_release() {
        let (sim, mut edges) = simulator(DeviceConfig::default());
        sim.apply(Command::Tap);

        let press = edges.try_receive().unwrap();
        let release = edges.try_receive().unwrap();
        assert!(press.pressed);
        assert!(!release.pressed);
        assert!(release.at - press.at >= TAP_HOLD);
    }

    #[tokio::test]
    async fn test_press_respects_inverted_polarity() {
        let (sim, mut edges) = simulator(DeviceConfig::new(true, 1000));
        sim.apply(Command::Press);
        assert!(sim.pin.is_high());
        assert!(edges.try_receive().unwrap().pressed);
    }
}
