//! Seven-segment display adapter
//!
//! Segment bits: bit 0 = A ... bit 6 = G, bit 7 = decimal point. The segment
//! outputs are active-low.

use async_trait::async_trait;
use footlight_core::runtime::{Actor, Mailbox, Tagged};
use footlight_core::{CoreError, Message};

/// Mailbox capacity of the display actor
pub const DISPLAY_QUEUE_CAPACITY: usize = 10;

/// Decimal point bit
pub const SEGMENT_DP: u8 = 0b1000_0000;

const DIGIT_PATTERNS: [u8; 16] = [
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
    0b0111_0111, // A
    0b0111_1100, // b
    0b0011_1001, // C
    0b0101_1110, // d
    0b0111_1001, // E
    0b0111_0001, // F
];

/// Segment pattern for a displayable character
pub fn segment_pattern(character: char) -> Option<u8> {
    match character {
        '0'..='9' | 'A'..='F' | 'a'..='f' => character
            .to_digit(16)
            .map(|digit| DIGIT_PATTERNS[digit as usize]),
        '-' => Some(0b0100_0000),
        '_' => Some(0b0000_1000),
        '=' => Some(0b0100_1000),
        '.' => Some(SEGMENT_DP),
        ' ' => Some(0),
        _ => None,
    }
}

/// Output levels for segments A..G and DP. A lit segment is driven low.
pub fn pin_levels(pattern: u8) -> [bool; 8] {
    std::array::from_fn(|segment| pattern & (1 << segment) == 0)
}

/// The eight segment outputs
pub trait SegmentDriver: Send + 'static {
    fn write(&mut self, levels: [bool; 8]);
}

/// Driver for hosts without a display: logs the pattern
#[derive(Debug, Default)]
pub struct TracingSegmentDriver;

impl SegmentDriver for TracingSegmentDriver {
    fn write(&mut self, levels: [bool; 8]) {
        let lit: String = levels
            .iter()
            .zip("ABCDEFG.".chars())
            .filter(|(level, _)| !**level)
            .map(|(_, name)| name)
            .collect();
        tracing::info!("Display segments: [{}]", lit);
    }
}

pub struct SevenSegmentDisplay<D: SegmentDriver> {
    driver: D,
    pattern: u8,
}

impl<D: SegmentDriver> SevenSegmentDisplay<D> {
    /// Create a blank display
    pub fn new(mut driver: D) -> Self {
        driver.write(pin_levels(0));
        Self { driver, pattern: 0 }
    }

    /// Pattern currently shown, decimal point included
    pub fn pattern(&self) -> u8 {
        self.pattern
    }

    /// Show one character, optionally with the decimal point.
    ///
    /// Unknown characters are rejected and leave the display unchanged.
    pub fn show_digit(&mut self, character: char, dot: bool) -> Result<(), CoreError> {
        let Some(pattern) = segment_pattern(character) else {
            tracing::warn!("Cannot display character {:?}", character);
            return Err(CoreError::invalid_argument(format!(
                "Character {:?} cannot be displayed",
                character
            )));
        };

        self.pattern = if dot { pattern | SEGMENT_DP } else { pattern };
        self.driver.write(pin_levels(self.pattern));
        Ok(())
    }

    /// Show a preset index: hex digit of `index % 16`, decimal point from 16 on
    pub fn show_index(&mut self, index: u8) -> Result<(), CoreError> {
        let digit = char::from_digit(u32::from(index % 16), 16)
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('-');
        self.show_digit(digit, index >= 16)
    }
}

#[async_trait]
impl<D: SegmentDriver> Actor for SevenSegmentDisplay<D> {
    type Message = Message;
    const NAME: &'static str = "display";

    async fn run(mut self, mut mailbox: Mailbox<Message>) {
        while let Some(message) = mailbox.receive().await {
            match message {
                Message::ShowIndex(index) => {
                    if let Err(e) = self.show_index(index) {
                        tracing::warn!("Display update failed: {}", e);
                    }
                }
                other => tracing::warn!("Display ignoring {}", other.tag()),
            }
        }
    }
}
