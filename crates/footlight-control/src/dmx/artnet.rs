//! Art-Net DMX output
//!
//! Art-Net is a UDP-based protocol for transmitting DMX512 over Ethernet.
//! Every send is one fire-and-forget datagram; failures are reported and
//! never retried.

use std::net::{SocketAddr, UdpSocket};

use async_trait::async_trait;
use footlight_core::runtime::{Actor, Mailbox, Tagged};
use footlight_core::{CoreError, Message, PresetFrame, DMX_UNIVERSE_SIZE};

use crate::{error::ControlError, Result};

/// Default Art-Net UDP port
pub const ARTNET_PORT: u16 = 6454;

/// Packet identifier
pub const ARTNET_ID: &[u8; 8] = b"Art-Net\0";

/// OpOutput opcode
pub const OP_OUTPUT: u16 = 0x0050;

/// Protocol version
pub const PROTOCOL_VERSION: u16 = 14;

/// Bytes before the channel data
pub const HEADER_SIZE: usize = 18;

/// Size of the encode buffer and of a full-universe datagram
pub const PACKET_SIZE: usize = HEADER_SIZE + DMX_UNIVERSE_SIZE;

/// Mailbox capacity of the Art-Net actor
pub const ARTNET_QUEUE_CAPACITY: usize = 20;

/// Length on the wire of a packet carrying `channels` channels
pub fn datagram_len(channels: usize) -> usize {
    HEADER_SIZE + channels + channels % 2
}

/// Build an OpOutput packet.
///
/// Only the first [`datagram_len`] bytes are sent.
///
/// Odd lengths are padded to the next even length; every byte past the
/// data is zero. Fails for empty data or more than 512 channels.
pub fn build_packet(sequence: u8, universe: u16, data: &[u8]) -> Result<[u8; PACKET_SIZE]> {
    if data.is_empty() {
        return Err(CoreError::invalid_argument("Art-Net data is empty").into());
    }
    if data.len() > DMX_UNIVERSE_SIZE {
        return Err(CoreError::invalid_argument(format!(
            "Art-Net data length {} exceeds {}",
            data.len(),
            DMX_UNIVERSE_SIZE
        ))
        .into());
    }

    let length = data.len() + data.len() % 2;
    let mut packet = [0u8; PACKET_SIZE];

    // Header: "Art-Net\0"
    packet[0..8].copy_from_slice(ARTNET_ID);

    // OpCode
    packet[8..10].copy_from_slice(&OP_OUTPUT.to_le_bytes());

    // Protocol version
    packet[10..12].copy_from_slice(&PROTOCOL_VERSION.to_le_bytes());

    // Sequence
    packet[12] = sequence;

    // Physical (0)
    packet[13] = 0;

    // Universe
    packet[14..16].copy_from_slice(&universe.to_le_bytes());

    // Length (even)
    packet[16..18].copy_from_slice(&(length as u16).to_le_bytes());

    // DMX data
    packet[HEADER_SIZE..HEADER_SIZE + data.len()].copy_from_slice(data);

    Ok(packet)
}

/// Art-Net sender for outputting DMX data
pub struct ArtNetSender {
    socket: Option<UdpSocket>,
    target: SocketAddr,
    sequence: u8,
}

impl ArtNetSender {
    /// Create an uninitialized sender
    ///
    /// # Arguments
    /// * `target` - Destination address (typically "255.255.255.255:6454")
    pub fn new(target: &str) -> Result<Self> {
        let target: SocketAddr = target.parse().map_err(|e| {
            ControlError::InvalidParameter(format!("Invalid Art-Net target address: {}", e))
        })?;

        Ok(Self {
            socket: None,
            target,
            sequence: 0,
        })
    }

    /// Open the broadcast socket
    pub fn init(&mut self) -> Result<()> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_broadcast(true)?;
        self.socket = Some(socket);

        tracing::info!("Art-Net sender initialized -> {}", self.target);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.socket.is_some()
    }

    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            tracing::info!("Art-Net sender closed");
        }
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Sequence number of the next packet
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Send one universe
    pub fn send_universe(&mut self, universe: u16, data: &[u8]) -> Result<()> {
        let Some(socket) = &self.socket else {
            tracing::error!("Art-Net sender not initialized");
            return Err(CoreError::invalid_state("Art-Net sender not initialized").into());
        };

        let packet = build_packet(self.sequence, universe, data).inspect_err(|e| {
            tracing::error!("Invalid Art-Net data for universe {}: {}", universe, e);
        })?;
        self.sequence = self.sequence.wrapping_add(1);

        socket
            .send_to(&packet[..datagram_len(data.len())], self.target)
            .map_err(ControlError::transport)?;

        tracing::trace!(
            "Sent Art-Net packet: universe {}, {} channels",
            universe,
            data.len()
        );
        Ok(())
    }

    /// Send universe 0 then universe 1, skipping empty ones.
    ///
    /// The first failure is returned without attempting the second send.
    pub fn send_universes(&mut self, universe1: &[u8], universe2: &[u8]) -> Result<()> {
        for (universe, data) in [(0, universe1), (1, universe2)] {
            if !data.is_empty() {
                self.send_universe(universe, data)?;
            }
        }
        Ok(())
    }

    /// Send both universes of a preset
    pub fn send_frame(&mut self, frame: &PresetFrame) -> Result<()> {
        self.send_universes(frame.universe1.as_slice(), frame.universe2.as_slice())
    }
}

/// Actor transmitting every `SendPreset` it receives
pub struct ArtNetActor {
    sender: ArtNetSender,
}

impl ArtNetActor {
    pub fn new(sender: ArtNetSender) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Actor for ArtNetActor {
    type Message = Message;
    const NAME: &'static str = "artnet_sender";

    async fn run(mut self, mut mailbox: Mailbox<Message>) {
        while let Some(message) = mailbox.receive().await {
            match message {
                Message::SendPreset(frame) => {
                    if let Err(e) = self.sender.send_frame(&frame) {
                        tracing::warn!("Art-Net send of preset {} failed: {}", frame.index, e);
                    }
                }
                other => tracing::warn!("Art-Net sender ignoring {}", other.tag()),
            }
        }
        self.sender.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn receiver() -> (UdpSocket, String) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let addr = socket.local_addr().unwrap().to_string();
        (socket, addr)
    }

    #[test]
    fn test_artnet_packet_structure() {
        let packet = build_packet(7, 1, &[255, 128, 64, 32]).unwrap();

        // Check header
        assert_eq!(&packet[0..8], b"Art-Net\0");

        // Check OpCode (little-endian)
        assert_eq!(packet[8], 0x50);
        assert_eq!(packet[9], 0x00);

        // Check protocol version (little-endian)
        assert_eq!(packet[10], 14);
        assert_eq!(packet[11], 0);

        assert_eq!(packet[12], 7);
        assert_eq!(packet[13], 0);

        // Universe
        assert_eq!(packet[14], 1);
        assert_eq!(packet[15], 0);

        // Length
        assert_eq!(packet[16], 4);
        assert_eq!(packet[17], 0);

        assert_eq!(&packet[18..22], &[255, 128, 64, 32]);
        assert_eq!(packet.len(), 18 + 512);
    }

    #[test]
    fn test_invalid_data_rejected() {
        assert!(matches!(
            build_packet(0, 0, &[]),
            Err(ControlError::Core(CoreError::InvalidArgument(_)))
        ));
        assert!(build_packet(0, 0, &[0; 513]).is_err());
    }

    #[test]
    fn test_invalid_target() {
        assert!(ArtNetSender::new("invalid:address").is_err());
    }

    #[test]
    fn test_send_before_init() {
        let mut sender = ArtNetSender::new("255.255.255.255:6454").unwrap();
        assert!(matches!(
            sender.send_universe(0, &[1, 2, 3]),
            Err(ControlError::Core(CoreError::InvalidState(_)))
        ));
        assert_eq!(sender.sequence(), 0);
    }

    #[test]
    fn test_sequence_counts_sends() {
        let (_socket, addr) = receiver();
        let mut sender = ArtNetSender::new(&addr).unwrap();
        sender.init().unwrap();

        for n in 1..=300u32 {
            sender.send_universe(0, &[1]).unwrap();
            assert_eq!(u32::from(sender.sequence()), n % 256);
        }
    }

    #[test]
    fn test_send_universes_order() {
        let (socket, addr) = receiver();
        let mut sender = ArtNetSender::new(&addr).unwrap();
        sender.init().unwrap();

        sender.send_universes(&[1, 2, 3], &[9]).unwrap();

        let mut buf = [0u8; 1024];
        let (len, _) = socket.recv_from(&mut buf).unwrap();
        assert_eq!(len, HEADER_SIZE + 4);
        assert_eq!(buf[12], 0);
        assert_eq!(buf[14], 0);
        assert_eq!(buf[16], 4);
        assert_eq!(&buf[18..22], &[1, 2, 3, 0]);

        let (len, _) = socket.recv_from(&mut buf).unwrap();
        assert_eq!(len, HEADER_SIZE + 2);
        assert_eq!(buf[12], 1);
        assert_eq!(buf[14], 1);
        assert_eq!(buf[16], 2);
        assert_eq!(buf[18], 9);
    }

    #[test]
    fn test_full_universe_datagram() {
        let (socket, addr) = receiver();
        let mut sender = ArtNetSender::new(&addr).unwrap();
        sender.init().unwrap();

        sender.send_universe(0, &[7; DMX_UNIVERSE_SIZE]).unwrap();
        let mut buf = [0u8; 1024];
        let (len, _) = socket.recv_from(&mut buf).unwrap();
        assert_eq!(len, PACKET_SIZE);
        assert_eq!(datagram_len(3), 22);
    }

    #[test]
    fn test_empty_universes_are_skipped() {
        let (_socket, addr) = receiver();
        let mut sender = ArtNetSender::new(&addr).unwrap();
        sender.init().unwrap();

        sender.send_universes(&[], &[5]).unwrap();
        assert_eq!(sender.sequence(), 1);

        sender.close();
        assert!(sender.send_universes(&[1], &[2]).is_err());
    }

    proptest! {
        #[test]
        fn prop_padding_and_zero_fill(data in proptest::collection::vec(1u8..=255, 1..=512)) {
            let packet = build_packet(0, 0, &data).unwrap();
            let length = u16::from_le_bytes([packet[16], packet[17]]) as usize;

            let expected = if data.len() % 2 == 1 { data.len() + 1 } else { data.len() };
            prop_assert_eq!(length, expected);
            prop_assert_eq!(&packet[HEADER_SIZE..HEADER_SIZE + data.len()], &data[..]);
            prop_assert!(packet[HEADER_SIZE + data.len()..].iter().all(|&b| b == 0));
        }
    }
}
