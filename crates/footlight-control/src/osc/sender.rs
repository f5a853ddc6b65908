//! OSC client: encodes messages and sends one UDP datagram per message

use std::net::{SocketAddr, UdpSocket};

use async_trait::async_trait;
use footlight_core::runtime::{Actor, Mailbox, Tagged};
use footlight_core::{CoreError, Message, PresetFrame};
use rosc::{encoder, OscMessage, OscPacket, OscType};

use super::types::{channels_to_osc, type_tags, IntoOscArgs};
use crate::{error::ControlError, Result};

/// Default OSC destination port
pub const OSC_DEFAULT_PORT: u16 = 8000;

/// Mailbox capacity of the OSC actor
pub const OSC_QUEUE_CAPACITY: usize = 10;

/// Encode a single OSC message.
///
/// Addresses must start with `/`. The encoded length is always a multiple
/// of four.
pub fn encode_message(address: &str, args: Vec<OscType>) -> Result<Vec<u8>> {
    if !address.starts_with('/') {
        return Err(CoreError::invalid_argument(format!(
            "OSC address must start with '/': {:?}",
            address
        ))
        .into());
    }

    let packet = OscPacket::Message(OscMessage {
        addr: address.to_string(),
        args,
    });
    encoder::encode(&packet).map_err(|e| ControlError::OscError(format!("{:?}", e)))
}

/// OSC client sending to a fixed destination
pub struct OscSender {
    socket: Option<UdpSocket>,
    target: SocketAddr,
    prefix: String,
}

impl OscSender {
    /// Create an uninitialized sender.
    ///
    /// `prefix` is prepended to the preset mirror addresses, e.g. `/footlight`.
    pub fn new(target: &str, prefix: &str) -> Result<Self> {
        let target: SocketAddr = target.parse().map_err(|e| {
            ControlError::InvalidParameter(format!("Invalid OSC target address: {}", e))
        })?;

        Ok(Self {
            socket: None,
            target,
            prefix: prefix.trim_end_matches('/').to_string(),
        })
    }

    pub fn init(&mut self) -> Result<()> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        self.socket = Some(socket);

        tracing::info!("OSC sender initialized -> {}", self.target);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.socket.is_some()
    }

    pub fn close(&mut self) {
        self.socket = None;
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Send a message with a single value or a list of values
    pub fn send_message<V: IntoOscArgs>(&self, address: &str, value: V) -> Result<()> {
        self.send_args(address, value.into_osc_args())
    }

    fn send_args(&self, address: &str, args: Vec<OscType>) -> Result<()> {
        let Some(socket) = &self.socket else {
            tracing::error!("OSC sender not initialized");
            return Err(CoreError::invalid_state("OSC sender not initialized").into());
        };

        let tags = type_tags(&args);
        let bytes = encode_message(address, args)?;
        socket
            .send_to(&bytes, self.target)
            .map_err(ControlError::transport)?;

        tracing::trace!("Sent OSC message {} {} ({} bytes)", address, tags, bytes.len());
        Ok(())
    }

    /// Mirror the active preset: index, name and each non-empty universe.
    pub fn send_preset(&self, frame: &PresetFrame) -> Result<()> {
        self.send_message(
            &format!("{}/preset/index", self.prefix),
            i32::from(frame.index),
        )?;
        self.send_message(&format!("{}/preset/name", self.prefix), frame.name.as_str())?;

        for (number, universe) in (1..).zip(frame.universes()) {
            if universe.is_empty() {
                continue;
            }
            self.send_args(
                &format!("{}/universe/{}", self.prefix, number),
                channels_to_osc(universe.as_slice()),
            )?;
        }
        Ok(())
    }
}

/// Actor mirroring every `SendPreset` it receives over OSC
pub struct OscActor {
    sender: OscSender,
}

impl OscActor {
    pub fn new(sender: OscSender) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Actor for OscActor {
    type Message = Message;
    const NAME: &'static str = "osc_sender";

    async fn run(mut self, mut mailbox: Mailbox<Message>) {
        while let Some(message) = mailbox.receive().await {
            match message {
                Message::SendPreset(frame) => {
                    if let Err(e) = self.sender.send_preset(&frame) {
                        tracing::warn!("OSC send of preset {} failed: {}", frame.index, e);
                    }
                }
                other => tracing::warn!("OSC sender ignoring {}", other.tag()),
            }
        }
        self.sender.close();
    }
}
