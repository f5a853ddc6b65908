//! Preset selector actor
//!
//! Owns the [`PresetBank`], applies foot switch intents to its cursor and
//! fans the newly active preset out to the network senders and the display.

use crate::bank::PresetBank;
use crate::message::{reply, Message, PresetFrame, SelectorStatus};
use crate::runtime::{Actor, Address, Mailbox, Tagged};
use async_trait::async_trait;

/// Mailboxes the selector publishes to
#[derive(Debug, Clone)]
pub struct SelectorTargets {
    pub artnet: Address<Message>,
    pub osc: Address<Message>,
    pub display: Address<Message>,
}

pub struct PresetSelector {
    bank: PresetBank,
    targets: SelectorTargets,
}

impl PresetSelector {
    pub fn new(bank: PresetBank, targets: SelectorTargets) -> Self {
        Self { bank, targets }
    }

    pub fn bank(&self) -> &PresetBank {
        &self.bank
    }

    /// Process one message
    pub fn handle(&mut self, message: Message) {
        match message {
            Message::SelectNext => {
                let index = self.bank.select_next();
                tracing::info!("Selected next preset: {}", index);
                self.publish_current();
            }
            Message::SelectPrevious => {
                let index = self.bank.select_previous();
                tracing::info!("Selected previous preset: {}", index);
                self.publish_current();
            }
            Message::SetPresets { presets, reply_to } => {
                let result = self.bank.replace_all(&presets);
                match &result {
                    Ok(()) => self.publish_current(),
                    Err(e) => tracing::error!("Failed to replace presets: {}", e),
                }
                reply(reply_to.as_ref(), Message::SetPresetsResponse(result));
            }
            Message::RequestPresets { reply_to } => {
                let presets = self.bank.presets().to_vec();
                reply(Some(&reply_to), Message::PresetsResponse(Ok(presets)));
            }
            Message::RequestStatus { reply_to } => {
                let status = SelectorStatus {
                    num_presets: self.bank.num_presets(),
                    current_index: self.bank.current_index(),
                };
                reply(Some(&reply_to), Message::StatusResponse(status));
            }
            other => {
                tracing::warn!("Preset selector ignoring unexpected {}", other.tag());
            }
        }
    }

    /// Send the current preset to both senders and its index to the display
    pub fn publish_current(&self) {
        let preset = self.bank.current_preset();
        let frame = PresetFrame::from_preset(preset);

        self.post(&self.targets.artnet, Message::SendPreset(frame.clone()));
        self.post(&self.targets.osc, Message::SendPreset(frame));
        self.post(
            &self.targets.display,
            Message::ShowIndex(self.bank.current_index()),
        );
    }

    fn post(&self, target: &Address<Message>, message: Message) {
        let tag = message.tag();
        if let Err(e) = target.send(message) {
            tracing::warn!("{} to {} dropped: {}", tag, target.name(), e);
        }
    }
}

#[async_trait]
impl Actor for PresetSelector {
    type Message = Message;
    const NAME: &'static str = "preset_selector";

    async fn run(mut self, mut mailbox: Mailbox<Message>) {
        while let Some(message) = mailbox.receive().await {
            self.handle(message);
        }
    }
}
