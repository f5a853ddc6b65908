//! The closed set of messages exchanged between actors
//!
//! Every variant owns its payload. Preset data travels as [`Universe`]
//! buffers that carry their own logical length, so receivers never see
//! capacity bytes past the populated channels.

use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::preset::{Preset, Universe};
use crate::runtime::{Address, Tagged};

/// Copy of the active preset handed to the network senders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetFrame {
    pub index: u8,
    pub name: String,
    pub universe1: Universe,
    pub universe2: Universe,
}

impl PresetFrame {
    pub fn from_preset(preset: &Preset) -> Self {
        Self {
            index: preset.index(),
            name: preset.name().to_string(),
            universe1: preset.universe(0).cloned().unwrap_or_default(),
            universe2: preset.universe(1).cloned().unwrap_or_default(),
        }
    }

    /// Both universes in transmission order
    pub fn universes(&self) -> [&Universe; 2] {
        [&self.universe1, &self.universe2]
    }
}

/// Snapshot of the selector cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorStatus {
    pub num_presets: u8,
    pub current_index: u8,
}

/// Messages between the foot switch, selector, senders, display,
/// persistence and web adapters.
#[derive(Debug, Clone)]
pub enum Message {
    /// Foot switch intent: advance to the next preset
    SelectNext,
    /// Foot switch intent: go back to the previous preset
    SelectPrevious,
    /// Transmit this preset on the network
    SendPreset(PresetFrame),
    /// Show the active preset index on the display
    ShowIndex(u8),
    /// The operator asked for a firmware update from the OTA check window
    OtaRequested,

    RequestConfiguration {
        reply_to: Address<Message>,
    },
    ConfigurationResponse(Result<DeviceConfig, CoreError>),
    SetConfiguration {
        config: DeviceConfig,
        reply_to: Option<Address<Message>>,
    },
    SetConfigurationResponse(Result<(), CoreError>),

    RequestPresets {
        reply_to: Address<Message>,
    },
    PresetsResponse(Result<Vec<Preset>, CoreError>),
    SetPresets {
        presets: Vec<Preset>,
        reply_to: Option<Address<Message>>,
    },
    SetPresetsResponse(Result<(), CoreError>),

    RequestStatus {
        reply_to: Address<Message>,
    },
    StatusResponse(SelectorStatus),
}

impl Message {
    pub const SELECT_NEXT: &'static str = "SelectNext";
    pub const SELECT_PREVIOUS: &'static str = "SelectPrevious";
    pub const SEND_PRESET: &'static str = "SendPreset";
    pub const SHOW_INDEX: &'static str = "ShowIndex";
    pub const OTA_REQUESTED: &'static str = "OtaRequested";
    pub const REQUEST_CONFIGURATION: &'static str = "RequestConfiguration";
    pub const CONFIGURATION_RESPONSE: &'static str = "ConfigurationResponse";
    pub const SET_CONFIGURATION: &'static str = "SetConfiguration";
    pub const SET_CONFIGURATION_RESPONSE: &'static str = "SetConfigurationResponse";
    pub const REQUEST_PRESETS: &'static str = "RequestPresets";
    pub const PRESETS_RESPONSE: &'static str = "PresetsResponse";
    pub const SET_PRESETS: &'static str = "SetPresets";
    pub const SET_PRESETS_RESPONSE: &'static str = "SetPresetsResponse";
    pub const REQUEST_STATUS: &'static str = "RequestStatus";
    pub const STATUS_RESPONSE: &'static str = "StatusResponse";
}

impl Tagged for Message {
    fn tag(&self) -> &'static str {
        match self {
            Message::SelectNext => Self::SELECT_NEXT,
            Message::SelectPrevious => Self::SELECT_PREVIOUS,
            Message::SendPreset(_) => Self::SEND_PRESET,
            Message::ShowIndex(_) => Self::SHOW_INDEX,
            Message::OtaRequested => Self::OTA_REQUESTED,
            Message::RequestConfiguration { .. } => Self::REQUEST_CONFIGURATION,
            Message::ConfigurationResponse(_) => Self::CONFIGURATION_RESPONSE,
            Message::SetConfiguration { .. } => Self::SET_CONFIGURATION,
            Message::SetConfigurationResponse(_) => Self::SET_CONFIGURATION_RESPONSE,
            Message::RequestPresets { .. } => Self::REQUEST_PRESETS,
            Message::PresetsResponse(_) => Self::PRESETS_RESPONSE,
            Message::SetPresets { .. } => Self::SET_PRESETS,
            Message::SetPresetsResponse(_) => Self::SET_PRESETS_RESPONSE,
            Message::RequestStatus { .. } => Self::REQUEST_STATUS,
            Message::StatusResponse(_) => Self::STATUS_RESPONSE,
        }
    }
}

/// Send a response if the request asked for one, logging a lost reply.
pub fn reply(reply_to: Option<&Address<Message>>, response: Message) {
    if let Some(address) = reply_to {
        if let Err(e) = address.send(response) {
            tracing::warn!("Failed to deliver response: {}", e);
        }
    }
}
