//! Request/response access to the running actors
//!
//! Used by the web adapter; every call is a blocking request over a
//! private reply mailbox.

use footlight_core::{
    Address, CoreError, DeviceConfig, Message, Preset, SelectorStatus, MAX_PRESETS, MIN_PRESETS,
};

use crate::Result;

#[derive(Debug, Clone)]
pub struct ControlHandle {
    selector: Address<Message>,
    persistence: Address<Message>,
}

impl ControlHandle {
    pub fn new(selector: Address<Message>, persistence: Address<Message>) -> Self {
        Self {
            selector,
            persistence,
        }
    }

    /// The active presets held by the selector
    pub async fn presets(&self) -> Result<Vec<Preset>> {
        let response = self
            .selector
            .request(
                |reply_to| Message::RequestPresets { reply_to },
                Message::PRESETS_RESPONSE,
            )
            .await?;
        match response {
            Message::PresetsResponse(result) => Ok(result?),
            other => Err(unexpected(Message::PRESETS_RESPONSE, &other)),
        }
    }

    /// Replace the selector's presets, then persist them.
    pub async fn replace_presets(&self, presets: Vec<Preset>) -> Result<()> {
        if !(MIN_PRESETS as usize..=MAX_PRESETS as usize).contains(&presets.len()) {
            return Err(CoreError::invalid_argument(format!(
                "Invalid number of presets: {} (must be {}-{})",
                presets.len(),
                MIN_PRESETS,
                MAX_PRESETS
            ))
            .into());
        }

        let response = self
            .selector
            .request(
                |reply_to| Message::SetPresets {
                    presets: presets.clone(),
                    reply_to: Some(reply_to),
                },
                Message::SET_PRESETS_RESPONSE,
            )
            .await?;
        expect_unit(response, Message::SET_PRESETS_RESPONSE)?;

        let response = self
            .persistence
            .request(
                |reply_to| Message::SetPresets {
                    presets,
                    reply_to: Some(reply_to),
                },
                Message::SET_PRESETS_RESPONSE,
            )
            .await?;
        expect_unit(response, Message::SET_PRESETS_RESPONSE)
    }

    /// The stored device configuration, defaults when nothing is stored
    pub async fn config(&self) -> Result<DeviceConfig> {
        let response = self
            .persistence
            .request(
                |reply_to| Message::RequestConfiguration { reply_to },
                Message::CONFIGURATION_RESPONSE,
            )
            .await?;
        match response {
            Message::ConfigurationResponse(Ok(config)) => Ok(config),
            Message::ConfigurationResponse(Err(CoreError::Persistence(e))) => {
                tracing::debug!("No stored configuration ({}), using defaults", e);
                Ok(DeviceConfig::default())
            }
            Message::ConfigurationResponse(Err(e)) => Err(e.into()),
            other => Err(unexpected(Message::CONFIGURATION_RESPONSE, &other)),
        }
    }

    /// Store a new device configuration. It applies from the next boot.
    pub async fn set_config(&self, config: DeviceConfig) -> Result<()> {
        let response = self
            .persistence
            .request(
                |reply_to| Message::SetConfiguration {
                    config,
                    reply_to: Some(reply_to),
                },
                Message::SET_CONFIGURATION_RESPONSE,
            )
            .await?;
        expect_unit(response, Message::SET_CONFIGURATION_RESPONSE)
    }

    pub async fn status(&self) -> Result<SelectorStatus> {
        let response = self
            .selector
            .request(
                |reply_to| Message::RequestStatus { reply_to },
                Message::STATUS_RESPONSE,
            )
            .await?;
        match response {
            Message::StatusResponse(status) => Ok(status),
            other => Err(unexpected(Message::STATUS_RESPONSE, &other)),
        }
    }
}

fn expect_unit(response: Message, expected: &'static str) -> Result<()> {
    match response {
        Message::SetPresetsResponse(result) | Message::SetConfigurationResponse(result) => {
            Ok(result?)
        }
        other => Err(unexpected(expected, &other)),
    }
}

fn unexpected(expected: &'static str, received: &Message) -> crate::ControlError {
    use footlight_core::Tagged;
    CoreError::UnexpectedMessage {
        expected,
        received: received.tag(),
    }
    .into()
}
