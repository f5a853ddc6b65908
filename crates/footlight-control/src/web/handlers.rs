//! Request/response bodies of the web API

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use footlight_core::{CoreError, DeviceConfig, Preset};
use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Error turned into a JSON body: 400 for validation failures, 500 otherwise
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        let status = match &err {
            ControlError::Core(CoreError::InvalidArgument(_))
            | ControlError::Core(CoreError::OutOfRange { .. })
            | ControlError::InvalidParameter(_)
            | ControlError::JsonError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("API error: {}", self.message);
        } else {
            tracing::warn!("Rejected API request: {}", self.message);
        }
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

/// One preset as exchanged with the configuration page.
///
/// Responses always carry 512 values per universe; requests may send fewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetDto {
    #[serde(default)]
    pub index: u8,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub universe1: Vec<u8>,
    #[serde(default)]
    pub universe2: Vec<u8>,
}

impl From<&Preset> for PresetDto {
    fn from(preset: &Preset) -> Self {
        let frame = |u: u8| {
            preset
                .universe(u)
                .map(|universe| universe.to_frame().to_vec())
                .unwrap_or_default()
        };
        Self {
            index: preset.index(),
            name: preset.name().to_string(),
            universe1: frame(0),
            universe2: frame(1),
        }
    }
}

impl From<PresetDto> for Preset {
    fn from(dto: PresetDto) -> Self {
        Preset::with_data(dto.index, &dto.name, &dto.universe1, &dto.universe2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Polarity {
    Normal,
    Inverse,
}

/// Device configuration as shown on the configuration page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    pub foot_switch_polarity: Polarity,
    pub foot_switch_long_press_time: u16,
}

impl ConfigDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.foot_switch_long_press_time == 0 {
            return Err("footSwitchLongPressTime must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl From<DeviceConfig> for ConfigDto {
    fn from(config: DeviceConfig) -> Self {
        Self {
            foot_switch_polarity: if config.switch_polarity_inverted {
                Polarity::Inverse
            } else {
                Polarity::Normal
            },
            foot_switch_long_press_time: config.long_press_threshold_ms,
        }
    }
}

impl From<ConfigDto> for DeviceConfig {
    fn from(dto: ConfigDto) -> Self {
        DeviceConfig::new(
            dto.foot_switch_polarity == Polarity::Inverse,
            dto.foot_switch_long_press_time,
        )
    }
}

/// System status response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub version: String,
    pub num_presets: u8,
    pub current_index: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success(42);
        assert!(response.success);
        assert_eq!(response.data, Some(42));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_preset_dto_is_zero_filled() {
        let preset = Preset::with_data(2, "Amber", &[200, 100], &[]);
        let dto = PresetDto::from(&preset);
        assert_eq!(dto.universe1.len(), 512);
        assert_eq!(dto.universe2.len(), 512);
        assert_eq!(&dto.universe1[..3], &[200, 100, 0]);
    }

    #[test]
    fn test_config_json_shape() {
        let dto = ConfigDto::from(DeviceConfig::new(true, 1200));
        let json = serde_json::to_value(dto).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "footSwitchPolarity": "INVERSE",
                "footSwitchLongPressTime": 1200
            })
        );

        let parsed: ConfigDto = serde_json::from_value(serde_json::json!({
            "footSwitchPolarity": "NORMAL",
            "footSwitchLongPressTime": 800
        }))
        .unwrap();
        assert_eq!(DeviceConfig::from(parsed), DeviceConfig::new(false, 800));
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        let err = ApiError::from(ControlError::from(CoreError::invalid_argument("bad")));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = ApiError::from(ControlError::from(CoreError::MailboxClosed {
            actor: "persistence",
        }));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
