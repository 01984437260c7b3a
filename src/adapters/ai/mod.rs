//! AI Gateway Adapters.
//!
//! Implementations of the `AiGateway` port.
//!
//! ## Available Adapters
//!
//! - `GeminiGateway` - Generative Language API (live mode)
//! - `OfflineGateway` - Deterministic local content (no credential)
//! - `MockAiGateway` - Configurable mock for testing

mod gemini_gateway;
mod gemini_types;
mod mock_gateway;
mod offline_gateway;

pub use gemini_gateway::{GeminiChatSession, GeminiConfig, GeminiGateway};
pub use mock_gateway::{MockAiGateway, MockCall, MockChatSession, MockResponse};
pub use offline_gateway::{OfflineChatSession, OfflineGateway};

use std::sync::Arc;

use crate::config::AiConfig;
use crate::ports::AiGateway;

/// Picks the gateway once at startup from credential presence.
///
/// A missing key selects offline mode. A key that cannot be turned into a
/// working client is logged and also falls back to offline mode.
pub fn select_gateway(config: &AiConfig) -> Arc<dyn AiGateway> {
    if !config.has_credential() {
        tracing::info!("No AI credential configured, using offline gateway");
        return Arc::new(OfflineGateway::new());
    }

    match GeminiConfig::from_ai_config(config).and_then(GeminiGateway::new) {
        Ok(gateway) => {
            tracing::info!(model = %gateway.model(), "Using live Gemini gateway");
            Arc::new(gateway)
        }
        Err(err) => {
            tracing::error!(error = %err, "Live gateway unavailable, using offline gateway");
            Arc::new(OfflineGateway::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GatewayMode;

    #[test]
    fn missing_key_selects_offline_mode() {
        let gateway = select_gateway(&AiConfig::default());
        assert_eq!(gateway.mode(), GatewayMode::Offline);
    }

    #[test]
    fn blank_key_selects_offline_mode() {
        let config = AiConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(select_gateway(&config).mode(), GatewayMode::Offline);
    }

    #[test]
    fn key_selects_live_mode() {
        let config = AiConfig {
            api_key: Some("AIza-test".to_string()),
            ..Default::default()
        };
        assert_eq!(select_gateway(&config).mode(), GatewayMode::Live);
    }
}
