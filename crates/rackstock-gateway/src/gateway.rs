//! High-level AI gateway with mock and apology fallbacks.

use crate::backend::{GenerateRequest, GenerativeBackend, ImageInput};
use crate::error::GatewayError;
use crate::gemini::GeminiBackend;
use crate::mock::mock_analysis;
use crate::prompt::{analysis_prompt, analysis_schema, assistant_instruction};
use log::{debug, info, warn};
use rackstock_config::GatewayConfig;
use rackstock_model::{Analysis, AnalysisMode};
use std::sync::Arc;
use std::time::Duration;

/// Reply shown when no API key is configured.
pub const NOT_CONFIGURED_TEXT: &str = "请先配置 API Key。";
/// Reply shown when the chat request fails.
pub const UNAVAILABLE_TEXT: &str = "AI 服务暂时不可用，请检查网络连接。";
/// Reply shown when the service answers without text.
pub const NO_ANSWER_TEXT: &str = "抱歉，我暂时无法回答这个问题。";

/// Result of [`AiGateway::analyze`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Decoded from a real service response.
    Live(Analysis),
    /// Canned demo data substituted after a failure.
    Fallback { analysis: Analysis, reason: String },
}

impl AnalysisOutcome {
    pub fn analysis(&self) -> &Analysis {
        match self {
            AnalysisOutcome::Live(analysis) => analysis,
            AnalysisOutcome::Fallback { analysis, .. } => analysis,
        }
    }

    pub fn into_analysis(self) -> Analysis {
        match self {
            AnalysisOutcome::Live(analysis) => analysis,
            AnalysisOutcome::Fallback { analysis, .. } => analysis,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AnalysisOutcome::Fallback { .. })
    }
}

/// Result of [`AiGateway::ask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Answer(String),
    Unavailable { reason: String },
    NotConfigured,
}

impl ChatReply {
    /// Text shown to the user for this reply.
    pub fn text(&self) -> &str {
        match self {
            ChatReply::Answer(text) => text,
            ChatReply::Unavailable { .. } => UNAVAILABLE_TEXT,
            ChatReply::NotConfigured => NOT_CONFIGURED_TEXT,
        }
    }
}

/// Entry point for image analysis and chat.
///
/// Without a backend every call takes the fallback path.
#[derive(Clone)]
pub struct AiGateway {
    backend: Option<Arc<dyn GenerativeBackend>>,
    fallback_delay: Duration,
}

impl AiGateway {
    pub fn new(backend: Option<Arc<dyn GenerativeBackend>>, fallback_delay: Duration) -> Self {
        Self {
            backend,
            fallback_delay,
        }
    }

    /// Build a gateway from config; a missing or blank key leaves it unconfigured.
    pub fn from_config(
        config: &GatewayConfig,
        api_key: Option<String>,
    ) -> Result<Self, GatewayError> {
        let backend: Option<Arc<dyn GenerativeBackend>> = match api_key {
            Some(key) if !key.trim().is_empty() => {
                info!(
                    "configured generative backend (model={}, endpoint={})",
                    config.model, config.endpoint
                );
                Some(Arc::new(GeminiBackend::new(config, key)?))
            }
            _ => {
                info!("no api key configured; ai features use fallbacks");
                None
            }
        };
        Ok(Self::new(backend, config.fallback_delay()))
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Run an analysis and report any failure.
    pub async fn try_analyze(
        &self,
        image: &ImageInput,
        mode: AnalysisMode,
    ) -> Result<Analysis, GatewayError> {
        let backend = self.backend.as_ref().ok_or(GatewayError::NotConfigured)?;
        let request = GenerateRequest {
            text: analysis_prompt(mode).to_string(),
            image: Some(image.clone()),
            system_instruction: None,
            response_schema: Some(analysis_schema(mode)),
        };
        let text = backend.generate(request).await?;
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        let value: serde_json::Value = serde_json::from_str(&text)?;
        let analysis = Analysis::from_json(mode, value)?;
        debug!(
            "analysis completed (backend={}, mode={})",
            backend.name(),
            mode
        );
        Ok(analysis)
    }

    /// Run an analysis, substituting demo data after a delay on failure.
    pub async fn analyze(&self, image: &ImageInput, mode: AnalysisMode) -> AnalysisOutcome {
        match self.try_analyze(image, mode).await {
            Ok(analysis) => AnalysisOutcome::Live(analysis),
            Err(err) => {
                warn!(
                    "image analysis failed; using mock data (mode={}, error={})",
                    mode, err
                );
                tokio::time::sleep(self.fallback_delay).await;
                AnalysisOutcome::Fallback {
                    analysis: mock_analysis(mode),
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Ask the assistant a single question grounded on an inventory summary.
    pub async fn ask(&self, message: &str, inventory_context: &str) -> ChatReply {
        let Some(backend) = self.backend.as_ref() else {
            return ChatReply::NotConfigured;
        };
        let request = GenerateRequest {
            text: message.to_string(),
            image: None,
            system_instruction: Some(assistant_instruction(inventory_context)),
            response_schema: None,
        };
        match backend.generate(request).await {
            Ok(text) if text.trim().is_empty() => ChatReply::Answer(NO_ANSWER_TEXT.to_string()),
            Ok(text) => ChatReply::Answer(text),
            Err(err) => {
                warn!("chat request failed (error={})", err);
                ChatReply::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AiGateway, ChatReply, NOT_CONFIGURED_TEXT, UNAVAILABLE_TEXT};
    use crate::GatewayError;
    use crate::backend::ImageInput;
    use pretty_assertions::assert_eq;
    use rackstock_config::GatewayConfig;
    use rackstock_model::AnalysisMode;
    use std::time::Duration;

    #[test]
    fn blank_key_leaves_gateway_unconfigured() {
        let config = GatewayConfig::default();
        let gateway = AiGateway::from_config(&config, Some("  ".to_string())).expect("gateway");
        assert!(!gateway.is_configured());
        let gateway = AiGateway::from_config(&config, Some("k".to_string())).expect("gateway");
        assert!(gateway.is_configured());
    }

    #[tokio::test]
    async fn unconfigured_try_analyze_reports_error() {
        let gateway = AiGateway::new(None, Duration::ZERO);
        let image = ImageInput::new(vec![0], "image/jpeg");
        let err = gateway
            .try_analyze(&image, AnalysisMode::Label)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
    }

    #[tokio::test]
    async fn unconfigured_chat_asks_for_key() {
        let gateway = AiGateway::new(None, Duration::ZERO);
        let reply = gateway.ask("hi", "").await;
        assert_eq!(reply, ChatReply::NotConfigured);
        assert_eq!(reply.text(), NOT_CONFIGURED_TEXT);
    }

    #[test]
    fn unavailable_reply_hides_reason() {
        let reply = ChatReply::Unavailable {
            reason: "timeout".to_string(),
        };
        assert_eq!(reply.text(), UNAVAILABLE_TEXT);
    }
}
