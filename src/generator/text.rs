use super::archetype::Archetype;
use super::prompts;
use super::validate::accept_reply;
use crate::error::{MockError, Result};
use crate::llm::{ChatModel, ChatRequest};
use crate::model::MockEndpoint;
use std::sync::Arc;
use tracing::{debug, warn};

/// Temperature used when rewriting descriptions.
pub const ENHANCE_TEMPERATURE: f32 = 0.7;

/// Result of the optional description rewrite.
///
/// Enhancement failure is not an error: generation continues with the
/// caller's text and the reason is kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionOutcome {
    Enhanced { original: String, enhanced: String },
    Original { text: String, reason: String },
}

impl DescriptionOutcome {
    /// The text generation should continue with.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            DescriptionOutcome::Enhanced { enhanced, .. } => enhanced,
            DescriptionOutcome::Original { text, .. } => text,
        }
    }

    #[must_use]
    pub fn is_enhanced(&self) -> bool {
        matches!(self, DescriptionOutcome::Enhanced { .. })
    }
}

/// Prompt-level wrapper around a [`ChatModel`].
#[derive(Clone)]
pub struct TextGenerator {
    model: Arc<dyn ChatModel>,
}

impl TextGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Rewrite `description` into a more detailed one, or keep it on failure.
    pub fn enhance_description(&self, description: &str) -> DescriptionOutcome {
        let request = ChatRequest::new(prompts::enhance_system(), description)
            .temperature(ENHANCE_TEMPERATURE);
        match self.model.complete(&request) {
            Ok(reply) if !reply.trim().is_empty() => {
                debug!(enhanced = %reply.trim(), "Description enhanced");
                DescriptionOutcome::Enhanced {
                    original: description.to_string(),
                    enhanced: reply.trim().to_string(),
                }
            }
            Ok(_) => DescriptionOutcome::Original {
                text: description.to_string(),
                reason: "empty enhancement reply".to_string(),
            },
            Err(e) => {
                warn!(error = %e, "Description enhancement failed, using original text");
                DescriptionOutcome::Original {
                    text: description.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Raw entity-name reply; normalization happens in the namer.
    pub fn propose_entity_name(&self, description: &str) -> Result<String> {
        let request = ChatRequest::new(prompts::entity_name_system(), description);
        let reply = self.model.complete(&request)?;
        if reply.trim().is_empty() {
            return Err(MockError::generation("entity name reply was empty"));
        }
        Ok(reply)
    }

    /// Request and validate one endpoint definition for `archetype`.
    pub fn propose_endpoint(
        &self,
        archetype: Archetype,
        entity: &str,
        description: &str,
    ) -> Result<MockEndpoint> {
        let system = prompts::endpoint_system(archetype, entity)?;
        let request = ChatRequest::new(system, description).json_output();
        let reply = self.model.complete(&request)?;
        accept_reply(archetype, entity, &reply)
    }
}
