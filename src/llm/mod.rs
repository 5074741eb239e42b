//! # Chat Model Backend
//!
//! The third-party text-generation service is reached through the
//! [`ChatModel`] trait. [`OpenAiChatModel`] talks to any OpenAI-compatible
//! `chat/completions` endpoint; tests plug in scripted implementations.

mod openai;

pub use openai::{
    OpenAiChatModel, OpenAiSettings, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};

use crate::error::Result;
use serde::Serialize;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature; `None` keeps the backend default
    pub temperature: Option<f32>,
    /// Ask the backend for a JSON object reply
    pub json_output: bool,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: None,
            json_output: false,
        }
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Content of the user message, if any.
    #[must_use]
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rfind(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    /// Content of the system message, if any.
    #[must_use]
    pub fn system_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }
}

/// A text-generation backend.
///
/// Implementations block until the reply is available; the generator fans
/// calls out across coroutines itself.
pub trait ChatModel: Send + Sync {
    /// Return the content of the first reply message.
    ///
    /// # Errors
    ///
    /// `Generation` for transport failures, non-2xx responses and empty replies.
    fn complete(&self, request: &ChatRequest) -> Result<String>;
}
