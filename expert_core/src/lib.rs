// expert_core/src/lib.rs

mod error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use crate::error::{ExpertError, ExternalFailureKind};

// 1. Message roles understood by the chat completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

// 2. One role-tagged message of a prompt, in the provider's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A selectable expert: display name plus the system prompt that sets its voice.
///
/// Profiles are compiled into the binary and never change at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PersonaProfile {
    pub name: &'static str,
    pub system_prompt: &'static str,
}

// 3. A single user submission: which expert to ask, and what.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub question: String,
}

impl QueryRequest {
    pub fn new(persona: impl Into<String>, question: impl Into<String>) -> Self {
        Self { persona: persona.into(), question: question.into() }
    }

    /// Only a truly empty question is missing; whitespace is forwarded as typed.
    pub fn has_question(&self) -> bool {
        !self.question.is_empty()
    }
}

// 4. The seam between the response service and whatever produces completions.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    // Used in log lines only.
    fn name(&self) -> &'static str;

    /// Sends an ordered prompt and returns the single completion text, verbatim.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ExpertError>;
}
