use serde::{Deserialize, Serialize};

/// Message role in a chat request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for `POST /v1/chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Single-turn request: exactly one user message
    pub fn single_turn(
        model: impl Into<String>,
        prompt: impl Into<String>,
        max_tokens: u32,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::user(prompt)],
            max_tokens,
            temperature,
        }
    }
}

/// Response body; only the fields we read are modelled. Absent and
/// `null` collections both read as "no choice".
///
/// `content` covers providers that return a top-level list of text
/// parts instead of `choices`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
    #[serde(default)]
    pub content: Option<Vec<ContentPart>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
    /// Legacy completion-style choices carry bare text
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    pub text: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice (or first content part), if non-blank
    pub fn first_text(&self) -> Option<&str> {
        let text = match self.choices.as_deref().and_then(<[_]>::first) {
            Some(choice) => choice
                .message
                .as_ref()
                .and_then(|m| m.content.as_deref())
                .or(choice.text.as_deref()),
            None => self
                .content
                .as_deref()
                .and_then(<[_]>::first)
                .and_then(|p| p.text.as_deref()),
        }?;

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
