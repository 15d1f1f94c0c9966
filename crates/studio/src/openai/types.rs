//! Types for the `OpenAI` chat completion and image generation APIs.

use serde::{Deserialize, Serialize};

/// A role-tagged turn in a chat completion conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// "system", "user" or "assistant".
    pub role: String,
    /// Turn text.
    pub content: String,
}

impl ChatTurn {
    /// Build a system-role turn.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Build a user-role turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Build an assistant-role turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the chat completions API.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model to use (e.g., "gpt-4-turbo").
    pub model: String,
    /// Conversation turns, system first.
    pub messages: Vec<ChatTurn>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// Response from the chat completions API.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated choices (we request exactly one).
    pub choices: Vec<ChatChoice>,
}

/// A single completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: ChatChoiceMessage,
}

/// Message payload of a completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    /// Generated text; absent for refusals.
    pub content: Option<String>,
}

/// Request body for the image generation API.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    /// Model to use (e.g., "dall-e-3").
    pub model: String,
    /// Image prompt.
    pub prompt: String,
    /// Number of images to generate.
    pub n: u32,
    /// Image dimensions (e.g., "1024x1024").
    pub size: String,
}

/// Response from the image generation API.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponse {
    /// Generated images.
    pub data: Vec<ImageData>,
}

/// A single generated image.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    /// Transient URL of the generated image. Expires; callers must copy the
    /// bytes to durable storage.
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_turn_constructors() {
        assert_eq!(ChatTurn::system("x").role, "system");
        assert_eq!(ChatTurn::user("x").role, "user");
        assert_eq!(ChatTurn::assistant("x").role, "assistant");
    }

    #[test]
    fn test_chat_completion_response_deserialization() {
        let json = r#"{
            "choices": [
                { "message": { "role": "assistant", "content": "A bold bezel-set band." } }
            ]
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.choices.len(), 1);
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("A bold bezel-set band.")
        );
    }

    #[test]
    fn test_image_response_deserialization() {
        let json = r#"{ "data": [ { "url": "https://oai.example.com/img.png" } ] }"#;
        let response: ImageResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            response.data[0].url.as_deref(),
            Some("https://oai.example.com/img.png")
        );
    }
}
