//! Core types for CinePrompt — the shot list the pipeline produces and the
//! chat-completions wire types shared by the OpenAI-compatible providers.
//!
//! `Scene` and `Shot` mirror the JSON contract the model is asked to emit, so
//! the field names on the wire are camelCase.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Shot list
// ─────────────────────────────────────────────

/// One narrative beat of the story and the camera shots that cover it.
///
/// Numbers are whatever the model emitted; they are not renumbered and may
/// repeat or skip. Missing fields decode as empty, and numbers may arrive as
/// numeric strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default, deserialize_with = "lenient::number")]
    pub scene_number: u32,
    #[serde(default, deserialize_with = "lenient::text")]
    pub scene_title: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub shots: Vec<Shot>,
}

/// A single camera shot with its ready-to-use image-generation prompt.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Shot {
    #[serde(default, deserialize_with = "lenient::number")]
    pub shot_number: u32,
    #[serde(default, deserialize_with = "lenient::text")]
    pub shot_type: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub camera_angle: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub camera_movement: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub image_prompt: String,
}

/// Field decoders for model output, which drifts from the requested schema.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Integer-valued numbers or numeric strings; anything else is 0.
    pub fn number<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
        let value = Value::deserialize(de)?;
        let n = match &value {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<u64>().ok().or_else(|| s.parse::<f64>().ok().and_then(whole))
            }
            _ => None,
        };
        Ok(n.and_then(|n| u32::try_from(n).ok()).unwrap_or(0))
    }

    fn whole(f: f64) -> Option<u64> {
        (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then_some(f as u64)
    }

    /// Strings as-is, `null` as empty, other scalars in their JSON form.
    pub fn text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    /// `null` as an empty list.
    pub fn list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
    }
}

/// Total number of shots across all scenes.
pub fn total_shots(scenes: &[Scene]) -> usize {
    scenes.iter().map(|s| s.shots.len()).sum()
}

// ─────────────────────────────────────────────
// Characters
// ─────────────────────────────────────────────

/// A user-authored character description, repeated verbatim in every shot
/// where the character appears.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Character {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Character {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Messages (OpenAI chat completions format)
// ─────────────────────────────────────────────

/// A chat message in the OpenAI format.
///
/// Each variant maps to a `role` field value. Cohere's v2 chat endpoint
/// accepts the same shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: String },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }
}

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Partial chat completion response from an OpenAI-compatible API.
///
/// Every field is optional: providers disagree on what they send back, and
/// the adapters decide which absences are errors.
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub choices: Option<Vec<ChatChoice>>,
}

/// A single choice in a chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<AssistantMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message within a chat completion choice.
#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
