//! JSON recovery — turns the model's raw reply into a validated shot list.
//!
//! Stages, in order:
//! 1. strip markdown code fences (with or without a language tag)
//! 2. parse the whole text; accept an array or a `{ "scenes": [...] }` wrapper
//! 3. otherwise parse the slice from the first `[` to the last `]`
//! 4. reject an empty array
//! 5. reject elements that are not scene objects
//!
//! Nothing beyond bracket slicing is repaired. Missing scene or shot fields
//! decode as empty rather than failing the whole list.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{GenerationError, ParseFailure};
use crate::types::Scene;
use crate::utils::truncate_string;

static CODE_FENCE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"```(?:\w+)?\s*").ok());

/// Remove every markdown code-fence marker and trim the result.
pub fn strip_code_fences(text: &str) -> String {
    match CODE_FENCE.as_ref() {
        Some(re) => re.replace_all(text, "").trim().to_string(),
        None => text.replace("```", "").trim().to_string(),
    }
}

/// Recover a `Vec<Scene>` from raw model output.
pub fn recover(text: &str) -> Result<Vec<Scene>, GenerationError> {
    let cleaned = strip_code_fences(text);

    let items = match parse_direct(&cleaned) {
        Some(items) => items,
        None => {
            debug!("direct parse failed, falling back to bracket slicing");
            parse_bracketed(&cleaned).map_err(|failure| {
                warn!(
                    reason = %failure,
                    raw = %truncate_string(text, 500),
                    "could not recover JSON from AI response"
                );
                GenerationError::Parse {
                    failure,
                    raw: text.to_string(),
                }
            })?
        }
    };

    if items.is_empty() {
        return Err(GenerationError::EmptyResult);
    }

    if let Some(index) = items.iter().position(|item| !item.is_object()) {
        warn!(index, "AI response array holds a non-object element");
        return Err(GenerationError::Parse {
            failure: ParseFailure::Schema,
            raw: text.to_string(),
        });
    }

    serde_json::from_value::<Vec<Scene>>(Value::Array(items)).map_err(|e| {
        warn!(error = %e, "AI response does not match the scene schema");
        GenerationError::Parse {
            failure: ParseFailure::Schema,
            raw: text.to_string(),
        }
    })
}

/// Parse the whole cleaned text: an array, or an object wrapping `scenes`.
fn parse_direct(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("scenes") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Parse the region between the first `[` and the last `]`, inclusive.
fn parse_bracketed(text: &str) -> Result<Vec<Value>, ParseFailure> {
    let (start, end) = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(ParseFailure::NoArray),
    };

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Array(items)) => Ok(items),
        _ => Err(ParseFailure::Malformed),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::Shot;

    fn sample_scenes() -> Vec<Scene> {
        vec![
            Scene {
                scene_number: 1,
                scene_title: "The Room".to_string(),
                shots: vec![
                    Shot {
                        shot_number: 1,
                        shot_type: "Wide Shot".to_string(),
                        camera_angle: "Eye Level".to_string(),
                        camera_movement: "Static".to_string(),
                        description: "Establish the room".to_string(),
                        image_prompt: "A bare room, single chair, [morning] light".to_string(),
                    },
                    Shot {
                        shot_number: 2,
                        shot_type: "Close-Up".to_string(),
                        camera_angle: "Low Angle".to_string(),
                        camera_movement: "Slow push in".to_string(),
                        description: "His face".to_string(),
                        image_prompt: "weathered face, \"quiet\" resolve".to_string(),
                    },
                ],
            },
            // Duplicate numbering is kept as emitted.
            Scene {
                scene_number: 1,
                scene_title: "Again".to_string(),
                shots: vec![],
            },
        ]
    }

    #[test]
    fn test_round_trip() {
        let scenes = sample_scenes();
        let text = serde_json::to_string_pretty(&scenes).unwrap();
        assert_eq!(recover(&text).unwrap(), scenes);
    }

    #[test]
    fn test_fenced_and_surrounded_by_prose() {
        let scenes = sample_scenes();
        let json = serde_json::to_string(&scenes).unwrap();
        let text = format!(
            "Sure! Here is your shot list:\n\n```json\n{json}\n```\n\nLet me know if you need changes."
        );
        assert_eq!(recover(&text).unwrap(), scenes);
    }

    #[test]
    fn test_fence_without_language_tag() {
        let scenes = sample_scenes();
        let json = serde_json::to_string(&scenes).unwrap();
        let text = format!("```\n{json}\n```");
        assert_eq!(recover(&text).unwrap(), scenes);
    }

    #[test]
    fn test_fence_with_uppercase_tag() {
        let scenes = sample_scenes();
        let json = serde_json::to_string(&scenes).unwrap();
        let text = format!("```JSON\n{json}\n```");
        assert_eq!(recover(&text).unwrap(), scenes);
    }

    #[test]
    fn test_scenes_wrapper_is_unwrapped() {
        let scenes = sample_scenes();
        let text = serde_json::json!({ "scenes": scenes }).to_string();
        assert_eq!(recover(&text).unwrap(), sample_scenes());
    }

    #[test]
    fn test_object_without_scenes_falls_back_to_brackets() {
        let scenes = sample_scenes();
        let text = serde_json::json!({ "result": scenes }).to_string();
        // The bracket slice is the inner array.
        assert_eq!(recover(&text).unwrap(), sample_scenes());
    }

    #[test]
    fn test_no_brackets_is_no_array() {
        let err = recover("I'm sorry, I can't do that.").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        match err {
            GenerationError::Parse { failure, raw } => {
                assert_eq!(failure, ParseFailure::NoArray);
                assert_eq!(raw, "I'm sorry, I can't do that.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reversed_brackets_is_no_array() {
        match recover("] nothing here [").unwrap_err() {
            GenerationError::Parse { failure, .. } => assert_eq!(failure, ParseFailure::NoArray),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_array() {
        let text = r#"Here: [{"sceneNumber": 1, "sceneTitle": "x", "shots": [],}] done"#;
        match recover(text).unwrap_err() {
            GenerationError::Parse { failure, .. } => assert_eq!(failure, ParseFailure::Malformed),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_array_is_empty_result() {
        assert_eq!(recover("[]").unwrap_err().kind(), ErrorKind::EmptyResult);
        assert_eq!(
            recover("```json\n[]\n```").unwrap_err().kind(),
            ErrorKind::EmptyResult
        );
        assert_eq!(
            recover(r#"{"scenes": []}"#).unwrap_err().kind(),
            ErrorKind::EmptyResult
        );
    }

    #[test]
    fn test_non_object_elements_are_schema_errors() {
        for text in [r#"[1, 2, 3]"#, r#"["scene one"]"#, r#"[{"sceneNumber": 1}, null]"#] {
            match recover(text).unwrap_err() {
                GenerationError::Parse { failure, raw } => {
                    assert_eq!(failure, ParseFailure::Schema);
                    assert_eq!(raw, text);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_shot_field_keeps_the_list() {
        let text = r#"[{"sceneNumber": 1, "sceneTitle": "Dock", "shots": [
            {"shotNumber": 1, "shotType": "Wide Shot", "cameraAngle": "Eye Level",
             "description": "Fog over the water", "imagePrompt": "foggy dock at dawn"}
        ]}]"#;
        let scenes = recover(text).unwrap();
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].shots[0].camera_movement, "");
        assert_eq!(scenes[0].shots[0].image_prompt, "foggy dock at dawn");
    }

    #[test]
    fn test_string_scene_number_is_accepted() {
        let text = r#"[{"sceneNumber": "1", "sceneTitle": "Dock", "shots": [{"shotNumber": "2"}]}]"#;
        let scenes = recover(text).unwrap();
        assert_eq!(scenes[0].scene_number, 1);
        assert_eq!(scenes[0].shots[0].shot_number, 2);
    }

    #[test]
    fn test_object_without_scene_fields_is_kept() {
        let scenes = recover(r#"[{"title": "no scene fields"}]"#).unwrap();
        assert_eq!(scenes[0].scene_title, "");
        assert!(scenes[0].shots.is_empty());
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("  ```\n[1]```  "), "[1]");
        assert_eq!(strip_code_fences("[1]"), "[1]");
    }
}
