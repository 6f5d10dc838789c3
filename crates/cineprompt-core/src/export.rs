//! Plain-text export of a generated shot list.

use chrono::{DateTime, Utc};

use crate::types::{total_shots, Character, Scene};

const WRAP_WIDTH: usize = 70;
const RULE_WIDTH: usize = 55;

/// Metadata printed at the top of an export.
#[derive(Clone, Debug)]
pub struct ExportHeader {
    /// Story file name; `None` prints "Untitled".
    pub story_name: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub provider_name: String,
    pub model: String,
}

/// Default export file name, e.g. `cineprompt-shots-1718000000000.txt`.
pub fn default_export_filename(at: DateTime<Utc>) -> String {
    format!("cineprompt-shots-{}.txt", at.timestamp_millis())
}

/// Render the boxed plain-text report.
pub fn render_text(header: &ExportHeader, characters: &[Character], scenes: &[Scene]) -> String {
    let mut out = String::new();
    out.push_str("╔══════════════════════════════════════════════════════════╗\n");
    out.push_str("║         CINEPROMPT STUDIO — Shot Prompt Export          ║\n");
    out.push_str("╚══════════════════════════════════════════════════════════╝\n\n");
    out.push_str(&format!(
        "Story: {}\n",
        header.story_name.as_deref().unwrap_or("Untitled")
    ));
    out.push_str(&format!(
        "Generated: {}\n",
        header.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Provider: {}\n", header.provider_name));
    out.push_str(&format!("Model: {}\n", header.model));
    out.push_str(&format!("Total Scenes: {}\n", scenes.len()));
    out.push_str(&format!("Total Shots: {}\n", total_shots(scenes)));

    if !characters.is_empty() {
        let rule = "─".repeat(RULE_WIDTH);
        out.push_str(&format!("\n{rule}\nCHARACTERS\n{rule}\n\n"));
        for c in characters {
            out.push_str(&format!("{}:\n{}\n\n", c.name, c.description));
        }
    }

    let rule = "═".repeat(RULE_WIDTH);
    out.push_str(&format!("\n{rule}\nSHOT PROMPTS\n{rule}\n"));

    let scene_rule = "━".repeat(RULE_WIDTH);
    for scene in scenes {
        out.push_str(&format!(
            "\n\n{scene_rule}\nSCENE {}: {}\n{scene_rule}\n",
            scene.scene_number, scene.scene_title
        ));

        for shot in &scene.shots {
            out.push_str(&format!(
                "\n┌─ Shot {} ─────────────────────────\n",
                shot.shot_number
            ));
            out.push_str(&format!("│ Type: {}\n", shot.shot_type));
            out.push_str(&format!("│ Camera: {}\n", shot.camera_angle));
            out.push_str(&format!("│ Movement: {}\n", shot.camera_movement));
            out.push_str(&format!("│ Description: {}\n", shot.description));
            out.push_str("├──────────────────────────────────\n");
            out.push_str("│ IMAGE PROMPT:\n│\n");
            for line in wrap(&shot.image_prompt, WRAP_WIDTH) {
                out.push_str(&format!("│ {}\n", line));
            }
            out.push_str("└──────────────────────────────────\n");
        }
    }

    out
}

/// Hard-wrap `text` into chunks of at most `width` characters.
///
/// Newlines end a chunk and blank lines are dropped. Text with no printable
/// chunk is returned as a single line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in text.lines() {
        let chars: Vec<char> = segment.chars().collect();
        for chunk in chars.chunks(width) {
            lines.push(chunk.iter().collect());
        }
    }
    if lines.is_empty() {
        lines.push(text.to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Shot;
    use chrono::TimeZone;

    fn header() -> ExportHeader {
        ExportHeader {
            story_name: Some("heist.md".to_string()),
            generated_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap(),
            provider_name: "Google Gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
        }
    }

    fn scenes() -> Vec<Scene> {
        vec![Scene {
            scene_number: 1,
            scene_title: "The Vault".to_string(),
            shots: vec![Shot {
                shot_number: 1,
                shot_type: "Wide Shot".to_string(),
                camera_angle: "High Angle".to_string(),
                camera_movement: "Crane down".to_string(),
                description: "Reveal the vault".to_string(),
                image_prompt: "x".repeat(150),
            }],
        }]
    }

    #[test]
    fn test_header_fields() {
        let text = render_text(&header(), &[], &scenes());
        assert!(text.contains("Story: heist.md\n"));
        assert!(text.contains("Generated: 2025-06-01 12:30:00 UTC\n"));
        assert!(text.contains("Provider: Google Gemini\n"));
        assert!(text.contains("Model: gemini-2.0-flash\n"));
        assert!(text.contains("Total Scenes: 1\n"));
        assert!(text.contains("Total Shots: 1\n"));
        assert!(!text.contains("CHARACTERS"));
    }

    #[test]
    fn test_untitled_story() {
        let mut h = header();
        h.story_name = None;
        assert!(render_text(&h, &[], &scenes()).contains("Story: Untitled\n"));
    }

    #[test]
    fn test_characters_section() {
        let chars = vec![Character::new("1", "Vera", "Safecracker, grey beanie")];
        let text = render_text(&header(), &chars, &scenes());
        assert!(text.contains("CHARACTERS"));
        assert!(text.contains("Vera:\nSafecracker, grey beanie\n\n"));
    }

    #[test]
    fn test_scene_and_shot_blocks() {
        let text = render_text(&header(), &[], &scenes());
        assert!(text.contains("SCENE 1: The Vault\n"));
        assert!(text.contains("┌─ Shot 1 "));
        assert!(text.contains("│ Type: Wide Shot\n"));
        assert!(text.contains("│ Camera: High Angle\n"));
        assert!(text.contains("│ Movement: Crane down\n"));
        assert!(text.contains("│ Description: Reveal the vault\n"));
    }

    #[test]
    fn test_image_prompt_wrapped_at_70() {
        let text = render_text(&header(), &[], &scenes());
        let expected = format!("│ {}\n│ {}\n│ {}\n", "x".repeat(70), "x".repeat(70), "x".repeat(10));
        assert!(text.contains(&expected));
    }

    #[test]
    fn test_wrap_drops_blank_lines() {
        assert_eq!(wrap("ab\n\ncd", 70), vec!["ab", "cd"]);
        assert_eq!(wrap("", 70), vec![""]);
    }

    #[test]
    fn test_default_export_filename() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(default_export_filename(at), "cineprompt-shots-1700000000123.txt");
    }
}
