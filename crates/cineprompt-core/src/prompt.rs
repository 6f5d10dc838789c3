//! Prompt compiler — builds the single instruction string sent to the model.
//!
//! Fixed instructions come first and the story comes last, so the formatting
//! contract the recovery stage relies on is read before the variable content.

use crate::types::Character;

const ROLE_BLOCK: &str = r#"You are an elite cinematographer, award-winning film director, and expert AI image generation prompt engineer. Your expertise encompasses Hollywood blockbusters, indie films, art house cinema, and visual storytelling at the highest level.

## YOUR MISSION
Analyze the provided story/screenplay with extreme attention to detail. Break it down into individual scenes, and for each scene, plan the optimal shots that a world-class director would use. Then generate a detailed, production-ready image prompt for each shot.

## KEY PRINCIPLES
1. **Visual Storytelling**: Every shot must serve the narrative and advance the story
2. **Emotional Impact**: Use camera angles, lighting, and composition to amplify emotion
3. **Continuity**: Maintain visual consistency across all shots in a scene
4. **Cinematic Quality**: Think like Roger Deakins, Emmanuel Lubezki, or Janusz Kamiński
5. **Production Value**: Each prompt should produce a frame worthy of a theatrical release

## CAMERA ANGLES & SHOT TYPES TO USE
- Extreme Wide Shot (EWS): Establishing scale and environment
- Wide Shot (WS): Full scene context, geography
- Medium Wide Shot (MWS): Characters within environment
- Medium Shot (MS): Waist-up, standard dialogue coverage
- Medium Close-Up (MCU): Chest-up, emotional dialogue
- Close-Up (CU): Face/object detail, peak emotion
- Extreme Close-Up (ECU): Eyes, hands, critical details
- Over-the-Shoulder (OTS): Conversation perspective
- Two-Shot: Two characters in frame
- Point of View (POV): Character's direct perspective
- Bird's Eye View: Directly overhead
- Low Angle: Power, dominance, heroism
- High Angle: Vulnerability, smallness
- Dutch Angle/Tilt: Tension, psychological unease
- Tracking/Dolly Shot: Following movement smoothly
- Crane Shot: Sweeping, epic reveals
- Steadicam: Immersive following
- Whip Pan: Energetic transition
- Rack Focus: Shifting attention between foreground/background
- Silhouette Shot: Dramatic backlit framing"#;

const REFERENCE_HEADER: &str = "\n\n## REFERENCE PROMPT STYLE\nStudy these reference prompts with extreme care. Your generated prompts MUST match their exact style, structure, level of detail, terminology, and artistic approach:\n\n";

const REFERENCE_FOOTER: &str = "CRITICAL: Match the above prompt style exactly. Use similar formatting, similar level of detail, similar descriptive language, and similar technical terminology.\n";

const DEFAULT_STYLE_BLOCK: &str = r#"

## PROMPT STYLE GUIDELINES
Generate highly detailed, vivid image prompts suitable for AI image generation tools (Midjourney, DALL-E, Stable Diffusion, Flux). Each prompt should include:
- Detailed subject/character description
- Environment and setting details
- Lighting conditions (direction, quality, color temperature)
- Mood and atmosphere
- Color palette and tone
- Camera angle and lens information
- Composition details (rule of thirds, leading lines, etc.)
- Style references (cinematic, photorealistic, etc.)
- Technical details (depth of field, film grain, etc.)
"#;

const CHARACTER_HEADER: &str = "\n## CHARACTER DESCRIPTIONS — ABSOLUTE CONSISTENCY REQUIRED\nThese are the exact character descriptions you MUST use in EVERY shot where the character appears. NEVER change, modify, or deviate from these descriptions. Character consistency is CRITICAL.\n\n";

const CHARACTER_FOOTER: &str = "IMPORTANT: When a character appears in a shot, always include their FULL description from above to maintain visual consistency across all generated images.\n";

const OUTPUT_FORMAT_BLOCK: &str = r#"
## OUTPUT FORMAT
Return ONLY a valid JSON array. No markdown code blocks, no backticks, no explanatory text before or after the JSON.

The exact JSON structure must be:
[
  {
    "sceneNumber": 1,
    "sceneTitle": "Descriptive scene title",
    "shots": [
      {
        "shotNumber": 1,
        "shotType": "Wide Shot / Establishing",
        "cameraAngle": "Eye Level Wide Angle",
        "cameraMovement": "Slow dolly forward",
        "description": "Brief narrative description of what this shot shows and its purpose",
        "imagePrompt": "The complete, detailed image generation prompt with all visual details, lighting, composition, character descriptions, environment, mood, camera specs, and style..."
      }
    ]
  }
]

## IMPORTANT RULES
1. Generate shots for EVERY scene in the story
2. Include establishing shots, dialogue coverage, reaction shots, insert shots, and transition shots
3. Each image prompt should be self-contained (include all necessary details)
4. Maintain character description consistency across ALL shots
5. Return ONLY valid JSON — no other text, no markdown code blocks

## STORY/SCREENPLAY TO ANALYZE

"#;

/// Compile the instruction prompt.
///
/// Pure: the same inputs always produce the same text, and `story` is always
/// a strict suffix of the result. Reference prompts and character
/// descriptions are echoed verbatim, in the order given.
pub fn compile(story: &str, characters: &[Character], reference_prompts: &[String]) -> String {
    let mut prompt = String::with_capacity(
        ROLE_BLOCK.len() + OUTPUT_FORMAT_BLOCK.len() + DEFAULT_STYLE_BLOCK.len() + story.len(),
    );
    prompt.push_str(ROLE_BLOCK);

    if reference_prompts.is_empty() {
        prompt.push_str(DEFAULT_STYLE_BLOCK);
    } else {
        prompt.push_str(REFERENCE_HEADER);
        for (i, reference) in reference_prompts.iter().enumerate() {
            prompt.push_str(&format!("### Reference Prompt {}:\n{}\n\n", i + 1, reference));
        }
        prompt.push_str(REFERENCE_FOOTER);
    }

    if !characters.is_empty() {
        prompt.push_str(CHARACTER_HEADER);
        for character in characters {
            prompt.push_str(&format!("### {}\n{}\n\n", character.name, character.description));
        }
        prompt.push_str(CHARACTER_FOOTER);
    }

    prompt.push_str(OUTPUT_FORMAT_BLOCK);
    prompt.push_str(story);
    prompt
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const STORY: &str = "INT. ROOM - DAY\nA man sits alone.";

    #[test]
    fn test_compile_is_deterministic() {
        let chars = vec![Character::new("1", "Mara", "Tall, silver hair")];
        let refs = vec!["moody noir, 35mm".to_string()];
        assert_eq!(compile(STORY, &chars, &refs), compile(STORY, &chars, &refs));
    }

    #[test]
    fn test_story_is_strict_suffix() {
        let prompt = compile(STORY, &[], &[]);
        assert!(prompt.ends_with(STORY));
        assert!(prompt.len() > STORY.len());
        assert!(prompt.ends_with(&format!("## STORY/SCREENPLAY TO ANALYZE\n\n{STORY}")));
    }

    #[test]
    fn test_default_style_without_references() {
        let prompt = compile(STORY, &[], &[]);
        assert!(prompt.contains("## PROMPT STYLE GUIDELINES"));
        assert!(!prompt.contains("## REFERENCE PROMPT STYLE"));

        // Default style block comes before the story.
        let style = prompt.find("## PROMPT STYLE GUIDELINES").unwrap();
        let story = prompt.rfind(STORY).unwrap();
        assert!(style < story);
    }

    #[test]
    fn test_reference_block_replaces_default_style() {
        let refs = vec![
            "cinematic still, teal and orange".to_string(),
            "watercolor, soft edges".to_string(),
        ];
        let prompt = compile(STORY, &[], &refs);

        assert!(prompt.contains("## REFERENCE PROMPT STYLE"));
        assert!(!prompt.contains("## PROMPT STYLE GUIDELINES"));
        assert!(prompt.contains("### Reference Prompt 1:\ncinematic still, teal and orange\n\n"));
        assert!(prompt.contains("### Reference Prompt 2:\nwatercolor, soft edges\n\n"));
        assert!(prompt.contains("CRITICAL: Match the above prompt style exactly."));

        let first = prompt.find("### Reference Prompt 1").unwrap();
        let second = prompt.find("### Reference Prompt 2").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_characters_echoed_verbatim() {
        let chars = vec![
            Character::new("a", "Mara", "Tall woman, silver bob haircut,\nred trench coat"),
            Character::new("b", "Theo", "Boy of ten, freckles"),
        ];
        let prompt = compile(STORY, &chars, &[]);

        assert!(prompt.contains("## CHARACTER DESCRIPTIONS"));
        assert!(prompt.contains("### Mara\nTall woman, silver bob haircut,\nred trench coat\n\n"));
        assert!(prompt.contains("### Theo\nBoy of ten, freckles\n\n"));
        assert!(prompt.contains("always include their FULL description"));
    }

    #[test]
    fn test_no_character_block_without_characters() {
        let prompt = compile(STORY, &[], &[]);
        assert!(!prompt.contains("## CHARACTER DESCRIPTIONS"));
    }

    #[test]
    fn test_section_order() {
        let chars = vec![Character::new("1", "Mara", "Tall")];
        let refs = vec!["ref".to_string()];
        let prompt = compile(STORY, &chars, &refs);

        let role = prompt.find("## CAMERA ANGLES & SHOT TYPES TO USE").unwrap();
        let refs_at = prompt.find("## REFERENCE PROMPT STYLE").unwrap();
        let chars_at = prompt.find("## CHARACTER DESCRIPTIONS").unwrap();
        let format_at = prompt.find("## OUTPUT FORMAT").unwrap();
        let story_at = prompt.find("## STORY/SCREENPLAY TO ANALYZE").unwrap();

        assert!(role < refs_at);
        assert!(refs_at < chars_at);
        assert!(chars_at < format_at);
        assert!(format_at < story_at);
    }

    #[test]
    fn test_schema_example_present() {
        let prompt = compile("story", &[], &[]);
        for field in [
            "\"sceneNumber\"",
            "\"sceneTitle\"",
            "\"shots\"",
            "\"shotNumber\"",
            "\"shotType\"",
            "\"cameraAngle\"",
            "\"cameraMovement\"",
            "\"description\"",
            "\"imagePrompt\"",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_empty_story_still_suffix() {
        let prompt = compile("", &[], &[]);
        assert!(prompt.ends_with("## STORY/SCREENPLAY TO ANALYZE\n\n"));
    }
}
