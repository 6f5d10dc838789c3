//! Story, character and reference-prompt loading for `prompt` and `generate`.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Deserialize;

use cineprompt_core::types::Character;

use crate::helpers::expand_tilde;

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Story or screenplay file (`-` reads stdin)
    #[arg(short, long)]
    pub story: String,

    /// Character as "Name=Description" (repeatable)
    #[arg(short = 'c', long = "character")]
    pub characters: Vec<String>,

    /// JSON file with `[{ "name": ..., "description": ... }]`
    #[arg(long = "characters-file")]
    pub characters_file: Option<PathBuf>,

    /// Reference prompt whose style to imitate (repeatable)
    #[arg(short = 'r', long = "reference")]
    pub references: Vec<String>,

    /// File holding one reference prompt (repeatable)
    #[arg(long = "reference-file")]
    pub reference_files: Vec<PathBuf>,
}

/// Everything the prompt compiler needs, validated.
#[derive(Debug, Clone)]
pub struct Inputs {
    /// File name of the story, `None` for stdin.
    pub story_name: Option<String>,
    pub story: String,
    pub characters: Vec<Character>,
    pub references: Vec<String>,
}

impl Inputs {
    pub fn load(args: &InputArgs) -> Result<Self> {
        let (story_name, story) = read_story(&args.story)?;
        if story.trim().is_empty() {
            bail!("the story is empty; write or paste a story first");
        }

        let mut pairs = Vec::new();
        if let Some(path) = &args.characters_file {
            let text = read_file(path)?;
            pairs.extend(parse_characters_json(&text).with_context(|| {
                format!("invalid characters file {}", path.display())
            })?);
        }
        for raw in &args.characters {
            pairs.push(parse_character_flag(raw)?);
        }
        let characters = build_characters(pairs)?;

        let mut raw_references = args.references.clone();
        for path in &args.reference_files {
            raw_references.push(read_file(path)?);
        }

        Ok(Inputs {
            story_name,
            story,
            characters,
            references: clean_references(raw_references),
        })
    }
}

fn read_file(path: &Path) -> Result<String> {
    let path = expand_tilde(&path.to_string_lossy());
    std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read the story from a path, or stdin for `-`.
pub fn read_story(source: &str) -> Result<(Option<String>, String)> {
    if source == "-" {
        let mut story = String::new();
        std::io::stdin()
            .read_to_string(&mut story)
            .context("failed to read story from stdin")?;
        return Ok((None, story));
    }

    let path = PathBuf::from(source);
    let story = read_file(&path)?;
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    Ok((name, story))
}

/// Split `"Name=Description"`.
pub fn parse_character_flag(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, description)) => Ok((name.to_string(), description.to_string())),
        None => bail!("character '{raw}' must look like \"Name=Description\""),
    }
}

#[derive(Debug, Deserialize)]
struct CharacterEntry {
    name: String,
    description: String,
}

pub fn parse_characters_json(text: &str) -> Result<Vec<(String, String)>> {
    let entries: Vec<CharacterEntry> = serde_json::from_str(text)?;
    Ok(entries
        .into_iter()
        .map(|e| (e.name, e.description))
        .collect())
}

/// Trim and validate, assigning sequential ids.
pub fn build_characters(pairs: Vec<(String, String)>) -> Result<Vec<Character>> {
    pairs
        .into_iter()
        .enumerate()
        .map(|(i, (name, description))| {
            let name = name.trim();
            let description = description.trim();
            if name.is_empty() || description.is_empty() {
                bail!("character #{} needs both a name and a description", i + 1);
            }
            Ok(Character::new((i + 1).to_string(), name, description))
        })
        .collect()
}

/// Trim reference prompts and drop blank ones.
pub fn clean_references(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}
