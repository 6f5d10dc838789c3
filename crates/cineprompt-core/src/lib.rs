//! Core of CinePrompt: shot-list types, the prompt compiler, JSON recovery,
//! the generation error taxonomy, configuration, and plain-text export.
//!
//! Nothing in this crate touches the network; see `cineprompt-providers`.

pub mod config;
pub mod error;
pub mod export;
pub mod prompt;
pub mod recovery;
pub mod types;
pub mod utils;

pub use error::{ErrorKind, GenerationError, ParseFailure};
pub use types::{Character, Scene, Shot};
