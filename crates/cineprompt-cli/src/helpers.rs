//! Shared CLI helpers — path expansion, banners, progress and error output.

use std::path::PathBuf;

use colored::Colorize;

use cineprompt_core::error::GenerationError;
use cineprompt_core::utils::truncate_string;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print a section banner.
pub fn print_banner(title: &str) {
    println!();
    println!("{}", format!("🎬 CinePrompt — {title}").cyan().bold());
    println!();
}

/// Progress line on stderr while a request is in flight.
pub fn print_waiting(message: &str) {
    eprint!("{}", format!("⠿ {message}").dimmed());
}

/// Clear the progress line.
pub fn clear_waiting() {
    eprint!("\r{}\r", " ".repeat(60));
}

/// Print what the error message alone does not say: a retry hint for
/// transient failures and, with `verbose`, the provider body or raw model text.
pub fn print_error_details(err: &GenerationError, verbose: bool) {
    if is_transient(err) {
        eprintln!("{}", "  This is usually temporary; try again in a moment.".yellow());
    }
    if verbose {
        if let Some(detail) = err.diagnostic() {
            eprintln!("{}", truncate_string(detail, 2000).dimmed());
        }
    } else if err.diagnostic().is_some() {
        eprintln!("{}", "  Re-run with --logs to see the raw response.".dimmed());
    }
}

/// Whether the same request may succeed if simply retried.
pub fn is_transient(err: &GenerationError) -> bool {
    matches!(
        err,
        GenerationError::Network(_) | GenerationError::Timeout(_) | GenerationError::RateLimit { .. }
    )
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/stories/heist.md");
        assert!(result.ends_with("stories/heist.md"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        let result = expand_tilde("/absolute/story.txt");
        assert_eq!(result, PathBuf::from("/absolute/story.txt"));
    }

    #[test]
    fn transient_errors() {
        assert!(is_transient(&GenerationError::Network("reset".into())));
        assert!(is_transient(&GenerationError::Timeout(std::time::Duration::from_secs(120))));
        assert!(!is_transient(&GenerationError::Cancelled));
        assert!(!is_transient(&GenerationError::EmptyResult));
    }

    #[test]
    fn expand_tilde_relative() {
        let result = expand_tilde("story.txt");
        assert_eq!(result, PathBuf::from("story.txt"));
    }
}
