//! Terminal presentation capability.
//!
//! Chosen once at startup; the reporter asks it to paint text and never
//! checks the platform or terminal itself.

use std::io::IsTerminal;

use colored::{ColoredString, Colorize};

use crate::config::{ColorChoice, CONFIDENCE_HIGH_THRESHOLD, CONFIDENCE_MEDIUM_THRESHOLD};

/// Semantic tones the reporter can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Green
    Success,
    /// Yellow
    Warning,
    /// Red
    Danger,
    /// Cyan
    Info,
    /// Magenta
    Accent,
}

/// How reporter output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// No escape codes
    Plain,
    /// ANSI colors
    AnsiColor,
}

impl Presentation {
    /// Resolves the user's color choice against the current terminal.
    pub fn detect(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Always => Presentation::AnsiColor,
            ColorChoice::Never => Presentation::Plain,
            ColorChoice::Auto => {
                let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
                if !no_color && std::io::stdout().is_terminal() {
                    Presentation::AnsiColor
                } else {
                    Presentation::Plain
                }
            }
        }
    }

    /// Makes `colored` follow this presentation for the rest of the process,
    /// log output included. Call once at startup.
    pub fn apply(self) {
        colored::control::set_override(self == Presentation::AnsiColor);
    }

    /// Renders `text` in `tone` (unchanged for `Plain`).
    pub fn paint(&self, text: &str, tone: Tone) -> String {
        match self {
            Presentation::Plain => text.to_string(),
            Presentation::AnsiColor => {
                let colored: ColoredString = match tone {
                    Tone::Success => text.green(),
                    Tone::Warning => text.yellow(),
                    Tone::Danger => text.red(),
                    Tone::Info => text.cyan(),
                    Tone::Accent => text.magenta(),
                };
                colored.to_string()
            }
        }
    }
}

/// Tone for an abuse confidence score.
pub fn confidence_tone(score: u8) -> Tone {
    if score >= CONFIDENCE_HIGH_THRESHOLD {
        Tone::Danger
    } else if score >= CONFIDENCE_MEDIUM_THRESHOLD {
        Tone::Warning
    } else {
        Tone::Success
    }
}
