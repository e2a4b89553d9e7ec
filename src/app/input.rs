//! Run input: a text file, stdin, or an interactive path prompt.

use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error_handling::InputError;
use crate::parse::{parse_ips, CandidateSet};

const PROMPT: &str = "Enter the path to the text file containing IP addresses: ";

/// Where the run's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A text file on disk
    File(PathBuf),
    /// Standard input, read to EOF
    Stdin,
    /// Prompt for a file path until one yields addresses
    Interactive,
}

impl InputSource {
    /// `-` selects stdin; no path selects the interactive prompt.
    pub fn from_arg(input: Option<&Path>) -> Self {
        match input {
            Some(path) if path.as_os_str() == "-" => InputSource::Stdin,
            Some(path) => InputSource::File(path.to_path_buf()),
            None => InputSource::Interactive,
        }
    }
}

/// Reads candidates from `source`.
///
/// # Errors
///
/// File and stdin input fail with `NotFound`, `Read` or `NoIpsFound`. The
/// interactive prompt only fails when its input ends.
pub fn read_candidates(source: &InputSource) -> Result<CandidateSet, InputError> {
    match source {
        InputSource::File(path) => parse_ips(&read_file(path)?),
        InputSource::Stdin => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            parse_ips(&text)
        }
        InputSource::Interactive => {
            let stdin = std::io::stdin();
            prompt_for_candidates(stdin.lock(), std::io::stdout())
        }
    }
}

/// Prompts for a file path until one yields at least one candidate.
///
/// Surrounding quotes are stripped so paths pasted from a file manager work.
/// A missing file or a file without IPs is reported and prompted again.
///
/// # Errors
///
/// Returns `InputError::NoIpsFound` when `reader` reaches end of input.
pub fn prompt_for_candidates<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
) -> Result<CandidateSet, InputError> {
    loop {
        write!(writer, "{PROMPT}")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            writeln!(writer)?;
            return Err(InputError::NoIpsFound);
        }
        let path = PathBuf::from(strip_quotes(&line));
        if path.as_os_str().is_empty() {
            continue;
        }

        match read_file(&path).and_then(|text| parse_ips(&text)) {
            Ok(candidates) => return Ok(candidates),
            Err(e) => {
                warn!("{e}");
                writeln!(writer, "{e}. Please provide a valid file path.")?;
            }
        }
    }
}

fn read_file(path: &Path) -> Result<String, InputError> {
    if !path.is_file() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    debug!("Reading input from {}", path.display());
    Ok(std::fs::read_to_string(path)?)
}

fn strip_quotes(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}
