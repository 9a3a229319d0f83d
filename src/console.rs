//! Interactive console prompts.
//!
//! Reader and writer are explicit parameters so prompting can be unit
//! tested without touching process stdin.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// Prompt for a single marker word, re-asking until a non-empty line arrives.
///
/// # Errors
/// Returns an error if the input stream closes before a marker is entered.
pub fn prompt_marker(label: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    loop {
        write!(output, "{}", label)?;
        output.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("Failed to read from input")?;
        if read == 0 {
            anyhow::bail!("Input closed before a marker was entered");
        }

        let word = line.trim();
        if !word.is_empty() {
            return Ok(word.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_marker_trims_input() {
        let mut input = Cursor::new("  cat  \n");
        let mut output = Vec::new();
        let word = prompt_marker("Enter the word to be searched: ", &mut input, &mut output).unwrap();
        assert_eq!(word, "cat");
        assert_eq!(String::from_utf8(output).unwrap(), "Enter the word to be searched: ");
    }

    #[test]
    fn test_prompt_marker_reasks_on_blank_line() {
        let mut input = Cursor::new("\n  \nmat\n");
        let mut output = Vec::new();
        let word = prompt_marker("> ", &mut input, &mut output).unwrap();
        assert_eq!(word, "mat");
        // Prompt repeated once per blank line
        assert_eq!(String::from_utf8(output).unwrap(), "> > > ");
    }

    #[test]
    fn test_prompt_marker_errors_on_closed_input() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(prompt_marker("> ", &mut input, &mut output).is_err());
    }
}
