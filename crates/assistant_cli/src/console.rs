//! Line-based interactive input and output.
//!
//! # Invariants
//! - End of input on any read is reported as `AppError::Cancelled`.
//! - Empty input selects the offered default.
//! - Multiline text ends with a line holding a single `.`.

use assistant_core::{AppError, AppResult};
use colored::Colorize;
use log::warn;
use std::io::{BufRead, Write};

/// Terminator line for multiline input.
pub const MULTILINE_END: &str = ".";

/// Interactive boundary used by every command handler.
pub trait Prompt {
    /// Reads one trimmed line; empty input yields `default`.
    fn prompt(&mut self, label: &str, default: &str) -> AppResult<String>;

    /// Reads lines until [`MULTILINE_END`]; empty text yields `default`.
    fn prompt_multiline(&mut self, label: &str, default: &str) -> AppResult<String>;

    fn print(&mut self, message: &str);

    /// Asks a yes/no question until it gets an answer.
    fn confirm(&mut self, question: &str) -> AppResult<bool> {
        loop {
            let answer = self.prompt(&format!("{question} (y/n)"), "")?;
            match answer.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.print("Please answer 'y' or 'n'."),
            }
        }
    }
}

/// Prompt over any buffered reader and writer.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl LineConsole<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> AppResult<String> {
        let mut buffer = String::new();
        match self.input.read_line(&mut buffer) {
            Ok(0) => Err(AppError::Cancelled),
            Ok(_) => Ok(buffer.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                warn!("event=console_read module=cli status=error error={err}");
                Err(AppError::Cancelled)
            }
        }
    }

    fn write_label(&mut self, label: &str, default: &str) {
        let label = format!("{label}:").yellow();
        let _ = if default.is_empty() {
            write!(self.output, "{label} ")
        } else {
            write!(self.output, "{label} [{}] ", default.dimmed())
        };
        let _ = self.output.flush();
    }
}

impl<R: BufRead, W: Write> Prompt for LineConsole<R, W> {
    fn prompt(&mut self, label: &str, default: &str) -> AppResult<String> {
        self.write_label(label, default);
        let line = self.read_line()?;
        let value = line.trim();
        if value.is_empty() {
            return Ok(default.to_string());
        }
        Ok(value.to_string())
    }

    fn prompt_multiline(&mut self, label: &str, default: &str) -> AppResult<String> {
        let _ = writeln!(
            self.output,
            "{} {}",
            format!("{label}:").yellow(),
            format!("(finish with a single '{MULTILINE_END}' line)").dimmed()
        );
        if !default.is_empty() {
            let _ = writeln!(self.output, "{}", "Empty text keeps the current value.".dimmed());
        }

        let mut lines = Vec::new();
        loop {
            let line = self.read_line()?;
            if line.trim() == MULTILINE_END {
                break;
            }
            lines.push(line);
        }

        let text = lines.join("\n");
        if text.trim().is_empty() {
            return Ok(default.to_string());
        }
        Ok(text)
    }

    fn print(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }
}
