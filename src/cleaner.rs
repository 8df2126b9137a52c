//! Text cleaning stage.
//!
//! The pipeline only relies on the [`TextCleaner`] contract: given the
//! corpus name, its raw file, and the intermediate directory, produce a
//! cleaned text file and return its path. [`WhitespaceCleaner`] is the
//! cleaner the CLI uses.

use crate::errors::BoxError;
use std::fs;
use std::path::{Path, PathBuf};

/// Produces a cleaned copy of a raw input file.
pub trait TextCleaner {
    /// Clean `file_path` and return the path of the cleaned file.
    fn clean(&self, file_name: &str, file_path: &Path, tmp_out_dir: &Path)
        -> Result<PathBuf, BoxError>;
}

impl<F> TextCleaner for F
where
    F: Fn(&str, &Path, &Path) -> Result<PathBuf, BoxError>,
{
    fn clean(
        &self,
        file_name: &str,
        file_path: &Path,
        tmp_out_dir: &Path,
    ) -> Result<PathBuf, BoxError> {
        self(file_name, file_path, tmp_out_dir)
    }
}

/// Normalizes whitespace and strips control characters.
///
/// Writes `{tmp_out_dir}/{file_name}_cleaned.txt`.
#[derive(Debug, Clone)]
pub struct WhitespaceCleaner {
    /// Longest run of blank lines kept between paragraphs.
    max_blank_lines: usize,
}

impl WhitespaceCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_blank_lines` consecutive blank lines.
    pub fn with_max_blank_lines(max_blank_lines: usize) -> Self {
        Self { max_blank_lines }
    }

    /// Normalize a text without touching the filesystem.
    pub fn normalize(&self, text: &str) -> String {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines: Vec<String> = Vec::new();
        let mut blank_run = 0;

        for line in text.lines() {
            let line: String = line
                .chars()
                .filter(|c| *c == '\t' || !c.is_control())
                .collect();
            let line = line.trim_end();

            if line.is_empty() {
                blank_run += 1;
                if lines.is_empty() || blank_run > self.max_blank_lines {
                    continue;
                }
            } else {
                blank_run = 0;
            }
            lines.push(line.to_string());
        }

        while lines.last().map_or(false, |l| l.is_empty()) {
            lines.pop();
        }

        if lines.is_empty() {
            return String::new();
        }
        let mut cleaned = lines.join("\n");
        cleaned.push('\n');
        cleaned
    }
}

impl Default for WhitespaceCleaner {
    fn default() -> Self {
        Self { max_blank_lines: 1 }
    }
}

impl TextCleaner for WhitespaceCleaner {
    fn clean(
        &self,
        file_name: &str,
        file_path: &Path,
        tmp_out_dir: &Path,
    ) -> Result<PathBuf, BoxError> {
        let raw = fs::read_to_string(file_path)?;
        let cleaned_path = tmp_out_dir.join(format!("{}_cleaned.txt", file_name));
        fs::write(&cleaned_path, self.normalize(&raw))?;
        Ok(cleaned_path)
    }
}
