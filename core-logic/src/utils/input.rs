use crate::traits::InputSource;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Interactive stdin source: collects lines until the first empty line.
pub struct PromptSource;

impl InputSource for PromptSource {
    fn read_lines(&mut self, prompt: &str) -> Result<Vec<String>> {
        println!("{}", prompt);
        io::stdout().flush().ok();

        let stdin = io::stdin();
        let mut lines = Vec::new();
        for line in stdin.lock().lines() {
            let line = line.context("Failed to read from stdin")?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            lines.push(trimmed.to_string());
        }
        Ok(lines)
    }
}

/// File-backed source: every non-empty, non-comment line of the file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InputSource for FileSource {
    fn read_lines(&mut self, _prompt: &str) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }
}

/// Fixed-line source for tests and scripted runs.
pub struct StaticSource {
    lines: Vec<String>,
}

impl StaticSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for StaticSource {
    fn read_lines(&mut self, _prompt: &str) -> Result<Vec<String>> {
        Ok(std::mem::take(&mut self.lines))
    }
}
