//! Dialog command handlers.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use flowdeck_tui::{Config, SelectEntry, StdioRuntime, TerminalOutput};

use crate::cli::Outcome;

/// Prefix marking a separator entry.
const SEPARATOR_PREFIX: &str = "---";

/// Parses `NAME=VALUE`, `NAME` or `---LABEL`.
pub fn parse_entry(spec: &str) -> Result<SelectEntry> {
    if let Some(label) = spec.strip_prefix(SEPARATOR_PREFIX) {
        let label = label.trim();
        let label = if label.is_empty() { "────" } else { label };
        return Ok(SelectEntry::separator(label));
    }
    let (name, value) = spec.split_once('=').unwrap_or((spec, spec));
    if name.trim().is_empty() {
        anyhow::bail!("Entry '{spec}' has an empty name");
    }
    Ok(SelectEntry::item(name.trim(), value))
}

/// Reads the background lines, or none without a file.
pub fn load_background(path: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read background from {}", path.display()))?;
    Ok(contents.lines().map(str::to_string).collect())
}

/// A dialog runtime on the controlling terminal, drawing on stderr.
pub struct Deck {
    runtime: StdioRuntime,
    background: Vec<String>,
}

impl Deck {
    pub fn open(config: Config, background: Option<&Path>) -> Result<Self> {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!("Dialogs need an interactive terminal on stdin.");
        }
        Ok(Self {
            runtime: StdioRuntime::stdio(config, TerminalOutput::Stderr),
            background: load_background(background)?,
        })
    }

    pub async fn select(&mut self, title: &str, specs: &[String]) -> Result<Outcome> {
        let entries = specs
            .iter()
            .map(|spec| parse_entry(spec))
            .collect::<Result<Vec<_>>>()?;
        let picked = self
            .runtime
            .select(title, entries, &self.background)
            .await
            .context("select dialog")?;
        Ok(print_value(picked))
    }

    pub async fn confirm(&mut self, title: &str, message: &str) -> Result<Outcome> {
        let yes = self
            .runtime
            .confirm(title, message, &self.background)
            .await
            .context("confirm dialog")?;
        Ok(if yes {
            Outcome::Accepted
        } else {
            Outcome::Declined
        })
    }

    pub async fn input(
        &mut self,
        title: &str,
        prompt: &str,
        placeholder: Option<&str>,
    ) -> Result<Outcome> {
        let value = self
            .runtime
            .input(title, prompt, placeholder, &self.background)
            .await
            .context("input dialog")?;
        Ok(print_value(value))
    }

    pub async fn edit(&mut self, title: &str, prompt: &str, initial: &str) -> Result<Outcome> {
        let value = self
            .runtime
            .multiline_input(title, prompt, initial, &self.background)
            .await
            .context("edit dialog")?;
        Ok(print_value(value))
    }
}

fn print_value(value: Option<String>) -> Outcome {
    match value {
        Some(value) => {
            println!("{value}");
            Outcome::Accepted
        }
        None => {
            tracing::debug!("dialog cancelled");
            Outcome::Declined
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_parse_entry_forms() {
        assert_eq!(
            parse_entry("Staging=stage").unwrap(),
            SelectEntry::item("Staging", "stage")
        );
        assert_eq!(parse_entry("main").unwrap(), SelectEntry::item("main", "main"));
        assert_eq!(
            parse_entry("--- remote ").unwrap(),
            SelectEntry::separator("remote")
        );
        assert_eq!(parse_entry("---").unwrap(), SelectEntry::separator("────"));
    }

    #[test]
    fn test_parse_entry_keeps_equals_in_value() {
        assert_eq!(
            parse_entry("Filter=a=b").unwrap(),
            SelectEntry::item("Filter", "a=b")
        );
    }

    #[test]
    fn test_parse_entry_rejects_empty_name() {
        let err = parse_entry("=value").unwrap_err();
        assert!(err.to_string().contains("empty name"));
    }

    #[test]
    fn test_load_background() {
        assert!(load_background(None).unwrap().is_empty());

        let dir = tempdir().unwrap();
        let path = dir.path().join("status.txt");
        fs::write(&path, "On branch main\n\x1b[32mclean\x1b[0m\n").unwrap();

        let lines = load_background(Some(&path)).unwrap();
        assert_eq!(lines, vec!["On branch main", "\x1b[32mclean\x1b[0m"]);

        let err = load_background(Some(&dir.path().join("missing"))).unwrap_err();
        assert!(format!("{err:#}").contains("read background"));
    }
}
