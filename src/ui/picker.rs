//! Interactive file picker over scan results

use anyhow::Result;
use console::Term;
use dialoguer::FuzzySelect;

use super::theme::RampTheme;

/// Let the user pick one of `files` by fuzzy search.
///
/// Returns `None` if the user cancels or there is nothing to pick.
pub fn pick_file(prompt: &str, files: &[&str]) -> Result<Option<String>> {
    if files.is_empty() {
        return Ok(None);
    }

    let theme = RampTheme::new();
    let selection = FuzzySelect::with_theme(&theme)
        .with_prompt(format!("{} ({} files)", prompt, files.len()))
        .items(files)
        .default(0)
        .interact_on_opt(&Term::stderr())?;

    Ok(selection.map(|idx| files[idx].to_string()))
}
