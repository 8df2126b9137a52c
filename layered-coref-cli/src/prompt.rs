//! Pickers backed by command line arguments with an interactive fallback.

use dialoguer::{theme::ColorfulTheme, Input};
use layered_coref::Prompt;
use std::path::PathBuf;

/// Answers the first prompt with `seed`, then asks `read` for every retry.
///
/// An empty answer, end of input or a read error cancels the pick.
pub fn seeded<F>(seed: Option<PathBuf>, mut read: F) -> impl FnMut(Prompt) -> Option<PathBuf>
where
    F: FnMut(Prompt) -> anyhow::Result<Option<String>>,
{
    let mut seed = seed;
    move |prompt: Prompt| {
        if let Some(path) = seed.take() {
            return Some(path);
        }
        match read(prompt) {
            Ok(Some(line)) => {
                let line = line.trim();
                (!line.is_empty()).then(|| PathBuf::from(line))
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Could not read answer: {}", e);
                None
            }
        }
    }
}

/// Ask for a path on the terminal. Leaving the answer empty cancels.
pub fn ask_path(prompt: Prompt) -> anyhow::Result<Option<String>> {
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{} (empty to cancel)", prompt))
        .allow_empty(true)
        .interact_text()?;
    Ok(Some(answer))
}
