//! Terminal [`ReviewUi`]: a side-by-side diff followed by a menu.

use dialoguer::{theme::ColorfulTheme, Input, Select};
use layered_coref::{DiffResult, Finisher, ReviewUi, Span};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// What the reviewer picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Finish with the produced text.
    Accept,
    /// Finish with the original text.
    Keep,
    /// Finish with the contents of an edited file.
    Edit(PathBuf),
    /// Leave without finishing.
    Quit,
    /// Input that names no action; asked again.
    Unknown(String),
}

/// Where review choices come from.
pub trait ChoiceSource {
    fn choose(&mut self, label: &str) -> anyhow::Result<Choice>;
}

const ACTIONS: [&str; 4] = [
    "Accept produced text",
    "Keep original text",
    "Use an edited file",
    "Quit without finishing",
];

/// Interactive menu on the controlling terminal.
#[derive(Default)]
pub struct MenuChoices {
    theme: ColorfulTheme,
}

impl ChoiceSource for MenuChoices {
    fn choose(&mut self, label: &str) -> anyhow::Result<Choice> {
        let picked = Select::with_theme(&self.theme)
            .with_prompt(format!("Review ({} with accept, keep or edit)", label))
            .items(&ACTIONS)
            .default(0)
            .interact_opt()?;

        Ok(match picked {
            Some(0) => Choice::Accept,
            Some(1) => Choice::Keep,
            Some(2) => {
                let path: String = Input::with_theme(&self.theme)
                    .with_prompt("Edited file")
                    .allow_empty(true)
                    .interact_text()?;
                match path.trim() {
                    "" => Choice::Unknown(String::new()),
                    path => Choice::Edit(PathBuf::from(path)),
                }
            }
            _ => Choice::Quit,
        })
    }
}

/// Prints the comparison to `output` and finishes with the reviewer's choice.
pub struct TerminalReview<C, W> {
    choices: C,
    output: W,
    original: String,
    produced: String,
    action: Option<(String, Finisher<String>)>,
}

impl<C: ChoiceSource, W: Write> TerminalReview<C, W> {
    pub fn new(choices: C, output: W) -> Self {
        Self {
            choices,
            output,
            original: String::new(),
            produced: String::new(),
            action: None,
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    /// The text a choice finishes with, `None` to keep asking.
    fn resolve(&mut self, choice: Choice) -> anyhow::Result<Option<String>> {
        match choice {
            Choice::Accept => Ok(Some(self.produced.clone())),
            Choice::Keep => Ok(Some(self.original.clone())),
            Choice::Edit(path) => match fs::read_to_string(&path) {
                Ok(text) => Ok(Some(text)),
                Err(e) => {
                    writeln!(self.output, "cannot read {}: {}", path.display(), e)?;
                    Ok(None)
                }
            },
            Choice::Unknown(input) => {
                writeln!(self.output, "unknown command {:?}", input)?;
                Ok(None)
            }
            Choice::Quit => Ok(None),
        }
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let Some((label, _)) = &self.action else {
            return Ok(());
        };
        let label = label.clone();

        loop {
            let choice = self.choices.choose(&label)?;
            if choice == Choice::Quit {
                return Ok(());
            }
            if let Some(text) = self.resolve(choice)? {
                if let Some((_, finisher)) = self.action.take() {
                    finisher.finish(text);
                }
                return Ok(());
            }
        }
    }
}

impl<C: ChoiceSource, W: Write> ReviewUi for TerminalReview<C, W> {
    type Edited = String;

    fn render_comparison(&mut self, title: &str, original: &[Span], produced: &[Span]) {
        self.original = original.iter().map(|s| s.text.as_str()).collect();
        self.produced = produced.iter().map(|s| s.text.as_str()).collect();

        let diff = DiffResult {
            original: original.to_vec(),
            produced: produced.to_vec(),
        };
        if let Err(e) = writeln!(self.output, "{}\n\n{}\n", title, diff.side_by_side()) {
            log::warn!("Could not render comparison: {}", e);
        }
    }

    fn add_finish_action(&mut self, label: &str, finisher: Finisher<String>) {
        self.action = Some((label.to_string(), finisher));
    }

    fn wait(&mut self) {
        if let Err(e) = self.run() {
            log::warn!("Review aborted: {}", e);
        }
    }
}
