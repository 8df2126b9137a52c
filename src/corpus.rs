//! Corpus lifecycle: selected, then cleaned, then shared read-only.
//!
//! ```text
//! Corpus::new() ──set_up──▶ file/output/tmp known ──clean──▶ cleaned_path known
//! ```

use crate::cleaner::TextCleaner;
use crate::config::PipelineConfig;
use crate::errors::{CorefError, CorefResult};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Why a picker is being asked for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    SelectInputFile,
    InvalidInputFile,
    SelectOutputFolder,
    InvalidOutputFolder,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Prompt::SelectInputFile => "Select an input file",
            Prompt::InvalidInputFile => "Select a valid input file",
            Prompt::SelectOutputFolder => "Select an output folder",
            Prompt::InvalidOutputFolder => "Please select a valid folder",
        };
        f.write_str(msg)
    }
}

/// Interactive file or folder selection.
///
/// Returning `None` (or an empty path) means the user cancelled.
pub trait Picker {
    fn pick(&mut self, prompt: Prompt) -> Option<PathBuf>;
}

impl<F> Picker for F
where
    F: FnMut(Prompt) -> Option<PathBuf>,
{
    fn pick(&mut self, prompt: Prompt) -> Option<PathBuf> {
        self(prompt)
    }
}

/// One input document tracked from raw file to cleaned text.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    file_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    tmp_out_dir: Option<PathBuf>,
    cleaned_path: Option<PathBuf>,
}

impl Corpus {
    /// An empty corpus, waiting for [`Corpus::set_up`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from known paths without prompting.
    ///
    /// Applies the same validation as [`Corpus::set_up`] and creates the
    /// intermediate directory.
    pub fn from_paths(
        file_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: &PipelineConfig,
    ) -> CorefResult<Self> {
        let file_path = file_path.into();
        let output_dir = output_dir.into();

        if !is_valid_input(&file_path, config) {
            return Err(CorefError::InvalidInput {
                stage: "select input file",
                message: format!(
                    "{} is not an existing .{} file",
                    file_path.display(),
                    accepted_extension(config)
                ),
            });
        }
        if !output_dir.is_dir() {
            return Err(CorefError::InvalidInput {
                stage: "select output folder",
                message: format!("{} is not a directory", output_dir.display()),
            });
        }

        let mut corpus = Self::new();
        corpus.attach(file_path, output_dir, config)?;
        Ok(corpus)
    }

    /// Pick the input file and output folder, then create the tmp directory.
    ///
    /// Invalid picks are re-prompted up to `config.max_pick_attempts` times.
    /// Nothing is stored unless both picks succeed.
    pub fn set_up(
        &mut self,
        config: &PipelineConfig,
        file_picker: &mut impl Picker,
        folder_picker: &mut impl Picker,
    ) -> CorefResult<()> {
        if self.cleaned_path.is_some() {
            return Err(CorefError::InvalidState {
                operation: "set_up",
                message: "corpus has already been cleaned".to_string(),
            });
        }

        let file_path = pick_valid(
            file_picker,
            [Prompt::SelectInputFile, Prompt::InvalidInputFile],
            "select input file",
            config.pick_attempts(),
            |path| is_valid_input(path, config),
        )?;
        log::info!(
            "Select {} for coreference.",
            file_stem(&file_path).unwrap_or_default()
        );

        let output_dir = pick_valid(
            folder_picker,
            [Prompt::SelectOutputFolder, Prompt::InvalidOutputFolder],
            "select output folder",
            config.pick_attempts(),
            |path| path.is_dir(),
        )?;
        log::info!("Set {} as the output folder.", output_dir.display());

        self.attach(file_path, output_dir, config)
    }

    /// Run the cleaner once and remember where the cleaned text lives.
    pub fn clean(&mut self, cleaner: &impl TextCleaner) -> CorefResult<&Path> {
        if self.cleaned_path.is_some() {
            return Err(CorefError::InvalidState {
                operation: "clean",
                message: "corpus has already been cleaned".to_string(),
            });
        }
        let (file_name, file_path, tmp_out_dir) =
            match (self.file_name(), &self.file_path, &self.tmp_out_dir) {
                (Some(name), Some(file), Some(tmp)) => (name, file, tmp),
                _ => {
                    return Err(CorefError::InvalidState {
                        operation: "clean",
                        message: "corpus has not been set up".to_string(),
                    })
                }
            };

        let cleaned = cleaner
            .clean(&file_name, file_path, tmp_out_dir)
            .map_err(|e| CorefError::CleaningFailed {
                file: file_name.clone(),
                message: e.to_string(),
            })?;
        if !cleaned.is_file() {
            return Err(CorefError::CleaningFailed {
                file: file_name,
                message: format!("cleaner produced no file at {}", cleaned.display()),
            });
        }

        log::debug!("Corpus {} cleaned up into {}.", file_name, cleaned.display());
        Ok(self.cleaned_path.insert(cleaned).as_path())
    }

    /// Path of the raw input file.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Base name of the input file without its extension.
    pub fn file_name(&self) -> Option<String> {
        self.file_path.as_deref().and_then(file_stem)
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn tmp_out_dir(&self) -> Option<&Path> {
        self.tmp_out_dir.as_deref()
    }

    pub fn cleaned_path(&self) -> Option<&Path> {
        self.cleaned_path.as_deref()
    }

    pub fn is_cleaned(&self) -> bool {
        self.cleaned_path.is_some()
    }

    /// Where a method should write its artifact: `{tmp}/{file_name}_{method}.txt`.
    pub fn artifact_path(&self, method: &str) -> CorefResult<PathBuf> {
        match (&self.tmp_out_dir, self.file_name()) {
            (Some(tmp), Some(name)) => Ok(tmp.join(format!("{}_{}.txt", name, method))),
            _ => Err(CorefError::InvalidState {
                operation: "artifact_path",
                message: "corpus has not been set up".to_string(),
            }),
        }
    }

    /// The cleaned text path, or `InvalidState` naming `operation`.
    pub(crate) fn require_cleaned(&self, operation: &'static str) -> CorefResult<&Path> {
        self.cleaned_path
            .as_deref()
            .ok_or_else(|| CorefError::InvalidState {
                operation,
                message: format!("{} has not been cleaned", self),
            })
    }

    fn attach(
        &mut self,
        file_path: PathBuf,
        output_dir: PathBuf,
        config: &PipelineConfig,
    ) -> CorefResult<()> {
        let tmp_out_dir = output_dir.join(&config.tmp_dir_name);
        fs::create_dir_all(&tmp_out_dir).map_err(|e| CorefError::io(&tmp_out_dir, e))?;
        log::debug!(
            "Create intermediate tmp output folder {}.",
            tmp_out_dir.display()
        );

        self.file_path = Some(file_path);
        self.output_dir = Some(output_dir);
        self.tmp_out_dir = Some(tmp_out_dir);
        log::debug!("{} initiated.", self);
        Ok(())
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.file_name() {
            Some(name) => write!(f, "Corpus {}", name),
            None => write!(f, "Corpus <unset>"),
        }
    }
}

fn pick_valid(
    picker: &mut impl Picker,
    [first, retry]: [Prompt; 2],
    stage: &'static str,
    attempts: usize,
    is_valid: impl Fn(&Path) -> bool,
) -> CorefResult<PathBuf> {
    let mut prompt = first;
    let mut last_rejected = None;

    for _ in 0..attempts {
        let picked = match picker.pick(prompt) {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => {
                log::warn!("User cancelled at {}.", stage);
                return Err(CorefError::UserCancelled { stage });
            }
        };
        if is_valid(&picked) {
            return Ok(picked);
        }
        log::warn!("{}: rejected {}", stage, picked.display());
        last_rejected = Some(picked);
        prompt = retry;
    }

    Err(CorefError::InvalidInput {
        stage,
        message: format!(
            "no valid selection after {} attempts (last: {})",
            attempts,
            last_rejected
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        ),
    })
}

fn accepted_extension(config: &PipelineConfig) -> &str {
    config.input_extension.trim_start_matches('.')
}

fn is_valid_input(path: &Path, config: &PipelineConfig) -> bool {
    path.is_file()
        && path
            .extension()
            .map_or(false, |ext| ext == accepted_extension(config))
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}
