//! Pipeline configuration.

use crate::diff::Granularity;
use crate::errors::{CorefError, CorefResult};
use crate::methods::PRONOUN_COREF;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Configuration shared by every stage of one pipeline.
///
/// Passed by reference into [`Corpus`](crate::Corpus), [`Coref`](crate::Coref)
/// and the diff stage, so independent pipelines never share state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Method names to run when none are requested explicitly.
    pub methods: Vec<String>,
    /// Accepted input file extension, without the dot.
    pub input_extension: String,
    /// Name of the intermediate directory created under the output folder.
    pub tmp_dir_name: String,
    /// How many picks are offered before an invalid selection gives up.
    pub max_pick_attempts: usize,
    /// Default diff granularity.
    pub granularity: Granularity,
}

impl PipelineConfig {
    /// Standard pipeline: pronoun coreference, `.txt` input, `tmp/` artifacts.
    pub fn standard() -> Self {
        Self {
            methods: vec![PRONOUN_COREF.into()],
            input_extension: "txt".into(),
            tmp_dir_name: "tmp".into(),
            max_pick_attempts: 5,
            granularity: Granularity::Line,
        }
    }

    /// Create with specific methods.
    pub fn with_methods(methods: Vec<String>) -> Self {
        Self {
            methods,
            ..Self::standard()
        }
    }

    /// Load from a TOML file. A missing file yields the standard config.
    pub fn load(path: &Path) -> CorefResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| CorefError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| CorefError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Retry bound for pickers, never less than one attempt.
    pub(crate) fn pick_attempts(&self) -> usize {
        self.max_pick_attempts.max(1)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_nonexistent_returns_standard() {
        let config = PipelineConfig::load(Path::new("/nonexistent/coref.toml")).unwrap();
        assert_eq!(config, PipelineConfig::standard());
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
methods = ["pronoun_coref", "capitalized_ner"]
granularity = "word"
max_pick_attempts = 2
"#
        )
        .unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.methods, vec!["pronoun_coref", "capitalized_ner"]);
        assert_eq!(config.granularity, Granularity::Word);
        assert_eq!(config.max_pick_attempts, 2);
        assert_eq!(config.input_extension, "txt");
        assert_eq!(config.tmp_dir_name, "tmp");
    }

    #[test]
    fn test_load_malformed_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "methods = 42").unwrap();

        let err = PipelineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, CorefError::Config { .. }));
    }

    #[test]
    fn test_zero_attempts_still_picks_once() {
        let config = PipelineConfig {
            max_pick_attempts: 0,
            ..PipelineConfig::standard()
        };
        assert_eq!(config.pick_attempts(), 1);
    }
}
