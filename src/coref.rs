//! Coreference orchestration: run methods, then compare or review their output.

use crate::config::PipelineConfig;
use crate::corpus::Corpus;
use crate::diff::{Comparator, DiffEngine, DiffResult};
use crate::errors::{CorefError, CorefResult};
use crate::methods::PRONOUN_COREF;
use crate::registry::MethodRegistry;
use crate::review::{review, ReviewUi};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Run each named method on `corpus`, strictly in order.
///
/// The corpus must be cleaned and every name must resolve before any method
/// runs. The first failure aborts the run and nothing produced so far is
/// returned.
pub(crate) fn run_methods<S: AsRef<str>>(
    corpus: &Corpus,
    registry: &MethodRegistry,
    methods: &[S],
    operation: &'static str,
) -> CorefResult<HashMap<String, PathBuf>> {
    corpus.require_cleaned(operation)?;
    let resolved = methods
        .iter()
        .map(|name| {
            let name: &str = name.as_ref();
            registry.resolve(name).map(|method| (name, method))
        })
        .collect::<CorefResult<Vec<_>>>()?;

    let mut outputs = HashMap::new();
    for (name, method) in resolved {
        let artifact = method
            .run(corpus)
            .map_err(|source| CorefError::MethodExecutionFailed {
                name: name.to_string(),
                source,
            })?;
        if !artifact.is_file() {
            return Err(CorefError::MethodExecutionFailed {
                name: name.to_string(),
                source: format!("no artifact at {}", artifact.display()).into(),
            });
        }

        log::debug!("{} produced {}.", name, artifact.display());
        outputs.insert(name.to_string(), artifact);
    }

    Ok(outputs)
}

/// One coreference run over a cleaned corpus.
///
/// Holds an output artifact for every requested method, or does not exist
/// at all: a failed [`Coref::run`] returns no partial record.
#[derive(Debug)]
pub struct Coref<'a> {
    corpus: &'a Corpus,
    methods: Vec<String>,
    outputs: HashMap<String, PathBuf>,
    engine: DiffEngine,
}

impl<'a> Coref<'a> {
    /// Run `methods` against `corpus` in list order.
    ///
    /// Duplicate names run again and keep the last artifact.
    pub fn run<S: AsRef<str>>(
        corpus: &'a Corpus,
        registry: &MethodRegistry,
        methods: &[S],
    ) -> CorefResult<Self> {
        let outputs = run_methods(corpus, registry, methods, "coref run")?;
        let coref = Self {
            corpus,
            methods: methods.iter().map(|m| m.as_ref().to_string()).collect(),
            outputs,
            engine: DiffEngine::default(),
        };
        log::debug!("{}: methods {:?} produced {:?}", corpus, coref.methods, coref.outputs);
        Ok(coref)
    }

    /// Run the default coreference method only.
    pub fn run_default(corpus: &'a Corpus, registry: &MethodRegistry) -> CorefResult<Self> {
        Self::run(corpus, registry, &[PRONOUN_COREF])
    }

    /// Run `config.methods` and compare at `config.granularity`.
    pub fn run_configured(
        corpus: &'a Corpus,
        registry: &MethodRegistry,
        config: &PipelineConfig,
    ) -> CorefResult<Self> {
        Ok(Self::run(corpus, registry, config.methods.as_slice())?
            .with_engine(DiffEngine::from_config(config)))
    }

    /// Replace the engine used by [`Coref::compare`] and [`Coref::display`].
    pub fn with_engine(mut self, engine: DiffEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn engine(&self) -> DiffEngine {
        self.engine
    }

    pub fn corpus(&self) -> &'a Corpus {
        self.corpus
    }

    /// Requested method names, in request order.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Artifact produced by `method`.
    pub fn output(&self, method: &str) -> CorefResult<&Path> {
        self.outputs
            .get(method)
            .map(PathBuf::as_path)
            .ok_or_else(|| CorefError::UnknownMethod {
                name: method.to_string(),
            })
    }

    /// `(method, artifact)` pairs in request order, each method once.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Path)> + '_ {
        let mut seen = Vec::new();
        self.methods.iter().filter_map(move |name| {
            if seen.contains(&name) {
                return None;
            }
            seen.push(name);
            self.outputs
                .get(name)
                .map(|path| (name.as_str(), path.as_path()))
        })
    }

    /// Diff the cleaned text against `method`'s output with this run's
    /// engine (line granularity unless configured otherwise).
    pub fn compare(&self, method: &str) -> CorefResult<DiffResult> {
        let (origin, produced) = self.texts(method)?;
        log::info!("Comparing result from {} co-reference method", method);
        Ok(self.engine.compare(&origin, &produced))
    }

    /// Diff with a caller-supplied comparator; its result is returned as is.
    pub fn compare_with(
        &self,
        method: &str,
        comparator: &impl Comparator,
    ) -> CorefResult<DiffResult> {
        let (origin, produced) = self.texts(method)?;
        log::info!(
            "Comparing result from {} co-reference method with a custom comparator",
            method
        );
        Ok(comparator.compare(&origin, &produced))
    }

    /// Show the default diff in `ui` and return the reviewer's result.
    pub fn display<U: ReviewUi>(&self, method: &str, ui: &mut U) -> CorefResult<U::Edited> {
        let diff = self.compare(method)?;
        self.review(method, &diff, ui)
    }

    /// Like [`Coref::display`], diffing with `comparator`.
    pub fn display_with<U: ReviewUi>(
        &self,
        method: &str,
        comparator: &impl Comparator,
        ui: &mut U,
    ) -> CorefResult<U::Edited> {
        let diff = self.compare_with(method, comparator)?;
        self.review(method, &diff, ui)
    }

    fn review<U: ReviewUi>(
        &self,
        method: &str,
        diff: &DiffResult,
        ui: &mut U,
    ) -> CorefResult<U::Edited> {
        log::info!("Displaying result from {}, editing enabled", method);
        review(ui, &format!("Comparing result from {}", method), diff)
    }

    fn texts(&self, method: &str) -> CorefResult<(String, String)> {
        let produced_path = self.output(method)?;
        let cleaned_path = self.corpus.require_cleaned("compare")?;

        let origin = fs::read_to_string(cleaned_path)
            .map_err(|e| CorefError::io(cleaned_path, e))?;
        let produced = fs::read_to_string(produced_path)
            .map_err(|e| CorefError::io(produced_path, e))?;
        Ok((origin, produced))
    }
}

impl<'a> fmt::Display for Coref<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.outputs().map(|(name, _)| name).collect();
        f.write_str(&names.join("\n"))
    }
}
