//! Name-to-method table for pluggable processing methods.

use crate::corpus::Corpus;
use crate::errors::{BoxError, CorefError, CorefResult};
use crate::methods::{CapitalizedNer, PronounCoref, CAPITALIZED_NER, PRONOUN_COREF};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// A processing method: reads a cleaned corpus and writes one artifact.
///
/// Implementations must create a readable text file before returning its path.
pub trait Method: Send + Sync {
    fn run(&self, corpus: &Corpus) -> Result<PathBuf, BoxError>;
}

impl<F> Method for F
where
    F: Fn(&Corpus) -> Result<PathBuf, BoxError> + Send + Sync,
{
    fn run(&self, corpus: &Corpus) -> Result<PathBuf, BoxError> {
        self(corpus)
    }
}

/// Methods available to a pipeline, keyed by name.
///
/// Registering under an existing name replaces the previous method, built-ins
/// included.
#[derive(Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<String, Arc<dyn Method>>,
}

impl MethodRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with [`PRONOUN_COREF`] and [`CAPITALIZED_NER`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(PRONOUN_COREF, PronounCoref::default());
        registry.register(CAPITALIZED_NER, CapitalizedNer::default());
        registry
    }

    /// Add or replace a method. Returns the method it replaced, if any.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        method: impl Method + 'static,
    ) -> Option<Arc<dyn Method>> {
        self.register_shared(name, Arc::new(method))
    }

    /// Add or replace a method that is already shared.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        method: Arc<dyn Method>,
    ) -> Option<Arc<dyn Method>> {
        let name = name.into();
        let replaced = self.methods.insert(name.clone(), method);
        if replaced.is_some() {
            log::debug!("Method {} replaced.", name);
        }
        replaced
    }

    /// Look up a method by name.
    pub fn resolve(&self, name: &str) -> CorefResult<Arc<dyn Method>> {
        self.methods
            .get(name)
            .cloned()
            .ok_or_else(|| CorefError::UnknownMethod {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.names())
            .finish()
    }
}
