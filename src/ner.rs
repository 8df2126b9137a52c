//! Named-entity tagging bound to a corpus.

use crate::corpus::Corpus;
use crate::coref::run_methods;
use crate::errors::CorefResult;
use crate::methods::CAPITALIZED_NER;
use crate::registry::MethodRegistry;
use std::collections::HashMap;
use std::path::PathBuf;

/// Associates a corpus with NER tagging.
#[derive(Debug, Clone, Copy)]
pub struct Ner<'a> {
    corpus: &'a Corpus,
}

impl<'a> Ner<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        log::info!("{} selected for NER tagging", corpus);
        Self { corpus }
    }

    pub fn corpus(&self) -> &'a Corpus {
        self.corpus
    }

    /// Whether the corpus has been cleaned and can be tagged.
    pub fn is_ready(&self) -> bool {
        self.corpus.is_cleaned()
    }

    /// Run NER methods in order, same contract as [`Coref::run`](crate::Coref::run).
    pub fn tag<S: AsRef<str>>(
        &self,
        registry: &MethodRegistry,
        methods: &[S],
    ) -> CorefResult<HashMap<String, PathBuf>> {
        run_methods(self.corpus, registry, methods, "ner tag")
    }

    /// Run the built-in tagger only.
    pub fn tag_default(&self, registry: &MethodRegistry) -> CorefResult<HashMap<String, PathBuf>> {
        self.tag(registry, &[CAPITALIZED_NER])
    }
}
