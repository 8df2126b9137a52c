#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Coreference pipeline with reviewable diffs.
//!
//! A raw `.txt` document becomes a cleaned [`Corpus`], any number of named
//! methods from a [`MethodRegistry`] run over it (one artifact each), and
//! the [`DiffEngine`] aligns the cleaned text with every artifact so a
//! reviewer can inspect and edit the result.
//!
//! ```text
//! raw file ─▶ TextCleaner ─▶ Corpus ─▶ Coref::run ─▶ Coref::compare ─▶ ReviewUi
//!                                        (methods)      (DiffEngine)
//! ```
//!
//! ## Modules
//!
//! - [`corpus`] - Input selection and the raw → cleaned lifecycle
//! - [`cleaner`] - The [`TextCleaner`] contract and a whitespace cleaner
//! - [`registry`] - Name-to-method table
//! - [`methods`] - Built-in coreference and NER methods
//! - [`coref`] - Running methods and comparing their output
//! - [`ner`] - NER tagging bound to a corpus
//! - [`diff`] - Aligned unchanged/changed spans
//! - [`review`] - Interactive review contract
//! - [`config`] - Pipeline configuration
//! - [`errors`] - Error types
//!
//! ## Example
//!
//! ```no_run
//! use layered_coref::{Coref, Corpus, MethodRegistry, PipelineConfig, WhitespaceCleaner};
//!
//! let config = PipelineConfig::standard();
//! let mut corpus = Corpus::from_paths("/data/story.txt", "/data/out", &config)?;
//! corpus.clean(&WhitespaceCleaner::new())?;
//!
//! let registry = MethodRegistry::with_builtins();
//! let coref = Coref::run(&corpus, &registry, config.methods.as_slice())?;
//! for (method, _) in coref.outputs() {
//!     let diff = coref.compare(method)?;
//!     println!("{}: {} changed", method, diff.changed_count());
//! }
//! # Ok::<(), layered_coref::CorefError>(())
//! ```

pub mod cleaner;
pub mod config;
pub mod coref;
pub mod corpus;
pub mod diff;
pub mod errors;
pub mod methods;
pub mod ner;
pub mod registry;
pub mod review;

pub use cleaner::{TextCleaner, WhitespaceCleaner};
pub use config::PipelineConfig;
pub use coref::Coref;
pub use corpus::{Corpus, Picker, Prompt};
pub use diff::{Comparator, DiffEngine, DiffResult, Granularity, SideBySide, Span, SpanKind};
pub use errors::{BoxError, CorefError, CorefResult};
pub use methods::{CapitalizedNer, PronounCoref, CAPITALIZED_NER, PRONOUN_COREF};
pub use ner::Ner;
pub use registry::{Method, MethodRegistry};
pub use review::{Finisher, ReviewUi, FINISH_LABEL};

#[cfg(test)]
mod tests;
