use crate::{
    BoxError, Coref, CorefError, Corpus, DiffEngine, Finisher, MethodRegistry, Ner,
    PipelineConfig, Prompt, ReviewUi, Span, WhitespaceCleaner, CAPITALIZED_NER, PRONOUN_COREF,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

const STORY: &str = "John Smith went home.   \n\n\n\nHe said his dog was tired.\n";

/// Raw story plus an output folder, as a user would pick them.
fn picked_paths(dir: &Path) -> (PathBuf, PathBuf) {
    let input = dir.join("story.txt");
    fs::write(&input, STORY).unwrap();
    let out = dir.join("out");
    fs::create_dir(&out).unwrap();
    (input, out)
}

fn once(path: PathBuf) -> impl FnMut(Prompt) -> Option<PathBuf> {
    let mut path = Some(path);
    move |_: Prompt| path.take()
}

fn set_up_and_clean(dir: &Path, config: &PipelineConfig) -> Corpus {
    let (input, out) = picked_paths(dir);
    let mut corpus = Corpus::new();
    corpus
        .set_up(config, &mut once(input), &mut once(out))
        .unwrap();
    corpus.clean(&WhitespaceCleaner::new()).unwrap();
    corpus
}

/// Hands back its own edit of the produced side.
struct EditingUi {
    produced: String,
    finisher: Option<Finisher<String>>,
}

impl ReviewUi for EditingUi {
    type Edited = String;

    fn render_comparison(&mut self, _title: &str, _original: &[Span], produced: &[Span]) {
        self.produced = produced.iter().map(|s| s.text.as_str()).collect();
    }

    fn add_finish_action(&mut self, _label: &str, finisher: Finisher<String>) {
        self.finisher = Some(finisher);
    }

    fn wait(&mut self) {
        if let Some(finisher) = self.finisher.take() {
            finisher.finish(self.produced.replace("tired", "sleepy"));
        }
    }
}

#[test]
fn test_set_up_then_clean_yields_readable_text() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = set_up_and_clean(dir.path(), &PipelineConfig::standard());

    let cleaned = corpus.cleaned_path().unwrap();
    assert!(cleaned.starts_with(dir.path().join("out").join("tmp")));
    assert_eq!(
        fs::read_to_string(cleaned).unwrap(),
        "John Smith went home.\n\nHe said his dog was tired.\n"
    );
}

#[test]
fn test_full_pipeline_with_review() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::standard();
    let corpus = set_up_and_clean(dir.path(), &config);
    let registry = MethodRegistry::with_builtins();

    let coref = Coref::run(&corpus, &registry, config.methods.as_slice()).unwrap();
    let diff = coref.compare(PRONOUN_COREF).unwrap();

    insta::assert_snapshot!(diff.side_by_side().to_string(), @r###"
    = John Smith went home.      | John Smith went home.
    =                            |
    ~ He said his dog was tired. | John Smith said John Smith's dog was tired.
    "###);

    let mut ui = EditingUi {
        produced: String::new(),
        finisher: None,
    };
    let reviewed = coref.display(PRONOUN_COREF, &mut ui).unwrap();
    assert_eq!(
        reviewed,
        "John Smith went home.\n\nJohn Smith said John Smith's dog was sleepy.\n"
    );
}

#[test]
fn test_copy_method_round_trip_has_no_changes() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = set_up_and_clean(dir.path(), &PipelineConfig::standard());
    let mut registry = MethodRegistry::with_builtins();
    registry.register("verbatim", |corpus: &Corpus| -> Result<PathBuf, BoxError> {
        let out = corpus.artifact_path("verbatim")?;
        fs::copy(corpus.cleaned_path().unwrap(), &out)?;
        Ok(out)
    });

    let coref = Coref::run(&corpus, &registry, &["verbatim"]).unwrap();

    for engine in [DiffEngine::lines(), DiffEngine::words()] {
        let diff = coref.compare_with("verbatim", &engine).unwrap();
        assert_eq!(diff.changed_count(), 0);
    }
}

#[test]
fn test_coref_and_ner_share_the_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = set_up_and_clean(dir.path(), &PipelineConfig::standard());
    let registry = MethodRegistry::with_builtins();

    let coref = Coref::run_default(&corpus, &registry).unwrap();
    let tagged = Ner::new(&corpus).tag_default(&registry).unwrap();

    let tmp = dir.path().join("out").join("tmp");
    assert_eq!(coref.output(PRONOUN_COREF).unwrap(), tmp.join("story_pronoun_coref.txt"));
    assert_eq!(tagged[CAPITALIZED_NER], tmp.join("story_capitalized_ner.txt"));
}

#[test]
fn test_cancelled_set_up_stops_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let (_input, out) = picked_paths(dir.path());
    let mut corpus = Corpus::new();

    let err = corpus
        .set_up(
            &PipelineConfig::standard(),
            &mut |_: Prompt| -> Option<PathBuf> { None },
            &mut once(out.clone()),
        )
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(!out.join("tmp").exists());
    assert!(matches!(
        Coref::run_default(&corpus, &MethodRegistry::with_builtins()),
        Err(CorefError::InvalidState { .. })
    ));
}

#[test]
fn test_independent_pipelines_run_concurrently() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let dir = tempfile::tempdir().unwrap();
                let corpus = set_up_and_clean(dir.path(), &PipelineConfig::standard());
                let coref = Coref::run_default(&corpus, &MethodRegistry::with_builtins()).unwrap();
                coref.compare(PRONOUN_COREF).unwrap().changed_count()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}
