//! Built-in methods registered by [`MethodRegistry::with_builtins`].
//!
//! Both work on Unicode word tokens and share one notion of a *name*: a run
//! of capitalized words separated by single spaces, minus a leading function
//! word ("The Company" names "Company").
//!
//! ```text
//! John Smith went home. He said his dog was tired.
//! ╰────────╯name       ╰╯→ John Smith
//!                              ╰─╯→ John Smith's
//! ```
//!
//! [`MethodRegistry::with_builtins`]: crate::MethodRegistry::with_builtins

use crate::corpus::Corpus;
use crate::errors::BoxError;
use crate::registry::Method;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use unicode_segmentation::UnicodeSegmentation;

/// Name of the default coreference method.
pub const PRONOUN_COREF: &str = "pronoun_coref";

/// Name of the built-in NER tagger.
pub const CAPITALIZED_NER: &str = "capitalized_ner";

/// Capitalized words that never start a name on their own.
static FUNCTION_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "after", "an", "and", "at", "before", "but", "for", "from", "however", "i", "if",
        "in", "it", "its", "my", "no", "of", "on", "or", "our", "so", "that", "the", "then",
        "there", "these", "this", "those", "to", "today", "we", "when", "while", "yesterday",
        "you", "your",
    ]
    .into_iter()
    .collect()
});

/// How a third-person pronoun is rewritten once an antecedent is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PronounCase {
    /// he, she, him, her, they, them
    Personal,
    /// his, hers, their, theirs, and "her" before a noun
    Possessive,
}

impl PronounCase {
    fn from_text(text: &str) -> Option<Self> {
        match text.to_lowercase().as_str() {
            "he" | "she" | "him" | "her" | "they" | "them" => Some(Self::Personal),
            "his" | "hers" | "their" | "theirs" => Some(Self::Possessive),
            _ => None,
        }
    }

    /// Case of the pronoun at `tokens[i]`. "her" is possessive when a
    /// lowercase content word follows it ("her cat"), personal otherwise
    /// ("saw her.", "gave her the book").
    fn at(tokens: &[&str], i: usize) -> Option<Self> {
        let case = Self::from_text(tokens[i])?;
        if !tokens[i].eq_ignore_ascii_case("her") {
            return Some(case);
        }
        let possessive = tokens.get(i + 1) == Some(&" ")
            && tokens.get(i + 2).map_or(false, |next| {
                next.chars().next().map_or(false, char::is_lowercase)
                    && next.chars().all(char::is_alphabetic)
                    && !is_function_word(next)
                    && Self::from_text(next).is_none()
            });
        Some(if possessive { Self::Possessive } else { case })
    }
}

fn is_name_word(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {}
        _ => return false,
    }
    token.chars().all(char::is_alphabetic) && PronounCase::from_text(token).is_none()
}

fn is_function_word(token: &str) -> bool {
    FUNCTION_WORDS.contains(token.to_lowercase().as_str())
}

/// Token indexes of a capitalized run: `start..end`, with the name itself
/// at `name_start..end` (empty when the run is a lone function word).
struct NameRun {
    start: usize,
    name_start: usize,
    end: usize,
}

impl NameRun {
    fn find(tokens: &[&str], start: usize) -> Option<Self> {
        if !is_name_word(tokens[start]) {
            return None;
        }
        let mut end = start + 1;
        while end + 1 < tokens.len() && tokens[end] == " " && is_name_word(tokens[end + 1]) {
            end += 2;
        }

        let name_start = if !is_function_word(tokens[start]) {
            start
        } else if end - start > 1 {
            start + 2
        } else {
            end
        };
        Some(Self {
            start,
            name_start,
            end,
        })
    }

    fn name(&self, tokens: &[&str]) -> Option<String> {
        if self.name_start == self.end {
            None
        } else {
            Some(tokens[self.name_start..self.end].concat())
        }
    }
}

fn read_cleaned(corpus: &Corpus) -> Result<String, BoxError> {
    let cleaned = corpus.require_cleaned("run method")?;
    Ok(fs::read_to_string(cleaned)?)
}

fn write_artifact(corpus: &Corpus, method: &str, text: &str) -> Result<PathBuf, BoxError> {
    let path = corpus.artifact_path(method)?;
    fs::write(&path, text)?;
    log::debug!("{} wrote {}.", method, path.display());
    Ok(path)
}

/// Rule-based coreference: each third-person pronoun is replaced by the
/// nearest preceding name.
///
/// Possessives gain `'s`. Pronouns with no preceding name are left alone.
#[derive(Debug, Clone, Default)]
pub struct PronounCoref;

impl PronounCoref {
    pub fn new() -> Self {
        Self
    }

    /// Resolve pronouns in `text`.
    pub fn resolve(&self, text: &str) -> String {
        let tokens: Vec<&str> = text.split_word_bounds().collect();
        let mut out = String::with_capacity(text.len());
        let mut antecedent: Option<String> = None;
        let mut i = 0;

        while i < tokens.len() {
            if let Some(run) = NameRun::find(&tokens, i) {
                if let Some(name) = run.name(&tokens) {
                    antecedent = Some(name);
                }
                out.push_str(&tokens[run.start..run.end].concat());
                i = run.end;
                continue;
            }

            let token = tokens[i];
            match (PronounCase::at(&tokens, i), &antecedent) {
                (Some(PronounCase::Personal), Some(name)) => out.push_str(name),
                (Some(PronounCase::Possessive), Some(name)) => {
                    out.push_str(name);
                    out.push_str("'s");
                }
                _ => out.push_str(token),
            }
            i += 1;
        }

        out
    }
}

impl Method for PronounCoref {
    fn run(&self, corpus: &Corpus) -> Result<PathBuf, BoxError> {
        let text = read_cleaned(corpus)?;
        write_artifact(corpus, PRONOUN_COREF, &self.resolve(&text))
    }
}

/// NER tagger that brackets every name: `[John Smith] met [Mary]`.
#[derive(Debug, Clone, Default)]
pub struct CapitalizedNer;

impl CapitalizedNer {
    pub fn new() -> Self {
        Self
    }

    pub fn tag(&self, text: &str) -> String {
        let tokens: Vec<&str> = text.split_word_bounds().collect();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;

        while i < tokens.len() {
            match NameRun::find(&tokens, i) {
                Some(run) => {
                    out.push_str(&tokens[run.start..run.name_start].concat());
                    if let Some(name) = run.name(&tokens) {
                        out.push('[');
                        out.push_str(&name);
                        out.push(']');
                    }
                    i = run.end;
                }
                None => {
                    out.push_str(tokens[i]);
                    i += 1;
                }
            }
        }

        out
    }
}

impl Method for CapitalizedNer {
    fn run(&self, corpus: &Corpus) -> Result<PathBuf, BoxError> {
        let text = read_cleaned(corpus)?;
        write_artifact(corpus, CAPITALIZED_NER, &self.tag(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use std::path::Path;

    #[test]
    fn test_resolve_personal_and_possessive() {
        let resolved = PronounCoref::new().resolve(
            "John Smith went home. He said his dog was tired. The dog barked at him.",
        );
        assert_eq!(
            resolved,
            "John Smith went home. John Smith said John Smith's dog was tired. The dog barked at John Smith."
        );
    }

    #[test]
    fn test_resolve_her_by_position() {
        let resolved = PronounCoref::new().resolve("Mary fed her cat. The cat loved her.");
        assert_eq!(resolved, "Mary fed Mary's cat. The cat loved Mary.");

        let resolved = PronounCoref::new().resolve("Anna gave her the book.");
        assert_eq!(resolved, "Anna gave Anna the book.");
    }

    #[test]
    fn test_resolve_uses_nearest_name() {
        let resolved = PronounCoref::new().resolve("Mary met Tom. She smiled.");
        assert_eq!(resolved, "Mary met Tom. Tom smiled.");
    }

    #[test]
    fn test_resolve_strips_leading_function_word() {
        let resolved = PronounCoref::new().resolve("The Company hired staff. They were paid.");
        assert_eq!(resolved, "The Company hired staff. Company were paid.");
    }

    #[test]
    fn test_resolve_without_antecedent_keeps_pronoun() {
        let text = "he said that they would come.";
        assert_eq!(PronounCoref::new().resolve(text), text);
    }

    #[test]
    fn test_resolve_keeps_text_without_pronouns() {
        let text = "Nothing to resolve here.\n\nStill nothing.\n";
        assert_eq!(PronounCoref::new().resolve(text), text);
    }

    #[test]
    fn test_tag_names() {
        let tagged = CapitalizedNer::new().tag("John Smith met Mary in Paris. The dog slept.");
        assert_eq!(tagged, "[John Smith] met [Mary] in [Paris]. The dog slept.");
    }

    #[test]
    fn test_tag_skips_pronouns_and_function_words() {
        let tagged = CapitalizedNer::new().tag("He left. The Tenant stayed. I agree.");
        assert_eq!(tagged, "He left. The [Tenant] stayed. I agree.");
    }

    #[test]
    fn test_method_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("story.txt");
        fs::write(&input, "Anna sang. She bowed.\n").unwrap();
        let mut corpus =
            Corpus::from_paths(&input, dir.path(), &PipelineConfig::standard()).unwrap();
        corpus
            .clean(&|name: &str, file: &Path, tmp: &Path| -> Result<PathBuf, BoxError> {
                let target = tmp.join(format!("{}_cleaned.txt", name));
                fs::copy(file, &target)?;
                Ok(target)
            })
            .unwrap();

        let out = PronounCoref::new().run(&corpus).unwrap();
        assert_eq!(out, dir.path().join("tmp").join("story_pronoun_coref.txt"));
        assert_eq!(fs::read_to_string(&out).unwrap(), "Anna sang. Anna bowed.\n");

        let out = CapitalizedNer::new().run(&corpus).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "[Anna] sang. She bowed.\n");
    }

    #[test]
    fn test_method_requires_cleaned_corpus() {
        let err = PronounCoref::new().run(&Corpus::new()).unwrap_err();
        assert!(err.to_string().contains("has not been cleaned"));
    }
}
