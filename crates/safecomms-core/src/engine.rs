//! The match engine.
//!
//! Decides which corpus terms are present in a piece of text. Each term's
//! matching policy is resolved once, when the engine is built, into a
//! closed [`TermKind`]; evaluation is then a single pass of two
//! Aho-Corasick automata over the input instead of a per-term scan, with
//! identical match semantics.

use aho_corasick::{AhoCorasick, MatchKind};
use thiserror::Error;

use crate::catalog::Category;
use crate::corpus::Corpus;
use crate::verdict::Verdict;

/// Errors from compiling the match automata.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The pattern set could not be compiled.
    #[error("failed to compile match automaton: {0}")]
    Automaton(#[from] aho_corasick::BuildError),
}

/// Matching policy of a stored term, resolved at engine-build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    /// Single alphanumeric word: matches as a whole token, with no
    /// letter or digit immediately adjacent on either side.
    Word,
    /// Single word containing symbols (most obfuscated variants):
    /// matches by plain substring containment, since token boundaries
    /// are ill-defined across symbol glyphs.
    Fragment,
    /// Multi-word term: both text and term are normalized (runs of
    /// non-alphanumeric characters collapsed to one space) before
    /// substring containment. Words joined in the text purely by
    /// punctuation therefore still match; that over-matching is
    /// intentional and kept.
    Phrase,
}

/// A compiled single-word pattern.
struct RawPattern {
    /// The term as stored in the corpus (reported on match).
    display: String,
    category: Category,
    rank: usize,
    whole_token: bool,
}

/// A compiled phrase pattern; matched against normalized text.
struct PhrasePattern {
    display: String,
    category: Category,
    rank: usize,
}

/// Multi-pattern match engine over an immutable corpus.
///
/// Construction happens once at startup; afterwards the engine is
/// read-only and [`MatchEngine::evaluate`] is a pure function safe to
/// call from any number of threads without synchronization.
pub struct MatchEngine {
    raw: AhoCorasick,
    raw_patterns: Vec<RawPattern>,
    phrases: AhoCorasick,
    phrase_patterns: Vec<PhrasePattern>,
}

impl MatchEngine {
    /// Compiles the engine from a built corpus.
    pub fn new(corpus: &Corpus) -> Result<Self, EngineError> {
        let mut raw_patterns = Vec::new();
        let mut phrase_patterns = Vec::new();

        for (rank, (category, terms)) in corpus.categories().enumerate() {
            for term in terms {
                match resolve_kind(term) {
                    TermKind::Phrase => {
                        let normalized = normalize(term);
                        if normalized.is_empty() {
                            continue;
                        }
                        phrase_patterns.push(PhrasePattern {
                            display: term.clone(),
                            category,
                            rank,
                        });
                    }
                    kind => raw_patterns.push(RawPattern {
                        display: term.clone(),
                        category,
                        rank,
                        whole_token: kind == TermKind::Word,
                    }),
                }
            }
        }

        let raw = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(raw_patterns.iter().map(|p| p.display.as_str()))?;
        let phrases = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(phrase_patterns.iter().map(|p| normalize(&p.display)))?;

        Ok(Self {
            raw,
            raw_patterns,
            phrases,
            phrase_patterns,
        })
    }

    /// Evaluates a piece of text against the corpus.
    ///
    /// Matching is case-insensitive. When terms from several categories
    /// match, the reported category is the first matching category in
    /// [`Category::all`] order; `matched_terms` carries the sorted,
    /// duplicate-free union across all categories.
    pub fn evaluate(&self, text: &str) -> Verdict {
        let lowered = text.to_lowercase();
        let normalized = normalize(&lowered);

        let mut found = std::collections::BTreeSet::new();
        let mut best: Option<(usize, Category)> = None;

        for m in self.raw.find_overlapping_iter(&lowered) {
            let pattern = &self.raw_patterns[m.pattern().as_usize()];
            if pattern.whole_token && !is_whole_token(&lowered, m.start(), m.end()) {
                continue;
            }
            found.insert(pattern.display.clone());
            best = min_rank(best, pattern.rank, pattern.category);
        }

        for m in self.phrases.find_overlapping_iter(&normalized) {
            let pattern = &self.phrase_patterns[m.pattern().as_usize()];
            found.insert(pattern.display.clone());
            best = min_rank(best, pattern.rank, pattern.category);
        }

        match best {
            None => Verdict::clean(),
            Some((_, category)) => Verdict::flagged(category, found.into_iter().collect()),
        }
    }
}

fn min_rank(
    best: Option<(usize, Category)>,
    rank: usize,
    category: Category,
) -> Option<(usize, Category)> {
    match best {
        Some((r, _)) if r <= rank => best,
        _ => Some((rank, category)),
    }
}

/// Resolves the matching policy for a stored term.
pub fn resolve_kind(term: &str) -> TermKind {
    if term.contains(' ') {
        TermKind::Phrase
    } else if !term.is_empty() && term.chars().all(|c| c.is_alphanumeric()) {
        TermKind::Word
    } else {
        TermKind::Fragment
    }
}

/// Collapses every run of non-alphanumeric characters to a single space
/// and trims the ends.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Whether the match at `start..end` stands alone as a token: no letter
/// or digit immediately adjacent on either side.
fn is_whole_token(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
}
