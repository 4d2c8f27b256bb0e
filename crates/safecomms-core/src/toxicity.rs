//! Secondary toxicity classifier seam.
//!
//! The term engine is the primary signal; deployments may additionally
//! wire in an ML toxicity model as an alternative safe/unsafe signal.
//! The model itself is an external collaborator behind
//! [`ToxicityClassifier`]; this module only defines the seam and the
//! pure mapping from a model score to a [`Verdict`], so callers can
//! treat both signals uniformly.

use crate::verdict::{Verdict, VerdictCategory};

/// Default decision threshold for the toxicity score.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Raw output of a toxicity model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToxicityScore {
    /// Model label, uppercased (e.g. `TOXIC`, `LABEL_1`).
    pub label: String,
    /// Confidence score in 0.0..=1.0.
    pub score: f32,
}

/// An alternative safe/unsafe signal backed by an ML model.
///
/// Implementations may fail (model missing, inference error); the core
/// term engine never does.
pub trait ToxicityClassifier: Send + Sync {
    /// Scores a piece of text for toxicity.
    fn classify(&self, text: &str) -> anyhow::Result<ToxicityScore>;
}

/// Maps a model score to a verdict at the given threshold.
///
/// The text is unsafe iff the label is one of the toxic labels and the
/// score reaches the threshold. Either way the verdict carries no
/// matched terms; the reason embeds score, label, and threshold.
pub fn score_verdict(score: &ToxicityScore, threshold: f32) -> Verdict {
    let toxic = matches!(score.label.as_str(), "TOXIC" | "LABEL_1" | "1")
        && score.score >= threshold;

    if toxic {
        Verdict {
            safe: false,
            category: VerdictCategory::ModelFlagged,
            matched_terms: Vec::new(),
            reason: format!(
                "Local AI toxic score={:.3} (label={}, threshold={:.2})",
                score.score, score.label, threshold
            ),
        }
    } else {
        Verdict {
            safe: true,
            category: VerdictCategory::Clean,
            matched_terms: Vec::new(),
            reason: format!(
                "Local AI non-toxic score={:.3} (label={}, threshold={:.2})",
                score.score, score.label, threshold
            ),
        }
    }
}
