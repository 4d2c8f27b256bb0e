//! Evaluation verdicts.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::catalog::Category;

/// Reason string attached to safe verdicts.
pub const REASON_CLEAN: &str = "No risky terms detected.";

/// Reason string attached to unsafe verdicts.
pub const REASON_FLAGGED: &str = "Potentially unsafe content detected.";

/// Category slot of a verdict.
///
/// Either a risk [`Category`], the model-flagged label used by the
/// secondary classifier, or clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictCategory {
    /// No risky content.
    Clean,
    /// A matched risk category.
    Risk(Category),
    /// Flagged by the secondary toxicity classifier.
    ModelFlagged,
}

impl VerdictCategory {
    /// Returns the wire label for this category slot.
    pub fn label(&self) -> &'static str {
        match self {
            VerdictCategory::Clean => "clean",
            VerdictCategory::Risk(category) => category.label(),
            VerdictCategory::ModelFlagged => "toxicity_ai",
        }
    }
}

impl Serialize for VerdictCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for VerdictCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelVisitor;

        impl Visitor<'_> for LabelVisitor {
            type Value = VerdictCategory;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a verdict category label")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                if value == "clean" {
                    return Ok(VerdictCategory::Clean);
                }
                if value == "toxicity_ai" {
                    return Ok(VerdictCategory::ModelFlagged);
                }
                Category::all()
                    .iter()
                    .find(|c| c.label() == value)
                    .map(|&c| VerdictCategory::Risk(c))
                    .ok_or_else(|| E::unknown_variant(value, &["clean", "toxicity_ai"]))
            }
        }

        deserializer.deserialize_str(LabelVisitor)
    }
}

/// The outcome of evaluating one piece of text.
///
/// `safe` is false iff `matched_terms` is non-empty for the term engine;
/// the secondary classifier produces term-less verdicts with its own
/// reason. `category` is clean iff the verdict is safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the text passed evaluation.
    pub safe: bool,
    /// The reported category, or clean.
    pub category: VerdictCategory,
    /// Sorted, duplicate-free list of matched term strings.
    pub matched_terms: Vec<String>,
    /// Human-readable explanation.
    pub reason: String,
}

impl Verdict {
    /// A safe verdict with no matches.
    pub fn clean() -> Self {
        Self {
            safe: true,
            category: VerdictCategory::Clean,
            matched_terms: Vec::new(),
            reason: REASON_CLEAN.to_string(),
        }
    }

    /// An unsafe verdict for the given category and matched terms.
    pub fn flagged(category: Category, matched_terms: Vec<String>) -> Self {
        Self {
            safe: false,
            category: VerdictCategory::Risk(category),
            matched_terms,
            reason: REASON_FLAGGED.to_string(),
        }
    }
}
