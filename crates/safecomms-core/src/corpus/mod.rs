//! The term corpus and its builder.
//!
//! [`Corpus::build`] deterministically expands the seed catalog into the
//! per-category term dictionary used for matching: seeds are lowercased,
//! inflated with affixes up to the base target, then single-word terms
//! are expanded into obfuscation variants up to the obfuscated target.
//! The result is immutable and shared read-only for the process lifetime.

mod variants;

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::catalog::{CatalogError, Category, SeedCatalog};

pub use variants::{
    glyph_variants, marker_variant, repeat_variants, separator_variants, GLYPH_VARIANT_LIMIT,
    REPEAT_VARIANT_LIMIT,
};

/// The immutable per-category term dictionary.
///
/// A term string belongs to exactly one category: when generation
/// produces a string that already exists anywhere in the corpus, the
/// later write is a no-op, so the first category in enumeration order
/// wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    /// Sorted term lists in [`Category::all`] order.
    terms: Vec<(Category, Vec<String>)>,
    base_count: usize,
    obfuscated_count: usize,
}

impl Corpus {
    /// Builds the corpus from a seed catalog.
    ///
    /// Deterministic: the same catalog always yields an identical corpus.
    /// Fails only on a structurally invalid catalog; falling short of the
    /// configured size targets is expected when the candidate space is
    /// exhausted and is logged informationally.
    pub fn build(catalog: &SeedCatalog) -> Result<Self, CatalogError> {
        catalog.validate()?;

        let mut state = BuildState::new(catalog.seeds.len());

        for (idx, (_, seeds)) in catalog.seeds.iter().enumerate() {
            for seed in seeds {
                state.insert(idx, seed.to_lowercase());
            }
        }

        inflate_base(&mut state, catalog);
        let base_count = state.total;

        let obfuscated_count = inflate_obfuscated(&mut state, catalog);

        let terms = catalog
            .seeds
            .iter()
            .enumerate()
            .map(|(idx, (category, _))| {
                (*category, state.sets[idx].iter().cloned().collect::<Vec<_>>())
            })
            .collect();

        info!(
            base_terms = base_count,
            obfuscated_terms = obfuscated_count,
            "corpus built"
        );

        Ok(Self {
            terms,
            base_count,
            obfuscated_count,
        })
    }

    /// The sorted terms of one category.
    pub fn terms(&self, category: Category) -> &[String] {
        self.terms
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, t)| t.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates categories with their sorted term lists, in tie-break order.
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.terms.iter().map(|(c, t)| (*c, t.as_slice()))
    }

    /// Whether `term` is registered under `category`.
    pub fn contains(&self, category: Category, term: &str) -> bool {
        self.terms(category)
            .binary_search_by(|t| t.as_str().cmp(term))
            .is_ok()
    }

    /// Realized count of base (seed + affix-derived) terms.
    pub fn base_term_count(&self) -> usize {
        self.base_count
    }

    /// Realized count of generator-derived obfuscated terms.
    pub fn obfuscated_term_count(&self) -> usize {
        self.obfuscated_count
    }

    /// Total number of terms across all categories.
    pub fn total_terms(&self) -> usize {
        self.terms.iter().map(|(_, t)| t.len()).sum()
    }
}

/// Mutable accumulator used only during [`Corpus::build`].
struct BuildState {
    /// Per-category term sets, BTree-ordered for deterministic snapshots.
    sets: Vec<BTreeSet<String>>,
    /// Global term ownership; makes cross-category writes no-ops.
    owner: HashMap<String, usize>,
    total: usize,
}

impl BuildState {
    fn new(categories: usize) -> Self {
        Self {
            sets: vec![BTreeSet::new(); categories],
            owner: HashMap::new(),
            total: 0,
        }
    }

    /// Inserts a term if it is novel across every category.
    fn insert(&mut self, category: usize, term: String) -> bool {
        if self.owner.contains_key(&term) {
            return false;
        }
        self.owner.insert(term.clone(), category);
        self.sets[category].insert(term);
        self.total += 1;
        true
    }
}

/// Affix-driven base inflation.
///
/// Sweeps the pre-inflation seed snapshot, adding prefixed, suffixed and
/// (for single words) wrapped candidates until the base target is met.
/// The snapshot is fixed, so the candidate space is finite: a sweep that
/// adds nothing is the fixed point and terminates the loop even when the
/// target is out of reach.
fn inflate_base(state: &mut BuildState, catalog: &SeedCatalog) {
    let target = catalog.base_target;
    if state.total >= target {
        return;
    }

    let snapshots: Vec<Vec<String>> = state
        .sets
        .iter()
        .map(|set| set.iter().cloned().collect())
        .collect();

    loop {
        let mut changed = false;
        for (category, seeds) in snapshots.iter().enumerate() {
            for seed in seeds {
                for prefix in &catalog.prefixes {
                    if state.insert(category, format!("{prefix} {seed}")) {
                        changed = true;
                        if state.total >= target {
                            return;
                        }
                    }
                }
                for suffix in &catalog.suffixes {
                    if state.insert(category, format!("{seed} {suffix}")) {
                        changed = true;
                        if state.total >= target {
                            return;
                        }
                    }
                }
                if !seed.contains(' ') {
                    // Restricted sub-range to bound the combinatorial blowup.
                    for prefix in catalog.prefixes.iter().take(10) {
                        for suffix in catalog.suffixes.iter().take(10) {
                            if state.insert(category, format!("{prefix} {seed} {suffix}")) {
                                changed = true;
                                if state.total >= target {
                                    return;
                                }
                            }
                        }
                    }
                }
            }
        }
        if !changed {
            info!(
                realized = state.total,
                target, "affix space exhausted below base target"
            );
            return;
        }
    }
}

/// Obfuscation inflation over the single-word base terms.
///
/// Returns the number of obfuscated terms added. Structured variant
/// classes run first; if the target is still unmet, marker rounds cycle
/// deterministically until the target is met or a full round adds
/// nothing.
fn inflate_obfuscated(state: &mut BuildState, catalog: &SeedCatalog) -> usize {
    let target = catalog.obfuscated_target;

    // Snapshot of single-word terms with their owning category, in
    // category order then lexicographic order.
    let owners: Vec<(String, usize)> = state
        .sets
        .iter()
        .enumerate()
        .flat_map(|(idx, set)| {
            set.iter()
                .filter(|t| !t.contains(' '))
                .map(move |t| (t.clone(), idx))
        })
        .collect();

    let mut added = 0;
    for (word, category) in &owners {
        for variant in glyph_variants(word, catalog, GLYPH_VARIANT_LIMIT) {
            if state.insert(*category, variant) {
                added += 1;
                if added >= target {
                    return added;
                }
            }
        }
        for variant in repeat_variants(word, REPEAT_VARIANT_LIMIT) {
            if state.insert(*category, variant) {
                added += 1;
                if added >= target {
                    return added;
                }
            }
        }
        for variant in separator_variants(word) {
            if state.insert(*category, variant) {
                added += 1;
                if added >= target {
                    return added;
                }
            }
        }
    }

    debug!(
        realized = added,
        target, "structured variant classes exhausted, entering marker rounds"
    );

    let mut words = owners;
    words.sort();
    let mut round = 0usize;
    while added < target {
        let mut changed = false;
        let marker = catalog.markers[round % catalog.markers.len()];
        for (word, category) in &words {
            if let Some(variant) = marker_variant(word, marker, round) {
                if state.insert(*category, variant) {
                    added += 1;
                    changed = true;
                    if added >= target {
                        return added;
                    }
                }
            }
        }
        if !changed {
            info!(
                realized = added,
                target, "marker space exhausted below obfuscated target"
            );
            break;
        }
        round += 1;
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built() -> Corpus {
        Corpus::build(&SeedCatalog::builtin()).unwrap()
    }

    fn small_catalog() -> SeedCatalog {
        let mut catalog = SeedCatalog::builtin();
        for (_, seeds) in &mut catalog.seeds {
            seeds.truncate(2);
        }
        catalog.base_target = 50;
        catalog.obfuscated_target = 50;
        catalog
    }

    #[test]
    fn build_is_deterministic() {
        let a = built();
        let b = built();
        assert_eq!(a, b);
        assert_eq!(a.base_term_count(), b.base_term_count());
        assert_eq!(a.obfuscated_term_count(), b.obfuscated_term_count());
    }

    #[test]
    fn every_seed_is_preserved() {
        let catalog = SeedCatalog::builtin();
        let corpus = built();
        for (_, seeds) in &catalog.seeds {
            for seed in seeds {
                let lowered = seed.to_lowercase();
                assert!(
                    Category::all()
                        .iter()
                        .any(|&c| corpus.contains(c, &lowered)),
                    "seed '{lowered}' missing from corpus"
                );
            }
        }
    }

    #[test]
    fn realized_counts_meet_targets() {
        let catalog = SeedCatalog::builtin();
        let corpus = built();
        assert!(corpus.base_term_count() >= catalog.base_target);
        assert!(corpus.obfuscated_term_count() >= catalog.obfuscated_target);
        assert!(corpus.total_terms() >= catalog.base_target + catalog.obfuscated_target);
    }

    #[test]
    fn no_term_appears_in_two_categories() {
        let corpus = built();
        let mut seen = std::collections::HashSet::new();
        for (category, terms) in corpus.categories() {
            for term in terms {
                assert!(
                    seen.insert(term.clone()),
                    "'{term}' duplicated across categories (second: {})",
                    category.label()
                );
            }
        }
    }

    #[test]
    fn category_term_lists_are_sorted() {
        let corpus = built();
        for (_, terms) in corpus.categories() {
            assert!(terms.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn short_seed_terms_are_registered() {
        let corpus = built();
        assert!(corpus.contains(Category::Profanity, "ass"));
        assert!(corpus.contains(Category::Profanity, "a_s_s"));
    }

    #[test]
    fn affix_terms_are_generated() {
        let corpus = built();
        assert!(corpus.contains(Category::Violence, "dirty kill"));
        assert!(corpus.contains(Category::Violence, "kill head"));
        assert!(corpus.contains(Category::Violence, "dirty kill head"));
    }

    #[test]
    fn separator_variants_are_generated() {
        let corpus = built();
        assert!(corpus.contains(Category::Profanity, "p.u.s.s.y"));
        assert!(corpus.contains(Category::Profanity, "p_u_s_s_y"));
        assert!(corpus.contains(Category::Profanity, "p-u-s-s-y"));
    }

    #[test]
    fn glyph_variants_are_generated() {
        let corpus = built();
        assert!(corpus.contains(Category::Violence, "k1ll"));
        assert!(corpus.contains(Category::Profanity, "sh1t"));
    }

    #[test]
    fn build_terminates_when_targets_are_unreachable() {
        let mut catalog = small_catalog();
        catalog.base_target = 1_000_000;
        catalog.obfuscated_target = 1_000_000;
        let corpus = Corpus::build(&catalog).unwrap();
        // Exhausting the candidate space is not an error.
        assert!(corpus.base_term_count() < catalog.base_target);
        assert!(corpus.obfuscated_term_count() < catalog.obfuscated_target);
        assert!(corpus.total_terms() > 0);
    }

    #[test]
    fn build_stops_at_small_targets() {
        let catalog = small_catalog();
        let corpus = Corpus::build(&catalog).unwrap();
        assert!(corpus.base_term_count() >= catalog.base_target);
        assert!(corpus.obfuscated_term_count() >= catalog.obfuscated_target);
        // Stopping at the target keeps the corpus small.
        assert!(corpus.base_term_count() < 2 * catalog.base_target + 100);
    }

    #[test]
    fn invalid_catalog_is_rejected() {
        let mut catalog = SeedCatalog::builtin();
        catalog.seeds[2].1.clear();
        assert!(Corpus::build(&catalog).is_err());
    }

    #[test]
    fn first_category_wins_duplicate_seeds() {
        // "cumshot" is seeded for both sexual and profanity; sexual
        // precedes profanity in enumeration order.
        let corpus = built();
        assert!(corpus.contains(Category::Sexual, "cumshot"));
        assert!(!corpus.contains(Category::Profanity, "cumshot"));
    }
}
