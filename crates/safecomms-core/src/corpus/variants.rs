//! Obfuscation variant generators.
//!
//! Each generator is deterministic: variants come out in a fixed order so
//! corpus construction is reproducible. All generators operate on single
//! words only; multi-word terms are never obfuscated.

use std::collections::HashSet;

use crate::catalog::SeedCatalog;

/// Cap on glyph-substitution variants per source word.
pub const GLYPH_VARIANT_LIMIT: usize = 32;

/// Cap on repeated-letter variants per source word.
pub const REPEAT_VARIANT_LIMIT: usize = 12;

/// Glyph-substitution variants of `word`.
///
/// Chooses 1..=min(4, substitutable positions) letter positions and
/// replaces each chosen letter with one of its substitute glyphs,
/// enumerating subsets by increasing size and substitutes in map order.
pub fn glyph_variants(word: &str, catalog: &SeedCatalog, limit: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let positions: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| catalog.substitutes(**c).is_some())
        .map(|(i, _)| i)
        .collect();
    if positions.is_empty() {
        return Vec::new();
    }

    let mut variants = Vec::new();
    let mut seen = HashSet::new();
    let max_positions = positions.len().min(4);

    for count in 1..=max_positions {
        for selected in combinations(&positions, count) {
            let options: Vec<&[char]> = selected
                .iter()
                .map(|&i| catalog.substitutes(chars[i]).unwrap_or_default())
                .collect();
            let total: usize = options.iter().map(|o| o.len()).product();

            for n in 0..total {
                // Mixed-radix decode; the last position varies fastest.
                let mut rem = n;
                let mut candidate = chars.clone();
                for k in (0..selected.len()).rev() {
                    candidate[selected[k]] = options[k][rem % options[k].len()];
                    rem /= options[k].len();
                }
                let variant: String = candidate.into_iter().collect();
                if seen.insert(variant.clone()) {
                    variants.push(variant);
                    if variants.len() >= limit {
                        return variants;
                    }
                }
            }
        }
    }

    variants
}

/// Repeated-letter variants of `word`.
///
/// For each alphabetic position: the letter duplicated in place, and an
/// extra pair inserted before it.
pub fn repeat_variants(word: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut variants = Vec::new();
    let mut seen = HashSet::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphabetic() {
            continue;
        }
        let duplicated: String = splice(&chars, i + 1, &[c]);
        let doubled: String = splice(&chars, i, &[c, c]);
        for variant in [duplicated, doubled] {
            if seen.insert(variant.clone()) {
                variants.push(variant);
            }
        }
        if variants.len() >= limit {
            break;
        }
    }

    variants
}

/// Separator variants: the word with `.`, `_`, and `-` between every
/// letter. Empty for words shorter than three characters.
pub fn separator_variants(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 3 {
        return Vec::new();
    }
    ['.', '_', '-']
        .iter()
        .map(|&sep| join_chars(&chars, sep))
        .collect()
}

/// The marker-round variant: `marker` inserted into `word` at a position
/// that advances with the round index. `None` for words shorter than two
/// characters.
pub fn marker_variant(word: &str, marker: char, round: usize) -> Option<String> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 2 {
        return None;
    }
    let pos = (round % (chars.len() - 1)) + 1;
    Some(splice(&chars, pos, &[marker]))
}

fn splice(chars: &[char], at: usize, insert: &[char]) -> String {
    chars[..at]
        .iter()
        .chain(insert.iter())
        .chain(chars[at..].iter())
        .collect()
}

fn join_chars(chars: &[char], sep: char) -> String {
    let mut out = String::with_capacity(chars.len() * 2);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/// Lexicographic k-combinations of `items`.
fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    let n = items.len();
    let mut result = Vec::new();
    if k == 0 || k > n {
        return result;
    }

    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        result.push(idx.iter().map(|&i| items[i]).collect());

        // Advance to the next combination, right to left.
        let mut i = k;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            if idx[i] != i + n - k {
                break;
            }
            if i == 0 {
                return result;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
