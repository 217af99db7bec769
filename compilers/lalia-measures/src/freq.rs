//! Word-frequency and n-gram counters.

use std::collections::HashMap;
use std::hash::Hash;

use lalia_protocol::{ConfigError, Utterance};

use crate::{scoped, MeasureOptions};

/// Occurrence counts of surface words across the scope. Clitic tokens have
/// no surface form and are not counted; everything else, punctuation
/// included when kept at parse time, is.
pub fn word_frequencies(
    utterances: &[Utterance],
    options: &MeasureOptions,
) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for utterance in scoped(utterances, options) {
        for token in &utterance.tokens {
            if token.word.is_empty() {
                continue;
            }
            *counts.entry(options.fold(&token.word)).or_insert(0) += 1;
        }
    }
    counts
}

/// N-gram counts over each utterance's word sequence. Windows never cross
/// utterance boundaries. `n == 0` is rejected eagerly.
pub fn word_ngrams(
    n: usize,
    utterances: &[Utterance],
    options: &MeasureOptions,
) -> Result<HashMap<Vec<String>, usize>, ConfigError> {
    if n == 0 {
        return Err(ConfigError::InvalidNgramSize(n));
    }

    let mut counts = HashMap::new();
    for utterance in scoped(utterances, options) {
        let words: Vec<String> = utterance
            .tokens
            .iter()
            .filter(|t| !t.word.is_empty())
            .map(|t| options.fold(&t.word))
            .collect();
        for window in words.windows(n) {
            *counts.entry(window.to_vec()).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

/// Ordered view of a counter: descending count, ascending term for ties.
pub fn ranked<K: Ord + Eq + Hash + Clone>(counts: &HashMap<K, usize>) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|(ka, va), (kb, vb)| vb.cmp(va).then_with(|| ka.cmp(kb)));
    entries
}
