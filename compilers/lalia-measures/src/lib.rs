//! Standardized developmental measures over parsed utterances.
//!
//! All measures are pure functions of utterance slices: callers choose the
//! scope (one speaker, one file, a whole corpus) and pass the utterances in.
//! An empty scope yields `None` rather than a sentinel value; the only
//! aborting errors are malformed requests ([`lalia_protocol::ConfigError`]).

pub mod freq;
pub mod ipsyn;
pub mod mlu;
pub mod ttr;

use std::collections::HashSet;

use lalia_protocol::Utterance;

pub use freq::{ranked, word_frequencies, word_ngrams};
pub use ipsyn::{ipsyn, IpsynOptions, IpsynScores};
pub use mlu::{mlu_morphemes, mlu_words};
pub use ttr::ttr;

/// Exclusion sets and scoping shared by the word-based measures. The
/// defaults are the conventional CHAT exclusions; `speakers: None` means
/// every speaker is in scope.
#[derive(Debug, Clone)]
pub struct MeasureOptions {
    pub speakers: Option<HashSet<String>>,
    /// POS tags whose tokens never count as morpheme carriers.
    pub excluded_pos: HashSet<String>,
    /// Words that never count as word tokens.
    pub excluded_words: HashSet<String>,
    /// Markers that exclude a whole utterance from MLU.
    pub unintelligible: HashSet<String>,
    pub fold_case: bool,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        let to_set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        MeasureOptions {
            speakers: None,
            excluded_pos: to_set(&["", "!", "+...", "0", "?", "BEG", ".", ","]),
            excluded_words: to_set(&["", "!", "+...", ".", ",", "?", "\u{2021}", "\u{201e}", "0"]),
            unintelligible: to_set(&["xxx", "yyy", "www"]),
            fold_case: false,
        }
    }
}

impl MeasureOptions {
    /// Scope to a single speaker code, e.g. the target child `CHI`.
    pub fn for_speaker(speaker: &str) -> Self {
        MeasureOptions {
            speakers: Some(std::iter::once(speaker.to_string()).collect()),
            ..MeasureOptions::default()
        }
    }

    pub fn in_scope(&self, utterance: &Utterance) -> bool {
        match &self.speakers {
            Some(speakers) => speakers.contains(&utterance.speaker),
            None => true,
        }
    }

    pub(crate) fn fold(&self, word: &str) -> String {
        if self.fold_case {
            word.to_lowercase()
        } else {
            word.to_string()
        }
    }
}

/// Utterances the options put in scope, in order.
pub fn scoped<'a>(
    utterances: &'a [Utterance],
    options: &'a MeasureOptions,
) -> impl Iterator<Item = &'a Utterance> {
    utterances.iter().filter(move |u| options.in_scope(u))
}
