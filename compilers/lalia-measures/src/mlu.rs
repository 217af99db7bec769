//! Mean length of utterance, in words or in morphemes.

use lalia_protocol::{Utterance, UtteranceFlags};

use crate::{scoped, MeasureOptions};

fn is_unintelligible(utterance: &Utterance, options: &MeasureOptions) -> bool {
    utterance.flags.contains(UtteranceFlags::UNINTELLIGIBLE)
        || utterance
            .tokens
            .iter()
            .any(|t| options.unintelligible.contains(&t.word))
}

fn mean(lengths: &[usize]) -> Option<f64> {
    if lengths.is_empty() {
        None
    } else {
        Some(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64)
    }
}

/// MLU in words. Utterances with unintelligible material are skipped whole;
/// excluded words contribute nothing; an utterance contributing zero words
/// does not count toward the denominator. `None` when nothing remains.
pub fn mlu_words(utterances: &[Utterance], options: &MeasureOptions) -> Option<f64> {
    let mut lengths = Vec::new();
    for utterance in scoped(utterances, options) {
        if is_unintelligible(utterance, options) {
            continue;
        }
        let count = utterance
            .tokens
            .iter()
            .filter(|t| !options.excluded_words.contains(&t.word))
            .count();
        if count > 0 {
            lengths.push(count);
        }
    }
    mean(&lengths)
}

/// MLU in morphemes. Tokens with an excluded POS (punctuation, fillers,
/// untagged material) carry no morphemes; clitic tokens carry their own.
pub fn mlu_morphemes(utterances: &[Utterance], options: &MeasureOptions) -> Option<f64> {
    let mut lengths = Vec::new();
    for utterance in scoped(utterances, options) {
        if is_unintelligible(utterance, options) {
            continue;
        }
        let count: usize = utterance
            .tokens
            .iter()
            .filter(|t| !options.excluded_pos.contains(t.pos_str()))
            .map(|t| t.morpheme_count())
            .sum();
        if count > 0 {
            lengths.push(count);
        }
    }
    mean(&lengths)
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use lalia_parser::{parse_transcript, ParseOptions};
    use proptest::prelude::*;

    fn transcript(utterances: &[Vec<String>]) -> Vec<Utterance> {
        let text: String = utterances
            .iter()
            .map(|words| format!("*CHI:\t{} .\n", words.join(" ")))
            .collect();
        parse_transcript("prop.cha", &text, &ParseOptions::default()).utterances
    }

    proptest! {
        // MLUw is at least one (every counted utterance carries a word)
        // and undefined exactly when the scope is empty.
        #[test]
        fn word_mlu_positive_or_undefined(
            utterances in proptest::collection::vec(
                proptest::collection::vec("[a-v]{1,8}", 1..8),
                0..8,
            )
        ) {
            let parsed = transcript(&utterances);
            match mlu_words(&parsed, &MeasureOptions::default()) {
                Some(value) => {
                    prop_assert!(value.is_finite());
                    prop_assert!(value >= 1.0);
                }
                None => prop_assert!(utterances.is_empty()),
            }
        }

        // The mean never exceeds the longest utterance.
        #[test]
        fn word_mlu_bounded_by_longest_utterance(
            utterances in proptest::collection::vec(
                proptest::collection::vec("[a-v]{1,8}", 1..8),
                1..8,
            )
        ) {
            let parsed = transcript(&utterances);
            let longest = utterances.iter().map(Vec::len).max().unwrap_or(0);
            let value = mlu_words(&parsed, &MeasureOptions::default()).unwrap();
            prop_assert!(value <= longest as f64);
        }
    }
}
