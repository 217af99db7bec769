//! Type-token ratio.

use lalia_protocol::Utterance;

use crate::{scoped, MeasureOptions};

/// Distinct word types over word tokens, after exclusions. `None` when the
/// scope contributes no tokens; otherwise always in (0, 1].
pub fn ttr(utterances: &[Utterance], options: &MeasureOptions) -> Option<f64> {
    let mut types = std::collections::HashSet::new();
    let mut tokens = 0usize;

    for utterance in scoped(utterances, options) {
        for token in &utterance.tokens {
            if options.excluded_words.contains(&token.word) {
                continue;
            }
            types.insert(options.fold(&token.word));
            tokens += 1;
        }
    }

    if tokens == 0 {
        None
    } else {
        Some(types.len() as f64 / tokens as f64)
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use lalia_parser::{parse_transcript, ParseOptions};
    use proptest::prelude::*;

    fn transcript(words: &[String]) -> Vec<Utterance> {
        let text = format!("*CHI:\t{} .\n", words.join(" "));
        parse_transcript("prop.cha", &text, &ParseOptions::default()).utterances
    }

    proptest! {
        // The ratio stays in (0, 1] for any nonempty scope.
        #[test]
        fn ratio_in_unit_interval(
            words in proptest::collection::vec("[a-v]{1,8}", 1..16)
        ) {
            let parsed = transcript(&words);
            let value = ttr(&parsed, &MeasureOptions::default()).unwrap();
            prop_assert!(value > 0.0);
            prop_assert!(value <= 1.0);
        }

        // All-distinct tokens yield a ratio of exactly one.
        #[test]
        fn distinct_tokens_score_one(
            words in proptest::collection::hash_set("[a-v]{1,8}", 1..16)
        ) {
            let words: Vec<String> = words.into_iter().collect();
            let parsed = transcript(&words);
            prop_assert_eq!(ttr(&parsed, &MeasureOptions::default()), Some(1.0));
        }
    }
}
