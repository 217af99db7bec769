//! CHAT transcript parsing.
//!
//! `parse_transcript` turns one CHAT file's text into a [`Transcript`]:
//! headers decoded from `@` lines, utterances assembled from `*` main tiers
//! and their `%` dependent tiers, with the morphology and dependency tiers
//! aligned token-by-token. Parsing never fails; anything unexpected lands in
//! `Transcript::warnings`.

pub mod clean;
pub mod gra;
pub mod lines;
pub mod morphology;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use lalia_protocol::{
    DependencyGraph, GraEdge, Headers, ParseWarning, TierKind, Token, Transcript, Utterance,
    UtteranceFlags,
};

use crate::morphology::MorElement;

static TIME_MARKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x15-?(\d+)_(\d+)-?\x15").unwrap());

/// Parser configuration. Defaults follow CHAT conventions: clause-boundary
/// punctuation is dropped from the token stream and surface case is kept.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Keep `.`, `?`, `!`, `,` and the `+`-prefixed terminators as tokens.
    pub keep_punctuation: bool,
    /// Lowercase surface words.
    pub fold_case: bool,
}

/// Parse one CHAT file. `id` is the file path or any caller-supplied label.
pub fn parse_transcript(id: &str, text: &str, options: &ParseOptions) -> Transcript {
    let (logical_lines, mut warnings) = lines::assemble(text);

    let mut headers = Headers::default();
    let mut utterances = Vec::new();
    // main line + dependent tiers of the utterance being assembled
    let mut pending: Option<(String, String, BTreeMap<String, String>)> = None;

    for line in &logical_lines {
        if line.text.starts_with('@') {
            lines::decode_header_line(line, &mut headers, &mut warnings);
            continue;
        }
        if let Ok((rest, speaker)) = lines::main_marker(&line.text) {
            if let Some(bundle) = pending.take() {
                utterances.push(build_utterance(bundle, utterances.len(), options, &mut warnings));
            }
            pending = Some((
                speaker.to_string(),
                rest.trim().to_string(),
                BTreeMap::new(),
            ));
            continue;
        }
        if let Ok((rest, tier)) = lines::tier_marker(&line.text) {
            match pending {
                Some((_, _, ref mut tiers)) => {
                    tiers.insert(format!("%{tier}"), rest.trim().to_string());
                }
                None => warnings.push(ParseWarning::UnrecognizedLine {
                    line: line.number,
                    text: line.text.clone(),
                }),
            }
            continue;
        }
        warnings.push(ParseWarning::UnrecognizedLine {
            line: line.number,
            text: line.text.clone(),
        });
    }
    if let Some(bundle) = pending.take() {
        utterances.push(build_utterance(bundle, utterances.len(), options, &mut warnings));
    }

    for warning in &warnings {
        log::warn!("{id}: {warning}");
    }

    Transcript {
        id: id.to_string(),
        headers,
        utterances,
        warnings,
    }
}

fn build_utterance(
    (speaker, raw, tiers): (String, String, BTreeMap<String, String>),
    utterance_index: usize,
    options: &ParseOptions,
    warnings: &mut Vec<ParseWarning>,
) -> Utterance {
    let time_marks = TIME_MARKS.captures(&raw).and_then(|c| {
        let start = c.get(1)?.as_str().parse().ok()?;
        let end = c.get(2)?.as_str().parse().ok()?;
        Some((start, end))
    });

    let (words, unintelligible) = clean::clean_utterance(&raw);
    let mut flags = UtteranceFlags::default();
    if unintelligible {
        flags |= UtteranceFlags::UNINTELLIGIBLE;
    }

    let tier = |kind: TierKind| {
        tiers
            .iter()
            .find(|(marker, _)| TierKind::from_marker(marker) == kind)
            .map(|(_, line)| line.as_str())
    };

    // Align the %mor elements against the surface words: every non-clitic
    // element consumes one word.
    let mut elements = tier(TierKind::Mor)
        .map(morphology::expand_entries)
        .unwrap_or_default();
    let n_clitics = elements.iter().filter(|e| e.clitic.is_some()).count();

    if !elements.is_empty() && words.len() + n_clitics != elements.len() {
        warnings.push(ParseWarning::MorTierMismatch {
            utterance: utterance_index,
            words: words.len(),
            entries: elements.len(),
        });
        flags |= UtteranceFlags::PARTIALLY_TAGGED;
        // best-effort: discard clitic elements and zip cores to words
        elements.retain(|e| e.clitic.is_none());
        elements.truncate(words.len());
    }

    let mut tokens = build_tokens(&words, &elements, options);

    let mut graph = tier(TierKind::Gra).map(|line| {
        let outcome = gra::decode_gra_tier(line, tokens.len());
        if outcome.mismatch {
            warnings.push(ParseWarning::GraTierMismatch {
                utterance: utterance_index,
                tokens: tokens.len(),
                triples: outcome.n_triples,
            });
        }
        outcome.graph
    });

    if !options.keep_punctuation {
        graph = drop_punctuation(&mut tokens, graph);
    }
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }

    Utterance {
        speaker,
        tokens,
        raw,
        time_marks,
        tiers,
        graph,
        flags,
    }
}

fn build_tokens(words: &[String], elements: &[MorElement], options: &ParseOptions) -> Vec<Token> {
    let mut tokens = Vec::new();

    let mut push = |word: String, element: Option<&MorElement>| {
        let word = if options.fold_case {
            word.to_lowercase()
        } else {
            word
        };
        let (pos, lemma, affixes) = match element {
            Some(e) => {
                let decoded = morphology::decode_morph(&e.morph);
                (Some(decoded.pos), Some(decoded.lemma), decoded.affixes)
            }
            None => (None, None, Vec::new()),
        };
        tokens.push(Token {
            index: tokens.len(),
            word,
            pos,
            lemma,
            affixes,
            clitic: element.and_then(|e| e.clitic),
        });
    };

    if elements.is_empty() {
        for word in words {
            push(clean::clean_word(word), None);
        }
        return tokens;
    }

    let mut word_iter = words.iter();
    for element in elements {
        if element.clitic.is_some() {
            push(String::new(), Some(element));
        } else {
            let word = word_iter.next().map(String::as_str).unwrap_or("");
            push(clean::clean_word(word), Some(element));
        }
    }
    // words beyond a truncated %mor tier stay untagged
    for word in word_iter {
        push(clean::clean_word(word), None);
    }
    tokens
}

/// Remove punctuation tokens and renumber the graph over the survivors.
/// An edge whose dependent is removed disappears; a surviving edge whose
/// head is removed leaves its dependent headless, which the rebuilt graph
/// reports as faulty.
fn drop_punctuation(
    tokens: &mut Vec<Token>,
    graph: Option<DependencyGraph>,
) -> Option<DependencyGraph> {
    let keep: Vec<bool> = tokens.iter().map(|t| !t.is_punctuation()).collect();
    if keep.iter().all(|k| *k) {
        return graph;
    }

    // old 1-based node -> new 1-based node; 0 stays the root
    let mut node_map = vec![0usize; keep.len() + 1];
    let mut next = 0;
    for (i, kept) in keep.iter().enumerate() {
        if *kept {
            next += 1;
            node_map[i + 1] = next;
        }
    }

    let mut index = 0;
    tokens.retain(|_| {
        let kept = keep[index];
        index += 1;
        kept
    });

    graph.map(|old| {
        let was_faulty = old.is_faulty();
        let edges: Vec<GraEdge> = old
            .edges()
            .iter()
            .filter(|e| e.dependent >= 1 && e.dependent < node_map.len() && keep[e.dependent - 1])
            .filter(|e| e.head == 0 || (e.head < node_map.len() && keep[e.head - 1]))
            .map(|e| GraEdge {
                dependent: node_map[e.dependent],
                head: if e.head == 0 { 0 } else { node_map[e.head] },
                relation: e.relation.clone(),
            })
            .collect();
        if was_faulty {
            DependencyGraph::faulty_with(tokens.len(), edges)
        } else {
            DependencyGraph::new(tokens.len(), edges)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lalia_protocol::AffixKind;

    const SAMPLE: &str = "\
@UTF8
@Begin
@Languages:\teng
@Participants:\tCHI Eve Target_Child , MOT Sue Mother
@ID:\teng|Brown|CHI|1;6.|female|||Target_Child||
@Date:\t01-FEB-1995
*CHI:\tmore cookie . \u{15}1927_3101\u{15}
%mor:\tqn|more n|cookie .
%gra:\t1|2|QUANT 2|0|INCROOT 3|2|PUNCT
%int:\tdistinctive , loud
*MOT:\tyou want more cookies ?
%mor:\tpro:per|you v|want qn|more n|cookie-PL ?
%gra:\t1|2|SUBJ 2|0|ROOT 3|4|QUANT 4|2|OBJ 5|2|PUNCT
@End
";

    #[test]
    fn sample_parses_clean() {
        let t = parse_transcript("eve.cha", SAMPLE, &ParseOptions::default());
        assert!(t.warnings.is_empty());
        assert_eq!(t.utterances.len(), 2);
        assert_eq!(t.headers.languages, vec!["eng"]);
        assert_eq!(t.headers.participants["CHI"].name, "Eve");

        let u = &t.utterances[0];
        assert_eq!(u.speaker, "CHI");
        assert_eq!(u.time_marks, Some((1927, 3101)));
        assert_eq!(u.words().collect::<Vec<_>>(), vec!["more", "cookie"]);
        assert_eq!(u.tokens[0].pos.as_deref(), Some("qn"));
        assert_eq!(u.tokens[1].lemma.as_deref(), Some("cookie"));
        assert_eq!(u.tiers["%int"], "distinctive , loud");
    }

    #[test]
    fn punctuation_dropped_and_graph_renumbered() {
        let t = parse_transcript("eve.cha", SAMPLE, &ParseOptions::default());
        let graph = t.utterances[0].graph.as_ref().unwrap();
        assert!(!graph.is_faulty());
        assert_eq!(graph.n_tokens(), 2);
        assert_eq!(graph.head_of(1), Some(2));
        assert_eq!(graph.rel_of(2), Some("INCROOT"));
    }

    #[test]
    fn punctuation_kept_on_request() {
        let options = ParseOptions {
            keep_punctuation: true,
            ..ParseOptions::default()
        };
        let t = parse_transcript("eve.cha", SAMPLE, &options);
        let u = &t.utterances[1];
        assert_eq!(u.tokens.len(), 5);
        assert_eq!(u.tokens[4].word, "?");
        let graph = u.graph.as_ref().unwrap();
        assert_eq!(graph.n_tokens(), 5);
        assert_eq!(graph.rel_of(5), Some("PUNCT"));
    }

    #[test]
    fn inflection_decoded_through_pipeline() {
        let t = parse_transcript("eve.cha", SAMPLE, &ParseOptions::default());
        let cookies = &t.utterances[1].tokens[3];
        assert_eq!(cookies.word, "cookies");
        assert_eq!(cookies.affixes[0].kind, AffixKind::Inflection);
        assert_eq!(cookies.affixes[0].label, "PL");
        assert_eq!(cookies.morpheme_count(), 2);
    }

    #[test]
    fn clitic_becomes_own_token() {
        let text = "\
*CHI:\tthat's mine .
%mor:\tpro:dem|that~cop|be&3S pro:poss|mine .
%gra:\t1|2|SUBJ 2|0|ROOT 3|2|PRED 4|2|PUNCT
";
        let t = parse_transcript("x.cha", text, &ParseOptions::default());
        assert!(t.warnings.is_empty());
        let u = &t.utterances[0];
        assert_eq!(u.tokens.len(), 3);
        assert_eq!(u.tokens[0].word, "that's");
        assert!(u.tokens[1].is_clitic());
        assert_eq!(u.tokens[1].word, "");
        assert_eq!(u.tokens[1].lemma.as_deref(), Some("be"));
        let graph = u.graph.as_ref().unwrap();
        assert!(!graph.is_faulty());
        assert_eq!(graph.head_of(2), Some(0));
    }

    #[test]
    fn mor_mismatch_warns_and_degrades() {
        let text = "\
*CHI:\ta b c .
%mor:\tdet|a n|b
";
        let t = parse_transcript("x.cha", text, &ParseOptions::default());
        assert!(matches!(
            t.warnings[0],
            ParseWarning::MorTierMismatch {
                utterance: 0,
                words: 4,
                entries: 2,
            }
        ));
        let u = &t.utterances[0];
        assert!(u.flags.contains(UtteranceFlags::PARTIALLY_TAGGED));
        assert_eq!(u.tokens.len(), 3);
        assert_eq!(u.tokens[0].pos.as_deref(), Some("det"));
        assert_eq!(u.tokens[2].pos, None);
    }

    #[test]
    fn gra_mismatch_warns_and_marks_faulty() {
        let text = "\
*CHI:\tmore cookie .
%mor:\tqn|more n|cookie .
%gra:\t1|2|QUANT 2|0|INCROOT
";
        let t = parse_transcript("x.cha", text, &ParseOptions::default());
        assert!(matches!(
            t.warnings[0],
            ParseWarning::GraTierMismatch { utterance: 0, .. }
        ));
        assert!(t.utterances[0].graph.as_ref().unwrap().is_faulty());
    }

    #[test]
    fn unintelligible_sets_flag() {
        let text = "*CHI:\txxx more .\n%mor:\tqn|more .\n";
        let t = parse_transcript("x.cha", text, &ParseOptions::default());
        let u = &t.utterances[0];
        assert!(u.flags.contains(UtteranceFlags::UNINTELLIGIBLE));
        assert_eq!(u.words().collect::<Vec<_>>(), vec!["more"]);
        assert!(t.warnings.is_empty());
    }

    #[test]
    fn fold_case_lowercases_words() {
        let options = ParseOptions {
            fold_case: true,
            ..ParseOptions::default()
        };
        let t = parse_transcript("x.cha", "*CHI:\tMommy went Home .\n", &options);
        assert_eq!(
            t.utterances[0].words().collect::<Vec<_>>(),
            vec!["mommy", "went", "home"]
        );
    }

    #[test]
    fn question_detected_from_raw_text() {
        let t = parse_transcript("x.cha", "*CHI:\twhat's that ?\n", &ParseOptions::default());
        assert!(t.utterances[0].is_question());
        let t = parse_transcript("x.cha", "*CHI:\ta dog .\n", &ParseOptions::default());
        assert!(!t.utterances[0].is_question());
    }

    #[test]
    fn determinism() {
        let a = parse_transcript("eve.cha", SAMPLE, &ParseOptions::default());
        let b = parse_transcript("eve.cha", SAMPLE, &ParseOptions::default());
        assert_eq!(a, b);
    }
}
