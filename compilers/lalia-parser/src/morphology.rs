//! `%mor` tier decoding.
//!
//! One whitespace-separated entry annotates one surface word, except that
//! clitics ride along on their host's entry: `pro|it~v|be&3S` is the word
//! `it's`. Expansion splits those into separate elements so the element
//! sequence lines up one-to-one with `%gra` dependency nodes.

use once_cell::sync::Lazy;
use regex::Regex;

use lalia_protocol::{Affix, AffixKind, CliticKind};

// ((preclitics)$)? core (~(postclitics))?
static CLITIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((.+)\$)?([^$~]+)(~(.+))?$").unwrap());

/// One element of the expanded `%mor` sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorElement {
    pub morph: String,
    pub clitic: Option<CliticKind>,
}

/// Expand each entry of a `%mor` line into pre-clitic, core, and
/// post-clitic elements, preserving order.
pub fn expand_entries(mor_line: &str) -> Vec<MorElement> {
    let mut elements = Vec::new();
    for entry in mor_line.split_whitespace() {
        let captures = match CLITIC.captures(entry) {
            Some(c) => c,
            None => continue,
        };
        if let Some(preclitics) = captures.get(2) {
            for morph in preclitics.as_str().split('$') {
                elements.push(MorElement {
                    morph: morph.to_string(),
                    clitic: Some(CliticKind::Pre),
                });
            }
        }
        if let Some(core) = captures.get(3) {
            elements.push(MorElement {
                morph: core.as_str().to_string(),
                clitic: None,
            });
        }
        if let Some(postclitics) = captures.get(5) {
            for morph in postclitics.as_str().split('~') {
                elements.push(MorElement {
                    morph: morph.to_string(),
                    clitic: Some(CliticKind::Post),
                });
            }
        }
    }
    elements
}

/// POS, lemma, and affixes decoded from one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedMorph {
    pub pos: String,
    pub lemma: String,
    pub affixes: Vec<Affix>,
}

/// Decode `pos|stem-SUF&FUS` (or a bare punctuation mark, which has no `|`)
/// into its parts. Compound stems (`n|+n|birth+n|day`) contribute a
/// `Compound` affix per extra segment.
pub fn decode_morph(element: &str) -> DecodedMorph {
    let (pos, remainder) = match element.split_once('|') {
        Some((pos, remainder)) => (pos.to_string(), remainder),
        None => {
            return DecodedMorph {
                pos: element.to_string(),
                ..DecodedMorph::default()
            }
        }
    };

    let mut lemma = String::new();
    let mut affixes = Vec::new();

    for (segment_index, segment) in remainder.split('+').filter(|s| !s.is_empty()).enumerate() {
        let (stem, segment_affixes) = split_stem_affixes(segment);
        if segment_index == 0 {
            lemma = stem;
        } else {
            affixes.push(Affix {
                kind: AffixKind::Compound,
                label: stem,
            });
        }
        affixes.extend(segment_affixes);
    }

    DecodedMorph { pos, lemma, affixes }
}

// Split "go&PAST-3S" into the stem and its delimiter-classified suffixes.
fn split_stem_affixes(segment: &str) -> (String, Vec<Affix>) {
    let mut stem = String::new();
    let mut affixes = Vec::new();
    let mut current: Option<(AffixKind, String)> = None;

    for c in segment.chars() {
        match c {
            '-' | '&' => {
                if let Some((kind, label)) = current.take() {
                    affixes.push(Affix { kind, label });
                }
                let kind = if c == '-' {
                    AffixKind::Inflection
                } else {
                    AffixKind::Fusion
                };
                current = Some((kind, String::new()));
            }
            _ => match current {
                Some((_, ref mut label)) => label.push(c),
                None => stem.push(c),
            },
        }
    }
    if let Some((kind, label)) = current {
        affixes.push(Affix { kind, label });
    }

    (stem, affixes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_entry_expands_to_itself() {
        let elements = expand_entries("pro:dem|that n|cookie .");
        assert_eq!(elements.len(), 3);
        assert!(elements.iter().all(|e| e.clitic.is_none()));
        assert_eq!(elements[1].morph, "n|cookie");
    }

    #[test]
    fn postclitic_splits_off() {
        let elements = expand_entries("pro:dem|that~cop|be&3S n|cookie");
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].morph, "pro:dem|that");
        assert_eq!(elements[0].clitic, None);
        assert_eq!(elements[1].morph, "cop|be&3S");
        assert_eq!(elements[1].clitic, Some(CliticKind::Post));
        assert_eq!(elements[2].clitic, None);
    }

    #[test]
    fn preclitic_splits_off() {
        let elements = expand_entries("pro|le$v|voir");
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].morph, "pro|le");
        assert_eq!(elements[0].clitic, Some(CliticKind::Pre));
        assert_eq!(elements[1].morph, "v|voir");
    }

    #[test]
    fn inflection_and_fusion_decode() {
        let decoded = decode_morph("n|doggie-PL");
        assert_eq!(decoded.pos, "n");
        assert_eq!(decoded.lemma, "doggie");
        assert_eq!(
            decoded.affixes,
            vec![Affix {
                kind: AffixKind::Inflection,
                label: "PL".to_string(),
            }]
        );

        let decoded = decode_morph("cop|be&3S");
        assert_eq!(decoded.lemma, "be");
        assert_eq!(decoded.affixes[0].kind, AffixKind::Fusion);
        assert_eq!(decoded.affixes[0].label, "3S");
    }

    #[test]
    fn punctuation_entry_is_bare_pos() {
        let decoded = decode_morph(".");
        assert_eq!(decoded.pos, ".");
        assert_eq!(decoded.lemma, "");
        assert!(decoded.affixes.is_empty());
    }

    #[test]
    fn compound_decodes_to_segments() {
        let decoded = decode_morph("n|+n|birth+n|day-PL");
        assert_eq!(decoded.pos, "n");
        assert_eq!(decoded.lemma, "n|birth");
        assert_eq!(
            decoded.affixes,
            vec![
                Affix {
                    kind: AffixKind::Compound,
                    label: "n|day".to_string(),
                },
                Affix {
                    kind: AffixKind::Inflection,
                    label: "PL".to_string(),
                },
            ]
        );
    }

    #[test]
    fn mixed_suffix_order_preserved() {
        let decoded = decode_morph("v|go&PAST-3S");
        assert_eq!(decoded.lemma, "go");
        assert_eq!(decoded.affixes.len(), 2);
        assert_eq!(decoded.affixes[0].kind, AffixKind::Fusion);
        assert_eq!(decoded.affixes[1].kind, AffixKind::Inflection);
    }
}
