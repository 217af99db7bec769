//! Index of Productive Syntax.
//!
//! A fixed checklist of 56 syntactic and morphological structures, grouped
//! into noun-phrase (N), verb-phrase (V), question/negation (Q), and
//! sentence-structure (S) subscales, is evaluated against a bounded sample
//! of utterances. Each item scores at most 2 points; several items also
//! credit related items when they fire. Utterances without a usable
//! dependency graph are skipped.

use std::collections::HashMap;

use lalia_protocol::{AffixKind, ConfigError, DependencyGraph, GraEdge, Token, Utterance};

/// Scoring configuration. The conventional sample is the first 100
/// utterances; a zero bound is rejected eagerly.
#[derive(Debug, Clone)]
pub struct IpsynOptions {
    pub sample: usize,
}

impl Default for IpsynOptions {
    fn default() -> Self {
        IpsynOptions { sample: 100 }
    }
}

/// Subscale totals plus the per-item breakdown, in checklist order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpsynScores {
    pub by_item: Vec<(&'static str, u8)>,
    pub noun_phrase: u32,
    pub verb_phrase: u32,
    pub questions: u32,
    pub sentences: u32,
    pub total: u32,
}

impl IpsynScores {
    pub fn item(&self, name: &str) -> u8 {
        self.by_item
            .iter()
            .find(|(item, _)| *item == name)
            .map(|(_, score)| *score)
            .unwrap_or(0)
    }
}

/// Score the first `options.sample` utterances.
pub fn ipsyn(utterances: &[Utterance], options: &IpsynOptions) -> Result<IpsynScores, ConfigError> {
    if options.sample == 0 {
        return Err(ConfigError::InvalidSampleBound(options.sample));
    }

    let samples: Vec<Sample> = utterances
        .iter()
        .take(options.sample)
        .filter_map(Sample::new)
        .collect();

    let mut board = Board::default();
    for (item, matcher) in ITEMS {
        for sample in &samples {
            if board.capped(item) {
                break;
            }
            matcher(sample, &mut board);
        }
    }

    let by_item: Vec<(&'static str, u8)> = ITEMS
        .iter()
        .map(|(item, _)| (*item, board.get(item)))
        .collect();
    let subscale = |prefix: char| -> u32 {
        by_item
            .iter()
            .filter(|(item, _)| item.starts_with(prefix))
            .map(|(_, score)| u32::from(*score))
            .sum()
    };
    let noun_phrase = subscale('N');
    let verb_phrase = subscale('V');
    let questions = subscale('Q');
    let sentences = subscale('S');

    Ok(IpsynScores {
        by_item,
        noun_phrase,
        verb_phrase,
        questions,
        sentences,
        total: noun_phrase + verb_phrase + questions + sentences,
    })
}

#[derive(Default)]
struct Board {
    scores: HashMap<&'static str, u8>,
}

impl Board {
    fn get(&self, item: &str) -> u8 {
        self.scores.get(item).copied().unwrap_or(0)
    }

    fn capped(&self, item: &str) -> bool {
        self.get(item) >= 2
    }

    /// Score one occurrence; returns whether the item is now capped.
    fn hit(&mut self, item: &'static str) -> bool {
        let entry = self.scores.entry(item).or_insert(0);
        if *entry < 2 {
            *entry += 1;
        }
        *entry >= 2
    }

    /// Cross-credit a related item, respecting its cap.
    fn credit(&mut self, item: &'static str) {
        self.hit(item);
    }

    fn force_cap(&mut self, item: &'static str) {
        self.scores.insert(item, 2);
    }
}

/// One scoreable utterance: tokens, a sound dependency graph, and whether
/// the transcription marks it as a question.
struct Sample<'a> {
    tokens: &'a [Token],
    graph: &'a DependencyGraph,
    question: bool,
}

impl<'a> Sample<'a> {
    fn new(utterance: &'a Utterance) -> Option<Sample<'a>> {
        let graph = utterance.graph.as_ref()?;
        if graph.is_faulty() {
            return None;
        }
        Some(Sample {
            tokens: &utterance.tokens,
            graph,
            question: utterance.is_question(),
        })
    }

    fn n(&self) -> usize {
        self.tokens.len()
    }

    // 1-based, as in the dependency node space; 0 (the root) and
    // out-of-range indices answer with empty strings.
    fn tok(&self, i: usize) -> Option<&Token> {
        if i == 0 {
            None
        } else {
            self.tokens.get(i - 1)
        }
    }

    fn pos(&self, i: usize) -> &str {
        self.tok(i).map_or("", Token::pos_str)
    }

    fn word(&self, i: usize) -> &str {
        self.tok(i).map_or("", |t| t.word.as_str())
    }

    fn edges(&self) -> &[GraEdge] {
        self.graph.edges()
    }

    fn head_of(&self, i: usize) -> Option<usize> {
        self.graph.head_of(i)
    }

    fn rel_of(&self, i: usize) -> &str {
        self.graph.rel_of(i).unwrap_or("")
    }

    fn content_len(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_punctuation()).count()
    }

    /// 1-based index of the last non-punctuation token, 0 when none.
    fn last_content(&self) -> usize {
        self.tokens
            .iter()
            .rposition(|t| !t.is_punctuation())
            .map_or(0, |i| i + 1)
    }

    /// Whether position `i` is followed by a clause boundary: the end of
    /// the utterance or a punctuation token.
    fn boundary_after(&self, i: usize) -> bool {
        i >= self.n() || self.tokens[i].is_punctuation()
    }
}

fn is_noun(pos: &str) -> bool {
    pos == "n" || pos.starts_with("n:")
}

fn is_modifier(pos: &str) -> bool {
    matches!(pos, "pro:poss:det" | "adj" | "qn")
}

fn has_inflection(token: &Token, label: &str) -> bool {
    token.has_affix(AffixKind::Inflection, label)
}

const WH_WORDS: &[&str] = &["what", "why", "how", "which", "where", "when"];

type Matcher = fn(&Sample, &mut Board);

const ITEMS: &[(&'static str, Matcher)] = &[
    ("N1", n1),
    ("N2", n2),
    ("N3", n3),
    ("N4", n4),
    ("N5", n5),
    ("N6", n6),
    ("N7", n7),
    ("N8", n8),
    ("N9", n9),
    ("N10", n10),
    ("N11", n11),
    ("V1", v1),
    ("V2", v2),
    ("V3", v3),
    ("V4", v4),
    ("V5", v5),
    ("V6", v6),
    ("V7", v7),
    ("V8", v8),
    ("V9", v9),
    ("V10", v10),
    ("V11", v11),
    ("V12", v12),
    ("V13", v13),
    ("V14", v14),
    ("V15", v15),
    ("V16", v16),
    ("Q1", q1),
    ("Q2", q2),
    ("Q3", q3),
    ("Q4", q4),
    ("Q5", q5),
    ("Q6", q6),
    ("Q7", q7),
    ("Q8", q8),
    ("Q9", q9),
    ("Q10", q10),
    ("S1", s1),
    ("S2", s2),
    ("S3", s3),
    ("S4", s4),
    ("S5", s5),
    ("S6", s6),
    ("S7", s7),
    ("S8", s8),
    ("S9", s9),
    ("S10", s10),
    ("S11", s11),
    ("S12", s12),
    ("S13", s13),
    ("S14", s14),
    ("S15", s15),
    ("S16", s16),
    ("S17", s17),
    ("S18", s18),
    ("S19", s19),
];

// N1: proper, mass, or count noun
fn n1(s: &Sample, b: &mut Board) {
    for i in 1..=s.n() {
        if is_noun(s.pos(i)) && b.hit("N1") {
            break;
        }
    }
}

// N2: pronoun or prolocative, excluding modifiers
fn n2(s: &Sample, b: &mut Board) {
    for i in 1..=s.n() {
        let pos = s.pos(i);
        if pos.starts_with("pro") && pos != "pro:poss:det" && b.hit("N2") {
            break;
        }
    }
}

// N3: modifier, including adjectives, possessives, and quantifiers
fn n3(s: &Sample, b: &mut Board) {
    for i in 1..=s.n() {
        if is_modifier(s.pos(i)) && b.hit("N3") {
            break;
        }
    }
}

// N4: two-word NP, nominal preceded by article or modifier
fn n4(s: &Sample, b: &mut Board) {
    if s.content_len() < 2 {
        return;
    }
    for i in 1..s.n() {
        if is_modifier(s.pos(i)) && is_noun(s.pos(i + 1)) && b.hit("N4") {
            break;
        }
    }
}

// N5: article used before a noun (also credit N4)
fn n5(s: &Sample, b: &mut Board) {
    if s.content_len() < 2 {
        return;
    }
    for i in 1..s.n() {
        if s.pos(i) == "det" && is_noun(s.pos(i + 1)) {
            b.credit("N4");
            if b.hit("N5") {
                break;
            }
        }
    }
}

// N6: two-word NP after verb or preposition (also credit N4)
fn n6(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for i in 1..=s.n().saturating_sub(2) {
        if matches!(s.pos(i), "v" | "prep")
            && is_modifier(s.pos(i + 1))
            && is_noun(s.pos(i + 2))
        {
            b.credit("N4");
            if b.hit("N6") {
                break;
            }
        }
    }
}

// N7: plural suffix
fn n7(s: &Sample, b: &mut Board) {
    for token in s.tokens {
        if has_inflection(token, "PL") && b.hit("N7") {
            break;
        }
    }
}

// N8: two-word NP before verb (also credit N4)
fn n8(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for i in 1..=s.n().saturating_sub(2) {
        if is_modifier(s.pos(i)) && is_noun(s.pos(i + 1)) && s.pos(i + 2) == "v" {
            b.credit("N4");
            if b.hit("N8") {
                break;
            }
        }
    }
}

// N9: three-word NP, det/mod + mod + noun (also credit N4)
fn n9(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for i in 1..=s.n().saturating_sub(2) {
        if is_modifier(s.pos(i))
            && matches!(s.pos(i + 1), "adj" | "qn")
            && is_noun(s.pos(i + 2))
        {
            b.credit("N4");
            if b.hit("N9") {
                break;
            }
        }
    }
}

// N10: adverb modifying adjective or nominal (also credit V8)
fn n10(s: &Sample, b: &mut Board) {
    if s.content_len() < 2 {
        return;
    }
    for i in 1..=s.n() {
        if s.pos(i) != "adv" {
            continue;
        }
        if let Some(head) = s.head_of(i) {
            if matches!(s.pos(head), "adj" | "n") {
                b.credit("V8");
                if b.hit("N10") {
                    break;
                }
            }
        }
    }
}

// N11: any other bound morpheme on a noun or adjective
fn n11(s: &Sample, b: &mut Board) {
    for token in s.tokens {
        let pos = token.pos_str();
        if !(is_noun(pos) || pos == "adj") {
            continue;
        }
        let other_bound = token
            .affixes
            .iter()
            .any(|a| a.kind == AffixKind::Inflection && a.label != "PL");
        if other_bound && b.hit("N11") {
            break;
        }
    }
}

// V1: verb
fn v1(s: &Sample, b: &mut Board) {
    for i in 1..=s.n() {
        if s.pos(i) == "v" && b.hit("V1") {
            break;
        }
    }
}

// V2: particle or preposition
fn v2(s: &Sample, b: &mut Board) {
    for i in 1..=s.n() {
        if s.pos(i) == "prep" && b.hit("V2") {
            break;
        }
    }
}

// V3: prepositional phrase (also credit V2)
fn v3(s: &Sample, b: &mut Board) {
    for edge in s.edges() {
        if edge.relation == "POBJ" {
            b.credit("V2");
            if b.hit("V3") {
                break;
            }
        }
    }
}

// V4: copula linking two nominals (also credit V1)
fn v4(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for i in 1..=s.n() {
        if s.pos(i) != "cop" {
            continue;
        }
        let mut subject = false;
        let mut predicate = false;
        for edge in s.edges() {
            if edge.head != i {
                continue;
            }
            if edge.relation == "SUBJ" && !s.pos(edge.dependent).ends_with("wh") {
                subject = true;
            } else if edge.relation == "PRED" {
                predicate = true;
            }
        }
        if subject && predicate {
            b.credit("V1");
            if b.hit("V4") {
                break;
            }
        }
    }
}

// V5: catenative (pseudo-auxiliary) preceding a verb
fn v5(s: &Sample, b: &mut Board) {
    const PSEUDO_AUX: &[&str] = &[
        "hafta",
        "haf(ta)",
        "s'pose(da)",
        "s'poseda",
        "gonna",
        "gon(na)",
        "wanna",
        "wanta",
        "wan(t)(a)",
        "want(a)",
        "wan(na)",
        "gotta",
        "got(ta)",
        "better",
    ];
    if s.content_len() < 2 {
        return;
    }
    for i in 1..s.n() {
        if s.pos(i + 1) == "v" && PSEUDO_AUX.contains(&s.word(i)) && b.hit("V5") {
            break;
        }
    }
}

// V6: auxiliary be/do/have in VP (also credit V5)
fn v6(s: &Sample, b: &mut Board) {
    for token in s.tokens {
        let pos = token.pos_str();
        let lemma = token.lemma_str();
        if (pos == "aux" && !lemma.starts_with("wi")) || (pos == "mod" && lemma == "do") {
            b.credit("V5");
            if b.hit("V6") {
                break;
            }
        }
    }
}

// V7: progressive suffix
fn v7(s: &Sample, b: &mut Board) {
    for token in s.tokens {
        if token.affixes.last().map_or(false, |a| a.label == "PRESP") && b.hit("V7") {
            break;
        }
    }
}

// V8: adverb
fn v8(s: &Sample, b: &mut Board) {
    for i in 1..=s.n() {
        if s.pos(i) == "adv" && b.hit("V8") {
            break;
        }
    }
}

// V9: modal preceding verb (also credit V5)
fn v9(s: &Sample, b: &mut Board) {
    if s.content_len() < 2 {
        return;
    }
    for i in 1..s.n() {
        let token_is_clitic = s.tok(i).map_or(false, Token::is_clitic);
        if s.pos(i).starts_with("mod") && s.pos(i + 1) == "v" && !token_is_clitic {
            b.credit("V5");
            if b.hit("V9") {
                break;
            }
        }
    }
}

// V10: third person singular present suffix
fn v10(s: &Sample, b: &mut Board) {
    for token in s.tokens {
        if has_inflection(token, "3S") && b.hit("V10") {
            break;
        }
    }
}

// V11: past tense modal (also credit V9)
fn v11(s: &Sample, b: &mut Board) {
    const PAST_MODALS: &[&str] = &["could", "did", "might", "would", "wouldn't"];
    for i in 1..=s.n() {
        if s.pos(i) == "mod" && PAST_MODALS.contains(&s.word(i)) {
            b.credit("V9");
            if b.hit("V11") {
                break;
            }
        }
    }
}

// V12: regular past tense suffix
fn v12(s: &Sample, b: &mut Board) {
    for token in s.tokens {
        if has_inflection(token, "PAST") && b.hit("V12") {
            break;
        }
    }
}

// V13: past tense auxiliary (also credit V6)
fn v13(s: &Sample, b: &mut Board) {
    for token in s.tokens {
        let fused_past = token
            .affixes
            .iter()
            .any(|a| a.kind == AffixKind::Fusion && a.label.starts_with("PAST"));
        if fused_past && matches!(token.pos_str(), "aux" | "mod") {
            b.credit("V6");
            if b.hit("V13") {
                break;
            }
        }
    }
}

// V14: medial adverb, neither first nor last word (also credit V8)
fn v14(s: &Sample, b: &mut Board) {
    let last = s.last_content();
    for i in 2..last {
        if s.pos(i) == "adv" {
            b.credit("V8");
            if b.hit("V14") {
                break;
            }
        }
    }
}

// V15: copula, modal, or auxiliary for emphasis or ellipsis
// (also credit V4, V6, V9, V11, V13, V16)
fn v15(s: &Sample, b: &mut Board) {
    if s.content_len() < 2 {
        return;
    }
    for i in 1..=s.n() {
        if matches!(s.pos(i), "cop" | "aux" | "mod") && s.boundary_after(i) {
            for related in ["V4", "V6", "V9", "V11", "V13", "V16"] {
                b.credit(related);
            }
            if b.hit("V15") {
                break;
            }
        }
    }
}

// V16: past tense copula (also credit V4)
fn v16(s: &Sample, b: &mut Board) {
    for token in s.tokens {
        let past = token.affixes.iter().any(|a| a.label.starts_with("PAST"));
        if token.pos_str().starts_with("cop") && past {
            b.credit("V4");
            if b.hit("V16") {
                break;
            }
        }
    }
}

// Q1: intonationally marked question; auto-capped by Q4/Q8
fn q1(s: &Sample, b: &mut Board) {
    if s.question && s.n() >= 1 && !WH_WORDS.contains(&s.word(1)) {
        b.hit("Q1");
    }
}

// Q2: wh-question; auto-capped by Q4/Q8
fn q2(s: &Sample, b: &mut Board) {
    if s.question && WH_WORDS.contains(&s.word(1)) {
        b.hit("Q2");
    }
}

// Q3: simple negation, neg + X
fn q3(s: &Sample, b: &mut Board) {
    if s.content_len() < 2 {
        return;
    }
    for i in 1..=s.n() {
        if matches!(s.word(i), "no" | "not" | "can't" | "don't") && !s.boundary_after(i) {
            if b.hit("Q3") {
                break;
            }
        }
    }
}

// Q4: initial wh-pronoun followed by verb; capping also caps Q1 and Q2
fn q4(s: &Sample, b: &mut Board) {
    if !s.question || s.content_len() < 2 || !WH_WORDS.contains(&s.word(1)) {
        return;
    }
    if let Some(root) = s.head_of(1) {
        if s.pos(root) == "v" && b.hit("Q4") {
            b.force_cap("Q1");
            b.force_cap("Q2");
        }
    }
}

// Q5: negative morpheme between subject and verb (also credit Q3)
fn q5(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for edge in s.edges() {
        if edge.dependent > edge.head || edge.relation != "SUBJ" || s.pos(edge.head) != "v" {
            continue;
        }
        if (edge.dependent + 1..edge.head).any(|i| s.pos(i) == "neg") {
            b.credit("Q3");
            if b.hit("Q5") {
                break;
            }
        }
    }
}

// Q6: wh-question with inverted modal, copula, or auxiliary
fn q6(s: &Sample, b: &mut Board) {
    if s.content_len() < 2 {
        return;
    }
    for edge in s.edges() {
        if matches!(s.pos(edge.head), "cop" | "mod" | "aux")
            && edge.dependent < edge.head
            && s.pos(edge.dependent) == "adv:wh"
            && b.hit("Q6")
        {
            break;
        }
    }
}

// Q7: negation of copula, modal, or auxiliary (also credit Q5)
fn q7(s: &Sample, b: &mut Board) {
    if s.content_len() < 2 {
        return;
    }
    for edge in s.edges() {
        if matches!(s.pos(edge.head), "mod" | "cop" | "aux") && s.pos(edge.dependent) == "neg" {
            b.credit("Q5");
            if b.hit("Q7") {
                break;
            }
        }
    }
}

// Q8: yes/no question with inverted modal, copula, or auxiliary;
// capping also caps Q1 and Q2
fn q8(s: &Sample, b: &mut Board) {
    if !s.question || s.content_len() < 2 {
        return;
    }
    for i in 1..s.n() {
        let preceded_by_wh = i > 1 && s.pos(i - 1).ends_with("wh");
        if matches!(s.pos(i), "cop" | "mod" | "aux")
            && !preceded_by_wh
            && s.rel_of(i + 1) == "SUBJ"
            && b.hit("Q8")
        {
            b.force_cap("Q1");
            b.force_cap("Q2");
            break;
        }
    }
}

// Q9: why, when, which, whose
fn q9(s: &Sample, b: &mut Board) {
    for i in 1..=s.n() {
        if matches!(s.word(i), "why" | "when" | "which" | "whose") && b.hit("Q9") {
            break;
        }
    }
}

// Q10: tag question
fn q10(s: &Sample, b: &mut Board) {
    if !s.question || s.content_len() < 2 {
        return;
    }
    let last = s.last_content();
    if matches!(s.word(last), "okay" | "ok" | "right") && b.hit("Q10") {
        return;
    }
    for i in 1..=s.n() {
        let short_tag =
            s.pos(i) == "cop" && s.pos(i + 1) == "pro" && s.boundary_after(i + 1);
        let negated_tag = s.pos(i) == "cop"
            && s.pos(i + 1) == "neg"
            && s.pos(i + 2) == "pro"
            && s.boundary_after(i + 2);
        if (short_tag || negated_tag) && b.hit("Q10") {
            break;
        }
    }
}

// S1: two-word combination
fn s1(s: &Sample, b: &mut Board) {
    if s.content_len() >= 2 {
        b.hit("S1");
    }
}

// S2: subject-verb sequence (also credit S1)
fn s2(s: &Sample, b: &mut Board) {
    if s.content_len() < 2 {
        return;
    }
    for edge in s.edges() {
        if edge.dependent < edge.head && edge.relation == "SUBJ" && s.pos(edge.head) == "v" {
            b.credit("S1");
            if b.hit("S2") {
                break;
            }
        }
    }
}

// S3: verb-object sequence (also credit S1)
fn s3(s: &Sample, b: &mut Board) {
    if s.content_len() < 2 {
        return;
    }
    for edge in s.edges() {
        if edge.dependent > edge.head && edge.relation == "OBJ" && s.pos(edge.head) == "v" {
            b.credit("S1");
            if b.hit("S3") {
                break;
            }
        }
    }
}

// S4: subject-verb-object sequence (also credit S2 and S3)
fn s4(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for i in 1..=s.n() {
        if s.pos(i) != "v" {
            continue;
        }
        let has_subject = s
            .edges()
            .iter()
            .any(|e| e.head == i && e.dependent < i && e.relation == "SUBJ");
        let has_object = s
            .edges()
            .iter()
            .any(|e| e.head == i && e.dependent > i && e.relation == "OBJ");
        if has_subject && has_object {
            b.credit("S2");
            b.credit("S3");
            if b.hit("S4") {
                break;
            }
        }
    }
}

// S5: conjunction
fn s5(s: &Sample, b: &mut Board) {
    for i in 1..=s.n() {
        if s.pos(i) == "conj" && b.hit("S5") {
            break;
        }
    }
}

// S6: sentence with two VPs
fn s6(s: &Sample, b: &mut Board) {
    if s.content_len() < 4 {
        return;
    }
    let mut verbs: Vec<usize> = s
        .edges()
        .iter()
        .filter(|e| s.pos(e.head) == "v")
        .map(|e| e.head)
        .collect();
    verbs.sort_unstable();
    verbs.dedup();
    if verbs.len() == 2 && !s.graph.edge_exists(verbs[0], verbs[1]) {
        b.hit("S6");
    }
}

// S7: conjoined phrases, conjunction flanked by words (also credit S5)
fn s7(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for i in 1..=s.n().saturating_sub(2) {
        let flanked = !s.tokens[i - 1].is_punctuation() && !s.tokens[i + 1].is_punctuation();
        if s.pos(i + 1) == "conj" && flanked {
            b.credit("S5");
            if b.hit("S7") {
                break;
            }
        }
    }
}

// S8: infinitive without catenative, marked with "to"
// (also credit S6 and V5)
fn s8(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for edge in s.edges() {
        if s.pos(edge.dependent) != "inf" {
            continue;
        }
        let infinitive_verb = edge.head;
        if infinitive_verb >= 1 && !s.rel_of(infinitive_verb).ends_with("ROOT") {
            b.credit("S6");
            b.credit("V5");
            if b.hit("S8") {
                break;
            }
        }
    }
}

// S9: let/make/help/watch introducer with a dependent verb
fn s9(s: &Sample, b: &mut Board) {
    if !matches!(s.word(1), "let" | "make" | "help" | "watch") {
        return;
    }
    let introduces_verb = s
        .edges()
        .iter()
        .any(|e| e.head == 1 && s.pos(e.dependent) == "v");
    if introduces_verb {
        b.hit("S9");
    }
}

// S10: adverbial conjunction, excluding and/or/then (also credit S5)
fn s10(s: &Sample, b: &mut Board) {
    for i in 1..=s.n() {
        if s.pos(i) == "conj" && !matches!(s.word(i), "and" | "or" | "then") {
            b.credit("S5");
            if b.hit("S10") {
                break;
            }
        }
    }
}

// S11: propositional complement, a second subject (also credit S6)
fn s11(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    let mut subjects = 0;
    for edge in s.edges() {
        let dependent_is_clitic = s.tok(edge.dependent).map_or(false, Token::is_clitic);
        if edge.relation == "SUBJ" && !dependent_is_clitic {
            subjects += 1;
            if subjects > 1 {
                b.credit("S6");
                if b.hit("S11") {
                    break;
                }
            }
        }
    }
}

// S12: conjoined sentences (also credit S6 and S5)
fn s12(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for edge in s.edges() {
        if s.word(edge.dependent) == "and"
            && edge.relation == "CONJ"
            && s.pos(edge.head) == "v"
        {
            b.credit("S6");
            b.credit("S5");
            if b.hit("S12") {
                break;
            }
        }
    }
}

// S13: wh-clause (also credit S6; with infinitive, also S8 and S17)
fn s13(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for edge in s.edges() {
        if !s.pos(edge.dependent).ends_with("wh") {
            continue;
        }
        let infinitive_follows = s.pos(edge.dependent + 1) == "inf";
        // the wh-word's head must not itself be the root: that would be
        // a plain wh-question rather than an embedded clause
        if s.rel_of(edge.head) != "ROOT" {
            b.credit("S6");
            if infinitive_follows {
                b.credit("S8");
                b.credit("S17");
            }
            if b.hit("S13") {
                break;
            }
        }
    }
}

// S14: bitransitive predicate, two objects of one head (also credit S3)
fn s14(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    let mut object_heads: Vec<usize> = s
        .edges()
        .iter()
        .filter(|e| e.relation == "OBJ")
        .map(|e| e.head)
        .collect();
    let total = object_heads.len();
    object_heads.sort_unstable();
    object_heads.dedup();
    if object_heads.len() < total {
        b.credit("S3");
        b.hit("S14");
    }
}

// S15: sentence with three or more VPs (also credit S6)
fn s15(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    let verbs = (1..=s.n()).filter(|&i| s.pos(i) == "v").count();
    if verbs > 2 {
        b.credit("S6");
        b.hit("S15");
    }
}

// S16: relative clause, right-branching CMOD without "and" between
// (also credit S6)
fn s16(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for edge in s.edges() {
        if edge.dependent < edge.head || edge.relation != "CMOD" {
            continue;
        }
        let conjoined = (edge.head + 1..edge.dependent).any(|i| s.word(i) == "and");
        if !conjoined {
            b.credit("S6");
            if b.hit("S16") {
                break;
            }
        }
    }
}

// S17: infinitive clause with a new subject (also credit S8)
fn s17(s: &Sample, b: &mut Board) {
    if s.content_len() < 3 {
        return;
    }
    for edge in s.edges() {
        if s.word(edge.dependent) != "to" || s.pos(edge.dependent) != "inf" {
            continue;
        }
        // "he wants me to go": the infinitive verb hangs off the main
        // verb, and the main verb also has an object
        let infinitive_verb = edge.head;
        let main_verb = match s.head_of(infinitive_verb) {
            Some(head) if head >= 1 => head,
            _ => continue,
        };
        let has_object = s
            .edges()
            .iter()
            .any(|e| e.head == main_verb && e.relation == "OBJ");
        if has_object {
            b.credit("S8");
            if b.hit("S17") {
                break;
            }
        }
    }
}

// S18: gerund (also credit V7)
fn s18(s: &Sample, b: &mut Board) {
    for i in 1..=s.n() {
        if s.pos(i) == "n:gerund" {
            b.credit("V7");
            if b.hit("S18") {
                break;
            }
        }
    }
}

// S19: front or center-embedded subordinate clause, a conjunction
// preceding two subjects (also credit S6)
fn s19(s: &Sample, b: &mut Board) {
    let mut first_conjunction = usize::MAX;
    let mut subject_positions = Vec::new();
    for edge in s.edges() {
        if s.pos(edge.dependent) == "conj" {
            first_conjunction = first_conjunction.min(edge.dependent);
        }
        if edge.relation == "SUBJ" {
            subject_positions.push(edge.dependent);
        }
    }
    if subject_positions.len() < 2 {
        return;
    }
    if first_conjunction < subject_positions.iter().copied().min().unwrap_or(0) {
        b.credit("S6");
        b.hit("S19");
    }
}
