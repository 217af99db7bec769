use std::collections::BTreeMap;

use bitflags::bitflags;
use chrono::NaiveDate;
use thiserror::Error;

use crate::graph::DependencyGraph;

/// Age of a participant, from the CHAT `years;months.days` notation.
///
/// Any part may be unknown (e.g., `"2;10."` has no day component).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Age {
    pub years: Option<u32>,
    pub months: Option<u32>,
    pub days: Option<u32>,
}

impl Age {
    /// Parse the CHAT age notation. Returns `None` when no part is numeric.
    pub fn parse(s: &str) -> Option<Age> {
        let (year_str, month_day) = match s.split_once(';') {
            Some((y, rest)) => (y, rest),
            None => (s, ""),
        };
        let (month_str, day_str) = match month_day.split_once('.') {
            Some((m, d)) => (m, d),
            None => (month_day, ""),
        };
        let age = Age {
            years: year_str.parse().ok(),
            months: month_str.parse().ok(),
            days: day_str.parse().ok(),
        };
        if age == Age::default() {
            None
        } else {
            Some(age)
        }
    }

    /// Age in months, with unknown parts treated as zero.
    pub fn to_months(&self) -> f64 {
        f64::from(self.years.unwrap_or(0)) * 12.0
            + f64::from(self.months.unwrap_or(0))
            + f64::from(self.days.unwrap_or(0)) / 30.0
    }
}

/// One participant from the `@Participants` / `@ID` headers.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub name: String,
    pub role: String,
    pub age: Option<Age>,
    pub birth: Option<NaiveDate>,
    /// Free-form demographic fields from the `@ID` line
    /// (language, corpus, sex, group, ses, education, custom).
    pub fields: BTreeMap<String, String>,
}

/// File-level metadata collected from `@` header lines.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Headers {
    pub participants: BTreeMap<String, Participant>,
    pub dates_of_recording: Vec<NaiveDate>,
    /// Ordering indicates language dominance.
    pub languages: Vec<String>,
    pub extra: BTreeMap<String, String>,
}

/// Delimiter class of a morphological affix on the `%mor` tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AffixKind {
    /// `-`: inflectional suffix, e.g. `dog-PL`.
    Inflection,
    /// `&`: fusional form, e.g. `go&PAST`.
    Fusion,
    /// `+`: compound part, e.g. `+n|birth+n|day`.
    Compound,
}

/// Attachment direction of a clitic element split off a `%mor` entry
/// (`$` marks preclitics, `~` marks postclitics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CliticKind {
    Pre,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Affix {
    pub kind: AffixKind,
    pub label: String,
}

/// One word-level unit of an utterance, owned by that utterance.
///
/// Clitics split off a `%mor` entry (the `be` of `it's`) become their own
/// tokens with an empty surface `word` and `clitic` set, so that positions
/// line up one-to-one with `%gra` dependency nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Position within the utterance, unique, starting at 0.
    pub index: usize,
    /// Surface word, cleaned of retracing/overlap/error markup.
    pub word: String,
    pub pos: Option<String>,
    pub lemma: Option<String>,
    pub affixes: Vec<Affix>,
    pub clitic: Option<CliticKind>,
}

impl Token {
    /// Number of morphemes: the stem plus inflectional suffixes.
    /// Fusional forms and compound parts are single morphemes; clitics
    /// carry their own token and are counted there.
    pub fn morpheme_count(&self) -> usize {
        1 + self
            .affixes
            .iter()
            .filter(|a| a.kind == AffixKind::Inflection)
            .count()
    }

    pub fn is_clitic(&self) -> bool {
        self.clitic.is_some()
    }

    pub fn has_affix(&self, kind: AffixKind, label: &str) -> bool {
        self.affixes
            .iter()
            .any(|a| a.kind == kind && a.label == label)
    }

    pub fn pos_str(&self) -> &str {
        self.pos.as_deref().unwrap_or("")
    }

    pub fn lemma_str(&self) -> &str {
        self.lemma.as_deref().unwrap_or("")
    }

    /// Whether this token is a clause-boundary punctuation mark.
    pub fn is_punctuation(&self) -> bool {
        is_punctuation_mark(&self.word)
    }
}

/// CHAT clause-boundary marks, including the `+`-prefixed special terminators
/// such as `+...` (trailing off) and `+/.` (interruption).
pub fn is_punctuation_mark(word: &str) -> bool {
    matches!(word, "." | "?" | "!" | "," | ";" | "‡" | "„")
        || (word.starts_with('+') && word.ends_with(['.', '?', '!']))
}

bitflags! {
    /// Conditions recorded against an utterance during parsing.
    /// Serde impls come from the `bitflags/serde` feature.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UtteranceFlags: u8 {
        /// The %mor tier could not be fully aligned with the surface words.
        const PARTIALLY_TAGGED = 1;
        /// Contains an unintelligible marker (xxx, yyy, www).
        const UNINTELLIGIBLE = 2;
    }
}

/// One transcribed turn, in file order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Utterance {
    /// Speaker code, e.g. `"CHI"`, `"MOT"`.
    pub speaker: String,
    pub tokens: Vec<Token>,
    /// Main-tier text as transcribed, before markup cleanup.
    pub raw: String,
    /// Start/end milliseconds from an embedded time-alignment bullet.
    pub time_marks: Option<(u32, u32)>,
    /// Raw text of every dependent tier, keyed by marker (`"%mor"`, ...).
    pub tiers: BTreeMap<String, String>,
    /// Present when the utterance carries a %gra tier.
    pub graph: Option<DependencyGraph>,
    pub flags: UtteranceFlags,
}

impl Utterance {
    /// Whether the turn is a question, judged from the raw transcription so
    /// the answer does not depend on whether punctuation tokens were kept.
    /// A trailing time-alignment bullet does not hide the terminator.
    pub fn is_question(&self) -> bool {
        let trailing =
            |c: char| c == '\u{15}' || c == '_' || c == '-' || c.is_ascii_digit() || c.is_whitespace();
        self.raw.trim_end_matches(trailing).ends_with('?')
            || self.tokens.last().map_or(false, |t| t.word == "?")
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.word.as_str())
    }
}

/// One parsed CHAT file. Immutable once parsed; re-parsing replaces it
/// wholesale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transcript {
    /// File path or caller-supplied label.
    pub id: String,
    pub headers: Headers,
    pub utterances: Vec<Utterance>,
    /// Non-fatal issues encountered while parsing this file.
    pub warnings: Vec<ParseWarning>,
}

impl Transcript {
    /// Speaker codes that actually produced utterances in this file.
    pub fn speakers(&self) -> std::collections::BTreeSet<&str> {
        self.utterances.iter().map(|u| u.speaker.as_str()).collect()
    }

    /// Age of the given participant in months, if the headers record one.
    pub fn age_months(&self, participant: &str) -> Option<f64> {
        self.headers
            .participants
            .get(participant)
            .and_then(|p| p.age)
            .map(|a| a.to_months())
    }
}

/// Non-fatal, per-transcript parse issues. Parsing always continues past
/// these; callers inspect `Transcript::warnings` afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseWarning {
    #[error("line {line}: unrecognized content: {text}")]
    UnrecognizedLine { line: usize, text: String },
    #[error("utterance {utterance}: %mor tier has {entries} entries for {words} words")]
    MorTierMismatch {
        utterance: usize,
        words: usize,
        entries: usize,
    },
    #[error("utterance {utterance}: %gra tier has {triples} triples for {tokens} tokens")]
    GraTierMismatch {
        utterance: usize,
        tokens: usize,
        triples: usize,
    },
    #[error("line {line}: cannot parse date: {text}")]
    BadHeaderDate { line: usize, text: String },
}

/// Malformed requests. The only error class that aborts a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("n must be a positive integer for n-grams, got {0}")]
    InvalidNgramSize(usize),
    #[error("IPSyn sample bound must be a positive integer, got {0}")]
    InvalidSampleBound(usize),
}
