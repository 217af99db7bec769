//! Main-tier markup cleanup.
//!
//! CHAT main lines carry a lot of inline annotation (retracing, overlap,
//! error coding, paralinguistic comments, pauses, time-alignment bullets).
//! `clean_utterance` resolves or strips all of it and returns the surface
//! word sequence, in transcription order.

use once_cell::sync::Lazy;
use regex::Regex;

/// Scoped annotations dropped outright, brackets and contents.
static DROP: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\[= [^\[]+?\]",    // explanation
        r"\[x \d+?\]",       // collapse count
        r"\[\+ [^\[]+?\]",   // postcode
        r"\[\* [^\[]+?\]",   // error coding
        r"\[=\? [^\[]+?\]",  // uncertain transcription
        r"\[=! [^\[]+?\]",   // paralinguistic event
        r"\[% [^\[]+?\]",    // comment
        r"\[- [^\[]+?\]",    // non-dominant language
        r"\[\^ [^\[]+?\]",   // complex local event
        r"\x15[^\x15]+?\x15", // time-alignment bullet
        r"\[<\d?\]",         // overlap follows
        r"\[>\d?\]",         // overlap precedes
        r"\((\d+?:)?\d+?\.?\d*?\)", // timed pause
        r"\[%act: [^\[]+?\]", // action
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Literal substitutions, applied in order. Bracket and quote delimiters are
/// padded with spaces first so that forms like `movement[?]` split cleanly.
const REPLACE: &[(&str, &str)] = &[
    ("[?]", " "),
    ("[!]", " "),
    ("[!!]", " "),
    ("[^c]", " "),
    ("\u{2039}", " "),
    ("\u{203a}", " "),
    ("\u{2308}", ""),
    ("\u{2309}", ""),
    ("\u{230a}", ""),
    ("\u{230b}", ""),
    ("[*] [/", " [/"),
    ("] [*]", "] "),
    ("[*]", " "),
    ("[//] [//]", "[//]"),
    ("[/] [//]", "[//]"),
    ("[/?] [/]", "[//]"),
    ("[//] [/]", "[/]"),
    ("<", " < "),
    ("+ <", "+<"),
    (">", " > "),
    ("[", " ["),
    ("]", "] "),
    ("\u{201c}", " \u{201c} "),
    ("\u{201d}", " \u{201d} "),
    (",", " , "),
    ("+ ,", "+,"),
];

static PAD_QUESTION_MARK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\[\./!])\?").unwrap());
static PAD_SHORT_PAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\.\)").unwrap());
static SPLIT_FINAL_PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])\.$").unwrap());

// target kept: "z [:: x]" or "<y z> [:: x]" keeps "z" / "y z"
static TARGET_SCOPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(<[^>]+?>) \[:: ([^\]]+?)\]").unwrap());
static TARGET_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S+?) \[:: ([^\]]+?)\]").unwrap());
// correction kept: "z [: x]" or "<y z> [: x]" keeps "x"
static CORRECTION_SCOPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(<[^>]+?>) \[: ([^\]]+?)\]").unwrap());
static CORRECTION_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S+?) \[: ([^\]]+?)\]").unwrap());

static RETRACE_WORD: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\S+? \[///\]",
        r"\S+? \[//\]",
        r"\S+? \[/\]",
        r"\S+? \[/\?\]",
        r"\S+? \[/-\]",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const UNINTELLIGIBLE: &[&str] = &["xxx", "yyy", "www"];

/// Prefixes whose words are dropped wholesale.
const ESCAPE_PREFIXES: &[&str] = &[
    "[?", "[/", "[<", "[>", "[:", "[!", "[*", "+\"", "+,", "<&", "&",
];
const ESCAPE_SUFFIXES: &[&str] = &["\u{21ab}xxx"];
const ESCAPE_WORDS: &[&str] = &[
    "0", "++", "+<", "+^", "(.)", "(..)", "(...)", ":", ";", ";;", "<", ">",
    "xx", "yy", "www:", "xxx:", "xxx;", "xxx;;", "xxx\u{2192}", "xxx\u{2191}",
    "xxx@si", "yyy:", "\u{2192}",
];
const KEEP_PREFIXES: &[&str] = &["+\"/", "+,/", "+\"."];

fn squeeze(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sub_all(mut s: String, regexes: &[Regex]) -> String {
    for re in regexes {
        s = re.replace_all(&s, "").into_owned();
    }
    s
}

fn sub_to_fixpoint(mut s: String, re: &Regex, replacement: &str) -> String {
    while re.is_match(&s) {
        s = re.replace_all(&s, replacement).into_owned();
    }
    s
}

/// Find the `<` that opens the angle group closing just before `check`,
/// scanning leftwards and balancing nested groups.
fn find_opening_angle(s: &str, check: usize) -> Option<usize> {
    let mut signal = 1i32;
    for (i, c) in s[..check].char_indices().rev() {
        match c {
            '>' => signal += 1,
            '<' => signal -= 1,
            _ => {}
        }
        if signal == 0 {
            return Some(i);
        }
    }
    None
}

/// Drop an angle-scoped retrace: `<y z> [-marker-]` disappears entirely.
fn drop_scoped_retrace(s: &str, marker: &str) -> String {
    if let Some(check) = s.find(marker) {
        if let Some(open) = find_opening_angle(s, check) {
            return squeeze(&format!("{} {}", &s[..open], &s[check + marker.len()..]));
        }
    }
    s.to_string()
}

fn strip_word_delimiters(word: &str) -> &str {
    let word = word.strip_prefix('<').unwrap_or(word);
    let word = word.strip_suffix('>').unwrap_or(word);
    word.strip_suffix(']').unwrap_or(word)
}

/// Cleaned surface words plus whether an unintelligible marker was seen.
/// Unintelligible material (`xxx` and friends) never reaches the token
/// stream, as `%mor` does not annotate it.
pub fn clean_utterance(utterance: &str) -> (Vec<String>, bool) {
    let mut s = sub_all(utterance.to_string(), &DROP);

    for (replacee, replacer) in REPLACE {
        s = s.replace(replacee, replacer);
    }
    s = squeeze(&s);

    s = PAD_QUESTION_MARK.replace_all(&s, "$1 ? ").into_owned();
    s = PAD_SHORT_PAUSE.replace_all(&s, " (.) ").into_owned();
    s = SPLIT_FINAL_PERIOD.replace_all(&s, "$1 .").into_owned();
    s = squeeze(&s);

    // Replaced-target and correction markup.
    s = sub_to_fixpoint(s, &TARGET_SCOPED, "$1");
    s = squeeze(&s);
    s = sub_to_fixpoint(s, &TARGET_WORD, "$1");
    s = squeeze(&s);
    s = sub_to_fixpoint(s, &CORRECTION_SCOPED, "<$2>");
    s = squeeze(&s);
    s = sub_to_fixpoint(s, &CORRECTION_WORD, "<$2>");
    s = squeeze(&s);

    // Retraced angle groups, innermost first.
    loop {
        let before = s.clone();
        for marker in ["> [///]", "> [//]", "> [/]", "> [/?]", "> [/-]"] {
            s = drop_scoped_retrace(&s, marker);
        }
        s = squeeze(&s);
        if s == before {
            break;
        }
    }

    s = sub_all(s, &RETRACE_WORD);
    s = s.replace('\u{201c}', "").replace('\u{201d}', "");
    s = squeeze(&s);

    let mut words = Vec::new();
    let mut unintelligible = false;
    for raw_word in s.split_whitespace() {
        let word = strip_word_delimiters(raw_word);

        if UNINTELLIGIBLE.contains(&word) {
            unintelligible = true;
            continue;
        }
        if KEEP_PREFIXES.iter().any(|k| word.starts_with(k)) {
            words.push(word.to_string());
            continue;
        }
        if ESCAPE_WORDS.contains(&word)
            || ESCAPE_PREFIXES.iter().any(|e| word.starts_with(e))
            || ESCAPE_SUFFIXES.iter().any(|e| word.ends_with(e))
        {
            if word.starts_with("xxx") || word.starts_with("yyy") || word == "xx" || word == "yy" {
                unintelligible = true;
            }
            continue;
        }
        words.push(word.to_string());
    }

    (words, unintelligible)
}

/// Per-word cleanup applied when a token is created: parenthesized
/// shortenings are expanded, lengthening and form markers stripped.
/// Clause terminators pass through intact.
pub fn clean_word(word: &str) -> String {
    if lalia_protocol::model::is_punctuation_mark(word) {
        return word.to_string();
    }
    let mut new_word: String = word
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | ':' | ';' | '+'))
        .collect();
    if let Some(at) = new_word.find('@') {
        new_word.truncate(at);
    }
    new_word
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        clean_utterance(s).0
    }

    #[test]
    fn plain_utterance_passes_through() {
        assert_eq!(words("more cookie ."), vec!["more", "cookie", "."]);
    }

    #[test]
    fn explanations_and_postcodes_dropped() {
        assert_eq!(
            words("a ball [= the red one] . [+ IMIT]"),
            vec!["a", "ball", "."]
        );
    }

    #[test]
    fn time_bullet_dropped() {
        assert_eq!(
            words("more cookie . \u{15}1927_3101\u{15}"),
            vec!["more", "cookie", "."]
        );
    }

    #[test]
    fn overlap_markers_dropped() {
        assert_eq!(
            words("no [<] <my turn> [>] ."),
            vec!["no", "my", "turn", "."]
        );
    }

    #[test]
    fn correction_replaces_word() {
        assert_eq!(words("goed [: went] home ."), vec!["went", "home", "."]);
        assert_eq!(
            words("<goed home> [: went home] ."),
            vec!["went", "home", "."]
        );
    }

    #[test]
    fn target_keeps_transcribed_form() {
        assert_eq!(words("piggie [:: piggy] ."), vec!["piggie", "."]);
    }

    #[test]
    fn retracing_dropped() {
        assert_eq!(words("I [/] I want it ."), vec!["I", "want", "it", "."]);
        assert_eq!(
            words("<I want> [//] I need it ."),
            vec!["I", "need", "it", "."]
        );
    }

    #[test]
    fn nested_retrace_scope() {
        assert_eq!(
            words("<the <big red> [/] big dog> [//] a cat ."),
            vec!["a", "cat", "."]
        );
    }

    #[test]
    fn question_mark_split_off() {
        assert_eq!(words("what's that?"), vec!["what's", "that", "?"]);
    }

    #[test]
    fn final_period_split_off() {
        assert_eq!(words("a dog."), vec!["a", "dog", "."]);
    }

    #[test]
    fn unintelligible_flagged_and_dropped() {
        let (ws, unintelligible) = clean_utterance("xxx more .");
        assert_eq!(ws, vec!["more", "."]);
        assert!(unintelligible);
    }

    #[test]
    fn pauses_and_fillers_dropped() {
        assert_eq!(words("I (.) want (2.5) it ."), vec!["I", "want", "it", "."]);
        assert_eq!(words("&um a dog ."), vec!["a", "dog", "."]);
    }

    #[test]
    fn clean_word_expands_shortening() {
        assert_eq!(clean_word("(be)cause"), "because");
        assert_eq!(clean_word("bunny@d"), "bunny");
        assert_eq!(clean_word("+..."), "+...");
    }
}
