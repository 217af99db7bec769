//! Ordered collections of parsed transcripts.
//!
//! A [`Corpus`] is a list of [`Transcript`]s behind a single read-write
//! lock. Readers take a snapshot of the list, so a measure computed while
//! another thread appends never observes a half-applied mutation. File
//! order is insertion order, and every by-file result follows it.
//!
//! Nothing is cached: every query and measure recomputes from the list as
//! it stands at call time.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;

use lalia_measures::{IpsynOptions, IpsynScores, MeasureOptions};
use lalia_parser::ParseOptions;
use lalia_protocol::{Age, ConfigError, Headers, Transcript, Utterance};

/// A collection of transcripts, in insertion order.
#[derive(Default)]
pub struct Corpus {
    files: RwLock<Vec<Arc<Transcript>>>,
}

impl Corpus {
    pub fn new() -> Corpus {
        Corpus::default()
    }

    /// Parse many `(id, text)` pairs in parallel. Results keep the input
    /// order regardless of which finishes first.
    pub fn from_strs(inputs: Vec<(String, String)>, options: &ParseOptions) -> Corpus {
        let files: Vec<Arc<Transcript>> = inputs
            .par_iter()
            .map(|(id, text)| Arc::new(lalia_parser::parse_transcript(id, text, options)))
            .collect();
        log::debug!("parsed {} transcript(s)", files.len());
        Corpus {
            files: RwLock::new(files),
        }
    }

    pub fn append(&self, transcript: Transcript) {
        log::debug!("append transcript {}", transcript.id);
        self.files.write().push(Arc::new(transcript));
    }

    pub fn extend(&self, transcripts: impl IntoIterator<Item = Transcript>) {
        let mut files = self.files.write();
        for transcript in transcripts {
            log::debug!("append transcript {}", transcript.id);
            files.push(Arc::new(transcript));
        }
    }

    /// Remove the transcript at `index`, shifting later files down.
    pub fn remove(&self, index: usize) -> Option<Arc<Transcript>> {
        let mut files = self.files.write();
        if index < files.len() {
            let removed = files.remove(index);
            log::debug!("removed transcript {}", removed.id);
            Some(removed)
        } else {
            None
        }
    }

    pub fn clear(&self) {
        log::debug!("cleared corpus");
        self.files.write().clear();
    }

    /// Reorder by the given participant's age, ascending; files without a
    /// recorded age sort last, keeping their relative order.
    pub fn sort_by_age(&self, participant: &str) {
        let mut files = self.files.write();
        files.sort_by(|a, b| {
            let a_age = a.age_months(participant);
            let b_age = b.age_months(participant);
            match (a_age, b_age) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
    }

    /// A new corpus holding the transcripts whose id the predicate keeps.
    pub fn filter(&self, predicate: impl Fn(&str) -> bool) -> Corpus {
        let kept: Vec<Arc<Transcript>> = self
            .snapshot()
            .into_iter()
            .filter(|t| predicate(&t.id))
            .collect();
        Corpus {
            files: RwLock::new(kept),
        }
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.files.read().iter().map(|t| t.id.clone()).collect()
    }

    /// Snapshot of the current file list.
    pub fn transcripts(&self) -> Vec<Arc<Transcript>> {
        self.snapshot()
    }

    fn snapshot(&self) -> Vec<Arc<Transcript>> {
        self.files.read().clone()
    }

    /// Speaker codes seen across the whole corpus.
    pub fn participants(&self) -> BTreeSet<String> {
        self.snapshot()
            .iter()
            .flat_map(|t| {
                t.speakers()
                    .into_iter()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Languages declared in headers across the whole corpus.
    pub fn languages(&self) -> BTreeSet<String> {
        self.snapshot()
            .iter()
            .flat_map(|t| t.headers.languages.clone())
            .collect()
    }

    /// Per-file ages for one participant.
    pub fn ages(&self, participant: &str) -> Vec<Option<Age>> {
        self.snapshot()
            .iter()
            .map(|t| t.headers.participants.get(participant).and_then(|p| p.age))
            .collect()
    }

    pub fn headers(&self) -> Vec<Headers> {
        self.snapshot().iter().map(|t| t.headers.clone()).collect()
    }

    /// In-scope utterances across all files, in corpus order.
    pub fn utterances(&self, options: &MeasureOptions) -> Vec<Utterance> {
        self.utterances_by_file(options).into_iter().flatten().collect()
    }

    pub fn utterances_by_file(&self, options: &MeasureOptions) -> Vec<Vec<Utterance>> {
        self.snapshot()
            .iter()
            .map(|t| {
                lalia_measures::scoped(&t.utterances, options)
                    .cloned()
                    .collect()
            })
            .collect()
    }

    /// Surface words of in-scope utterances, clitic placeholders skipped.
    pub fn words(&self, options: &MeasureOptions) -> Vec<String> {
        self.words_by_file(options).into_iter().flatten().collect()
    }

    pub fn words_by_file(&self, options: &MeasureOptions) -> Vec<Vec<String>> {
        self.utterances_by_file(options)
            .iter()
            .map(|utterances| {
                utterances
                    .iter()
                    .flat_map(Utterance::words)
                    .filter(|w| !w.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    }

    pub fn mlu_words(&self, options: &MeasureOptions) -> Vec<Option<f64>> {
        self.per_file(|u| lalia_measures::mlu_words(u, options))
    }

    pub fn mlu_words_combined(&self, options: &MeasureOptions) -> Option<f64> {
        lalia_measures::mlu_words(&self.utterances(options), options)
    }

    pub fn mlu_morphemes(&self, options: &MeasureOptions) -> Vec<Option<f64>> {
        self.per_file(|u| lalia_measures::mlu_morphemes(u, options))
    }

    pub fn mlu_morphemes_combined(&self, options: &MeasureOptions) -> Option<f64> {
        lalia_measures::mlu_morphemes(&self.utterances(options), options)
    }

    pub fn ttr(&self, options: &MeasureOptions) -> Vec<Option<f64>> {
        self.per_file(|u| lalia_measures::ttr(u, options))
    }

    pub fn ttr_combined(&self, options: &MeasureOptions) -> Option<f64> {
        lalia_measures::ttr(&self.utterances(options), options)
    }

    pub fn ipsyn(
        &self,
        options: &MeasureOptions,
        ipsyn_options: &IpsynOptions,
    ) -> Result<Vec<IpsynScores>, ConfigError> {
        self.utterances_by_file(options)
            .iter()
            .map(|u| lalia_measures::ipsyn(u, ipsyn_options))
            .collect()
    }

    pub fn ipsyn_combined(
        &self,
        options: &MeasureOptions,
        ipsyn_options: &IpsynOptions,
    ) -> Result<IpsynScores, ConfigError> {
        lalia_measures::ipsyn(&self.utterances(options), ipsyn_options)
    }

    pub fn word_frequencies(&self, options: &MeasureOptions) -> HashMap<String, usize> {
        lalia_measures::word_frequencies(&self.utterances(options), options)
    }

    pub fn word_frequencies_by_file(
        &self,
        options: &MeasureOptions,
    ) -> Vec<HashMap<String, usize>> {
        self.per_file(|u| lalia_measures::word_frequencies(u, options))
    }

    pub fn word_ngrams(
        &self,
        n: usize,
        options: &MeasureOptions,
    ) -> Result<HashMap<Vec<String>, usize>, ConfigError> {
        lalia_measures::word_ngrams(n, &self.utterances(options), options)
    }

    pub fn word_ngrams_by_file(
        &self,
        n: usize,
        options: &MeasureOptions,
    ) -> Result<Vec<HashMap<Vec<String>, usize>>, ConfigError> {
        self.utterances_by_file(options)
            .iter()
            .map(|u| lalia_measures::word_ngrams(n, u, options))
            .collect()
    }

    fn per_file<T>(&self, measure: impl Fn(&[Utterance]) -> T) -> Vec<T> {
        self.snapshot().iter().map(|t| measure(&t.utterances)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVE: &str = "\
@UTF8
@Begin
@Languages:\teng
@Participants:\tCHI Eve Target_Child , MOT Sue Mother
@ID:\teng|Brown|CHI|1;06.00|female|||Target_Child|||
@ID:\teng|Brown|MOT|||||Mother|||
*CHI:\tmore cookie .
%mor:\tqn|more n|cookie .
%gra:\t1|2|QUANT 2|0|INCROOT 3|2|PUNCT
*MOT:\tyou want more cookies ?
%mor:\tpro:per|you v|want qn|more n|cookie-PL ?
%gra:\t1|2|SUBJ 2|0|ROOT 3|4|QUANT 4|2|OBJ 5|2|PUNCT
@End
";

    const SAM: &str = "\
@UTF8
@Begin
@Languages:\teng , fra
@Participants:\tCHI Sam Target_Child
@ID:\teng|Lab|CHI|2;03.15|male|||Target_Child|||
*CHI:\tdoggie runs .
%mor:\tn|doggie v|run-3S .
%gra:\t1|2|SUBJ 2|0|ROOT 3|2|PUNCT
@End
";

    fn corpus() -> Corpus {
        Corpus::from_strs(
            vec![
                ("eve.cha".to_string(), EVE.to_string()),
                ("sam.cha".to_string(), SAM.to_string()),
            ],
            &ParseOptions::default(),
        )
    }

    #[test]
    fn from_strs_keeps_input_order() {
        let corpus = corpus();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.ids(), vec!["eve.cha", "sam.cha"]);
    }

    #[test]
    fn participants_and_languages_union() {
        let corpus = corpus();
        let participants: Vec<String> = corpus.participants().into_iter().collect();
        assert_eq!(participants, vec!["CHI", "MOT"]);
        let languages: Vec<String> = corpus.languages().into_iter().collect();
        assert_eq!(languages, vec!["eng", "fra"]);
    }

    #[test]
    fn ages_follow_file_order() {
        let corpus = corpus();
        let ages = corpus.ages("CHI");
        assert_eq!(ages[0].map(|a| a.to_months()), Some(18.0));
        assert_eq!(
            ages[1].map(|a| (a.years, a.months)),
            Some((Some(2), Some(3)))
        );
        assert_eq!(corpus.ages("MOT"), vec![None, None]);
    }

    #[test]
    fn sort_by_age_unknowns_last() {
        let corpus = corpus();
        // Eve (18 months) is younger than Sam (27), so ascending age keeps eve.cha first
        corpus.sort_by_age("CHI");
        assert_eq!(corpus.ids(), vec!["eve.cha", "sam.cha"]);
        corpus.sort_by_age("MOT");
        // neither file records a MOT age, order is unchanged
        assert_eq!(corpus.ids(), vec!["eve.cha", "sam.cha"]);
    }

    #[test]
    fn speaker_scope_restricts_utterances() {
        let corpus = corpus();
        let all = MeasureOptions::default();
        let chi = MeasureOptions::for_speaker("CHI");
        assert_eq!(corpus.utterances(&all).len(), 3);
        assert_eq!(corpus.utterances(&chi).len(), 2);
        let by_file = corpus.utterances_by_file(&chi);
        assert_eq!(by_file[0].len(), 1);
        assert_eq!(by_file[1].len(), 1);
    }

    #[test]
    fn words_skip_punctuation_by_default() {
        let corpus = corpus();
        let words = corpus.words(&MeasureOptions::for_speaker("CHI"));
        assert_eq!(words, vec!["more", "cookie", "doggie", "runs"]);
    }

    #[test]
    fn combined_mlu_spans_files() {
        let corpus = corpus();
        let chi = MeasureOptions::for_speaker("CHI");
        let per_file = corpus.mlu_words(&chi);
        assert_eq!(per_file, vec![Some(2.0), Some(2.0)]);
        assert_eq!(corpus.mlu_words_combined(&chi), Some(2.0));
        // run-3S counts two morphemes
        assert_eq!(corpus.mlu_morphemes_combined(&chi), Some(2.5));
    }

    #[test]
    fn frequencies_combine_across_files() {
        let corpus = corpus();
        let counts = corpus.word_frequencies(&MeasureOptions::default());
        assert_eq!(counts.get("more"), Some(&2));
        assert_eq!(counts.get("doggie"), Some(&1));
        let by_file = corpus.word_frequencies_by_file(&MeasureOptions::default());
        assert_eq!(by_file[0].get("more"), Some(&2));
        assert_eq!(by_file[1].get("more"), None);
    }

    #[test]
    fn ngrams_reject_zero() {
        let corpus = corpus();
        assert!(corpus.word_ngrams(0, &MeasureOptions::default()).is_err());
        let bigrams = corpus.word_ngrams(2, &MeasureOptions::default()).unwrap();
        let key = vec!["more".to_string(), "cookie".to_string()]; // CHI's utterance
        assert_eq!(bigrams.get(&key), Some(&1));
    }

    #[test]
    fn mutations_preserve_order() {
        let corpus = corpus();
        let sam = corpus.remove(1).unwrap();
        assert_eq!(corpus.ids(), vec!["eve.cha"]);
        corpus.append((*sam).clone());
        assert_eq!(corpus.ids(), vec!["eve.cha", "sam.cha"]);
        assert!(corpus.remove(5).is_none());
        corpus.clear();
        assert!(corpus.is_empty());
    }

    #[test]
    fn filter_builds_a_new_corpus() {
        let corpus = corpus();
        let only_eve = corpus.filter(|id| id.starts_with("eve"));
        assert_eq!(only_eve.ids(), vec!["eve.cha"]);
        // the source corpus is untouched
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn ipsyn_runs_per_file_and_combined() {
        let corpus = corpus();
        let chi = MeasureOptions::for_speaker("CHI");
        let per_file = corpus.ipsyn(&chi, &IpsynOptions::default()).unwrap();
        assert_eq!(per_file.len(), 2);
        // sam.cha: doggie runs -> N1, V1, V10, S1, S2 at least
        assert!(per_file[1].total >= 5);
        let combined = corpus.ipsyn_combined(&chi, &IpsynOptions::default()).unwrap();
        assert!(combined.total >= per_file[1].total);
    }
}
