use clap::{Parser, ValueEnum};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

use lalia_corpus::Corpus;
use lalia_measures::{IpsynOptions, MeasureOptions};
use lalia_parser::ParseOptions;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reads CHAT transcripts and prints measures, word frequencies, or dependency rows"
)]
struct Cli {
    /// CHAT transcript files
    #[arg(required = true, value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Restrict to one speaker code, e.g. CHI
    #[arg(short, long, value_name = "CODE")]
    speaker: Option<String>,

    /// How many utterances the IPSyn sample takes
    #[arg(long, default_value_t = 100, value_name = "N")]
    sample: usize,

    /// Lowercase words before counting
    #[arg(long)]
    fold_case: bool,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = Output::Measures)]
    output: Output,
}

#[derive(Copy, Clone, ValueEnum)]
enum Output {
    /// Per-file and combined MLU, TTR, and IPSyn, as JSON
    Measures,
    /// Dependency rows, one token per line
    Conll,
    /// Ranked word frequencies, as JSON
    Freq,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut inputs = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        let text = fs::read_to_string(path)?;
        inputs.push((path.display().to_string(), text));
    }
    let corpus = Corpus::from_strs(inputs, &ParseOptions::default());

    let mut options = match &cli.speaker {
        Some(code) => MeasureOptions::for_speaker(code),
        None => MeasureOptions::default(),
    };
    options.fold_case = cli.fold_case;

    match cli.output {
        Output::Measures => print_measures(&corpus, &options, cli.sample)?,
        Output::Conll => print_conll(&corpus, &options),
        Output::Freq => print_freq(&corpus, &options)?,
    }
    Ok(())
}

fn ipsyn_json(scores: &lalia_measures::IpsynScores) -> serde_json::Value {
    json!({
        "noun_phrase": scores.noun_phrase,
        "verb_phrase": scores.verb_phrase,
        "questions": scores.questions,
        "sentences": scores.sentences,
        "total": scores.total,
    })
}

fn print_measures(
    corpus: &Corpus,
    options: &MeasureOptions,
    sample: usize,
) -> anyhow::Result<()> {
    let ipsyn_options = IpsynOptions { sample };
    let mlu_words = corpus.mlu_words(options);
    let mlu_morphemes = corpus.mlu_morphemes(options);
    let ttr = corpus.ttr(options);
    let ipsyn = corpus.ipsyn(options, &ipsyn_options)?;

    let files: Vec<serde_json::Value> = corpus
        .ids()
        .iter()
        .enumerate()
        .map(|(i, id)| {
            json!({
                "file": id,
                "mlu_words": mlu_words[i],
                "mlu_morphemes": mlu_morphemes[i],
                "ttr": ttr[i],
                "ipsyn": ipsyn_json(&ipsyn[i]),
            })
        })
        .collect();

    let combined = json!({
        "mlu_words": corpus.mlu_words_combined(options),
        "mlu_morphemes": corpus.mlu_morphemes_combined(options),
        "ttr": corpus.ttr_combined(options),
        "ipsyn": ipsyn_json(&corpus.ipsyn_combined(options, &ipsyn_options)?),
    });

    let report = json!({ "files": files, "combined": combined });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_conll(corpus: &Corpus, options: &MeasureOptions) {
    for transcript in corpus.transcripts() {
        println!("# {}", transcript.id);
        for utterance in lalia_measures::scoped(&transcript.utterances, options) {
            let graph = match &utterance.graph {
                Some(graph) => graph,
                None => continue,
            };
            for row in graph.conll_rows(&utterance.tokens) {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    row.index, row.word, row.lemma, row.pos, row.head, row.relation
                );
            }
            println!();
        }
    }
}

fn print_freq(corpus: &Corpus, options: &MeasureOptions) -> anyhow::Result<()> {
    let counts = corpus.word_frequencies(options);
    let entries: Vec<serde_json::Value> = lalia_measures::ranked(&counts)
        .into_iter()
        .map(|(word, count)| json!([word, count]))
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
