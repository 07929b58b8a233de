//! Words command — frequency ranking and normalization.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use wordcloud_core::{Config, LayoutConfig, RankedWord, WordCloud, WordCount};

use super::{read_input_file, stop_words};

/// Arguments for the `words` subcommand.
#[derive(Args, Debug)]
pub struct WordsArgs {
    /// File to analyze.
    pub file: Utf8PathBuf,

    /// Maximum number of candidate words.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Number of most frequent candidates to discard.
    #[arg(long)]
    pub discard: Option<usize>,
}

#[derive(Serialize)]
struct WordsReport {
    total_words: usize,
    unique_words: usize,
    adjusted_total: usize,
    words: Vec<RankedWord>,
    discarded: Vec<WordCount>,
}

/// Rank the words of a file and print the normalized selection.
#[instrument(name = "cmd_words", skip_all, fields(file = %args.file))]
pub fn cmd_words(
    args: WordsArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(limit = ?args.limit, discard = ?args.discard, "executing words command");

    let content = read_input_file(&args.file, max_input_bytes)?;

    let layout = LayoutConfig {
        max_words: args.limit.unwrap_or(config.layout.max_words),
        discard_top: args.discard.unwrap_or(config.layout.discard_top),
        ..config.layout.clone()
    };
    let cloud = WordCloud::new(layout).with_stop_words(stop_words(config));
    let table = cloud.analyze(&content);
    let selection = cloud.select(&table);

    let report = WordsReport {
        total_words: table.total_word_count(),
        unique_words: table.unique_words(),
        adjusted_total: selection.adjusted_total,
        words: selection.words,
        discarded: selection.discarded,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.words.is_empty() {
        println!("{}", "No words to rank.".yellow());
        return Ok(());
    }

    let width = report
        .words
        .iter()
        .map(|w| w.word.chars().count())
        .max()
        .unwrap_or(0);
    for (rank, w) in report.words.iter().enumerate() {
        let rank = format!("{:>4}", rank + 1);
        let word = format!("{:<width$}", w.word);
        println!(
            "{}  {}  {:>6}  {:.3}",
            rank.dimmed(),
            word.bold(),
            w.count,
            w.percentage
        );
    }

    println!();
    println!(
        "{}: {} ({} unique, {} after discard)",
        "Words".dimmed(),
        report.total_words,
        report.unique_words,
        report.adjusted_total,
    );
    if !report.discarded.is_empty() {
        let dropped: Vec<String> = report
            .discarded
            .iter()
            .map(|w| format!("{} ({})", w.word, w.count))
            .collect();
        println!("{}: {}", "Discarded".dimmed(), dropped.join(", "));
    }

    Ok(())
}
