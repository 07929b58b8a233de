//! Layout command — place the selected words on a canvas.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use wordcloud_core::{
    CloudLayout, Config, FixedAdvanceMetrics, LayoutConfig, Mask, PlacementOutcome,
    RotationPolicy, WordCloud,
};

use super::{read_input_file, stop_words};
use crate::{mask, svg};

/// Arguments for the `layout` subcommand.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// File to lay out.
    pub file: Utf8PathBuf,

    /// Canvas width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Maximum number of candidate words.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Number of most frequent candidates to discard.
    #[arg(long)]
    pub discard: Option<usize>,

    /// Random seed, for reproducible layouts.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Word rotation policy.
    #[arg(long, value_enum)]
    pub rotate: Option<RotationPolicy>,

    /// Write an SVG rendering to this path.
    #[arg(long, value_name = "OUT")]
    pub svg: Option<Utf8PathBuf>,

    /// Pre-occupied canvas areas: a PGM image (black is free) or a text
    /// grid (`.` is free). Sets the canvas size unless --width/--height
    /// are given.
    #[arg(long, value_name = "FILE")]
    pub mask: Option<Utf8PathBuf>,
}

impl LayoutArgs {
    fn apply(&self, base: &LayoutConfig, mask: Option<&Mask>) -> LayoutConfig {
        LayoutConfig {
            canvas_width: self
                .width
                .or(mask.map(Mask::width))
                .unwrap_or(base.canvas_width),
            canvas_height: self
                .height
                .or(mask.map(Mask::height))
                .unwrap_or(base.canvas_height),
            max_words: self.limit.unwrap_or(base.max_words),
            discard_top: self.discard.unwrap_or(base.discard_top),
            seed: self.seed.or(base.seed),
            rotation: self.rotate.unwrap_or(base.rotation),
            ..base.clone()
        }
    }
}

/// Run the full pipeline on a file and report where each word landed.
#[instrument(name = "cmd_layout", skip_all, fields(file = %args.file))]
pub fn cmd_layout(
    args: LayoutArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let mask = args.mask.as_deref().map(mask::read).transpose()?;
    let layout_config = args.apply(&config.layout, mask.as_ref());
    debug!(?layout_config, masked = mask.is_some(), "executing layout command");

    let content = read_input_file(&args.file, max_input_bytes)?;

    let cloud = WordCloud::new(layout_config).with_stop_words(stop_words(config));
    let table = cloud.analyze(&content);
    let selection = cloud.select(&table);
    let mut engine = cloud
        .session(FixedAdvanceMetrics::default())
        .context("invalid layout configuration")?;
    if let Some(ref mask) = mask {
        engine = engine
            .with_mask(mask)
            .context("mask does not match the canvas")?;
    }

    let progress = if global_json || quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(selection.words.len() as u64)
    };
    progress.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )?);

    let mut outcomes = Vec::with_capacity(selection.words.len());
    for outcome in engine.layout(&selection.words) {
        let outcome = outcome.context("layout aborted")?;
        progress.set_message(outcome.word().to_string());
        progress.inc(1);
        outcomes.push(outcome);
    }
    progress.finish_and_clear();

    let result = CloudLayout::new(cloud.layout(), engine.seed(), selection, outcomes);

    if let Some(ref path) = args.svg {
        svg::write(&result, path)?;
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for outcome in &result.outcomes {
        match outcome {
            PlacementOutcome::Placed(p) => println!(
                "{} {} {}x{} at ({}, {}) size {:.1}",
                "placed".green(),
                p.word.bold(),
                p.width,
                p.height,
                p.x,
                p.y,
                p.font_size,
            ),
            PlacementOutcome::Abandoned { word, reason } => println!(
                "{} {} ({})",
                "abandoned".yellow(),
                word.bold(),
                reason.as_str()
            ),
        }
    }
    println!();
    println!(
        "{}: {} placed, {} abandoned on {}x{}",
        "Layout".dimmed(),
        result.placed_count(),
        result.abandoned_count(),
        result.width,
        result.height,
    );
    if let Some(seed) = result.seed {
        println!("{}: {}", "Seed".dimmed(), seed);
    }
    if let Some(ref path) = args.svg {
        println!("{}: {}", "SVG".dimmed(), path.cyan());
    }

    Ok(())
}
