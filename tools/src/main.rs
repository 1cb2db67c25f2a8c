use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use langscore_core::{score_as_language_custom, score_file, train_from_file, Config, LineScore};

const DEFAULT_WORDS: &str = "/usr/share/dict/words";

// Train a character bigram model on a word list, then score a target file
// line by line:
//
//   score_lines -w words.txt notes.txt
//   score_lines notes.txt            # trains on /usr/share/dict/words
//
// Text similar to the training corpus scores higher; scrambled or reversed
// text scores lower.

#[derive(Parser)]
#[command(about = "Score how language-like each line of a file is")]
struct Args {
    /// training file, one word per line
    #[arg(short = 'w', long = "words", default_value = DEFAULT_WORDS)]
    words: PathBuf,
    /// file to score line by line
    target: PathBuf,
    /// TOML config (alphabet width, weights, training options)
    #[arg(long)]
    config: Option<PathBuf>,
    /// override the configured alphabet width
    #[arg(long)]
    alphabet_width: Option<usize>,
    /// print per-line scores and the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonLine {
    text: String,
    #[serde(flatten)]
    score: LineScore,
}

#[derive(Serialize)]
struct JsonReport {
    training_file: PathBuf,
    target_file: PathBuf,
    lines: Vec<JsonLine>,
    num_lines: usize,
    mean_score: Option<f32>,
}

fn announce(kind: &str, path: &Path) {
    if path.exists() {
        println!("{} file: \"{}\"", kind, path.display());
    } else {
        println!("{} file ({}) does not exist", kind, path.display());
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(p) => Config::load_toml(p).with_context(|| format!("loading {}", p.display()))?,
        None => Config::default(),
    };
    if let Some(w) = args.alphabet_width {
        config.alphabet_width = w;
    }
    config.validate()?;
    tracing::debug!(?config, "configuration");

    if !args.json {
        announce("training", &args.words);
        announce("target", &args.target);
    }

    let model = train_from_file(&args.words, &config)
        .with_context(|| format!("training from {}", args.words.display()))?;
    let (scored, ctx) = score_file(&model, &args.target)
        .with_context(|| format!("scoring {}", args.target.display()))?;

    if args.json {
        let report = JsonReport {
            training_file: args.words.clone(),
            target_file: args.target.clone(),
            lines: scored
                .into_iter()
                .map(|(line, score)| JsonLine {
                    text: String::from_utf8_lossy(strip_newline(&line)).into_owned(),
                    score,
                })
                .collect(),
            num_lines: ctx.num_lines,
            mean_score: ctx.mean(),
        };
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    // simple usage
    let weights = config.weights();
    for s in ["hello world", "dlrow olleh"] {
        let score = score_as_language_custom(&model, s.as_bytes(), weights);
        println!("{}", demo_line(score, s));
    }

    for (line, score) in &scored {
        println!(
            "score(t: {:.2}, f: {:.2}): {:.2}: \"{}\"",
            score.transition,
            score.frequency,
            score.normalized,
            String::from_utf8_lossy(strip_newline(line))
        );
    }
    match ctx.mean() {
        Some(mean) => println!(
            "Cumulative score for {} [{} lines]: {:.2}",
            args.target.display(),
            ctx.num_lines,
            mean
        ),
        None => println!("Cumulative score for {} [0 lines]: n/a", args.target.display()),
    }
    Ok(())
}

// six decimals, like printf's %3f
fn demo_line(score: f32, text: &str) -> String {
    format!("{:3.6}: \"{}\"", score, text)
}

fn strip_newline(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n").unwrap_or(line)
}
