use std::fs;
use std::path::{Path, PathBuf};

use caption_sync::{
    summarize, AlignmentSummary, CaptionPipelineBuilder, PipelineConfig, PipelineInput,
};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[path = "caption_sync/json_output_formatter.rs"]
mod json_output_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON array of chunks.
    Json,
    /// One chunk per line.
    #[value(name = "jsonl")]
    JsonLines,
}

#[derive(Debug, Parser)]
#[command(name = "caption_sync")]
#[command(about = "Align a dialogue transcript against ASR words and emit timed caption chunks")]
struct Args {
    /// Pipeline input JSON: reference words, hypothesis words, cues and speaker names.
    #[arg(long, env = "CAPTION_SYNC_INPUT")]
    input: PathBuf,
    /// Optional pipeline config JSON; missing keys use defaults.
    #[arg(long, env = "CAPTION_SYNC_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "CAPTION_SYNC_OUT", default_value = "captions.json")]
    out: PathBuf,
    #[arg(long, env = "CAPTION_SYNC_SUMMARY_OUT")]
    summary_out: Option<PathBuf>,
    #[arg(
        long,
        env = "CAPTION_SYNC_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct SummaryReport {
    generated_at: String,
    input: String,
    chunk_count: usize,
    cue_count: usize,
    alignment: AlignmentSummary,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let config = match args.config.as_ref() {
        Some(path) => PipelineConfig::load(path).map_err(|err| err.to_string())?,
        None => PipelineConfig::default(),
    };
    let input = load_input(&args.input)?;
    if input.reference_words.is_empty() {
        return Err(format!(
            "Input '{}' contains no reference words.",
            args.input.display()
        ));
    }

    let pipeline = CaptionPipelineBuilder::new(config)
        .build()
        .map_err(|err| err.to_string())?;
    let output = pipeline.run(&input).map_err(|err| err.to_string())?;

    match args.format {
        OutputFormat::Json => json_output_formatter::write_json(&args.out, &output.chunks)?,
        OutputFormat::JsonLines => json_output_formatter::write_jsonl(&args.out, &output.chunks)?,
    }

    let alignment = summarize(&output.records);
    if let Some(summary_out) = args.summary_out.as_ref() {
        let report = SummaryReport {
            generated_at: Utc::now().to_rfc3339(),
            input: args.input.display().to_string(),
            chunk_count: output.chunks.len(),
            cue_count: input.cues.len(),
            alignment: alignment.clone(),
        };
        json_output_formatter::write_json(summary_out, &report)?;
    }

    tracing::info!(
        out = %args.out.display(),
        chunks = output.chunks.len(),
        matched = alignment.matched_word_count,
        reference_words = alignment.reference_word_count,
        "caption_sync: wrote captions"
    );
    Ok(())
}

fn load_input(path: &Path) -> Result<PipelineInput, String> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read input '{}': {err}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|err| format!("Failed to parse input '{}': {err}", path.display()))
}
