use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use caption_sync::SubtitleChunk;
use serde::Serialize;

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let mut writer = create_writer(path)?;
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|err| format!("Failed to serialize JSON '{}': {err}", path.display()))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|err| format!("Failed to finalize output file '{}': {err}", path.display()))
}

pub fn write_jsonl(path: &Path, chunks: &[SubtitleChunk]) -> Result<(), String> {
    let mut writer = create_writer(path)?;
    for chunk in chunks {
        serde_json::to_writer(&mut writer, chunk)
            .map_err(|err| format!("Failed to serialize chunk '{}': {err}", path.display()))?;
        writer
            .write_all(b"\n")
            .map_err(|err| format!("Failed to write output file '{}': {err}", path.display()))?;
    }
    writer
        .flush()
        .map_err(|err| format!("Failed to finalize output file '{}': {err}", path.display()))
}

fn create_writer(path: &Path) -> Result<BufWriter<File>, String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    let file = File::create(path)
        .map_err(|err| format!("Failed to create output file '{}': {err}", path.display()))?;
    Ok(BufWriter::new(file))
}
