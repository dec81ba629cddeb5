use std::collections::{BTreeMap, HashMap};

use crate::config::CueConfig;
use crate::error::PipelineError;
use crate::types::{Cue, SpeakerId, TimedWord, UnitKind, UnitToken, UtteranceId, UtteranceUnit};

struct UtteranceGroup {
    speaker_id: SpeakerId,
    /// Spoken words only, in utterance order. Cue offsets index into this.
    speech: Vec<UnitToken>,
    /// Spoken words with inline cues spliced in.
    tokens: Vec<UnitToken>,
    spliced_offsets: Vec<usize>,
}

/// Merge timed words and cues into utterance-level units sorted by start time.
///
/// Standalone cues become `cue` units without a speaker; inline cues are
/// spliced into their utterance as timed pseudo-words. Fails on cues that
/// point at utterances absent from the word table.
pub fn reintegrate_cues(
    words: &[TimedWord],
    cues: &[Cue],
    speaker_names: &BTreeMap<SpeakerId, String>,
    config: &CueConfig,
) -> Result<Vec<UtteranceUnit>, PipelineError> {
    let mut order: Vec<UtteranceId> = Vec::new();
    let mut groups: HashMap<UtteranceId, UtteranceGroup> = HashMap::new();
    for word in words {
        let group = groups.entry(word.utterance_id).or_insert_with(|| {
            order.push(word.utterance_id);
            UtteranceGroup {
                speaker_id: word.speaker_id,
                speech: Vec::new(),
                tokens: Vec::new(),
                spliced_offsets: Vec::new(),
            }
        });
        let token = UnitToken {
            text: word.text.clone(),
            start_time: word.start_time,
            end_time: word.end_time,
        };
        group.speech.push(token.clone());
        group.tokens.push(token);
    }

    let mut units = Vec::with_capacity(order.len() + cues.len());

    for cue in cues {
        let utterance_id = match cue.utterance_id {
            Some(utterance_id) if !cue.is_standalone() => utterance_id,
            _ => {
                units.push(standalone_unit(cue, &groups, config)?);
                continue;
            }
        };
        let group = groups.get_mut(&utterance_id).ok_or_else(|| {
            PipelineError::invalid_input(format!(
                "inline cue {:?} references unknown utterance {utterance_id}",
                cue.text
            ))
        })?;
        let offset = cue.word_offset.ok_or_else(|| {
            PipelineError::invalid_input(format!(
                "inline cue {:?} in utterance {utterance_id} has no word offset",
                cue.text
            ))
        })?;
        splice_inline_cue(group, cue, offset, config);
    }

    for utterance_id in order {
        let Some(group) = groups.remove(&utterance_id) else {
            continue;
        };
        let start_time = group
            .tokens
            .iter()
            .map(|t| t.start_time)
            .fold(f64::INFINITY, f64::min);
        let end_time = group
            .tokens
            .iter()
            .map(|t| t.end_time)
            .fold(f64::NEG_INFINITY, f64::max);
        let text = group
            .tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        units.push(UtteranceUnit {
            text,
            start_time,
            end_time,
            kind: UnitKind::Speech,
            tokens: group.tokens,
            speaker_id: Some(group.speaker_id),
            speaker_name: speaker_names.get(&group.speaker_id).cloned(),
        });
    }

    // NaN starts sort after every real time.
    units.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    Ok(units)
}

fn standalone_unit(
    cue: &Cue,
    groups: &HashMap<UtteranceId, UtteranceGroup>,
    config: &CueConfig,
) -> Result<UtteranceUnit, PipelineError> {
    let anchor_end = match cue.follows_utterance {
        Some(utterance_id) => {
            let group = groups.get(&utterance_id).ok_or_else(|| {
                PipelineError::invalid_input(format!(
                    "standalone cue {:?} follows unknown utterance {utterance_id}",
                    cue.text
                ))
            })?;
            group.speech.iter().map(|t| t.end_time).reduce(f64::max)
        }
        None => None,
    };

    let start_time = cue.start_time.or(anchor_end).unwrap_or(0.0);
    let end_time = cue
        .end_time
        .unwrap_or(start_time + config.min_display_time);
    let end_time = clamp_display(start_time, end_time, config);
    tracing::debug!(
        text = cue.text.as_str(),
        start_time,
        end_time,
        "reintegrator: placed standalone cue"
    );

    Ok(UtteranceUnit {
        text: cue.text.clone(),
        start_time,
        end_time,
        kind: UnitKind::Cue,
        tokens: Vec::new(),
        speaker_id: None,
        speaker_name: None,
    })
}

fn splice_inline_cue(group: &mut UtteranceGroup, cue: &Cue, offset: usize, config: &CueConfig) {
    let word_count = group.speech.len();
    let (start_time, end_time) = if offset == 0 {
        let start = group.speech.first().map_or(0.0, |w| w.start_time);
        (start, start + config.min_display_time)
    } else if offset >= word_count {
        let start = group.speech.last().map_or(0.0, |w| w.end_time);
        (start, start + config.min_display_time)
    } else {
        let start = group.speech[offset - 1].end_time;
        let end = group.speech[offset].start_time;
        if end < start {
            tracing::warn!(
                text = cue.text.as_str(),
                start,
                end,
                "reintegrator: inverted inline cue window, clamping to minimum display time"
            );
        }
        (start, end)
    };
    let end_time = clamp_display(start_time, end_time, config);

    // Offsets refer to spoken-word positions; earlier cues at or before this
    // offset shift the insertion point right.
    let anchor = offset.min(word_count);
    let shift = group
        .spliced_offsets
        .iter()
        .filter(|&&o| o <= anchor)
        .count();
    let position = (anchor + shift).min(group.tokens.len());
    group.tokens.insert(
        position,
        UnitToken {
            text: cue.text.clone(),
            start_time,
            end_time,
        },
    );
    group.spliced_offsets.push(anchor);
    tracing::debug!(
        text = cue.text.as_str(),
        offset,
        position,
        start_time,
        end_time,
        "reintegrator: spliced inline cue"
    );
}

/// Clamp `end` so that `end - start` lies within the configured display bounds.
pub(crate) fn clamp_display(start: f64, end: f64, config: &CueConfig) -> f64 {
    let duration = end - start;
    if duration.is_nan() || duration < config.min_display_time {
        start + config.min_display_time
    } else if duration > config.max_display_time {
        start + config.max_display_time
    } else {
        end
    }
}
