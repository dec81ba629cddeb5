use std::collections::BTreeMap;

use super::reintegration::clamp_display;
use super::{chunk_unit, min_display_duration, normalize_timings, reintegrate_cues};
use crate::config::{ChunkerConfig, CueConfig, NormalizerConfig};
use crate::error::PipelineError;
use crate::types::{Cue, SubtitleChunk, TimedWord, UnitKind, UnitToken, UtteranceUnit};

fn make_word(utterance_id: u32, speaker_id: u32, pos: usize, text: &str, start: f64, end: f64) -> TimedWord {
    TimedWord {
        text: text.to_string(),
        normalized_text: text.to_lowercase(),
        speaker_id,
        utterance_id,
        position_in_utterance: pos,
        start_time: start,
        end_time: end,
        aligned: true,
        confidence: Some(100.0),
    }
}

fn standalone(text: &str) -> Cue {
    Cue {
        utterance_id: None,
        word_offset: None,
        text: text.to_string(),
        start_time: None,
        end_time: None,
        is_inline: false,
        follows_utterance: None,
    }
}

fn inline(utterance_id: u32, offset: usize, text: &str) -> Cue {
    Cue {
        utterance_id: Some(utterance_id),
        word_offset: Some(offset),
        text: text.to_string(),
        start_time: None,
        end_time: None,
        is_inline: true,
        follows_utterance: None,
    }
}

fn two_utterances() -> Vec<TimedWord> {
    vec![
        make_word(0, 1, 0, "Where", 1.0, 1.3),
        make_word(0, 1, 1, "were", 1.3, 1.5),
        make_word(0, 1, 2, "you?", 1.5, 1.9),
        make_word(1, 2, 0, "Out.", 4.0, 4.4),
        make_word(1, 2, 1, "Fishing.", 7.4, 8.0),
    ]
}

fn speech_unit(speaker_id: u32, tokens: Vec<UnitToken>) -> UtteranceUnit {
    let start_time = tokens.first().map_or(0.0, |t| t.start_time);
    let end_time = tokens.last().map_or(0.0, |t| t.end_time);
    UtteranceUnit {
        text: tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        start_time,
        end_time,
        kind: UnitKind::Speech,
        tokens,
        speaker_id: Some(speaker_id),
        speaker_name: None,
    }
}

fn evenly_spaced_tokens(count: usize, step: f64) -> Vec<UnitToken> {
    (0..count)
        .map(|i| UnitToken {
            text: format!("w{i}"),
            start_time: i as f64 * step,
            end_time: (i + 1) as f64 * step,
        })
        .collect()
}

fn chunk(text: &str, start: f64, end: f64, speaker_id: Option<u32>, kind: UnitKind) -> SubtitleChunk {
    SubtitleChunk {
        text: text.to_string(),
        start_time: start,
        end_time: end,
        speaker_id,
        speaker_name: None,
        kind,
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn reintegrate_groups_words_by_utterance() {
    let mut names = BTreeMap::new();
    names.insert(1, "Mara".to_string());
    let units = reintegrate_cues(&two_utterances(), &[], &names, &CueConfig::default())
        .expect("reintegration succeeds");

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].text, "Where were you?");
    assert_eq!(units[0].kind, UnitKind::Speech);
    assert_eq!(units[0].speaker_id, Some(1));
    assert_eq!(units[0].speaker_name.as_deref(), Some("Mara"));
    assert_close(units[0].start_time, 1.0);
    assert_close(units[0].end_time, 1.9);
    assert_eq!(units[1].speaker_name, None);
    assert_close(units[1].end_time, 8.0);
}

#[test]
fn standalone_cue_without_times_starts_at_zero() {
    let units = reintegrate_cues(&[], &[standalone("door slams")], &BTreeMap::new(), &CueConfig::default())
        .expect("reintegration succeeds");

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].kind, UnitKind::Cue);
    assert_eq!(units[0].speaker_id, None);
    assert!(units[0].tokens.is_empty());
    assert_close(units[0].start_time, 0.0);
    assert_close(units[0].end_time, 2.0);
}

#[test]
fn standalone_cue_duration_is_clamped() {
    let mut long = standalone("thunder");
    long.start_time = Some(10.0);
    long.end_time = Some(30.0);
    let mut short = standalone("click");
    short.start_time = Some(40.0);
    short.end_time = Some(40.5);

    let units = reintegrate_cues(&[], &[long, short], &BTreeMap::new(), &CueConfig::default())
        .expect("reintegration succeeds");
    assert_close(units[0].end_time, 16.0);
    assert_close(units[1].end_time, 42.0);
}

#[test]
fn standalone_cue_follows_its_utterance() {
    let mut cue = standalone("footsteps");
    cue.follows_utterance = Some(0);
    let units = reintegrate_cues(&two_utterances(), &[cue], &BTreeMap::new(), &CueConfig::default())
        .expect("reintegration succeeds");

    let cue_unit = units
        .iter()
        .find(|u| u.kind == UnitKind::Cue)
        .expect("cue unit present");
    assert_close(cue_unit.start_time, 1.9);
    assert_close(cue_unit.end_time, 3.9);
    assert_eq!(units[1].kind, UnitKind::Cue);
}

#[test]
fn inline_cue_at_start_uses_following_word() {
    let units = reintegrate_cues(&two_utterances(), &[inline(0, 0, "[sighs]")], &BTreeMap::new(), &CueConfig::default())
        .expect("reintegration succeeds");

    let tokens = &units[0].tokens;
    assert_eq!(tokens[0].text, "[sighs]");
    assert_close(tokens[0].start_time, 1.0);
    assert_close(tokens[0].end_time, 3.0);
    assert_eq!(units[0].text, "[sighs] Where were you?");
    assert_close(units[0].end_time, 3.0);
}

#[test]
fn inline_cue_past_end_uses_preceding_word() {
    let units = reintegrate_cues(&two_utterances(), &[inline(0, 9, "[laughs]")], &BTreeMap::new(), &CueConfig::default())
        .expect("reintegration succeeds");

    let last = units[0].tokens.last().expect("tokens present");
    assert_eq!(last.text, "[laughs]");
    assert_close(last.start_time, 1.9);
    assert_close(last.end_time, 3.9);
}

#[test]
fn inline_cue_between_words_spans_the_gap() {
    let units = reintegrate_cues(&two_utterances(), &[inline(1, 1, "[pause]")], &BTreeMap::new(), &CueConfig::default())
        .expect("reintegration succeeds");

    let unit = units
        .iter()
        .find(|u| u.speaker_id == Some(2))
        .expect("second utterance");
    assert_eq!(unit.text, "Out. [pause] Fishing.");
    // gap 4.4..7.4 is within [2, 6]
    assert_close(unit.tokens[1].start_time, 4.4);
    assert_close(unit.tokens[1].end_time, 7.4);
}

#[test]
fn inline_cue_in_tight_gap_gets_minimum_display_time() {
    let units = reintegrate_cues(&two_utterances(), &[inline(0, 1, "[cough]")], &BTreeMap::new(), &CueConfig::default())
        .expect("reintegration succeeds");

    let cue = &units[0].tokens[1];
    assert_eq!(cue.text, "[cough]");
    assert_close(cue.start_time, 1.3);
    assert_close(cue.end_time, 3.3);
}

#[test]
fn inline_cues_at_same_offset_keep_source_order() {
    let cues = vec![inline(0, 1, "[a]"), inline(0, 1, "[b]"), inline(0, 2, "[c]")];
    let units = reintegrate_cues(&two_utterances(), &cues, &BTreeMap::new(), &CueConfig::default())
        .expect("reintegration succeeds");

    assert_eq!(units[0].text, "Where [a] [b] were [c] you?");
}

#[test]
fn inline_cue_for_unknown_utterance_is_rejected() {
    let result = reintegrate_cues(&two_utterances(), &[inline(42, 0, "[noise]")], &BTreeMap::new(), &CueConfig::default());
    assert!(matches!(result, Err(PipelineError::InvalidInput { .. })));
}

#[test]
fn inline_cue_without_offset_is_rejected() {
    let mut cue = inline(0, 0, "[noise]");
    cue.word_offset = None;
    let result = reintegrate_cues(&two_utterances(), &[cue], &BTreeMap::new(), &CueConfig::default());
    assert!(result.is_err());
}

#[test]
fn cue_not_marked_inline_stays_standalone() {
    let cue = Cue {
        is_inline: false,
        ..inline(1, 1, "[music]")
    };
    let units = reintegrate_cues(&two_utterances(), &[cue], &BTreeMap::new(), &CueConfig::default())
        .expect("reintegration succeeds");

    assert_eq!(units.len(), 3);
    assert_eq!(units[0].kind, UnitKind::Cue);
    assert_eq!(units[0].text, "[music]");
    assert_eq!(units[2].text, "Out. Fishing.");
    assert_eq!(units[2].tokens.len(), 2);
}

#[test]
fn units_are_sorted_by_start_time() {
    let mut late = standalone("applause");
    late.start_time = Some(3.0);
    let early = standalone("music");
    let units = reintegrate_cues(&two_utterances(), &[late, early], &BTreeMap::new(), &CueConfig::default())
        .expect("reintegration succeeds");

    let starts: Vec<f64> = units.iter().map(|u| u.start_time).collect();
    assert_eq!(starts, vec![0.0, 1.0, 3.0, 4.0]);
}

#[test]
fn clamp_display_handles_inverted_window() {
    let config = CueConfig::default();
    assert_close(clamp_display(5.0, 4.0, &config), 7.0);
    assert_close(clamp_display(5.0, 8.0, &config), 8.0);
    assert_close(clamp_display(5.0, 20.0, &config), 11.0);
}

#[test]
fn chunker_splits_twenty_words_at_max_words() {
    let unit = speech_unit(1, evenly_spaced_tokens(20, 0.5));
    let chunks = chunk_unit(&unit, &ChunkerConfig::default());

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].word_count(), 15);
    assert_eq!(chunks[1].word_count(), 5);
    // 15 words span 7.5s, clipped to max_duration
    assert_close(chunks[0].start_time, 0.0);
    assert_close(chunks[0].end_time, 6.0);
    assert_close(chunks[1].start_time, 7.5);
    assert_close(chunks[1].end_time, 10.0);
    assert_eq!(chunks[1].speaker_id, Some(1));
}

#[test]
fn chunker_extends_short_chunk_to_min_duration() {
    let unit = speech_unit(1, evenly_spaced_tokens(20, 0.1));
    let chunks = chunk_unit(&unit, &ChunkerConfig::default());

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].word_count(), 20);
    assert_close(chunks[0].end_time, 2.0);
}

#[test]
fn chunker_stops_extending_once_max_duration_reached() {
    let mut tokens = evenly_spaced_tokens(16, 0.1);
    tokens.push(UnitToken {
        text: "late".to_string(),
        start_time: 8.5,
        end_time: 9.0,
    });
    tokens.push(UnitToken {
        text: "later".to_string(),
        start_time: 9.0,
        end_time: 9.5,
    });
    let unit = speech_unit(1, tokens);
    let chunks = chunk_unit(&unit, &ChunkerConfig::default());

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].word_count(), 17);
    assert!(chunks[0].text.ends_with("late"));
    assert_close(chunks[0].end_time, 6.0);
    assert_eq!(chunks[1].text, "later");
}

#[test]
fn chunker_keeps_short_utterance_whole() {
    let unit = speech_unit(3, evenly_spaced_tokens(2, 0.3));
    let chunks = chunk_unit(&unit, &ChunkerConfig::default());

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "w0 w1");
    assert_close(chunks[0].end_time, 0.6);
}

#[test]
fn chunker_passes_standalone_cue_through() {
    let unit = UtteranceUnit {
        text: "door slams".to_string(),
        start_time: 0.0,
        end_time: 2.0,
        kind: UnitKind::Cue,
        tokens: Vec::new(),
        speaker_id: None,
        speaker_name: None,
    };
    let chunks = chunk_unit(&unit, &ChunkerConfig::default());

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].kind, UnitKind::Cue);
    assert_eq!(chunks[0].text, "door slams");
    assert_close(chunks[0].end_time, 2.0);
}

#[test]
fn min_display_duration_floors() {
    let config = NormalizerConfig::default();
    assert_close(min_display_duration(0, &config), 1.0);
    assert_close(min_display_duration(1, &config), 1.0);
    assert_close(min_display_duration(2, &config), 1.5);
    assert_close(min_display_duration(10, &config), 3.3);
}

#[test]
fn normalizer_extends_short_chunk_and_pads() {
    let chunks = vec![chunk("Yes.", 5.0, 5.2, Some(1), UnitKind::Speech)];
    let normalized = normalize_timings(chunks, &NormalizerConfig::default());

    assert_close(normalized[0].start_time, 5.0);
    assert_close(normalized[0].end_time, 6.25);
}

#[test]
fn normalizer_clamps_padding_against_same_speaker() {
    let chunks = vec![
        chunk("one two", 0.0, 2.0, Some(1), UnitKind::Speech),
        chunk("three four", 2.1, 4.0, Some(1), UnitKind::Speech),
    ];
    let normalized = normalize_timings(chunks, &NormalizerConfig::default());

    assert_close(normalized[0].end_time, 2.1);
    assert_close(normalized[1].end_time, 4.25);
    assert!(normalized[0].end_time <= normalized[1].start_time);
}

#[test]
fn normalizer_keeps_padding_across_speakers() {
    let chunks = vec![
        chunk("one two", 0.0, 2.0, Some(1), UnitKind::Speech),
        chunk("three four", 2.1, 4.0, Some(2), UnitKind::Speech),
    ];
    let normalized = normalize_timings(chunks, &NormalizerConfig::default());

    assert_close(normalized[0].end_time, 2.25);
}

#[test]
fn normalizer_ignores_cues_for_overlap() {
    let chunks = vec![
        chunk("one two", 0.0, 2.0, Some(1), UnitKind::Speech),
        chunk("door slams", 2.05, 4.05, None, UnitKind::Cue),
        chunk("three four", 2.1, 4.0, Some(1), UnitKind::Speech),
    ];
    let normalized = normalize_timings(chunks, &NormalizerConfig::default());

    // Only the immediately preceding chunk is compared; the cue sits in between.
    assert_close(normalized[0].end_time, 2.25);
    assert_close(normalized[1].end_time, 4.3);
}

#[test]
fn normalizer_never_clamps_duration_floor() {
    let chunks = vec![
        chunk("Hm.", 0.0, 0.5, Some(1), UnitKind::Speech),
        chunk("Right.", 0.6, 1.8, Some(1), UnitKind::Speech),
    ];
    let normalized = normalize_timings(chunks, &NormalizerConfig::default());

    assert_close(normalized[0].end_time, 1.0);
    assert!(normalized[0].end_time - normalized[0].start_time >= 1.0);
}

#[test]
fn normalizer_preserves_order_and_count() {
    let chunks = vec![
        chunk("a", 0.0, 1.0, Some(1), UnitKind::Speech),
        chunk("b", 0.5, 1.0, Some(2), UnitKind::Speech),
        chunk("c", 3.0, 5.0, None, UnitKind::Cue),
    ];
    let normalized = normalize_timings(chunks, &NormalizerConfig::default());

    let texts: Vec<&str> = normalized.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}
