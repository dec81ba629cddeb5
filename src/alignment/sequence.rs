use crate::alignment::similarity::similarity_ratio;
use crate::config::AlignerConfig;
use crate::types::{AlignmentRecord, HypothesisWord, ReferenceWord};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    hyp_index: usize,
    score: f64,
    /// Hypothesis positions covered by the winning shingle, silence
    /// placeholders included.
    shingle_len: usize,
}

/// Monotonic windowed fuzzy alignment of reference words onto hypothesis words.
///
/// Always returns exactly one record per reference word, in reference order.
/// The hypothesis cursor only moves forward, so matched `hyp_index` values
/// never decrease.
pub fn align_sequences(
    reference: &[ReferenceWord],
    hypothesis: &[HypothesisWord],
    config: &AlignerConfig,
) -> Vec<AlignmentRecord> {
    let ref_words: Vec<&str> = reference
        .iter()
        .map(|w| w.normalized_text.as_str())
        .collect();
    let hyp_words: Vec<&str> = hypothesis
        .iter()
        .map(|w| w.normalized_text.as_str())
        .collect();

    let len_ref = ref_words.len();
    let len_hyp = hyp_words.len();
    let seq_len = config.seq_len.max(1);

    let mut records = Vec::with_capacity(len_ref);
    let mut ref_idx = 0usize;
    let mut hyp_idx = 0usize;
    let mut anchor_found = false;

    while ref_idx < len_ref {
        if !anchor_found && window_is_silent(hypothesis, hyp_idx, config.initial_window) {
            tracing::debug!(
                ref_index = ref_idx,
                hyp_index = hyp_idx,
                "aligner: no speech in window yet, skipping reference word"
            );
            records.push(AlignmentRecord::unmatched(ref_idx));
            ref_idx += 1;
            hyp_idx = (hyp_idx + 1).min(len_hyp);
            continue;
        }

        let ref_shingle = shingle(&ref_words, ref_idx, seq_len);
        match search_window(&ref_shingle, &hyp_words, hyp_idx, seq_len, config) {
            Some(candidate) => {
                anchor_found = true;
                tracing::debug!(
                    ref_index = ref_idx,
                    hyp_index = candidate.hyp_index,
                    score = format!("{:.1}", candidate.score),
                    "aligner: anchor found"
                );

                let covered = seq_len.min(len_ref - ref_idx);
                for offset in 0..covered {
                    let h = candidate.hyp_index + offset;
                    let record = match hypothesis.get(h) {
                        Some(word) => AlignmentRecord {
                            ref_index: ref_idx + offset,
                            hyp_index: Some(h),
                            start_time: Some(word.start_time),
                            end_time: Some(word.end_time),
                            score: Some(candidate.score),
                        },
                        // Shingle ran off the end of the hypothesis stream.
                        None => AlignmentRecord::unmatched(ref_idx + offset),
                    };
                    records.push(record);
                }

                ref_idx += covered;
                hyp_idx = candidate.hyp_index + candidate.shingle_len;
            }
            None => {
                tracing::debug!(
                    ref_index = ref_idx,
                    shingle = ref_shingle.as_str(),
                    "aligner: no candidate above threshold"
                );
                records.push(AlignmentRecord::unmatched(ref_idx));
                ref_idx += 1;
            }
        }
    }

    let matched = records.iter().filter(|r| r.hyp_index.is_some()).count();
    if matched == 0 && len_ref > 0 {
        tracing::warn!(
            reference_words = len_ref,
            hypothesis_words = len_hyp,
            "aligner: no reference word could be matched"
        );
    }

    records
}

fn shingle(words: &[&str], start: usize, seq_len: usize) -> String {
    let end = (start + seq_len).min(words.len());
    words[start.min(end)..end].join(" ")
}

fn window_is_silent(hypothesis: &[HypothesisWord], start: usize, width: usize) -> bool {
    let end = (start + width).min(hypothesis.len());
    hypothesis[start.min(end)..end]
        .iter()
        .all(HypothesisWord::is_silence)
}

/// Scan `initial_window` positions from the cursor, then widen by
/// `WINDOW_GROWTH` until a candidate appears or `max_window` is reached.
/// Only newly exposed positions are scored on each widening.
fn search_window(
    ref_shingle: &str,
    hyp_words: &[&str],
    hyp_cursor: usize,
    seq_len: usize,
    config: &AlignerConfig,
) -> Option<Candidate> {
    let len_hyp = hyp_words.len();
    if hyp_cursor >= len_hyp {
        return None;
    }

    let limit = (hyp_cursor + config.max_window.max(config.initial_window)).min(len_hyp);
    let mut window_end = (hyp_cursor + config.initial_window).min(limit);
    let mut scanned_to = hyp_cursor;
    let mut best: Option<Candidate> = None;

    loop {
        for idx in scanned_to..window_end {
            let hyp_shingle = shingle(hyp_words, idx, seq_len);
            let score = similarity_ratio(ref_shingle, &hyp_shingle);
            if score < config.match_threshold {
                continue;
            }
            // Strictly greater: ties keep the earliest hypothesis index.
            if best.map_or(true, |b| score > b.score) {
                best = Some(Candidate {
                    hyp_index: idx,
                    score,
                    shingle_len: seq_len.min(len_hyp - idx),
                });
            }
        }
        scanned_to = window_end;

        if best.is_some() || window_end >= limit {
            break;
        }
        window_end = (window_end + AlignerConfig::WINDOW_GROWTH).min(limit);
        tracing::trace!(hyp_cursor, window_end, "aligner: widening search window");
    }

    best
}
