use serde::Serialize;

use crate::types::AlignmentRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentSummary {
    pub reference_word_count: usize,
    pub matched_word_count: usize,
    pub unmatched_word_count: usize,
    pub match_ratio: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,
    /// Longest run of consecutive reference words without a hypothesis match.
    pub longest_unmatched_run: usize,
    /// Matched records whose `hyp_index` is lower than an earlier match.
    pub non_monotonic_count: usize,
}

pub fn summarize(records: &[AlignmentRecord]) -> AlignmentSummary {
    let mut matched = 0usize;
    let mut score_sum = 0.0f64;
    let mut score_count = 0usize;
    let mut min_score: Option<f64> = None;
    let mut run = 0usize;
    let mut longest_run = 0usize;
    let mut last_hyp: Option<usize> = None;
    let mut non_monotonic = 0usize;

    for record in records {
        match record.hyp_index {
            Some(hyp_index) => {
                matched += 1;
                run = 0;
                if last_hyp.is_some_and(|last| hyp_index < last) {
                    non_monotonic += 1;
                }
                last_hyp = Some(hyp_index);
            }
            None => {
                run += 1;
                longest_run = longest_run.max(run);
            }
        }
        if let Some(score) = record.score {
            score_sum += score;
            score_count += 1;
            min_score = Some(min_score.map_or(score, |m| m.min(score)));
        }
    }

    let total = records.len();
    AlignmentSummary {
        reference_word_count: total,
        matched_word_count: matched,
        unmatched_word_count: total - matched,
        match_ratio: if total == 0 {
            0.0
        } else {
            (matched as f64 / total as f64) as f32
        },
        mean_score: (score_count > 0).then(|| (score_sum / score_count as f64) as f32),
        min_score: min_score.map(|s| s as f32),
        longest_unmatched_run: longest_run,
        non_monotonic_count: non_monotonic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(ref_index: usize, hyp_index: usize, score: f64) -> AlignmentRecord {
        AlignmentRecord {
            ref_index,
            hyp_index: Some(hyp_index),
            start_time: Some(0.0),
            end_time: Some(0.1),
            score: Some(score),
        }
    }

    #[test]
    fn summarize_counts_matches_and_runs() {
        let records = vec![
            matched(0, 0, 100.0),
            AlignmentRecord::unmatched(1),
            AlignmentRecord::unmatched(2),
            matched(3, 2, 80.0),
            AlignmentRecord::unmatched(4),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.reference_word_count, 5);
        assert_eq!(summary.matched_word_count, 2);
        assert_eq!(summary.unmatched_word_count, 3);
        assert!((summary.match_ratio - 0.4).abs() < 1e-6);
        assert_eq!(summary.mean_score, Some(90.0));
        assert_eq!(summary.min_score, Some(80.0));
        assert_eq!(summary.longest_unmatched_run, 2);
        assert_eq!(summary.non_monotonic_count, 0);
    }

    #[test]
    fn summarize_flags_backward_hypothesis_steps() {
        let records = vec![matched(0, 4, 100.0), matched(1, 2, 100.0)];
        assert_eq!(summarize(&records).non_monotonic_count, 1);
    }

    #[test]
    fn summarize_empty_records() {
        let summary = summarize(&[]);
        assert_eq!(summary.reference_word_count, 0);
        assert_eq!(summary.match_ratio, 0.0);
        assert_eq!(summary.mean_score, None);
        assert_eq!(summary.longest_unmatched_run, 0);
    }

    #[test]
    fn summary_omits_missing_scores_in_json() {
        let summary = summarize(&[AlignmentRecord::unmatched(0)]);
        let json = serde_json::to_string(&summary).expect("serialize summary");
        assert!(!json.contains("mean_score"));
        assert!(json.contains("\"longest_unmatched_run\":1"));
    }
}
