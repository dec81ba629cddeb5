/// Normalized indel similarity on a 0-100 scale.
///
/// Computed as `200 * lcs / (len_a + len_b)` over chars, where `lcs` is the
/// longest common subsequence. Order-sensitive: `"ab"` vs `"ba"` scores 50.
/// Two empty strings are identical and score 100.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 100.0;
    }
    if a_chars == b_chars {
        return 100.0;
    }

    let lcs = lcs_len(&a_chars, &b_chars);
    200.0 * lcs as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
