//! "Did you mean" suggestions for misspelled property names

/// Suggestions must be strictly closer than this distance.
pub const SUGGESTION_LIMIT: usize = 4;

/// Edit distance with insertion and deletion cost 1 and substitution cost 2.
///
/// A substitution therefore never beats a deletion plus an insertion, so
/// transposed or swapped letters cost 2 per character moved.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = if ca == cb { 0 } else { 2 };
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + substitution);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Find the candidate closest to `word`.
///
/// Returns `None` when no candidate is within [`SUGGESTION_LIMIT`]. On a tie
/// the first candidate seen wins, so callers pass candidates in sorted order
/// to get a stable answer.
pub fn suggest<'a, I>(word: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<&str> = None;
    let mut min = SUGGESTION_LIMIT;

    for candidate in candidates {
        let distance = edit_distance(word, candidate);
        if distance < min {
            min = distance;
            best = Some(candidate);
        }
    }

    best.map(str::to_string)
}
