//! Exact-set-match grading: a question counts as correct only when the set of
//! selected option ids equals the set of options flagged correct. No partial
//! credit for subsets or supersets.

use std::collections::HashSet;

pub(crate) fn is_correct_answer(correct_ids: &[i64], selected_ids: &[i64]) -> bool {
    let correct: HashSet<i64> = correct_ids.iter().copied().collect();
    let selected: HashSet<i64> = selected_ids.iter().copied().collect();
    correct == selected
}

pub(crate) fn percentage(score: i32, total_questions: i32) -> f64 {
    if total_questions > 0 {
        round2(f64::from(score) / f64::from(total_questions) * 100.0)
    } else {
        0.0
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
