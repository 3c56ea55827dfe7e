use std::collections::BTreeMap;

use crate::{
    error::{AppError, AppResult},
    models::{QuizAnswer, TasteProfile, PRIORITY_ORDER},
};

/// Number of questions in the quiz
pub const QUIZ_LEN: usize = 5;

/// Scores an answer sheet into a taste profile
///
/// Pure and deterministic: no I/O, no shared state. Every category appears
/// in the returned maps even with zero votes so the client can render a full
/// breakdown. Ties on the top score resolve to the earliest category in
/// `PRIORITY_ORDER`; a winner always exists.
pub fn classify(answers: &[QuizAnswer]) -> AppResult<TasteProfile> {
    if answers.len() != QUIZ_LEN {
        return Err(AppError::InvalidInput(format!(
            "Expected exactly {} answers, got {}",
            QUIZ_LEN,
            answers.len()
        )));
    }

    let mut scores: BTreeMap<_, u32> = PRIORITY_ORDER.iter().map(|c| (*c, 0)).collect();
    let mut evidence: BTreeMap<_, Vec<usize>> =
        PRIORITY_ORDER.iter().map(|c| (*c, Vec::new())).collect();

    for (index, answer) in answers.iter().enumerate() {
        let category = answer.category();
        *scores.entry(category).or_insert(0) += 1;
        evidence.entry(category).or_default().push(index + 1);
    }

    let max_score = scores.values().copied().max().unwrap_or(0);

    // The priority scan is the tie-break, not an error path: PRIORITY_ORDER
    // is total over the categories, so the scan always finds the winner.
    let winner = PRIORITY_ORDER
        .iter()
        .copied()
        .find(|category| scores.get(category) == Some(&max_score))
        .ok_or_else(|| {
            AppError::Internal("Priority order does not cover all categories".to_string())
        })?;

    Ok(TasteProfile {
        winner,
        scores,
        evidence,
    })
}
