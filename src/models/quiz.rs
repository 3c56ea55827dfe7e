use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One multiple-choice quiz answer
///
/// The quiz always offers the same four choices, so the wire alphabet is
/// fixed; serde rejects anything outside it at the boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuizAnswer {
    A,
    B,
    C,
    D,
}

impl TryFrom<char> for QuizAnswer {
    type Error = AppError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(QuizAnswer::A),
            'B' => Ok(QuizAnswer::B),
            'C' => Ok(QuizAnswer::C),
            'D' => Ok(QuizAnswer::D),
            other => Err(AppError::InvalidInput(format!(
                "Answer label '{}' is not one of A, B, C, D",
                other
            ))),
        }
    }
}

impl QuizAnswer {
    /// The taste category this answer votes for. Static configuration,
    /// never mutated at runtime.
    pub fn category(self) -> TasteCategory {
        match self {
            QuizAnswer::A => TasteCategory::RomanceDrama,
            QuizAnswer::B => TasteCategory::ActionAdventure,
            QuizAnswer::C => TasteCategory::SciFiFantasy,
            QuizAnswer::D => TasteCategory::Comedy,
        }
    }
}

/// One of the four fixed taste buckets
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum TasteCategory {
    RomanceDrama,
    ActionAdventure,
    SciFiFantasy,
    Comedy,
}

/// Tie-break order: among top-scoring categories the earliest entry here
/// wins. Total over all categories, so a winner always exists.
pub const PRIORITY_ORDER: [TasteCategory; 4] = [
    TasteCategory::RomanceDrama,
    TasteCategory::ActionAdventure,
    TasteCategory::SciFiFantasy,
    TasteCategory::Comedy,
];

impl TasteCategory {
    /// TMDB genre codes queried for this category, in query order.
    /// Categories with more than one code are blended: each code is
    /// queried independently and the results merged.
    pub fn genre_ids(self) -> &'static [u32] {
        match self {
            TasteCategory::RomanceDrama => &[10749, 18],
            TasteCategory::ActionAdventure => &[28, 12],
            TasteCategory::SciFiFantasy => &[878, 14],
            TasteCategory::Comedy => &[35],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TasteCategory::RomanceDrama => "Romance/Drama",
            TasteCategory::ActionAdventure => "Action/Adventure",
            TasteCategory::SciFiFantasy => "SciFi/Fantasy",
            TasteCategory::Comedy => "Comedy",
        }
    }

    /// One-line rationale attached to every recommendation from this bucket
    pub fn rationale(self) -> &'static str {
        match self {
            TasteCategory::RomanceDrama => {
                "A story-first pick for your romantic, character-driven streak"
            }
            TasteCategory::ActionAdventure => {
                "High-momentum viewing to match your appetite for thrills"
            }
            TasteCategory::SciFiFantasy => {
                "A world-building pick for your love of the speculative"
            }
            TasteCategory::Comedy => "An easy, feel-good watch for your lighter side",
        }
    }
}

/// Outcome of scoring one answer sheet
///
/// Zero-vote categories stay present in both maps so clients can render a
/// full breakdown.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TasteProfile {
    pub winner: TasteCategory,
    /// Vote count per category; counts sum to the quiz length
    pub scores: BTreeMap<TasteCategory, u32>,
    /// 1-based question indices that voted for each category
    pub evidence: BTreeMap<TasteCategory, Vec<usize>>,
}
