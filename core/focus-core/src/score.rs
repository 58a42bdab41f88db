//! Focus score derivation.
//!
//! One formula is shared by the live snapshot and the persisted record:
//! `max(0, 100 - distractions * penalty)`.

/// Score of a session with no distractions.
pub const PERFECT_SCORE: u32 = 100;

/// Points deducted per counted distraction event.
pub const DEFAULT_DISTRACTION_PENALTY: u32 = 5;

/// Computes the 0..=100 focus score for a distraction count.
pub fn focus_score(distractions: u32, penalty: u32) -> u32 {
    PERFECT_SCORE.saturating_sub(distractions.saturating_mul(penalty))
}

/// Label for a score band: 90+ Excellent, 75+ Good, 60+ Average.
pub fn rating(score: u32) -> &'static str {
    match score {
        90.. => "Excellent",
        75..=89 => "Good",
        60..=74 => "Average",
        _ => "Needs Improvement",
    }
}
