//! Daily compliance scoring.
//!
//! Four goals, 25 points each, all-or-nothing:
//!
//! | Goal       | yes                               | partial            | no          |
//! |------------|-----------------------------------|--------------------|-------------|
//! | Hydration  | 8 glasses                         | 0 < glasses < 8    | 0 glasses   |
//! | Diet       | breakfast, lunch and dinner       | 1–2 of them        | none        |
//! | Relaxation | any meditation slot done          | —                  | none done   |
//! | Activity   | activity performed                | —                  | not done    |
//!
//! Snacks never count toward diet. `partial` is reported to the coach but earns no points.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::daily_entry::DailyEntry;

pub const HYDRATION_GOAL_GLASSES: f64 = 8.0;
pub const MAIN_MEALS_GOAL: usize = 3;
const POINTS_PER_GOAL: i32 = 25;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceLevel {
    Yes,
    Partial,
    No,
}

impl ComplianceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceLevel::Yes => "yes",
            ComplianceLevel::Partial => "partial",
            ComplianceLevel::No => "no",
        }
    }

    fn points(&self) -> i32 {
        match self {
            ComplianceLevel::Yes => POINTS_PER_GOAL,
            ComplianceLevel::Partial | ComplianceLevel::No => 0,
        }
    }
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComplianceResult {
    pub score: i32,
    pub hydration_compliance: ComplianceLevel,
    pub diet_compliance: ComplianceLevel,
    pub activity_compliance: ComplianceLevel,
    pub relaxation_compliance: ComplianceLevel,
    pub summary_text: String,
}

pub fn compute(entry: &DailyEntry) -> ComplianceResult {
    let hydration = hydration_level(entry.water_intake);
    let diet = diet_level(entry.meals.main_meals_logged());
    let relaxation = if entry.meditations.iter().any(|slot| slot.counts_as_done()) {
        ComplianceLevel::Yes
    } else {
        ComplianceLevel::No
    };
    let activity = if entry.activity.performed {
        ComplianceLevel::Yes
    } else {
        ComplianceLevel::No
    };

    let score = [hydration, diet, relaxation, activity]
        .iter()
        .map(ComplianceLevel::points)
        .sum::<i32>()
        .clamp(0, 100);

    let mood = entry.mood.map(|m| m.as_str()).unwrap_or("not reported");
    let summary_text = format!(
        "Mood: {}. Fatigue level: {}/10. Pain level: {}/10. \
         The user achieved their water goal: {}. They followed their diet: {}. \
         They did their relaxation exercises: {}. They performed physical activity: {}. \
         Their final score is {}/100.",
        mood,
        entry.fatigue_level,
        entry.pain_level,
        hydration,
        diet,
        relaxation,
        activity,
        score,
    );

    ComplianceResult {
        score,
        hydration_compliance: hydration,
        diet_compliance: diet,
        activity_compliance: activity,
        relaxation_compliance: relaxation,
        summary_text,
    }
}

fn hydration_level(glasses: f64) -> ComplianceLevel {
    if glasses >= HYDRATION_GOAL_GLASSES {
        ComplianceLevel::Yes
    } else if glasses > 0.0 {
        ComplianceLevel::Partial
    } else {
        ComplianceLevel::No
    }
}

fn diet_level(main_meals: usize) -> ComplianceLevel {
    if main_meals >= MAIN_MEALS_GOAL {
        ComplianceLevel::Yes
    } else if main_meals > 0 {
        ComplianceLevel::Partial
    } else {
        ComplianceLevel::No
    }
}
