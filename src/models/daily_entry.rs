use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// Number of relaxation slots tracked per day.
pub const MEDITATION_SLOTS: usize = 4;

/// Default for fatigue, pain and movement limitation before the user touches the slider.
pub const DEFAULT_SCALE_LEVEL: i32 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "mood", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Calm,
    Tired,
    Angry,
    Anxious,
    Other,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Calm => "calm",
            Mood::Tired => "tired",
            Mood::Angry => "angry",
            Mood::Anxious => "anxious",
            Mood::Other => "other",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "menstrual_cycle", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MenstrualCycle {
    Yes,
    No,
    #[serde(alias = "na")]
    NotApplicable,
}

impl Default for MenstrualCycle {
    fn default() -> Self {
        Self::NotApplicable
    }
}

/// Stored as JSONB and merged key by key on save, so unset meals are left out of the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MealLog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lunch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dinner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snacks: Option<String>,
}

impl MealLog {
    /// Breakfast, lunch and dinner that carry any non-whitespace text. Snacks never count.
    pub fn main_meals_logged(&self) -> usize {
        [&self.breakfast, &self.lunch, &self.dinner]
            .into_iter()
            .filter(|meal| meal.as_deref().is_some_and(|text| !text.trim().is_empty()))
            .count()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeditationSlot {
    /// `None` when the client never reported the checkbox for this slot.
    pub performed: Option<bool>,
    pub time: Option<String>,
    pub duration_minutes: Option<f64>,
    pub oils: Option<String>,
    pub notes: Option<String>,
}

impl MeditationSlot {
    /// An explicit `performed` flag wins; a positive duration stands in when the flag is absent.
    pub fn counts_as_done(&self) -> bool {
        match self.performed {
            Some(performed) => performed,
            None => self.duration_minutes.is_some_and(|minutes| minutes > 0.0),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub performed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    pub message: String,
    pub score: i32,
}

/// One user's wellness log for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyEntry {
    pub entry_date: NaiveDate,
    pub water_intake: f64,
    pub meals: MealLog,
    pub meditations: Vec<MeditationSlot>,
    pub activity: Activity,
    pub probiotic: bool,
    pub elevated_sleep: bool,
    pub weight: Option<f64>,
    pub fatigue_level: i32,
    pub pain_level: i32,
    pub movement_limitation: i32,
    pub mood: Option<Mood>,
    pub mood_notes: Option<String>,
    pub menstrual_cycle: MenstrualCycle,
    pub menstrual_cycle_notes: Option<String>,
    pub general_notes: Option<String>,
    pub summary: Option<DailySummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyEntry {
    /// An untouched entry: what the tracker form shows before the first save.
    #[cfg(test)]
    pub fn blank(entry_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            entry_date,
            water_intake: 0.0,
            meals: MealLog::default(),
            meditations: vec![MeditationSlot::default(); MEDITATION_SLOTS],
            activity: Activity::default(),
            probiotic: false,
            elevated_sleep: false,
            weight: None,
            fatigue_level: DEFAULT_SCALE_LEVEL,
            pain_level: DEFAULT_SCALE_LEVEL,
            movement_limitation: DEFAULT_SCALE_LEVEL,
            mood: None,
            mood_notes: None,
            menstrual_cycle: MenstrualCycle::default(),
            menstrual_cycle_notes: None,
            general_notes: None,
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct DailyEntryRow {
    pub entry_date: NaiveDate,
    pub water_intake: f64,
    pub meals: Json<MealLog>,
    pub meditations: Json<Vec<MeditationSlot>>,
    pub activity: Json<Activity>,
    pub probiotic: bool,
    pub elevated_sleep: bool,
    pub weight: Option<f64>,
    pub fatigue_level: i32,
    pub pain_level: i32,
    pub movement_limitation: i32,
    pub mood: Option<Mood>,
    pub mood_notes: Option<String>,
    pub menstrual_cycle: MenstrualCycle,
    pub menstrual_cycle_notes: Option<String>,
    pub general_notes: Option<String>,
    pub summary_message: Option<String>,
    pub summary_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DailyEntryRow> for DailyEntry {
    fn from(row: DailyEntryRow) -> Self {
        let summary = match (row.summary_message, row.summary_score) {
            (Some(message), Some(score)) => Some(DailySummary { message, score }),
            _ => None,
        };

        Self {
            entry_date: row.entry_date,
            water_intake: row.water_intake,
            meals: row.meals.0,
            meditations: row.meditations.0,
            activity: row.activity.0,
            probiotic: row.probiotic,
            elevated_sleep: row.elevated_sleep,
            weight: row.weight,
            fatigue_level: row.fatigue_level,
            pain_level: row.pain_level,
            movement_limitation: row.movement_limitation,
            mood: row.mood,
            mood_notes: row.mood_notes,
            menstrual_cycle: row.menstrual_cycle,
            menstrual_cycle_notes: row.menstrual_cycle_notes,
            general_notes: row.general_notes,
            summary,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PUT /api/entries/:date — partial save, absent fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate)]
pub struct DailyEntryPatch {
    #[validate(range(min = 0.0, max = 8.0, message = "Water intake must be between 0 and 8 glasses"))]
    pub water_intake: Option<f64>,

    pub meals: Option<MealLog>,

    pub meditations: Option<Vec<MeditationSlot>>,

    pub activity: Option<Activity>,

    pub probiotic: Option<bool>,
    pub elevated_sleep: Option<bool>,

    #[validate(range(min = 0.0, max = 500.0, message = "Weight must be between 0 and 500"))]
    pub weight: Option<f64>,

    #[validate(range(min = 1, max = 10, message = "Fatigue level must be between 1 and 10"))]
    pub fatigue_level: Option<i32>,

    #[validate(range(min = 1, max = 10, message = "Pain level must be between 1 and 10"))]
    pub pain_level: Option<i32>,

    #[validate(range(min = 1, max = 10, message = "Movement limitation must be between 1 and 10"))]
    pub movement_limitation: Option<i32>,

    pub mood: Option<Mood>,

    #[validate(length(max = 2000, message = "Mood notes must be under 2000 characters"))]
    pub mood_notes: Option<String>,

    pub menstrual_cycle: Option<MenstrualCycle>,

    #[validate(length(max = 2000, message = "Cycle notes must be under 2000 characters"))]
    pub menstrual_cycle_notes: Option<String>,

    #[validate(length(max = 5000, message = "General notes must be under 5000 characters"))]
    pub general_notes: Option<String>,
}
