//! Field-level validation for daily entries.
//!
//! Two entry points, each called once per user action:
//! - [`validate_patch`] before a partial save. Only the fields that are present are checked.
//! - [`validate_complete`] before a summary is generated. The merged entry must be complete.
//!
//! Both return every problem found rather than stopping at the first one.

use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::models::daily_entry::{DailyEntry, DailyEntryPatch, MeditationSlot, MEDITATION_SLOTS};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub fn validate_patch(patch: &DailyEntryPatch) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Err(derived) = patch.validate() {
        errors.extend(from_validator(&derived));
    }

    if let Some(water) = patch.water_intake {
        check_water_intake(water, &mut errors);
    }
    if let Some(weight) = patch.weight {
        if !weight.is_finite() {
            errors.push(FieldError::new("weight", "finite", "Weight must be a number"));
        }
    }
    if let Some(slots) = &patch.meditations {
        check_meditations(slots, &mut errors);
    }

    finish(errors)
}

pub fn validate_complete(entry: &DailyEntry) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if entry.mood.is_none() {
        errors.push(FieldError::new("mood", "required", "Please choose a mood"));
    }
    check_water_intake(entry.water_intake, &mut errors);
    check_meditations(&entry.meditations, &mut errors);

    for (field, value) in [
        ("fatigue_level", entry.fatigue_level),
        ("pain_level", entry.pain_level),
        ("movement_limitation", entry.movement_limitation),
    ] {
        if !(1..=10).contains(&value) {
            errors.push(FieldError::new(
                field,
                "range",
                format!("{} must be between 1 and 10", field),
            ));
        }
    }

    finish(errors)
}

/// Flattens derive-level errors into the field list returned to clients.
pub fn from_validator(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for e in field_errors {
            let message = e
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field));
            fields.push(FieldError::new(field, e.code.to_string(), message));
        }
    }
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

fn check_water_intake(water: f64, errors: &mut Vec<FieldError>) {
    if !water.is_finite() || !(0.0..=8.0).contains(&water) {
        // range messages from the derive already cover the in-patch case
        if !errors.iter().any(|e| e.field == "water_intake") {
            errors.push(FieldError::new(
                "water_intake",
                "range",
                "Water intake must be between 0 and 8 glasses",
            ));
        }
        return;
    }
    if (water * 2.0).fract() != 0.0 {
        errors.push(FieldError::new(
            "water_intake",
            "step",
            "Water intake is counted in half glasses",
        ));
    }
}

fn check_meditations(slots: &[MeditationSlot], errors: &mut Vec<FieldError>) {
    if slots.len() != MEDITATION_SLOTS {
        errors.push(FieldError::new(
            "meditations",
            "length",
            format!("Exactly {} meditation slots are expected", MEDITATION_SLOTS),
        ));
    }
    for (index, slot) in slots.iter().enumerate() {
        if let Some(minutes) = slot.duration_minutes {
            if !minutes.is_finite() || minutes < 0.0 {
                errors.push(FieldError::new(
                    format!("meditations[{}].duration_minutes", index),
                    "range",
                    "Duration cannot be negative",
                ));
            }
        }
    }
}

fn finish(mut errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        return Ok(());
    }
    errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    Err(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::daily_entry::Mood;
    use chrono::NaiveDate;

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_empty_patch_is_valid() {
        assert!(validate_patch(&DailyEntryPatch::default()).is_ok());
    }

    #[test]
    fn test_patch_ranges() {
        let patch = DailyEntryPatch {
            water_intake: Some(9.0),
            pain_level: Some(11),
            fatigue_level: Some(0),
            ..Default::default()
        };
        let errors = validate_patch(&patch).unwrap_err();
        assert_eq!(fields(&errors), vec!["fatigue_level", "pain_level", "water_intake"]);
    }

    #[test]
    fn test_water_half_steps() {
        let ok = DailyEntryPatch {
            water_intake: Some(3.5),
            ..Default::default()
        };
        assert!(validate_patch(&ok).is_ok());

        let bad = DailyEntryPatch {
            water_intake: Some(3.3),
            ..Default::default()
        };
        let errors = validate_patch(&bad).unwrap_err();
        assert_eq!(errors[0].code, "step");
    }

    #[test]
    fn test_meditation_slots() {
        let patch = DailyEntryPatch {
            meditations: Some(vec![
                MeditationSlot {
                    duration_minutes: Some(-5.0),
                    ..Default::default()
                },
                MeditationSlot::default(),
            ]),
            ..Default::default()
        };
        let errors = validate_patch(&patch).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["meditations", "meditations[0].duration_minutes"]
        );
    }

    #[test]
    fn test_complete_entry_requires_mood() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let mut entry = DailyEntry::blank(date);
        let errors = validate_complete(&entry).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("mood", "required", "Please choose a mood")]);

        entry.mood = Some(Mood::Happy);
        assert!(validate_complete(&entry).is_ok());
    }

    #[test]
    fn test_complete_entry_checks_scale_ranges() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        let mut entry = DailyEntry::blank(date);
        entry.mood = Some(Mood::Tired);
        entry.pain_level = 0;
        entry.movement_limitation = 11;

        let errors = validate_complete(&entry).unwrap_err();
        assert_eq!(fields(&errors), vec!["movement_limitation", "pain_level"]);
        assert!(errors.iter().all(|e| e.code == "range"));
    }
}
