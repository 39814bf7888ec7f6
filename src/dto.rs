//! # DailyWell — Request/Response DTOs
//!
//! API contract types that are not stored models.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::chat::ChatMessage;
use crate::models::settings::ReportFrequency;
use crate::services::compliance::ComplianceResult;

const DEFAULT_RANGE_DAYS: i64 = 30;

// ============================================================================
// Entries & reports
// ============================================================================

/// GET /api/entries, /api/reports/* — inclusive date range
#[derive(Debug, Default, Deserialize)]
pub struct EntryRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl EntryRangeQuery {
    /// Resolve to a concrete range. Defaults to the last 30 days ending today.
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), String> {
        let end = self.end_date.unwrap_or(today);
        let start = self
            .start_date
            .unwrap_or_else(|| end - chrono::Duration::days(DEFAULT_RANGE_DAYS));
        if start > end {
            return Err("start_date must not be after end_date".into());
        }
        Ok((start, end))
    }

    pub fn resolve_now(&self) -> Result<(NaiveDate, NaiveDate), String> {
        self.resolve(Utc::now().date_naive())
    }
}

/// POST /api/entries/{date}/summary
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub message: String,
    pub score: i32,
    pub compliance: ComplianceResult,
}

// ============================================================================
// Coach
// ============================================================================

/// POST /api/coach/messages
#[derive(Debug, Deserialize, Validate)]
pub struct CoachMessageRequest {
    /// Continue this session; start a new one when absent
    pub chat_id: Option<Uuid>,

    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CoachMessageResponse {
    pub chat_id: Uuid,
    pub reply: String,
}

/// GET /api/chats/{id}
#[derive(Debug, Serialize)]
pub struct ChatMessagesResponse {
    pub chat_id: Uuid,
    pub messages: Vec<ChatMessage>,
}

// ============================================================================
// Settings
// ============================================================================

/// PUT /api/settings/email
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmailSettingsRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub user_email: String,

    /// Absent keeps the stored address; blank removes it
    #[validate(custom = "validate_doctor_email")]
    pub doctor_email: Option<String>,

    /// Default: "weekly"
    pub report_frequency: Option<ReportFrequency>,
}

impl UpdateEmailSettingsRequest {
    /// `None` leaves the doctor email alone, `Some(None)` clears it.
    pub fn doctor_email_change(&self) -> Option<Option<&str>> {
        self.doctor_email.as_deref().map(|email| {
            let email = email.trim();
            (!email.is_empty()).then_some(email)
        })
    }
}

fn validate_doctor_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() || validator::validate_email(email) {
        return Ok(());
    }
    let mut error = ValidationError::new("email");
    error.message = Some("Invalid doctor email format".into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: &str) -> NaiveDate {
        d.parse().unwrap()
    }

    #[test]
    fn test_range_defaults_to_thirty_days() {
        let q = EntryRangeQuery::default();
        let (start, end) = q.resolve(date("2024-03-31")).unwrap();
        assert_eq!(end, date("2024-03-31"));
        assert_eq!(start, date("2024-03-01"));
    }

    #[test]
    fn test_range_rejects_inverted() {
        let q = EntryRangeQuery {
            start_date: Some(date("2024-04-02")),
            end_date: Some(date("2024-04-01")),
        };
        assert!(q.resolve(date("2024-04-10")).is_err());
    }

    #[test]
    fn test_coach_message_must_not_be_empty() {
        let req = CoachMessageRequest {
            chat_id: None,
            message: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_settings_email_validation() {
        let req = UpdateEmailSettingsRequest {
            user_email: "me@example.com".into(),
            doctor_email: Some("not-an-email".into()),
            report_frequency: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("doctor_email"));
    }

    #[test]
    fn test_blank_doctor_email_clears() {
        let req: UpdateEmailSettingsRequest =
            serde_json::from_str(r#"{"user_email": "me@example.com", "doctor_email": "  "}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.doctor_email_change(), Some(None));

        let req: UpdateEmailSettingsRequest =
            serde_json::from_str(r#"{"user_email": "me@example.com"}"#).unwrap();
        assert_eq!(req.doctor_email_change(), None);

        let req: UpdateEmailSettingsRequest = serde_json::from_str(
            r#"{"user_email": "me@example.com", "doctor_email": " dr@clinic.org "}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.doctor_email_change(), Some(Some("dr@clinic.org")));
    }
}
