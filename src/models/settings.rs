use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "report_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportFrequency {
    Daily,
    Weekly,
    Never,
}

impl Default for ReportFrequency {
    fn default() -> Self {
        Self::Weekly
    }
}

/// Where and how often reports are mailed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmailSettings {
    pub user_email: String,
    pub doctor_email: Option<String>,
    pub report_frequency: ReportFrequency,
    pub updated_at: DateTime<Utc>,
}
