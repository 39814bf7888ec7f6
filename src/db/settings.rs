use sqlx::PgPool;
use uuid::Uuid;

use crate::models::settings::{EmailSettings, ReportFrequency};

pub async fn get_email_settings(
    db: &PgPool,
    user_id: Uuid,
) -> Result<Option<EmailSettings>, sqlx::Error> {
    sqlx::query_as::<_, EmailSettings>(
        r#"
        SELECT user_email, doctor_email, report_frequency, updated_at
        FROM email_settings WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// `doctor_email`: `None` keeps the stored value, `Some(None)` clears it.
pub async fn upsert_email_settings(
    db: &PgPool,
    user_id: Uuid,
    user_email: &str,
    doctor_email: Option<Option<&str>>,
    report_frequency: Option<ReportFrequency>,
) -> Result<EmailSettings, sqlx::Error> {
    sqlx::query_as::<_, EmailSettings>(
        r#"
        INSERT INTO email_settings (user_id, user_email, doctor_email, report_frequency)
        VALUES ($1, $2, $3, COALESCE($4, $5))
        ON CONFLICT (user_id) DO UPDATE SET
            user_email = $2,
            doctor_email = CASE WHEN $6 THEN $3 ELSE email_settings.doctor_email END,
            report_frequency = COALESCE($4, email_settings.report_frequency),
            updated_at = NOW()
        RETURNING user_email, doctor_email, report_frequency, updated_at
        "#,
    )
    .bind(user_id)
    .bind(user_email)
    .bind(doctor_email.flatten())
    .bind(report_frequency)
    .bind(ReportFrequency::default())
    .bind(doctor_email.is_some())
    .fetch_one(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_settings_merge_and_clear_doctor_email() {
        let Some(db) = test_pool().await else { return };
        let user_id = Uuid::new_v4();

        assert!(get_email_settings(&db, user_id).await.unwrap().is_none());

        let created = upsert_email_settings(&db, user_id, "me@example.com", Some(Some("dr@clinic.org")), None)
            .await
            .unwrap();
        assert_eq!(created.doctor_email.as_deref(), Some("dr@clinic.org"));
        assert_eq!(created.report_frequency, ReportFrequency::Weekly);

        let kept = upsert_email_settings(&db, user_id, "new@example.com", None, Some(ReportFrequency::Daily))
            .await
            .unwrap();
        assert_eq!(kept.user_email, "new@example.com");
        assert_eq!(kept.doctor_email.as_deref(), Some("dr@clinic.org"));
        assert_eq!(kept.report_frequency, ReportFrequency::Daily);

        let cleared = upsert_email_settings(&db, user_id, "new@example.com", Some(None), None)
            .await
            .unwrap();
        assert!(cleared.doctor_email.is_none());
        assert_eq!(cleared.report_frequency, ReportFrequency::Daily);

        let stored = get_email_settings(&db, user_id).await.unwrap().unwrap();
        assert!(stored.doctor_email.is_none());
    }
}
