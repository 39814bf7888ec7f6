use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::daily_entry::{
    DailyEntry, DailyEntryPatch, DailyEntryRow, DailySummary, DEFAULT_SCALE_LEVEL,
};

/// Creates the entry on first save, otherwise merges: absent patch fields keep the stored value.
/// Meals and activity merge key by key; meditation slots are replaced as a whole.
pub async fn upsert_entry(
    db: &PgPool,
    user_id: Uuid,
    entry_date: NaiveDate,
    patch: &DailyEntryPatch,
) -> Result<DailyEntry, sqlx::Error> {
    let row = sqlx::query_as::<_, DailyEntryRow>(
        r#"
        INSERT INTO daily_entries (
            user_id, entry_date, water_intake, meals, meditations, activity,
            probiotic, elevated_sleep, weight, fatigue_level, pain_level,
            movement_limitation, mood, mood_notes, menstrual_cycle,
            menstrual_cycle_notes, general_notes
        )
        VALUES (
            $1, $2,
            COALESCE($3, 0),
            COALESCE($4, '{}'::jsonb),
            COALESCE($5, '[{}, {}, {}, {}]'::jsonb),
            COALESCE($6, '{"performed": false}'::jsonb),
            COALESCE($7, FALSE),
            COALESCE($8, FALSE),
            $9,
            COALESCE($10, $18),
            COALESCE($11, $18),
            COALESCE($12, $18),
            $13, $14,
            COALESCE($15, 'not_applicable'),
            $16, $17
        )
        ON CONFLICT (user_id, entry_date) DO UPDATE SET
            water_intake = COALESCE($3, daily_entries.water_intake),
            meals = daily_entries.meals || COALESCE($4, '{}'::jsonb),
            meditations = COALESCE($5, daily_entries.meditations),
            activity = daily_entries.activity || COALESCE($6, '{}'::jsonb),
            probiotic = COALESCE($7, daily_entries.probiotic),
            elevated_sleep = COALESCE($8, daily_entries.elevated_sleep),
            weight = COALESCE($9, daily_entries.weight),
            fatigue_level = COALESCE($10, daily_entries.fatigue_level),
            pain_level = COALESCE($11, daily_entries.pain_level),
            movement_limitation = COALESCE($12, daily_entries.movement_limitation),
            mood = COALESCE($13, daily_entries.mood),
            mood_notes = COALESCE($14, daily_entries.mood_notes),
            menstrual_cycle = COALESCE($15, daily_entries.menstrual_cycle),
            menstrual_cycle_notes = COALESCE($16, daily_entries.menstrual_cycle_notes),
            general_notes = COALESCE($17, daily_entries.general_notes),
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(entry_date)
    .bind(patch.water_intake)
    .bind(patch.meals.clone().map(Json))
    .bind(patch.meditations.clone().map(Json))
    .bind(patch.activity.clone().map(Json))
    .bind(patch.probiotic)
    .bind(patch.elevated_sleep)
    .bind(patch.weight)
    .bind(patch.fatigue_level)
    .bind(patch.pain_level)
    .bind(patch.movement_limitation)
    .bind(patch.mood)
    .bind(&patch.mood_notes)
    .bind(patch.menstrual_cycle)
    .bind(&patch.menstrual_cycle_notes)
    .bind(&patch.general_notes)
    .bind(DEFAULT_SCALE_LEVEL)
    .fetch_one(db)
    .await?;

    Ok(row.into())
}

pub async fn get_entry(
    db: &PgPool,
    user_id: Uuid,
    entry_date: NaiveDate,
) -> Result<Option<DailyEntry>, sqlx::Error> {
    let row = sqlx::query_as::<_, DailyEntryRow>(
        "SELECT * FROM daily_entries WHERE user_id = $1 AND entry_date = $2",
    )
    .bind(user_id)
    .bind(entry_date)
    .fetch_optional(db)
    .await?;

    Ok(row.map(Into::into))
}

/// Entries in `[start, end]`, newest first.
pub async fn list_entries(
    db: &PgPool,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DailyEntryRow>(
        r#"
        SELECT * FROM daily_entries
        WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
        ORDER BY entry_date DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Attaches a generated summary. Returns `None` when the entry does not exist.
pub async fn set_summary(
    db: &PgPool,
    user_id: Uuid,
    entry_date: NaiveDate,
    summary: &DailySummary,
) -> Result<Option<DailyEntry>, sqlx::Error> {
    let row = sqlx::query_as::<_, DailyEntryRow>(
        r#"
        UPDATE daily_entries
        SET summary_message = $3, summary_score = $4, updated_at = NOW()
        WHERE user_id = $1 AND entry_date = $2
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(entry_date)
    .bind(&summary.message)
    .bind(summary.score)
    .fetch_optional(db)
    .await?;

    Ok(row.map(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::models::daily_entry::{MealLog, Mood};
    use serde_json::json;

    fn patch(value: serde_json::Value) -> DailyEntryPatch {
        serde_json::from_value(value).unwrap()
    }

    fn date(d: &str) -> NaiveDate {
        d.parse().unwrap()
    }

    #[tokio::test]
    async fn test_first_save_fills_defaults() {
        let Some(db) = test_pool().await else { return };
        let user_id = Uuid::new_v4();

        let entry = upsert_entry(&db, user_id, date("2024-05-01"), &patch(json!({"water_intake": 2.5})))
            .await
            .unwrap();

        assert_eq!(entry.water_intake, 2.5);
        assert_eq!(entry.meditations.len(), 4);
        assert_eq!(entry.pain_level, DEFAULT_SCALE_LEVEL);
        assert!(!entry.activity.performed);
        assert!(entry.mood.is_none());
    }

    #[tokio::test]
    async fn test_partial_saves_merge_meals_and_activity() {
        let Some(db) = test_pool().await else { return };
        let user_id = Uuid::new_v4();
        let day = date("2024-05-02");

        upsert_entry(
            &db,
            user_id,
            day,
            &patch(json!({
                "meals": {"breakfast": "oats"},
                "activity": {"performed": true, "description": "walk"},
                "mood": "calm"
            })),
        )
        .await
        .unwrap();
        let entry = upsert_entry(
            &db,
            user_id,
            day,
            &patch(json!({
                "meals": {"lunch": "salad"},
                "activity": {"performed": false},
                "pain_level": 3
            })),
        )
        .await
        .unwrap();

        assert_eq!(
            entry.meals,
            MealLog {
                breakfast: Some("oats".into()),
                lunch: Some("salad".into()),
                ..Default::default()
            }
        );
        assert!(!entry.activity.performed);
        assert_eq!(entry.activity.description.as_deref(), Some("walk"));
        assert_eq!(entry.mood, Some(Mood::Calm));
        assert_eq!(entry.pain_level, 3);
    }

    #[tokio::test]
    async fn test_summary_attaches_and_survives_later_edits() {
        let Some(db) = test_pool().await else { return };
        let user_id = Uuid::new_v4();
        let day = date("2024-05-03");
        let summary = DailySummary {
            message: "Well done".into(),
            score: 75,
        };

        assert!(set_summary(&db, user_id, day, &summary).await.unwrap().is_none());

        upsert_entry(&db, user_id, day, &patch(json!({"probiotic": true})))
            .await
            .unwrap();
        let entry = set_summary(&db, user_id, day, &summary).await.unwrap().unwrap();
        assert_eq!(entry.summary.as_ref(), Some(&summary));

        let edited = upsert_entry(&db, user_id, day, &patch(json!({"water_intake": 6})))
            .await
            .unwrap();
        assert_eq!(edited.summary, Some(summary));
        assert!(edited.probiotic);
    }

    #[tokio::test]
    async fn test_entries_are_scoped_to_user_and_range() {
        let Some(db) = test_pool().await else { return };
        let user_id = Uuid::new_v4();
        for d in ["2024-04-28", "2024-05-01", "2024-05-03"] {
            upsert_entry(&db, user_id, date(d), &DailyEntryPatch::default())
                .await
                .unwrap();
        }

        let listed = list_entries(&db, user_id, date("2024-04-30"), date("2024-05-03"))
            .await
            .unwrap();
        let dates: Vec<NaiveDate> = listed.iter().map(|e| e.entry_date).collect();
        assert_eq!(dates, vec![date("2024-05-03"), date("2024-05-01")]);

        let stranger = Uuid::new_v4();
        assert!(get_entry(&db, stranger, date("2024-05-01")).await.unwrap().is_none());
    }
}
