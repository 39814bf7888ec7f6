use std::collections::BTreeMap;

use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::daily_entry::DailyEntry;

/// Averages for one ISO week of entries.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeeklyTrend {
    pub iso_year: i32,
    pub iso_week: u32,
    pub week_start: NaiveDate,
    pub entries: usize,
    pub avg_weight: Option<f64>,
    pub avg_pain: f64,
    pub avg_fatigue: f64,
    pub avg_water: f64,
    /// Only entries that already have a summary contribute.
    pub avg_score: Option<f64>,
}

pub fn weekly_trends(entries: &[DailyEntry]) -> Vec<WeeklyTrend> {
    let mut weeks: BTreeMap<(i32, u32), Vec<&DailyEntry>> = BTreeMap::new();
    for entry in entries {
        let week = entry.entry_date.iso_week();
        weeks.entry((week.year(), week.week())).or_default().push(entry);
    }

    weeks
        .into_iter()
        .map(|((iso_year, iso_week), group)| {
            // every group holds at least one entry; any day in it yields the same Monday
            let day = group[0].entry_date;
            let week_start = day - Duration::days(day.weekday().num_days_from_monday() as i64);

            WeeklyTrend {
                iso_year,
                iso_week,
                week_start,
                entries: group.len(),
                avg_weight: mean(group.iter().filter_map(|e| e.weight)),
                avg_pain: mean(group.iter().map(|e| e.pain_level as f64)).unwrap_or(0.0),
                avg_fatigue: mean(group.iter().map(|e| e.fatigue_level as f64)).unwrap_or(0.0),
                avg_water: mean(group.iter().map(|e| e.water_intake)).unwrap_or(0.0),
                avg_score: mean(
                    group
                        .iter()
                        .filter_map(|e| e.summary.as_ref().map(|s| s.score as f64)),
                ),
            }
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    Some(((sum / count as f64) * 100.0).round() / 100.0)
}

/// CSV export, oldest date first. Missing values are left empty.
pub fn write_csv(entries: &[DailyEntry]) -> anyhow::Result<String> {
    let mut sorted: Vec<&DailyEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.entry_date);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["date", "weight", "mood", "pain", "fatigue", "water", "score"])?;

    for entry in sorted {
        writer.write_record([
            entry.entry_date.format("%Y-%m-%d").to_string(),
            entry.weight.map(|w| w.to_string()).unwrap_or_default(),
            entry.mood.map(|m| m.to_string()).unwrap_or_default(),
            entry.pain_level.to_string(),
            entry.fatigue_level.to_string(),
            entry.water_intake.to_string(),
            entry
                .summary
                .as_ref()
                .map(|s| s.score.to_string())
                .unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::daily_entry::{DailySummary, Mood};

    fn entry(y: i32, m: u32, d: u32) -> DailyEntry {
        DailyEntry::blank(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_weekly_grouping_and_averages() {
        // 2024-01-01 is a Monday; the 8th starts the next ISO week
        let mut mon = entry(2024, 1, 1);
        mon.weight = Some(70.0);
        mon.pain_level = 2;
        mon.water_intake = 8.0;
        mon.summary = Some(DailySummary {
            message: "nice".into(),
            score: 75,
        });

        let mut wed = entry(2024, 1, 3);
        wed.pain_level = 4;
        wed.water_intake = 5.0;

        let next = entry(2024, 1, 8);

        let trends = weekly_trends(&[wed, next, mon]);
        assert_eq!(trends.len(), 2);

        let first = &trends[0];
        assert_eq!((first.iso_year, first.iso_week), (2024, 1));
        assert_eq!(first.week_start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.entries, 2);
        assert_eq!(first.avg_weight, Some(70.0));
        assert_eq!(first.avg_pain, 3.0);
        assert_eq!(first.avg_water, 6.5);
        assert_eq!(first.avg_score, Some(75.0));

        assert_eq!(trends[1].iso_week, 2);
        assert_eq!(trends[1].avg_weight, None);
        assert_eq!(trends[1].avg_score, None);
    }

    #[test]
    fn test_year_boundary_uses_iso_year() {
        // 2024-12-30 belongs to ISO week 1 of 2025
        let trends = weekly_trends(&[entry(2024, 12, 30), entry(2025, 1, 2)]);
        assert_eq!(trends.len(), 1);
        assert_eq!((trends[0].iso_year, trends[0].iso_week), (2025, 1));
    }

    #[test]
    fn test_csv_export() {
        let mut later = entry(2024, 2, 2);
        later.mood = Some(Mood::Calm);
        later.weight = Some(68.5);
        later.water_intake = 7.5;
        later.summary = Some(DailySummary {
            message: "ok".into(),
            score: 50,
        });
        let earlier = entry(2024, 2, 1);

        let csv = write_csv(&[later, earlier]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,weight,mood,pain,fatigue,water,score");
        assert_eq!(lines[1], "2024-02-01,,,5,5,0,");
        assert_eq!(lines[2], "2024-02-02,68.5,calm,5,5,7.5,50");
    }
}
