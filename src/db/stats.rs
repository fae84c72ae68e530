use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use sea_orm::*;
use std::collections::BTreeMap;

/// Window boundaries for "this month", "this year" and "recent" counts,
/// computed from the server's UTC wall clock at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindows {
    pub month_start: DateTime<Utc>,
    pub year_start: DateTime<Utc>,
    pub week_ago: DateTime<Utc>,
}

impl TimeWindows {
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            month_start: midnight(now.year(), now.month(), 1).unwrap_or(now),
            year_start: midnight(now.year(), 1, 1).unwrap_or(now),
            week_ago: now - Duration::days(7),
        }
    }
}

fn midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// `SELECT column, COUNT(column) ... GROUP BY column` over a text column.
pub async fn grouped_counts<E, C>(
    db: &C,
    column: E::Column,
) -> Result<Vec<(Option<String>, u64)>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let rows: Vec<(Option<String>, i64)> = E::find()
        .select_only()
        .column(column)
        .column_as(column.count(), "count")
        .group_by(column)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(key, count)| (key, u64::try_from(count).unwrap_or(0)))
        .collect())
}

/// Flat `{VALUE: count}` map with every variant of `A` present.
pub fn enum_breakdown<A>(rows: &[(Option<String>, u64)]) -> BTreeMap<String, u64>
where
    A: ActiveEnum<Value = String>,
{
    let mut map: BTreeMap<String, u64> = A::iter().map(|v| (v.to_value(), 0)).collect();
    for (key, count) in rows {
        if let Some(slot) = key.as_ref().and_then(|k| map.get_mut(k)) {
            *slot += count;
        }
    }
    map
}

/// `[{<label>: key, count}]` sorted by count, largest first. Null keys are
/// reported as "unspecified".
pub fn distribution(rows: Vec<(Option<String>, u64)>, label: &str) -> Vec<serde_json::Value> {
    let mut merged: BTreeMap<String, u64> = BTreeMap::new();
    for (key, count) in rows {
        let key = key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| "unspecified".to_string());
        *merged.entry(key).or_default() += count;
    }

    let mut entries: Vec<(String, u64)> = merged.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    entries
        .into_iter()
        .map(|(key, count)| serde_json::json!({ label: key, "count": count }))
        .collect()
}

/// Average rounded to one decimal place; 0 when there is nothing to average.
pub fn average(sum: i64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    ((sum as f64 / count as f64) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form_submissions::FormStatus;
    use chrono::TimeZone;

    #[test]
    fn windows_start_at_month_and_year_boundaries() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 14, 30, 0).unwrap();
        let w = TimeWindows::at(now);
        assert_eq!(w.month_start, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
        assert_eq!(w.year_start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(w.week_ago, Utc.with_ymd_and_hms(2026, 10, 10, 14, 30, 0).unwrap());
    }

    #[test]
    fn breakdown_fills_missing_variants_with_zero() {
        let rows = vec![(Some("NEW".to_string()), 3), (Some("ARCHIVED".to_string()), 1)];
        let map = enum_breakdown::<FormStatus>(&rows);
        assert_eq!(map.len(), 5);
        assert_eq!(map["NEW"], 3);
        assert_eq!(map["IN_PROGRESS"], 0);
        assert_eq!(map["ARCHIVED"], 1);
    }

    #[test]
    fn distribution_sorts_and_labels() {
        let rows = vec![
            (Some("plumbing".to_string()), 2),
            (None, 1),
            (Some("electrical".to_string()), 5),
        ];
        let out = distribution(rows, "category");
        assert_eq!(out[0], serde_json::json!({"category": "electrical", "count": 5}));
        assert_eq!(out[2], serde_json::json!({"category": "unspecified", "count": 1}));
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(average(14, 3), 4.7);
        assert_eq!(average(0, 0), 0.0);
    }
}
