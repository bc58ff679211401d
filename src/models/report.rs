//! Condition reports and the date-bounded summary rollup

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Report model from database (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i32,
    pub uuid: Uuid,
    pub item_id: i32,
    pub reported_by: i32,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
}

/// File report request; the reporter comes from the bearer token
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReport {
    pub item_id: i32,
    #[validate(length(min = 1, message = "Remarks must not be empty"))]
    pub remarks: String,
}

/// Report joined with its item and reporter, as read for the summary
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: i32,
    pub item_id: i32,
    pub item_name: String,
    pub category_name: String,
    pub location_name: String,
    pub reporter_id: i32,
    pub reporter_name: String,
    pub reporter_email: String,
    pub reporter_section: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `GET /report/report-summary` query
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummaryQuery {
    /// RFC 3339 timestamp or YYYY-MM-DD
    pub start_date: String,
    /// RFC 3339 timestamp or YYYY-MM-DD (whole day included)
    pub end_date: String,
}

impl ReportSummaryQuery {
    /// Inclusive `[start, end]` range
    pub fn range(&self) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        let start = parse_bound(&self.start_date, false)?;
        let end = parse_bound(&self.end_date, true)?;
        if start > end {
            return Err(AppError::BadRequest(format!(
                "startDate must not be after endDate : {} > {}",
                self.start_date, self.end_date
            )));
        }
        Ok((start, end))
    }
}

fn parse_bound(raw: &str, end_of_day: bool) -> AppResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date : {}", raw)))?;
    let time = if end_of_day {
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .ok_or_else(|| AppError::Internal("Invalid time of day".to_string()))?;

    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

/// User reports query
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UserReportsQuery {
    pub page: Option<i64>,
    pub items_per_page: Option<i64>,
    /// Defaults to the caller
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct MostReportedItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct TopReporter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub section: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct MostReportedLocation {
    pub name: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub reports_generated: u64,
    pub date_range: DateRange,
    pub most_reported_item: MostReportedItem,
    pub top_reporter: TopReporter,
    /// Category name to report count, in first-seen order
    #[schema(value_type = Object)]
    pub reports_by_category: IndexMap<String, u64>,
    pub most_reported_location: MostReportedLocation,
}

impl ReportSummary {
    /// Single pass over `rows`; ties go to whichever key was seen first.
    pub fn from_rows(start: DateTime<Utc>, end: DateTime<Utc>, rows: &[ReportRow]) -> Self {
        let mut by_item: IndexMap<i32, u64> = IndexMap::new();
        let mut by_reporter: IndexMap<i32, u64> = IndexMap::new();
        let mut by_category: IndexMap<String, u64> = IndexMap::new();
        let mut by_location: IndexMap<String, u64> = IndexMap::new();

        for row in rows {
            *by_item.entry(row.item_id).or_insert(0) += 1;
            *by_reporter.entry(row.reporter_id).or_insert(0) += 1;
            *by_category.entry(row.category_name.clone()).or_insert(0) += 1;
            *by_location.entry(row.location_name.clone()).or_insert(0) += 1;
        }

        let most_reported_item = argmax(&by_item)
            .and_then(|(item_id, count)| {
                rows.iter().find(|r| r.item_id == *item_id).map(|r| MostReportedItem {
                    name: Some(r.item_name.clone()),
                    category: Some(r.category_name.clone()),
                    location: Some(r.location_name.clone()),
                    count,
                })
            })
            .unwrap_or_default();

        let top_reporter = argmax(&by_reporter)
            .and_then(|(reporter_id, count)| {
                rows.iter()
                    .find(|r| r.reporter_id == *reporter_id)
                    .map(|r| TopReporter {
                        name: Some(r.reporter_name.clone()),
                        email: Some(r.reporter_email.clone()),
                        section: r.reporter_section.clone(),
                        count,
                    })
            })
            .unwrap_or_default();

        let most_reported_location = argmax(&by_location)
            .map(|(name, count)| MostReportedLocation {
                name: Some(name.clone()),
                count,
            })
            .unwrap_or_default();

        Self {
            reports_generated: rows.len() as u64,
            date_range: DateRange { start, end },
            most_reported_item,
            top_reporter,
            reports_by_category: by_category,
            most_reported_location,
        }
    }
}

/// Key with the highest count; strict `>` keeps the earliest key on ties.
fn argmax<K>(counts: &IndexMap<K, u64>) -> Option<(&K, u64)> {
    let mut best: Option<(&K, u64)> = None;
    for (key, &count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((key, count));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, item: (i32, &str, &str, &str), reporter: (i32, &str)) -> ReportRow {
        ReportRow {
            id,
            item_id: item.0,
            item_name: item.1.to_string(),
            category_name: item.2.to_string(),
            location_name: item.3.to_string(),
            reporter_id: reporter.0,
            reporter_name: reporter.1.to_string(),
            reporter_email: format!("{}@campus.edu", reporter.1.to_lowercase()),
            reporter_section: Some("BSCS-3A".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_range_yields_zeroes() {
        let now = Utc::now();
        let summary = ReportSummary::from_rows(now, now, &[]);

        assert_eq!(summary.reports_generated, 0);
        assert_eq!(summary.most_reported_item.count, 0);
        assert!(summary.most_reported_item.name.is_none());
        assert_eq!(summary.top_reporter.count, 0);
        assert!(summary.top_reporter.email.is_none());
        assert_eq!(summary.most_reported_location.count, 0);
        assert!(summary.reports_by_category.is_empty());
    }

    #[test]
    fn test_most_reported_item_and_top_reporter() {
        let item_a = (1, "Item_A", "MOUSE", "2CL3B");
        let item_b = (2, "Item_B", "KEYBOARD", "MH5");
        let rows = vec![
            row(1, item_a, (10, "User_X")),
            row(2, item_b, (20, "User_Y")),
            row(3, item_a, (10, "User_X")),
        ];

        let now = Utc::now();
        let summary = ReportSummary::from_rows(now, now, &rows);

        assert_eq!(summary.reports_generated, 3);
        assert_eq!(summary.most_reported_item.name.as_deref(), Some("Item_A"));
        assert_eq!(summary.most_reported_item.category.as_deref(), Some("MOUSE"));
        assert_eq!(summary.most_reported_item.count, 2);
        assert_eq!(summary.top_reporter.name.as_deref(), Some("User_X"));
        assert_eq!(summary.top_reporter.count, 2);
        assert_eq!(summary.most_reported_location.name.as_deref(), Some("2CL3B"));
        assert_eq!(summary.reports_by_category.get("MOUSE"), Some(&2));
        assert_eq!(summary.reports_by_category.get("KEYBOARD"), Some(&1));
    }

    #[test]
    fn test_ties_go_to_first_seen() {
        let rows = vec![
            row(1, (2, "Item_B", "KEYBOARD", "MH5"), (20, "User_Y")),
            row(2, (1, "Item_A", "MOUSE", "2CL3B"), (10, "User_X")),
        ];

        let now = Utc::now();
        let summary = ReportSummary::from_rows(now, now, &rows);

        assert_eq!(summary.most_reported_item.name.as_deref(), Some("Item_B"));
        assert_eq!(summary.top_reporter.name.as_deref(), Some("User_Y"));
        assert_eq!(summary.most_reported_location.name.as_deref(), Some("MH5"));
        let categories: Vec<&String> = summary.reports_by_category.keys().collect();
        assert_eq!(categories, vec!["KEYBOARD", "MOUSE"]);
    }

    #[test]
    fn test_summary_range_parsing() {
        let query = ReportSummaryQuery {
            start_date: "2024-03-01".to_string(),
            end_date: "2024-03-31".to_string(),
        };
        let (start, end) = query.range().unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(end.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-31 23:59:59");
        assert_eq!(end.timestamp_subsec_micros(), 999_999);

        let query = ReportSummaryQuery {
            start_date: "2024-03-01T08:00:00+08:00".to_string(),
            end_date: "2024-03-01T09:00:00Z".to_string(),
        };
        let (start, _) = query.range().unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn test_summary_range_rejects_bad_input() {
        let reversed = ReportSummaryQuery {
            start_date: "2024-04-01".to_string(),
            end_date: "2024-03-01".to_string(),
        };
        assert!(matches!(reversed.range(), Err(AppError::BadRequest(_))));

        let garbage = ReportSummaryQuery {
            start_date: "yesterday".to_string(),
            end_date: "2024-03-01".to_string(),
        };
        assert!(matches!(garbage.range(), Err(AppError::BadRequest(_))));
    }
}
