use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeTag {
    Fast,
    Late,
    VeryLate,
}

impl TimeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeTag::Fast => "fast",
            TimeTag::Late => "late",
            TimeTag::VeryLate => "very_late",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fast" => Some(TimeTag::Fast),
            "late" => Some(TimeTag::Late),
            "very_late" => Some(TimeTag::VeryLate),
            _ => None,
        }
    }
}

impl fmt::Display for TimeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// English weekday name as stored on an arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    pub fn short(self) -> &'static str {
        &self.as_str()[..3]
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.as_str() == value)
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalTags {
    pub arrival_time: u32,
    pub time_tag: TimeTag,
    pub day_of_week: DayOfWeek,
}

/// A logged arrival. The derived fields are optional only so that records
/// written before tagging existed still load; every write fills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrival {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_tag: Option<TimeTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<DayOfWeek>,
}

impl Arrival {
    pub fn stored_tags(&self) -> Option<ArrivalTags> {
        Some(ArrivalTags {
            arrival_time: self.arrival_time?,
            time_tag: self.time_tag?,
            day_of_week: self.day_of_week?,
        })
    }

    pub fn apply_tags(&mut self, tags: ArrivalTags) {
        self.arrival_time = Some(tags.arrival_time);
        self.time_tag = Some(tags.time_tag);
        self.day_of_week = Some(tags.day_of_week);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub arrivals: Vec<Arrival>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArrivalRequest {
    pub timestamp: Option<String>,
    pub note: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
    pub time_tag: Option<String>,
    pub day_of_week: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ArrivalResponse {
    pub success: bool,
    pub arrival: Arrival,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub arrivals: Vec<Arrival>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateResponse {
    pub success: bool,
    pub message: String,
    pub updated_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub day: DayOfWeek,
    pub short_day: &'static str,
    pub date: NaiveDate,
    pub count: usize,
    pub peak_hour: Option<u32>,
    pub time_tag: Option<TimeTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub offset: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<DaySummary>,
    pub has_arrivals: bool,
    pub average_peak_hour: Option<f64>,
    pub y_axis: AxisRange,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DailyCountsResponse {
    pub success: bool,
    pub days: Vec<DayCount>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WeekdayCount {
    pub day: DayOfWeek,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct WeekdayCountsResponse {
    pub success: bool,
    pub weekdays: Vec<WeekdayCount>,
}
