use crate::models::{
    Arrival, ArrivalTags, AxisRange, DayCount, DayOfWeek, DaySummary, WeekdayCount,
    WeeklySummary,
};
use crate::tagging::{tag_timestamp, LocalZone};
use chrono::{Datelike, Days, Duration, NaiveDate, TimeDelta};
use std::collections::BTreeMap;

const EMPTY_AXIS: (f64, f64) = (0.0, 6.0);
const MIN_AXIS_SPAN: f64 = 4.0;

/// Weekly summary `offset` whole weeks from the current week, or `None` when
/// the offset lands outside the representable calendar.
pub fn build_week(arrivals: &[Arrival], offset: i64, zone: LocalZone) -> Option<WeeklySummary> {
    build_week_at(zone.today(), offset, arrivals, zone)
}

pub fn build_week_at(
    today: NaiveDate,
    offset: i64,
    arrivals: &[Arrival],
    zone: LocalZone,
) -> Option<WeeklySummary> {
    let start = week_start(today).checked_add_signed(TimeDelta::try_weeks(offset)?)?;
    let end = start.checked_add_days(Days::new(6))?;

    let mut per_day: [Vec<&Arrival>; 7] = Default::default();
    for arrival in arrivals {
        let date = zone.local_date(arrival.timestamp);
        if date >= start && date <= end {
            per_day[(date - start).num_days() as usize].push(arrival);
        }
    }

    let days: Vec<DaySummary> = per_day
        .iter()
        .enumerate()
        .map(|(index, items)| summarize_day(start + Duration::days(index as i64), items, zone))
        .collect();

    let peaks: Vec<u32> = days.iter().filter_map(|day| day.peak_hour).collect();

    Some(WeeklySummary {
        offset,
        start_date: start,
        end_date: end,
        has_arrivals: days.iter().any(|day| day.count > 0),
        average_peak_hour: average_hour(&peaks),
        y_axis: axis_range(&peaks),
        days,
    })
}

/// Summarizes one calendar day. Ties on peak hour and dominant tag go to the
/// value seen first in `items`.
pub fn summarize_day(date: NaiveDate, items: &[&Arrival], zone: LocalZone) -> DaySummary {
    let tags: Vec<ArrivalTags> = items.iter().map(|arrival| tags_of(arrival, zone)).collect();
    let day = DayOfWeek::from(date.weekday());

    DaySummary {
        day,
        short_day: day.short(),
        date,
        count: items.len(),
        peak_hour: most_frequent(tags.iter().map(|tags| tags.arrival_time)),
        time_tag: most_frequent(tags.iter().map(|tags| tags.time_tag)),
    }
}

/// Partitions arrivals by local calendar date.
pub fn group_by_day(arrivals: &[Arrival], zone: LocalZone) -> BTreeMap<NaiveDate, Vec<&Arrival>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&Arrival>> = BTreeMap::new();
    for arrival in arrivals {
        groups
            .entry(zone.local_date(arrival.timestamp))
            .or_default()
            .push(arrival);
    }
    groups
}

/// Arrival counts per local day, newest day first.
pub fn count_by_day(arrivals: &[Arrival], zone: LocalZone) -> Vec<DayCount> {
    group_by_day(arrivals, zone)
        .into_iter()
        .rev()
        .map(|(day, items)| DayCount {
            day,
            count: items.len(),
        })
        .collect()
}

/// Arrival counts per weekday across all records, Monday first.
pub fn count_by_weekday(arrivals: &[Arrival], zone: LocalZone) -> Vec<WeekdayCount> {
    let mut counts = [0usize; 7];
    for arrival in arrivals {
        let day = tags_of(arrival, zone).day_of_week;
        counts[day as usize] += 1;
    }

    DayOfWeek::ALL
        .into_iter()
        .zip(counts)
        .map(|(day, count)| WeekdayCount { day, count })
        .collect()
}

pub fn average_hour(hours: &[u32]) -> Option<f64> {
    if hours.is_empty() {
        return None;
    }
    let total: u32 = hours.iter().sum();
    let mean = f64::from(total) / hours.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Y-axis range and hour ticks for a chart of peak hours.
pub fn axis_range(hours: &[u32]) -> AxisRange {
    let (min, max) = match (hours.iter().min(), hours.iter().max()) {
        (Some(&lowest), Some(&highest)) => {
            let (lowest, highest) = (f64::from(lowest), f64::from(highest));
            let padding = (highest - lowest) * 0.2;
            let min = (lowest - padding).max(0.0);
            let max = (highest + padding).min(24.0);
            if max - min < MIN_AXIS_SPAN {
                let center = (min + max) / 2.0;
                let half = MIN_AXIS_SPAN / 2.0;
                ((center - half).max(0.0), (center + half).min(24.0))
            } else {
                (min, max)
            }
        }
        _ => EMPTY_AXIS,
    };

    AxisRange {
        min,
        max,
        ticks: axis_ticks(min, max),
    }
}

fn axis_ticks(min: f64, max: f64) -> Vec<i32> {
    let step = if max - min > 8.0 { 2 } else { 1 };
    let ticks: Vec<i32> = (min.floor() as i32..=max.ceil() as i32)
        .step_by(step)
        .filter(|hour| (0..=24).contains(hour))
        .collect();

    if ticks.len() < 3 {
        let center = (min + max) / 2.0;
        return vec![
            (center - 1.0).floor() as i32,
            center.floor() as i32,
            (center + 1.0).floor() as i32,
        ];
    }
    ticks
}

fn most_frequent<T: PartialEq + Copy>(values: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

fn tags_of(arrival: &Arrival, zone: LocalZone) -> ArrivalTags {
    arrival
        .stored_tags()
        .unwrap_or_else(|| tag_timestamp(arrival.timestamp, zone))
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
