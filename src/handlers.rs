use crate::errors::AppError;
use crate::export::{to_csv, EXPORT_LIMIT};
use crate::models::{
    Arrival, ArrivalRequest, ArrivalResponse, DailyCountsResponse, DayOfWeek, DeleteResponse,
    ListQuery, ListResponse, MigrateResponse, TimeTag, WeekQuery, WeekdayCountsResponse,
    WeeklySummary,
};
use crate::state::AppState;
use crate::stats::{build_week, count_by_day, count_by_weekday};
use crate::storage::ArrivalFilter;
use crate::tagging::{parse_range_bound, parse_timestamp, tag_timestamp, LocalZone};
use crate::ui::render_index;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

const NOTE_MAX_CHARS: usize = 500;
const SOURCE_MAX_CHARS: usize = 50;
const DEFAULT_LIST_LIMIT: i64 = 200;
const MAX_LIST_LIMIT: i64 = 500;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = state.zone.today();
    let zone = state.zone;
    let count = state
        .store
        .read(|arrivals| {
            arrivals
                .iter()
                .filter(|arrival| zone.local_date(arrival.timestamp) == today)
                .count()
        })
        .await;
    Html(render_index(&today.to_string(), count))
}

pub async fn create_arrival(
    State(state): State<AppState>,
    payload: Result<Json<ArrivalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ArrivalResponse>), AppError> {
    let Json(payload) = payload?;
    let explicit = explicit_timestamp(&payload);
    let timestamp = resolve_timestamp(explicit, state.zone)?;
    let default_source = if explicit.is_some() { "manual" } else { "fast" };

    let mut arrival = Arrival {
        id: Uuid::new_v4(),
        timestamp,
        note: payload.note.map(|note| truncate_chars(&note, NOTE_MAX_CHARS)),
        source: Some(clean_source(payload.source, default_source)),
        arrival_time: None,
        time_tag: None,
        day_of_week: None,
    };
    arrival.apply_tags(tag_timestamp(timestamp, state.zone));

    let arrival = state.store.insert(arrival).await.inspect_err(|err| {
        error!("failed to store arrival: {err}");
    })?;
    state.invalidate_lists().await;

    info!(id = %arrival.id, timestamp = %arrival.timestamp, "recorded arrival");
    Ok((
        StatusCode::CREATED,
        Json(ArrivalResponse {
            success: true,
            arrival,
        }),
    ))
}

pub async fn list_arrivals(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError> {
    let Query(query) = query?;
    let filter = list_filter(&query, state.zone)?;
    let key = filter.cache_key();
    // Taken before the query so a write landing mid-query discards our result.
    let version = state.cache.version().await;

    if let Some(arrivals) = state.cache.get::<Vec<Arrival>>(&key).await {
        return Ok(Json(ListResponse {
            success: true,
            arrivals,
        }));
    }

    let arrivals = state.store.query(&filter).await;
    state.cache.set_at(version, &key, &arrivals).await;

    Ok(Json(ListResponse {
        success: true,
        arrivals,
    }))
}

pub async fn update_arrival(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ArrivalRequest>, JsonRejection>,
) -> Result<Json<ArrivalResponse>, AppError> {
    let Json(payload) = payload?;
    let id = parse_id(&id)?;
    let timestamp = resolve_timestamp(explicit_timestamp(&payload), state.zone)?;
    let tags = tag_timestamp(timestamp, state.zone);
    let note = payload.note.map(|note| truncate_chars(&note, NOTE_MAX_CHARS));
    let source = clean_source(payload.source, "manual");

    let arrival = state
        .store
        .update(id, |arrival| {
            arrival.timestamp = timestamp;
            arrival.note = note;
            arrival.source = Some(source);
            arrival.apply_tags(tags);
        })
        .await?;
    state.invalidate_lists().await;

    info!(id = %arrival.id, timestamp = %arrival.timestamp, "updated arrival");
    Ok(Json(ArrivalResponse {
        success: true,
        arrival,
    }))
}

pub async fn delete_arrival(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id(&id)?;
    state.store.delete(id).await?;
    state.invalidate_lists().await;

    info!(%id, "deleted arrival");
    Ok(Json(DeleteResponse { success: true }))
}

pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let arrivals = state.store.query(&ArrivalFilter::recent(EXPORT_LIMIT)).await;
    let csv = to_csv(&arrivals).map_err(AppError::internal)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"arrivals.csv\"",
            ),
        ],
        csv,
    ))
}

pub async fn weekly_stats(
    State(state): State<AppState>,
    query: Result<Query<WeekQuery>, QueryRejection>,
) -> Result<Json<WeeklySummary>, AppError> {
    let Query(query) = query?;
    let offset = query.offset.unwrap_or(0);
    let zone = state.zone;
    state
        .store
        .read(|arrivals| build_week(arrivals, offset, zone))
        .await
        .map(Json)
        .ok_or_else(|| AppError::bad_request("Invalid offset"))
}

pub async fn daily_counts(State(state): State<AppState>) -> Json<DailyCountsResponse> {
    let zone = state.zone;
    let days = state
        .store
        .read(|arrivals| count_by_day(arrivals, zone))
        .await;
    Json(DailyCountsResponse {
        success: true,
        days,
    })
}

pub async fn weekday_counts(State(state): State<AppState>) -> Json<WeekdayCountsResponse> {
    let zone = state.zone;
    let weekdays = state
        .store
        .read(|arrivals| count_by_weekday(arrivals, zone))
        .await;
    Json(WeekdayCountsResponse {
        success: true,
        weekdays,
    })
}

pub async fn migrate(State(state): State<AppState>) -> Result<Json<MigrateResponse>, AppError> {
    let updated_count = state.store.backfill_tags(state.zone).await?;
    if updated_count > 0 {
        state.invalidate_lists().await;
    }

    info!(updated_count, "backfilled arrival tags");
    Ok(Json(MigrateResponse {
        success: true,
        message: format!("Updated {updated_count} records with time tags"),
        updated_count,
    }))
}

fn list_filter(query: &ListQuery, zone: LocalZone) -> Result<ArrivalFilter, AppError> {
    let from = non_empty(query.from.as_deref())
        .map(|value| {
            parse_range_bound(value, zone).ok_or_else(|| AppError::bad_request("Invalid from date"))
        })
        .transpose()?;
    let to = non_empty(query.to.as_deref())
        .map(|value| {
            parse_range_bound(value, zone).ok_or_else(|| AppError::bad_request("Invalid to date"))
        })
        .transpose()?;

    // Unknown tag or weekday values are ignored rather than rejected.
    let time_tag = query.time_tag.as_deref().and_then(TimeTag::parse);
    let day_of_week = query.day_of_week.as_deref().and_then(DayOfWeek::parse);

    let limit = query
        .limit
        .as_deref()
        .and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|limit| *limit != 0)
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    Ok(ArrivalFilter {
        from,
        to,
        time_tag,
        day_of_week,
        limit: Some(limit as usize),
    })
}

fn explicit_timestamp(payload: &ArrivalRequest) -> Option<&str> {
    non_empty(payload.timestamp.as_deref())
}

fn resolve_timestamp(explicit: Option<&str>, zone: LocalZone) -> Result<DateTime<Utc>, AppError> {
    match explicit {
        Some(value) => parse_timestamp(value, zone).ok_or_else(AppError::invalid_timestamp),
        None => Ok(Utc::now()),
    }
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::invalid_id())
}

fn clean_source(source: Option<String>, default: &str) -> String {
    source
        .map(|source| truncate_chars(&source, SOURCE_MAX_CHARS))
        .filter(|source| !source.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
