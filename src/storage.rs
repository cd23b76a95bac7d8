use crate::errors::StoreError;
use crate::models::{AppData, Arrival, DayOfWeek, TimeTag};
use crate::tagging::{tag_timestamp, LocalZone};
use chrono::{DateTime, Utc};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex};
use tracing::{error, info};
use uuid::Uuid;

/// Arrival documents kept in memory and mirrored to a JSON file after every
/// write. The lock is held across the file write, so writers are serialized.
#[derive(Clone)]
pub struct ArrivalStore {
    path: PathBuf,
    data: Arc<Mutex<AppData>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrivalFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub time_tag: Option<TimeTag>,
    pub day_of_week: Option<DayOfWeek>,
    pub limit: Option<usize>,
}

impl ArrivalFilter {
    pub fn recent(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn matches(&self, arrival: &Arrival) -> bool {
        self.from.is_none_or(|from| arrival.timestamp >= from)
            && self.to.is_none_or(|to| arrival.timestamp <= to)
            && self.time_tag.is_none_or(|tag| arrival.time_tag == Some(tag))
            && self
                .day_of_week
                .is_none_or(|day| arrival.day_of_week == Some(day))
    }

    /// Stable key describing this filter, used as a cache key suffix.
    pub fn cache_key(&self) -> String {
        format!(
            "list:{}:{}:{}:{}:{}",
            self.from.map(|ts| ts.timestamp_millis().to_string()).unwrap_or_default(),
            self.to.map(|ts| ts.timestamp_millis().to_string()).unwrap_or_default(),
            self.time_tag.map(TimeTag::as_str).unwrap_or_default(),
            self.day_of_week.map(DayOfWeek::as_str).unwrap_or_default(),
            self.limit.map(|limit| limit.to_string()).unwrap_or_default(),
        )
    }
}

impl ArrivalStore {
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let data = load_data(&path).await?;
        info!(
            path = %path.display(),
            arrivals = data.arrivals.len(),
            "opened arrival store"
        );

        Ok(Self {
            path,
            data: Arc::new(Mutex::new(data)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn insert(&self, arrival: Arrival) -> Result<Arrival, StoreError> {
        let mut data = self.data.lock().await;
        data.arrivals.push(arrival.clone());

        if let Err(err) = persist_data(&self.path, &data).await {
            data.arrivals.pop();
            return Err(err);
        }
        Ok(arrival)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arrival> {
        let data = self.data.lock().await;
        data.arrivals.iter().find(|arrival| arrival.id == id).cloned()
    }

    /// Applies `change` to the arrival with `id` and persists the result.
    pub async fn update<F>(&self, id: Uuid, change: F) -> Result<Arrival, StoreError>
    where
        F: FnOnce(&mut Arrival),
    {
        let mut data = self.data.lock().await;
        let index = data
            .arrivals
            .iter()
            .position(|arrival| arrival.id == id)
            .ok_or(StoreError::NotFound)?;

        let previous = data.arrivals[index].clone();
        change(&mut data.arrivals[index]);
        let updated = data.arrivals[index].clone();

        if let Err(err) = persist_data(&self.path, &data).await {
            data.arrivals[index] = previous;
            return Err(err);
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        let index = data
            .arrivals
            .iter()
            .position(|arrival| arrival.id == id)
            .ok_or(StoreError::NotFound)?;

        let removed = data.arrivals.remove(index);
        if let Err(err) = persist_data(&self.path, &data).await {
            data.arrivals.insert(index, removed);
            return Err(err);
        }
        Ok(())
    }

    /// Matching arrivals, newest first.
    pub async fn query(&self, filter: &ArrivalFilter) -> Vec<Arrival> {
        let data = self.data.lock().await;
        let mut matches: Vec<Arrival> = data
            .arrivals
            .iter()
            .filter(|arrival| filter.matches(arrival))
            .cloned()
            .collect();
        drop(data);

        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = filter.limit {
            matches.truncate(limit);
        }
        matches
    }

    pub async fn read<R>(&self, reader: impl FnOnce(&[Arrival]) -> R) -> R {
        let data = self.data.lock().await;
        reader(&data.arrivals)
    }

    /// Fills in derived fields for records that predate tagging. Returns the
    /// number of records changed.
    pub async fn backfill_tags(&self, zone: LocalZone) -> Result<usize, StoreError> {
        let mut data = self.data.lock().await;
        let previous = data.arrivals.clone();

        let mut updated = 0;
        for arrival in data
            .arrivals
            .iter_mut()
            .filter(|arrival| arrival.stored_tags().is_none())
        {
            arrival.apply_tags(tag_timestamp(arrival.timestamp, zone));
            updated += 1;
        }

        if updated > 0 {
            if let Err(err) = persist_data(&self.path, &data).await {
                data.arrivals = previous;
                return Err(err);
            }
        }
        Ok(updated)
    }
}

/// Reads the data file. A missing file is an empty store; an unreadable or
/// unparseable one is an error, so the next write cannot overwrite it.
pub async fn load_data(path: &Path) -> Result<AppData, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
            error!(path = %path.display(), "failed to parse data file: {err}");
            StoreError::Serialize(err)
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(AppData::default()),
        Err(err) => {
            error!(path = %path.display(), "failed to read data file: {err}");
            Err(StoreError::Io(err))
        }
    }
}

async fn persist_data(path: &Path, data: &AppData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
