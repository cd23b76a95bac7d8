use crate::cache::ArrivalsCache;
use crate::storage::ArrivalStore;
use crate::tagging::LocalZone;

#[derive(Clone)]
pub struct AppState {
    pub store: ArrivalStore,
    pub cache: ArrivalsCache,
    pub zone: LocalZone,
}

impl AppState {
    pub fn new(store: ArrivalStore, cache: ArrivalsCache, zone: LocalZone) -> Self {
        Self { store, cache, zone }
    }

    /// Called after every successful write so cached lists are never served
    /// past a mutation.
    pub async fn invalidate_lists(&self) {
        self.cache.bump_version().await;
    }
}
