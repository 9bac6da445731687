//! Resource library page: single-select filter, lazy per-filter loading and
//! free-text search over the loaded files.
//!
//! The filter is authoritative page state. Only the three global categories
//! are mirrored into `cat`; while `all`, `program` or `videos` is active,
//! incoming URL changes are ignored so that a location without `cat` can not
//! silently replace the selection.
//!
//! Every change of the active filter (and unmount) advances a generation
//! counter. A fetch carries the generation it started under and its result is
//! dropped if the generation moved on before it resolved.

use std::sync::Arc;

use futures::future::try_join_all;
use shared::domain::ProgramSlug;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    cache::{CacheKey, LoadState, ResourceCache},
    catalog::CatalogClient,
    error::{LoadError, LoadTarget},
    query::{project_filter, FilterKey, QueryUpdate},
    render::{rows, ResultRow},
    selectors::{aggregate_program_files, apply_search, display_items, global_items, ResultItem},
};

/// What a filter change or refresh did about data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// URL change did not affect the filter.
    Ignored,
    /// The active filter reads only already-loaded caches.
    NotRequired,
    CacheHit,
    /// A fetch for the active filter is already running.
    InFlight,
    Fetched,
    /// The result arrived after the filter changed or the page unmounted.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryView {
    pub filter: FilterKey,
    pub search: String,
    pub loading: bool,
    pub error: Option<String>,
    pub items: Vec<ResultItem>,
    pub rows: Vec<ResultRow>,
}

struct LibraryState {
    mounted: bool,
    generation: u64,
    filter: FilterKey,
    search: String,
    query: String,
    cache: ResourceCache,
    error: Option<String>,
}

impl LibraryState {
    fn switch_filter(&mut self, filter: FilterKey) {
        self.filter = filter;
        self.generation += 1;
        self.error = None;
    }
}

pub struct ResourceLibrary {
    catalog: Arc<dyn CatalogClient>,
    inner: Mutex<LibraryState>,
}

impl ResourceLibrary {
    pub fn mount(catalog: Arc<dyn CatalogClient>, query: &str) -> Arc<Self> {
        Self::with_cache(catalog, ResourceCache::new(), query)
    }

    pub fn with_cache(
        catalog: Arc<dyn CatalogClient>,
        cache: ResourceCache,
        query: &str,
    ) -> Arc<Self> {
        let filter = FilterKey::from_query(query);
        debug!(%filter, "mounting resource library");
        Arc::new(Self {
            catalog,
            inner: Mutex::new(LibraryState {
                mounted: true,
                generation: 0,
                filter,
                search: String::new(),
                query: query.strip_prefix('?').unwrap_or(query).to_string(),
                cache,
                error: None,
            }),
        })
    }

    /// Makes `filter` active, projects it into `cat`, and loads what it needs.
    /// Selecting the active filter again does not restart a running fetch, but
    /// retries one that failed.
    pub async fn select_filter(&self, filter: FilterKey) -> Result<LoadOutcome, LoadError> {
        {
            let mut guard = self.inner.lock().await;
            if !guard.mounted {
                return Ok(LoadOutcome::Discarded);
            }
            if guard.filter != filter {
                guard.switch_filter(filter);
                let projected = project_filter(&guard.query, filter);
                guard.query = projected;
            }
        }
        self.refresh().await
    }

    /// Reconciles page state with a location change made outside the page.
    pub async fn on_url_changed(&self, query: &str) -> Result<LoadOutcome, LoadError> {
        {
            let mut guard = self.inner.lock().await;
            if !guard.mounted {
                return Ok(LoadOutcome::Discarded);
            }
            guard.query = query.strip_prefix('?').unwrap_or(query).to_string();
            if !guard.filter.is_url_bound() {
                debug!(filter = %guard.filter, "ignoring url change while a local-only filter is active");
                return Ok(LoadOutcome::Ignored);
            }
            let next = FilterKey::from_query(query);
            if next == guard.filter {
                return Ok(LoadOutcome::Ignored);
            }
            guard.switch_filter(next);
        }
        self.refresh().await
    }

    /// Loads whatever the active filter needs and is not cached yet.
    pub async fn refresh(&self) -> Result<LoadOutcome, LoadError> {
        let (key, ticket) = {
            let mut guard = self.inner.lock().await;
            if !guard.mounted {
                return Ok(LoadOutcome::Discarded);
            }
            let Some(key) = CacheKey::for_filter(guard.filter) else {
                return Ok(LoadOutcome::NotRequired);
            };
            let ticket = guard.generation;
            match guard.cache.state(key) {
                LoadState::Loaded => return Ok(LoadOutcome::CacheHit),
                LoadState::Loading { ticket: running } if running == ticket => {
                    return Ok(LoadOutcome::InFlight)
                }
                _ => {}
            }
            if guard.cache.begin(key, ticket).is_err() {
                return Ok(LoadOutcome::CacheHit);
            }
            guard.error = None;
            (key, ticket)
        };

        let fetched = self.fetch(key).await;

        let mut guard = self.inner.lock().await;
        if !guard.mounted || guard.generation != ticket {
            guard.cache.abandon(key, ticket);
            debug!(?key, ticket, "discarding stale library result");
            return Ok(LoadOutcome::Discarded);
        }
        match fetched {
            Ok(items) => {
                let count = items.len();
                if let Err(err) = guard.cache.complete(key, ticket, items) {
                    warn!(?key, "library cache rejected result: {err}");
                    return Ok(LoadOutcome::CacheHit);
                }
                info!(?key, count, "library cache populated");
                Ok(LoadOutcome::Fetched)
            }
            Err(err) => {
                let message = err.to_string();
                if let Err(cache_err) = guard.cache.fail(key, ticket, message.clone()) {
                    warn!(?key, "library cache rejected failure: {cache_err}");
                }
                warn!(?key, "library load failed: {message}");
                guard.error = Some(message);
                Err(err)
            }
        }
    }

    async fn fetch(&self, key: CacheKey) -> Result<Vec<ResultItem>, LoadError> {
        match key {
            CacheKey::Global(category) => {
                let descriptors = self
                    .catalog
                    .global_category(category)
                    .await
                    .map_err(|err| LoadError::fetch(LoadTarget::Category(category), err))?;
                Ok(global_items(&descriptors))
            }
            CacheKey::Programs => {
                let grouped = try_join_all(
                    ProgramSlug::ALL
                        .into_iter()
                        .map(|slug| self.catalog.program_resources_grouped(slug)),
                )
                .await
                .map_err(|err| LoadError::fetch(LoadTarget::ProgramAggregate, err))?;
                Ok(aggregate_program_files(&grouped))
            }
        }
    }

    pub async fn set_search(&self, term: &str) {
        let mut guard = self.inner.lock().await;
        guard.search = term.to_string();
    }

    pub async fn filter(&self) -> FilterKey {
        self.inner.lock().await.filter
    }

    /// Current location query as the page last wrote or saw it.
    pub async fn query(&self) -> QueryUpdate {
        QueryUpdate::replace(self.inner.lock().await.query.clone())
    }

    pub async fn load_state(&self, key: CacheKey) -> LoadState {
        self.inner.lock().await.cache.state(key)
    }

    pub async fn view(&self) -> LibraryView {
        let guard = self.inner.lock().await;
        let loading = CacheKey::for_filter(guard.filter).is_some_and(|key| {
            guard.cache.state(key)
                == LoadState::Loading {
                    ticket: guard.generation,
                }
        });
        let items = if guard.error.is_some() {
            Vec::new()
        } else {
            apply_search(display_items(guard.filter, &guard.cache), &guard.search)
        };
        LibraryView {
            filter: guard.filter,
            search: guard.search.clone(),
            loading,
            error: guard.error.clone(),
            rows: rows(&items),
            items,
        }
    }

    /// Results still in flight are dropped when they resolve.
    pub async fn unmount(&self) {
        let mut guard = self.inner.lock().await;
        guard.mounted = false;
        guard.generation += 1;
    }
}

#[cfg(test)]
#[path = "tests/library_tests.rs"]
mod tests;
