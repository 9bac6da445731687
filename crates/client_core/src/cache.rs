//! Per-page resource cache. Each key is filled at most once for the life of
//! the owning page; later selections of a loaded key are pure reads.

use std::collections::HashMap;

use shared::domain::GlobalCategory;

use crate::{error::CacheError, query::FilterKey, selectors::ResultItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Global(GlobalCategory),
    /// Files of every known program, merged.
    Programs,
}

impl CacheKey {
    /// Cache entry a filter needs populated. `All` only reads what other
    /// selections already loaded.
    pub fn for_filter(filter: FilterKey) -> Option<Self> {
        match filter {
            FilterKey::All => None,
            FilterKey::Program | FilterKey::Videos => Some(CacheKey::Programs),
            FilterKey::Handouts | FilterKey::Clinical | FilterKey::Billing => {
                filter.global_category().map(CacheKey::Global)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading {
        ticket: u64,
    },
    Loaded,
    Failed {
        message: String,
    },
}

#[derive(Debug, Default)]
struct CacheEntry {
    state: LoadState,
    items: Vec<ResultItem>,
}

#[derive(Debug, Default)]
pub struct ResourceCache {
    entries: HashMap<CacheKey, CacheEntry>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` as already loaded.
    pub fn with_loaded(mut self, key: CacheKey, items: Vec<ResultItem>) -> Self {
        self.entries.insert(
            key,
            CacheEntry {
                state: LoadState::Loaded,
                items,
            },
        );
        self
    }

    pub fn state(&self, key: CacheKey) -> LoadState {
        self.entries
            .get(&key)
            .map(|entry| entry.state.clone())
            .unwrap_or_default()
    }

    pub fn is_loaded(&self, key: CacheKey) -> bool {
        matches!(self.state(key), LoadState::Loaded)
    }

    /// Items of `key`; empty until it has loaded.
    pub fn items(&self, key: CacheKey) -> &[ResultItem] {
        self.entries
            .get(&key)
            .map(|entry| entry.items.as_slice())
            .unwrap_or_default()
    }

    /// True unless `key` is loaded or already loading under `current_ticket`.
    pub fn needs_fetch(&self, key: CacheKey, current_ticket: u64) -> bool {
        match self.state(key) {
            LoadState::Loaded => false,
            LoadState::Loading { ticket } => ticket != current_ticket,
            LoadState::Unloaded | LoadState::Failed { .. } => true,
        }
    }

    pub fn begin(&mut self, key: CacheKey, ticket: u64) -> Result<(), CacheError> {
        let entry = self.entries.entry(key).or_default();
        if entry.state == LoadState::Loaded {
            return Err(CacheError::AlreadyLoaded(key));
        }
        entry.state = LoadState::Loading { ticket };
        Ok(())
    }

    pub fn complete(
        &mut self,
        key: CacheKey,
        ticket: u64,
        items: Vec<ResultItem>,
    ) -> Result<(), CacheError> {
        let entry = self.entries.entry(key).or_default();
        match entry.state {
            LoadState::Loaded => Err(CacheError::AlreadyLoaded(key)),
            LoadState::Loading { ticket: current } if current == ticket => {
                entry.items = items;
                entry.state = LoadState::Loaded;
                Ok(())
            }
            _ => Err(CacheError::TicketMismatch { key, ticket }),
        }
    }

    /// Marks the attempt failed; items already held are left in place.
    pub fn fail(&mut self, key: CacheKey, ticket: u64, message: String) -> Result<(), CacheError> {
        let entry = self.entries.entry(key).or_default();
        match entry.state {
            LoadState::Loaded => Err(CacheError::AlreadyLoaded(key)),
            LoadState::Loading { ticket: current } if current == ticket => {
                entry.state = LoadState::Failed { message };
                Ok(())
            }
            _ => Err(CacheError::TicketMismatch { key, ticket }),
        }
    }

    /// Drops a stale attempt so the next selection fetches again. Returns
    /// false when a newer attempt or a result already owns the entry.
    pub fn abandon(&mut self, key: CacheKey, ticket: u64) -> bool {
        match self.entries.get_mut(&key) {
            Some(entry) if entry.state == (LoadState::Loading { ticket }) => {
                entry.state = LoadState::Unloaded;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::{domain::ResourceId, protocol::FileDescriptor};

    use super::*;
    use crate::selectors::{ResultItem, Source};

    fn item(path: &str) -> ResultItem {
        ResultItem::from_descriptor(
            &FileDescriptor {
                path: ResourceId::new(path),
                title: path.to_string(),
                url: None,
                mime_type: None,
            },
            Source::Global,
        )
    }

    const HANDOUTS: CacheKey = CacheKey::Global(GlobalCategory::Handouts);

    #[test]
    fn filter_to_cache_key_mapping() {
        assert_eq!(CacheKey::for_filter(FilterKey::All), None);
        assert_eq!(
            CacheKey::for_filter(FilterKey::Clinical),
            Some(CacheKey::Global(GlobalCategory::Clinical))
        );
        assert_eq!(
            CacheKey::for_filter(FilterKey::Videos),
            Some(CacheKey::Programs)
        );
        assert_eq!(
            CacheKey::for_filter(FilterKey::Program),
            Some(CacheKey::Programs)
        );
    }

    #[test]
    fn loaded_entry_is_write_once() {
        let mut cache = ResourceCache::new();
        cache.begin(HANDOUTS, 1).expect("begin");
        cache
            .complete(HANDOUTS, 1, vec![item("a.pdf")])
            .expect("complete");

        assert!(cache.is_loaded(HANDOUTS));
        assert!(!cache.needs_fetch(HANDOUTS, 7));
        assert_eq!(
            cache.begin(HANDOUTS, 2),
            Err(CacheError::AlreadyLoaded(HANDOUTS))
        );
        assert_eq!(
            cache.complete(HANDOUTS, 1, Vec::new()),
            Err(CacheError::AlreadyLoaded(HANDOUTS))
        );
        assert_eq!(cache.items(HANDOUTS).len(), 1);
    }

    #[test]
    fn completion_requires_matching_ticket() {
        let mut cache = ResourceCache::new();
        cache.begin(HANDOUTS, 3).expect("begin");
        assert_eq!(
            cache.complete(HANDOUTS, 2, vec![item("a.pdf")]),
            Err(CacheError::TicketMismatch {
                key: HANDOUTS,
                ticket: 2
            })
        );
        assert!(cache.items(HANDOUTS).is_empty());
        assert!(!cache.needs_fetch(HANDOUTS, 3));
        assert!(cache.needs_fetch(HANDOUTS, 4));
    }

    #[test]
    fn abandon_only_reverts_its_own_attempt() {
        let mut cache = ResourceCache::new();
        cache.begin(HANDOUTS, 1).expect("begin");
        cache.begin(HANDOUTS, 2).expect("restart");

        assert!(!cache.abandon(HANDOUTS, 1));
        assert_eq!(cache.state(HANDOUTS), LoadState::Loading { ticket: 2 });
        assert!(cache.abandon(HANDOUTS, 2));
        assert_eq!(cache.state(HANDOUTS), LoadState::Unloaded);
    }

    #[test]
    fn failure_is_retryable_and_keeps_items() {
        let mut cache = ResourceCache::new();
        cache.begin(CacheKey::Programs, 1).expect("begin");
        cache
            .fail(CacheKey::Programs, 1, "boom".into())
            .expect("fail");

        assert_eq!(
            cache.state(CacheKey::Programs),
            LoadState::Failed {
                message: "boom".into()
            }
        );
        assert!(cache.needs_fetch(CacheKey::Programs, 1));
        assert!(cache.items(CacheKey::Programs).is_empty());
    }

    #[test]
    fn seeded_entries_read_as_loaded() {
        let cache = ResourceCache::new().with_loaded(HANDOUTS, vec![item("seed.pdf")]);
        assert!(cache.is_loaded(HANDOUTS));
        assert_eq!(cache.items(HANDOUTS)[0].id.as_str(), "seed.pdf");
        assert_eq!(
            cache.state(CacheKey::Global(GlobalCategory::Billing)),
            LoadState::Unloaded
        );
    }
}
