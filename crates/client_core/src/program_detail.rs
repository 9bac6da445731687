//! Program detail page: header, four resource groups and a `tab` query
//! parameter that selects which group is shown.

use std::sync::Arc;

use shared::{
    domain::{ProgramGroup, ProgramSlug},
    protocol::{GroupedResources, ProgramHeader},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    catalog::CatalogClient,
    error::{LoadError, LoadTarget},
    query::{with_query_param, ProgramTab, QueryUpdate, TAB_PARAM},
    render::GroupView,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailStatus {
    Idle,
    Loading { ticket: u64 },
    Ready,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabContent {
    Overview(Vec<(ProgramGroup, usize)>),
    Group(ProgramGroup, GroupView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDetailView {
    pub slug: String,
    pub header: ProgramHeader,
    pub active_tab: ProgramTab,
    pub loading: bool,
    pub error: Option<String>,
    pub counts: Vec<(ProgramGroup, usize)>,
    pub content: Option<TabContent>,
}

struct ProgramDetailState {
    mounted: bool,
    generation: u64,
    slug: String,
    query: String,
    header: ProgramHeader,
    groups: GroupedResources,
    status: DetailStatus,
}

impl ProgramDetailState {
    fn counts(&self) -> Vec<(ProgramGroup, usize)> {
        ProgramGroup::ALL
            .into_iter()
            .map(|group| (group, self.groups.group(group).len()))
            .collect()
    }
}

pub struct ProgramDetail {
    catalog: Arc<dyn CatalogClient>,
    inner: Mutex<ProgramDetailState>,
}

impl ProgramDetail {
    pub fn mount(catalog: Arc<dyn CatalogClient>, slug: &str, query: &str) -> Arc<Self> {
        debug!(slug, "mounting program detail");
        Arc::new(Self {
            catalog,
            inner: Mutex::new(ProgramDetailState {
                mounted: true,
                generation: 0,
                slug: slug.to_string(),
                query: query.strip_prefix('?').unwrap_or(query).to_string(),
                header: ProgramHeader::from_slug(slug),
                groups: GroupedResources::default(),
                status: DetailStatus::Idle,
            }),
        })
    }

    /// Loads header and groups for the current slug. The header lookup never
    /// fails the load; it falls back to the slug. Groups are fetched once per
    /// slug.
    pub async fn load(&self) -> Result<(), LoadError> {
        let (slug, ticket) = {
            let mut guard = self.inner.lock().await;
            if !guard.mounted {
                return Ok(());
            }
            let ticket = guard.generation;
            match guard.status {
                DetailStatus::Ready => return Ok(()),
                DetailStatus::Loading { ticket: running } if running == ticket => return Ok(()),
                _ => {}
            }
            guard.status = DetailStatus::Loading { ticket };
            (guard.slug.clone(), ticket)
        };

        let header = async {
            match self.catalog.list_programs().await {
                Ok(directory) => ProgramHeader::from_directory(&slug, &directory),
                Err(err) => {
                    warn!(slug = %slug, "program directory lookup failed, using slug as name: {err:#}");
                    ProgramHeader::from_slug(&slug)
                }
            }
        };
        let groups = async {
            let Some(known) = ProgramSlug::parse(&slug) else {
                return Err(LoadError::ProgramNotFound { slug: slug.clone() });
            };
            self.catalog
                .program_resources_grouped(known)
                .await
                .map_err(|err| LoadError::fetch(LoadTarget::ProgramResources(known), err))
        };
        let (header, groups) = futures::join!(header, groups);

        let mut guard = self.inner.lock().await;
        if !guard.mounted || guard.generation != ticket {
            debug!(slug = %slug, ticket, "discarding stale program detail result");
            return Ok(());
        }
        guard.header = header;
        match groups {
            Ok(groups) => {
                info!(slug = %slug, total = groups.total(), "program resources loaded");
                guard.groups = groups;
                guard.status = DetailStatus::Ready;
                Ok(())
            }
            Err(err) => {
                warn!(slug = %slug, "program detail load failed: {err}");
                guard.groups = GroupedResources::default();
                guard.status = DetailStatus::Failed {
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Routes to another program. Anything loaded for the previous slug is
    /// dropped and in-flight results for it are discarded.
    pub async fn change_slug(&self, slug: &str) -> Result<(), LoadError> {
        {
            let mut guard = self.inner.lock().await;
            if !guard.mounted {
                return Ok(());
            }
            if guard.slug != slug {
                guard.generation += 1;
                guard.slug = slug.to_string();
                guard.header = ProgramHeader::from_slug(slug);
                guard.groups = GroupedResources::default();
                guard.status = DetailStatus::Idle;
            }
        }
        self.load().await
    }

    /// Writes `tab` into the location, keeping other parameters.
    pub async fn select_tab(&self, tab: ProgramTab) -> QueryUpdate {
        let mut guard = self.inner.lock().await;
        let query = with_query_param(&guard.query, TAB_PARAM, Some(tab.as_str()));
        guard.query = query.clone();
        QueryUpdate::replace(query)
    }

    pub async fn on_url_changed(&self, query: &str) {
        let mut guard = self.inner.lock().await;
        guard.query = query.strip_prefix('?').unwrap_or(query).to_string();
    }

    /// Read from the location on every call; there is no separate tab state.
    pub async fn active_tab(&self) -> ProgramTab {
        ProgramTab::from_query(&self.inner.lock().await.query)
    }

    pub async fn query(&self) -> String {
        self.inner.lock().await.query.clone()
    }

    pub async fn status(&self) -> DetailStatus {
        self.inner.lock().await.status.clone()
    }

    pub async fn group_counts(&self) -> Vec<(ProgramGroup, usize)> {
        self.inner.lock().await.counts()
    }

    pub async fn group_view(&self, group: ProgramGroup) -> GroupView {
        let guard = self.inner.lock().await;
        GroupView::build(group, guard.groups.group(group))
    }

    pub async fn view(&self) -> ProgramDetailView {
        let guard = self.inner.lock().await;
        let active_tab = ProgramTab::from_query(&guard.query);
        let counts = guard.counts();
        let (loading, error) = match &guard.status {
            DetailStatus::Loading { .. } => (true, None),
            DetailStatus::Failed { message } => (false, Some(message.clone())),
            DetailStatus::Idle | DetailStatus::Ready => (false, None),
        };
        let content = match (&guard.status, active_tab.group()) {
            (DetailStatus::Ready, None) => Some(TabContent::Overview(counts.clone())),
            (DetailStatus::Ready, Some(group)) => Some(TabContent::Group(
                group,
                GroupView::build(group, guard.groups.group(group)),
            )),
            _ => None,
        };
        ProgramDetailView {
            slug: guard.slug.clone(),
            header: guard.header.clone(),
            active_tab,
            loading,
            error,
            counts,
            content,
        }
    }

    /// A load still running when the page goes away no longer counts as loading.
    pub async fn unmount(&self) {
        let mut guard = self.inner.lock().await;
        guard.mounted = false;
        guard.generation += 1;
        if matches!(guard.status, DetailStatus::Loading { .. }) {
            guard.status = DetailStatus::Idle;
        }
    }
}

#[cfg(test)]
#[path = "tests/program_detail_tests.rs"]
mod tests;
