use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{GlobalCategory, ProgramSlug, ResourceId},
    protocol::{FileDescriptor, GroupedResources, ProgramSummary},
};
use tokio::sync::{Mutex, Notify};

use crate::catalog::CatalogClient;

pub(crate) fn file(path: &str, title: &str, url: Option<&str>, mime_type: Option<&str>) -> FileDescriptor {
    FileDescriptor {
        path: ResourceId::new(path),
        title: title.to_string(),
        url: url.map(str::to_string),
        mime_type: mime_type.map(str::to_string),
    }
}

pub(crate) fn pdf(path: &str, title: &str) -> FileDescriptor {
    file(
        path,
        title,
        Some(&format!("https://cdn.test/{path}")),
        Some("application/pdf"),
    )
}

/// Holds the first fetch that reaches it until `open` is called. Later
/// fetches pass straight through.
#[derive(Default)]
pub(crate) struct Gate {
    used: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl Gate {
    async fn pass(&self) {
        if self.used.swap(true, Ordering::SeqCst) {
            return;
        }
        self.entered.notify_one();
        self.release.notified().await;
    }

    pub(crate) async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn open(&self) {
        self.release.notify_one();
    }
}

#[derive(Default)]
pub(crate) struct StubCatalog {
    programs: Vec<ProgramSummary>,
    fail_directory: bool,
    grouped: HashMap<ProgramSlug, GroupedResources>,
    failing_slugs: HashSet<ProgramSlug>,
    categories: HashMap<GlobalCategory, Vec<FileDescriptor>>,
    failing_categories: HashSet<GlobalCategory>,
    category_gates: HashMap<GlobalCategory, Arc<Gate>>,
    slug_gates: HashMap<ProgramSlug, Arc<Gate>>,
    directory_calls: AtomicUsize,
    grouped_calls: Mutex<Vec<ProgramSlug>>,
    category_calls: Mutex<Vec<GlobalCategory>>,
}

impl StubCatalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_program_entry(mut self, slug: &str, name: &str, description: &str) -> Self {
        self.programs.push(ProgramSummary {
            slug: slug.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
        });
        self
    }

    pub(crate) fn with_failing_directory(mut self) -> Self {
        self.fail_directory = true;
        self
    }

    pub(crate) fn with_program(mut self, slug: ProgramSlug, grouped: GroupedResources) -> Self {
        self.grouped.insert(slug, grouped);
        self
    }

    pub(crate) fn with_failing_program(mut self, slug: ProgramSlug) -> Self {
        self.failing_slugs.insert(slug);
        self
    }

    pub(crate) fn with_category(mut self, category: GlobalCategory, files: Vec<FileDescriptor>) -> Self {
        self.categories.insert(category, files);
        self
    }

    pub(crate) fn with_failing_category(mut self, category: GlobalCategory) -> Self {
        self.failing_categories.insert(category);
        self
    }

    pub(crate) fn gate_category(&mut self, category: GlobalCategory) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.category_gates.insert(category, Arc::clone(&gate));
        gate
    }

    pub(crate) fn gate_program(&mut self, slug: ProgramSlug) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.slug_gates.insert(slug, Arc::clone(&gate));
        gate
    }

    pub(crate) fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) fn directory_calls(&self) -> usize {
        self.directory_calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn grouped_calls(&self) -> Vec<ProgramSlug> {
        self.grouped_calls.lock().await.clone()
    }

    pub(crate) async fn category_calls(&self, category: GlobalCategory) -> usize {
        self.category_calls
            .lock()
            .await
            .iter()
            .filter(|called| **called == category)
            .count()
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn list_programs(&self) -> Result<Vec<ProgramSummary>> {
        self.directory_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_directory {
            return Err(anyhow!("directory listing unavailable"));
        }
        Ok(self.programs.clone())
    }

    async fn program_resources_grouped(&self, slug: ProgramSlug) -> Result<GroupedResources> {
        self.grouped_calls.lock().await.push(slug);
        if let Some(gate) = self.slug_gates.get(&slug) {
            gate.pass().await;
        }
        if self.failing_slugs.contains(&slug) {
            return Err(anyhow!("storage listing failed for {}", slug.as_str()));
        }
        Ok(self.grouped.get(&slug).cloned().unwrap_or_default())
    }

    async fn global_category(&self, category: GlobalCategory) -> Result<Vec<FileDescriptor>> {
        self.category_calls.lock().await.push(category);
        if let Some(gate) = self.category_gates.get(&category) {
            gate.pass().await;
        }
        if self.failing_categories.contains(&category) {
            return Err(anyhow!("storage listing failed for {}", category.catalog_key()));
        }
        Ok(self.categories.get(&category).cloned().unwrap_or_default())
    }
}
