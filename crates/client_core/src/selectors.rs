//! Pure derivation of the library's displayed list from its caches.

use std::collections::HashSet;

use shared::{
    domain::{GlobalCategory, ProgramGroup, ResourceId},
    protocol::{FileDescriptor, GroupedResources},
};

use crate::{cache::CacheKey, cache::ResourceCache, query::FilterKey};

const VIDEO_MIME_PREFIX: &str = "video/";
const VIDEO_EXTENSIONS: [&str; 6] = [".mp4", ".mov", ".m4v", ".webm", ".avi", ".mkv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Global,
    Program,
}

/// A file as the library lists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub id: ResourceId,
    pub name: String,
    pub url: Option<String>,
    pub mime_type: Option<String>,
    pub source: Source,
}

impl ResultItem {
    pub fn from_descriptor(descriptor: &FileDescriptor, source: Source) -> Self {
        let title = descriptor.title.trim();
        let name = if title.is_empty() {
            descriptor.path.file_name().to_string()
        } else {
            title.to_string()
        };
        Self {
            id: descriptor.path.clone(),
            name,
            url: non_blank(descriptor.url.as_deref()),
            mime_type: non_blank(descriptor.mime_type.as_deref()),
            source,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn global_items(descriptors: &[FileDescriptor]) -> Vec<ResultItem> {
    descriptors
        .iter()
        .map(|descriptor| ResultItem::from_descriptor(descriptor, Source::Global))
        .collect()
}

/// Flattens per-program groups into one list, first occurrence of a path wins.
pub fn aggregate_program_files(programs: &[GroupedResources]) -> Vec<ResultItem> {
    let flattened = programs.iter().flat_map(|grouped| {
        ProgramGroup::AGGREGATE_ORDER
            .into_iter()
            .flat_map(move |group| grouped.group(group).iter())
            .map(|descriptor| ResultItem::from_descriptor(descriptor, Source::Program))
    });
    dedup_by_id(flattened)
}

/// MIME types that say nothing about the content; the url decides instead.
const GENERIC_MIME_TYPES: [&str; 2] = ["application/octet-stream", "binary/octet-stream"];

fn normalized_mime(mime_type: Option<&str>) -> Option<String> {
    mime_type
        .map(|mime| mime.trim().to_ascii_lowercase())
        .filter(|mime| !mime.is_empty())
}

/// Query string and fragment are not part of the file name.
fn url_has_video_extension(url: Option<&str>) -> bool {
    let Some(url) = url else {
        return false;
    };
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let lowered = path.to_ascii_lowercase();
    VIDEO_EXTENSIONS
        .iter()
        .any(|extension| lowered.ends_with(extension))
}

/// A declared specific MIME type is trusted. The url extension is only
/// consulted when the type is missing or generic.
pub fn is_video(item: &ResultItem) -> bool {
    match normalized_mime(item.mime_type.as_deref()) {
        Some(mime) if mime.starts_with(VIDEO_MIME_PREFIX) => true,
        Some(mime) if !GENERIC_MIME_TYPES.contains(&mime.as_str()) => false,
        _ => url_has_video_extension(item.url.as_deref()),
    }
}

pub fn dedup_by_id(items: impl IntoIterator<Item = ResultItem>) -> Vec<ResultItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}

/// Same id under a different url is kept as a separate entry.
pub fn dedup_by_id_and_url(items: impl IntoIterator<Item = ResultItem>) -> Vec<ResultItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert((item.id.clone(), item.url.clone())))
        .collect()
}

fn global_union<'a>(cache: &'a ResourceCache) -> impl Iterator<Item = ResultItem> + 'a {
    GlobalCategory::ALL
        .into_iter()
        .flat_map(move |category| cache.items(CacheKey::Global(category)).iter().cloned())
}

/// Items shown for `filter` before search is applied.
pub fn display_items(filter: FilterKey, cache: &ResourceCache) -> Vec<ResultItem> {
    match filter {
        FilterKey::Handouts | FilterKey::Clinical | FilterKey::Billing => filter
            .global_category()
            .map(|category| cache.items(CacheKey::Global(category)).to_vec())
            .unwrap_or_default(),
        FilterKey::Program => cache.items(CacheKey::Programs).to_vec(),
        FilterKey::All => dedup_by_id(global_union(cache)),
        FilterKey::Videos => {
            let union = global_union(cache).chain(cache.items(CacheKey::Programs).iter().cloned());
            dedup_by_id_and_url(union)
                .into_iter()
                .filter(is_video)
                .collect()
        }
    }
}

/// Case-insensitive substring match on the display name. A blank term keeps everything.
pub fn apply_search(items: Vec<ResultItem>, term: &str) -> Vec<ResultItem> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
#[path = "tests/selectors_tests.rs"]
mod tests;
