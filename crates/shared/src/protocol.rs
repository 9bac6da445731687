use serde::{Deserialize, Serialize};

use crate::domain::{ProgramGroup, ProgramSlug, ResourceId};

/// One downloadable or playable file as listed by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub path: ResourceId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Entry of the program directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A program's files split into its four groups. Groups absent from the
/// payload decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedResources {
    #[serde(default)]
    pub training: Vec<FileDescriptor>,
    #[serde(default)]
    pub protocols: Vec<FileDescriptor>,
    #[serde(default)]
    pub forms: Vec<FileDescriptor>,
    #[serde(default)]
    pub resources: Vec<FileDescriptor>,
}

impl GroupedResources {
    pub fn group(&self, group: ProgramGroup) -> &[FileDescriptor] {
        match group {
            ProgramGroup::Training => &self.training,
            ProgramGroup::Protocols => &self.protocols,
            ProgramGroup::Forms => &self.forms,
            ProgramGroup::Resources => &self.resources,
        }
    }

    pub fn total(&self) -> usize {
        ProgramGroup::ALL
            .into_iter()
            .map(|group| self.group(group).len())
            .sum()
    }
}

/// Program name and description as shown in the page header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramHeader {
    pub name: String,
    pub description: Option<String>,
}

impl ProgramHeader {
    /// Header used when the directory lookup fails or lists nothing for the slug.
    pub fn from_slug(slug: &str) -> Self {
        Self {
            name: slug.to_string(),
            description: None,
        }
    }

    pub fn from_directory(slug: &str, directory: &[ProgramSummary]) -> Self {
        directory
            .iter()
            .find(|entry| entry.slug == slug)
            .map(|entry| Self {
                name: entry.name.clone(),
                description: entry.description.clone(),
            })
            .unwrap_or_else(|| Self::from_slug(slug))
    }
}

impl ProgramSummary {
    pub fn known_slug(&self) -> Option<ProgramSlug> {
        ProgramSlug::parse(&self.slug)
    }
}
