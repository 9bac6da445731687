use std::fmt;

use shared::domain::{GlobalCategory, ProgramSlug};
use thiserror::Error;

use crate::cache::CacheKey;

/// What a failed load was trying to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    Category(GlobalCategory),
    ProgramAggregate,
    ProgramResources(ProgramSlug),
}

impl fmt::Display for LoadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadTarget::Category(category) => write!(f, "{} resources", category.as_str()),
            LoadTarget::ProgramAggregate => f.write_str("program resources"),
            LoadTarget::ProgramResources(slug) => write!(f, "resources for program {slug}"),
        }
    }
}

/// Hard load failures. These block the content area until the user
/// navigates or reselects a filter.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Program not found")]
    ProgramNotFound { slug: String },
    #[error("failed to load {target}: {source:#}")]
    Fetch {
        target: LoadTarget,
        source: anyhow::Error,
    },
}

impl LoadError {
    pub fn fetch(target: LoadTarget, source: anyhow::Error) -> Self {
        Self::Fetch { target, source }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache entry {0:?} is already loaded")]
    AlreadyLoaded(CacheKey),
    #[error("cache entry {key:?} is not loading under ticket {ticket}")]
    TicketMismatch { key: CacheKey, ticket: u64 },
}
