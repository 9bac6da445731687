//! Client side of the member portal's resource pages: the catalog client and
//! the controllers behind the program detail and resource library pages.

pub mod cache;
pub mod catalog;
pub mod error;
pub mod library;
pub mod program_detail;
pub mod query;
pub mod render;
pub mod selectors;

pub use cache::{CacheKey, LoadState, ResourceCache};
pub use catalog::{CatalogClient, HttpCatalogClient, MissingCatalogClient};
pub use error::{LoadError, LoadTarget};
pub use library::{LibraryView, LoadOutcome, ResourceLibrary};
pub use program_detail::{DetailStatus, ProgramDetail, ProgramDetailView, TabContent};
pub use query::{FilterKey, HistoryMode, ProgramTab, QueryUpdate};
pub use render::{GroupView, ResultIcon, ResultRow, RowAction};
pub use selectors::{ResultItem, Source};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod catalog_tests;
