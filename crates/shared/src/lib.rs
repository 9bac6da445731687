//! Vocabulary shared between the catalog client and the portal pages.

pub mod domain;
pub mod error;
pub mod protocol;
