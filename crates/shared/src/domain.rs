use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identity of a stored resource: its storage path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last `/`-separated segment of the path.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgramSlug {
    PrimaryCare,
    BehavioralHealth,
    ChronicCare,
    WeightManagement,
    WomensHealth,
}

impl ProgramSlug {
    pub const ALL: [ProgramSlug; 5] = [
        ProgramSlug::PrimaryCare,
        ProgramSlug::BehavioralHealth,
        ProgramSlug::ChronicCare,
        ProgramSlug::WeightManagement,
        ProgramSlug::WomensHealth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProgramSlug::PrimaryCare => "primary-care",
            ProgramSlug::BehavioralHealth => "behavioral-health",
            ProgramSlug::ChronicCare => "chronic-care",
            ProgramSlug::WeightManagement => "weight-management",
            ProgramSlug::WomensHealth => "womens-health",
        }
    }

    /// Exact match against the known slug set; routed input is not trimmed or case-folded.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slug| slug.as_str() == raw)
    }
}

impl fmt::Display for ProgramSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource groupings that are not tied to a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalCategory {
    Handouts,
    Clinical,
    Billing,
}

impl GlobalCategory {
    pub const ALL: [GlobalCategory; 3] = [
        GlobalCategory::Handouts,
        GlobalCategory::Clinical,
        GlobalCategory::Billing,
    ];

    /// Name used by the portal UI and the `cat` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            GlobalCategory::Handouts => "handouts",
            GlobalCategory::Clinical => "clinical",
            GlobalCategory::Billing => "billing",
        }
    }

    /// Name the catalog service files this category under.
    pub fn catalog_key(self) -> &'static str {
        match self {
            GlobalCategory::Handouts => "handouts",
            GlobalCategory::Clinical => "guidelines",
            GlobalCategory::Billing => "billing",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == raw)
    }
}

/// One of the four resource groups inside a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramGroup {
    Training,
    Protocols,
    Forms,
    Resources,
}

impl ProgramGroup {
    /// Display order on the program page.
    pub const ALL: [ProgramGroup; 4] = [
        ProgramGroup::Training,
        ProgramGroup::Protocols,
        ProgramGroup::Forms,
        ProgramGroup::Resources,
    ];

    /// Order in which groups are flattened into the cross-program aggregate.
    pub const AGGREGATE_ORDER: [ProgramGroup; 4] = [
        ProgramGroup::Forms,
        ProgramGroup::Protocols,
        ProgramGroup::Resources,
        ProgramGroup::Training,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProgramGroup::Training => "training",
            ProgramGroup::Protocols => "protocols",
            ProgramGroup::Forms => "forms",
            ProgramGroup::Resources => "resources",
        }
    }
}
