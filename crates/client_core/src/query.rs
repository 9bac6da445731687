//! URL query surface of the two pages: normalization of `tab`/`cat` and
//! parameter rewrites that keep unrelated parameters intact.

use std::fmt;

use shared::domain::{GlobalCategory, ProgramGroup};
use url::form_urlencoded;

pub const TAB_PARAM: &str = "tab";
pub const CATEGORY_PARAM: &str = "cat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    Push,
    #[default]
    Replace,
}

/// A query string the host should write to its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryUpdate {
    pub query: String,
    pub mode: HistoryMode,
}

impl QueryUpdate {
    pub fn replace(query: String) -> Self {
        Self {
            query,
            mode: HistoryMode::Replace,
        }
    }
}

fn strip_question_mark(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}

/// First value of `key`, decoded.
pub fn query_param(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(strip_question_mark(query).as_bytes())
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}

/// Sets `key` to `value` (or removes it when `value` is `None`), keeping
/// every other parameter in its original order. Repeated `key` entries
/// collapse to the first position.
pub fn with_query_param(query: &str, key: &str, value: Option<&str>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut written = false;
    for (name, existing) in form_urlencoded::parse(strip_question_mark(query).as_bytes()) {
        if name == key {
            if let (Some(value), false) = (value, written) {
                serializer.append_pair(key, value);
                written = true;
            }
            continue;
        }
        serializer.append_pair(&name, &existing);
    }
    if let (Some(value), false) = (value, written) {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Writes the filter's `cat` projection; local-only filters clear `cat`.
pub fn project_filter(query: &str, filter: FilterKey) -> String {
    with_query_param(query, CATEGORY_PARAM, filter.query_value())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProgramTab {
    #[default]
    Overview,
    Training,
    Protocols,
    Forms,
    Resources,
}

impl ProgramTab {
    pub const ALL: [ProgramTab; 5] = [
        ProgramTab::Overview,
        ProgramTab::Training,
        ProgramTab::Protocols,
        ProgramTab::Forms,
        ProgramTab::Resources,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProgramTab::Overview => "overview",
            ProgramTab::Training => "training",
            ProgramTab::Protocols => "protocols",
            ProgramTab::Forms => "forms",
            ProgramTab::Resources => "resources",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.as_str() == raw)
    }

    /// Unknown or absent values fall back to `Overview`.
    pub fn normalize(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse).unwrap_or_default()
    }

    pub fn from_query(query: &str) -> Self {
        Self::normalize(query_param(query, TAB_PARAM).as_deref())
    }

    pub fn group(self) -> Option<ProgramGroup> {
        match self {
            ProgramTab::Overview => None,
            ProgramTab::Training => Some(ProgramGroup::Training),
            ProgramTab::Protocols => Some(ProgramGroup::Protocols),
            ProgramTab::Forms => Some(ProgramGroup::Forms),
            ProgramTab::Resources => Some(ProgramGroup::Resources),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProgramTab::Overview => "Overview",
            ProgramTab::Training => "Training",
            ProgramTab::Protocols => "Protocols",
            ProgramTab::Forms => "Forms",
            ProgramTab::Resources => "Resources",
        }
    }
}

impl fmt::Display for ProgramTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-select filter of the resource library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterKey {
    #[default]
    All,
    Handouts,
    Clinical,
    Billing,
    Program,
    Videos,
}

impl FilterKey {
    pub const ALL: [FilterKey; 6] = [
        FilterKey::All,
        FilterKey::Handouts,
        FilterKey::Clinical,
        FilterKey::Billing,
        FilterKey::Program,
        FilterKey::Videos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::All => "all",
            FilterKey::Handouts => "handouts",
            FilterKey::Clinical => "clinical",
            FilterKey::Billing => "billing",
            FilterKey::Program => "program",
            FilterKey::Videos => "videos",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.as_str() == raw)
    }

    pub fn global_category(self) -> Option<GlobalCategory> {
        match self {
            FilterKey::Handouts => Some(GlobalCategory::Handouts),
            FilterKey::Clinical => Some(GlobalCategory::Clinical),
            FilterKey::Billing => Some(GlobalCategory::Billing),
            FilterKey::All | FilterKey::Program | FilterKey::Videos => None,
        }
    }

    /// Value mirrored into `cat`; `None` means the filter lives only in page state.
    pub fn query_value(self) -> Option<&'static str> {
        self.global_category().map(GlobalCategory::as_str)
    }

    pub fn is_url_bound(self) -> bool {
        self.query_value().is_some()
    }

    /// Only the three global categories are accepted from `cat`; anything
    /// else, including `all`, `program` and `videos`, normalizes to `All`.
    pub fn normalize(raw: Option<&str>) -> Self {
        raw.and_then(GlobalCategory::parse)
            .map(Self::from)
            .unwrap_or_default()
    }

    pub fn from_query(query: &str) -> Self {
        Self::normalize(query_param(query, CATEGORY_PARAM).as_deref())
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterKey::All => "All",
            FilterKey::Handouts => "Patient Handouts",
            FilterKey::Clinical => "Clinical Guidelines",
            FilterKey::Billing => "Billing & Coding",
            FilterKey::Program => "Program Files",
            FilterKey::Videos => "Videos",
        }
    }
}

impl From<GlobalCategory> for FilterKey {
    fn from(value: GlobalCategory) -> Self {
        match value {
            GlobalCategory::Handouts => FilterKey::Handouts,
            GlobalCategory::Clinical => FilterKey::Clinical,
            GlobalCategory::Billing => FilterKey::Billing,
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
