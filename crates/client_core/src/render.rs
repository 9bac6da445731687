//! Row model handed to whatever draws the pages.

use shared::{
    domain::{ProgramGroup, ResourceId},
    protocol::FileDescriptor,
};

use crate::{
    query::FilterKey,
    selectors::{is_video, ResultItem, Source},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultIcon {
    Video,
    Document,
}

impl ResultIcon {
    pub fn name(self) -> &'static str {
        match self {
            ResultIcon::Video => "video",
            ResultIcon::Document => "file-text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Play(String),
    Download(String),
    Unavailable,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Play(_) => "Play",
            RowAction::Download(_) => "Download",
            RowAction::Unavailable => "Unavailable",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, RowAction::Unavailable)
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            RowAction::Play(url) | RowAction::Download(url) => Some(url),
            RowAction::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Row key.
    pub id: ResourceId,
    pub icon: ResultIcon,
    pub name: String,
    pub action: RowAction,
}

impl ResultRow {
    pub fn from_item(item: &ResultItem) -> Self {
        let video = is_video(item);
        let action = match (&item.url, video) {
            (None, _) => RowAction::Unavailable,
            (Some(url), true) => RowAction::Play(url.clone()),
            (Some(url), false) => RowAction::Download(url.clone()),
        };
        Self {
            id: item.id.clone(),
            icon: if video {
                ResultIcon::Video
            } else {
                ResultIcon::Document
            },
            name: item.name.clone(),
            action,
        }
    }
}

pub fn rows(items: &[ResultItem]) -> Vec<ResultRow> {
    items.iter().map(ResultRow::from_item).collect()
}

pub fn filter_icon(filter: FilterKey) -> &'static str {
    match filter {
        FilterKey::All => "layers",
        FilterKey::Handouts => "file-text",
        FilterKey::Clinical => "stethoscope",
        FilterKey::Billing => "receipt",
        FilterKey::Program => "folder",
        FilterKey::Videos => "video",
    }
}

pub fn empty_group_message(group: ProgramGroup) -> &'static str {
    match group {
        ProgramGroup::Training => "No training materials have been published for this program yet.",
        ProgramGroup::Protocols => "No protocols are available for this program yet.",
        ProgramGroup::Forms => "No forms are available for this program yet.",
        ProgramGroup::Resources => "No additional resources are available for this program yet.",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupView {
    Empty(&'static str),
    Rows(Vec<ResultRow>),
}

impl GroupView {
    pub fn build(group: ProgramGroup, descriptors: &[FileDescriptor]) -> Self {
        if descriptors.is_empty() {
            return GroupView::Empty(empty_group_message(group));
        }
        GroupView::Rows(
            descriptors
                .iter()
                .map(|descriptor| {
                    ResultRow::from_item(&ResultItem::from_descriptor(descriptor, Source::Program))
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        match self {
            GroupView::Empty(_) => 0,
            GroupView::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: Option<&str>, mime_type: Option<&str>) -> ResultItem {
        ResultItem {
            id: ResourceId::new("global/handouts/file"),
            name: "file".into(),
            url: url.map(str::to_string),
            mime_type: mime_type.map(str::to_string),
            source: Source::Global,
        }
    }

    #[test]
    fn video_rows_play_and_documents_download() {
        let video = ResultRow::from_item(&item(Some("https://cdn/intro.mp4"), None));
        assert_eq!(video.icon, ResultIcon::Video);
        assert_eq!(video.action, RowAction::Play("https://cdn/intro.mp4".into()));
        assert_eq!(video.action.label(), "Play");

        let doc = ResultRow::from_item(&item(Some("https://cdn/a.pdf"), Some("application/pdf")));
        assert_eq!(doc.icon, ResultIcon::Document);
        assert_eq!(doc.action.label(), "Download");
        assert_eq!(doc.action.url(), Some("https://cdn/a.pdf"));
    }

    #[test]
    fn missing_url_renders_disabled_unavailable_action() {
        let row = ResultRow::from_item(&item(None, Some("video/mp4")));
        assert_eq!(row.icon, ResultIcon::Video);
        assert_eq!(row.action, RowAction::Unavailable);
        assert!(!row.action.is_enabled());
        assert_eq!(row.action.label(), "Unavailable");
    }

    #[test]
    fn every_group_has_its_own_empty_message() {
        let messages: std::collections::HashSet<_> = ProgramGroup::ALL
            .into_iter()
            .map(empty_group_message)
            .collect();
        assert_eq!(messages.len(), ProgramGroup::ALL.len());
        assert_eq!(
            GroupView::build(ProgramGroup::Forms, &[]),
            GroupView::Empty(empty_group_message(ProgramGroup::Forms))
        );
    }

    #[test]
    fn group_rows_are_keyed_by_path() {
        let descriptors = vec![
            FileDescriptor {
                path: ResourceId::new("p/forms/intake.pdf"),
                title: "Intake".into(),
                url: Some("https://cdn/intake.pdf".into()),
                mime_type: None,
            },
            FileDescriptor {
                path: ResourceId::new("p/forms/consent.pdf"),
                title: "Consent".into(),
                url: None,
                mime_type: None,
            },
        ];
        let GroupView::Rows(rows) = GroupView::build(ProgramGroup::Forms, &descriptors) else {
            panic!("expected rows");
        };
        let keys: Vec<_> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(keys, vec!["p/forms/intake.pdf", "p/forms/consent.pdf"]);
    }
}
