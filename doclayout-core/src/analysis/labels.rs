use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Canonical document element classes of the YOLOX layout model.
///
/// Variant order is the model's class order, so `Ord` sorts labels the way
/// the legend lists them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Label {
    Caption,
    Footnote,
    Formula,
    ListItem,
    PageFooter,
    PageHeader,
    Picture,
    SectionHeader,
    Table,
    Text,
    Title,
}

impl Label {
    /// All labels in class index order.
    pub const ALL: [Label; 11] = [
        Label::Caption,
        Label::Footnote,
        Label::Formula,
        Label::ListItem,
        Label::PageFooter,
        Label::PageHeader,
        Label::Picture,
        Label::SectionHeader,
        Label::Table,
        Label::Text,
        Label::Title,
    ];

    /// Canonical English name, also used as the overlay display label.
    pub const fn name(&self) -> &'static str {
        match self {
            Label::Caption => "Caption",
            Label::Footnote => "Footnote",
            Label::Formula => "Formula",
            Label::ListItem => "ListItem",
            Label::PageFooter => "PageFooter",
            Label::PageHeader => "PageHeader",
            Label::Picture => "Picture",
            Label::SectionHeader => "SectionHeader",
            Label::Table => "Table",
            Label::Text => "Text",
            Label::Title => "Title",
        }
    }

    pub const fn idx(&self) -> usize {
        match self {
            Label::Caption => 0,
            Label::Footnote => 1,
            Label::Formula => 2,
            Label::ListItem => 3,
            Label::PageFooter => 4,
            Label::PageHeader => 5,
            Label::Picture => 6,
            Label::SectionHeader => 7,
            Label::Table => 8,
            Label::Text => 9,
            Label::Title => 10,
        }
    }

    /// Default overlay color.
    pub const fn color(&self) -> [u8; 3] {
        match self {
            Label::Caption => [255, 0, 0],         // Red
            Label::Footnote => [255, 165, 0],      // Orange
            Label::Formula => [128, 0, 128],       // Purple
            Label::ListItem => [0, 0, 255],        // Blue
            Label::PageFooter => [128, 128, 128],  // Gray
            Label::PageHeader => [255, 192, 203],  // Pink
            Label::Picture => [255, 0, 255],       // Magenta
            Label::SectionHeader => [255, 215, 0], // Gold
            Label::Table => [255, 255, 0],         // Yellow
            Label::Text => [0, 255, 0],            // Green
            Label::Title => [255, 69, 0],          // Orange Red
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Label::Caption => "Caption text attached to a figure or table",
            Label::Footnote => "Note placed at the bottom of a page",
            Label::Formula => "Mathematical formula or equation",
            Label::ListItem => "Single entry of a bulleted or numbered list",
            Label::PageFooter => "Running footer repeated at the bottom of pages",
            Label::PageHeader => "Running header repeated at the top of pages",
            Label::Picture => "Figure, photo, chart or other graphic",
            Label::SectionHeader => "Heading that opens a section",
            Label::Table => "Tabular region",
            Label::Text => "Body text paragraph",
            Label::Title => "Document title",
        }
    }

    /// Localized name for legends. Never drawn on the overlay.
    pub const fn japanese_name(&self) -> &'static str {
        match self {
            Label::Caption => "キャプション",
            Label::Footnote => "脚注",
            Label::Formula => "数式",
            Label::ListItem => "リストアイテム",
            Label::PageFooter => "ページフッター",
            Label::PageHeader => "ページヘッダー",
            Label::Picture => "画像",
            Label::SectionHeader => "セクションヘッダー",
            Label::Table => "テーブル",
            Label::Text => "テキスト",
            Label::Title => "タイトル",
        }
    }

    pub const fn label_size() -> usize {
        11
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact, case-sensitive canonical name. Aliases are not accepted here.
impl FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.name() == s)
            .ok_or_else(|| LabelError::Unrecognized { raw: s.to_owned() })
    }
}

macro_rules! impl_try_from_for_label {
    ($($t:ty),*) => {
        $(
            impl TryFrom<$t> for Label {
                type Error = LabelError;

                fn try_from(idx: $t) -> Result<Self, Self::Error> {
                    usize::try_from(idx)
                        .ok()
                        .and_then(|idx| Label::ALL.get(idx).copied())
                        .ok_or(LabelError::UnknownIndex {
                            idx: usize::try_from(idx).unwrap_or(usize::MAX),
                            size: Label::label_size(),
                        })
                }
            }
        )*
    };
}

impl_try_from_for_label!(u8, u16, u32, u64, usize, i32, i64);
