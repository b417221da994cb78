use serde::{Deserialize, Serialize};

/// Classification of drag subjects and drop containers on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DragKind {
    /// A board holding clips and nested boards.
    Board,
    /// A single clip card.
    Clip,
    /// A board tab in the tab strip.
    Tab,
    /// A grouping column that may contain nested draggables.
    Column,
}

impl DragKind {
    /// String representation used by the host drag-and-drop framework.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Board => "Board",
            Self::Clip => "Clip",
            Self::Tab => "Tab",
            Self::Column => "Column",
        }
    }

    /// Whether items of this kind carry dashboard drag data.
    #[must_use]
    pub const fn is_dashboard_item(self) -> bool {
        matches!(self, Self::Board | Self::Clip | Self::Tab)
    }
}
